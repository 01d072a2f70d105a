// 이미지 인제스트 파이프라인 테스트
use async_trait::async_trait;
use dealership_service::ingest::{ImageGroup, ImageSet, PendingImage, DEFAULT_MAX_IMAGES};
use dealership_service::storage::{DynStorage, ObjectStorage};
use std::sync::{Arc, Mutex};

/// 업로드/삭제를 기록하는 테스트용 스토리지
/// FAIL 바이트로 시작하는 파일의 업로드와 지정된 URL의 삭제를 실패시킬 수 있다.
struct MockStorage {
    uploads: Mutex<Vec<String>>,
    deletes: Mutex<Vec<String>>,
    fail_delete_url: Option<String>,
}

impl MockStorage {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            uploads: Mutex::new(Vec::new()),
            deletes: Mutex::new(Vec::new()),
            fail_delete_url: None,
        })
    }

    fn failing_delete(url: &str) -> Arc<Self> {
        Arc::new(Self {
            uploads: Mutex::new(Vec::new()),
            deletes: Mutex::new(Vec::new()),
            fail_delete_url: Some(url.to_string()),
        })
    }

    fn uploads(&self) -> Vec<String> {
        self.uploads.lock().unwrap().clone()
    }

    fn deletes(&self) -> Vec<String> {
        self.deletes.lock().unwrap().clone()
    }
}

#[async_trait]
impl ObjectStorage for MockStorage {
    async fn put(&self, key: &str, _content_type: &str, bytes: Vec<u8>) -> Result<String, String> {
        if bytes.starts_with(b"FAIL") {
            return Err("업로드 거부".to_string());
        }
        let url = format!("https://cdn.test/{}", key);
        self.uploads.lock().unwrap().push(url.clone());
        Ok(url)
    }

    async fn delete(&self, public_url: &str) -> Result<(), String> {
        if self.fail_delete_url.as_deref() == Some(public_url) {
            return Err("삭제 거부".to_string());
        }
        self.deletes.lock().unwrap().push(public_url.to_string());
        Ok(())
    }
}

fn file(name: &str, bytes: &[u8]) -> PendingImage {
    PendingImage {
        file_name: name.to_string(),
        content_type: "application/octet-stream".to_string(),
        bytes: bytes.to_vec(),
    }
}

fn urls(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| format!("https://cdn.test/bikes/existing-{}.jpg", i))
        .collect()
}

#[tokio::test]
async fn commit_appends_uploads_after_existing_in_order() {
    let storage = MockStorage::new();
    let mut set = ImageSet::new(urls(2), 5);
    set.add_files(vec![file("a.k1", b"one"), file("b.k2", b"two"), file("c.k3", b"three")]);
    assert_eq!(set.len(), 5);

    let dyn_storage: DynStorage = storage.clone();
    let result = set.commit(dyn_storage).await.unwrap();
    assert_eq!(result.len(), 5);
    assert_eq!(result[0], "https://cdn.test/bikes/existing-0.jpg");
    assert_eq!(result[1], "https://cdn.test/bikes/existing-1.jpg");
    // 업로드 완료 순서와 무관하게 대기열 순서대로 이어 붙는다.
    assert!(result[2].ends_with(".k1"));
    assert!(result[3].ends_with(".k2"));
    assert!(result[4].ends_with(".k3"));
}

#[tokio::test]
async fn commit_failure_rolls_back_uploaded_objects() {
    let storage = MockStorage::new();
    let mut set = ImageSet::new(Vec::new(), 5);
    set.add_files(vec![
        file("a.jpg", b"good"),
        file("b.jpg", b"FAIL middle"),
        file("c.jpg", b"good"),
    ]);

    let dyn_storage: DynStorage = storage.clone();
    let result = set.commit(dyn_storage).await;
    assert!(result.is_err());

    // 성공했던 업로드는 모두 되돌려진다.
    let uploaded = storage.uploads();
    let deleted = storage.deletes();
    assert_eq!(uploaded.len(), 2);
    assert_eq!(deleted.len(), 2);
    for url in &uploaded {
        assert!(deleted.contains(url));
    }
}

#[tokio::test]
async fn add_files_silently_truncates_over_cap() {
    let mut set = ImageSet::new(urls(3), DEFAULT_MAX_IMAGES);
    set.add_files(vec![
        file("a.jpg", b"one"),
        file("b.jpg", b"two"),
        file("c.jpg", b"three"),
        file("d.jpg", b"four"),
    ]);
    assert_eq!(set.len(), 5);
    assert_eq!(set.pending().len(), 2);
    assert_eq!(set.pending()[0].file_name, "a.jpg");
    assert_eq!(set.pending()[1].file_name, "b.jpg");

    // 가득 찬 뒤에는 아무것도 추가되지 않는다.
    set.add_files(vec![file("e.jpg", b"five")]);
    assert_eq!(set.len(), 5);
}

#[test]
fn reorder_moves_within_group_only() {
    let mut set = ImageSet::new(urls(3), 5);
    set.add_files(vec![file("a.jpg", b"one"), file("b.jpg", b"two")]);

    set.reorder(2, 0, ImageGroup::Existing);
    assert_eq!(set.existing()[0], "https://cdn.test/bikes/existing-2.jpg");
    assert_eq!(set.existing()[1], "https://cdn.test/bikes/existing-0.jpg");

    // 범위를 벗어난 이동은 무시된다.
    set.reorder(5, 0, ImageGroup::Existing);
    assert_eq!(set.existing().len(), 3);

    set.reorder(1, 0, ImageGroup::Pending);
    assert_eq!(set.pending()[0].file_name, "b.jpg");
    assert_eq!(set.pending()[1].file_name, "a.jpg");
}

#[test]
fn set_as_main_moves_to_front_of_its_group() {
    let mut set = ImageSet::new(urls(3), 5);
    set.add_files(vec![file("a.jpg", b"one"), file("b.jpg", b"two")]);

    set.set_as_main(1, ImageGroup::Existing);
    assert_eq!(set.existing()[0], "https://cdn.test/bikes/existing-1.jpg");

    // pending 항목은 existing이 남아 있는 동안 전체 0번이 될 수 없다.
    set.set_as_main(1, ImageGroup::Pending);
    assert_eq!(set.pending()[0].file_name, "b.jpg");
    assert_eq!(set.existing()[0], "https://cdn.test/bikes/existing-1.jpg");
}

#[tokio::test]
async fn remove_existing_deletes_from_storage_first() {
    let storage = MockStorage::new();
    let dyn_storage: DynStorage = storage.clone();
    let mut set = ImageSet::new(urls(2), 5);

    let removed = set.remove_existing(&dyn_storage, 0).await.unwrap();
    assert_eq!(removed, "https://cdn.test/bikes/existing-0.jpg");
    assert_eq!(set.existing().len(), 1);
    assert_eq!(storage.deletes(), vec!["https://cdn.test/bikes/existing-0.jpg"]);

    // 잘못된 인덱스
    assert!(set.remove_existing(&dyn_storage, 9).await.is_err());
}

#[tokio::test]
async fn remove_existing_keeps_url_when_delete_fails() {
    let storage = MockStorage::failing_delete("https://cdn.test/bikes/existing-0.jpg");
    let dyn_storage: DynStorage = storage;
    let mut set = ImageSet::new(urls(2), 5);

    assert!(set.remove_existing(&dyn_storage, 0).await.is_err());
    // 삭제가 실패하면 목록에서 빠지지 않는다.
    assert_eq!(set.existing().len(), 2);
    assert_eq!(set.existing()[0], "https://cdn.test/bikes/existing-0.jpg");
}

#[test]
fn remove_pending_by_index() {
    let mut set = ImageSet::new(Vec::new(), 5);
    set.add_files(vec![file("a.jpg", b"one"), file("b.jpg", b"two")]);

    let removed = set.remove_pending(0).unwrap();
    assert_eq!(removed.file_name, "a.jpg");
    assert_eq!(set.pending().len(), 1);
    assert!(set.remove_pending(5).is_none());
}

#[tokio::test]
async fn commit_with_no_pending_returns_existing() {
    let storage = MockStorage::new();
    let set = ImageSet::new(urls(2), 5);
    let dyn_storage: DynStorage = storage.clone();
    let result = set.commit(dyn_storage).await.unwrap();
    assert_eq!(result, urls(2));
    assert!(storage.uploads().is_empty());
}
