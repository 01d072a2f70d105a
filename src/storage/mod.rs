/// 오브젝트 스토리지 연동
/// 업로드된 매물 이미지를 S3 호환 평면 네임스페이스 버킷에 저장한다.
// region:    --- Imports
use async_trait::async_trait;
use tracing::info;
use uuid::Uuid;

// endregion: --- Imports

// region:    --- Object Storage Trait

/// 오브젝트 스토리지 트레이트
/// put은 공개 URL을 반환하고, delete는 공개 URL을 받아 해당 오브젝트를 지운다.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    async fn put(&self, key: &str, content_type: &str, bytes: Vec<u8>) -> Result<String, String>;
    async fn delete(&self, public_url: &str) -> Result<(), String>;
}

/// 핸들러 상태로 공유하는 스토리지 핸들
pub type DynStorage = std::sync::Arc<dyn ObjectStorage>;

// endregion: --- Object Storage Trait

// region:    --- Http Object Storage

/// HTTP 게이트웨이 기반 스토리지 구현체
/// {endpoint}/{bucket}/{key}로 PUT/DELETE하고 공개 URL은 {public_url}/{key}이다.
pub struct HttpObjectStorage {
    client: reqwest::Client,
    endpoint: String,
    bucket: String,
    access_key: String,
    public_url: String,
}

impl HttpObjectStorage {
    /// 환경 변수에서 스토리지 설정을 읽어 생성
    pub fn from_env() -> Self {
        let endpoint = std::env::var("STORAGE_ENDPOINT").expect("STORAGE_ENDPOINT must be set");
        let bucket = std::env::var("STORAGE_BUCKET").expect("STORAGE_BUCKET must be set");
        let access_key =
            std::env::var("STORAGE_ACCESS_KEY").expect("STORAGE_ACCESS_KEY must be set");
        let public_url = std::env::var("STORAGE_PUBLIC_URL")
            .unwrap_or_else(|_| format!("{}/{}", endpoint.trim_end_matches('/'), bucket));

        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
            bucket,
            access_key,
            public_url: public_url.trim_end_matches('/').to_string(),
        }
    }

    fn object_url(&self, key: &str) -> String {
        format!("{}/{}/{}", self.endpoint, self.bucket, key)
    }

    /// 공개 URL에서 오브젝트 키 추출
    /// 예: https://pub.example.com/bikes/abc.jpg -> bikes/abc.jpg
    fn key_from_public_url(&self, public_url: &str) -> Result<String, String> {
        if let Some(rest) = public_url.strip_prefix(&self.public_url) {
            return Ok(rest.trim_start_matches('/').to_string());
        }
        // 공개 도메인이 바뀐 과거 URL도 경로 부분으로 처리한다.
        let without_scheme = public_url
            .split_once("://")
            .map(|(_, rest)| rest)
            .unwrap_or(public_url);
        match without_scheme.split_once('/') {
            Some((_, path)) if !path.is_empty() => Ok(path.to_string()),
            _ => Err(format!("잘못된 이미지 URL: {}", public_url)),
        }
    }
}

#[async_trait]
impl ObjectStorage for HttpObjectStorage {
    async fn put(&self, key: &str, content_type: &str, bytes: Vec<u8>) -> Result<String, String> {
        let response = self
            .client
            .put(self.object_url(key))
            .bearer_auth(&self.access_key)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        if !response.status().is_success() {
            return Err(format!("업로드 실패: {}", response.status()));
        }

        let url = format!("{}/{}", self.public_url, key);
        info!("{:<12} --> 이미지 업로드 완료: {}", "Storage", url);
        Ok(url)
    }

    async fn delete(&self, public_url: &str) -> Result<(), String> {
        let key = self.key_from_public_url(public_url)?;
        let response = self
            .client
            .delete(self.object_url(&key))
            .bearer_auth(&self.access_key)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        if !response.status().is_success() {
            return Err(format!("이미지 삭제 실패: {}", response.status()));
        }

        info!("{:<12} --> 이미지 삭제 완료: {}", "Storage", public_url);
        Ok(())
    }
}

// endregion: --- Http Object Storage

// region:    --- Object Key

/// 업로드 파일명에서 오브젝트 키 생성: bikes/<랜덤 hex>.<확장자>
pub fn object_key(file_name: &str) -> String {
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext)
        .filter(|ext| !ext.is_empty())
        .unwrap_or("jpg");
    format!("bikes/{}.{}", Uuid::new_v4().simple(), extension)
}

// endregion: --- Object Key
