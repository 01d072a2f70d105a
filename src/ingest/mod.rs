/// 매물 이미지 인제스트 파이프라인
/// 1. 신규 파일 재압축 후 대기열 추가
/// 2. 그룹 내 순서 변경 / 대표 이미지 지정
/// 3. 커밋 시 병렬 업로드, 실패하면 전체 취소 + 올라간 오브젝트 정리
// region:    --- Imports
use crate::storage::{object_key, DynStorage};
use image::imageops::FilterType;
use image::ImageFormat;
use std::io::Cursor;
use tracing::{info, warn};

// endregion: --- Imports

// region:    --- Compression

/// 재압축 목표 크기 (바이트)
pub const MAX_IMAGE_BYTES: usize = 512 * 1024;
/// 최대 변 길이 (픽셀)
pub const MAX_IMAGE_DIMENSION: u32 = 1920;

/// JPEG 재인코딩 품질 단계. 목표 크기에 들어올 때까지 낮춰가며 시도한다.
const JPEG_QUALITIES: [u8; 4] = [85, 70, 55, 40];

/// 이미지 재압축: 최대 변 길이를 넘으면 축소하고 원본 포맷으로 다시 인코딩한다.
/// 디코딩/인코딩에 실패하거나 결과가 원본보다 크면 원본 바이트를 그대로 쓴다.
/// 한 장의 압축 실패로 전체 배치를 거부하지 않기 위한 정책이다.
pub fn compress_image(bytes: &[u8], content_type: &str) -> Vec<u8> {
    match try_compress(bytes, content_type) {
        Ok(compressed) if compressed.len() < bytes.len() => compressed,
        Ok(_) => bytes.to_vec(),
        Err(e) => {
            warn!("{:<12} --> 이미지 압축 실패, 원본 사용: {}", "Ingest", e);
            bytes.to_vec()
        }
    }
}

fn try_compress(bytes: &[u8], content_type: &str) -> Result<Vec<u8>, String> {
    let format = format_for(content_type).ok_or_else(|| format!("지원하지 않는 포맷: {}", content_type))?;
    let decoded = image::load_from_memory(bytes).map_err(|e| e.to_string())?;

    let resized = if decoded.width() > MAX_IMAGE_DIMENSION || decoded.height() > MAX_IMAGE_DIMENSION
    {
        decoded.resize(MAX_IMAGE_DIMENSION, MAX_IMAGE_DIMENSION, FilterType::Lanczos3)
    } else {
        decoded
    };

    if format == ImageFormat::Jpeg {
        // JPEG는 품질을 낮춰가며 목표 크기에 맞춘다.
        let rgb = resized.to_rgb8();
        let mut last = Vec::new();
        for quality in JPEG_QUALITIES {
            let mut buffer = Vec::new();
            let mut encoder =
                image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buffer, quality);
            encoder.encode_image(&rgb).map_err(|e| e.to_string())?;
            if buffer.len() <= MAX_IMAGE_BYTES {
                return Ok(buffer);
            }
            last = buffer;
        }
        return Ok(last);
    }

    let mut buffer = Cursor::new(Vec::new());
    resized
        .write_to(&mut buffer, format)
        .map_err(|e| e.to_string())?;
    Ok(buffer.into_inner())
}

/// content type에서 재인코딩 포맷 결정
fn format_for(content_type: &str) -> Option<ImageFormat> {
    match content_type {
        "image/jpeg" | "image/jpg" => Some(ImageFormat::Jpeg),
        "image/png" => Some(ImageFormat::Png),
        "image/webp" => Some(ImageFormat::WebP),
        "image/gif" => Some(ImageFormat::Gif),
        "image/bmp" => Some(ImageFormat::Bmp),
        _ => None,
    }
}

// endregion: --- Compression

// region:    --- Image Set

/// 업로드 대기 중인 로컬 파일
#[derive(Debug, Clone)]
pub struct PendingImage {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// 순서 그룹: 이미 업로드된 URL 목록과 업로드 대기 파일 목록
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageGroup {
    Existing,
    Pending,
}

/// 매물에 연결되는 이미지 목록 상태
/// 논리적 순서는 existing ++ pending이고 그 0번이 대표 이미지가 된다.
pub struct ImageSet {
    existing: Vec<String>,
    pending: Vec<PendingImage>,
    max_images: usize,
}

/// 기본 이미지 개수 제한
pub const DEFAULT_MAX_IMAGES: usize = 5;

impl ImageSet {
    pub fn new(existing: Vec<String>, max_images: usize) -> Self {
        Self {
            existing,
            pending: Vec::new(),
            max_images,
        }
    }

    pub fn existing(&self) -> &[String] {
        &self.existing
    }

    pub fn pending(&self) -> &[PendingImage] {
        &self.pending
    }

    /// 전체 이미지 개수 (existing + pending)
    pub fn len(&self) -> usize {
        self.existing.len() + self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 신규 파일 추가. 각 파일은 재압축을 거치고,
    /// 개수 제한을 넘는 파일은 에러 없이 잘라낸다.
    pub fn add_files(&mut self, files: Vec<PendingImage>) {
        let room = self.max_images.saturating_sub(self.len());
        for file in files.into_iter().take(room) {
            let bytes = compress_image(&file.bytes, &file.content_type);
            self.pending.push(PendingImage { bytes, ..file });
        }
    }

    /// 대기 파일 제거
    pub fn remove_pending(&mut self, index: usize) -> Option<PendingImage> {
        if index < self.pending.len() {
            Some(self.pending.remove(index))
        } else {
            None
        }
    }

    /// 업로드된 이미지 제거. 스토리지 삭제가 먼저 성공해야 목록에서 빠진다.
    /// 삭제 실패 시 목록을 그대로 두어 스토리지와 레코드가 어긋나지 않게 한다.
    pub async fn remove_existing(
        &mut self,
        storage: &DynStorage,
        index: usize,
    ) -> Result<String, String> {
        let url = self
            .existing
            .get(index)
            .cloned()
            .ok_or_else(|| format!("잘못된 이미지 인덱스: {}", index))?;

        storage.delete(&url).await?;
        self.existing.remove(index);
        Ok(url)
    }

    /// 같은 그룹 안에서 순서 변경
    /// 그룹을 넘나드는 이동은 업로드/재다운로드가 필요하므로 지원하지 않고 무시한다.
    pub fn reorder(&mut self, from: usize, to: usize, group: ImageGroup) {
        match group {
            ImageGroup::Existing => move_within(&mut self.existing, from, to),
            ImageGroup::Pending => move_within(&mut self.pending, from, to),
        }
    }

    /// 대표 이미지 지정: 해당 항목을 자기 그룹의 맨 앞으로 옮긴다.
    /// existing이 남아 있는 동안 pending 항목은 전체 순서의 0번이 될 수 없다.
    /// (업로드 전 파일을 existing 앞으로 승격할 수 없는 제약을 그대로 둔다.)
    pub fn set_as_main(&mut self, index: usize, group: ImageGroup) {
        self.reorder(index, 0, group);
    }

    /// 커밋: 대기 파일을 병렬 업로드하고 existing ++ 업로드 URL을 반환한다.
    /// 하나라도 실패하면 이미 올라간 오브젝트를 최선 노력으로 지우고 전체를 실패시킨다.
    pub async fn commit(self, storage: DynStorage) -> Result<Vec<String>, String> {
        info!(
            "{:<12} --> 이미지 커밋 시작: existing {}, pending {}",
            "Ingest",
            self.existing.len(),
            self.pending.len()
        );

        let mut handles = Vec::with_capacity(self.pending.len());
        for file in self.pending {
            let storage = DynStorage::clone(&storage);
            handles.push(tokio::spawn(async move {
                let key = object_key(&file.file_name);
                storage.put(&key, &file.content_type, file.bytes).await
            }));
        }

        // 업로드 순서와 무관하게 결과는 대기열의 원래 위치대로 모은다.
        let mut uploaded: Vec<String> = Vec::with_capacity(handles.len());
        let mut failure: Option<String> = None;
        for handle in handles {
            match handle.await {
                Ok(Ok(url)) => uploaded.push(url),
                Ok(Err(e)) => failure = Some(e),
                Err(e) => failure = Some(e.to_string()),
            }
        }

        if let Some(error) = failure {
            // 부분 저장을 피하기 위해 이미 성공한 업로드를 되돌린다.
            for url in &uploaded {
                if let Err(e) = storage.delete(url).await {
                    warn!(
                        "{:<12} --> 업로드 롤백 실패 (고아 오브젝트 가능): {} ({})",
                        "Ingest", url, e
                    );
                }
            }
            return Err(error);
        }

        let mut result = self.existing;
        result.extend(uploaded);
        Ok(result)
    }
}

/// 목록 안에서 항목 이동 (제거 후 대상 위치에 삽입)
fn move_within<T>(items: &mut Vec<T>, from: usize, to: usize) {
    if from >= items.len() || to >= items.len() || from == to {
        return;
    }
    let item = items.remove(from);
    items.insert(to, item);
}

// endregion: --- Image Set
