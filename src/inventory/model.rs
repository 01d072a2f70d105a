use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// 바이크 매물 모델
/// JSON 응답은 기존 프런트엔드와 맞추기 위해 camelCase로 직렬화한다.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Bike {
    pub id: i64,
    /// 대표 이미지. images가 비어있지 않으면 images[0]과 동일하게 유지된다.
    pub image: String,
    pub images: Vec<String>,
    /// 통화 문자열 그대로 저장 (예: "₹6,25,000")
    pub price: String,
    pub model: String,
    pub brand: String,
    pub category: Vec<String>,
    pub reg_year: String,
    pub kms: String,
    pub reg_state: String,
    pub color: Option<String>,
    pub fuel_type: Option<String>,
    pub engine: Option<String>,
    pub description: Option<String>,
    pub features: Vec<String>,
    pub condition: Option<String>,
    pub owner: Option<String>,
    pub contact: Option<String>,
    pub status: String,
    /// status가 sold로 전환될 때만 설정되고, sold에서 벗어나면 해제된다.
    pub sold_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// 문의 수 기준 인기 매물 모델 (popular_bikes 뷰)
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PopularBike {
    pub id: i64,
    pub image: String,
    pub images: Vec<String>,
    pub price: String,
    pub model: String,
    pub brand: String,
    pub category: Vec<String>,
    pub reg_year: String,
    pub kms: String,
    pub reg_state: String,
    pub status: String,
    pub enquiry_count: i64,
    pub last_enquiry_at: Option<DateTime<Utc>>,
}

// 문의 모델
/// 문의 응답은 원래 관리자 화면 포맷 그대로 snake_case를 유지한다.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct Enquiry {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    /// 바이크가 삭제되면 끊어진 참조로 남을 수 있다.
    pub bike_id: Option<i64>,
    /// 생성 시점 스냅샷. 바이크가 수정/삭제되어도 다시 계산하지 않는다.
    pub bike_model: Option<String>,
    pub bike_brand: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

// 관리자 계정 모델
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct AdminUser {
    pub id: i64,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
}

// 문의 폼 드롭다운용 매물 요약
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct AvailableBike {
    pub id: i64,
    pub brand: String,
    pub model: String,
    pub price: String,
    pub status: String,
}

/// 매물 상태 값
pub const STATUS_AVAILABLE: &str = "available";
pub const STATUS_SOLD: &str = "sold";
pub const STATUS_RESERVED: &str = "reserved";
pub const STATUS_PENDING: &str = "pending";

/// 유효한 매물 상태인지 확인
pub fn is_valid_bike_status(status: &str) -> bool {
    matches!(
        status,
        STATUS_AVAILABLE | STATUS_SOLD | STATUS_RESERVED | STATUS_PENDING
    )
}

impl AvailableBike {
    /// 드롭다운 표기 문자열 생성
    pub fn display_name(&self) -> String {
        format!("{} {} - {}", self.brand, self.model, self.price)
    }
}
