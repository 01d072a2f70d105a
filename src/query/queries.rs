/// 전체 매물 조회 (최신 등록 순)
pub const GET_ALL_BIKES: &str =
    "SELECT id, image, images, price, model, brand, category, reg_year, kms, reg_state, color, fuel_type, engine, description, features, condition, owner, contact, status, sold_at, created_at, updated_at FROM bikes ORDER BY created_at DESC";

/// 전체 매물 조회 (건수 제한)
pub const GET_ALL_BIKES_LIMIT: &str =
    "SELECT id, image, images, price, model, brand, category, reg_year, kms, reg_state, color, fuel_type, engine, description, features, condition, owner, contact, status, sold_at, created_at, updated_at FROM bikes ORDER BY created_at DESC LIMIT $1";

/// 상태별 매물 조회
pub const GET_BIKES_BY_STATUS: &str =
    "SELECT id, image, images, price, model, brand, category, reg_year, kms, reg_state, color, fuel_type, engine, description, features, condition, owner, contact, status, sold_at, created_at, updated_at FROM bikes WHERE status = $1 ORDER BY created_at DESC";

/// 상태별 매물 조회 (건수 제한)
pub const GET_BIKES_BY_STATUS_LIMIT: &str =
    "SELECT id, image, images, price, model, brand, category, reg_year, kms, reg_state, color, fuel_type, engine, description, features, condition, owner, contact, status, sold_at, created_at, updated_at FROM bikes WHERE status = $1 ORDER BY created_at DESC LIMIT $2";

/// 매물 단건 조회
pub const GET_BIKE: &str =
    "SELECT id, image, images, price, model, brand, category, reg_year, kms, reg_state, color, fuel_type, engine, description, features, condition, owner, contact, status, sold_at, created_at, updated_at FROM bikes WHERE id = $1";

/// 판매 중 매물 요약 조회 (문의 폼 드롭다운용)
pub const GET_AVAILABLE_BIKES: &str = r#"
    SELECT id, brand, model, price, status
    FROM bikes
    WHERE status = 'available'
    ORDER BY created_at DESC
"#;

/// 인기 매물 조회 (문의 수 내림차순)
pub const GET_POPULAR_BIKES: &str = r#"
    SELECT id, image, images, price, model, brand, category, reg_year, kms, reg_state, status,
           enquiry_count, last_enquiry_at
    FROM popular_bikes
    ORDER BY enquiry_count DESC, last_enquiry_at DESC NULLS LAST
    LIMIT $1
"#;

/// 상태별 가격 목록 조회 (대시보드 합계용)
pub const GET_PRICES_BY_STATUS: &str = "SELECT price FROM bikes WHERE status = $1";

/// 매물 이미지 URL 조회 (삭제 정리용)
pub const GET_BIKE_IMAGES: &str = "SELECT image, images FROM bikes WHERE id = $1";

/// 매물 브랜드/모델 조회 (문의 스냅샷용)
pub const GET_BIKE_NAME: &str = "SELECT brand, model FROM bikes WHERE id = $1";

/// 전체 문의 조회 (최신 순)
pub const GET_ENQUIRIES: &str = r#"
    SELECT id, name, email, phone, bike_id, bike_model, bike_brand, status, created_at
    FROM enquiries
    ORDER BY created_at DESC
"#;

/// 이메일로 관리자 조회
pub const GET_ADMIN_BY_EMAIL: &str =
    "SELECT id, email, password_hash, name, created_at FROM admin_users WHERE email = $1";

/// id와 이메일이 모두 일치하는 관리자 조회 (세션 토큰 재확인용)
pub const GET_ADMIN_BY_IDENTITY: &str =
    "SELECT id, email, password_hash, name, created_at FROM admin_users WHERE id = $1 AND email = $2";
