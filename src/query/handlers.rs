// region:    --- Imports
use super::queries;
use crate::database::DatabaseManager;
use crate::inventory::model::{AdminUser, AvailableBike, Bike, Enquiry, PopularBike};
use sqlx::Error as SqlxError;
use tracing::info;

// endregion: --- Imports

// region:    --- Bike Queries

/// 매물 목록 조회. 상태와 건수 제한은 SQL에서 처리한다.
pub async fn get_bikes(
    db_manager: &DatabaseManager,
    status: Option<&str>,
    limit: Option<i64>,
) -> Result<Vec<Bike>, SqlxError> {
    info!(
        "{:<12} --> 매물 목록 조회 status: {:?}, limit: {:?}",
        "Query", status, limit
    );
    let status = status.map(|s| s.to_string());
    db_manager
        .transaction(|tx| {
            Box::pin(async move {
                match (status, limit) {
                    (Some(status), Some(limit)) => {
                        sqlx::query_as::<_, Bike>(queries::GET_BIKES_BY_STATUS_LIMIT)
                            .bind(status)
                            .bind(limit)
                            .fetch_all(&mut **tx)
                            .await
                    }
                    (Some(status), None) => {
                        sqlx::query_as::<_, Bike>(queries::GET_BIKES_BY_STATUS)
                            .bind(status)
                            .fetch_all(&mut **tx)
                            .await
                    }
                    (None, Some(limit)) => {
                        sqlx::query_as::<_, Bike>(queries::GET_ALL_BIKES_LIMIT)
                            .bind(limit)
                            .fetch_all(&mut **tx)
                            .await
                    }
                    (None, None) => {
                        sqlx::query_as::<_, Bike>(queries::GET_ALL_BIKES)
                            .fetch_all(&mut **tx)
                            .await
                    }
                }
            })
        })
        .await
}

/// 매물 단건 조회
pub async fn get_bike(db_manager: &DatabaseManager, bike_id: i64) -> Result<Option<Bike>, SqlxError> {
    info!("{:<12} --> 매물 조회 id: {}", "Query", bike_id);
    db_manager
        .transaction(|tx| {
            Box::pin(async move {
                sqlx::query_as::<_, Bike>(queries::GET_BIKE)
                    .bind(bike_id)
                    .fetch_optional(&mut **tx)
                    .await
            })
        })
        .await
}

/// 판매 중 매물 요약 조회
pub async fn get_available_bikes(
    db_manager: &DatabaseManager,
) -> Result<Vec<AvailableBike>, SqlxError> {
    info!("{:<12} --> 판매 중 매물 조회", "Query");
    db_manager
        .transaction(|tx| {
            Box::pin(async move {
                sqlx::query_as::<_, AvailableBike>(queries::GET_AVAILABLE_BIKES)
                    .fetch_all(&mut **tx)
                    .await
            })
        })
        .await
}

/// 인기 매물 조회
pub async fn get_popular_bikes(
    db_manager: &DatabaseManager,
    limit: i64,
) -> Result<Vec<PopularBike>, SqlxError> {
    info!("{:<12} --> 인기 매물 조회 limit: {}", "Query", limit);
    db_manager
        .transaction(|tx| {
            Box::pin(async move {
                sqlx::query_as::<_, PopularBike>(queries::GET_POPULAR_BIKES)
                    .bind(limit)
                    .fetch_all(&mut **tx)
                    .await
            })
        })
        .await
}

/// 상태별 가격 문자열 목록 조회 (대시보드 합계 계산용)
pub async fn get_prices_by_status(
    db_manager: &DatabaseManager,
    status: &str,
) -> Result<Vec<String>, SqlxError> {
    info!("{:<12} --> 상태별 가격 조회 status: {}", "Query", status);
    let status = status.to_string();
    db_manager
        .transaction(|tx| {
            Box::pin(async move {
                sqlx::query_scalar::<_, String>(queries::GET_PRICES_BY_STATUS)
                    .bind(status)
                    .fetch_all(&mut **tx)
                    .await
            })
        })
        .await
}

/// 매물에 연결된 이미지 URL 전체 조회 (삭제 정리용)
pub async fn get_bike_image_urls(
    db_manager: &DatabaseManager,
    bike_id: i64,
) -> Result<Option<Vec<String>>, SqlxError> {
    info!("{:<12} --> 매물 이미지 조회 id: {}", "Query", bike_id);
    db_manager
        .transaction(|tx| {
            Box::pin(async move {
                let row = sqlx::query_as::<_, (String, Vec<String>)>(queries::GET_BIKE_IMAGES)
                    .bind(bike_id)
                    .fetch_optional(&mut **tx)
                    .await?;

                Ok(row.map(|(image, images)| {
                    let mut urls = Vec::with_capacity(images.len() + 1);
                    if !image.is_empty() {
                        urls.push(image);
                    }
                    for url in images {
                        if !urls.contains(&url) {
                            urls.push(url);
                        }
                    }
                    urls
                }))
            })
        })
        .await
}

/// 매물 브랜드/모델 조회 (문의 스냅샷용)
pub async fn get_bike_name(
    db_manager: &DatabaseManager,
    bike_id: i64,
) -> Result<Option<(String, String)>, SqlxError> {
    info!("{:<12} --> 매물 이름 조회 id: {}", "Query", bike_id);
    db_manager
        .transaction(|tx| {
            Box::pin(async move {
                sqlx::query_as::<_, (String, String)>(queries::GET_BIKE_NAME)
                    .bind(bike_id)
                    .fetch_optional(&mut **tx)
                    .await
            })
        })
        .await
}

// endregion: --- Bike Queries

// region:    --- Enquiry Queries

/// 전체 문의 조회
pub async fn get_enquiries(db_manager: &DatabaseManager) -> Result<Vec<Enquiry>, SqlxError> {
    info!("{:<12} --> 문의 목록 조회", "Query");
    db_manager
        .transaction(|tx| {
            Box::pin(async move {
                sqlx::query_as::<_, Enquiry>(queries::GET_ENQUIRIES)
                    .fetch_all(&mut **tx)
                    .await
            })
        })
        .await
}

// endregion: --- Enquiry Queries

// region:    --- Admin Queries

/// 이메일로 관리자 조회 (로그인용)
pub async fn get_admin_by_email(
    db_manager: &DatabaseManager,
    email: &str,
) -> Result<Option<AdminUser>, SqlxError> {
    info!("{:<12} --> 관리자 조회 email: {}", "Query", email);
    let email = email.to_string();
    db_manager
        .transaction(|tx| {
            Box::pin(async move {
                sqlx::query_as::<_, AdminUser>(queries::GET_ADMIN_BY_EMAIL)
                    .bind(email)
                    .fetch_optional(&mut **tx)
                    .await
            })
        })
        .await
}

/// id와 이메일이 모두 일치하는 관리자 조회 (세션 토큰 재확인용)
pub async fn get_admin_by_identity(
    db_manager: &DatabaseManager,
    user_id: i64,
    email: &str,
) -> Result<Option<AdminUser>, SqlxError> {
    info!("{:<12} --> 관리자 세션 확인 id: {}", "Query", user_id);
    let email = email.to_string();
    db_manager
        .transaction(|tx| {
            Box::pin(async move {
                sqlx::query_as::<_, AdminUser>(queries::GET_ADMIN_BY_IDENTITY)
                    .bind(user_id)
                    .bind(email)
                    .fetch_optional(&mut **tx)
                    .await
            })
        })
        .await
}

// endregion: --- Admin Queries
