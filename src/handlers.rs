// region:    --- Imports
use crate::auth::{self, AuthConfig};
use crate::database::DatabaseManager;
use crate::filter::{BikeFilter, SortKey};
use crate::ingest;
use crate::inventory::commands::{
    self, CreateBikeCommand, CreateEnquiryCommand, UpdateBikeCommand,
};
use crate::inventory::model::is_valid_bike_status;
use crate::query;
use crate::storage::{self, DynStorage};
use axum::extract::{Multipart, Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, info};

// endregion: --- Imports

// region:    --- App State

/// 핸들러 공유 상태
pub type AppState = (Arc<DatabaseManager>, DynStorage, Arc<AuthConfig>);

// endregion: --- App State

// region:    --- Params

/// 매물 목록 조회 파라미터
/// status/limit은 SQL에서, 나머지는 인메모리 필터/정렬 엔진에서 처리한다.
#[derive(Debug, Deserialize, Default)]
pub struct BikeListParams {
    pub status: Option<String>,
    pub category: Option<String>,
    pub limit: Option<i64>,
    pub search: Option<String>,
    pub brand: Option<String>,
    pub state: Option<String>,
    pub price_min: Option<String>,
    pub price_max: Option<String>,
    pub year_min: Option<String>,
    pub year_max: Option<String>,
    pub sort: Option<String>,
}

/// 인기 매물 조회 파라미터
#[derive(Debug, Deserialize)]
pub struct PopularParams {
    pub limit: Option<i64>,
}

/// 문의 상태 변경 요청
#[derive(Debug, Deserialize)]
pub struct EnquiryStatusCommand {
    pub status: String,
}

/// 로그인 요청
#[derive(Debug, Deserialize)]
pub struct LoginCommand {
    pub email: String,
    pub password: String,
}

/// 업로드 이미지 삭제 요청
#[derive(Debug, Deserialize)]
pub struct DeleteImageCommand {
    pub url: String,
}

// endregion: --- Params

// region:    --- Bike Handlers

/// 매물 목록 조회
pub async fn handle_get_bikes(
    State((db_manager, _, _)): State<AppState>,
    Query(params): Query<BikeListParams>,
) -> impl IntoResponse {
    info!("{:<12} --> 매물 목록 조회: {:?}", "HandlerQuery", params);

    let filter = BikeFilter {
        search: params.search,
        category: params.category,
        brand: params.brand,
        reg_state: params.state,
        price_min: params.price_min,
        price_max: params.price_max,
        year_min: params.year_min,
        year_max: params.year_max,
        sort: params
            .sort
            .as_deref()
            .map(SortKey::from_param)
            .unwrap_or_default(),
    };

    // 인메모리 필터가 있으면 SQL LIMIT을 적용하지 않고 필터링 후에 자른다.
    // 필터로 걸러진 만큼 결과가 모자라는 일이 없게 한다.
    let sql_limit = if filter.has_filters() {
        None
    } else {
        params.limit
    };

    let bikes =
        match query::handlers::get_bikes(&db_manager, params.status.as_deref(), sql_limit).await {
            Ok(bikes) => bikes,
            Err(e) => {
                error!("{:<12} --> 매물 목록 조회 실패: {:?}", "HandlerQuery", e);
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(serde_json::json!({"error": "매물 목록을 가져오지 못했습니다."})),
                )
                    .into_response();
            }
        };

    let mut bikes = filter.apply(&bikes);
    if let Some(Ok(limit)) = params.limit.map(usize::try_from) {
        bikes.truncate(limit);
    }

    Json(serde_json::json!({ "bikes": bikes })).into_response()
}

/// 매물 단건 조회
pub async fn handle_get_bike(
    State((db_manager, _, _)): State<AppState>,
    Path(bike_id): Path<i64>,
) -> impl IntoResponse {
    info!("{:<12} --> 매물 조회 id: {}", "HandlerQuery", bike_id);
    match query::handlers::get_bike(&db_manager, bike_id).await {
        Ok(Some(bike)) => Json(serde_json::json!({ "bike": bike })).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({"error": "매물을 찾을 수 없습니다."})),
        )
            .into_response(),
        Err(e) => {
            error!("{:<12} --> 매물 조회 실패: {:?}", "HandlerQuery", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"error": "매물을 가져오지 못했습니다."})),
            )
                .into_response()
        }
    }
}

/// 판매 중 매물 요약 조회 (문의 폼 드롭다운용)
pub async fn handle_get_available_bikes(
    State((db_manager, _, _)): State<AppState>,
) -> impl IntoResponse {
    info!("{:<12} --> 판매 중 매물 조회", "HandlerQuery");
    match query::handlers::get_available_bikes(&db_manager).await {
        Ok(bikes) => {
            let bikes: Vec<serde_json::Value> = bikes
                .into_iter()
                .map(|bike| {
                    let display_name = bike.display_name();
                    serde_json::json!({
                        "id": bike.id,
                        "brand": bike.brand,
                        "model": bike.model,
                        "price": bike.price,
                        "displayName": display_name,
                    })
                })
                .collect();
            Json(serde_json::json!({ "bikes": bikes })).into_response()
        }
        Err(e) => {
            error!("{:<12} --> 판매 중 매물 조회 실패: {:?}", "HandlerQuery", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"error": "매물 목록을 가져오지 못했습니다."})),
            )
                .into_response()
        }
    }
}

/// 인기 매물 조회 (문의 수 기준)
pub async fn handle_get_popular_bikes(
    State((db_manager, _, _)): State<AppState>,
    Query(params): Query<PopularParams>,
) -> impl IntoResponse {
    let limit = params.limit.unwrap_or(10);
    info!("{:<12} --> 인기 매물 조회 limit: {}", "HandlerQuery", limit);
    match query::handlers::get_popular_bikes(&db_manager, limit).await {
        Ok(bikes) => Json(serde_json::json!({ "bikes": bikes })).into_response(),
        Err(e) => {
            error!("{:<12} --> 인기 매물 조회 실패: {:?}", "HandlerQuery", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"error": "인기 매물을 가져오지 못했습니다."})),
            )
                .into_response()
        }
    }
}

/// 매물 등록
pub async fn handle_create_bike(
    State((db_manager, _, _)): State<AppState>,
    Json(cmd): Json<CreateBikeCommand>,
) -> impl IntoResponse {
    info!(
        "{:<12} --> 매물 등록 요청: {} {}",
        "Command", cmd.brand, cmd.model
    );

    // 필수 항목 검증 (변경 전에 검사하고 즉시 반환)
    let required = [
        &cmd.image,
        &cmd.price,
        &cmd.model,
        &cmd.brand,
        &cmd.reg_year,
        &cmd.kms,
        &cmd.reg_state,
    ];
    if required.iter().any(|field| field.trim().is_empty()) {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": "필수 항목이 누락되었습니다."})),
        )
            .into_response();
    }
    if let Some(status) = cmd.status.as_deref() {
        if !is_valid_bike_status(status) {
            return (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({"error": "잘못된 매물 상태입니다."})),
            )
                .into_response();
        }
    }

    match commands::create_bike(&db_manager, cmd).await {
        Ok((id, created_at)) => (
            StatusCode::CREATED,
            Json(serde_json::json!({
                "success": true,
                "bike": { "id": id, "createdAt": created_at },
            })),
        )
            .into_response(),
        Err(e) => {
            error!("{:<12} --> 매물 등록 실패: {:?}", "Command", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"error": "매물을 저장하지 못했습니다."})),
            )
                .into_response()
        }
    }
}

/// 매물 수정
pub async fn handle_update_bike(
    State((db_manager, _, _)): State<AppState>,
    Path(bike_id): Path<i64>,
    Json(cmd): Json<UpdateBikeCommand>,
) -> impl IntoResponse {
    info!("{:<12} --> 매물 수정 요청 id: {}", "Command", bike_id);

    if let Some(status) = cmd.status.as_deref() {
        if !is_valid_bike_status(status) {
            return (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({"error": "잘못된 매물 상태입니다."})),
            )
                .into_response();
        }
    }

    match commands::update_bike(&db_manager, bike_id, cmd).await {
        Ok(Some(id)) => Json(serde_json::json!({
            "success": true,
            "bike": { "id": id },
        }))
        .into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({"error": "매물을 찾을 수 없습니다."})),
        )
            .into_response(),
        Err(e) => {
            error!("{:<12} --> 매물 수정 실패: {:?}", "Command", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"error": "매물을 수정하지 못했습니다."})),
            )
                .into_response()
        }
    }
}

/// 매물 삭제 (스토리지 이미지 정리 포함)
pub async fn handle_delete_bike(
    State((db_manager, storage, _)): State<AppState>,
    Path(bike_id): Path<i64>,
) -> impl IntoResponse {
    info!("{:<12} --> 매물 삭제 요청 id: {}", "Command", bike_id);
    match commands::delete_bike(&db_manager, &storage, bike_id).await {
        Ok(true) => Json(serde_json::json!({
            "success": true,
            "message": "매물과 이미지가 삭제되었습니다.",
        }))
        .into_response(),
        Ok(false) => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({"error": "매물을 찾을 수 없습니다."})),
        )
            .into_response(),
        Err(e) => {
            error!("{:<12} --> 매물 삭제 실패: {:?}", "Command", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"error": "매물을 삭제하지 못했습니다."})),
            )
                .into_response()
        }
    }
}

// endregion: --- Bike Handlers

// region:    --- Enquiry Handlers

/// 문의 목록 조회
pub async fn handle_get_enquiries(
    State((db_manager, _, _)): State<AppState>,
) -> impl IntoResponse {
    info!("{:<12} --> 문의 목록 조회", "HandlerQuery");
    match query::handlers::get_enquiries(&db_manager).await {
        Ok(enquiries) => Json(serde_json::json!({ "enquiries": enquiries })).into_response(),
        Err(e) => {
            error!("{:<12} --> 문의 목록 조회 실패: {:?}", "HandlerQuery", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"error": "문의 목록을 가져오지 못했습니다."})),
            )
                .into_response()
        }
    }
}

/// 문의 접수
pub async fn handle_create_enquiry(
    State((db_manager, _, _)): State<AppState>,
    Json(cmd): Json<CreateEnquiryCommand>,
) -> impl IntoResponse {
    info!("{:<12} --> 문의 접수 요청: {}", "Command", cmd.name);

    if cmd.name.trim().is_empty() || cmd.email.trim().is_empty() || cmd.phone.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": "이름, 이메일, 전화번호는 필수입니다."})),
        )
            .into_response();
    }

    match commands::create_enquiry(&db_manager, cmd).await {
        Ok((id, created_at)) => (
            StatusCode::CREATED,
            Json(serde_json::json!({
                "success": true,
                "enquiry": { "id": id, "createdAt": created_at },
            })),
        )
            .into_response(),
        Err(e) => {
            error!("{:<12} --> 문의 접수 실패: {:?}", "Command", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"error": "문의를 저장하지 못했습니다."})),
            )
                .into_response()
        }
    }
}

/// 문의 상태 변경
pub async fn handle_update_enquiry(
    State((db_manager, _, _)): State<AppState>,
    Path(enquiry_id): Path<i64>,
    Json(cmd): Json<EnquiryStatusCommand>,
) -> impl IntoResponse {
    info!(
        "{:<12} --> 문의 상태 변경 요청 id: {}, status: {}",
        "Command", enquiry_id, cmd.status
    );

    if cmd.status != "resolved" && cmd.status != "pending" {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": "상태는 resolved 또는 pending이어야 합니다."})),
        )
            .into_response();
    }

    match commands::set_enquiry_status(&db_manager, enquiry_id, &cmd.status).await {
        Ok(Some(enquiry)) => Json(serde_json::json!({
            "success": true,
            "enquiry": enquiry,
        }))
        .into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({"error": "문의를 찾을 수 없습니다."})),
        )
            .into_response(),
        Err(e) => {
            error!("{:<12} --> 문의 상태 변경 실패: {:?}", "Command", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"error": "문의 상태를 변경하지 못했습니다."})),
            )
                .into_response()
        }
    }
}

/// 문의 삭제
pub async fn handle_delete_enquiry(
    State((db_manager, _, _)): State<AppState>,
    Path(enquiry_id): Path<i64>,
) -> impl IntoResponse {
    info!("{:<12} --> 문의 삭제 요청 id: {}", "Command", enquiry_id);
    match commands::delete_enquiry(&db_manager, enquiry_id).await {
        Ok(true) => Json(serde_json::json!({"success": true})).into_response(),
        Ok(false) => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({"error": "문의를 찾을 수 없습니다."})),
        )
            .into_response(),
        Err(e) => {
            error!("{:<12} --> 문의 삭제 실패: {:?}", "Command", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"error": "문의를 삭제하지 못했습니다."})),
            )
                .into_response()
        }
    }
}

// endregion: --- Enquiry Handlers

// region:    --- Auth Handlers

/// 관리자 로그인
pub async fn handle_login(
    State((db_manager, _, auth_config)): State<AppState>,
    Json(cmd): Json<LoginCommand>,
) -> impl IntoResponse {
    let email = cmd.email.trim().to_lowercase();
    info!("{:<12} --> 로그인 요청: {}", "Auth", email);

    if email.is_empty() || cmd.password.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": "이메일과 비밀번호는 필수입니다."})),
        )
            .into_response();
    }

    let admin = match query::handlers::get_admin_by_email(&db_manager, &email).await {
        Ok(admin) => admin,
        Err(e) => {
            error!("{:<12} --> 관리자 조회 실패: {:?}", "Auth", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"error": "로그인을 처리하지 못했습니다."})),
            )
                .into_response();
        }
    };

    // 계정 존재 여부가 드러나지 않도록 동일한 메시지로 응답한다.
    let admin = match admin {
        Some(admin) if auth::verify_password(&admin.password_hash, &cmd.password) => admin,
        _ => {
            return (
                StatusCode::UNAUTHORIZED,
                Json(serde_json::json!({"error": "이메일 또는 비밀번호가 올바르지 않습니다."})),
            )
                .into_response()
        }
    };

    match auth::issue_token(&auth_config, admin.id, &admin.email) {
        Ok(token) => {
            info!("{:<12} --> 로그인 성공: {}", "Auth", admin.email);
            (
                StatusCode::OK,
                [(
                    header::SET_COOKIE,
                    auth::session_cookie(&token, auth_config.ttl_hours),
                )],
                Json(serde_json::json!({
                    "success": true,
                    "user": { "id": admin.id, "email": admin.email, "name": admin.name },
                })),
            )
                .into_response()
        }
        Err(e) => {
            error!("{:<12} --> 토큰 발급 실패: {}", "Auth", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"error": "로그인을 처리하지 못했습니다."})),
            )
                .into_response()
        }
    }
}

/// 세션 확인
/// 토큰 검증 후 관리자 행이 id와 email 모두 일치해야 인증된 것으로 본다.
pub async fn handle_verify(
    State((db_manager, _, auth_config)): State<AppState>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let unauthenticated = || {
        (
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({"authenticated": false})),
        )
            .into_response()
    };

    let token = match auth::extract_token(&headers) {
        Some(token) => token,
        None => return unauthenticated(),
    };

    match auth::resolve_session(&auth_config, &token, db_manager.as_ref()).await {
        Some(admin) => Json(serde_json::json!({
            "authenticated": true,
            "user": { "id": admin.id, "email": admin.email, "name": admin.name },
        }))
        .into_response(),
        None => unauthenticated(),
    }
}

/// 로그아웃 (쿠키 제거)
pub async fn handle_logout() -> impl IntoResponse {
    info!("{:<12} --> 로그아웃", "Auth");
    (
        StatusCode::OK,
        [(header::SET_COOKIE, auth::clear_session_cookie())],
        Json(serde_json::json!({"success": true})),
    )
}

// endregion: --- Auth Handlers

// region:    --- Upload Handlers

/// 이미지 업로드: 재압축 후 스토리지에 저장하고 공개 URL을 반환한다.
pub async fn handle_upload(
    State((_, storage, _)): State<AppState>,
    mut multipart: Multipart,
) -> Response {
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                error!("{:<12} --> 멀티파트 파싱 실패: {}", "Upload", e);
                return (
                    StatusCode::BAD_REQUEST,
                    Json(serde_json::json!({"error": "잘못된 업로드 요청입니다."})),
                )
                    .into_response();
            }
        };

        if field.name() != Some("file") {
            continue;
        }

        let file_name = field.file_name().unwrap_or("upload.jpg").to_string();
        let content_type = field.content_type().unwrap_or("").to_string();
        if !content_type.starts_with("image/") {
            return (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({"error": "이미지 파일만 업로드할 수 있습니다."})),
            )
                .into_response();
        }

        let bytes = match field.bytes().await {
            Ok(bytes) => bytes,
            Err(e) => {
                error!("{:<12} --> 파일 수신 실패: {}", "Upload", e);
                return (
                    StatusCode::BAD_REQUEST,
                    Json(serde_json::json!({"error": "파일을 읽지 못했습니다."})),
                )
                    .into_response();
            }
        };

        let compressed = ingest::compress_image(&bytes, &content_type);
        let key = storage::object_key(&file_name);

        return match storage.put(&key, &content_type, compressed).await {
            Ok(url) => Json(serde_json::json!({
                "success": true,
                "url": url,
                "fileName": key,
            }))
            .into_response(),
            Err(e) => {
                error!("{:<12} --> 업로드 실패: {}", "Upload", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(serde_json::json!({"error": "이미지를 업로드하지 못했습니다."})),
                )
                    .into_response()
            }
        };
    }

    (
        StatusCode::BAD_REQUEST,
        Json(serde_json::json!({"error": "파일이 없습니다."})),
    )
        .into_response()
}

/// 업로드된 이미지 삭제
pub async fn handle_delete_upload(
    State((_, storage, _)): State<AppState>,
    Json(cmd): Json<DeleteImageCommand>,
) -> impl IntoResponse {
    info!("{:<12} --> 이미지 삭제 요청: {}", "Upload", cmd.url);

    if cmd.url.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": "이미지 URL은 필수입니다."})),
        )
            .into_response();
    }

    match storage.delete(&cmd.url).await {
        Ok(()) => Json(serde_json::json!({
            "success": true,
            "message": "이미지가 삭제되었습니다.",
        }))
        .into_response(),
        Err(e) => {
            error!("{:<12} --> 이미지 삭제 실패: {}", "Upload", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"error": "이미지를 삭제하지 못했습니다."})),
            )
                .into_response()
        }
    }
}

// endregion: --- Upload Handlers

// region:    --- Dashboard Handlers

/// 관리자 대시보드 통계
/// 가격 문자열을 정수로 환산해 판매 중/판매 완료 합계와 건수, 인기 매물을 구한다.
pub async fn handle_admin_stats(
    State((db_manager, _, _)): State<AppState>,
) -> impl IntoResponse {
    info!("{:<12} --> 대시보드 통계 조회", "HandlerQuery");

    let available = query::handlers::get_prices_by_status(&db_manager, "available").await;
    let sold = query::handlers::get_prices_by_status(&db_manager, "sold").await;
    let popular = query::handlers::get_popular_bikes(&db_manager, 5).await;

    match (available, sold, popular) {
        (Ok(available), Ok(sold), Ok(popular)) => {
            let total_for_sale: i64 = available.iter().map(|p| crate::filter::parse_price(p)).sum();
            let total_sold: i64 = sold.iter().map(|p| crate::filter::parse_price(p)).sum();

            Json(serde_json::json!({
                "stats": {
                    "totalForSale": total_for_sale,
                    "totalSold": total_sold,
                    "availableCount": available.len(),
                    "soldCount": sold.len(),
                },
                "popularBikes": popular,
            }))
            .into_response()
        }
        (available, sold, popular) => {
            error!(
                "{:<12} --> 통계 조회 실패: {:?} {:?} {:?}",
                "HandlerQuery",
                available.err(),
                sold.err(),
                popular.err()
            );
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"error": "통계를 가져오지 못했습니다."})),
            )
                .into_response()
        }
    }
}

/// 헬스 체크 (데이터베이스 연결 워밍업 겸용)
pub async fn handle_health(State((db_manager, _, _)): State<AppState>) -> impl IntoResponse {
    match db_manager.ping().await {
        Ok(()) => Json(serde_json::json!({
            "status": "ok",
            "timestamp": chrono::Utc::now(),
        }))
        .into_response(),
        Err(e) => {
            error!("{:<12} --> 헬스 체크 실패: {:?}", "Health", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"status": "error", "error": "데이터베이스에 연결하지 못했습니다."})),
            )
                .into_response()
        }
    }
}

// endregion: --- Dashboard Handlers
