// region:    --- Imports
use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, patch, post, put},
    Router,
};
use dealership_service::auth::{self, AuthConfig};
use dealership_service::database::DatabaseManager;
use dealership_service::handlers::{self, AppState};
use dealership_service::storage::{DynStorage, HttpObjectStorage};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};
// endregion: --- Imports

// region:    --- Main
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // .env 로드 (없으면 무시)
    let _ = dotenvy::dotenv();

    // logging 초기화
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .without_time()
        .with_target(false)
        .init();

    // DatabaseManager 생성
    let db_manager = Arc::new(DatabaseManager::new().await);

    // 데이터베이스 초기화
    if let Err(e) = db_manager.initialize_database().await {
        error!("{:<12} --> 데이터베이스 초기화 실패: {:?}", "Main", e);
        return Err(e.into());
    }
    info!("{:<12} --> 데이터베이스 초기화 성공", "Main");

    // 스토리지 및 인증 설정
    let storage: DynStorage = Arc::new(HttpObjectStorage::from_env());
    let auth_config = Arc::new(AuthConfig::from_env());
    info!("{:<12} --> 스토리지/인증 설정 완료", "Main");

    let state: AppState = (db_manager, storage, auth_config);

    // 프론트엔드를 위한 cors 설정
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // 공개 라우터
    let routes_public = Router::new()
        .route("/bikes", get(handlers::handle_get_bikes))
        .route("/bikes/:id", get(handlers::handle_get_bike))
        .route("/bikes/available", get(handlers::handle_get_available_bikes))
        .route("/popular-bikes", get(handlers::handle_get_popular_bikes))
        .route("/enquiries", post(handlers::handle_create_enquiry))
        .route("/auth/login", post(handlers::handle_login))
        .route("/auth/verify", get(handlers::handle_verify))
        .route("/auth/logout", post(handlers::handle_logout))
        .route("/health", get(handlers::handle_health));

    // 관리자 라우터 (인증 미들웨어 적용)
    let routes_admin = Router::new()
        .route("/bikes", post(handlers::handle_create_bike))
        .route(
            "/bikes/:id",
            put(handlers::handle_update_bike).delete(handlers::handle_delete_bike),
        )
        .route("/enquiries", get(handlers::handle_get_enquiries))
        .route(
            "/enquiries/:id",
            patch(handlers::handle_update_enquiry).delete(handlers::handle_delete_enquiry),
        )
        .route("/upload", post(handlers::handle_upload))
        .route("/upload/delete", post(handlers::handle_delete_upload))
        .route("/admin/stats", get(handlers::handle_admin_stats))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_admin,
        ));

    // 라우터 설정
    let routes_all = Router::new()
        .merge(routes_public)
        .merge(routes_admin)
        .layer(cors)
        .layer(DefaultBodyLimit::max(1024 * 1024 * 20)) // 이미지 업로드를 위한 바디 사이즈 증가(20MB)
        .with_state(state);

    // 리스너 생성 (PORT 환경 변수, 기본 3000번 포트)
    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let listener = TcpListener::bind(format!("0.0.0.0:{}", port)).await?;
    info!(
        "{:<12} --> Web Server: Listening on {}",
        "Main",
        listener.local_addr()?
    );

    // 서버 실행
    if let Err(err) = axum::serve(listener, routes_all.into_make_service()).await {
        error!("{:<12} --> Server error: {}", "Main", err);
    }
    Ok(())
}
// endregion: --- Main
