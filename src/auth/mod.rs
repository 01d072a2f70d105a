/// 관리자 세션 토큰 인증
/// 1. 로그인 시 서명된 토큰 발급 (HttpOnly 쿠키)
/// 2. 보호된 요청마다 토큰 검증 + 관리자 행 존재 확인
// region:    --- Imports
use crate::database::DatabaseManager;
use crate::handlers::AppState;
use crate::inventory::model::AdminUser;
use crate::query;
use argon2::Config as ArgonConfig;
use async_trait::async_trait;
use axum::extract::{Request, State};
use axum::http::{header, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

// endregion: --- Imports

// region:    --- Config

/// 세션 쿠키 이름
pub const SESSION_COOKIE: &str = "admin_token";

/// 인증 설정
pub struct AuthConfig {
    pub secret: String,
    /// 토큰 유효 시간 (시간 단위, 브라우저 세션 정책에 맞춰 조정)
    pub ttl_hours: i64,
}

impl AuthConfig {
    /// 환경 변수에서 인증 설정을 읽어 생성
    pub fn from_env() -> Self {
        let secret = std::env::var("JWT_SECRET").expect("JWT_SECRET must be set");
        let ttl_hours = std::env::var("TOKEN_TTL_HOURS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(72);
        Self { secret, ttl_hours }
    }
}

// endregion: --- Config

// region:    --- Token

/// 세션 토큰에 담기는 클레임
/// sub(관리자 id)와 email이 모두 저장된 행과 일치해야 유효한 세션으로 본다.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub exp: usize,
}

/// 세션 토큰 발급
pub fn issue_token(config: &AuthConfig, user_id: i64, email: &str) -> Result<String, String> {
    let expiration = (Utc::now() + Duration::hours(config.ttl_hours)).timestamp() as usize;
    let claims = Claims {
        sub: user_id.to_string(),
        email: email.to_string(),
        exp: expiration,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_ref()),
    )
    .map_err(|e| e.to_string())
}

/// 세션 토큰 검증
/// 서명 불일치, 구조 손상, 만료는 모두 None으로 처리하고 에러를 밖으로 내보내지 않는다.
pub fn verify_token(config: &AuthConfig, token: &str) -> Option<Claims> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_ref()),
        &Validation::new(Algorithm::HS256),
    )
    .map(|data| data.claims)
    .ok()
}

// endregion: --- Token

// region:    --- Password

/// 비밀번호 해시 생성 (argon2, 랜덤 솔트)
pub fn hash_password(password: &str) -> Result<String, String> {
    let salt: [u8; 16] = rand::thread_rng().gen();
    argon2::hash_encoded(password.as_bytes(), &salt, &ArgonConfig::default())
        .map_err(|e| e.to_string())
}

/// 비밀번호 검증
pub fn verify_password(hash: &str, password: &str) -> bool {
    argon2::verify_encoded(hash, password.as_bytes()).unwrap_or(false)
}

// endregion: --- Password

// region:    --- Cookies

/// 로그인 성공 시 설정하는 세션 쿠키
pub fn session_cookie(token: &str, ttl_hours: i64) -> String {
    format!(
        "{}={}; HttpOnly; Path=/; Max-Age={}; SameSite=Lax",
        SESSION_COOKIE,
        token,
        ttl_hours * 3600
    )
}

/// 로그아웃 시 세션 쿠키 제거
/// 상태 없는 토큰 방식이라 쿠키 제거 외의 서버측 무효화는 없다.
pub fn clear_session_cookie() -> String {
    format!("{}=; HttpOnly; Path=/; Max-Age=0; SameSite=Lax", SESSION_COOKIE)
}

/// 요청 헤더에서 세션 토큰 추출 (쿠키 우선, Bearer 헤더 허용)
pub fn extract_token(headers: &axum::http::HeaderMap) -> Option<String> {
    if let Some(cookie_header) = headers.get(header::COOKIE).and_then(|v| v.to_str().ok()) {
        for cookie in cookie_header.split(';') {
            let value = cookie
                .trim()
                .strip_prefix(SESSION_COOKIE)
                .and_then(|rest| rest.strip_prefix('='));
            if let Some(value) = value {
                if !value.is_empty() {
                    return Some(value.to_string());
                }
            }
        }
    }

    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|v| v.to_string())
}

// endregion: --- Cookies

// region:    --- Admin Directory

/// 관리자 조회 트레이트
/// 세션 확인이 저장소 구현에 묶이지 않도록 storage::ObjectStorage와 같은 방식으로 분리한다.
#[async_trait]
pub trait AdminDirectory: Send + Sync {
    /// id와 이메일이 모두 일치하는 관리자 조회
    async fn find_admin(&self, user_id: i64, email: &str) -> Result<Option<AdminUser>, String>;
}

#[async_trait]
impl AdminDirectory for DatabaseManager {
    async fn find_admin(&self, user_id: i64, email: &str) -> Result<Option<AdminUser>, String> {
        query::handlers::get_admin_by_identity(self, user_id, email)
            .await
            .map_err(|e| e.to_string())
    }
}

/// 세션 토큰을 관리자 행으로 해석
/// 토큰이 구조적으로 유효해도 id와 이메일이 모두 일치하는 행이 남아 있어야 한다.
/// 관리자 삭제나 이메일 변경, 재생성으로 더 이상 유효하지 않은 토큰을 걸러낸다.
pub async fn resolve_session(
    config: &AuthConfig,
    token: &str,
    directory: &dyn AdminDirectory,
) -> Option<AdminUser> {
    let claims = verify_token(config, token)?;
    let user_id: i64 = claims.sub.parse().ok()?;

    match directory.find_admin(user_id, &claims.email).await {
        Ok(Some(admin)) => Some(admin),
        Ok(None) => {
            warn!(
                "{:<12} --> 토큰과 일치하는 관리자 없음: {}",
                "Auth", claims.email
            );
            None
        }
        Err(e) => {
            warn!("{:<12} --> 관리자 조회 실패: {}", "Auth", e);
            None
        }
    }
}

// endregion: --- Admin Directory

// region:    --- Middleware

/// 관리자 라우트 보호 미들웨어
/// 토큰 검증 후 저장된 관리자 행이 id와 email 모두 일치하는지 재확인한다.
/// 관리자 삭제나 재생성으로 토큰이 더 이상 유효하지 않은 경우를 걸러낸다.
pub async fn require_admin(
    State((db_manager, _, auth_config)): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, Response> {
    let unauthorized = || {
        (
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({"error": "인증이 필요합니다."})),
        )
            .into_response()
    };

    let token = match extract_token(request.headers()) {
        Some(token) => token,
        None => return Err(unauthorized()),
    };

    let admin = match resolve_session(&auth_config, &token, db_manager.as_ref()).await {
        Some(admin) => admin,
        None => {
            warn!("{:<12} --> 유효하지 않은 세션", "Auth");
            return Err(unauthorized());
        }
    };

    info!("{:<12} --> 관리자 인증 성공: {}", "Auth", admin.email);
    request.extensions_mut().insert(admin);
    Ok(next.run(request).await)
}

// endregion: --- Middleware
