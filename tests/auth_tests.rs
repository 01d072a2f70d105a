// 세션 토큰/비밀번호 테스트
use async_trait::async_trait;
use axum::http::{header, HeaderMap, HeaderValue};
use chrono::Utc;
use dealership_service::auth::{
    self, clear_session_cookie, extract_token, hash_password, issue_token, resolve_session,
    session_cookie, verify_password, verify_token, AdminDirectory, AuthConfig,
};
use dealership_service::inventory::model::AdminUser;

fn config() -> AuthConfig {
    AuthConfig {
        secret: "test-secret-for-session-tokens".to_string(),
        ttl_hours: 72,
    }
}

#[test]
fn token_round_trip() {
    let config = config();
    let token = issue_token(&config, 7, "admin@example.com").unwrap();
    let claims = verify_token(&config, &token).unwrap();
    assert_eq!(claims.sub, "7");
    assert_eq!(claims.email, "admin@example.com");
}

#[test]
fn tampered_token_is_rejected() {
    let config = config();
    let token = issue_token(&config, 7, "admin@example.com").unwrap();

    let mut tampered = token.clone();
    tampered.pop();
    tampered.push('x');
    assert!(verify_token(&config, &tampered).is_none());

    assert!(verify_token(&config, "not-a-token").is_none());
    assert!(verify_token(&config, "").is_none());
}

#[test]
fn token_signed_with_other_secret_is_rejected() {
    let token = issue_token(&config(), 7, "admin@example.com").unwrap();
    let other = AuthConfig {
        secret: "different-secret".to_string(),
        ttl_hours: 72,
    };
    assert!(verify_token(&other, &token).is_none());
}

#[test]
fn expired_token_is_rejected() {
    // 음수 TTL로 과거에 만료된 토큰을 만든다.
    let config = AuthConfig {
        secret: "test-secret-for-session-tokens".to_string(),
        ttl_hours: -1,
    };
    let token = issue_token(&config, 7, "admin@example.com").unwrap();
    assert!(verify_token(&config, &token).is_none());
}

/// 저장된 관리자 목록만 기억하는 테스트용 디렉터리
struct MockDirectory {
    admins: Vec<(i64, String)>,
}

impl MockDirectory {
    fn with(admins: &[(i64, &str)]) -> Self {
        Self {
            admins: admins
                .iter()
                .map(|(id, email)| (*id, email.to_string()))
                .collect(),
        }
    }
}

#[async_trait]
impl AdminDirectory for MockDirectory {
    async fn find_admin(&self, user_id: i64, email: &str) -> Result<Option<AdminUser>, String> {
        Ok(self
            .admins
            .iter()
            .find(|(id, stored)| *id == user_id && stored.as_str() == email)
            .map(|(id, stored)| AdminUser {
                id: *id,
                email: stored.clone(),
                password_hash: "unused".to_string(),
                name: None,
                created_at: Utc::now(),
            }))
    }
}

#[tokio::test]
async fn resolve_session_accepts_matching_admin() {
    let config = config();
    let token = issue_token(&config, 7, "admin@example.com").unwrap();
    let directory = MockDirectory::with(&[(7, "admin@example.com")]);

    let admin = resolve_session(&config, &token, &directory).await.unwrap();
    assert_eq!(admin.id, 7);
    assert_eq!(admin.email, "admin@example.com");
}

#[tokio::test]
async fn resolve_session_rejects_renamed_admin() {
    let config = config();
    // 토큰은 구조적으로 유효하지만 관리자의 이메일이 바뀐 경우
    let token = issue_token(&config, 7, "old@example.com").unwrap();
    let directory = MockDirectory::with(&[(7, "new@example.com")]);

    assert!(resolve_session(&config, &token, &directory).await.is_none());
}

#[tokio::test]
async fn resolve_session_rejects_deleted_admin() {
    let config = config();
    let token = issue_token(&config, 7, "admin@example.com").unwrap();
    let directory = MockDirectory::with(&[]);

    assert!(resolve_session(&config, &token, &directory).await.is_none());
}

#[tokio::test]
async fn resolve_session_rejects_recreated_admin_with_new_id() {
    let config = config();
    // 같은 이메일로 재생성되어 id가 달라진 경우에도 이전 토큰은 무효
    let token = issue_token(&config, 7, "admin@example.com").unwrap();
    let directory = MockDirectory::with(&[(8, "admin@example.com")]);

    assert!(resolve_session(&config, &token, &directory).await.is_none());
}

#[test]
fn password_hash_round_trip() {
    let hash = hash_password("correct horse battery").unwrap();
    assert!(verify_password(&hash, "correct horse battery"));
    assert!(!verify_password(&hash, "wrong password"));
    assert!(!verify_password("garbage-hash", "correct horse battery"));
}

#[test]
fn hashes_use_random_salts() {
    let first = hash_password("same password").unwrap();
    let second = hash_password("same password").unwrap();
    assert_ne!(first, second);
}

#[test]
fn extract_token_prefers_cookie() {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::COOKIE,
        HeaderValue::from_static("theme=dark; admin_token=cookie-token; lang=ko"),
    );
    headers.insert(
        header::AUTHORIZATION,
        HeaderValue::from_static("Bearer header-token"),
    );
    assert_eq!(extract_token(&headers).as_deref(), Some("cookie-token"));
}

#[test]
fn extract_token_ignores_similarly_named_cookies() {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::COOKIE,
        HeaderValue::from_static("admin_token_old=stale; admin_token2=evil"),
    );
    assert!(extract_token(&headers).is_none());
}

#[test]
fn extract_token_falls_back_to_bearer() {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::AUTHORIZATION,
        HeaderValue::from_static("Bearer header-token"),
    );
    assert_eq!(extract_token(&headers).as_deref(), Some("header-token"));

    let empty = HeaderMap::new();
    assert!(extract_token(&empty).is_none());
}

#[test]
fn session_cookie_attributes() {
    let cookie = session_cookie("abc", 72);
    assert!(cookie.starts_with(&format!("{}=abc", auth::SESSION_COOKIE)));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("Max-Age=259200"));
    assert!(cookie.contains("SameSite=Lax"));

    let cleared = clear_session_cookie();
    assert!(cleared.contains("Max-Age=0"));
}
