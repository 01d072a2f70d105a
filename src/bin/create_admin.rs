// region:    --- Imports
use dealership_service::auth;
use dealership_service::database::DatabaseManager;
use dealership_service::inventory::commands;
use tracing::{error, info};
// endregion: --- Imports

// region:    --- Main

/// 관리자 계정 생성 도구
/// 사용법: create_admin <email> <password> [name]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .without_time()
        .with_target(false)
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 3 {
        eprintln!("사용법: create_admin <email> <password> [name]");
        std::process::exit(1);
    }
    let email = &args[1];
    let password = &args[2];
    let name = args.get(3).map(|s| s.as_str());

    if password.len() < 8 {
        eprintln!("비밀번호는 8자 이상이어야 합니다.");
        std::process::exit(1);
    }

    let db_manager = DatabaseManager::new().await;
    if let Err(e) = db_manager.initialize_database().await {
        error!("{:<12} --> 데이터베이스 초기화 실패: {:?}", "CreateAdmin", e);
        return Err(e.into());
    }

    let password_hash = auth::hash_password(password)?;
    match commands::create_admin_user(&db_manager, email, &password_hash, name).await {
        Ok((id, created_at)) => {
            info!(
                "{:<12} --> 관리자 생성 완료 id: {}, email: {}, created_at: {}",
                "CreateAdmin",
                id,
                email.trim().to_lowercase(),
                created_at
            );
            Ok(())
        }
        Err(e) => {
            error!("{:<12} --> 관리자 생성 실패: {:?}", "CreateAdmin", e);
            Err(e.into())
        }
    }
}

// endregion: --- Main
