/// 매물/문의 관련 커맨드 처리
/// 1. 매물 등록/수정/삭제
/// 2. 문의 접수/상태 변경/삭제
/// 3. 관리자 계정 등록 (프로비저닝 바이너리 전용)
// region:    --- Imports
use crate::database::DatabaseManager;
use crate::inventory::model::{Bike, STATUS_AVAILABLE, STATUS_SOLD};
use crate::query;
use crate::storage::DynStorage;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

// endregion: --- Imports

// region:    --- Commands

/// 매물 등록 명령
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CreateBikeCommand {
    pub image: String,
    #[serde(default)]
    pub images: Vec<String>,
    pub price: String,
    pub model: String,
    pub brand: String,
    #[serde(default)]
    pub category: Vec<String>,
    pub reg_year: String,
    pub kms: String,
    pub reg_state: String,
    pub color: Option<String>,
    pub fuel_type: Option<String>,
    pub engine: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub features: Vec<String>,
    pub condition: Option<String>,
    pub owner: Option<String>,
    pub contact: Option<String>,
    pub status: Option<String>,
}

/// 매물 수정 명령. 지정된 필드만 갱신한다.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBikeCommand {
    pub image: Option<String>,
    pub images: Option<Vec<String>>,
    pub price: Option<String>,
    pub model: Option<String>,
    pub brand: Option<String>,
    pub category: Option<Vec<String>>,
    pub reg_year: Option<String>,
    pub kms: Option<String>,
    pub reg_state: Option<String>,
    pub color: Option<String>,
    pub fuel_type: Option<String>,
    pub engine: Option<String>,
    pub description: Option<String>,
    pub features: Option<Vec<String>>,
    pub condition: Option<String>,
    pub owner: Option<String>,
    pub contact: Option<String>,
    pub status: Option<String>,
}

/// 문의 접수 명령
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CreateEnquiryCommand {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub bike_id: Option<i64>,
    pub bike_model: Option<String>,
    pub bike_brand: Option<String>,
}

// endregion: --- Commands

// region:    --- Bike Commands

/// 매물 등록
pub async fn create_bike(
    db_manager: &DatabaseManager,
    cmd: CreateBikeCommand,
) -> Result<(i64, DateTime<Utc>), sqlx::Error> {
    info!(
        "{:<12} --> 매물 등록: {} {}",
        "Command", cmd.brand, cmd.model
    );
    let status = cmd.status.unwrap_or_else(|| STATUS_AVAILABLE.to_string());
    db_manager
        .transaction(|tx| {
            Box::pin(async move {
                sqlx::query_as::<_, (i64, DateTime<Utc>)>(
                    r#"
                    INSERT INTO bikes (
                        image, images, price, model, brand, category, reg_year, kms, reg_state,
                        color, fuel_type, engine, description, features, condition,
                        owner, contact, status
                    )
                    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18)
                    RETURNING id, created_at
                    "#,
                )
                .bind(&cmd.image)
                .bind(&cmd.images)
                .bind(&cmd.price)
                .bind(&cmd.model)
                .bind(&cmd.brand)
                .bind(&cmd.category)
                .bind(&cmd.reg_year)
                .bind(&cmd.kms)
                .bind(&cmd.reg_state)
                .bind(&cmd.color)
                .bind(&cmd.fuel_type)
                .bind(&cmd.engine)
                .bind(&cmd.description)
                .bind(&cmd.features)
                .bind(&cmd.condition)
                .bind(&cmd.owner)
                .bind(&cmd.contact)
                .bind(&status)
                .fetch_one(&mut **tx)
                .await
            })
        })
        .await
}

/// 매물 상태 전환에 따른 sold_at 계산
/// sold로 처음 전환될 때만 현재 시각을 기록하고, sold가 유지되면 기존 값을,
/// sold에서 벗어나면 null을 반환한다.
pub fn sold_at_transition(
    new_status: &str,
    existing_sold_at: Option<DateTime<Utc>>,
) -> Option<DateTime<Utc>> {
    if new_status == STATUS_SOLD {
        existing_sold_at.or_else(|| Some(Utc::now()))
    } else {
        None
    }
}

/// 매물 수정. 기존 행을 읽어 지정된 필드만 덮어쓴다.
/// 매물이 없으면 Ok(None)을 반환한다.
pub async fn update_bike(
    db_manager: &DatabaseManager,
    bike_id: i64,
    cmd: UpdateBikeCommand,
) -> Result<Option<i64>, sqlx::Error> {
    info!("{:<12} --> 매물 수정 id: {}", "Command", bike_id);

    let existing = match query::handlers::get_bike(db_manager, bike_id).await? {
        Some(bike) => bike,
        None => return Ok(None),
    };

    let merged = merge_bike(existing, cmd);

    db_manager
        .transaction(|tx| {
            Box::pin(async move {
                let id = sqlx::query_scalar::<_, i64>(
                    r#"
                    UPDATE bikes SET
                        image = $1, images = $2, price = $3, model = $4, brand = $5,
                        category = $6, reg_year = $7, kms = $8, reg_state = $9,
                        color = $10, fuel_type = $11, engine = $12, description = $13,
                        features = $14, condition = $15, owner = $16, contact = $17,
                        status = $18, sold_at = $19, updated_at = now()
                    WHERE id = $20
                    RETURNING id
                    "#,
                )
                .bind(&merged.image)
                .bind(&merged.images)
                .bind(&merged.price)
                .bind(&merged.model)
                .bind(&merged.brand)
                .bind(&merged.category)
                .bind(&merged.reg_year)
                .bind(&merged.kms)
                .bind(&merged.reg_state)
                .bind(&merged.color)
                .bind(&merged.fuel_type)
                .bind(&merged.engine)
                .bind(&merged.description)
                .bind(&merged.features)
                .bind(&merged.condition)
                .bind(&merged.owner)
                .bind(&merged.contact)
                .bind(&merged.status)
                .bind(merged.sold_at)
                .bind(bike_id)
                .fetch_optional(&mut **tx)
                .await?;
                Ok(id)
            })
        })
        .await
}

/// 기존 매물에 수정 명령을 병합
fn merge_bike(existing: Bike, cmd: UpdateBikeCommand) -> Bike {
    let status = cmd.status.unwrap_or(existing.status);
    let sold_at = sold_at_transition(&status, existing.sold_at);
    let images = cmd.images.unwrap_or(existing.images);
    // 대표 이미지는 images[0]을 따라간다.
    let image = cmd
        .image
        .or_else(|| images.first().cloned())
        .unwrap_or(existing.image);

    Bike {
        id: existing.id,
        image,
        images,
        price: cmd.price.unwrap_or(existing.price),
        model: cmd.model.unwrap_or(existing.model),
        brand: cmd.brand.unwrap_or(existing.brand),
        category: cmd.category.unwrap_or(existing.category),
        reg_year: cmd.reg_year.unwrap_or(existing.reg_year),
        kms: cmd.kms.unwrap_or(existing.kms),
        reg_state: cmd.reg_state.unwrap_or(existing.reg_state),
        color: cmd.color.or(existing.color),
        fuel_type: cmd.fuel_type.or(existing.fuel_type),
        engine: cmd.engine.or(existing.engine),
        description: cmd.description.or(existing.description),
        features: cmd.features.unwrap_or(existing.features),
        condition: cmd.condition.or(existing.condition),
        owner: cmd.owner.or(existing.owner),
        contact: cmd.contact.or(existing.contact),
        status,
        sold_at,
        created_at: existing.created_at,
        updated_at: existing.updated_at,
    }
}

/// 매물 삭제. 연결된 이미지를 스토리지에서 먼저 정리한다.
/// 이미지 삭제 실패는 로그만 남기고 행 삭제는 계속 진행한다.
/// 매물이 없으면 Ok(false)를 반환한다.
pub async fn delete_bike(
    db_manager: &DatabaseManager,
    storage: &DynStorage,
    bike_id: i64,
) -> Result<bool, sqlx::Error> {
    info!("{:<12} --> 매물 삭제 id: {}", "Command", bike_id);

    let image_urls = match query::handlers::get_bike_image_urls(db_manager, bike_id).await? {
        Some(urls) => urls,
        None => return Ok(false),
    };

    for url in image_urls {
        if let Err(e) = storage.delete(&url).await {
            warn!(
                "{:<12} --> 이미지 정리 실패 (계속 진행): {} ({})",
                "Command", url, e
            );
        }
    }

    db_manager
        .transaction(|tx| {
            Box::pin(async move {
                sqlx::query("DELETE FROM bikes WHERE id = $1")
                    .bind(bike_id)
                    .execute(&mut **tx)
                    .await?;
                Ok(true)
            })
        })
        .await
}

// endregion: --- Bike Commands

// region:    --- Enquiry Commands

/// 문의 접수. bike_id만 온 경우 브랜드/모델 스냅샷을 매물에서 채운다.
/// 스냅샷은 접수 시점 값으로 고정되어 매물이 삭제되어도 남는다.
pub async fn create_enquiry(
    db_manager: &DatabaseManager,
    cmd: CreateEnquiryCommand,
) -> Result<(i64, DateTime<Utc>), sqlx::Error> {
    info!("{:<12} --> 문의 접수: {}", "Command", cmd.name);

    let (mut bike_model, mut bike_brand) = (cmd.bike_model.clone(), cmd.bike_brand.clone());
    if let (Some(bike_id), None) = (cmd.bike_id, bike_model.as_ref()) {
        if let Some((brand, model)) = query::handlers::get_bike_name(db_manager, bike_id).await? {
            bike_brand = Some(brand);
            bike_model = Some(model);
        }
    }

    db_manager
        .transaction(|tx| {
            Box::pin(async move {
                sqlx::query_as::<_, (i64, DateTime<Utc>)>(
                    r#"
                    INSERT INTO enquiries (name, email, phone, bike_id, bike_model, bike_brand)
                    VALUES ($1, $2, $3, $4, $5, $6)
                    RETURNING id, created_at
                    "#,
                )
                .bind(&cmd.name)
                .bind(&cmd.email)
                .bind(&cmd.phone)
                .bind(cmd.bike_id)
                .bind(&bike_model)
                .bind(&bike_brand)
                .fetch_one(&mut **tx)
                .await
            })
        })
        .await
}

/// 문의 상태 변경. 문의가 없으면 Ok(None)
pub async fn set_enquiry_status(
    db_manager: &DatabaseManager,
    enquiry_id: i64,
    status: &str,
) -> Result<Option<crate::inventory::model::Enquiry>, sqlx::Error> {
    info!(
        "{:<12} --> 문의 상태 변경 id: {}, status: {}",
        "Command", enquiry_id, status
    );
    let status = status.to_string();
    db_manager
        .transaction(|tx| {
            Box::pin(async move {
                sqlx::query_as::<_, crate::inventory::model::Enquiry>(
                    r#"
                    UPDATE enquiries SET status = $1 WHERE id = $2
                    RETURNING id, name, email, phone, bike_id, bike_model, bike_brand, status, created_at
                    "#,
                )
                .bind(status)
                .bind(enquiry_id)
                .fetch_optional(&mut **tx)
                .await
            })
        })
        .await
}

/// 문의 삭제. 문의가 없으면 Ok(false)
pub async fn delete_enquiry(
    db_manager: &DatabaseManager,
    enquiry_id: i64,
) -> Result<bool, sqlx::Error> {
    info!("{:<12} --> 문의 삭제 id: {}", "Command", enquiry_id);
    db_manager
        .transaction(|tx| {
            Box::pin(async move {
                let result = sqlx::query("DELETE FROM enquiries WHERE id = $1")
                    .bind(enquiry_id)
                    .execute(&mut **tx)
                    .await?;
                Ok(result.rows_affected() > 0)
            })
        })
        .await
}

// endregion: --- Enquiry Commands

// region:    --- Admin Commands

/// 관리자 계정 등록. 공개 API에는 노출되지 않고 create_admin 바이너리에서만 호출한다.
/// 이메일은 소문자로 정규화해 저장한다.
pub async fn create_admin_user(
    db_manager: &DatabaseManager,
    email: &str,
    password_hash: &str,
    name: Option<&str>,
) -> Result<(i64, DateTime<Utc>), sqlx::Error> {
    let email = email.trim().to_lowercase();
    info!("{:<12} --> 관리자 등록: {}", "Command", email);
    let password_hash = password_hash.to_string();
    let name = name.map(|n| n.to_string());
    db_manager
        .transaction(|tx| {
            Box::pin(async move {
                sqlx::query_as::<_, (i64, DateTime<Utc>)>(
                    r#"
                    INSERT INTO admin_users (email, password_hash, name)
                    VALUES ($1, $2, $3)
                    RETURNING id, created_at
                    "#,
                )
                .bind(email)
                .bind(password_hash)
                .bind(name)
                .fetch_one(&mut **tx)
                .await
            })
        })
        .await
}

// endregion: --- Admin Commands
