use axum::{extract::State, Extension, Json};
use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::user::{self, UserRole};
use crate::error::{AppError, AppResult};
use crate::utils::gravatar::avatar_url;
use crate::utils::jwt::Claims;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub id: Uuid,
    pub email: String,
    pub address: String,
    pub address2: String,
    pub city: String,
    pub zip: String,
    pub phone: String,
    pub role: UserRole,
    pub avatar_url: String,
    pub created_at: DateTime<Utc>,
}

impl From<user::Model> for ProfileResponse {
    fn from(u: user::Model) -> Self {
        let avatar_url = avatar_url(&u.email);
        ProfileResponse {
            id: u.id,
            email: u.email,
            address: u.address,
            address2: u.address2,
            city: u.city,
            zip: u.zip,
            phone: u.phone,
            role: u.role,
            avatar_url,
            created_at: u.created_at.with_timezone(&Utc),
        }
    }
}

/// Fetch the logged-in user's profile
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> AppResult<Json<ProfileResponse>> {
    let user = user::Entity::find_by_id(claims.sub)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(Json(user.into()))
}

/// Partial update of contact fields. Email and role are not mutable here.
#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub address: Option<String>,
    pub address2: Option<String>,
    pub zip: Option<String>,
    pub phone: Option<String>,
}

pub async fn update_profile(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<UpdateProfileRequest>,
) -> AppResult<Json<ProfileResponse>> {
    let user = user::Entity::find_by_id(claims.sub)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let mut active: user::ActiveModel = user.into();

    if let Some(address) = payload.address {
        if address.trim().is_empty() {
            return Err(AppError::BadRequest("Address cannot be empty".to_string()));
        }
        active.address = Set(address.trim().to_string());
    }
    if let Some(address2) = payload.address2 {
        active.address2 = Set(address2.trim().to_string());
    }
    if let Some(zip) = payload.zip {
        if zip.trim().is_empty() {
            return Err(AppError::BadRequest("Zip cannot be empty".to_string()));
        }
        active.zip = Set(zip.trim().to_string());
    }
    if let Some(phone) = payload.phone {
        active.phone = Set(phone.trim().to_string());
    }

    let updated = active.update(&state.db).await?;
    Ok(Json(updated.into()))
}
