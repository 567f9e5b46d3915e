use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::rating::RatedRole;
use crate::entities::user::UserRole;
use crate::entities::{booking, parking_spot, user};
use crate::error::{AppError, AppResult};
use crate::handlers::ratings::average_rating_label;
use crate::utils::rating::RATING_ERROR;
use crate::AppState;

const DEFAULT_PAGE_SIZE: u64 = 20;
const MAX_PAGE_SIZE: u64 = 100;

// ============ Booking Moderation ============

#[derive(Debug, Deserialize)]
pub struct BookingPageQuery {
    pub page_size: Option<u64>,
    pub cursor: Option<String>,
}

/// The cursor carries the page boundary's (created_at, id) pair itself, so
/// it keeps working even after the booking it points at is cancelled.
fn encode_cursor(created_at: DateTime<Utc>, id: Uuid) -> String {
    format!("{}_{}", created_at.timestamp_micros(), id)
}

fn parse_cursor(token: &str) -> Option<(DateTime<Utc>, Uuid)> {
    let (micros, id) = token.split_once('_')?;
    let created_at = DateTime::from_timestamp_micros(micros.parse().ok()?)?;
    Some((created_at, id.parse().ok()?))
}

#[derive(Debug, Serialize)]
pub struct ModeratedBooking {
    pub id: Uuid,
    pub spot_id: Uuid,
    pub spot_address: String,
    pub owner_email: String,
    pub owner_rating: String,
    pub user_email: String,
    pub user_rating: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct BookingPageResponse {
    pub bookings: Vec<ModeratedBooking>,
    /// Pass back to fetch the next page; absent once the last page is reached
    pub next_cursor: Option<String>,
}

/// Moderation view of one booking. Every lookup degrades to a placeholder so
/// one broken record never takes down the page render.
async fn enrich_booking(db: &DatabaseConnection, b: booking::Model) -> ModeratedBooking {
    let (spot_address, owner_id) = match parking_spot::Entity::find_by_id(b.spot_id).one(db).await {
        Ok(Some(spot)) => (spot.address, Some(spot.owner_id)),
        Ok(None) => ("Unknown".to_string(), None),
        Err(e) => {
            tracing::warn!(booking_id = %b.id, "Failed to fetch spot: {}", e);
            ("Error".to_string(), None)
        }
    };

    let owner_email = match owner_id {
        Some(id) => fetch_user_email(db, id).await,
        None => "Unknown".to_string(),
    };
    let owner_rating = match owner_id {
        Some(id) => average_rating_label(db, id, RatedRole::Owner).await,
        None => RATING_ERROR.to_string(),
    };

    let user_email = fetch_user_email(db, b.user_id).await;
    let user_rating = average_rating_label(db, b.user_id, RatedRole::User).await;

    ModeratedBooking {
        id: b.id,
        spot_id: b.spot_id,
        spot_address,
        owner_email,
        owner_rating,
        user_email,
        user_rating,
        start_time: b.start_time.with_timezone(&Utc),
        end_time: b.end_time.with_timezone(&Utc),
        created_at: b.created_at.with_timezone(&Utc),
    }
}

async fn fetch_user_email(db: &DatabaseConnection, user_id: Uuid) -> String {
    match user::Entity::find_by_id(user_id).one(db).await {
        Ok(Some(u)) => u.email,
        Ok(None) => "Unknown".to_string(),
        Err(e) => {
            tracing::warn!(%user_id, "Failed to fetch user: {}", e);
            "Unknown".to_string()
        }
    }
}

/// Page through all bookings in insertion order. An empty page with no cursor
/// means no bookings exist; an empty page with a cursor means the end was
/// reached.
pub async fn list_bookings(
    State(state): State<AppState>,
    Query(params): Query<BookingPageQuery>,
) -> AppResult<Json<BookingPageResponse>> {
    let page_size = params
        .page_size
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);

    let mut query = booking::Entity::find()
        .order_by_asc(booking::Column::CreatedAt)
        .order_by_asc(booking::Column::Id);

    if let Some(token) = params.cursor.as_deref() {
        let (created_at, id) = parse_cursor(token)
            .ok_or_else(|| AppError::BadRequest("Invalid pagination cursor".to_string()))?;

        query = query.filter(
            Condition::any()
                .add(booking::Column::CreatedAt.gt(created_at))
                .add(
                    Condition::all()
                        .add(booking::Column::CreatedAt.eq(created_at))
                        .add(booking::Column::Id.gt(id)),
                ),
        );
    }

    let page = query.limit(page_size).all(&state.db).await?;

    let next_cursor = if page.len() as u64 == page_size {
        page.last()
            .map(|b| encode_cursor(b.created_at.with_timezone(&Utc), b.id))
    } else {
        None
    };

    let mut bookings = Vec::with_capacity(page.len());
    for b in page {
        bookings.push(enrich_booking(&state.db, b).await);
    }

    Ok(Json(BookingPageResponse {
        bookings,
        next_cursor,
    }))
}

/// Cancel any booking, regardless of who made it
pub async fn delete_booking(
    State(state): State<AppState>,
    Path(booking_id): Path<Uuid>,
) -> AppResult<Json<serde_json::Value>> {
    let result = booking::Entity::delete_by_id(booking_id)
        .exec(&state.db)
        .await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound("Booking not found".to_string()));
    }

    tracing::info!(%booking_id, "Booking cancelled by admin");
    Ok(Json(serde_json::json!({ "message": "Booking cancelled" })))
}

// ============ User Moderation ============

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub city: String,
    pub zip: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

/// List all accounts
pub async fn list_users(State(state): State<AppState>) -> AppResult<Json<Vec<UserResponse>>> {
    let users = user::Entity::find().all(&state.db).await?;

    let responses: Vec<UserResponse> = users
        .into_iter()
        .map(|u| UserResponse {
            id: u.id,
            email: u.email,
            city: u.city,
            zip: u.zip,
            role: u.role,
            created_at: u.created_at.with_timezone(&Utc),
        })
        .collect();

    Ok(Json(responses))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_survives_without_its_booking() {
        // Nothing in the token refers back to a stored row, so cancelling
        // the booking it was derived from cannot invalidate it.
        let created_at = DateTime::from_timestamp_micros(1_750_000_000_123_456).unwrap();
        let id = Uuid::new_v4();

        let token = encode_cursor(created_at, id);
        assert_eq!(parse_cursor(&token), Some((created_at, id)));
    }

    #[test]
    fn malformed_cursors_are_rejected() {
        assert_eq!(parse_cursor(""), None);
        assert_eq!(parse_cursor("not-a-cursor"), None);
        assert_eq!(parse_cursor("1750000000123456_"), None);
        assert_eq!(parse_cursor("abc_6f8a0d2e-0000-0000-0000-000000000000"), None);
    }
}
