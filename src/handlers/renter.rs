use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QuerySelect, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::rating::{self, RatedRole};
use crate::entities::{availability, booking, parking_spot};
use crate::error::{AppError, AppResult};
use crate::handlers::ratings::upsert_rating;
use crate::utils::availability::range_contains;
use crate::utils::jwt::Claims;
use crate::utils::payment::validate_payment;
use crate::utils::rating::{MAX_RATING, MIN_RATING};
use crate::AppState;

// ============ Spot Catalog (public) ============

#[derive(Debug, Serialize)]
pub struct AvailabilityRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct SpotResponse {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub address: String,
    pub postcode: String,
    pub price_per_hour: f64,
    pub availability: Vec<AvailabilityRange>,
}

fn spot_response(spot: parking_spot::Model, ranges: &[availability::Model]) -> SpotResponse {
    let availability = ranges
        .iter()
        .filter(|r| r.spot_id == spot.id)
        .map(|r| AvailabilityRange {
            start: r.start_time.with_timezone(&Utc),
            end: r.end_time.with_timezone(&Utc),
        })
        .collect();

    SpotResponse {
        id: spot.id,
        owner_id: spot.owner_id,
        address: spot.address,
        postcode: spot.postcode,
        price_per_hour: spot.price_per_hour,
        availability,
    }
}

/// List all spots with their availability windows
pub async fn list_spots(State(state): State<AppState>) -> AppResult<Json<Vec<SpotResponse>>> {
    let spots = parking_spot::Entity::find().all(&state.db).await?;
    let ranges = availability::Entity::find().all(&state.db).await?;

    let responses = spots
        .into_iter()
        .map(|s| spot_response(s, &ranges))
        .collect();

    Ok(Json(responses))
}

/// Spot details
pub async fn get_spot(
    State(state): State<AppState>,
    Path(spot_id): Path<Uuid>,
) -> AppResult<Json<SpotResponse>> {
    let spot = parking_spot::Entity::find_by_id(spot_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Spot not found".to_string()))?;

    let ranges = availability::Entity::find()
        .filter(availability::Column::SpotId.eq(spot_id))
        .all(&state.db)
        .await?;

    Ok(Json(spot_response(spot, &ranges)))
}

#[derive(Debug, Deserialize)]
pub struct SpotSearchQuery {
    pub postcode: String,
}

/// Search spots by postcode (exact match)
pub async fn search_spots(
    State(state): State<AppState>,
    Query(params): Query<SpotSearchQuery>,
) -> AppResult<Json<Vec<SpotResponse>>> {
    let spots = parking_spot::Entity::find()
        .filter(parking_spot::Column::Postcode.eq(params.postcode.trim()))
        .all(&state.db)
        .await?;

    let ranges = availability::Entity::find().all(&state.db).await?;

    let responses = spots
        .into_iter()
        .map(|s| spot_response(s, &ranges))
        .collect();

    Ok(Json(responses))
}

// ============ Booking Workflow ============

#[derive(Debug, Deserialize)]
pub struct CreateBookingRequest {
    pub spot_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub card_number: String,
    pub card_name: String,
}

#[derive(Debug, Serialize)]
pub struct BookingResponse {
    pub id: Uuid,
    pub spot_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Book a spot for a time range. Payment is validated before anything is
/// written; an invalid card leaves no booking behind.
pub async fn create_booking(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateBookingRequest>,
) -> AppResult<Json<BookingResponse>> {
    validate_payment(&payload.card_number, &payload.card_name).map_err(AppError::BadRequest)?;

    if payload.start_time >= payload.end_time {
        return Err(AppError::BadRequest(
            "Booking start must be before its end".to_string(),
        ));
    }
    if payload.start_time < Utc::now() {
        return Err(AppError::BadRequest(
            "Cannot book a range in the past".to_string(),
        ));
    }

    // Bookings for one spot serialize on its row lock; concurrent requests
    // cannot both pass the overlap check below. An early return rolls back.
    let txn = state.db.begin().await?;

    let spot = parking_spot::Entity::find_by_id(payload.spot_id)
        .lock_exclusive()
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::NotFound("Spot not found".to_string()))?;

    if spot.owner_id == claims.sub {
        return Err(AppError::BadRequest(
            "You cannot book your own spot".to_string(),
        ));
    }

    // The requested range must sit inside one of the offered windows
    let windows = availability::Entity::find()
        .filter(availability::Column::SpotId.eq(spot.id))
        .all(&txn)
        .await?;

    let covered = windows.iter().any(|w| {
        range_contains(
            w.start_time.with_timezone(&Utc),
            w.end_time.with_timezone(&Utc),
            payload.start_time,
            payload.end_time,
        )
    });
    if !covered {
        return Err(AppError::BadRequest(
            "The spot is not offered for that time range".to_string(),
        ));
    }

    // Reject double-booking of the same spot for any overlapping range
    let clashing = booking::Entity::find()
        .filter(booking::Column::SpotId.eq(spot.id))
        .filter(booking::Column::StartTime.lt(payload.end_time))
        .filter(booking::Column::EndTime.gt(payload.start_time))
        .one(&txn)
        .await?;

    if clashing.is_some() {
        return Err(AppError::Conflict(
            "The spot is already booked for an overlapping range".to_string(),
        ));
    }

    let new_booking = booking::ActiveModel {
        id: Set(Uuid::new_v4()),
        spot_id: Set(spot.id),
        user_id: Set(claims.sub),
        start_time: Set(payload.start_time.into()),
        end_time: Set(payload.end_time.into()),
        ..Default::default()
    };

    let created = new_booking.insert(&txn).await?;
    txn.commit().await?;
    tracing::info!(booking_id = %created.id, spot_id = %spot.id, "Booking created");

    Ok(Json(BookingResponse {
        id: created.id,
        spot_id: created.spot_id,
        start_time: created.start_time.with_timezone(&Utc),
        end_time: created.end_time.with_timezone(&Utc),
        created_at: created.created_at.with_timezone(&Utc),
    }))
}

#[derive(Debug, Serialize)]
pub struct MyBookingResponse {
    pub id: Uuid,
    pub spot_id: Uuid,
    pub address: String,
    pub postcode: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    /// The rating this user has already given the owner for this booking
    pub my_rating: Option<i32>,
}

/// List the logged-in user's bookings, enriched with spot details. A missing
/// spot record degrades to placeholder fields instead of failing the list.
pub async fn my_bookings(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> AppResult<Json<Vec<MyBookingResponse>>> {
    let bookings = booking::Entity::find()
        .filter(booking::Column::UserId.eq(claims.sub))
        .all(&state.db)
        .await?;

    let my_ratings = rating::Entity::find()
        .filter(rating::Column::FromUserId.eq(claims.sub))
        .all(&state.db)
        .await?;

    let mut responses = Vec::new();
    for b in bookings {
        let (address, postcode) = match parking_spot::Entity::find_by_id(b.spot_id)
            .one(&state.db)
            .await
        {
            Ok(Some(spot)) => (spot.address, spot.postcode),
            Ok(None) => ("Unknown".to_string(), "Unknown".to_string()),
            Err(e) => {
                tracing::warn!(booking_id = %b.id, "Failed to fetch spot: {}", e);
                ("Error".to_string(), "Error".to_string())
            }
        };

        let my_rating = my_ratings
            .iter()
            .find(|r| r.booking_id == b.id)
            .map(|r| r.rating);

        responses.push(MyBookingResponse {
            id: b.id,
            spot_id: b.spot_id,
            address,
            postcode,
            start_time: b.start_time.with_timezone(&Utc),
            end_time: b.end_time.with_timezone(&Utc),
            created_at: b.created_at.with_timezone(&Utc),
            my_rating,
        });
    }

    Ok(Json(responses))
}

/// Cancel a booking. Ratings that reference it are left in place.
pub async fn cancel_booking(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(booking_id): Path<Uuid>,
) -> AppResult<Json<serde_json::Value>> {
    let booking = booking::Entity::find_by_id(booking_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))?;

    if booking.user_id != claims.sub {
        return Err(AppError::Forbidden(
            "You can only cancel your own bookings".to_string(),
        ));
    }

    booking::Entity::delete_by_id(booking_id)
        .exec(&state.db)
        .await?;
    tracing::info!(%booking_id, "Booking cancelled");

    Ok(Json(serde_json::json!({ "message": "Booking cancelled" })))
}

// ============ Rating the Owner ============

#[derive(Debug, Deserialize)]
pub struct SubmitRatingRequest {
    pub booking_id: Uuid,
    pub rating: i32,
}

/// Rate the owner of a booked spot (1-5). Resubmitting for the same booking
/// overwrites the previous value.
pub async fn rate_owner(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<SubmitRatingRequest>,
) -> AppResult<Json<rating::Model>> {
    if !(MIN_RATING..=MAX_RATING).contains(&payload.rating) {
        return Err(AppError::BadRequest(format!(
            "Rating must be between {} and {}",
            MIN_RATING, MAX_RATING
        )));
    }

    let booking = booking::Entity::find_by_id(payload.booking_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))?;

    if booking.user_id != claims.sub {
        return Err(AppError::Forbidden(
            "You can only rate owners of your own bookings".to_string(),
        ));
    }

    let spot = parking_spot::Entity::find_by_id(booking.spot_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Spot no longer exists".to_string()))?;

    let saved = upsert_rating(
        &state.db,
        claims.sub,
        spot.owner_id,
        RatedRole::Owner,
        booking.id,
        payload.rating,
    )
    .await?;

    Ok(Json(saved))
}
