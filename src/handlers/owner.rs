use axum::{extract::State, Extension, Json};
use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::rating::{self, RatedRole};
use crate::entities::{availability, booking, parking_spot, user};
use crate::error::{AppError, AppResult};
use crate::handlers::ratings::{average_rating_label, upsert_rating};
use crate::handlers::renter::{AvailabilityRange, SpotResponse};
use crate::utils::availability::validate_ranges;
use crate::utils::jwt::Claims;
use crate::utils::rating::{MAX_RATING, MIN_RATING};
use crate::AppState;

// ============ Spot Management ============

#[derive(Debug, Deserialize)]
pub struct RangeRequest {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateSpotRequest {
    pub address: String,
    pub postcode: String,
    pub price_per_hour: f64,
    pub availability: Vec<RangeRequest>,
}

/// Create a parking spot with its availability windows. The windows must be
/// non-empty, in the future, well-formed and pairwise disjoint.
pub async fn create_spot(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateSpotRequest>,
) -> AppResult<Json<SpotResponse>> {
    let address = payload.address.trim();
    let postcode = payload.postcode.trim();

    if address.is_empty() || postcode.is_empty() {
        return Err(AppError::BadRequest(
            "Address and postcode are required".to_string(),
        ));
    }
    if payload.price_per_hour <= 0.0 {
        return Err(AppError::BadRequest(
            "Price per hour must be positive".to_string(),
        ));
    }

    let ranges: Vec<(DateTime<Utc>, DateTime<Utc>)> = payload
        .availability
        .iter()
        .map(|r| (r.start, r.end))
        .collect();
    validate_ranges(Utc::now(), &ranges).map_err(AppError::BadRequest)?;

    let spot = parking_spot::ActiveModel {
        id: Set(Uuid::new_v4()),
        owner_id: Set(claims.sub),
        address: Set(address.to_string()),
        postcode: Set(postcode.to_string()),
        price_per_hour: Set(payload.price_per_hour),
        ..Default::default()
    };
    let spot = spot.insert(&state.db).await?;

    let windows: Vec<availability::ActiveModel> = ranges
        .iter()
        .map(|&(start, end)| availability::ActiveModel {
            id: Set(Uuid::new_v4()),
            spot_id: Set(spot.id),
            start_time: Set(start.into()),
            end_time: Set(end.into()),
        })
        .collect();
    availability::Entity::insert_many(windows)
        .exec(&state.db)
        .await?;

    tracing::info!(spot_id = %spot.id, owner_id = %spot.owner_id, "Spot created");

    let availability = ranges
        .into_iter()
        .map(|(start, end)| AvailabilityRange { start, end })
        .collect();

    Ok(Json(SpotResponse {
        id: spot.id,
        owner_id: spot.owner_id,
        address: spot.address,
        postcode: spot.postcode,
        price_per_hour: spot.price_per_hour,
        availability,
    }))
}

/// List the logged-in owner's spots
pub async fn my_spots(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> AppResult<Json<Vec<SpotResponse>>> {
    let spots = parking_spot::Entity::find()
        .filter(parking_spot::Column::OwnerId.eq(claims.sub))
        .all(&state.db)
        .await?;

    let ranges = availability::Entity::find().all(&state.db).await?;

    let responses = spots
        .into_iter()
        .map(|spot| {
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
        })
        .collect();

    Ok(Json(responses))
}

// ============ Bookings On My Spots ============

#[derive(Debug, Serialize)]
pub struct SpotBookingResponse {
    pub id: Uuid,
    pub spot_id: Uuid,
    pub spot_address: String,
    pub renter_email: String,
    pub renter_rating: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Bookings made against the owner's spots, with renter contact and aggregate
/// rating. Missing renter records degrade to "Unknown".
pub async fn spot_bookings(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> AppResult<Json<Vec<SpotBookingResponse>>> {
    let spots = parking_spot::Entity::find()
        .filter(parking_spot::Column::OwnerId.eq(claims.sub))
        .all(&state.db)
        .await?;
    let spot_ids: Vec<Uuid> = spots.iter().map(|s| s.id).collect();

    let bookings = booking::Entity::find()
        .filter(booking::Column::SpotId.is_in(spot_ids))
        .all(&state.db)
        .await?;

    let mut responses = Vec::new();
    for b in bookings {
        let spot_address = spots
            .iter()
            .find(|s| s.id == b.spot_id)
            .map(|s| s.address.clone())
            .unwrap_or_else(|| "Unknown".to_string());

        let renter_email = match user::Entity::find_by_id(b.user_id).one(&state.db).await {
            Ok(Some(u)) => u.email,
            Ok(None) => "Unknown".to_string(),
            Err(e) => {
                tracing::warn!(booking_id = %b.id, "Failed to fetch renter: {}", e);
                "Unknown".to_string()
            }
        };

        let renter_rating = average_rating_label(&state.db, b.user_id, RatedRole::User).await;

        responses.push(SpotBookingResponse {
            id: b.id,
            spot_id: b.spot_id,
            spot_address,
            renter_email,
            renter_rating,
            start_time: b.start_time.with_timezone(&Utc),
            end_time: b.end_time.with_timezone(&Utc),
            created_at: b.created_at.with_timezone(&Utc),
        });
    }

    Ok(Json(responses))
}

// ============ Rating the Renter ============

#[derive(Debug, Deserialize)]
pub struct RateRenterRequest {
    pub booking_id: Uuid,
    pub rating: i32,
}

/// Rate the renter of one of your spots (1-5), keyed to the booking.
pub async fn rate_renter(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<RateRenterRequest>,
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

    let spot = parking_spot::Entity::find_by_id(booking.spot_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Spot no longer exists".to_string()))?;

    if spot.owner_id != claims.sub {
        return Err(AppError::Forbidden(
            "You can only rate renters of your own spots".to_string(),
        ));
    }

    let saved = upsert_rating(
        &state.db,
        claims.sub,
        booking.user_id,
        RatedRole::User,
        booking.id,
        payload.rating,
    )
    .await?;

    Ok(Json(saved))
}
