use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;
use sea_orm::{sea_query::OnConflict, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::rating::{self, RatedRole};
use crate::error::AppResult;
use crate::utils::rating::{average, format_average, star_breakdown, StarFill, RATING_ERROR};
use crate::AppState;

/// Save a rating for `(from, to, booking)`, overwriting any previous value.
/// A single ON CONFLICT insert against the unique triple index, so two racing
/// submissions can never produce duplicate rows.
pub async fn upsert_rating(
    db: &DatabaseConnection,
    from_user_id: Uuid,
    to_user_id: Uuid,
    role: RatedRole,
    booking_id: Uuid,
    value: i32,
) -> AppResult<rating::Model> {
    let model = rating::ActiveModel {
        id: Set(Uuid::new_v4()),
        from_user_id: Set(from_user_id),
        to_user_id: Set(to_user_id),
        role: Set(role),
        booking_id: Set(booking_id),
        rating: Set(value),
        updated_at: Set(Utc::now().into()),
        ..Default::default()
    };

    let saved = rating::Entity::insert(model)
        .on_conflict(
            OnConflict::columns([
                rating::Column::FromUserId,
                rating::Column::ToUserId,
                rating::Column::BookingId,
            ])
            .update_columns([
                rating::Column::Rating,
                rating::Column::Role,
                rating::Column::UpdatedAt,
            ])
            .to_owned(),
        )
        .exec_with_returning(db)
        .await?;

    Ok(saved)
}

/// Raw rating values received by a user in a given role.
pub async fn rating_values(
    db: &DatabaseConnection,
    user_id: Uuid,
    role: RatedRole,
) -> Result<Vec<i32>, sea_orm::DbErr> {
    let rows = rating::Entity::find()
        .filter(rating::Column::ToUserId.eq(user_id))
        .filter(rating::Column::Role.eq(role))
        .all(db)
        .await?;

    Ok(rows.into_iter().map(|r| r.rating).collect())
}

/// Display label for a user's aggregate: "4.00", the no-ratings sentinel, or
/// "Error" when the lookup itself fails. Enrichment views embed this rather
/// than failing the whole render.
pub async fn average_rating_label(
    db: &DatabaseConnection,
    user_id: Uuid,
    role: RatedRole,
) -> String {
    match rating_values(db, user_id, role).await {
        Ok(values) => format_average(average(&values)),
        Err(e) => {
            tracing::warn!(%user_id, ?role, "Failed to aggregate ratings: {}", e);
            RATING_ERROR.to_string()
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RatingQuery {
    pub role: RatedRole,
}

#[derive(Debug, Serialize)]
pub struct RatingSummary {
    pub average: String,
    pub count: usize,
    /// Five-glyph display breakdown; absent when there is nothing to show.
    pub stars: Option<[StarFill; 5]>,
}

/// Public aggregate for a user in a role (`?role=owner` or `?role=user`)
pub async fn get_user_rating(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Query(params): Query<RatingQuery>,
) -> AppResult<Json<RatingSummary>> {
    let summary = match rating_values(&state.db, user_id, params.role).await {
        Ok(values) => {
            let avg = average(&values);
            RatingSummary {
                average: format_average(avg),
                count: values.len(),
                stars: avg.map(star_breakdown),
            }
        }
        Err(e) => {
            tracing::warn!(%user_id, "Failed to fetch ratings: {}", e);
            RatingSummary {
                average: RATING_ERROR.to_string(),
                count: 0,
                stars: None,
            }
        }
    };

    Ok(Json(summary))
}
