use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Which side of a booking is being rated. Renters rate owners, owners rate
/// renters; admins are never rated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "rated_role")]
#[serde(rename_all = "lowercase")]
pub enum RatedRole {
    #[sea_orm(string_value = "user")]
    User,
    #[sea_orm(string_value = "owner")]
    Owner,
}

/// A 1-5 score tied to (rater, ratee, booking). The triple is unique; a
/// resubmission overwrites the value through an ON CONFLICT upsert.
/// `booking_id` deliberately has no foreign key: cancelling a booking leaves
/// its ratings in place.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "rating")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub from_user_id: Uuid,
    pub to_user_id: Uuid,
    pub role: RatedRole,
    pub booking_id: Uuid,
    pub rating: i32,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::FromUserId",
        to = "super::user::Column::Id"
    )]
    FromUser,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::ToUserId",
        to = "super::user::Column::Id"
    )]
    ToUser,
}

impl ActiveModelBehavior for ActiveModel {}
