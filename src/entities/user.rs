use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "user_role")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[sea_orm(string_value = "admin")]
    Admin,
    #[sea_orm(string_value = "owner")]
    Owner,
    /// A renter: books spots and rates owners.
    #[sea_orm(string_value = "user")]
    User,
}

/// What a session is allowed to see and do. Resolved once per role so
/// visibility rules live in a single place instead of scattered string
/// comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// Can create bookings and rate spot owners.
    pub can_book: bool,
    /// Owner tools: listing spots, viewing bookings on them, rating renters.
    pub owner_tools: bool,
    /// Admin tools: the moderation panel, forced cancellation.
    pub admin_tools: bool,
}

impl Capabilities {
    /// No session at all.
    pub const ANONYMOUS: Capabilities = Capabilities {
        can_book: false,
        owner_tools: false,
        admin_tools: false,
    };
}

impl UserRole {
    pub fn capabilities(self) -> Capabilities {
        match self {
            UserRole::User => Capabilities {
                can_book: true,
                owner_tools: false,
                admin_tools: false,
            },
            UserRole::Owner => Capabilities {
                can_book: true,
                owner_tools: true,
                admin_tools: false,
            },
            UserRole::Admin => Capabilities {
                can_book: false,
                owner_tools: false,
                admin_tools: true,
            },
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub address: String,
    pub address2: String,
    pub city: String,
    pub zip: String,
    pub phone: String,
    pub role: UserRole,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::booking::Entity")]
    Bookings,
    #[sea_orm(has_many = "super::parking_spot::Entity")]
    ParkingSpots,
}

impl Related<super::booking::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Bookings.def()
    }
}

impl Related<super::parking_spot::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ParkingSpots.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renter_cannot_moderate_or_list_spots() {
        let caps = UserRole::User.capabilities();
        assert!(caps.can_book);
        assert!(!caps.owner_tools);
        assert!(!caps.admin_tools);
    }

    #[test]
    fn owner_can_book_and_use_owner_tools() {
        let caps = UserRole::Owner.capabilities();
        assert!(caps.can_book);
        assert!(caps.owner_tools);
        assert!(!caps.admin_tools);
    }

    #[test]
    fn admin_only_moderates() {
        let caps = UserRole::Admin.capabilities();
        assert!(!caps.can_book);
        assert!(!caps.owner_tools);
        assert!(caps.admin_tools);
    }

    #[test]
    fn anonymous_has_nothing() {
        assert_eq!(
            Capabilities::ANONYMOUS,
            Capabilities {
                can_book: false,
                owner_tools: false,
                admin_tools: false
            }
        );
    }
}
