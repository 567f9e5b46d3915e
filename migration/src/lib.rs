pub use sea_orm_migration::prelude::*;

mod m20250614_000001_create_users;
mod m20250614_000002_create_parking_spots;
mod m20250614_000003_create_availabilities;
mod m20250614_000004_create_bookings;
mod m20250614_000005_create_ratings;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250614_000001_create_users::Migration),
            Box::new(m20250614_000002_create_parking_spots::Migration),
            Box::new(m20250614_000003_create_availabilities::Migration),
            Box::new(m20250614_000004_create_bookings::Migration),
            Box::new(m20250614_000005_create_ratings::Migration),
        ]
    }
}
