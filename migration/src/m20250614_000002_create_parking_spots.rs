use sea_orm_migration::{prelude::*, schema::*};

use super::m20250614_000001_create_users::User;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ParkingSpot::Table)
                    .if_not_exists()
                    .col(uuid(ParkingSpot::Id).primary_key())
                    .col(uuid(ParkingSpot::OwnerId).not_null())
                    .col(string_len(ParkingSpot::Address, 255).not_null())
                    .col(string_len(ParkingSpot::Postcode, 20).not_null())
                    .col(double(ParkingSpot::PricePerHour).not_null())
                    .col(
                        timestamp_with_time_zone(ParkingSpot::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_parking_spot_owner")
                            .from(ParkingSpot::Table, ParkingSpot::OwnerId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_parking_spot_postcode")
                    .table(ParkingSpot::Table)
                    .col(ParkingSpot::Postcode)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ParkingSpot::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum ParkingSpot {
    Table,
    Id,
    OwnerId,
    Address,
    Postcode,
    PricePerHour,
    CreatedAt,
}
