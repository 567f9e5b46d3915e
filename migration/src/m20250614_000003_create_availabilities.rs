use sea_orm_migration::{prelude::*, schema::*};

use super::m20250614_000002_create_parking_spots::ParkingSpot;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Availability::Table)
                    .if_not_exists()
                    .col(uuid(Availability::Id).primary_key())
                    .col(uuid(Availability::SpotId).not_null())
                    .col(timestamp_with_time_zone(Availability::StartTime).not_null())
                    .col(timestamp_with_time_zone(Availability::EndTime).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_availability_spot")
                            .from(Availability::Table, Availability::SpotId)
                            .to(ParkingSpot::Table, ParkingSpot::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_availability_spot")
                    .table(Availability::Table)
                    .col(Availability::SpotId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Availability::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Availability {
    Table,
    Id,
    SpotId,
    StartTime,
    EndTime,
}
