use sea_orm_migration::{prelude::*, schema::*, sea_orm::sea_query::extension::postgres::Type};

use super::m20250614_000001_create_users::User;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_type(
                Type::create()
                    .as_enum(RatedRole::Enum)
                    .values([RatedRole::User, RatedRole::Owner])
                    .to_owned(),
            )
            .await?;

        // No foreign key on booking_id: ratings outlive a cancelled booking.
        manager
            .create_table(
                Table::create()
                    .table(Rating::Table)
                    .if_not_exists()
                    .col(uuid(Rating::Id).primary_key())
                    .col(uuid(Rating::FromUserId).not_null())
                    .col(uuid(Rating::ToUserId).not_null())
                    .col(
                        ColumnDef::new(Rating::Role)
                            .custom(RatedRole::Enum)
                            .not_null(),
                    )
                    .col(uuid(Rating::BookingId).not_null())
                    .col(integer(Rating::Rating).not_null())
                    .col(
                        timestamp_with_time_zone(Rating::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(Rating::UpdatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_rating_from_user")
                            .from(Rating::Table, Rating::FromUserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_rating_to_user")
                            .from(Rating::Table, Rating::ToUserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One rating per (rater, ratee, booking); upserts land on this index
        manager
            .create_index(
                Index::create()
                    .name("uq_rating_from_to_booking")
                    .table(Rating::Table)
                    .col(Rating::FromUserId)
                    .col(Rating::ToUserId)
                    .col(Rating::BookingId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Aggregation queries filter by (to_user_id, role)
        manager
            .create_index(
                Index::create()
                    .name("idx_rating_to_user_role")
                    .table(Rating::Table)
                    .col(Rating::ToUserId)
                    .col(Rating::Role)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Rating::Table).to_owned())
            .await?;

        manager
            .drop_type(Type::drop().name(RatedRole::Enum).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Rating {
    Table,
    Id,
    FromUserId,
    ToUserId,
    Role,
    BookingId,
    Rating,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub enum RatedRole {
    #[sea_orm(iden = "rated_role")]
    Enum,
    #[sea_orm(iden = "user")]
    User,
    #[sea_orm(iden = "owner")]
    Owner,
}
