//! Create route table

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_bus_stop::BusStop;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Route::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Route::Number)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Route::Frequency).integer().not_null())
                    .col(ColumnDef::new(Route::StartStopId).integer().not_null())
                    .col(ColumnDef::new(Route::DestinationStopId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_route_start_stop")
                            .from(Route::Table, Route::StartStopId)
                            .to(BusStop::Table, BusStop::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_route_destination_stop")
                            .from(Route::Table, Route::DestinationStopId)
                            .to(BusStop::Table, BusStop::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Route::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Route {
    Table,
    Number,
    Frequency,
    StartStopId,
    DestinationStopId,
}
