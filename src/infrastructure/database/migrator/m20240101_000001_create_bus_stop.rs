//! Create bus_stop table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(BusStop::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BusStop::Id)
                            .integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(BusStop::Description).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_bus_stop_description")
                    .table(BusStop::Table)
                    .col(BusStop::Description)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(BusStop::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum BusStop {
    Table,
    Id,
    Description,
}
