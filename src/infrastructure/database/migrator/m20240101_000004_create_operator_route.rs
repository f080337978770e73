//! Create operator_route join table

use sea_orm_migration::prelude::*;

use super::m20240101_000002_create_operator::Operator;
use super::m20240101_000003_create_route::Route;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(OperatorRoute::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(OperatorRoute::OperatorId).integer().not_null())
                    .col(ColumnDef::new(OperatorRoute::RouteId).string().not_null())
                    .primary_key(
                        Index::create()
                            .name("pk_operator_route")
                            .col(OperatorRoute::OperatorId)
                            .col(OperatorRoute::RouteId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_operator_route_operator")
                            .from(OperatorRoute::Table, OperatorRoute::OperatorId)
                            .to(Operator::Table, Operator::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_operator_route_route")
                            .from(OperatorRoute::Table, OperatorRoute::RouteId)
                            .to(Route::Table, Route::Number)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_operator_route_route")
                    .table(OperatorRoute::Table)
                    .col(OperatorRoute::RouteId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(OperatorRoute::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum OperatorRoute {
    Table,
    OperatorId,
    RouteId,
}
