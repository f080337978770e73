//! Create operator table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Operator::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Operator::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Operator::Name).string().not_null())
                    .col(ColumnDef::new(Operator::Street).string())
                    .col(ColumnDef::new(Operator::Town).string())
                    .col(ColumnDef::new(Operator::Postcode).string())
                    .col(ColumnDef::new(Operator::Email).string())
                    .col(ColumnDef::new(Operator::Phone).string())
                    .to_owned(),
            )
            .await?;

        // Operators are looked up by exact name when routes are loaded
        manager
            .create_index(
                Index::create()
                    .name("idx_operator_name")
                    .table(Operator::Table)
                    .col(Operator::Name)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Operator::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Operator {
    Table,
    Id,
    Name,
    Street,
    Town,
    Postcode,
    Email,
    Phone,
}
