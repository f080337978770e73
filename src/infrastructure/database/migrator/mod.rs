//! Database migrations module

pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_bus_stop;
mod m20240101_000002_create_operator;
mod m20240101_000003_create_route;
mod m20240101_000004_create_operator_route;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_bus_stop::Migration),
            Box::new(m20240101_000002_create_operator::Migration),
            Box::new(m20240101_000003_create_route::Migration),
            Box::new(m20240101_000004_create_operator_route::Migration),
        ]
    }
}
