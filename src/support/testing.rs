//! Test fixtures: in-memory database and a small bus network

use std::fmt::Debug;

use sea_orm::{ConnectionTrait, DatabaseConnection, EntityTrait};

use crate::application::queries::{bus_stop, operator, route, EntityReport, QueryForm};
use crate::infrastructure::{init_database, migrate, DatabaseConfig};
use crate::support::Row;

pub async fn setup_db() -> DatabaseConnection {
    let db = init_database(&DatabaseConfig::in_memory())
        .await
        .expect("in-memory database");
    migrate(&db).await.expect("migrations");
    db
}

pub fn row(pairs: &[(&str, &str)]) -> Row {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

pub const STOPS: &[(&str, &str)] = &[
    ("1001", "Park Gates"),
    ("1002", "Haymarket"),
    ("1003", "Monument"),
    ("1004", "Quayside"),
    ("9015", "Railway Station"),
    ("9016", "Railway Station"),
];

pub const OPERATORS: &[&str] = &["Diamond Buses", "OK Travel", "Go North East", "Arriva"];

/// number, frequency, start, destination, operators
pub const ROUTES: &[(&str, &str, &str, &str, &str)] = &[
    ("1", "6", "1001", "1002", "Diamond Buses|OK Travel"),
    ("16A", "4", "9015", "1003", "OK Travel"),
    ("2", "12", "1002", "1001", "Go North East|Diamond Buses|OK Travel"),
    ("X1", "2", "1002", "1003", "Arriva"),
    ("21", "8", "1003", "9016", "Arriva|Go North East"),
];

pub fn stop_rows() -> Vec<Row> {
    STOPS
        .iter()
        .map(|&(id, description)| row(&[("id", id), ("description", description)]))
        .collect()
}

pub fn operator_rows() -> Vec<Row> {
    OPERATORS
        .iter()
        .map(|&name| row(&[("name", name), ("town", "Newcastle upon Tyne")]))
        .collect()
}

pub fn route_rows() -> Vec<Row> {
    ROUTES
        .iter()
        .map(|&(number, frequency, start, destination, operators)| {
            row(&[
                ("number", number),
                ("frequency", frequency),
                ("start", start),
                ("destination", destination),
                ("operators", operators),
            ])
        })
        .collect()
}

pub async fn seed_network<C: ConnectionTrait>(db: &C) {
    for r in stop_rows() {
        bus_stop::insert(&r, db).await.expect("stop fixture");
    }
    for r in operator_rows() {
        operator::insert(&r, db).await.expect("operator fixture");
    }
    for r in route_rows() {
        route::insert(&r, db).await.expect("route fixture");
    }
}

/// Run a report in every form, check that rows and order match exactly, and
/// return the rows.
pub async fn assert_forms_agree<E, C>(report: &EntityReport<E>, db: &C) -> Vec<E::Model>
where
    E: EntityTrait,
    E::Model: Debug,
    C: ConnectionTrait,
{
    let sql = report.fetch(db, QueryForm::Sql).await.expect("sql form");
    let named = report.fetch(db, QueryForm::Named).await.expect("named form");
    let criteria = report
        .fetch(db, QueryForm::Criteria)
        .await
        .expect("criteria form");

    // Debug output covers every field, not just the key used by PartialEq
    assert_eq!(format!("{:?}", sql), format!("{:?}", named), "sql vs named");
    assert_eq!(format!("{:?}", sql), format!("{:?}", criteria), "sql vs criteria");
    sql
}
