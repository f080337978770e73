//! Bulk loading from CSV
//!
//! Stops, operators and routes are inserted in that order, all inside one
//! transaction: the first bad row aborts the load and nothing is kept.

use std::io::Read;
use std::path::{Path, PathBuf};

use log::{error, info};
use sea_orm::{ConnectionTrait, DatabaseConnection, TransactionTrait};
use serde::Serialize;

use super::queries::{bus_stop, operator, route};
use crate::support::{AppResult, Row};

/// CSV inputs, one file per entity type, each with a header row.
#[derive(Debug, Clone)]
pub struct NetworkFiles {
    pub stops: PathBuf,
    pub operators: PathBuf,
    pub routes: PathBuf,
}

/// Rows for each entity type, already parsed.
#[derive(Debug, Clone, Default)]
pub struct NetworkRows {
    pub stops: Vec<Row>,
    pub operators: Vec<Row>,
    pub routes: Vec<Row>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadSummary {
    pub stops: usize,
    pub operators: usize,
    pub routes: usize,
    /// Operator names routes referred to that matched nothing
    pub unresolved_operators: Vec<String>,
}

pub fn read_rows<P: AsRef<Path>>(path: P) -> AppResult<Vec<Row>> {
    let file = std::fs::File::open(path.as_ref()).map_err(csv::Error::from)?;
    read_rows_from(file)
}

pub fn read_rows_from<R: Read>(input: R) -> AppResult<Vec<Row>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(input);
    let rows = reader.deserialize().collect::<Result<Vec<Row>, _>>()?;
    Ok(rows)
}

impl NetworkFiles {
    pub fn read(&self) -> AppResult<NetworkRows> {
        Ok(NetworkRows {
            stops: read_rows(&self.stops)?,
            operators: read_rows(&self.operators)?,
            routes: read_rows(&self.routes)?,
        })
    }
}

pub async fn load_network(db: &DatabaseConnection, files: &NetworkFiles) -> AppResult<LoadSummary> {
    let rows = files.read()?;
    load_rows(db, &rows).await
}

/// Insert everything in one transaction. Dropping the transaction on an
/// early return rolls it back.
pub async fn load_rows(db: &DatabaseConnection, rows: &NetworkRows) -> AppResult<LoadSummary> {
    let txn = db.begin().await?;
    let summary = insert_all(&txn, rows).await?;
    txn.commit().await?;

    info!(
        "Loaded {} stop(s), {} operator(s), {} route(s)",
        summary.stops, summary.operators, summary.routes
    );
    Ok(summary)
}

async fn insert_all<C: ConnectionTrait>(db: &C, rows: &NetworkRows) -> AppResult<LoadSummary> {
    let mut summary = LoadSummary::default();

    for (i, r) in rows.stops.iter().enumerate() {
        bus_stop::insert(r, db)
            .await
            .inspect_err(|e| error!("Stop row {}: {}", i + 1, e))?;
        summary.stops += 1;
    }
    for (i, r) in rows.operators.iter().enumerate() {
        operator::insert(r, db)
            .await
            .inspect_err(|e| error!("Operator row {}: {}", i + 1, e))?;
        summary.operators += 1;
    }
    for (i, r) in rows.routes.iter().enumerate() {
        let inserted = route::insert(r, db)
            .await
            .inspect_err(|e| error!("Route row {}: {}", i + 1, e))?;
        summary.routes += 1;
        for name in inserted.operators.unresolved {
            if !summary.unresolved_operators.contains(&name) {
                summary.unresolved_operators.push(name);
            }
        }
    }

    Ok(summary)
}
