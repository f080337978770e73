//! Named query registry
//!
//! Every declarative query is registered here under a stable name
//! (`<Entity>.<query>`), so callers can address it by identifier instead of
//! carrying SQL text around. [`verify_all`] asks the database to compile each
//! registered statement, which catches schema drift at startup rather than on
//! first use.

use log::debug;
use sea_orm::{ConnectionTrait, DbBackend, Statement, Value};

use super::{bus_stop, operator, route};
use crate::support::{AppResult, DomainError};

/// A declarative query addressable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NamedQuery {
    pub name: &'static str,
    /// SQLite dialect, `?` positional parameters
    pub sql: &'static str,
}

impl NamedQuery {
    /// Number of positional parameters the statement expects.
    pub fn arity(&self) -> usize {
        self.sql.matches('?').count()
    }

    pub fn statement(&self, backend: DbBackend, values: Vec<Value>) -> AppResult<Statement> {
        if values.len() != self.arity() {
            return Err(DomainError::Validation(format!(
                "{} expects {} parameter(s), got {}",
                self.name,
                self.arity(),
                values.len()
            ))
            .into());
        }
        Ok(Statement::from_sql_and_values(backend, self.sql, values))
    }
}

pub static REGISTRY: [&NamedQuery; 8] = [
    &bus_stop::SELECT_ALL,
    &bus_stop::SELECT_MAX_ID,
    &operator::SELECT_ALL,
    &operator::SELECT_ROUTES_BY_OPERATOR,
    &operator::SELECT_ALL_FOR_STOP,
    &route::SELECT_ALL,
    &route::SELECT_ALL_FOR_STOP,
    &route::CUMULATIVE_FREQUENCY_BY_OPERATOR,
];

pub fn lookup(name: &str) -> Option<&'static NamedQuery> {
    REGISTRY.iter().copied().find(|q| q.name == name)
}

/// Resolve a registered query by name and bind its parameters.
pub fn statement(backend: DbBackend, name: &str, values: Vec<Value>) -> AppResult<Statement> {
    let query = lookup(name).ok_or_else(|| DomainError::NotFound {
        entity: "NamedQuery",
        field: "name",
        value: name.to_string(),
    })?;
    query.statement(backend, values)
}

/// Compile every registered query against the live schema.
pub async fn verify_all<C: ConnectionTrait>(db: &C) -> AppResult<()> {
    let backend = db.get_database_backend();
    for query in REGISTRY.iter() {
        let values = vec![Value::String(None); query.arity()];
        let explain = format!("EXPLAIN {}", query.sql);
        db.query_all(Statement::from_sql_and_values(backend, explain, values))
            .await?;
        debug!("Named query {} verified", query.name);
    }
    Ok(())
}
