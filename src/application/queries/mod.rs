//! Query builders
//!
//! Each report can be run three equivalent ways:
//!
//! - **SQL**: the declarative statement text, bound with its parameters
//! - **Named**: the same statement resolved by name from [`named::REGISTRY`]
//! - **Criteria**: a SeaORM [`Select`] built programmatically, no SQL text
//!
//! All three must agree on rows and order; the tests in each builder module
//! hold them to that.

pub mod bus_stop;
pub mod named;
pub mod operator;
pub mod route;
pub mod utilities;

use std::fmt;
use std::str::FromStr;

use log::debug;
use sea_orm::{ConnectionTrait, EntityTrait, FromQueryResult, Select, Statement, Value};

use crate::support::{AppResult, DomainError};
use named::NamedQuery;

/// Which of the three equivalent query forms to execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryForm {
    Sql,
    Named,
    Criteria,
}

impl QueryForm {
    pub const ALL: [QueryForm; 3] = [QueryForm::Sql, QueryForm::Named, QueryForm::Criteria];
}

impl fmt::Display for QueryForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sql => write!(f, "sql"),
            Self::Named => write!(f, "named"),
            Self::Criteria => write!(f, "criteria"),
        }
    }
}

impl FromStr for QueryForm {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sql" => Ok(Self::Sql),
            "named" => Ok(Self::Named),
            "criteria" => Ok(Self::Criteria),
            other => Err(DomainError::Validation(format!(
                "unknown query form {:?} (expected sql, named or criteria)",
                other
            ))),
        }
    }
}

/// A report returning entity rows.
#[derive(Debug, Clone)]
pub struct EntityReport<E: EntityTrait> {
    query: &'static NamedQuery,
    params: Vec<Value>,
    criteria: Select<E>,
}

impl<E: EntityTrait> EntityReport<E> {
    pub(crate) fn new(query: &'static NamedQuery, params: Vec<Value>, criteria: Select<E>) -> Self {
        Self {
            query,
            params,
            criteria,
        }
    }

    pub fn sql(&self) -> &'static str {
        self.query.sql
    }

    pub fn named_query_name(&self) -> &'static str {
        self.query.name
    }

    pub fn params(&self) -> &[Value] {
        &self.params
    }

    pub fn criteria(&self) -> Select<E> {
        self.criteria.clone()
    }

    pub async fn fetch<C: ConnectionTrait>(
        &self,
        db: &C,
        form: QueryForm,
    ) -> AppResult<Vec<E::Model>> {
        debug!("Running {} ({} form)", self.query.name, form);
        let backend = db.get_database_backend();
        let rows = match form {
            QueryForm::Sql => {
                let stmt = Statement::from_sql_and_values(backend, self.query.sql, self.params.clone());
                E::find().from_raw_sql(stmt).all(db).await?
            }
            QueryForm::Named => {
                let stmt = named::statement(backend, self.query.name, self.params.clone())?;
                E::find().from_raw_sql(stmt).all(db).await?
            }
            QueryForm::Criteria => self.criteria().all(db).await?,
        };
        Ok(rows)
    }
}

#[derive(Debug, FromQueryResult)]
struct ScalarRow {
    value: Option<f64>,
}

/// A report returning one aggregate value. An aggregate over no rows is 0.
#[derive(Debug, Clone)]
pub struct ScalarReport<E: EntityTrait> {
    query: &'static NamedQuery,
    params: Vec<Value>,
    /// Must project exactly one column
    criteria: Select<E>,
}

impl<E: EntityTrait> ScalarReport<E> {
    pub(crate) fn new(query: &'static NamedQuery, params: Vec<Value>, criteria: Select<E>) -> Self {
        Self {
            query,
            params,
            criteria,
        }
    }

    pub fn sql(&self) -> &'static str {
        self.query.sql
    }

    pub fn named_query_name(&self) -> &'static str {
        self.query.name
    }

    pub fn criteria(&self) -> Select<E> {
        self.criteria.clone()
    }

    pub async fn fetch<C: ConnectionTrait>(&self, db: &C, form: QueryForm) -> AppResult<f64> {
        debug!("Running {} ({} form)", self.query.name, form);
        let backend = db.get_database_backend();
        let value = match form {
            QueryForm::Sql => {
                let stmt = Statement::from_sql_and_values(backend, self.query.sql, self.params.clone());
                ScalarRow::find_by_statement(stmt)
                    .one(db)
                    .await?
                    .and_then(|row| row.value)
            }
            QueryForm::Named => {
                let stmt = named::statement(backend, self.query.name, self.params.clone())?;
                ScalarRow::find_by_statement(stmt)
                    .one(db)
                    .await?
                    .and_then(|row| row.value)
            }
            QueryForm::Criteria => self
                .criteria()
                .into_tuple::<Option<f64>>()
                .one(db)
                .await?
                .flatten(),
        };
        Ok(value.unwrap_or(0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_form_parsing() {
        assert_eq!("SQL".parse::<QueryForm>().unwrap(), QueryForm::Sql);
        assert_eq!("named".parse::<QueryForm>().unwrap(), QueryForm::Named);
        assert_eq!("Criteria".parse::<QueryForm>().unwrap(), QueryForm::Criteria);
        assert!("hql".parse::<QueryForm>().is_err());
    }

    #[test]
    fn test_query_form_display_round_trips() {
        for form in QueryForm::ALL {
            assert_eq!(form.to_string().parse::<QueryForm>().unwrap(), form);
        }
    }
}
