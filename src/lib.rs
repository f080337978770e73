//! # Bus Network
//!
//! Bus stops, operators and routes mapped onto a relational store with
//! SeaORM, plus the reports run over them.
//!
//! ## Architecture
//!
//! - **infrastructure**: entities, migrations and the database connection
//! - **application**: query builders (SQL, named and criteria forms), inserts,
//!   relationship views and CSV bulk loading
//! - **support**: error types and input-row helpers
//! - **runtime**: logging and database bootstrap shared by the CLI

pub mod application;
pub mod config;
pub mod infrastructure;
pub mod runtime;
pub mod support;

pub use config::{default_config_path, AppConfig};

// Re-export database types for easy access
pub use infrastructure::{init_database, migrate, DatabaseConfig};

pub use application::{QueryForm, RouteDetails};
pub use support::{AppError, AppResult};
