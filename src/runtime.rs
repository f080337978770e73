//! Process bootstrap shared by the CLI: logging and database startup.

use sea_orm::DatabaseConnection;
use tracing::info;

use crate::application::queries::named;
use crate::config::AppConfig;
use crate::infrastructure::{init_database, migrate, DatabaseConfig};
use crate::support::AppResult;

/// Options for opening the store.
#[derive(Debug, Clone)]
pub struct StoreOptions {
    pub database: DatabaseConfig,
    /// Run database migrations on open (default: true).
    pub auto_migrate: bool,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            database: DatabaseConfig::default(),
            auto_migrate: true,
        }
    }
}

/// Connect, migrate and compile every named query.
pub async fn open_store(options: &StoreOptions) -> AppResult<DatabaseConnection> {
    let db = init_database(&options.database).await?;
    if options.auto_migrate {
        migrate(&db).await?;
    }
    named::verify_all(&db).await?;
    info!("{} named queries ready", named::REGISTRY.len());
    Ok(db)
}

/// Initialize tracing (logging) from the application config.
///
/// Call this once at process startup. `RUST_LOG` wins over the configured
/// level.
pub fn init_tracing(config: &AppConfig) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    match config.logging.format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::queries::{bus_stop, QueryForm};

    #[tokio::test]
    async fn test_open_in_memory_store() {
        let db = open_store(&StoreOptions {
            database: DatabaseConfig::in_memory(),
            auto_migrate: true,
        })
        .await
        .unwrap();

        let stops = bus_stop::select_all().fetch(&db, QueryForm::Sql).await.unwrap();
        assert!(stops.is_empty());
    }

    #[tokio::test]
    async fn test_unmigrated_store_fails_verification() {
        let result = open_store(&StoreOptions {
            database: DatabaseConfig::in_memory(),
            auto_migrate: false,
        })
        .await;
        assert!(result.is_err());
    }
}
