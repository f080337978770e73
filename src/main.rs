//! Bus Network CLI
//!
//! ```sh
//! # Create the schema
//! bus-network migrate
//!
//! # Bulk load CSV exports
//! bus-network load --stops stops.csv --operators operators.csv --routes routes.csv
//!
//! # Run a report in any of the three query forms
//! bus-network report operators-for-stop --param "Park Gates" --form named
//! bus-network report cumulative-frequency --param "OK Travel"
//!
//! # Show a route with its stops and operators
//! bus-network route 16A
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use sea_orm::DatabaseConnection;
use serde::Serialize;
use tracing::{error, info};

use bus_network::application::queries::{bus_stop, operator, route};
use bus_network::application::{load_network, NetworkFiles};
use bus_network::runtime::{init_tracing, open_store, StoreOptions};
use bus_network::support::DomainError;
use bus_network::{AppConfig, AppResult, QueryForm, RouteDetails};

/// Bus stops, operators and routes on SQLite.
#[derive(Parser, Debug)]
#[command(name = "bus-network", version, about)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "BUS_NETWORK_CONFIG")]
    config: Option<PathBuf>,

    /// Override the database URL (e.g. sqlite://./net.db?mode=rwc).
    #[arg(long, env = "DATABASE_URL")]
    database: Option<String>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Skip database migrations on startup.
    #[arg(long)]
    no_migrate: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the effective configuration and exit.
    Check,
    /// Apply schema migrations.
    Migrate,
    /// Bulk load stops, operators and routes from CSV files.
    Load {
        #[arg(long)]
        stops: PathBuf,
        #[arg(long)]
        operators: PathBuf,
        #[arg(long)]
        routes: PathBuf,
    },
    /// Run a report and print the result as JSON.
    Report {
        kind: ReportKind,
        /// Operator name or stop description, for reports that take one.
        #[arg(short, long)]
        param: Option<String>,
        /// sql, named or criteria.
        #[arg(short, long, default_value = "criteria")]
        form: QueryForm,
    },
    /// Show one route with its stops, operators and frequency per operator.
    Route { number: String },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ReportKind {
    /// All stops by id
    Stops,
    /// The stop with the highest id
    MaxStop,
    /// All operators by name
    Operators,
    /// Routes run by the operator named by --param
    RoutesByOperator,
    /// Operators serving the stop described by --param
    OperatorsForStop,
    /// All routes by number
    Routes,
    /// Routes serving the stop described by --param
    RoutesForStop,
    /// Summed frequency per operator for the operator named by --param
    CumulativeFrequency,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // ── Load configuration ─────────────────────────────────────
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(bus_network::default_config_path);

    let (mut config, load_error) = match AppConfig::load(&config_path) {
        Ok(cfg) => (cfg, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };
    if let Some(ref level) = cli.log_level {
        config.logging.level = level.clone();
    }

    // Init tracing first so subsequent logs are formatted properly
    init_tracing(&config);
    match load_error {
        None => info!("Configuration loaded from {}", config_path.display()),
        Some(e) if config_path.exists() => {
            error!("Failed to load config from {}: {}", config_path.display(), e);
            error!("Using default configuration.");
        }
        Some(_) => info!("No config at {}, using defaults", config_path.display()),
    }

    run(cli, config).await
}

async fn run(cli: Cli, mut config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(url) = cli.database {
        info!("CLI override: database = {}", url);
        config.database.url = Some(url);
    }

    let options = StoreOptions {
        database: config.database_config(),
        auto_migrate: !cli.no_migrate,
    };

    match cli.command {
        Command::Check => {
            println!("Configuration is valid");
            println!("   Database    : {}", options.database.url);
            println!("   Log level   : {}", config.logging.level);
            println!("   Log format  : {}", config.logging.format);
        }
        Command::Migrate => {
            open_store(&StoreOptions {
                auto_migrate: true,
                ..options
            })
            .await?;
        }
        Command::Load {
            stops,
            operators,
            routes,
        } => {
            let db = open_store(&options).await?;
            let files = NetworkFiles {
                stops,
                operators,
                routes,
            };
            let summary = load_network(&db, &files).await?;
            print_json(&summary)?;
        }
        Command::Report { kind, param, form } => {
            let db = open_store(&options).await?;
            run_report(&db, kind, param.as_deref(), form).await?;
        }
        Command::Route { number } => {
            let db = open_store(&options).await?;
            match RouteDetails::load(&db, &number).await? {
                Some(details) => print_json(&details)?,
                None => {
                    return Err(DomainError::NotFound {
                        entity: "Route",
                        field: "number",
                        value: number,
                    }
                    .into())
                }
            }
        }
    }

    Ok(())
}

async fn run_report(
    db: &DatabaseConnection,
    kind: ReportKind,
    param: Option<&str>,
    form: QueryForm,
) -> AppResult<()> {
    let required = || {
        param.ok_or_else(|| DomainError::Validation(format!("{:?} needs --param", kind)))
    };

    match kind {
        ReportKind::Stops => print_json(&bus_stop::select_all().fetch(db, form).await?),
        ReportKind::MaxStop => print_json(&bus_stop::select_max_id().fetch(db, form).await?),
        ReportKind::Operators => print_json(&operator::select_all().fetch(db, form).await?),
        ReportKind::RoutesByOperator => print_json(
            &operator::select_routes_by_operator(required()?)
                .fetch(db, form)
                .await?,
        ),
        ReportKind::OperatorsForStop => print_json(
            &operator::select_all_for_stop(required()?)
                .fetch(db, form)
                .await?,
        ),
        ReportKind::Routes => print_json(&route::select_all().fetch(db, form).await?),
        ReportKind::RoutesForStop => print_json(
            &route::select_all_for_stop(required()?)
                .fetch(db, form)
                .await?,
        ),
        ReportKind::CumulativeFrequency => print_json(
            &route::cumulative_frequency_by_operator(required()?)
                .fetch(db, form)
                .await?,
        ),
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> AppResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
