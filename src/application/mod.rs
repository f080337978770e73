//! Application layer: query builders, relationship views and bulk loading

pub mod loader;
pub mod network;
pub mod queries;

pub use loader::{load_network, load_rows, LoadSummary, NetworkFiles, NetworkRows};
pub use network::RouteDetails;
pub use queries::{EntityReport, QueryForm, ScalarReport};
