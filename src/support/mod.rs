pub mod errors;
pub mod row;

#[cfg(test)]
pub mod testing;

pub use errors::{AppError, AppResult, DomainError, InfraError};
pub use row::Row;
