//! Database entities module

pub mod bus_stop;
pub mod operator;
pub mod operator_route;
pub mod route;

pub use bus_stop::Entity as BusStop;
pub use operator::Entity as Operator;
pub use operator_route::Entity as OperatorRoute;
pub use route::Entity as Route;
