//! Relationship views over the stored network
//!
//! The entities only carry foreign keys; these helpers walk the relations
//! to give a route its stops and operators, and an operator its routes.

use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, JoinType, ModelTrait, QueryFilter, QueryOrder,
    QuerySelect, RelationTrait,
};
use serde::Serialize;

use crate::infrastructure::database::entities::{bus_stop, operator, operator_route, route};
use crate::support::AppResult;

/// A route's frequency shared evenly between its operators; `None` when the
/// route has no operators.
pub fn frequency_per_operator(frequency: i32, operator_count: usize) -> Option<f64> {
    if operator_count == 0 {
        None
    } else {
        Some(frequency as f64 / operator_count as f64)
    }
}

/// A route with its stops and operators resolved.
#[derive(Debug, Clone, Serialize)]
pub struct RouteDetails {
    pub route: route::Model,
    pub start_stop: Option<bus_stop::Model>,
    pub destination_stop: Option<bus_stop::Model>,
    /// By name
    pub operators: Vec<operator::Model>,
    pub frequency_per_operator: Option<f64>,
}

impl RouteDetails {
    pub async fn load<C: ConnectionTrait>(db: &C, number: &str) -> AppResult<Option<Self>> {
        let Some(route) = route::Entity::find_by_id(number.to_string()).one(db).await? else {
            return Ok(None);
        };

        let start_stop = route.find_linked(route::RouteToStartStop).one(db).await?;
        let destination_stop = route
            .find_linked(route::RouteToDestinationStop)
            .one(db)
            .await?;
        let operators = route
            .find_related(operator::Entity)
            .order_by_asc(operator::Column::Name)
            .order_by_asc(operator::Column::Id)
            .all(db)
            .await?;

        Ok(Some(Self {
            frequency_per_operator: frequency_per_operator(route.frequency, operators.len()),
            route,
            start_stop,
            destination_stop,
            operators,
        }))
    }
}

/// Routes the operator runs, by number.
pub async fn operator_routes<C: ConnectionTrait>(
    db: &C,
    operator_id: i32,
) -> AppResult<Vec<route::Model>> {
    let routes = route::Entity::find()
        .join(JoinType::InnerJoin, route::Relation::OperatorRoute.def())
        .filter(operator_route::Column::OperatorId.eq(operator_id))
        .order_by_asc(route::Column::Number)
        .all(db)
        .await?;
    Ok(routes)
}

/// Operators running the route, by name.
pub async fn route_operators<C: ConnectionTrait>(
    db: &C,
    number: &str,
) -> AppResult<Vec<operator::Model>> {
    let operators = operator::Entity::find()
        .join(JoinType::InnerJoin, operator::Relation::OperatorRoute.def())
        .filter(operator_route::Column::RouteId.eq(number))
        .order_by_asc(operator::Column::Name)
        .order_by_asc(operator::Column::Id)
        .all(db)
        .await?;
    Ok(operators)
}
