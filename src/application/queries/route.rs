//! Route queries and insert
//!
//! "Frequency per operator" is a route's frequency divided by the number of
//! operators sharing it; the cumulative report sums that share over every
//! route an operator runs.

use log::{info, warn};
use sea_orm::sea_query::{Alias, Expr, Func, Query, SimpleExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, JoinType, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Set,
};

use super::named::NamedQuery;
use super::utilities::{self, ResolvedOperators};
use super::{EntityReport, ScalarReport};
use crate::infrastructure::database::entities::{bus_stop, operator, operator_route, route};
use crate::support::row::{self, Row};
use crate::support::{AppResult, DomainError};

const ENTITY: &str = "Route";

pub const SELECT_ALL: NamedQuery = NamedQuery {
    name: "Route.selectAll",
    sql: "SELECT number, frequency, start_stop_id, destination_stop_id FROM route \
          ORDER BY number ASC",
};

pub const SELECT_ALL_FOR_STOP: NamedQuery = NamedQuery {
    name: "Route.selectAllForStop",
    sql: "SELECT DISTINCT r.number, r.frequency, r.start_stop_id, r.destination_stop_id \
          FROM route r \
          LEFT JOIN bus_stop start_stop ON start_stop.id = r.start_stop_id \
          LEFT JOIN bus_stop destination_stop ON destination_stop.id = r.destination_stop_id \
          WHERE start_stop.description = ? OR destination_stop.description = ? \
          ORDER BY r.number ASC",
};

pub const CUMULATIVE_FREQUENCY_BY_OPERATOR: NamedQuery = NamedQuery {
    name: "Route.cumulativeFrequencyByOperator",
    sql: "SELECT SUM(CAST(r.frequency AS REAL) / \
          (SELECT COUNT(peer.route_id) FROM operator_route peer WHERE peer.route_id = r.number)) \
          AS value \
          FROM route r \
          JOIN operator_route link ON link.route_id = r.number \
          JOIN operator o ON o.id = link.operator_id \
          WHERE o.name = ?",
};

/// A stored route and how its `operators` field resolved.
#[derive(Debug, Clone)]
pub struct InsertedRoute {
    pub route: route::Model,
    pub operators: ResolvedOperators,
}

/// Persist one route from a row with `number`, `frequency`, `start`,
/// `destination` and `operators` (`|`-separated names).
///
/// Both stops must exist. Operator names that match nothing are skipped
/// with a warning and reported back in [`InsertedRoute::operators`].
pub async fn insert<C: ConnectionTrait>(row: &Row, db: &C) -> AppResult<InsertedRoute> {
    let number = row::required(row, ENTITY, "number")?.trim().to_string();
    if number.is_empty() {
        return Err(DomainError::Validation("Route number must not be empty".to_string()).into());
    }
    let frequency = row::required_int(row, ENTITY, "frequency")?;
    let start_id = row::required_int(row, ENTITY, "start")?;
    let destination_id = row::required_int(row, ENTITY, "destination")?;
    let encoded_operators = row::required(row, ENTITY, "operators")?;

    let start = require_stop(db, start_id).await?;
    let destination = require_stop(db, destination_id).await?;
    let operators = utilities::parse_operators_from_encoded_string(db, encoded_operators).await?;

    let model = route::ActiveModel {
        number: Set(number),
        frequency: Set(frequency),
        start_stop_id: Set(start.id),
        destination_stop_id: Set(destination.id),
    };
    let result = model.insert(db).await?;

    for op in &operators.resolved {
        operator_route::ActiveModel {
            operator_id: Set(op.id),
            route_id: Set(result.number.clone()),
        }
        .insert(db)
        .await?;
    }
    for name in &operators.unresolved {
        warn!("Route {}: operator {:?} not found, left unlinked", result.number, name);
    }

    info!(
        "Route saved: {} ({} -> {}, {} operator(s))",
        result.number,
        start.description,
        destination.description,
        operators.resolved.len()
    );
    Ok(InsertedRoute {
        route: result,
        operators,
    })
}

async fn require_stop<C: ConnectionTrait>(db: &C, id: i32) -> AppResult<bus_stop::Model> {
    utilities::find_bus_stop_with_id(db, id)
        .await?
        .ok_or_else(|| {
            DomainError::NotFound {
                entity: "BusStop",
                field: "id",
                value: id.to_string(),
            }
            .into()
        })
}

/// All routes, by number.
pub fn select_all() -> EntityReport<route::Entity> {
    EntityReport::new(
        &SELECT_ALL,
        vec![],
        route::Entity::find().order_by_asc(route::Column::Number),
    )
}

/// Routes starting or ending at a stop described as `description`.
pub fn select_all_for_stop(description: &str) -> EntityReport<route::Entity> {
    let start_stop = Alias::new("start_stop");
    let destination_stop = Alias::new("destination_stop");

    EntityReport::new(
        &SELECT_ALL_FOR_STOP,
        vec![description.into(), description.into()],
        route::Entity::find()
            .join_as(
                JoinType::LeftJoin,
                route::Relation::StartStop.def(),
                start_stop.clone(),
            )
            .join_as(
                JoinType::LeftJoin,
                route::Relation::DestinationStop.def(),
                destination_stop.clone(),
            )
            .filter(
                Condition::any()
                    .add(Expr::col((start_stop, bus_stop::Column::Description)).eq(description))
                    .add(
                        Expr::col((destination_stop, bus_stop::Column::Description))
                            .eq(description),
                    ),
            )
            .distinct()
            .order_by_asc(route::Column::Number),
    )
}

/// Sum of frequency-per-operator over every route the operator called
/// `name` runs.
pub fn cumulative_frequency_by_operator(name: &str) -> ScalarReport<route::Entity> {
    let peer = Alias::new("peer");
    let operator_count = Query::select()
        .expr(Func::count(Expr::col((
            peer.clone(),
            operator_route::Column::RouteId,
        ))))
        .from_as(operator_route::Entity, peer.clone())
        .and_where(
            Expr::col((peer, operator_route::Column::RouteId))
                .equals((route::Entity, route::Column::Number)),
        )
        .to_owned();

    let per_operator = Expr::expr(Func::cast_as(
        Expr::col((route::Entity, route::Column::Frequency)),
        Alias::new("REAL"),
    ))
    .div(SimpleExpr::SubQuery(
        None,
        Box::new(operator_count.into_sub_query_statement()),
    ));

    ScalarReport::new(
        &CUMULATIVE_FREQUENCY_BY_OPERATOR,
        vec![name.into()],
        route::Entity::find()
            .select_only()
            .column_as(SimpleExpr::from(Func::sum(per_operator)), "value")
            .join(JoinType::InnerJoin, route::Relation::OperatorRoute.def())
            .join(JoinType::InnerJoin, operator_route::Relation::Operator.def())
            .filter(operator::Column::Name.eq(name)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::queries::QueryForm;
    use crate::support::testing::{assert_forms_agree, row, seed_network, setup_db};
    use crate::support::AppError;

    fn numbers(routes: &[route::Model]) -> Vec<&str> {
        routes.iter().map(|r| r.number.as_str()).collect()
    }

    #[tokio::test]
    async fn test_select_all_orders_by_number() {
        let db = setup_db().await;
        seed_network(&db).await;

        let routes = assert_forms_agree(&select_all(), &db).await;
        assert_eq!(numbers(&routes), vec!["1", "16A", "2", "21", "X1"]);
    }

    #[tokio::test]
    async fn test_routes_for_railway_station() {
        let db = setup_db().await;
        seed_network(&db).await;

        // 16A starts at 9015, 21 ends at 9016; both are "Railway Station"
        let routes = assert_forms_agree(&select_all_for_stop("Railway Station"), &db).await;
        assert_eq!(numbers(&routes), vec!["16A", "21"]);
    }

    #[tokio::test]
    async fn test_route_starting_and_ending_at_stop_listed_once() {
        let db = setup_db().await;
        seed_network(&db).await;
        insert(
            &row(&[
                ("number", "C1"),
                ("frequency", "3"),
                ("start", "9015"),
                ("destination", "9016"),
                ("operators", "Arriva"),
            ]),
            &db,
        )
        .await
        .unwrap();

        let routes = assert_forms_agree(&select_all_for_stop("Railway Station"), &db).await;
        assert_eq!(numbers(&routes), vec!["16A", "21", "C1"]);
    }

    #[tokio::test]
    async fn test_cumulative_frequency_for_ok_travel() {
        let db = setup_db().await;
        seed_network(&db).await;

        // route 1: 6 / 2, route 16A: 4 / 1, route 2: 12 / 3
        let report = cumulative_frequency_by_operator("OK Travel");
        for form in QueryForm::ALL {
            let total = report.fetch(&db, form).await.unwrap();
            assert!((total - 11.0).abs() < 1e-9, "{form}: {total}");
        }
    }

    #[tokio::test]
    async fn test_cumulative_frequency_for_operator_without_routes() {
        let db = setup_db().await;
        seed_network(&db).await;
        crate::application::queries::operator::insert(&row(&[("name", "Idle Coaches")]), &db)
            .await
            .unwrap();

        let report = cumulative_frequency_by_operator("Idle Coaches");
        for form in QueryForm::ALL {
            assert_eq!(report.fetch(&db, form).await.unwrap(), 0.0);
        }
    }

    #[tokio::test]
    async fn test_insert_links_operators() {
        let db = setup_db().await;
        seed_network(&db).await;

        let inserted = insert(
            &row(&[
                ("number", "Q3"),
                ("frequency", "5"),
                ("start", "1002"),
                ("destination", "1003"),
                ("operators", "Arriva|OK Travel|Mystery Coaches"),
            ]),
            &db,
        )
        .await
        .unwrap();

        assert_eq!(inserted.route.number, "Q3");
        assert_eq!(inserted.operators.resolved.len(), 2);
        assert_eq!(inserted.operators.unresolved, vec!["Mystery Coaches".to_string()]);

        let links = operator_route::Entity::find()
            .filter(operator_route::Column::RouteId.eq("Q3"))
            .all(&db)
            .await
            .unwrap();
        assert_eq!(links.len(), 2);
    }

    #[tokio::test]
    async fn test_insert_with_missing_stop_fails() {
        let db = setup_db().await;
        seed_network(&db).await;

        let err = insert(
            &row(&[
                ("number", "Z1"),
                ("frequency", "5"),
                ("start", "1002"),
                ("destination", "4040"),
                ("operators", "Arriva"),
            ]),
            &db,
        )
        .await
        .unwrap_err();
        assert!(matches!(
            err,
            AppError::Domain(DomainError::NotFound { entity: "BusStop", .. })
        ));
        assert!(route::Entity::find_by_id("Z1".to_string())
            .one(&db)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_insert_with_bad_frequency_fails() {
        let db = setup_db().await;
        seed_network(&db).await;

        let err = insert(
            &row(&[
                ("number", "Z2"),
                ("frequency", "every 10 minutes"),
                ("start", "1002"),
                ("destination", "1003"),
                ("operators", "Arriva"),
            ]),
            &db,
        )
        .await
        .unwrap_err();
        assert!(matches!(
            err,
            AppError::Domain(DomainError::InvalidNumber { field: "frequency", .. })
        ));
    }
}
