//! Operator queries and insert

use log::info;
use sea_orm::sea_query::{Alias, Expr};
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, Condition, ConnectionTrait, EntityTrait,
    JoinType, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
};

use super::named::NamedQuery;
use super::EntityReport;
use crate::infrastructure::database::entities::{bus_stop, operator, operator_route, route};
use crate::support::row::{self, Row};
use crate::support::{AppResult, DomainError};

const ENTITY: &str = "Operator";

pub const SELECT_ALL: NamedQuery = NamedQuery {
    name: "Operator.selectAll",
    sql: "SELECT id, name, street, town, postcode, email, phone FROM operator \
          ORDER BY name ASC, id ASC",
};

pub const SELECT_ROUTES_BY_OPERATOR: NamedQuery = NamedQuery {
    name: "Operator.selectRoutesByOperator",
    sql: "SELECT DISTINCT r.number, r.frequency, r.start_stop_id, r.destination_stop_id \
          FROM route r \
          JOIN operator_route link ON link.route_id = r.number \
          JOIN operator o ON o.id = link.operator_id \
          WHERE o.name = ? \
          ORDER BY r.number ASC",
};

pub const SELECT_ALL_FOR_STOP: NamedQuery = NamedQuery {
    name: "Operator.selectAllForStop",
    sql: "SELECT DISTINCT o.id, o.name, o.street, o.town, o.postcode, o.email, o.phone \
          FROM operator o \
          JOIN operator_route link ON link.operator_id = o.id \
          JOIN route r ON r.number = link.route_id \
          LEFT JOIN bus_stop start_stop ON start_stop.id = r.start_stop_id \
          LEFT JOIN bus_stop destination_stop ON destination_stop.id = r.destination_stop_id \
          WHERE start_stop.description = ? OR destination_stop.description = ? \
          ORDER BY o.name ASC, o.id ASC",
};

/// Persist one operator. Only `name` is required; an `id` column, when
/// present, is used instead of a generated key.
pub async fn insert<C: ConnectionTrait>(row: &Row, db: &C) -> AppResult<operator::Model> {
    let name = row::required(row, ENTITY, "name")?.trim().to_string();
    if name.is_empty() {
        return Err(DomainError::Validation("Operator name must not be empty".to_string()).into());
    }

    let model = operator::ActiveModel {
        id: match row::optional_int(row, ENTITY, "id")? {
            Some(id) => Set(id),
            None => NotSet,
        },
        name: Set(name),
        street: Set(row::optional(row, "street")),
        town: Set(row::optional(row, "town")),
        postcode: Set(row::optional(row, "postcode")),
        email: Set(row::optional(row, "email")),
        phone: Set(row::optional(row, "phone")),
    };
    let result = model.insert(db).await?;
    info!("Operator saved: {} ({})", result.name, result.id);
    Ok(result)
}

/// All operators, by name.
pub fn select_all() -> EntityReport<operator::Entity> {
    EntityReport::new(
        &SELECT_ALL,
        vec![],
        operator::Entity::find()
            .order_by_asc(operator::Column::Name)
            .order_by_asc(operator::Column::Id),
    )
}

/// Routes run by the operator called `name`, by route number.
pub fn select_routes_by_operator(name: &str) -> EntityReport<route::Entity> {
    EntityReport::new(
        &SELECT_ROUTES_BY_OPERATOR,
        vec![name.into()],
        route::Entity::find()
            .join(JoinType::InnerJoin, route::Relation::OperatorRoute.def())
            .join(JoinType::InnerJoin, operator_route::Relation::Operator.def())
            .filter(operator::Column::Name.eq(name))
            .distinct()
            .order_by_asc(route::Column::Number),
    )
}

/// Operators with at least one route starting or ending at a stop described
/// as `description`. Each operator appears once.
pub fn select_all_for_stop(description: &str) -> EntityReport<operator::Entity> {
    let start_stop = Alias::new("start_stop");
    let destination_stop = Alias::new("destination_stop");

    EntityReport::new(
        &SELECT_ALL_FOR_STOP,
        vec![description.into(), description.into()],
        operator::Entity::find()
            .join(JoinType::InnerJoin, operator::Relation::OperatorRoute.def())
            .join(JoinType::InnerJoin, operator_route::Relation::Route.def())
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
            .order_by_asc(operator::Column::Name)
            .order_by_asc(operator::Column::Id),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::queries::{route as route_queries, QueryForm};
    use crate::support::testing::{assert_forms_agree, row, seed_network, setup_db};

    fn names(ops: &[operator::Model]) -> Vec<&str> {
        ops.iter().map(|o| o.name.as_str()).collect()
    }

    #[tokio::test]
    async fn test_insert_with_contact_details() {
        let db = setup_db().await;
        let op = insert(
            &row(&[
                ("name", "Diamond Buses"),
                ("street", "1 High Street"),
                ("town", "Newcastle"),
                ("postcode", "NE1 1AA"),
                ("email", "info@diamond.example"),
                ("phone", ""),
            ]),
            &db,
        )
        .await
        .unwrap();

        assert!(op.id > 0);
        assert_eq!(op.town.as_deref(), Some("Newcastle"));
        assert_eq!(op.phone, None);
    }

    #[tokio::test]
    async fn test_insert_keeps_supplied_id() {
        let db = setup_db().await;
        let op = insert(&row(&[("id", "42"), ("name", "Arriva")]), &db)
            .await
            .unwrap();
        assert_eq!(op.id, 42);
    }

    #[tokio::test]
    async fn test_insert_requires_name() {
        let db = setup_db().await;
        assert!(insert(&row(&[("town", "Gateshead")]), &db).await.is_err());
        assert!(insert(&row(&[("name", "  ")]), &db).await.is_err());
    }

    #[tokio::test]
    async fn test_select_all_orders_by_name() {
        let db = setup_db().await;
        seed_network(&db).await;

        let ops = assert_forms_agree(&select_all(), &db).await;
        assert_eq!(
            names(&ops),
            vec!["Arriva", "Diamond Buses", "Go North East", "OK Travel"]
        );
    }

    #[tokio::test]
    async fn test_routes_by_diamond_buses() {
        let db = setup_db().await;
        seed_network(&db).await;

        let routes = assert_forms_agree(&select_routes_by_operator("Diamond Buses"), &db).await;
        let numbers: Vec<&str> = routes.iter().map(|r| r.number.as_str()).collect();
        assert_eq!(numbers, vec!["1", "2"]);
    }

    #[tokio::test]
    async fn test_new_route_shows_up_for_its_operator() {
        let db = setup_db().await;
        seed_network(&db).await;

        route_queries::insert(
            &row(&[
                ("number", "X9"),
                ("frequency", "1"),
                ("start", "1003"),
                ("destination", "9015"),
                ("operators", "Diamond Buses"),
            ]),
            &db,
        )
        .await
        .unwrap();

        let routes = select_routes_by_operator("Diamond Buses")
            .fetch(&db, QueryForm::Criteria)
            .await
            .unwrap();
        assert!(routes.iter().any(|r| r.number == "X9"));
    }

    #[tokio::test]
    async fn test_routes_by_unknown_operator() {
        let db = setup_db().await;
        seed_network(&db).await;

        let routes = assert_forms_agree(&select_routes_by_operator("Nobody"), &db).await;
        assert!(routes.is_empty());
    }

    #[tokio::test]
    async fn test_operators_serving_park_gates() {
        let db = setup_db().await;
        seed_network(&db).await;

        // routes 1 (from Park Gates) and 2 (to Park Gates); OK Travel and
        // Diamond Buses run both but must appear once
        let ops = assert_forms_agree(&select_all_for_stop("Park Gates"), &db).await;
        assert_eq!(
            names(&ops),
            vec!["Diamond Buses", "Go North East", "OK Travel"]
        );
    }

    #[tokio::test]
    async fn test_operators_serving_unknown_stop() {
        let db = setup_db().await;
        seed_network(&db).await;

        let ops = assert_forms_agree(&select_all_for_stop("Nowhere"), &db).await;
        assert!(ops.is_empty());
    }
}
