//! BusStop queries and insert

use log::info;
use sea_orm::{ActiveModelTrait, ConnectionTrait, EntityTrait, QueryOrder, QuerySelect, Set};

use super::named::NamedQuery;
use super::EntityReport;
use crate::infrastructure::database::entities::bus_stop;
use crate::support::row::{self, Row};
use crate::support::AppResult;

const ENTITY: &str = "BusStop";

pub const SELECT_ALL: NamedQuery = NamedQuery {
    name: "BusStop.selectAll",
    sql: "SELECT id, description FROM bus_stop ORDER BY id ASC",
};

pub const SELECT_MAX_ID: NamedQuery = NamedQuery {
    name: "BusStop.selectMaxId",
    sql: "SELECT id, description FROM bus_stop \
          WHERE id = (SELECT MAX(id) FROM bus_stop)",
};

/// Persist one stop from a row with `id` and `description`.
pub async fn insert<C: ConnectionTrait>(row: &Row, db: &C) -> AppResult<bus_stop::Model> {
    let id = row::required_int(row, ENTITY, "id")?;
    let description = row::required(row, ENTITY, "description")?.trim().to_string();

    let model = bus_stop::ActiveModel {
        id: Set(id),
        description: Set(description),
    };
    let result = model.insert(db).await?;
    info!("Bus stop saved: {} ({})", result.description, result.id);
    Ok(result)
}

/// All stops, ascending by id.
pub fn select_all() -> EntityReport<bus_stop::Entity> {
    EntityReport::new(
        &SELECT_ALL,
        vec![],
        bus_stop::Entity::find().order_by_asc(bus_stop::Column::Id),
    )
}

/// The stop with the highest id: descending order, first row only.
pub fn select_max_id() -> EntityReport<bus_stop::Entity> {
    EntityReport::new(
        &SELECT_MAX_ID,
        vec![],
        bus_stop::Entity::find()
            .order_by_desc(bus_stop::Column::Id)
            .limit(1),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::queries::QueryForm;
    use crate::support::testing::{assert_forms_agree, row, seed_network, setup_db};
    use crate::support::{AppError, InfraError};

    #[tokio::test]
    async fn test_select_all_orders_by_id() {
        let db = setup_db().await;
        for (id, description) in [("9016", "Railway Station"), ("1001", "Park Gates")] {
            insert(&row(&[("id", id), ("description", description)]), &db)
                .await
                .unwrap();
        }
        insert(
            &row(&[("id", "9015"), ("description", "Railway Station")]),
            &db,
        )
        .await
        .unwrap();

        let stops = select_all().fetch(&db, QueryForm::Sql).await.unwrap();
        let ids: Vec<i32> = stops.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![1001, 9015, 9016]);
        assert_eq!(stops[1].description, "Railway Station");
    }

    #[tokio::test]
    async fn test_select_all_forms_agree() {
        let db = setup_db().await;
        seed_network(&db).await;
        let stops = assert_forms_agree(&select_all(), &db).await;
        assert_eq!(stops.len(), 6);
    }

    #[tokio::test]
    async fn test_select_max_id() {
        let db = setup_db().await;
        seed_network(&db).await;

        let stops = assert_forms_agree(&select_max_id(), &db).await;
        assert_eq!(stops.len(), 1);
        assert_eq!(stops[0].id, 9016);
    }

    #[tokio::test]
    async fn test_select_max_id_on_empty_table() {
        let db = setup_db().await;
        let stops = assert_forms_agree(&select_max_id(), &db).await;
        assert!(stops.is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_id_is_rejected() {
        let db = setup_db().await;
        let r = row(&[("id", "9015"), ("description", "Railway Station")]);
        insert(&r, &db).await.unwrap();

        let err = insert(&r, &db).await.unwrap_err();
        assert!(matches!(err, AppError::Infra(InfraError::Database(_))));
    }

    #[tokio::test]
    async fn test_malformed_id() {
        let db = setup_db().await;
        let err = insert(&row(&[("id", "90x5"), ("description", "Haymarket")]), &db)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("BusStop.id"));
    }
}
