//! Lookup helpers shared by the insert operations

use std::collections::HashSet;

use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder};

use crate::infrastructure::database::entities::{bus_stop, operator};
use crate::support::AppResult;

/// Separator between operator names in a route's `operators` field.
pub const OPERATOR_DELIMITER: char = '|';

/// Operators named by an encoded string, split into the ones that exist and
/// the names nothing matched.
#[derive(Debug, Clone, Default)]
pub struct ResolvedOperators {
    pub resolved: HashSet<operator::Model>,
    pub unresolved: Vec<String>,
}

/// Exact-name match. Several operators sharing a name resolve to the lowest id.
pub async fn find_operator_by_name<C: ConnectionTrait>(
    db: &C,
    name: &str,
) -> AppResult<Option<operator::Model>> {
    let model = operator::Entity::find()
        .filter(operator::Column::Name.eq(name))
        .order_by_asc(operator::Column::Id)
        .one(db)
        .await?;
    Ok(model)
}

pub async fn find_bus_stop_with_id<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> AppResult<Option<bus_stop::Model>> {
    Ok(bus_stop::Entity::find_by_id(id).one(db).await?)
}

/// Split `"A|B|C"` into names. A string without a delimiter is one name.
/// Names are trimmed; empty segments are dropped.
pub fn split_operator_names(encoded: &str) -> Vec<&str> {
    let names: Vec<&str> = if encoded.contains(OPERATOR_DELIMITER) {
        encoded.split(OPERATOR_DELIMITER).collect()
    } else {
        vec![encoded]
    };

    names
        .into_iter()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .collect()
}

pub async fn parse_operators_from_encoded_string<C: ConnectionTrait>(
    db: &C,
    encoded: &str,
) -> AppResult<ResolvedOperators> {
    let mut operators = ResolvedOperators::default();
    for name in split_operator_names(encoded) {
        match find_operator_by_name(db, name).await? {
            Some(op) => {
                operators.resolved.insert(op);
            }
            None => operators.unresolved.push(name.to_string()),
        }
    }
    Ok(operators)
}
