//! Operator entity

use std::hash::{Hash, Hasher};

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "operator")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub name: String,

    #[sea_orm(nullable)]
    pub street: Option<String>,

    #[sea_orm(nullable)]
    pub town: Option<String>,

    #[sea_orm(nullable)]
    pub postcode: Option<String>,

    #[sea_orm(nullable)]
    pub email: Option<String>,

    #[sea_orm(nullable)]
    pub phone: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::operator_route::Entity")]
    OperatorRoute,
}

impl Related<super::operator_route::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OperatorRoute.def()
    }
}

/// Operators reach their routes through the join table.
impl Related<super::route::Entity> for Entity {
    fn to() -> RelationDef {
        super::operator_route::Relation::Route.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::operator_route::Relation::Operator.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl PartialEq for Model {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Model {}

impl Hash for Model {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
