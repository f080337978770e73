//! Route entity
//!
//! A route references two stops, so the stop relation cannot go through a
//! single `Related` impl; the [`RouteToStartStop`] and
//! [`RouteToDestinationStop`] links name each path instead.

use std::hash::{Hash, Hasher};

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "route")]
pub struct Model {
    /// Route "number"; alphanumeric in practice (e.g. "16A")
    #[sea_orm(primary_key, auto_increment = false)]
    pub number: String,

    /// Departures per hour
    pub frequency: i32,

    pub start_stop_id: i32,

    pub destination_stop_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::bus_stop::Entity",
        from = "Column::StartStopId",
        to = "super::bus_stop::Column::Id"
    )]
    StartStop,
    #[sea_orm(
        belongs_to = "super::bus_stop::Entity",
        from = "Column::DestinationStopId",
        to = "super::bus_stop::Column::Id"
    )]
    DestinationStop,
    #[sea_orm(has_many = "super::operator_route::Entity")]
    OperatorRoute,
}

impl Related<super::operator_route::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OperatorRoute.def()
    }
}

impl Related<super::operator::Entity> for Entity {
    fn to() -> RelationDef {
        super::operator_route::Relation::Operator.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::operator_route::Relation::Route.def().rev())
    }
}

#[derive(Debug)]
pub struct RouteToStartStop;

impl Linked for RouteToStartStop {
    type FromEntity = Entity;
    type ToEntity = super::bus_stop::Entity;

    fn link(&self) -> Vec<RelationDef> {
        vec![Relation::StartStop.def()]
    }
}

#[derive(Debug)]
pub struct RouteToDestinationStop;

impl Linked for RouteToDestinationStop {
    type FromEntity = Entity;
    type ToEntity = super::bus_stop::Entity;

    fn link(&self) -> Vec<RelationDef> {
        vec![Relation::DestinationStop.def()]
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl PartialEq for Model {
    fn eq(&self, other: &Self) -> bool {
        self.number == other.number
    }
}

impl Eq for Model {}

impl Hash for Model {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.number.hash(state);
    }
}
