//! Charging station entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "stations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub name: String,

    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,

    pub latitude: f64,
    pub longitude: f64,

    #[sea_orm(nullable)]
    pub per_kwh: Option<f64>,
    #[sea_orm(nullable)]
    pub per_minute: Option<f64>,
    #[sea_orm(nullable)]
    pub session_fee: Option<f64>,
    pub currency: String,

    /// Station status: active, inactive, maintenance
    pub status: String,

    /// Derived sums over the connector rows, refreshed on every write
    pub total_ports: i32,
    pub available_ports: i32,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::connector::Entity")]
    Connectors,
    #[sea_orm(has_many = "super::reservation::Entity")]
    Reservations,
}

impl Related<super::connector::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Connectors.def()
    }
}

impl Related<super::reservation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reservations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
