//! Connector capacity entity
//!
//! One row per connector type offered at a station.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "connectors")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub station_id: String,

    /// Connector type: CCS, CHAdeMO, Type2, Tesla, J1772
    pub connector_type: String,

    /// Maximum output power in kW
    pub power_kw: f64,

    /// Total physical units of this connector type
    pub count: i32,

    /// Cached free-unit count; display only
    pub available: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::station::Entity",
        from = "Column::StationId",
        to = "super::station::Column::Id"
    )]
    Station,
}

impl Related<super::station::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Station.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
