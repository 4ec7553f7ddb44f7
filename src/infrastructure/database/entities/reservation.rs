//! Reservation entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "reservations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub user_id: String,
    pub station_id: String,

    /// Connector type: CCS, CHAdeMO, Type2, Tesla, J1772
    pub connector_type: String,

    pub start_time: DateTimeUtc,
    pub end_time: DateTimeUtc,

    pub estimated_cost: f64,

    /// Reservation status: pending, confirmed, active, completed, cancelled
    pub status: String,

    #[sea_orm(nullable)]
    pub vehicle_make: Option<String>,
    #[sea_orm(nullable)]
    pub vehicle_model: Option<String>,
    #[sea_orm(nullable)]
    pub battery_capacity_kwh: Option<f64>,
    #[sea_orm(nullable)]
    pub current_charge_percent: Option<i32>,

    #[sea_orm(nullable)]
    pub payment_method: Option<String>,
    #[sea_orm(nullable)]
    pub payment_transaction_id: Option<String>,

    #[sea_orm(nullable)]
    pub notes: Option<String>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::station::Entity",
        from = "Column::StationId",
        to = "super::station::Column::Id"
    )]
    Station,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
}

impl Related<super::station::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Station.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
