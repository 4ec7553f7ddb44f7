//! Create connectors table
//!
//! One row per connector type per station, carrying the physical unit count
//! the admission engine checks against.

use sea_orm_migration::prelude::*;

use super::m20240101_000002_create_stations::Stations;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Connectors::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Connectors::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Connectors::StationId).string().not_null())
                    .col(
                        ColumnDef::new(Connectors::ConnectorType)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Connectors::PowerKw).double().not_null())
                    .col(ColumnDef::new(Connectors::Count).integer().not_null())
                    .col(ColumnDef::new(Connectors::Available).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_connectors_station")
                            .from(Connectors::Table, Connectors::StationId)
                            .to(Stations::Table, Stations::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_connectors_station_type")
                    .table(Connectors::Table)
                    .col(Connectors::StationId)
                    .col(Connectors::ConnectorType)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Connectors::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Connectors {
    Table,
    Id,
    StationId,
    ConnectorType,
    PowerKw,
    Count,
    Available,
}
