//! Create stations table
//!
//! Holds the charging station registry. Port totals are derived projections
//! over the connectors table, refreshed on every station write.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Stations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Stations::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Stations::Name).string().not_null())
                    .col(ColumnDef::new(Stations::Street).string().not_null())
                    .col(ColumnDef::new(Stations::City).string().not_null())
                    .col(ColumnDef::new(Stations::State).string().not_null())
                    .col(ColumnDef::new(Stations::ZipCode).string().not_null())
                    .col(
                        ColumnDef::new(Stations::Country)
                            .string()
                            .not_null()
                            .default("USA"),
                    )
                    .col(ColumnDef::new(Stations::Latitude).double().not_null())
                    .col(ColumnDef::new(Stations::Longitude).double().not_null())
                    .col(ColumnDef::new(Stations::PerKwh).double())
                    .col(ColumnDef::new(Stations::PerMinute).double())
                    .col(ColumnDef::new(Stations::SessionFee).double())
                    .col(
                        ColumnDef::new(Stations::Currency)
                            .string()
                            .not_null()
                            .default("USD"),
                    )
                    .col(
                        ColumnDef::new(Stations::Status)
                            .string()
                            .not_null()
                            .default("active"),
                    )
                    .col(
                        ColumnDef::new(Stations::TotalPorts)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Stations::AvailablePorts)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Stations::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Stations::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_stations_city")
                    .table(Stations::Table)
                    .col(Stations::City)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_stations_status")
                    .table(Stations::Table)
                    .col(Stations::Status)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Stations::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Stations {
    Table,
    Id,
    Name,
    Street,
    City,
    State,
    ZipCode,
    Country,
    Latitude,
    Longitude,
    PerKwh,
    PerMinute,
    SessionFee,
    Currency,
    Status,
    TotalPorts,
    AvailablePorts,
    CreatedAt,
    UpdatedAt,
}
