use std::collections::HashSet;
use std::time::Duration;

use chrono::Utc;
use sea_orm::sea_query::{ColumnDef, Index, Table};
use sea_orm::*;
use tracing::info;

use crate::entity::{item, schema_migration};

pub async fn init_db(db_url: &str, max_connections: u32) -> Result<DatabaseConnection, DbErr> {
    let mut opt = ConnectOptions::new(db_url.to_owned());

    // Set connection pool options
    opt.max_connections(max_connections)
        .min_connections(1)
        .connect_timeout(Duration::from_secs(8))
        .acquire_timeout(Duration::from_secs(8))
        .idle_timeout(Duration::from_secs(60))
        .sqlx_logging(true);

    let db = Database::connect(opt).await?;
    migrate(&db).await?;

    Ok(db)
}

/// A schema change applied exactly once, in `version` order.
struct Migration {
    version: i32,
    name: &'static str,
    statements: fn(DbBackend) -> Vec<Statement>,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "create_items",
        statements: create_items,
    },
    Migration {
        version: 2,
        name: "index_items_name",
        statements: index_items_name,
    },
];

fn create_items(backend: DbBackend) -> Vec<Statement> {
    let stmt = Table::create()
        .table(item::Entity)
        .if_not_exists()
        .col(
            ColumnDef::new(item::Column::Id)
                .integer()
                .not_null()
                .auto_increment()
                .primary_key(),
        )
        .col(ColumnDef::new(item::Column::Name).text().not_null())
        .col(ColumnDef::new(item::Column::Category).text().not_null())
        .col(ColumnDef::new(item::Column::ImageName).text().not_null())
        .to_owned();

    vec![backend.build(&stmt)]
}

fn index_items_name(backend: DbBackend) -> Vec<Statement> {
    // Speeds up keyword search prefix scans; substring matches still scan.
    let stmt = Index::create()
        .if_not_exists()
        .name("idx_items_name")
        .table(item::Entity)
        .col(item::Column::Name)
        .to_owned();

    vec![backend.build(&stmt)]
}

async fn ensure_migrations_table(db: &DatabaseConnection) -> Result<(), DbErr> {
    let stmt = Table::create()
        .table(schema_migration::Entity)
        .if_not_exists()
        .col(
            ColumnDef::new(schema_migration::Column::Version)
                .integer()
                .not_null()
                .primary_key(),
        )
        .col(ColumnDef::new(schema_migration::Column::Name).text().not_null())
        .col(
            ColumnDef::new(schema_migration::Column::AppliedAt)
                .timestamp_with_time_zone()
                .not_null(),
        )
        .to_owned();

    db.execute_raw(db.get_database_backend().build(&stmt))
        .await?;
    Ok(())
}

/// Bring the schema up to date. Safe to call on every startup.
pub async fn migrate(db: &DatabaseConnection) -> Result<(), DbErr> {
    ensure_migrations_table(db).await?;

    let applied: HashSet<i32> = schema_migration::Entity::find()
        .all(db)
        .await?
        .into_iter()
        .map(|m| m.version)
        .collect();

    let backend = db.get_database_backend();
    let mut applied_now = 0u32;

    for migration in MIGRATIONS {
        if applied.contains(&migration.version) {
            continue;
        }

        let txn = db.begin().await?;
        for stmt in (migration.statements)(backend) {
            txn.execute_raw(stmt).await?;
        }
        schema_migration::ActiveModel {
            version: Set(migration.version),
            name: Set(migration.name.to_string()),
            applied_at: Set(Utc::now()),
        }
        .insert(&txn)
        .await?;
        txn.commit().await?;

        info!(
            version = migration.version,
            name = migration.name,
            "Applied migration"
        );
        applied_now += 1;
    }

    if applied_now == 0 {
        info!("Database schema is up to date");
    }

    Ok(())
}
