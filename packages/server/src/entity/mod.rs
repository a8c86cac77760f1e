pub mod item;
pub mod schema_migration;
