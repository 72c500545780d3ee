//! Connections and schema setup shared by the sea-orm suites.

use std::time::Duration;

use sea_orm::sea_query::Table;
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, EntityTrait, Schema,
};
use test_harness::TestConfig;
use tracing::debug;

use crate::config::db::{db_url, sanitize_db_url, DbKind};
use crate::error::SuiteError;

/// Connect to the backend named by the run's configuration.
pub async fn connect(config: &TestConfig) -> Result<DatabaseConnection, SuiteError> {
    let kind = DbKind::parse(&config.backend)?;
    connect_kind(kind).await
}

/// Connect to a specific engine regardless of the configured backend.
///
/// The pool holds a single connection: in-memory SQLite databases are
/// per-connection, and PostgreSQL temporary objects must stay visible to
/// every statement of a case.
pub async fn connect_kind(kind: DbKind) -> Result<DatabaseConnection, SuiteError> {
    let url = db_url(kind)?;
    debug!(db = ?kind, url = %sanitize_db_url(&url), "connecting");

    let mut opt = ConnectOptions::new(url);
    opt.min_connections(1)
        .max_connections(1)
        .acquire_timeout(Duration::from_secs(5))
        .sqlx_logging(false);

    Ok(Database::connect(opt).await?)
}

/// `CREATE TABLE IF NOT EXISTS` derived from the entity definition.
pub async fn create_table<C, E>(db: &C, entity: E) -> Result<(), DbErr>
where
    C: ConnectionTrait,
    E: EntityTrait,
{
    let backend = db.get_database_backend();
    let mut stmt = Schema::new(backend).create_table_from_entity(entity);
    stmt.if_not_exists();
    db.execute(backend.build(&stmt)).await?;
    Ok(())
}

pub async fn drop_table<C, E>(db: &C, entity: E) -> Result<(), DbErr>
where
    C: ConnectionTrait,
    E: EntityTrait,
{
    let backend = db.get_database_backend();
    let stmt = Table::drop().table(entity).if_exists().to_owned();
    db.execute(backend.build(&stmt)).await?;
    Ok(())
}
