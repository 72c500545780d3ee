//! Schema migrations through `sea-orm-migration`'s [`SchemaManager`].
//!
//! Runs against PostgreSQL, where the manager can introspect tables, columns
//! and indexes. Every case works on its own scratch table.

use sea_orm::DbErr;
use sea_orm_migration::prelude::*;
use test_harness::{cases, check, CaseResult, TestCase, TestConfig, TestSuite};
use test_support::unique_ident;

use crate::config::db::DbKind;
use crate::db;

pub const NAME: &str = "orm_suites::migrate";

pub struct MigrateSuite;

impl TestSuite for MigrateSuite {
    fn name(&self) -> &str {
        NAME
    }

    fn cases(&self) -> Vec<TestCase> {
        cases![
            creates_and_drops_tables,
            adds_and_drops_columns,
            renames_columns,
            creates_and_drops_indexes,
            migrations_apply_and_revert,
        ]
    }
}

pub fn suite() -> Box<dyn TestSuite> {
    Box::new(MigrateSuite)
}

/// Creates a `person` table on `up` and drops it on `down`.
struct CreatePerson {
    table: String,
}

impl MigrationName for CreatePerson {
    fn name(&self) -> &str {
        "m0001_create_person"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for CreatePerson {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.create_table(person_table(&self.table)).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Alias::new(&self.table)).to_owned())
            .await
    }
}

fn person_table(name: &str) -> TableCreateStatement {
    Table::create()
        .table(Alias::new(name))
        .col(
            ColumnDef::new(Alias::new("id"))
                .integer()
                .not_null()
                .auto_increment()
                .primary_key(),
        )
        .col(ColumnDef::new(Alias::new("name")).string().not_null())
        .to_owned()
}

async fn create_scratch(manager: &SchemaManager<'_>) -> Result<String, DbErr> {
    let table = unique_ident("mig_person");
    manager.create_table(person_table(&table)).await?;
    Ok(table)
}

async fn drop_scratch(manager: &SchemaManager<'_>, table: &str) -> Result<(), DbErr> {
    manager
        .drop_table(Table::drop().table(Alias::new(table)).if_exists().to_owned())
        .await
}

async fn creates_and_drops_tables(_config: TestConfig) -> CaseResult {
    let conn = db::connect_kind(DbKind::Postgres).await?;
    let manager = SchemaManager::new(&conn);

    let table = create_scratch(&manager).await?;
    check!(manager.has_table(&table).await?, "table {table} missing after create");

    drop_scratch(&manager, &table).await?;
    check!(!manager.has_table(&table).await?, "table {table} survived drop");
    Ok(())
}

async fn adds_and_drops_columns(_config: TestConfig) -> CaseResult {
    let conn = db::connect_kind(DbKind::Postgres).await?;
    let manager = SchemaManager::new(&conn);
    let table = create_scratch(&manager).await?;
    let outcome = check_columns(&manager, &table).await;
    drop_scratch(&manager, &table).await?;
    outcome
}

async fn check_columns(manager: &SchemaManager<'_>, table: &str) -> CaseResult {
    manager
        .alter_table(
            Table::alter()
                .table(Alias::new(table))
                .add_column(ColumnDef::new(Alias::new("email")).string().null())
                .to_owned(),
        )
        .await?;
    check!(manager.has_column(table, "email").await?, "email not added");

    manager
        .alter_table(
            Table::alter()
                .table(Alias::new(table))
                .drop_column(Alias::new("email"))
                .to_owned(),
        )
        .await?;
    check!(!manager.has_column(table, "email").await?, "email not dropped");
    check!(manager.has_column(table, "name").await?, "name went missing");
    Ok(())
}

async fn renames_columns(_config: TestConfig) -> CaseResult {
    let conn = db::connect_kind(DbKind::Postgres).await?;
    let manager = SchemaManager::new(&conn);
    let table = create_scratch(&manager).await?;
    let outcome = check_rename(&manager, &table).await;
    drop_scratch(&manager, &table).await?;
    outcome
}

async fn check_rename(manager: &SchemaManager<'_>, table: &str) -> CaseResult {
    manager
        .alter_table(
            Table::alter()
                .table(Alias::new(table))
                .rename_column(Alias::new("name"), Alias::new("full_name"))
                .to_owned(),
        )
        .await?;

    check!(manager.has_column(table, "full_name").await?, "full_name missing");
    check!(!manager.has_column(table, "name").await?, "old name still present");
    Ok(())
}

async fn creates_and_drops_indexes(_config: TestConfig) -> CaseResult {
    let conn = db::connect_kind(DbKind::Postgres).await?;
    let manager = SchemaManager::new(&conn);
    let table = create_scratch(&manager).await?;
    let outcome = check_indexes(&manager, &table).await;
    drop_scratch(&manager, &table).await?;
    outcome
}

async fn check_indexes(manager: &SchemaManager<'_>, table: &str) -> CaseResult {
    let index = format!("{table}_name_idx");
    manager
        .create_index(
            Index::create()
                .name(&index)
                .table(Alias::new(table))
                .col(Alias::new("name"))
                .to_owned(),
        )
        .await?;
    check!(manager.has_index(table, &index).await?, "index {index} missing");

    manager
        .drop_index(Index::drop().name(&index).table(Alias::new(table)).to_owned())
        .await?;
    check!(!manager.has_index(table, &index).await?, "index {index} survived drop");
    Ok(())
}

async fn migrations_apply_and_revert(_config: TestConfig) -> CaseResult {
    let conn = db::connect_kind(DbKind::Postgres).await?;
    let manager = SchemaManager::new(&conn);
    let migration = CreatePerson {
        table: unique_ident("mig_person"),
    };

    migration.up(&manager).await?;
    let applied = manager.has_table(&migration.table).await;
    migration.down(&manager).await?;

    check!(applied?, "{} did not create its table", migration.name());
    check!(
        !manager.has_table(&migration.table).await?,
        "{} did not revert",
        migration.name()
    );
    Ok(())
}
