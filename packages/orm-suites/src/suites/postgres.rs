//! PostgreSQL-only behaviour. Always connects to PostgreSQL, whatever the
//! configured backend, and works on uniquely named scratch tables so runs
//! against a shared server do not collide.

use sea_orm::{
    ConnectionTrait, DatabaseConnection, DbBackend, DbErr, QueryResult, Statement,
    TransactionTrait, Value,
};
use test_harness::{cases, check, check_eq, CaseError, CaseResult, TestCase, TestConfig, TestSuite};
use test_support::unique_ident;

use crate::config::db::DbKind;
use crate::db;

pub const NAME: &str = "orm_suites::postgres";

pub struct PostgresSuite;

impl TestSuite for PostgresSuite {
    fn name(&self) -> &str {
        NAME
    }

    fn cases(&self) -> Vec<TestCase> {
        cases![
            connects_to_a_test_database,
            ilike_matches_case_insensitively,
            upserts_return_the_stored_row,
            failed_transactions_roll_back,
        ]
    }
}

pub fn suite() -> Box<dyn TestSuite> {
    Box::new(PostgresSuite)
}

fn stmt(sql: &str, values: Vec<Value>) -> Statement {
    Statement::from_sql_and_values(DbBackend::Postgres, sql, values)
}

fn no_row(what: &str) -> CaseError {
    CaseError::error(format!("{what} returned no row"))
}

async fn create_person_table(conn: &DatabaseConnection) -> Result<String, DbErr> {
    let table = unique_ident("pg_person");
    conn.execute_unprepared(&format!(
        "CREATE TABLE {table} (
            id SERIAL PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            visits INTEGER NOT NULL DEFAULT 0
        )"
    ))
    .await?;
    Ok(table)
}

async fn drop_person_table(conn: &DatabaseConnection, table: &str) -> Result<(), DbErr> {
    conn.execute_unprepared(&format!("DROP TABLE IF EXISTS {table}"))
        .await?;
    Ok(())
}

async fn insert_people<C: ConnectionTrait>(
    conn: &C,
    table: &str,
    names: &[&str],
) -> Result<(), DbErr> {
    for name in names {
        conn.execute(stmt(
            &format!("INSERT INTO {table} (name) VALUES ($1)"),
            vec![(*name).into()],
        ))
        .await?;
    }
    Ok(())
}

fn names(rows: &[QueryResult]) -> Result<Vec<String>, DbErr> {
    rows.iter().map(|row| row.try_get("", "name")).collect()
}

async fn connects_to_a_test_database(_config: TestConfig) -> CaseResult {
    let conn = db::connect_kind(DbKind::Postgres).await?;

    let row = conn
        .query_one(stmt("SELECT current_database() AS name", Vec::new()))
        .await?
        .ok_or_else(|| no_row("current_database()"))?;
    let name: String = row.try_get("", "name")?;

    check!(name.ends_with("_test"), "connected to non-test database '{name}'");
    Ok(())
}

async fn ilike_matches_case_insensitively(_config: TestConfig) -> CaseResult {
    let conn = db::connect_kind(DbKind::Postgres).await?;
    let table = create_person_table(&conn).await?;
    let outcome = check_ilike(&conn, &table).await;
    drop_person_table(&conn, &table).await?;
    outcome
}

async fn check_ilike(conn: &DatabaseConnection, table: &str) -> CaseResult {
    insert_people(conn, table, &["Huey", "Mickey", "Zaizee"]).await?;

    let rows = conn
        .query_all(stmt(
            &format!("SELECT name FROM {table} WHERE name ILIKE $1 ORDER BY name"),
            vec!["%EY".into()],
        ))
        .await?;
    check_eq!(names(&rows)?, vec!["Huey", "Mickey"]);

    let like_rows = conn
        .query_all(stmt(
            &format!("SELECT name FROM {table} WHERE name LIKE $1"),
            vec!["%EY".into()],
        ))
        .await?;
    check!(like_rows.is_empty(), "LIKE matched case-insensitively");
    Ok(())
}

async fn upserts_return_the_stored_row(_config: TestConfig) -> CaseResult {
    let conn = db::connect_kind(DbKind::Postgres).await?;
    let table = create_person_table(&conn).await?;
    let outcome = check_upsert(&conn, &table).await;
    drop_person_table(&conn, &table).await?;
    outcome
}

async fn check_upsert(conn: &DatabaseConnection, table: &str) -> CaseResult {
    let upsert = format!(
        "INSERT INTO {table} AS t (name, visits) VALUES ($1, 1)
         ON CONFLICT (name) DO UPDATE SET visits = t.visits + 1
         RETURNING visits"
    );

    let mut seen = Vec::new();
    for _ in 0..3 {
        let row = conn
            .query_one(stmt(&upsert, vec!["Huey".into()]))
            .await?
            .ok_or_else(|| no_row("upsert"))?;
        seen.push(row.try_get::<i32>("", "visits")?);
    }

    check_eq!(seen, vec![1, 2, 3]);
    Ok(())
}

async fn failed_transactions_roll_back(_config: TestConfig) -> CaseResult {
    let conn = db::connect_kind(DbKind::Postgres).await?;
    let table = create_person_table(&conn).await?;
    let outcome = check_rollback(&conn, &table).await;
    drop_person_table(&conn, &table).await?;
    outcome
}

async fn check_rollback(conn: &DatabaseConnection, table: &str) -> CaseResult {
    let txn = conn.begin().await?;
    insert_people(&txn, table, &["Mickey"]).await?;
    // UNIQUE violation; the transaction is aborted from here on.
    let duplicate = insert_people(&txn, table, &["Mickey"]).await;
    check!(duplicate.is_err(), "duplicate name was accepted");
    txn.rollback().await?;

    let row = conn
        .query_one(stmt(&format!("SELECT COUNT(*) AS n FROM {table}"), Vec::new()))
        .await?
        .ok_or_else(|| no_row("COUNT(*)"))?;
    check_eq!(row.try_get::<i64>("", "n")?, 0);
    Ok(())
}
