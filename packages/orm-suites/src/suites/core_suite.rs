//! Baseline ORM behaviour: CRUD, filtering, relations and transactions.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    IntoActiveModel, ModelTrait, PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use test_harness::{cases, check_eq, CaseError, CaseResult, TestCase, TestConfig, TestSuite};

use crate::db;
use crate::entities::{blog, entry};
use crate::error::SuiteError;

pub const NAME: &str = "orm_suites::core";

pub struct CoreSuite;

impl TestSuite for CoreSuite {
    fn name(&self) -> &str {
        NAME
    }

    fn cases(&self) -> Vec<TestCase> {
        cases![
            inserts_and_fetches_by_primary_key,
            filters_and_orders_rows,
            updates_persist,
            deletes_remove_rows,
            loads_related_rows,
            rollback_discards_writes,
            rejects_unknown_backends,
        ]
    }
}

pub fn suite() -> Box<dyn TestSuite> {
    Box::new(CoreSuite)
}

async fn setup(config: &TestConfig) -> Result<DatabaseConnection, CaseError> {
    let conn = db::connect(config).await?;
    db::drop_table(&conn, entry::Entity).await?;
    db::drop_table(&conn, blog::Entity).await?;
    db::create_table(&conn, blog::Entity).await?;
    db::create_table(&conn, entry::Entity).await?;
    Ok(conn)
}

async fn new_blog<C: ConnectionTrait>(conn: &C, title: &str) -> Result<blog::Model, DbErr> {
    blog::ActiveModel {
        title: Set(title.to_string()),
        ..Default::default()
    }
    .insert(conn)
    .await
}

async fn new_entry<C: ConnectionTrait>(
    conn: &C,
    blog: &blog::Model,
    headline: &str,
    rating: i32,
) -> Result<entry::Model, DbErr> {
    entry::ActiveModel {
        blog_id: Set(blog.id),
        headline: Set(headline.to_string()),
        rating: Set(rating),
        ..Default::default()
    }
    .insert(conn)
    .await
}

async fn inserts_and_fetches_by_primary_key(config: TestConfig) -> CaseResult {
    let conn = setup(&config).await?;

    let created = new_blog(&conn, "first post").await?;
    let fetched = blog::Entity::find_by_id(created.id).one(&conn).await?;

    check_eq!(fetched, Some(created));
    check_eq!(blog::Entity::find().count(&conn).await?, 1);
    Ok(())
}

async fn filters_and_orders_rows(config: TestConfig) -> CaseResult {
    let conn = setup(&config).await?;
    for title in ["Rust tips", "Python tips", "Rust news"] {
        new_blog(&conn, title).await?;
    }

    let rust = blog::Entity::find()
        .filter(blog::Column::Title.starts_with("Rust"))
        .order_by_asc(blog::Column::Title)
        .all(&conn)
        .await?;
    let titles: Vec<&str> = rust.iter().map(|b| b.title.as_str()).collect();
    check_eq!(titles, vec!["Rust news", "Rust tips"]);

    let newest_first = blog::Entity::find()
        .order_by_desc(blog::Column::Id)
        .one(&conn)
        .await?;
    check_eq!(newest_first.map(|b| b.title), Some("Rust news".to_string()));
    Ok(())
}

async fn updates_persist(config: TestConfig) -> CaseResult {
    let conn = setup(&config).await?;
    let draft = new_blog(&conn, "draft").await?;

    let mut active = draft.clone().into_active_model();
    active.title = Set("published".to_string());
    let updated = active.update(&conn).await?;

    check_eq!(updated.id, draft.id);
    check_eq!(updated.title, "published");
    let reloaded = blog::Entity::find_by_id(draft.id).one(&conn).await?;
    check_eq!(reloaded.map(|b| b.title), Some("published".to_string()));
    Ok(())
}

async fn deletes_remove_rows(config: TestConfig) -> CaseResult {
    let conn = setup(&config).await?;
    let doomed = new_blog(&conn, "doomed").await?;
    let kept = new_blog(&conn, "kept").await?;

    let res = blog::Entity::delete_by_id(doomed.id).exec(&conn).await?;
    check_eq!(res.rows_affected, 1);

    let remaining = blog::Entity::find().all(&conn).await?;
    check_eq!(remaining, vec![kept]);
    Ok(())
}

async fn loads_related_rows(config: TestConfig) -> CaseResult {
    let conn = setup(&config).await?;
    let orm = new_blog(&conn, "ORM notes").await?;
    let empty = new_blog(&conn, "empty").await?;
    new_entry(&conn, &orm, "joins", 3).await?;
    new_entry(&conn, &orm, "subqueries", 5).await?;

    let entries = orm
        .find_related(entry::Entity)
        .order_by_asc(entry::Column::Id)
        .all(&conn)
        .await?;
    let headlines: Vec<&str> = entries.iter().map(|e| e.headline.as_str()).collect();
    check_eq!(headlines, vec!["joins", "subqueries"]);

    let parent = entries[0].find_related(blog::Entity).one(&conn).await?;
    check_eq!(parent.map(|b| b.id), Some(orm.id));

    let nested = blog::Entity::find()
        .find_with_related(entry::Entity)
        .order_by_asc(blog::Column::Id)
        .all(&conn)
        .await?;
    let counts: Vec<(i32, usize)> = nested.iter().map(|(b, es)| (b.id, es.len())).collect();
    check_eq!(counts, vec![(orm.id, 2), (empty.id, 0)]);
    Ok(())
}

async fn rollback_discards_writes(config: TestConfig) -> CaseResult {
    let conn = setup(&config).await?;

    let txn = conn.begin().await?;
    new_blog(&txn, "never committed").await?;
    check_eq!(blog::Entity::find().count(&txn).await?, 1);
    txn.rollback().await?;

    check_eq!(blog::Entity::find().count(&conn).await?, 0);
    Ok(())
}

async fn rejects_unknown_backends(_config: TestConfig) -> CaseResult {
    let bogus = TestConfig::new("oracle", 1);
    match db::connect(&bogus).await {
        Err(SuiteError::UnknownBackend { backend }) => {
            check_eq!(backend, "oracle");
            Ok(())
        }
        Err(other) => Err(CaseError::failure(format!(
            "expected an unknown-backend error, got: {other}"
        ))),
        Ok(_) => Err(CaseError::failure("connected to an unknown backend")),
    }
}

#[cfg(test)]
mod tests {
    use test_harness::{TestConfig, TextTestRunner};

    use super::CoreSuite;

    #[tokio::test]
    async fn core_suite_passes_on_sqlite() {
        let mut runner = TextTestRunner::new(Vec::new(), 2);
        let result = runner
            .run(&CoreSuite, &TestConfig::new("sqlite", 2))
            .await
            .unwrap();
        let output = String::from_utf8(runner.into_inner()).unwrap();

        assert!(result.was_successful(), "{output}");
        assert_eq!(result.tests_run, 7);
    }

    #[tokio::test]
    async fn unknown_backend_turns_into_errors() {
        let mut runner = TextTestRunner::new(Vec::new(), 0);
        let result = runner
            .run(&CoreSuite, &TestConfig::new("oracle", 0))
            .await
            .unwrap();

        // Only the case that expects the rejection passes.
        assert_eq!(result.errors.len(), 6);
        assert!(result.failures.is_empty());
        assert!(result.errors[0].1.contains("Unknown database backend 'oracle'"));
    }
}
