//! Save and delete signals, modelled as `ActiveModelBehavior` hooks on
//! [`note`](crate::entities::note).

use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, IntoActiveModel, PaginatorTrait, Set,
};
use test_harness::{cases, check, check_eq, CaseError, CaseResult, TestCase, TestConfig, TestSuite};

use crate::db;
use crate::entities::note::{self, take_signals, Signal};

pub const NAME: &str = "orm_suites::signals";

pub struct SignalsSuite;

impl TestSuite for SignalsSuite {
    fn name(&self) -> &str {
        NAME
    }

    fn cases(&self) -> Vec<TestCase> {
        cases![
            save_signals_wrap_an_insert,
            save_signals_report_updates,
            delete_signals_wrap_a_delete,
            pre_save_can_veto,
            bulk_deletes_bypass_signals,
        ]
    }
}

pub fn suite() -> Box<dyn TestSuite> {
    Box::new(SignalsSuite)
}

async fn setup(config: &TestConfig) -> Result<DatabaseConnection, CaseError> {
    let conn = db::connect(config).await?;
    db::drop_table(&conn, note::Entity).await?;
    db::create_table(&conn, note::Entity).await?;
    take_signals();
    Ok(conn)
}

fn draft(title: &str) -> note::ActiveModel {
    note::ActiveModel {
        title: Set(title.to_string()),
        ..Default::default()
    }
}

async fn save_signals_wrap_an_insert(config: TestConfig) -> CaseResult {
    let conn = setup(&config).await?;

    let saved = draft("Hello, Signals").insert(&conn).await?;

    check_eq!(
        take_signals(),
        vec![
            Signal::PreSave { created: true },
            Signal::PostSave { created: true }
        ]
    );
    // pre-save rewrote the slug before the row was written
    check_eq!(saved.slug, "hello-signals");
    let stored = note::Entity::find_by_id(saved.id).one(&conn).await?;
    check_eq!(stored.map(|n| n.slug), Some("hello-signals".to_string()));
    Ok(())
}

async fn save_signals_report_updates(config: TestConfig) -> CaseResult {
    let conn = setup(&config).await?;
    let saved = draft("before").insert(&conn).await?;
    take_signals();

    let mut active = saved.into_active_model();
    active.title = Set("After Edit".to_string());
    let updated = active.update(&conn).await?;

    check_eq!(
        take_signals(),
        vec![
            Signal::PreSave { created: false },
            Signal::PostSave { created: false }
        ]
    );
    check_eq!(updated.slug, "after-edit");
    Ok(())
}

async fn delete_signals_wrap_a_delete(config: TestConfig) -> CaseResult {
    let conn = setup(&config).await?;
    let saved = draft("short lived").insert(&conn).await?;
    take_signals();

    let res = saved.into_active_model().delete(&conn).await?;

    check_eq!(res.rows_affected, 1);
    check_eq!(take_signals(), vec![Signal::PreDelete, Signal::PostDelete]);
    Ok(())
}

async fn pre_save_can_veto(config: TestConfig) -> CaseResult {
    let conn = setup(&config).await?;

    let result = draft("   ").insert(&conn).await;

    check!(result.is_err(), "blank title was saved: {result:?}");
    check_eq!(take_signals(), vec![Signal::PreSave { created: true }]);
    check_eq!(note::Entity::find().count(&conn).await?, 0);
    Ok(())
}

async fn bulk_deletes_bypass_signals(config: TestConfig) -> CaseResult {
    let conn = setup(&config).await?;
    draft("one").insert(&conn).await?;
    draft("two").insert(&conn).await?;
    take_signals();

    let res = note::Entity::delete_many().exec(&conn).await?;

    check_eq!(res.rows_affected, 2);
    check!(take_signals().is_empty(), "query-level delete fired signals");
    Ok(())
}

#[cfg(test)]
mod tests {
    use test_harness::{TestConfig, TextTestRunner};

    use super::SignalsSuite;

    #[tokio::test]
    async fn signals_suite_passes_on_sqlite() {
        let mut runner = TextTestRunner::new(Vec::new(), 2);
        let result = runner
            .run(&SignalsSuite, &TestConfig::new("sqlite", 2))
            .await
            .unwrap();
        let output = String::from_utf8(runner.into_inner()).unwrap();

        assert!(result.was_successful(), "{output}");
        assert_eq!(result.tests_run, 5);
    }
}
