//! A string key-value store backed by a single table.

use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryOrder, Set,
};
use test_harness::{cases, check, check_eq, CaseError, CaseResult, TestCase, TestConfig, TestSuite};

use crate::db;
use crate::entities::kv;

pub const NAME: &str = "orm_suites::kv";

pub struct KvSuite;

impl TestSuite for KvSuite {
    fn name(&self) -> &str {
        NAME
    }

    fn cases(&self) -> Vec<TestCase> {
        cases![
            stored_values_read_back,
            setting_a_key_twice_overwrites,
            delete_reports_whether_the_key_existed,
            keys_are_listed_in_order,
            missing_keys_read_as_none,
        ]
    }
}

pub fn suite() -> Box<dyn TestSuite> {
    Box::new(KvSuite)
}

pub struct KeyStore<'a, C> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> KeyStore<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    /// Insert or overwrite.
    pub async fn set(&self, key: &str, value: &str) -> Result<(), DbErr> {
        let row = kv::ActiveModel {
            key: Set(key.to_string()),
            value: Set(value.to_string()),
        };
        kv::Entity::insert(row)
            .on_conflict(
                OnConflict::column(kv::Column::Key)
                    .update_column(kv::Column::Value)
                    .to_owned(),
            )
            .exec_without_returning(self.conn)
            .await?;
        Ok(())
    }

    pub async fn get(&self, key: &str) -> Result<Option<String>, DbErr> {
        let row = kv::Entity::find_by_id(key.to_string()).one(self.conn).await?;
        Ok(row.map(|r| r.value))
    }

    pub async fn contains(&self, key: &str) -> Result<bool, DbErr> {
        let hits = kv::Entity::find_by_id(key.to_string())
            .count(self.conn)
            .await?;
        Ok(hits > 0)
    }

    /// Returns whether the key was present.
    pub async fn delete(&self, key: &str) -> Result<bool, DbErr> {
        let res = kv::Entity::delete_by_id(key.to_string())
            .exec(self.conn)
            .await?;
        Ok(res.rows_affected > 0)
    }

    pub async fn count(&self) -> Result<u64, DbErr> {
        kv::Entity::find().count(self.conn).await
    }

    pub async fn keys(&self) -> Result<Vec<String>, DbErr> {
        let rows = kv::Entity::find()
            .order_by_asc(kv::Column::Key)
            .all(self.conn)
            .await?;
        Ok(rows.into_iter().map(|r| r.key).collect())
    }
}

async fn setup(config: &TestConfig) -> Result<DatabaseConnection, CaseError> {
    let conn = db::connect(config).await?;
    db::drop_table(&conn, kv::Entity).await?;
    db::create_table(&conn, kv::Entity).await?;
    Ok(conn)
}

async fn stored_values_read_back(config: TestConfig) -> CaseResult {
    let conn = setup(&config).await?;
    let store = KeyStore::new(&conn);

    store.set("color", "green").await?;

    check_eq!(store.get("color").await?, Some("green".to_string()));
    check!(store.contains("color").await?);
    Ok(())
}

async fn setting_a_key_twice_overwrites(config: TestConfig) -> CaseResult {
    let conn = setup(&config).await?;
    let store = KeyStore::new(&conn);

    store.set("color", "green").await?;
    store.set("color", "blue").await?;

    check_eq!(store.get("color").await?, Some("blue".to_string()));
    check_eq!(store.count().await?, 1);
    Ok(())
}

async fn delete_reports_whether_the_key_existed(config: TestConfig) -> CaseResult {
    let conn = setup(&config).await?;
    let store = KeyStore::new(&conn);
    store.set("session", "abc123").await?;

    check!(store.delete("session").await?, "existing key was not deleted");
    check!(!store.delete("session").await?, "second delete reported a row");
    check!(!store.contains("session").await?);
    Ok(())
}

async fn keys_are_listed_in_order(config: TestConfig) -> CaseResult {
    let conn = setup(&config).await?;
    let store = KeyStore::new(&conn);
    for (key, value) in [("k3", "three"), ("k1", "one"), ("k2", "two")] {
        store.set(key, value).await?;
    }

    check_eq!(store.keys().await?, vec!["k1", "k2", "k3"]);
    check_eq!(store.count().await?, 3);
    Ok(())
}

async fn missing_keys_read_as_none(config: TestConfig) -> CaseResult {
    let conn = setup(&config).await?;
    let store = KeyStore::new(&conn);

    check_eq!(store.get("nope").await?, None);
    check!(!store.contains("nope").await?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use test_harness::{TestConfig, TextTestRunner};

    use super::KvSuite;

    #[tokio::test]
    async fn kv_suite_passes_on_sqlite() {
        let mut runner = TextTestRunner::new(Vec::new(), 2);
        let result = runner
            .run(&KvSuite, &TestConfig::new("sqlite", 2))
            .await
            .unwrap();
        let output = String::from_utf8(runner.into_inner()).unwrap();

        assert!(result.was_successful(), "{output}");
        assert_eq!(result.tests_run, 5);
    }
}
