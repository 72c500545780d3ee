//! Extensions only reachable through the alternate SQLite driver:
//! user-defined SQL functions, collations and pragmas.
//!
//! Compiled with the `sqlite-ext` feature; without it the suite is empty and
//! the catalog never selects it.

use test_harness::{TestCase, TestSuite};

pub const NAME: &str = "orm_suites::sqlite_ext";

pub struct SqliteExtSuite;

impl TestSuite for SqliteExtSuite {
    fn name(&self) -> &str {
        NAME
    }

    #[cfg(feature = "sqlite-ext")]
    fn cases(&self) -> Vec<TestCase> {
        use driver::{
            combines_functions_and_collations, orders_with_custom_collations,
            registers_scalar_functions, round_trips_pragmas,
        };

        test_harness::cases![
            registers_scalar_functions,
            orders_with_custom_collations,
            round_trips_pragmas,
            combines_functions_and_collations,
        ]
    }

    #[cfg(not(feature = "sqlite-ext"))]
    fn cases(&self) -> Vec<TestCase> {
        Vec::new()
    }
}

pub fn suite() -> Box<dyn TestSuite> {
    Box::new(SqliteExtSuite)
}

/// Upper-case the first letter of every space-separated word, lower-case the rest.
pub fn title_case(text: &str) -> String {
    text.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

#[cfg(feature = "sqlite-ext")]
mod driver {
    use rusqlite::functions::FunctionFlags;
    use rusqlite::Connection;
    use test_harness::{check_eq, CaseResult, TestConfig};

    use super::title_case;

    fn open() -> rusqlite::Result<Connection> {
        let conn = Connection::open_in_memory()?;
        conn.create_scalar_function(
            "title_case",
            1,
            FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
            |ctx| {
                let text: String = ctx.get(0)?;
                Ok(title_case(&text))
            },
        )?;
        conn.create_collation("reverse", |a: &str, b: &str| b.cmp(a))?;
        Ok(conn)
    }

    pub(super) async fn registers_scalar_functions(_config: TestConfig) -> CaseResult {
        let conn = open()?;

        let titled: String =
            conn.query_row("SELECT title_case('hello orm WORLD')", [], |row| row.get(0))?;

        check_eq!(titled, "Hello Orm World");
        Ok(())
    }

    pub(super) async fn orders_with_custom_collations(_config: TestConfig) -> CaseResult {
        let conn = open()?;
        conn.execute_batch(
            "CREATE TABLE word (text TEXT NOT NULL);
             INSERT INTO word (text) VALUES ('beta'), ('alpha'), ('gamma');",
        )?;

        let mut stmt = conn.prepare("SELECT text FROM word ORDER BY text COLLATE reverse")?;
        let words = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;

        check_eq!(words, vec!["gamma", "beta", "alpha"]);
        Ok(())
    }

    pub(super) async fn round_trips_pragmas(_config: TestConfig) -> CaseResult {
        let conn = open()?;

        conn.pragma_update(None, "user_version", 7)?;
        let version: i32 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;

        check_eq!(version, 7);
        Ok(())
    }

    pub(super) async fn combines_functions_and_collations(_config: TestConfig) -> CaseResult {
        let conn = open()?;
        conn.execute_batch(
            "CREATE TABLE person (name TEXT NOT NULL);
             INSERT INTO person (name) VALUES ('huey lewis'), ('mickey mouse');",
        )?;

        let mut stmt =
            conn.prepare("SELECT title_case(name) FROM person ORDER BY name COLLATE reverse")?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;

        check_eq!(names, vec!["Mickey Mouse", "Huey Lewis"]);
        Ok(())
    }
}
