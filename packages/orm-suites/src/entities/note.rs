//! A model whose lifecycle hooks act as save/delete signals.
//!
//! Every hook appends to a process-wide log that the signals suite drains
//! with [`take_signals`]. Suites run one case at a time, so the log only ever
//! holds the events of the running case.

use once_cell::sync::Lazy;
use parking_lot::Mutex;
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue, Set};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "note")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    pub slug: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    PreSave { created: bool },
    PostSave { created: bool },
    PreDelete,
    PostDelete,
}

static SIGNALS: Lazy<Mutex<Vec<Signal>>> = Lazy::new(|| Mutex::new(Vec::new()));

fn record(signal: Signal) {
    SIGNALS.lock().push(signal);
}

/// Drain the signal log.
pub fn take_signals() -> Vec<Signal> {
    std::mem::take(&mut *SIGNALS.lock())
}

pub fn slugify(title: &str) -> String {
    title
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    /// Rejects blank titles and keeps `slug` in step with `title`.
    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        record(Signal::PreSave { created: insert });

        let title = match &self.title {
            ActiveValue::Set(title) | ActiveValue::Unchanged(title) => title.clone(),
            ActiveValue::NotSet => String::new(),
        };
        if title.trim().is_empty() {
            return Err(DbErr::Custom("note title must not be blank".to_string()));
        }
        self.slug = Set(slugify(&title));
        Ok(self)
    }

    async fn after_save<C>(
        model: <Self::Entity as EntityTrait>::Model,
        _db: &C,
        insert: bool,
    ) -> Result<<Self::Entity as EntityTrait>::Model, DbErr>
    where
        C: ConnectionTrait,
    {
        record(Signal::PostSave { created: insert });
        Ok(model)
    }

    async fn before_delete<C>(self, _db: &C) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        record(Signal::PreDelete);
        Ok(self)
    }

    async fn after_delete<C>(self, _db: &C) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        record(Signal::PostDelete);
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::slugify;

    #[test]
    fn slugify_joins_lowercase_words() {
        assert_eq!(slugify("Hello, ORM World!"), "hello-orm-world");
        assert_eq!(slugify("  spaced   out  "), "spaced-out");
        assert_eq!(slugify(""), "");
    }
}
