//! Generic foreign keys: one `tag` table pointing at several model types
//! through `(object_type, object_id)`.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set,
};
use test_harness::{cases, check_eq, CaseError, CaseResult, TestCase, TestConfig, TestSuite};

use crate::db;
use crate::entities::{appetizer, entree, tag};

pub const NAME: &str = "orm_suites::gfk";

pub struct GfkSuite;

impl TestSuite for GfkSuite {
    fn name(&self) -> &str {
        NAME
    }

    fn cases(&self) -> Vec<TestCase> {
        cases![
            tags_are_scoped_by_object_type,
            tags_resolve_to_their_object,
            unknown_object_types_resolve_to_nothing,
            clearing_an_object_drops_only_its_tags,
        ]
    }
}

pub fn suite() -> Box<dyn TestSuite> {
    Box::new(GfkSuite)
}

/// A model that tags can point at.
trait Taggable {
    const OBJECT_TYPE: &'static str;

    fn object_id(&self) -> i32;
}

impl Taggable for appetizer::Model {
    const OBJECT_TYPE: &'static str = "appetizer";

    fn object_id(&self) -> i32 {
        self.id
    }
}

impl Taggable for entree::Model {
    const OBJECT_TYPE: &'static str = "entree";

    fn object_id(&self) -> i32 {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Tagged {
    Appetizer(appetizer::Model),
    Entree(entree::Model),
}

async fn add_tag<C, T>(conn: &C, object: &T, name: &str) -> Result<tag::Model, DbErr>
where
    C: ConnectionTrait,
    T: Taggable,
{
    tag::ActiveModel {
        tag: Set(name.to_string()),
        object_type: Set(T::OBJECT_TYPE.to_string()),
        object_id: Set(object.object_id()),
        ..Default::default()
    }
    .insert(conn)
    .await
}

async fn tags_for<C, T>(conn: &C, object: &T) -> Result<Vec<String>, DbErr>
where
    C: ConnectionTrait,
    T: Taggable,
{
    let tags = tag::Entity::find()
        .filter(tag::Column::ObjectType.eq(T::OBJECT_TYPE))
        .filter(tag::Column::ObjectId.eq(object.object_id()))
        .order_by_asc(tag::Column::Tag)
        .all(conn)
        .await?;
    Ok(tags.into_iter().map(|t| t.tag).collect())
}

async fn clear_tags<C, T>(conn: &C, object: &T) -> Result<u64, DbErr>
where
    C: ConnectionTrait,
    T: Taggable,
{
    let res = tag::Entity::delete_many()
        .filter(tag::Column::ObjectType.eq(T::OBJECT_TYPE))
        .filter(tag::Column::ObjectId.eq(object.object_id()))
        .exec(conn)
        .await?;
    Ok(res.rows_affected)
}

/// Follow a tag back to the row it points at.
async fn resolve<C: ConnectionTrait>(conn: &C, link: &tag::Model) -> Result<Option<Tagged>, DbErr> {
    let kind = link.object_type.as_str();
    if kind == <appetizer::Model as Taggable>::OBJECT_TYPE {
        let found = appetizer::Entity::find_by_id(link.object_id).one(conn).await?;
        Ok(found.map(Tagged::Appetizer))
    } else if kind == <entree::Model as Taggable>::OBJECT_TYPE {
        let found = entree::Entity::find_by_id(link.object_id).one(conn).await?;
        Ok(found.map(Tagged::Entree))
    } else {
        Ok(None)
    }
}

async fn setup(config: &TestConfig) -> Result<DatabaseConnection, CaseError> {
    let conn = db::connect(config).await?;
    db::drop_table(&conn, tag::Entity).await?;
    db::drop_table(&conn, appetizer::Entity).await?;
    db::drop_table(&conn, entree::Entity).await?;
    db::create_table(&conn, appetizer::Entity).await?;
    db::create_table(&conn, entree::Entity).await?;
    db::create_table(&conn, tag::Entity).await?;
    Ok(conn)
}

async fn new_appetizer(conn: &DatabaseConnection, name: &str) -> Result<appetizer::Model, DbErr> {
    appetizer::ActiveModel {
        name: Set(name.to_string()),
        ..Default::default()
    }
    .insert(conn)
    .await
}

async fn new_entree(conn: &DatabaseConnection, name: &str) -> Result<entree::Model, DbErr> {
    entree::ActiveModel {
        name: Set(name.to_string()),
        ..Default::default()
    }
    .insert(conn)
    .await
}

async fn tags_are_scoped_by_object_type(config: TestConfig) -> CaseResult {
    let conn = setup(&config).await?;
    let wings = new_appetizer(&conn, "wings").await?;
    let steak = new_entree(&conn, "steak").await?;
    // Both tables start counting at 1, so only the type keeps the tags apart.
    check_eq!(wings.id, steak.id);

    add_tag(&conn, &wings, "spicy").await?;
    add_tag(&conn, &wings, "fried").await?;
    add_tag(&conn, &steak, "grilled").await?;

    check_eq!(tags_for(&conn, &wings).await?, vec!["fried", "spicy"]);
    check_eq!(tags_for(&conn, &steak).await?, vec!["grilled"]);
    Ok(())
}

async fn tags_resolve_to_their_object(config: TestConfig) -> CaseResult {
    let conn = setup(&config).await?;
    let nachos = new_appetizer(&conn, "nachos").await?;
    let ribs = new_entree(&conn, "ribs").await?;
    let cheesy = add_tag(&conn, &nachos, "cheesy").await?;
    let smoky = add_tag(&conn, &ribs, "smoky").await?;

    check_eq!(resolve(&conn, &cheesy).await?, Some(Tagged::Appetizer(nachos)));
    check_eq!(resolve(&conn, &smoky).await?, Some(Tagged::Entree(ribs)));
    Ok(())
}

async fn unknown_object_types_resolve_to_nothing(config: TestConfig) -> CaseResult {
    let conn = setup(&config).await?;
    let orphan = tag::ActiveModel {
        tag: Set("sweet".to_string()),
        object_type: Set("dessert".to_string()),
        object_id: Set(1),
        ..Default::default()
    }
    .insert(&conn)
    .await?;

    check_eq!(resolve(&conn, &orphan).await?, None);
    Ok(())
}

async fn clearing_an_object_drops_only_its_tags(config: TestConfig) -> CaseResult {
    let conn = setup(&config).await?;
    let soup = new_appetizer(&conn, "soup").await?;
    let pasta = new_entree(&conn, "pasta").await?;
    add_tag(&conn, &soup, "hot").await?;
    add_tag(&conn, &soup, "vegan").await?;
    add_tag(&conn, &pasta, "hot").await?;

    check_eq!(clear_tags(&conn, &soup).await?, 2);
    check_eq!(tags_for(&conn, &soup).await?, Vec::<String>::new());
    check_eq!(tags_for(&conn, &pasta).await?, vec!["hot"]);
    Ok(())
}

#[cfg(test)]
mod tests {
    use test_harness::{TestConfig, TextTestRunner};

    use super::GfkSuite;

    #[tokio::test]
    async fn gfk_suite_passes_on_sqlite() {
        let mut runner = TextTestRunner::new(Vec::new(), 2);
        let result = runner
            .run(&GfkSuite, &TestConfig::new("sqlite", 2))
            .await
            .unwrap();
        let output = String::from_utf8(runner.into_inner()).unwrap();

        assert!(result.was_successful(), "{output}");
        assert_eq!(result.tests_run, 4);
    }
}
