//! Tags point at any model through an `(object_type, object_id)` pair
//! instead of a real foreign key.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "tag")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub tag: String,
    #[sea_orm(column_name = "object_type")]
    pub object_type: String,
    #[sea_orm(column_name = "object_id")]
    pub object_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
