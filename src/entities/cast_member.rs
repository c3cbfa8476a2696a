use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cast_member")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    #[serde(default)]
    pub id: i32,
    #[sea_orm(unique)]
    pub full_name: String,
    pub photo_url: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::movie_cast::Entity")]
    MovieCast,
}

impl Related<super::movie_cast::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MovieCast.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
