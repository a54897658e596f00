//! Language entity, shared by films (original languages) and links (audio tracks).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "language")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub title: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::film_language::Entity")]
    FilmLanguages,

    #[sea_orm(has_many = "super::link_language::Entity")]
    LinkLanguages,
}

impl Related<super::film_language::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FilmLanguages.def()
    }
}

impl Related<super::link_language::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LinkLanguages.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
