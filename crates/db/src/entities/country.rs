//! Country entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "country")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub title: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::film_country::Entity")]
    FilmCountries,
}

impl Related<super::film_country::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FilmCountries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
