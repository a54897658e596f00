//! Film entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Film publication status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum FilmStatus {
    #[sea_orm(string_value = "draft")]
    Draft,
    #[sea_orm(string_value = "published")]
    Published,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "film")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub title: String,

    /// English title, searched together with the native title.
    pub title_en: String,

    /// Gregorian production year.
    pub year: i16,

    #[sea_orm(column_type = "Text")]
    pub description: String,

    #[sea_orm(nullable)]
    pub thumbnail_url: Option<String>,

    /// Drafts are visible to staff only.
    pub status: FilmStatus,

    /// IMDB score, 0.0 to 10.0.
    pub imdb_rating: f64,

    pub imdb_link: String,

    /// Runtime in minutes.
    #[sea_orm(nullable)]
    pub duration: Option<i16>,

    #[sea_orm(default_value = false)]
    pub is_serial: bool,

    /// Deduplicated view counter. Only ever changed through a relative
    /// UPDATE, never read-modify-write in application code.
    #[sea_orm(default_value = 0)]
    pub visit_count: i64,

    /// Owning user (the staff account that added the film).
    #[sea_orm(indexed)]
    pub user_id: String,

    #[sea_orm(indexed)]
    pub director_id: String,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,

    #[sea_orm(
        belongs_to = "super::director::Entity",
        from = "Column::DirectorId",
        to = "super::director::Column::Id"
    )]
    Director,

    #[sea_orm(has_many = "super::link::Entity")]
    Links,

    #[sea_orm(has_many = "super::comment::Entity")]
    Comments,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::director::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Director.def()
    }
}

impl Related<super::link::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Links.def()
    }
}

impl Related<super::comment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
