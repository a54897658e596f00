//! Download link entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Video quality of a download link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(8))")]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    #[sea_orm(string_value = "360p")]
    #[serde(rename = "360p")]
    Q360p,
    #[sea_orm(string_value = "480p")]
    #[serde(rename = "480p")]
    Q480p,
    #[sea_orm(string_value = "720p")]
    #[serde(rename = "720p")]
    Q720p,
    #[sea_orm(string_value = "1080p")]
    #[serde(rename = "1080p")]
    Q1080p,
    #[sea_orm(string_value = "2k")]
    #[serde(rename = "2k")]
    Q2k,
    #[sea_orm(string_value = "4k")]
    #[serde(rename = "4k")]
    Q4k,
}

/// Hard-sub variant burned into the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum Subtitle {
    #[sea_orm(string_value = "none")]
    None,
    #[sea_orm(string_value = "persian_hard")]
    PersianHard,
    #[sea_orm(string_value = "english_hard")]
    EnglishHard,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "link")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub url: String,

    /// File size in megabytes.
    pub size: i32,

    pub subtitle: Subtitle,

    pub quality: Quality,

    /// Season number; set only for serials.
    #[sea_orm(nullable)]
    pub season: Option<i16>,

    /// Episode number; set only for serials.
    #[sea_orm(nullable)]
    pub episode: Option<i16>,

    #[sea_orm(indexed)]
    pub film_id: String,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::film::Entity",
        from = "Column::FilmId",
        to = "super::film::Column::Id",
        on_delete = "Cascade"
    )]
    Film,

    #[sea_orm(has_many = "super::link_language::Entity")]
    LinkLanguages,
}

impl Related<super::film::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Film.def()
    }
}

impl Related<super::link_language::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LinkLanguages.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
