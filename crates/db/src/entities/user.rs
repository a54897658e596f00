//! User entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(unique)]
    pub username: String,

    #[sea_orm(unique)]
    pub email: String,

    /// Argon2 password hash. Never serialized to API responses.
    #[serde(skip_serializing)]
    pub password_hash: String,

    #[sea_orm(nullable)]
    pub first_name: Option<String>,

    #[sea_orm(nullable)]
    pub last_name: Option<String>,

    /// Staff accounts may mutate catalog resources and moderate comments.
    #[sea_orm(default_value = false)]
    pub is_staff: bool,

    /// Superusers may additionally manage user accounts.
    #[sea_orm(default_value = false)]
    pub is_superuser: bool,

    #[sea_orm(default_value = true)]
    pub is_active: bool,

    /// Stamped whenever a token pair is issued.
    #[sea_orm(nullable)]
    pub last_login: Option<DateTimeWithTimeZone>,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

impl Model {
    /// Human-facing display name: first/last name when set, else username.
    #[must_use]
    pub fn display_name(&self) -> String {
        let mut name = String::new();
        if let Some(first) = &self.first_name {
            name.push_str(first);
        }
        if let Some(last) = &self.last_name {
            if !name.is_empty() {
                name.push(' ');
            }
            name.push_str(last);
        }
        if name.is_empty() {
            name.push_str(&self.username);
        }
        name
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::film::Entity")]
    Films,

    #[sea_orm(has_many = "super::comment::Entity")]
    Comments,
}

impl Related<super::film::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Films.def()
    }
}

impl Related<super::comment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
