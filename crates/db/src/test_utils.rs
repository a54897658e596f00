//! Model factories shared by repository and service tests.

use chrono::Utc;

use crate::entities::{comment, film, link, site_settings, user};

/// Build a user model with sensible defaults.
#[must_use]
pub fn test_user(id: &str, username: &str) -> user::Model {
    user::Model {
        id: id.to_string(),
        username: username.to_string(),
        email: format!("{username}@example.com"),
        password_hash: "hash".to_string(),
        first_name: None,
        last_name: None,
        is_staff: false,
        is_superuser: false,
        is_active: true,
        last_login: None,
        created_at: Utc::now().into(),
        updated_at: None,
    }
}

/// Build a staff user model.
#[must_use]
pub fn test_staff(id: &str, username: &str) -> user::Model {
    user::Model {
        is_staff: true,
        ..test_user(id, username)
    }
}

/// Build a published film model with sensible defaults.
#[must_use]
pub fn test_film(id: &str, title: &str) -> film::Model {
    film::Model {
        id: id.to_string(),
        title: title.to_string(),
        title_en: title.to_string(),
        year: 2020,
        description: "A film.".to_string(),
        thumbnail_url: None,
        status: film::FilmStatus::Published,
        imdb_rating: 7.5,
        imdb_link: "https://www.imdb.com/title/tt0000001/".to_string(),
        duration: Some(120),
        is_serial: false,
        visit_count: 0,
        user_id: "u1".to_string(),
        director_id: "d1".to_string(),
        created_at: Utc::now().into(),
        updated_at: None,
    }
}

/// Build a pending comment model with sensible defaults.
#[must_use]
pub fn test_comment(id: &str, film_id: &str, user_id: &str) -> comment::Model {
    comment::Model {
        id: id.to_string(),
        text: "Nice film.".to_string(),
        rating: None,
        like_count: 0,
        dislike_count: 0,
        status: comment::CommentStatus::Pending,
        film_id: film_id.to_string(),
        user_id: user_id.to_string(),
        parent_id: None,
        created_at: Utc::now().into(),
        updated_at: None,
    }
}

/// Build a download link model with sensible defaults.
#[must_use]
pub fn test_link(id: &str, film_id: &str) -> link::Model {
    link::Model {
        id: id.to_string(),
        url: format!("https://cdn.example.com/{id}.mkv"),
        size: 1200,
        subtitle: link::Subtitle::None,
        quality: link::Quality::Q720p,
        season: None,
        episode: None,
        film_id: film_id.to_string(),
        created_at: Utc::now().into(),
    }
}

/// Build the site settings singleton row.
#[must_use]
pub fn test_site_settings() -> site_settings::Model {
    site_settings::Model {
        id: site_settings::SITE_SETTINGS_ID.to_string(),
        site_name: "cinema".to_string(),
        description: "A film catalog.".to_string(),
        logo_url: None,
        instagram_url: None,
        telegram_url: None,
        twitter_url: None,
        contact_email: None,
        contact_phone: None,
        updated_at: None,
    }
}
