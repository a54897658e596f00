//! Database repositories.

pub mod comment;
pub mod film;
pub mod link;
pub mod person;
pub mod site_settings;
pub mod taxonomy;
pub mod user;

pub use comment::{CommentQuery, CommentRepository, CommentViewer};
pub use film::{FilmOrder, FilmQuery, FilmRepository};
pub use link::{LinkQuery, LinkRepository};
pub use person::{ActorRepository, DirectorRepository};
pub use site_settings::SiteSettingsRepository;
pub use taxonomy::{
    CollectionRepository, CountryRepository, GenreRepository, LanguageRepository,
};
pub use user::UserRepository;
