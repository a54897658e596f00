//! Sea-ORM entity definitions.

pub mod actor;
pub mod collection;
pub mod comment;
pub mod country;
pub mod director;
pub mod film;
pub mod film_actor;
pub mod film_collection;
pub mod film_country;
pub mod film_genre;
pub mod film_language;
pub mod genre;
pub mod language;
pub mod link;
pub mod link_language;
pub mod site_settings;
pub mod user;

pub use actor::Entity as Actor;
pub use collection::Entity as Collection;
pub use comment::Entity as Comment;
pub use country::Entity as Country;
pub use director::Entity as Director;
pub use film::Entity as Film;
pub use film_actor::Entity as FilmActor;
pub use film_collection::Entity as FilmCollection;
pub use film_country::Entity as FilmCountry;
pub use film_genre::Entity as FilmGenre;
pub use film_language::Entity as FilmLanguage;
pub use genre::Entity as Genre;
pub use language::Entity as Language;
pub use link::Entity as Link;
pub use link_language::Entity as LinkLanguage;
pub use site_settings::Entity as SiteSettings;
pub use user::Entity as User;
