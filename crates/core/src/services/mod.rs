//! Business logic services.

#![allow(missing_docs)]

pub mod comment;
pub mod film;
pub mod link;
pub mod person;
pub mod site_settings;
pub mod taxonomy;
pub mod user;

pub use comment::{
    CommentService, CommentTree, CreateCommentInput, ModerateCommentInput, UpdateCommentInput,
};
pub use film::{CreateFilmInput, FilmDetail, FilmService, UpdateFilmInput};
pub use link::{CreateLinkInput, LinkService, LinkWithLanguages, UpdateLinkInput};
pub use person::{ActorService, DirectorService, PersonInput};
pub use site_settings::{SiteSettingsService, UpdateSiteSettingsInput};
pub use taxonomy::{
    CollectionService, CountryService, GenreService, LanguageService, TaxonomyInput,
};
pub use user::{
    CreateUserInput, LoginInput, UpdateProfileInput, UpdateUserInput, UserService,
};
