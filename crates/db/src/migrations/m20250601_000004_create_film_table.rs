//! Create film table and its taxonomy join tables.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Film::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Film::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Film::Title).string_len(256).not_null())
                    .col(ColumnDef::new(Film::TitleEn).string_len(256).not_null())
                    .col(ColumnDef::new(Film::Year).small_integer().not_null())
                    .col(ColumnDef::new(Film::Description).text().not_null())
                    .col(ColumnDef::new(Film::ThumbnailUrl).string_len(512))
                    .col(
                        ColumnDef::new(Film::Status)
                            .string_len(16)
                            .not_null()
                            .default("published"),
                    )
                    .col(ColumnDef::new(Film::ImdbRating).double().not_null())
                    .col(ColumnDef::new(Film::ImdbLink).string_len(512).not_null())
                    .col(ColumnDef::new(Film::Duration).small_integer())
                    .col(
                        ColumnDef::new(Film::IsSerial)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Film::VisitCount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Film::UserId).string_len(32).not_null())
                    .col(ColumnDef::new(Film::DirectorId).string_len(32).not_null())
                    .col(
                        ColumnDef::new(Film::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Film::UpdatedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_film_user")
                            .from(Film::Table, Film::UserId)
                            .to(User::Table, User::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_film_director")
                            .from(Film::Table, Film::DirectorId)
                            .to(Director::Table, Director::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_film_status")
                    .table(Film::Table)
                    .col(Film::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_film_year")
                    .table(Film::Table)
                    .col(Film::Year)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_film_director_id")
                    .table(Film::Table)
                    .col(Film::DirectorId)
                    .to_owned(),
            )
            .await?;

        // Join tables, one per taxonomy axis.
        manager
            .create_table(
                Table::create()
                    .table(FilmGenre::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(FilmGenre::FilmId).string_len(32).not_null())
                    .col(ColumnDef::new(FilmGenre::GenreId).string_len(32).not_null())
                    .primary_key(
                        Index::create()
                            .col(FilmGenre::FilmId)
                            .col(FilmGenre::GenreId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_film_genre_film")
                            .from(FilmGenre::Table, FilmGenre::FilmId)
                            .to(Film::Table, Film::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_film_genre_genre")
                            .from(FilmGenre::Table, FilmGenre::GenreId)
                            .to(Genre::Table, Genre::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(FilmCollection::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FilmCollection::FilmId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FilmCollection::CollectionId)
                            .string_len(32)
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(FilmCollection::FilmId)
                            .col(FilmCollection::CollectionId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_film_collection_film")
                            .from(FilmCollection::Table, FilmCollection::FilmId)
                            .to(Film::Table, Film::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_film_collection_collection")
                            .from(FilmCollection::Table, FilmCollection::CollectionId)
                            .to(Collection::Table, Collection::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(FilmActor::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(FilmActor::FilmId).string_len(32).not_null())
                    .col(ColumnDef::new(FilmActor::ActorId).string_len(32).not_null())
                    .primary_key(
                        Index::create()
                            .col(FilmActor::FilmId)
                            .col(FilmActor::ActorId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_film_actor_film")
                            .from(FilmActor::Table, FilmActor::FilmId)
                            .to(Film::Table, Film::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_film_actor_actor")
                            .from(FilmActor::Table, FilmActor::ActorId)
                            .to(Actor::Table, Actor::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(FilmCountry::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(FilmCountry::FilmId).string_len(32).not_null())
                    .col(
                        ColumnDef::new(FilmCountry::CountryId)
                            .string_len(32)
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(FilmCountry::FilmId)
                            .col(FilmCountry::CountryId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_film_country_film")
                            .from(FilmCountry::Table, FilmCountry::FilmId)
                            .to(Film::Table, Film::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_film_country_country")
                            .from(FilmCountry::Table, FilmCountry::CountryId)
                            .to(Country::Table, Country::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(FilmLanguage::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FilmLanguage::FilmId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FilmLanguage::LanguageId)
                            .string_len(32)
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(FilmLanguage::FilmId)
                            .col(FilmLanguage::LanguageId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_film_language_film")
                            .from(FilmLanguage::Table, FilmLanguage::FilmId)
                            .to(Film::Table, Film::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_film_language_language")
                            .from(FilmLanguage::Table, FilmLanguage::LanguageId)
                            .to(Language::Table, Language::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(FilmLanguage::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(FilmCountry::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(FilmActor::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(FilmCollection::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(FilmGenre::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Film::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Film {
    Table,
    Id,
    Title,
    TitleEn,
    Year,
    Description,
    ThumbnailUrl,
    Status,
    ImdbRating,
    ImdbLink,
    Duration,
    IsSerial,
    VisitCount,
    UserId,
    DirectorId,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum FilmGenre {
    Table,
    FilmId,
    GenreId,
}

#[derive(Iden)]
enum FilmCollection {
    Table,
    FilmId,
    CollectionId,
}

#[derive(Iden)]
enum FilmActor {
    Table,
    FilmId,
    ActorId,
}

#[derive(Iden)]
enum FilmCountry {
    Table,
    FilmId,
    CountryId,
}

#[derive(Iden)]
enum FilmLanguage {
    Table,
    FilmId,
    LanguageId,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}

#[derive(Iden)]
enum Director {
    Table,
    Id,
}

#[derive(Iden)]
enum Genre {
    Table,
    Id,
}

#[derive(Iden)]
enum Collection {
    Table,
    Id,
}

#[derive(Iden)]
enum Actor {
    Table,
    Id,
}

#[derive(Iden)]
enum Country {
    Table,
    Id,
}

#[derive(Iden)]
enum Language {
    Table,
    Id,
}
