//! Create download link table and its language join table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Link::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Link::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Link::Url).string_len(2048).not_null())
                    .col(ColumnDef::new(Link::Size).integer().not_null())
                    .col(
                        ColumnDef::new(Link::Subtitle)
                            .string_len(16)
                            .not_null()
                            .default("none"),
                    )
                    .col(
                        ColumnDef::new(Link::Quality)
                            .string_len(8)
                            .not_null()
                            .default("720p"),
                    )
                    .col(ColumnDef::new(Link::Season).small_integer())
                    .col(ColumnDef::new(Link::Episode).small_integer())
                    .col(ColumnDef::new(Link::FilmId).string_len(32).not_null())
                    .col(
                        ColumnDef::new(Link::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_link_film")
                            .from(Link::Table, Link::FilmId)
                            .to(Film::Table, Film::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_link_film_id")
                    .table(Link::Table)
                    .col(Link::FilmId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(LinkLanguage::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(LinkLanguage::LinkId).string_len(32).not_null())
                    .col(
                        ColumnDef::new(LinkLanguage::LanguageId)
                            .string_len(32)
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(LinkLanguage::LinkId)
                            .col(LinkLanguage::LanguageId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_link_language_link")
                            .from(LinkLanguage::Table, LinkLanguage::LinkId)
                            .to(Link::Table, Link::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_link_language_language")
                            .from(LinkLanguage::Table, LinkLanguage::LanguageId)
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
            .drop_table(Table::drop().table(LinkLanguage::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Link::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Link {
    Table,
    Id,
    Url,
    Size,
    Subtitle,
    Quality,
    Season,
    Episode,
    FilmId,
    CreatedAt,
}

#[derive(Iden)]
enum LinkLanguage {
    Table,
    LinkId,
    LanguageId,
}

#[derive(Iden)]
enum Film {
    Table,
    Id,
}

#[derive(Iden)]
enum Language {
    Table,
    Id,
}
