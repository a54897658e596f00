//! Create the title-based taxonomy tables.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

async fn create_title_table<T: Iden + Copy + 'static>(
    manager: &SchemaManager<'_>,
    table: T,
    id: T,
    title: T,
    index_name: &str,
) -> Result<(), DbErr> {
    manager
        .create_table(
            Table::create()
                .table(table)
                .if_not_exists()
                .col(ColumnDef::new(id).string_len(32).not_null().primary_key())
                .col(ColumnDef::new(title).string_len(256).not_null().unique_key())
                .to_owned(),
        )
        .await?;

    manager
        .create_index(
            Index::create()
                .name(index_name)
                .table(table)
                .col(title)
                .to_owned(),
        )
        .await
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        create_title_table(
            manager,
            Genre::Table,
            Genre::Id,
            Genre::Title,
            "idx_genre_title",
        )
        .await?;
        create_title_table(
            manager,
            Collection::Table,
            Collection::Id,
            Collection::Title,
            "idx_collection_title",
        )
        .await?;
        create_title_table(
            manager,
            Country::Table,
            Country::Id,
            Country::Title,
            "idx_country_title",
        )
        .await?;
        create_title_table(
            manager,
            Language::Table,
            Language::Id,
            Language::Title,
            "idx_language_title",
        )
        .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Language::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Country::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Collection::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Genre::Table).to_owned())
            .await
    }
}

#[derive(Iden, Clone, Copy)]
enum Genre {
    Table,
    Id,
    Title,
}

#[derive(Iden, Clone, Copy)]
enum Collection {
    Table,
    Id,
    Title,
}

#[derive(Iden, Clone, Copy)]
enum Country {
    Table,
    Id,
    Title,
}

#[derive(Iden, Clone, Copy)]
enum Language {
    Table,
    Id,
    Title,
}
