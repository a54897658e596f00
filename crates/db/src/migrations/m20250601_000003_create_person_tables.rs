//! Create actor and director tables.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Actor::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Actor::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Actor::FullName).string_len(256).not_null())
                    .col(ColumnDef::new(Actor::FullNameEn).string_len(256).not_null())
                    .col(ColumnDef::new(Actor::PictureUrl).string_len(512))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Director::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Director::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Director::FullName).string_len(256).not_null())
                    .col(
                        ColumnDef::new(Director::FullNameEn)
                            .string_len(256)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Director::PictureUrl).string_len(512))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_actor_full_name")
                    .table(Actor::Table)
                    .col(Actor::FullName)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_director_full_name")
                    .table(Director::Table)
                    .col(Director::FullName)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Director::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Actor::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Actor {
    Table,
    Id,
    FullName,
    FullNameEn,
    PictureUrl,
}

#[derive(Iden)]
enum Director {
    Table,
    Id,
    FullName,
    FullNameEn,
    PictureUrl,
}
