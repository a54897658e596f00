//! Create site settings table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SiteSettings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SiteSettings::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SiteSettings::SiteName)
                            .string_len(256)
                            .not_null(),
                    )
                    .col(ColumnDef::new(SiteSettings::Description).text().not_null())
                    .col(ColumnDef::new(SiteSettings::LogoUrl).string_len(512))
                    .col(ColumnDef::new(SiteSettings::InstagramUrl).string_len(512))
                    .col(ColumnDef::new(SiteSettings::TelegramUrl).string_len(512))
                    .col(ColumnDef::new(SiteSettings::TwitterUrl).string_len(512))
                    .col(ColumnDef::new(SiteSettings::ContactEmail).string_len(256))
                    .col(ColumnDef::new(SiteSettings::ContactPhone).string_len(64))
                    .col(ColumnDef::new(SiteSettings::UpdatedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SiteSettings::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum SiteSettings {
    Table,
    Id,
    SiteName,
    Description,
    LogoUrl,
    InstagramUrl,
    TelegramUrl,
    TwitterUrl,
    ContactEmail,
    ContactPhone,
    UpdatedAt,
}
