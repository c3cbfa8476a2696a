use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .alter_table(
                Table::alter()
                    .table(CastMember::Table)
                    .add_column(string_null(CastMember::PhotoUrl))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .alter_table(
                Table::alter().table(CastMember::Table).drop_column(CastMember::PhotoUrl).to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
enum CastMember {
    Table,
    PhotoUrl,
}
