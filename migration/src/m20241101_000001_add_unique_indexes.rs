use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .name("idx_cast_member_full_name_unique")
                    .table(CastMember::Table)
                    .col(CastMember::FullName)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_cinema_address_unique")
                    .table(Cinema::Table)
                    .col(Cinema::Address)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_hall_cinema_name_unique")
                    .table(Hall::Table)
                    .col(Hall::CinemaId)
                    .col(Hall::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop().name("idx_hall_cinema_name_unique").table(Hall::Table).to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop().name("idx_cinema_address_unique").table(Cinema::Table).to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_cast_member_full_name_unique")
                    .table(CastMember::Table)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum CastMember {
    Table,
    FullName,
}

#[derive(DeriveIden)]
enum Cinema {
    Table,
    Address,
}

#[derive(DeriveIden)]
enum Hall {
    Table,
    CinemaId,
    Name,
}
