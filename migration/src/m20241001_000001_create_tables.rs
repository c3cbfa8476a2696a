use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Cinema::Table)
                    .if_not_exists()
                    .col(pk_auto(Cinema::Id))
                    .col(string(Cinema::Name))
                    .col(string(Cinema::Address))
                    .col(string_null(Cinema::PhotoUrl))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Hall::Table)
                    .if_not_exists()
                    .col(pk_auto(Hall::Id))
                    .col(integer(Hall::CinemaId))
                    .col(string(Hall::Name))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_hall_cinema")
                            .from(Hall::Table, Hall::CinemaId)
                            .to(Cinema::Table, Cinema::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Movie::Table)
                    .if_not_exists()
                    .col(pk_auto(Movie::Id))
                    .col(string(Movie::Title))
                    .col(text_null(Movie::Description))
                    .col(integer_null(Movie::DurationMinutes))
                    .col(integer_null(Movie::ReleaseYear))
                    .col(string_null(Movie::PosterUrl))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Genre::Table)
                    .if_not_exists()
                    .col(pk_auto(Genre::Id))
                    .col(string(Genre::Name))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(MovieGenre::Table)
                    .if_not_exists()
                    .col(pk_auto(MovieGenre::Id))
                    .col(integer(MovieGenre::MovieId))
                    .col(integer(MovieGenre::GenreId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_movie_genre_movie")
                            .from(MovieGenre::Table, MovieGenre::MovieId)
                            .to(Movie::Table, Movie::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_movie_genre_genre")
                            .from(MovieGenre::Table, MovieGenre::GenreId)
                            .to(Genre::Table, Genre::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CastMember::Table)
                    .if_not_exists()
                    .col(pk_auto(CastMember::Id))
                    .col(string(CastMember::FullName))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Position::Table)
                    .if_not_exists()
                    .col(pk_auto(Position::Id))
                    .col(string(Position::Name))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(MovieCast::Table)
                    .if_not_exists()
                    .col(pk_auto(MovieCast::Id))
                    .col(integer(MovieCast::MovieId))
                    .col(integer(MovieCast::CastMemberId))
                    .col(integer(MovieCast::PositionId))
                    .col(string_null(MovieCast::PhotoUrl))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_movie_cast_movie")
                            .from(MovieCast::Table, MovieCast::MovieId)
                            .to(Movie::Table, Movie::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_movie_cast_cast_member")
                            .from(MovieCast::Table, MovieCast::CastMemberId)
                            .to(CastMember::Table, CastMember::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_movie_cast_position")
                            .from(MovieCast::Table, MovieCast::PositionId)
                            .to(Position::Table, Position::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Session::Table)
                    .if_not_exists()
                    .col(pk_auto(Session::Id))
                    .col(integer(Session::HallId))
                    .col(integer(Session::MovieId))
                    .col(integer(Session::StatusId))
                    .col(string(Session::StartTime))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_session_hall")
                            .from(Session::Table, Session::HallId)
                            .to(Hall::Table, Hall::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_session_movie")
                            .from(Session::Table, Session::MovieId)
                            .to(Movie::Table, Movie::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_movie_cast_movie_id")
                    .table(MovieCast::Table)
                    .col(MovieCast::MovieId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_movie_cast_cast_member_id")
                    .table(MovieCast::Table)
                    .col(MovieCast::CastMemberId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_session_hall_id")
                    .table(Session::Table)
                    .col(Session::HallId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Session::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(MovieCast::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Position::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(CastMember::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(MovieGenre::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Genre::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Movie::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Hall::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Cinema::Table).to_owned()).await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Cinema {
    Table,
    Id,
    Name,
    Address,
    PhotoUrl,
}

#[derive(DeriveIden)]
enum Hall {
    Table,
    Id,
    CinemaId,
    Name,
}

#[derive(DeriveIden)]
enum Movie {
    Table,
    Id,
    Title,
    Description,
    DurationMinutes,
    ReleaseYear,
    PosterUrl,
}

#[derive(DeriveIden)]
enum Genre {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
enum MovieGenre {
    Table,
    Id,
    MovieId,
    GenreId,
}

#[derive(DeriveIden)]
enum CastMember {
    Table,
    Id,
    FullName,
}

#[derive(DeriveIden)]
enum Position {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
enum MovieCast {
    Table,
    Id,
    MovieId,
    CastMemberId,
    PositionId,
    PhotoUrl,
}

#[derive(DeriveIden)]
enum Session {
    Table,
    Id,
    HallId,
    MovieId,
    StatusId,
    StartTime,
}
