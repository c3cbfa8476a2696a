//! Dependent-row purges. Every step runs on the caller's transaction so a
//! cascade either lands completely or not at all.

use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QuerySelect};

use crate::entities::{hall, movie, movie_cast, movie_genre, session};

pub async fn delete_sessions_in_halls<C>(db: &C, hall_ids: &[i32]) -> Result<u64, DbErr>
where
    C: ConnectionTrait,
{
    if hall_ids.is_empty() {
        return Ok(0);
    }
    let res = session::Entity::delete_many()
        .filter(session::Column::HallId.is_in(hall_ids.iter().copied()))
        .exec(db)
        .await?;
    Ok(res.rows_affected)
}

pub async fn delete_halls_of_cinema<C>(db: &C, cinema_id: i32) -> Result<u64, DbErr>
where
    C: ConnectionTrait,
{
    let hall_ids: Vec<i32> = hall::Entity::find()
        .select_only()
        .column(hall::Column::Id)
        .filter(hall::Column::CinemaId.eq(cinema_id))
        .into_tuple()
        .all(db)
        .await?;

    let sessions = delete_sessions_in_halls(db, &hall_ids).await?;
    let halls = hall::Entity::delete_many()
        .filter(hall::Column::CinemaId.eq(cinema_id))
        .exec(db)
        .await?
        .rows_affected;
    tracing::debug!(cinema_id, halls, sessions, "purged cinema halls");
    Ok(halls)
}

/// Sessions, genre links and cast rows of the given movies, in that order.
pub async fn delete_movie_dependents<C>(db: &C, movie_ids: &[i32]) -> Result<(), DbErr>
where
    C: ConnectionTrait,
{
    if movie_ids.is_empty() {
        return Ok(());
    }
    let ids = || movie_ids.iter().copied();

    session::Entity::delete_many().filter(session::Column::MovieId.is_in(ids())).exec(db).await?;
    movie_genre::Entity::delete_many()
        .filter(movie_genre::Column::MovieId.is_in(ids()))
        .exec(db)
        .await?;
    movie_cast::Entity::delete_many()
        .filter(movie_cast::Column::MovieId.is_in(ids()))
        .exec(db)
        .await?;
    Ok(())
}

pub async fn delete_movies<C>(db: &C, movie_ids: &[i32]) -> Result<(), DbErr>
where
    C: ConnectionTrait,
{
    if movie_ids.is_empty() {
        return Ok(());
    }
    delete_movie_dependents(db, movie_ids).await?;
    movie::Entity::delete_many()
        .filter(movie::Column::Id.is_in(movie_ids.iter().copied()))
        .exec(db)
        .await?;
    Ok(())
}

pub async fn movies_with_cast_member<C>(db: &C, cast_member_id: i32) -> Result<Vec<i32>, DbErr>
where
    C: ConnectionTrait,
{
    movie_cast::Entity::find()
        .select_only()
        .column(movie_cast::Column::MovieId)
        .filter(movie_cast::Column::CastMemberId.eq(cast_member_id))
        .distinct()
        .into_tuple()
        .all(db)
        .await
}

/// The subset of `movie_ids` that no longer has any cast row.
pub async fn movies_without_cast<C>(db: &C, movie_ids: &[i32]) -> Result<Vec<i32>, DbErr>
where
    C: ConnectionTrait,
{
    if movie_ids.is_empty() {
        return Ok(Vec::new());
    }
    let still_cast: Vec<i32> = movie_cast::Entity::find()
        .select_only()
        .column(movie_cast::Column::MovieId)
        .filter(movie_cast::Column::MovieId.is_in(movie_ids.iter().copied()))
        .distinct()
        .into_tuple()
        .all(db)
        .await?;

    Ok(movie_ids.iter().copied().filter(|id| !still_cast.contains(id)).collect())
}
