//! Per-entity descriptors for the generic CRUD service: key column,
//! required-field checks, uniqueness rule, upload slot and cascade plan.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait,
    DatabaseTransaction, DbErr, EntityTrait, FromQueryResult, IntoActiveModel, ModelTrait,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait,
};
use serde::{Serialize, de::DeserializeOwned};

use crate::{
    cascade,
    entities::{cast_member, cinema, genre, hall, movie, movie_cast, movie_genre, position, session},
    error::{ServiceError, ServiceResult},
};

pub const CAST_MEMBERS_CACHE_KEY: &str = "all_cast_members";

#[async_trait]
pub trait Resource: Send + Sync + 'static {
    type Entity: EntityTrait<Model = Self::Model, Column = Self::Column>;
    type Model: ModelTrait<Entity = Self::Entity>
        + FromQueryResult
        + IntoActiveModel<Self::ActiveModel>
        + Serialize
        + DeserializeOwned
        + Clone
        + Send
        + Sync;
    type ActiveModel: ActiveModelTrait<Entity = Self::Entity> + ActiveModelBehavior + Send + Sync;
    type Column: ColumnTrait;

    const NAME: &'static str;
    /// Canonical route, used in `Location` headers and next links.
    const PATH: &'static str;
    /// Second route serving the same handlers.
    const ALIAS: &'static str;
    /// Listing cache entry to drop after every successful write.
    const CACHE_KEY: Option<&'static str> = None;

    fn id_column() -> Self::Column;

    fn id(model: &Self::Model) -> i32;

    fn validate(_model: &Self::Model) -> ServiceResult<()> {
        Ok(())
    }

    /// Rows matching this condition collide with `model`.
    fn unique_key(_model: &Self::Model) -> Option<Condition> {
        None
    }

    fn conflict_message(_model: &Self::Model) -> String {
        format!("{} already exists", Self::NAME)
    }

    /// Where an uploaded file's reference is stored, if the entity keeps one.
    fn upload_slot(_model: &mut Self::Model) -> Option<&mut Option<String>> {
        None
    }

    /// Deletes rows that only exist in reference to `model`. Runs before the
    /// row itself is removed, inside the same transaction.
    async fn purge_dependents(_txn: &DatabaseTransaction, _model: &Self::Model) -> Result<(), DbErr> {
        Ok(())
    }
}

fn required(field: &str, value: &str) -> ServiceResult<()> {
    if value.trim().is_empty() {
        return Err(ServiceError::ValidationFailed(format!("{field} is required")));
    }
    Ok(())
}

fn reference(field: &str, id: i32) -> ServiceResult<()> {
    if id <= 0 {
        return Err(ServiceError::ValidationFailed(format!("{field} must reference an existing row")));
    }
    Ok(())
}

pub struct Cinemas;

#[async_trait]
impl Resource for Cinemas {
    type Entity = cinema::Entity;
    type Model = cinema::Model;
    type ActiveModel = cinema::ActiveModel;
    type Column = cinema::Column;

    const NAME: &'static str = "cinema";
    const PATH: &'static str = "/api/CinemasApi";
    const ALIAS: &'static str = "/api/cinemas";

    fn id_column() -> Self::Column {
        cinema::Column::Id
    }

    fn id(model: &Self::Model) -> i32 {
        model.id
    }

    fn validate(model: &Self::Model) -> ServiceResult<()> {
        required("name", &model.name)?;
        required("address", &model.address)
    }

    fn unique_key(model: &Self::Model) -> Option<Condition> {
        Some(Condition::all().add(cinema::Column::Address.eq(model.address.clone())))
    }

    fn conflict_message(_model: &Self::Model) -> String {
        "a cinema with this address already exists".to_string()
    }

    fn upload_slot(model: &mut Self::Model) -> Option<&mut Option<String>> {
        Some(&mut model.photo_url)
    }

    async fn purge_dependents(txn: &DatabaseTransaction, model: &Self::Model) -> Result<(), DbErr> {
        cascade::delete_halls_of_cinema(txn, model.id).await?;
        Ok(())
    }
}

pub struct Halls;

#[async_trait]
impl Resource for Halls {
    type Entity = hall::Entity;
    type Model = hall::Model;
    type ActiveModel = hall::ActiveModel;
    type Column = hall::Column;

    const NAME: &'static str = "hall";
    const PATH: &'static str = "/api/HallsApi";
    const ALIAS: &'static str = "/api/halls";

    fn id_column() -> Self::Column {
        hall::Column::Id
    }

    fn id(model: &Self::Model) -> i32 {
        model.id
    }

    fn validate(model: &Self::Model) -> ServiceResult<()> {
        required("name", &model.name)?;
        reference("cinemaId", model.cinema_id)
    }

    fn unique_key(model: &Self::Model) -> Option<Condition> {
        Some(
            Condition::all()
                .add(hall::Column::Name.eq(model.name.clone()))
                .add(hall::Column::CinemaId.eq(model.cinema_id)),
        )
    }

    fn conflict_message(_model: &Self::Model) -> String {
        "a hall with this name already exists in this cinema".to_string()
    }

    async fn purge_dependents(txn: &DatabaseTransaction, model: &Self::Model) -> Result<(), DbErr> {
        let sessions = cascade::delete_sessions_in_halls(txn, &[model.id]).await?;
        tracing::debug!(hall_id = model.id, sessions, "purged hall sessions");
        Ok(())
    }
}

pub struct Movies;

#[async_trait]
impl Resource for Movies {
    type Entity = movie::Entity;
    type Model = movie::Model;
    type ActiveModel = movie::ActiveModel;
    type Column = movie::Column;

    const NAME: &'static str = "movie";
    const PATH: &'static str = "/api/MoviesApi";
    const ALIAS: &'static str = "/api/movies";

    fn id_column() -> Self::Column {
        movie::Column::Id
    }

    fn id(model: &Self::Model) -> i32 {
        model.id
    }

    fn validate(model: &Self::Model) -> ServiceResult<()> {
        required("title", &model.title)?;
        if model.duration_minutes.is_some_and(|d| d <= 0) {
            return Err(ServiceError::ValidationFailed("durationMinutes must be positive".into()));
        }
        Ok(())
    }

    fn upload_slot(model: &mut Self::Model) -> Option<&mut Option<String>> {
        Some(&mut model.poster_url)
    }

    async fn purge_dependents(txn: &DatabaseTransaction, model: &Self::Model) -> Result<(), DbErr> {
        cascade::delete_movie_dependents(txn, &[model.id]).await
    }
}

pub struct Genres;

#[async_trait]
impl Resource for Genres {
    type Entity = genre::Entity;
    type Model = genre::Model;
    type ActiveModel = genre::ActiveModel;
    type Column = genre::Column;

    const NAME: &'static str = "genre";
    const PATH: &'static str = "/api/GenresApi";
    const ALIAS: &'static str = "/api/genres";

    fn id_column() -> Self::Column {
        genre::Column::Id
    }

    fn id(model: &Self::Model) -> i32 {
        model.id
    }

    fn validate(model: &Self::Model) -> ServiceResult<()> {
        required("name", &model.name)
    }

    async fn purge_dependents(txn: &DatabaseTransaction, model: &Self::Model) -> Result<(), DbErr> {
        movie_genre::Entity::delete_many()
            .filter(movie_genre::Column::GenreId.eq(model.id))
            .exec(txn)
            .await?;
        Ok(())
    }
}

pub struct MovieGenres;

#[async_trait]
impl Resource for MovieGenres {
    type Entity = movie_genre::Entity;
    type Model = movie_genre::Model;
    type ActiveModel = movie_genre::ActiveModel;
    type Column = movie_genre::Column;

    const NAME: &'static str = "movie genre";
    const PATH: &'static str = "/api/MovieGenresApi";
    const ALIAS: &'static str = "/api/movie-genres";

    fn id_column() -> Self::Column {
        movie_genre::Column::Id
    }

    fn id(model: &Self::Model) -> i32 {
        model.id
    }

    fn validate(model: &Self::Model) -> ServiceResult<()> {
        reference("movieId", model.movie_id)?;
        reference("genreId", model.genre_id)
    }
}

pub struct CastMembers;

#[async_trait]
impl Resource for CastMembers {
    type Entity = cast_member::Entity;
    type Model = cast_member::Model;
    type ActiveModel = cast_member::ActiveModel;
    type Column = cast_member::Column;

    const NAME: &'static str = "cast member";
    const PATH: &'static str = "/api/CastMembersApi";
    const ALIAS: &'static str = "/api/cast-members";
    const CACHE_KEY: Option<&'static str> = Some(CAST_MEMBERS_CACHE_KEY);

    fn id_column() -> Self::Column {
        cast_member::Column::Id
    }

    fn id(model: &Self::Model) -> i32 {
        model.id
    }

    fn validate(model: &Self::Model) -> ServiceResult<()> {
        required("fullName", &model.full_name)
    }

    fn unique_key(model: &Self::Model) -> Option<Condition> {
        Some(Condition::all().add(cast_member::Column::FullName.eq(model.full_name.clone())))
    }

    fn conflict_message(model: &Self::Model) -> String {
        format!("cast member `{}` already exists", model.full_name)
    }

    fn upload_slot(model: &mut Self::Model) -> Option<&mut Option<String>> {
        Some(&mut model.photo_url)
    }

    // A movie whose last cast row goes away with this member is pruned along
    // with its sessions and genre links.
    async fn purge_dependents(txn: &DatabaseTransaction, model: &Self::Model) -> Result<(), DbErr> {
        let movie_ids = cascade::movies_with_cast_member(txn, model.id).await?;

        movie_cast::Entity::delete_many()
            .filter(movie_cast::Column::CastMemberId.eq(model.id))
            .exec(txn)
            .await?;

        let orphaned = cascade::movies_without_cast(txn, &movie_ids).await?;
        if !orphaned.is_empty() {
            tracing::info!(
                cast_member_id = model.id,
                movies = ?orphaned,
                "pruning movies left without cast"
            );
            cascade::delete_movies(txn, &orphaned).await?;
        }
        Ok(())
    }
}

pub struct Positions;

#[async_trait]
impl Resource for Positions {
    type Entity = position::Entity;
    type Model = position::Model;
    type ActiveModel = position::ActiveModel;
    type Column = position::Column;

    const NAME: &'static str = "position";
    const PATH: &'static str = "/api/PositionsApi";
    const ALIAS: &'static str = "/api/positions";

    fn id_column() -> Self::Column {
        position::Column::Id
    }

    fn id(model: &Self::Model) -> i32 {
        model.id
    }

    fn validate(model: &Self::Model) -> ServiceResult<()> {
        required("name", &model.name)
    }

    async fn purge_dependents(txn: &DatabaseTransaction, model: &Self::Model) -> Result<(), DbErr> {
        movie_cast::Entity::delete_many()
            .filter(movie_cast::Column::PositionId.eq(model.id))
            .exec(txn)
            .await?;
        Ok(())
    }
}

pub struct MovieCasts;

#[async_trait]
impl Resource for MovieCasts {
    type Entity = movie_cast::Entity;
    type Model = movie_cast::Model;
    type ActiveModel = movie_cast::ActiveModel;
    type Column = movie_cast::Column;

    const NAME: &'static str = "movie cast";
    const PATH: &'static str = "/api/MovieCastsApi";
    const ALIAS: &'static str = "/api/movie-casts";

    fn id_column() -> Self::Column {
        movie_cast::Column::Id
    }

    fn id(model: &Self::Model) -> i32 {
        model.id
    }

    fn validate(model: &Self::Model) -> ServiceResult<()> {
        reference("movieId", model.movie_id)?;
        reference("castMemberId", model.cast_member_id)?;
        reference("positionId", model.position_id)
    }

    fn upload_slot(model: &mut Self::Model) -> Option<&mut Option<String>> {
        Some(&mut model.photo_url)
    }
}

pub struct Sessions;

#[async_trait]
impl Resource for Sessions {
    type Entity = session::Entity;
    type Model = session::Model;
    type ActiveModel = session::ActiveModel;
    type Column = session::Column;

    const NAME: &'static str = "session";
    const PATH: &'static str = "/api/SessionsApi";
    const ALIAS: &'static str = "/api/sessions";

    fn id_column() -> Self::Column {
        session::Column::Id
    }

    fn id(model: &Self::Model) -> i32 {
        model.id
    }

    fn validate(model: &Self::Model) -> ServiceResult<()> {
        reference("hallId", model.hall_id)?;
        reference("movieId", model.movie_id)?;
        if model.status_id < 0 {
            return Err(ServiceError::ValidationFailed("statusId must not be negative".into()));
        }
        model.start_time.parse::<jiff::Timestamp>().map_err(|err| {
            ServiceError::ValidationFailed(format!("startTime is not an RFC 3339 timestamp: {err}"))
        })?;
        Ok(())
    }
}

/// Movies a cast member appears in, by title.
pub async fn movies_featuring<C>(db: &C, cast_member_id: i32) -> Result<Vec<movie::Model>, DbErr>
where
    C: ConnectionTrait,
{
    movie::Entity::find()
        .join(sea_orm::JoinType::InnerJoin, movie::Relation::MovieCast.def())
        .filter(movie_cast::Column::CastMemberId.eq(cast_member_id))
        .distinct()
        .order_by_asc(movie::Column::Title)
        .all(db)
        .await
}
