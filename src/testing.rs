//! In-memory application used by the unit tests.

use std::{path::PathBuf, sync::Arc, time::Duration};

use tempfile::TempDir;

use crate::{
    AppState,
    cache::ListingCache,
    config::Config,
    db,
    entities::{cast_member, cinema, genre, hall, movie, movie_cast, movie_genre, position, session},
    resource::{CastMembers, Cinemas, Genres, Halls, MovieCasts, MovieGenres, Movies, Positions, Sessions},
    service::CrudService,
    upload::LocalStorage,
};

pub struct TestApp {
    pub state: Arc<AppState>,
    dir: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            addr: "127.0.0.1:0".parse().unwrap(),
            database_url: "sqlite::memory:".to_string(),
            upload_dir: dir.path().join("uploads"),
            upload_url_prefix: "/uploads".to_string(),
            blob_connection_string: None,
            blob_container: "uploads".to_string(),
            cast_list_ttl_secs: 600,
            default_page_limit: 10,
        };

        let db = db::connect_and_migrate(&config.database_url).await.unwrap();
        let uploader =
            Arc::new(LocalStorage::new(config.upload_dir.clone(), config.upload_url_prefix.clone()));
        let crud = CrudService::new(
            db,
            uploader,
            ListingCache::default(),
            Duration::from_secs(config.cast_list_ttl_secs),
        );

        Self { state: Arc::new(AppState { config: Arc::new(config), crud }), dir }
    }

    pub fn crud(&self) -> &CrudService {
        &self.state.crud
    }

    pub fn upload_dir(&self) -> PathBuf {
        self.dir.path().join("uploads")
    }

    pub async fn cinema(&self, name: &str, address: &str) -> cinema::Model {
        let model = cinema::Model {
            id: 0,
            name: name.to_string(),
            address: address.to_string(),
            photo_url: None,
        };
        self.crud().create::<Cinemas>(model, None).await.unwrap()
    }

    pub async fn hall(&self, cinema_id: i32, name: &str) -> hall::Model {
        let model = hall::Model { id: 0, cinema_id, name: name.to_string() };
        self.crud().create::<Halls>(model, None).await.unwrap()
    }

    pub async fn movie(&self, title: &str) -> movie::Model {
        let model = movie::Model {
            id: 0,
            title: title.to_string(),
            description: None,
            duration_minutes: Some(117),
            release_year: Some(1979),
            poster_url: None,
        };
        self.crud().create::<Movies>(model, None).await.unwrap()
    }

    pub async fn genre(&self, name: &str) -> genre::Model {
        let model = genre::Model { id: 0, name: name.to_string() };
        self.crud().create::<Genres>(model, None).await.unwrap()
    }

    pub async fn tag(&self, movie_id: i32, genre_id: i32) -> movie_genre::Model {
        let model = movie_genre::Model { id: 0, movie_id, genre_id };
        self.crud().create::<MovieGenres>(model, None).await.unwrap()
    }

    pub async fn cast_member(&self, full_name: &str) -> cast_member::Model {
        let model = cast_member::Model { id: 0, full_name: full_name.to_string(), photo_url: None };
        self.crud().create::<CastMembers>(model, None).await.unwrap()
    }

    pub async fn position(&self, name: &str) -> position::Model {
        let model = position::Model { id: 0, name: name.to_string() };
        self.crud().create::<Positions>(model, None).await.unwrap()
    }

    pub async fn cast(&self, movie_id: i32, cast_member_id: i32, position_id: i32) -> movie_cast::Model {
        let model =
            movie_cast::Model { id: 0, movie_id, cast_member_id, position_id, photo_url: None };
        self.crud().create::<MovieCasts>(model, None).await.unwrap()
    }

    pub async fn session(&self, hall_id: i32, movie_id: i32) -> session::Model {
        let model = session::Model {
            id: 0,
            hall_id,
            movie_id,
            status_id: 1,
            start_time: "2024-11-01T19:30:00Z".to_string(),
        };
        self.crud().create::<Sessions>(model, None).await.unwrap()
    }
}
