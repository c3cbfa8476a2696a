mod cache;
mod cascade;
mod config;
mod db;
mod entities;
mod error;
mod extract;
mod models;
mod pagination;
mod resource;
mod routes;
mod service;
mod templates;
#[cfg(test)]
mod testing;
mod upload;

use std::{sync::Arc, time::Duration};

use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::{cache::ListingCache, config::Config, service::CrudService};

pub struct AppState {
    pub config: Arc<Config>,
    pub crud: CrudService,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "info,cinemadesk=debug,sqlx=warn".to_string()),
        )
        .init();

    let config = Arc::new(Config::from_env()?);

    let db = db::connect_and_migrate(&config.database_url).await?;
    let uploader = upload::from_config(&config)?;
    let crud = CrudService::new(
        db,
        uploader,
        ListingCache::new(),
        Duration::from_secs(config.cast_list_ttl_secs),
    );

    let state = Arc::new(AppState { config: config.clone(), crud });

    let app = routes::router(state)
        .nest_service(&config.upload_url_prefix, ServeDir::new(&config.upload_dir))
        .layer(CorsLayer::new().allow_origin(Any).allow_headers(Any).allow_methods(Any))
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    tracing::info!(addr = %config.addr, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}
