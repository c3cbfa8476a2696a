use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{StatusCode, header::LOCATION},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use sea_orm::{ColumnTrait, Condition};

use crate::{
    AppState,
    entities::movie_cast,
    error::{AppResult, ServiceResult},
    extract::Submission,
    models::{FileOnlyForm, ListQuery, ListResponse, MovieCastQuery, PagedResponse, UploadResponse},
    pagination::Window,
    resource::{
        CastMembers, Cinemas, Genres, Halls, MovieCasts, MovieGenres, Movies, Positions, Resource,
        Sessions, movies_featuring,
    },
    templates,
};

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/cast-members", get(cast_members_page))
        .route("/cast-members/{id}", get(cast_member_page))
        .merge(resource_routes::<Cinemas>())
        .merge(resource_routes::<Halls>())
        .merge(resource_routes::<Movies>())
        .merge(resource_routes::<Genres>())
        .merge(resource_routes::<MovieGenres>())
        .merge(resource_routes::<CastMembers>())
        .merge(resource_routes::<Positions>())
        .merge(resource_routes::<Sessions>())
        .route(MovieCasts::PATH, get(list_movie_casts).post(create::<MovieCasts>))
        .route(MovieCasts::ALIAS, get(list_movie_casts).post(create::<MovieCasts>))
        .merge(item_routes::<MovieCasts>())
        .route(&format!("{}/upload", Positions::PATH), post(upload))
        .route(&format!("{}/upload", Positions::ALIAS), post(upload))
        .with_state(state)
}

fn resource_routes<R: Resource>() -> Router<Arc<AppState>> {
    let mut router = item_routes::<R>();
    for path in [R::PATH, R::ALIAS] {
        router = router.route(path, get(list::<R>).post(create::<R>));
    }
    router
}

fn item_routes<R: Resource>() -> Router<Arc<AppState>> {
    let mut router = Router::new();
    for path in [R::PATH, R::ALIAS] {
        router = router.route(
            &format!("{path}/{{id}}"),
            get(show::<R>).put(update::<R>).delete(destroy::<R>),
        );
    }
    router
}

fn window(state: &AppState, q: &ListQuery) -> ServiceResult<Window> {
    Window::from_skip_limit(q.skip.unwrap_or(0), q.limit.unwrap_or(state.config.default_page_limit))
}

async fn list<R: Resource>(
    State(state): State<Arc<AppState>>,
    Query(q): Query<ListQuery>,
) -> ServiceResult<Json<ListResponse<R::Model>>> {
    let page = state.crud.list::<R>(window(&state, &q)?).await?;
    Ok(Json(ListResponse::new(page, R::PATH)))
}

async fn show<R: Resource>(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> ServiceResult<Json<R::Model>> {
    Ok(Json(state.crud.get::<R>(id).await?))
}

async fn create<R: Resource>(
    State(state): State<Arc<AppState>>,
    Submission { body, file }: Submission<R::Model>,
) -> ServiceResult<Response> {
    let created = state.crud.create::<R>(body, file).await?;
    let location = format!("{}/{}", R::PATH, R::id(&created));
    Ok((StatusCode::CREATED, [(LOCATION, location)], Json(created)).into_response())
}

async fn update<R: Resource>(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Submission { body, file }: Submission<R::Model>,
) -> ServiceResult<StatusCode> {
    state.crud.update::<R>(id, body, file).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn destroy<R: Resource>(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> ServiceResult<StatusCode> {
    state.crud.delete::<R>(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Movie cast rows support a page-numbered listing filtered by movie next to
/// the skip/limit one.
async fn list_movie_casts(
    State(state): State<Arc<AppState>>,
    Query(q): Query<MovieCastQuery>,
) -> ServiceResult<Response> {
    if !q.is_paged() {
        let q = ListQuery { skip: q.skip, limit: q.limit };
        let page = state.crud.list::<MovieCasts>(window(&state, &q)?).await?;
        return Ok(Json(ListResponse::new(page, MovieCasts::PATH)).into_response());
    }

    let window = Window::from_page(
        q.page.unwrap_or(1),
        q.page_size.unwrap_or(state.config.default_page_limit),
    )?;
    let filter = match q.movie_id {
        Some(movie_id) => Condition::all().add(movie_cast::Column::MovieId.eq(movie_id)),
        None => Condition::all(),
    };
    let page = state.crud.list_where::<MovieCasts>(window, filter).await?;
    Ok(Json(PagedResponse::new(page, MovieCasts::PATH, q.movie_id)).into_response())
}

async fn upload(
    State(state): State<Arc<AppState>>,
    Submission { file, .. }: Submission<FileOnlyForm>,
) -> ServiceResult<Response> {
    let Some(file) = file else {
        return Ok((StatusCode::BAD_REQUEST, "No file uploaded.").into_response());
    };
    let file_path = state.crud.upload_file(file).await?;
    Ok(Json(UploadResponse { file_path }).into_response())
}

pub async fn index(State(state): State<Arc<AppState>>) -> AppResult<Html<String>> {
    let window = Window::from_skip_limit(0, state.config.default_page_limit)?;
    let cinemas = state.crud.list::<Cinemas>(window).await?;
    Ok(Html(templates::index_page(&cinemas)))
}

pub async fn cast_members_page(State(state): State<Arc<AppState>>) -> AppResult<Html<String>> {
    let members = state.crud.cached_all::<CastMembers>().await?;
    Ok(Html(templates::cast_members_page(&members)))
}

pub async fn cast_member_page(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> AppResult<Html<String>> {
    let member = state.crud.get::<CastMembers>(id).await?;
    let movies = movies_featuring(state.crud.db(), member.id).await?;
    Ok(Html(templates::cast_member_page(&member, &movies)))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{Body, to_bytes},
        http::{Request, header::CONTENT_TYPE},
    };
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;
    use crate::testing::TestApp;

    const BOUNDARY: &str = "cinemadesk-test-boundary";

    async fn send(app: &TestApp, req: Request<Body>) -> (StatusCode, Response) {
        let resp = router(app.state.clone()).oneshot(req).await.unwrap();
        (resp.status(), resp)
    }

    async fn json_body(resp: Response) -> Value {
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::post(uri)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn put_json(uri: &str, body: Value) -> Request<Body> {
        Request::put(uri)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn multipart(uri: &str, fields: &[(&str, &str)], file: Option<(&str, &[u8])>) -> Request<Body> {
        let mut body = Vec::new();
        for (name, value) in fields {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
                )
                .as_bytes(),
            );
        }
        if let Some((file_name, data)) = file {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(data);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        Request::post(uri)
            .header(CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}"))
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn create_returns_location_and_body() {
        let app = TestApp::new().await;

        let (status, resp) = send(&app, post_json("/api/GenresApi", json!({ "name": "Drama" }))).await;
        assert_eq!(status, StatusCode::CREATED);
        let location = resp.headers()[LOCATION].to_str().unwrap().to_string();
        let body = json_body(resp).await;
        assert_eq!(body["name"], "Drama");
        assert_eq!(location, format!("/api/GenresApi/{}", body["id"]));

        let (status, resp) = send(&app, Request::get(&location).body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json_body(resp).await["name"], "Drama");
    }

    #[tokio::test]
    async fn listing_reports_window_and_next_link() {
        let app = TestApp::new().await;
        for name in ["Drama", "Comedy", "Horror"] {
            send(&app, post_json("/api/GenresApi", json!({ "name": name }))).await;
        }

        let req = Request::get("/api/GenresApi?skip=0&limit=2").body(Body::empty()).unwrap();
        let (status, resp) = send(&app, req).await;
        assert_eq!(status, StatusCode::OK);

        let body = json_body(resp).await;
        assert_eq!(body["data"].as_array().unwrap().len(), 2);
        assert_eq!(body["totalCount"], 3);
        assert_eq!(body["nextLink"], "/api/GenresApi?skip=2&limit=2");

        let req = Request::get("/api/GenresApi?skip=2&limit=2").body(Body::empty()).unwrap();
        let body = json_body(send(&app, req).await.1).await;
        assert_eq!(body["data"].as_array().unwrap().len(), 1);
        assert_eq!(body["nextLink"], Value::Null);
    }

    #[tokio::test]
    async fn negative_limit_is_bad_request() {
        let app = TestApp::new().await;
        let req = Request::get("/api/GenresApi?limit=-1").body(Body::empty()).unwrap();
        assert_eq!(send(&app, req).await.0, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn missing_row_is_empty_not_found() {
        let app = TestApp::new().await;
        let req = Request::get("/api/CinemasApi/42").body(Body::empty()).unwrap();
        let (status, resp) = send(&app, req).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(to_bytes(resp.into_body(), usize::MAX).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn duplicate_cast_member_is_conflict() {
        let app = TestApp::new().await;
        let body = json!({ "fullName": "Ada Lovelace" });

        assert_eq!(send(&app, post_json("/api/CastMembersApi", body.clone())).await.0, StatusCode::CREATED);
        assert_eq!(send(&app, post_json("/api/cast-members", body)).await.0, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn alias_routes_share_rows_and_canonical_links() {
        let app = TestApp::new().await;

        let cinema = app.cinema("Odeon", "1 Main St").await;

        let body = json!({ "cinemaId": cinema.id, "name": "Hall A" });
        let (status, resp) = send(&app, post_json("/api/halls", body)).await;
        assert_eq!(status, StatusCode::CREATED);
        let location = resp.headers()[LOCATION].to_str().unwrap().to_string();
        let id = json_body(resp).await["id"].as_i64().unwrap();
        assert_eq!(location, format!("/api/HallsApi/{id}"));

        let req = Request::get(format!("/api/halls/{id}")).body(Body::empty()).unwrap();
        assert_eq!(json_body(send(&app, req).await.1).await["name"], "Hall A");

        app.hall(cinema.id, "Hall B").await;
        let req = Request::get("/api/halls?limit=1").body(Body::empty()).unwrap();
        let body = json_body(send(&app, req).await.1).await;
        assert_eq!(body["nextLink"], "/api/HallsApi?skip=1&limit=1");
    }

    #[tokio::test]
    async fn update_with_mismatched_id_is_bad_request() {
        let app = TestApp::new().await;
        let created = json_body(send(&app, post_json("/api/GenresApi", json!({ "name": "Drama" }))).await.1).await;
        let id = created["id"].as_i64().unwrap();

        let req = put_json(&format!("/api/GenresApi/{id}"), json!({ "id": id + 1, "name": "Noir" }));
        assert_eq!(send(&app, req).await.0, StatusCode::BAD_REQUEST);

        let req = Request::get(format!("/api/GenresApi/{id}")).body(Body::empty()).unwrap();
        assert_eq!(json_body(send(&app, req).await.1).await["name"], "Drama");
    }

    #[tokio::test]
    async fn update_and_delete_answer_no_content() {
        let app = TestApp::new().await;
        let created = json_body(send(&app, post_json("/api/GenresApi", json!({ "name": "Drama" }))).await.1).await;
        let id = created["id"].as_i64().unwrap();

        let req = put_json(&format!("/api/GenresApi/{id}"), json!({ "id": id, "name": "Noir" }));
        assert_eq!(send(&app, req).await.0, StatusCode::NO_CONTENT);

        let req = Request::delete(format!("/api/GenresApi/{id}")).body(Body::empty()).unwrap();
        assert_eq!(send(&app, req).await.0, StatusCode::NO_CONTENT);

        let req = Request::delete(format!("/api/GenresApi/{id}")).body(Body::empty()).unwrap();
        assert_eq!(send(&app, req).await.0, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn multipart_create_stores_photo() {
        let app = TestApp::new().await;

        let req = multipart("/api/CastMembersApi", &[("fullName", "Ada Lovelace")], Some(("ada.png", &b"png"[..])));
        let (status, resp) = send(&app, req).await;
        assert_eq!(status, StatusCode::CREATED);

        let body = json_body(resp).await;
        assert_eq!(body["photoUrl"], "/uploads/ada.png");
        assert_eq!(std::fs::read(app.upload_dir().join("ada.png")).unwrap(), b"png");
    }

    #[tokio::test]
    async fn form_bodies_are_accepted() {
        let app = TestApp::new().await;
        let req = Request::post("/api/positions")
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from("name=Director"))
            .unwrap();

        let (status, resp) = send(&app, req).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json_body(resp).await["name"], "Director");
    }

    #[tokio::test]
    async fn position_upload_returns_file_path() {
        let app = TestApp::new().await;

        let req = multipart("/api/PositionsApi/upload", &[], Some(("notes.txt", &b"hello"[..])));
        let (status, resp) = send(&app, req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json_body(resp).await["filePath"], "/uploads/notes.txt");

        let req = multipart("/api/positions/upload", &[], None);
        let (status, resp) = send(&app, req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let text = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&text[..], b"No file uploaded.");
    }

    #[tokio::test]
    async fn movie_casts_page_by_movie() {
        let app = TestApp::new().await;
        let (movie, other) = (app.movie("Alien").await, app.movie("Heat").await);
        let position = app.position("Lead").await;
        for name in ["A", "B", "C"] {
            let member = app.cast_member(name).await;
            app.cast(movie.id, member.id, position.id).await;
        }
        let member = app.cast_member("D").await;
        app.cast(other.id, member.id, position.id).await;

        let uri = format!("/api/MovieCastsApi?movieId={}&page=1&pageSize=2", movie.id);
        let (status, resp) = send(&app, Request::get(uri).body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);

        let body = json_body(resp).await;
        assert_eq!(body["items"].as_array().unwrap().len(), 2);
        assert_eq!(body["totalItems"], 3);
        assert_eq!(body["totalPages"], 2);
        assert_eq!(
            body["nextLink"],
            format!("/api/MovieCastsApi?movieId={}&page=2&pageSize=2", movie.id)
        );
    }

    #[tokio::test]
    async fn cast_member_page_lists_movies() {
        let app = TestApp::new().await;
        let member = app.cast_member("Sigourney Weaver").await;
        let position = app.position("Lead").await;
        let movie = app.movie("Alien").await;
        app.cast(movie.id, member.id, position.id).await;

        let req = Request::get(format!("/cast-members/{}", member.id)).body(Body::empty()).unwrap();
        let (status, resp) = send(&app, req).await;
        assert_eq!(status, StatusCode::OK);
        let html = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let html = String::from_utf8(html.to_vec()).unwrap();
        assert!(html.contains("Sigourney Weaver"));
        assert!(html.contains("Alien"));

        let req = Request::get("/cast-members/999").body(Body::empty()).unwrap();
        assert_eq!(send(&app, req).await.0, StatusCode::NOT_FOUND);
    }
}
