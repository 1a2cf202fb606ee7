use anyhow::Result;

use tracing::error;

use crate::catalog::{load_catalog, load_featured, load_taxonomy, Catalog, TagTaxonomy};
use crate::social::FeaturedContent;

use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};

use super::pages;
use super::requests_logging::log_requests;
use super::session::Session;
use super::state::ServerState;
use super::ServerConfig;

fn read_catalog(state: &ServerState) -> Result<Catalog> {
    load_catalog(&state.config.data_dir.join("songs.json"))
}

fn read_taxonomy(state: &ServerState) -> Result<TagTaxonomy> {
    load_taxonomy(&state.config.data_dir.join("tags.json"))
}

/// The featured document is optional; until the first social refresh has
/// run the page simply renders without it.
fn read_featured(state: &ServerState) -> FeaturedContent {
    load_featured(&state.config.data_dir.join("featured.json")).unwrap_or_default()
}

fn internal_error(err: anyhow::Error) -> Response {
    error!("Request failed: {:#}", err);
    StatusCode::INTERNAL_SERVER_ERROR.into_response()
}

async fn home(_session: Session, State(state): State<ServerState>) -> Response {
    let catalog = match read_catalog(&state) {
        Ok(x) => x,
        Err(err) => return internal_error(err),
    };
    let taxonomy = match read_taxonomy(&state) {
        Ok(x) => x,
        Err(err) => return internal_error(err),
    };
    let featured = read_featured(&state);
    Html(pages::render_home(catalog.len(), &taxonomy, &featured)).into_response()
}

async fn covers(State(state): State<ServerState>) -> Response {
    let catalog = match read_catalog(&state) {
        Ok(x) => x,
        Err(err) => return internal_error(err),
    };
    let mut songs = catalog.into_songs();
    pages::sort_songs(&mut songs);
    Html(pages::render_covers(&songs)).into_response()
}

async fn seamus(State(state): State<ServerState>) -> Response {
    let catalog = match read_catalog(&state) {
        Ok(x) => x,
        Err(err) => return internal_error(err),
    };
    let taxonomy = match read_taxonomy(&state) {
        Ok(x) => x,
        Err(err) => return internal_error(err),
    };
    // Sort before grouping so each genre bucket lists artists in order.
    let mut songs = catalog.into_songs();
    pages::sort_songs(&mut songs);
    let groups = pages::group_by_genre(&songs, &taxonomy);
    Html(pages::render_seamus(&groups)).into_response()
}

async fn songs_json(State(state): State<ServerState>) -> Response {
    match read_catalog(&state) {
        Ok(catalog) => Json(catalog).into_response(),
        Err(err) => internal_error(err),
    }
}

async fn featured_json(State(state): State<ServerState>) -> Response {
    Json(read_featured(&state)).into_response()
}

pub fn make_app(config: ServerConfig) -> Router {
    let state = ServerState::new(config);

    Router::new()
        .route("/", get(home))
        .route("/covers.html", get(covers))
        .route("/seamus.html", get(seamus))
        .route("/songs.json", get(songs_json))
        .route("/featured.json", get(featured_json))
        .layer(middleware::from_fn_with_state(state.clone(), log_requests))
        .with_state(state)
}

pub async fn run_server(config: ServerConfig) -> Result<()> {
    let port = config.port;
    let app = make_app(config);

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port)).await?;

    Ok(axum::serve(listener, app).await?)
}
