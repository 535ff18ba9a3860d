use anyhow::{Context, Result};
use std::time::Duration;

use tracing::{error, info};

use crate::catalog::{Catalog, NewAlbum, NewArtist, NewTrack};
use crate::catalog_store::{Album, Artist, Track};

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, put},
    Json, Router,
};
use serde::Serialize;

use super::error::ApiResult;
use super::links::{linked_all, Linkable, Linked};
use super::{log_requests, state::*, ServerConfig};

#[derive(Serialize)]
struct ServerStats {
    pub uptime: String,
    pub version: String,
}

fn format_uptime(duration: Duration) -> String {
    let total_seconds = duration.as_secs();

    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}d {:02}:{:02}:{:02}", days, hours, minutes, seconds)
}

type LinkedJson<T> = Json<Linked<T>>;
type LinkedListJson<T> = Json<Vec<Linked<T>>>;

async fn home(State(state): State<ServerState>) -> impl IntoResponse {
    let stats = ServerStats {
        uptime: format_uptime(state.start_time.elapsed()),
        version: state.version.clone(),
    };
    Json(stats)
}

// =============================================================================
// Artists
// =============================================================================

async fn list_artists(
    State(catalog): State<GuardedCatalog>,
    State(config): State<ServerConfig>,
) -> ApiResult<LinkedListJson<Artist>> {
    let artists = catalog.list_artists()?;
    Ok(Json(linked_all(artists, &config.public_base_url)))
}

async fn create_artist(
    State(catalog): State<GuardedCatalog>,
    State(config): State<ServerConfig>,
    body: Result<Json<NewArtist>, JsonRejection>,
) -> ApiResult<(StatusCode, LinkedJson<Artist>)> {
    let Json(new_artist) = body?;
    let artist = catalog.create_artist(new_artist)?;
    Ok((
        StatusCode::CREATED,
        Json(artist.linked(&config.public_base_url)),
    ))
}

async fn get_artist(
    State(catalog): State<GuardedCatalog>,
    State(config): State<ServerConfig>,
    Path(id): Path<String>,
) -> ApiResult<LinkedJson<Artist>> {
    let artist = catalog.get_artist(&id)?;
    Ok(Json(artist.linked(&config.public_base_url)))
}

async fn delete_artist(
    State(catalog): State<GuardedCatalog>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    catalog.delete_artist(&id)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_artist_albums(
    State(catalog): State<GuardedCatalog>,
    State(config): State<ServerConfig>,
    Path(id): Path<String>,
) -> ApiResult<LinkedListJson<Album>> {
    let albums = catalog.list_artist_albums(&id)?;
    Ok(Json(linked_all(albums, &config.public_base_url)))
}

async fn create_album(
    State(catalog): State<GuardedCatalog>,
    State(config): State<ServerConfig>,
    Path(artist_id): Path<String>,
    body: Result<Json<NewAlbum>, JsonRejection>,
) -> ApiResult<(StatusCode, LinkedJson<Album>)> {
    let Json(new_album) = body?;
    let album = catalog.create_album(&artist_id, new_album)?;
    Ok((
        StatusCode::CREATED,
        Json(album.linked(&config.public_base_url)),
    ))
}

async fn list_artist_tracks(
    State(catalog): State<GuardedCatalog>,
    State(config): State<ServerConfig>,
    Path(id): Path<String>,
) -> ApiResult<LinkedListJson<Track>> {
    let tracks = catalog.list_artist_tracks(&id)?;
    Ok(Json(linked_all(tracks, &config.public_base_url)))
}

async fn play_artist(
    State(catalog): State<GuardedCatalog>,
    State(config): State<ServerConfig>,
    Path(id): Path<String>,
) -> ApiResult<LinkedListJson<Track>> {
    let tracks = catalog.play_artist(&id)?;
    Ok(Json(linked_all(tracks, &config.public_base_url)))
}

// =============================================================================
// Albums
// =============================================================================

async fn list_albums(
    State(catalog): State<GuardedCatalog>,
    State(config): State<ServerConfig>,
) -> ApiResult<LinkedListJson<Album>> {
    let albums = catalog.list_albums()?;
    Ok(Json(linked_all(albums, &config.public_base_url)))
}

async fn get_album(
    State(catalog): State<GuardedCatalog>,
    State(config): State<ServerConfig>,
    Path(id): Path<String>,
) -> ApiResult<LinkedJson<Album>> {
    let album = catalog.get_album(&id)?;
    Ok(Json(album.linked(&config.public_base_url)))
}

async fn delete_album(
    State(catalog): State<GuardedCatalog>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    catalog.delete_album(&id)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_album_tracks(
    State(catalog): State<GuardedCatalog>,
    State(config): State<ServerConfig>,
    Path(id): Path<String>,
) -> ApiResult<LinkedListJson<Track>> {
    let tracks = catalog.list_album_tracks(&id)?;
    Ok(Json(linked_all(tracks, &config.public_base_url)))
}

async fn create_track(
    State(catalog): State<GuardedCatalog>,
    State(config): State<ServerConfig>,
    Path(album_id): Path<String>,
    body: Result<Json<NewTrack>, JsonRejection>,
) -> ApiResult<(StatusCode, LinkedJson<Track>)> {
    let Json(new_track) = body?;
    let track = catalog.create_track(&album_id, new_track)?;
    Ok((
        StatusCode::CREATED,
        Json(track.linked(&config.public_base_url)),
    ))
}

async fn play_album(
    State(catalog): State<GuardedCatalog>,
    State(config): State<ServerConfig>,
    Path(id): Path<String>,
) -> ApiResult<LinkedListJson<Track>> {
    let tracks = catalog.play_album(&id)?;
    Ok(Json(linked_all(tracks, &config.public_base_url)))
}

// =============================================================================
// Tracks
// =============================================================================

async fn list_tracks(
    State(catalog): State<GuardedCatalog>,
    State(config): State<ServerConfig>,
) -> ApiResult<LinkedListJson<Track>> {
    let tracks = catalog.list_tracks()?;
    Ok(Json(linked_all(tracks, &config.public_base_url)))
}

async fn get_track(
    State(catalog): State<GuardedCatalog>,
    State(config): State<ServerConfig>,
    Path(id): Path<String>,
) -> ApiResult<LinkedJson<Track>> {
    let track = catalog.get_track(&id)?;
    Ok(Json(track.linked(&config.public_base_url)))
}

async fn delete_track(
    State(catalog): State<GuardedCatalog>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    catalog.delete_track(&id)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn play_track(
    State(catalog): State<GuardedCatalog>,
    State(config): State<ServerConfig>,
    Path(id): Path<String>,
) -> ApiResult<LinkedJson<Track>> {
    let track = catalog.play_track(&id)?;
    Ok(Json(track.linked(&config.public_base_url)))
}

pub fn make_app(config: ServerConfig, catalog: Catalog) -> Router {
    let state = ServerState::new(config, catalog);

    Router::new()
        .route("/", get(home))
        .route("/artists", get(list_artists).post(create_artist))
        .route("/artists/{id}", get(get_artist).delete(delete_artist))
        .route(
            "/artists/{id}/albums",
            get(list_artist_albums).post(create_album),
        )
        .route("/artists/{id}/albums/play", put(play_artist))
        .route("/artists/{id}/tracks", get(list_artist_tracks))
        .route("/albums", get(list_albums))
        .route("/albums/{id}", get(get_album).delete(delete_album))
        .route("/albums/{id}/tracks", get(list_album_tracks).post(create_track))
        .route("/albums/{id}/tracks/play", put(play_album))
        .route("/tracks", get(list_tracks))
        .route("/tracks/{id}", get(get_track).delete(delete_track))
        .route("/tracks/{id}/play", put(play_track))
        .layer(middleware::from_fn_with_state(state.clone(), log_requests))
        .with_state(state)
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", err);
        return;
    }
    info!("Shutdown signal received, draining connections...");
}

pub async fn run_server(catalog: Catalog, config: ServerConfig) -> Result<()> {
    let port = config.port;
    let app = make_app(config, catalog);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
        .await
        .with_context(|| format!("Failed to bind port {}", port))?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}
