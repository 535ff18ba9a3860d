//! HTTP client for end-to-end tests
//!
//! This module provides a high-level HTTP client that wraps reqwest
//! and provides methods for all catalog-server endpoints.
//!
//! When API routes or request formats change, update only this file.

use super::constants::*;
use reqwest::Response;
use serde_json::json;
use std::time::Duration;

pub struct TestClient {
    /// The underlying reqwest client (public for custom requests in tests)
    pub client: reqwest::Client,
    /// The base URL of the test server
    pub base_url: String,
}

impl TestClient {
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build reqwest client");

        Self { client, base_url }
    }

    async fn get(&self, path: &str) -> Response {
        self.client
            .get(format!("{}{}", self.base_url, path))
            .send()
            .await
            .unwrap_or_else(|e| panic!("GET {} failed: {}", path, e))
    }

    async fn post(&self, path: &str, body: serde_json::Value) -> Response {
        self.client
            .post(format!("{}{}", self.base_url, path))
            .json(&body)
            .send()
            .await
            .unwrap_or_else(|e| panic!("POST {} failed: {}", path, e))
    }

    async fn put(&self, path: &str) -> Response {
        self.client
            .put(format!("{}{}", self.base_url, path))
            .send()
            .await
            .unwrap_or_else(|e| panic!("PUT {} failed: {}", path, e))
    }

    async fn delete(&self, path: &str) -> Response {
        self.client
            .delete(format!("{}{}", self.base_url, path))
            .send()
            .await
            .unwrap_or_else(|e| panic!("DELETE {} failed: {}", path, e))
    }

    /// GET /
    pub async fn get_stats(&self) -> Response {
        self.get("/").await
    }

    // ========================================================================
    // Artist Endpoints
    // ========================================================================

    /// GET /artists
    pub async fn list_artists(&self) -> Response {
        self.get("/artists").await
    }

    /// POST /artists
    pub async fn create_artist(&self, name: &str, age: i64) -> Response {
        self.post("/artists", json!({ "name": name, "age": age }))
            .await
    }

    /// POST /artists with an arbitrary body
    pub async fn create_artist_raw(&self, body: serde_json::Value) -> Response {
        self.post("/artists", body).await
    }

    /// GET /artists/{id}
    pub async fn get_artist(&self, id: &str) -> Response {
        self.get(&format!("/artists/{}", id)).await
    }

    /// DELETE /artists/{id}
    pub async fn delete_artist(&self, id: &str) -> Response {
        self.delete(&format!("/artists/{}", id)).await
    }

    /// GET /artists/{id}/albums
    pub async fn list_artist_albums(&self, id: &str) -> Response {
        self.get(&format!("/artists/{}/albums", id)).await
    }

    /// POST /artists/{id}/albums
    pub async fn create_album(&self, artist_id: &str, name: &str, genre: &str) -> Response {
        self.post(
            &format!("/artists/{}/albums", artist_id),
            json!({ "name": name, "genre": genre }),
        )
        .await
    }

    /// GET /artists/{id}/tracks
    pub async fn list_artist_tracks(&self, id: &str) -> Response {
        self.get(&format!("/artists/{}/tracks", id)).await
    }

    /// PUT /artists/{id}/albums/play
    pub async fn play_artist(&self, id: &str) -> Response {
        self.put(&format!("/artists/{}/albums/play", id)).await
    }

    // ========================================================================
    // Album Endpoints
    // ========================================================================

    /// GET /albums
    pub async fn list_albums(&self) -> Response {
        self.get("/albums").await
    }

    /// GET /albums/{id}
    pub async fn get_album(&self, id: &str) -> Response {
        self.get(&format!("/albums/{}", id)).await
    }

    /// DELETE /albums/{id}
    pub async fn delete_album(&self, id: &str) -> Response {
        self.delete(&format!("/albums/{}", id)).await
    }

    /// GET /albums/{id}/tracks
    pub async fn list_album_tracks(&self, id: &str) -> Response {
        self.get(&format!("/albums/{}/tracks", id)).await
    }

    /// POST /albums/{id}/tracks
    pub async fn create_track(&self, album_id: &str, name: &str, duration: f64) -> Response {
        self.post(
            &format!("/albums/{}/tracks", album_id),
            json!({ "name": name, "duration": duration }),
        )
        .await
    }

    /// PUT /albums/{id}/tracks/play
    pub async fn play_album(&self, id: &str) -> Response {
        self.put(&format!("/albums/{}/tracks/play", id)).await
    }

    // ========================================================================
    // Track Endpoints
    // ========================================================================

    /// GET /tracks
    pub async fn list_tracks(&self) -> Response {
        self.get("/tracks").await
    }

    /// GET /tracks/{id}
    pub async fn get_track(&self, id: &str) -> Response {
        self.get(&format!("/tracks/{}", id)).await
    }

    /// DELETE /tracks/{id}
    pub async fn delete_track(&self, id: &str) -> Response {
        self.delete(&format!("/tracks/{}", id)).await
    }

    /// PUT /tracks/{id}/play
    pub async fn play_track(&self, id: &str) -> Response {
        self.put(&format!("/tracks/{}/play", id)).await
    }
}
