//! End-to-end tests for deletes and their cascades

mod common;

use common::{TestClient, TestServer, ALBUM_1_TRACKS, ALBUM_2_TRACKS};
use reqwest::StatusCode;
use serde_json::Value;

#[tokio::test]
async fn test_delete_artist_removes_albums_and_tracks() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());
    let seeded = &server.seeded;

    // A second album so the cascade spans more than one
    let response = client.create_album(&seeded.artist_1_id, "Second Album", "rock").await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let second: Value = response.json().await.unwrap();
    let second_id = second["id"].as_str().unwrap().to_string();
    for name in ["A", "B", "C"] {
        let response = client.create_track(&second_id, name, 100.0).await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = client.delete_artist(&seeded.artist_1_id).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    assert_eq!(
        client.get_artist(&seeded.artist_1_id).await.status(),
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        client.get_album(&seeded.album_1_id).await.status(),
        StatusCode::NOT_FOUND
    );
    assert_eq!(client.get_album(&second_id).await.status(), StatusCode::NOT_FOUND);
    for id in &seeded.album_1_track_ids {
        assert_eq!(client.get_track(id).await.status(), StatusCode::NOT_FOUND);
    }

    let albums: Vec<Value> = client.list_albums().await.json().await.unwrap();
    assert!(albums
        .iter()
        .all(|a| a["artist_id"] != seeded.artist_1_id.as_str()));
    let tracks: Vec<Value> = client.list_tracks().await.json().await.unwrap();
    assert_eq!(tracks.len(), ALBUM_2_TRACKS.len());
    assert!(tracks
        .iter()
        .all(|t| t["artist_id"] == seeded.artist_2_id.as_str()));
}

#[tokio::test]
async fn test_delete_album_removes_only_its_tracks() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());
    let seeded = &server.seeded;

    let response = client.delete_album(&seeded.album_2_id).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // Artist survives with no albums
    assert_eq!(
        client.get_artist(&seeded.artist_2_id).await.status(),
        StatusCode::OK
    );
    let albums: Vec<Value> = client
        .list_artist_albums(&seeded.artist_2_id)
        .await
        .json()
        .await
        .unwrap();
    assert!(albums.is_empty());
    let tracks: Vec<Value> = client
        .list_artist_tracks(&seeded.artist_2_id)
        .await
        .json()
        .await
        .unwrap();
    assert!(tracks.is_empty());

    let tracks: Vec<Value> = client.list_tracks().await.json().await.unwrap();
    assert_eq!(tracks.len(), ALBUM_1_TRACKS.len());
}

#[tokio::test]
async fn test_delete_track() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());
    let track_id = &server.seeded.album_1_track_ids[1];

    let response = client.delete_track(track_id).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(client.get_track(track_id).await.status(), StatusCode::NOT_FOUND);

    let tracks: Vec<Value> = client
        .list_album_tracks(&server.seeded.album_1_id)
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(tracks.len(), ALBUM_1_TRACKS.len() - 1);
}

#[tokio::test]
async fn test_delete_missing_entities_returns_404_and_changes_nothing() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let before: Vec<Value> = client.list_tracks().await.json().await.unwrap();

    for _ in 0..2 {
        assert_eq!(
            client.delete_track("missing").await.status(),
            StatusCode::NOT_FOUND
        );
    }
    assert_eq!(
        client.delete_album("missing").await.status(),
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        client.delete_artist("missing").await.status(),
        StatusCode::NOT_FOUND
    );

    let after: Vec<Value> = client.list_tracks().await.json().await.unwrap();
    assert_eq!(before, after);
}

#[tokio::test]
async fn test_recreate_after_delete_gets_same_id() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let created: Value = client.create_artist("Phoenix", 33).await.json().await.unwrap();
    let id = created["id"].as_str().unwrap().to_string();

    assert_eq!(client.delete_artist(&id).await.status(), StatusCode::NO_CONTENT);

    let response = client.create_artist("Phoenix", 34).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let recreated: Value = response.json().await.unwrap();
    assert_eq!(recreated["id"], id.as_str());
    assert_eq!(recreated["age"], 34);
}
