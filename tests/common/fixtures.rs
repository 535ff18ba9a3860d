//! Test fixture creation
//!
//! Seeds a fresh SQLite catalog through the catalog layer, so ids are the
//! real derived ones.

use super::constants::*;
use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;
use tunes_catalog_server::catalog::{Catalog, NewAlbum, NewArtist, NewTrack};
use tunes_catalog_server::catalog_store::SqliteRowStore;

/// Ids of everything the fixture catalog contains.
#[derive(Clone, Debug)]
pub struct SeededCatalog {
    pub artist_1_id: String,
    pub artist_2_id: String,
    pub album_1_id: String,
    pub album_2_id: String,
    /// Ids of ALBUM_1_TRACKS, in order
    pub album_1_track_ids: Vec<String>,
    /// Ids of ALBUM_2_TRACKS, in order
    pub album_2_track_ids: Vec<String>,
}

fn seed_artist(
    catalog: &Catalog,
    name: &str,
    age: i64,
    album: (&str, &str),
    tracks: &[(&str, f64)],
) -> Result<(String, String, Vec<String>)> {
    let artist = catalog.create_artist(NewArtist {
        name: name.to_string(),
        age,
    })?;
    let album = catalog.create_album(
        &artist.id,
        NewAlbum {
            name: album.0.to_string(),
            genre: album.1.to_string(),
        },
    )?;
    let mut track_ids = Vec::new();
    for (track_name, duration) in tracks {
        let track = catalog.create_track(
            &album.id,
            NewTrack {
                name: track_name.to_string(),
                duration: *duration,
            },
        )?;
        track_ids.push(track.id);
    }
    Ok((artist.id, album.id, track_ids))
}

/// Creates a temp directory holding a seeded catalog database.
///
/// Returns the directory (keep it alive), the database path, the open
/// catalog, and the ids of the seeded entities.
pub fn create_test_catalog() -> Result<(TempDir, PathBuf, Catalog, SeededCatalog)> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("catalog.db");

    let store = SqliteRowStore::new(&db_path, 2)?;
    let catalog = Catalog::new(Arc::new(store));

    let (artist_1_id, album_1_id, album_1_track_ids) = seed_artist(
        &catalog,
        ARTIST_1_NAME,
        ARTIST_1_AGE,
        (ALBUM_1_TITLE, ALBUM_1_GENRE),
        &ALBUM_1_TRACKS,
    )?;
    let (artist_2_id, album_2_id, album_2_track_ids) = seed_artist(
        &catalog,
        ARTIST_2_NAME,
        ARTIST_2_AGE,
        (ALBUM_2_TITLE, ALBUM_2_GENRE),
        &ALBUM_2_TRACKS,
    )?;

    let seeded = SeededCatalog {
        artist_1_id,
        artist_2_id,
        album_1_id,
        album_2_id,
        album_1_track_ids,
        album_2_track_ids,
    };
    Ok((temp_dir, db_path, catalog, seeded))
}
