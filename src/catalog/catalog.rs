//! Catalog operations on top of a [`RowStore`].
//!
//! Every operation runs inside a single store transaction: creations check
//! the parent and the derived id before inserting, deletes cascade to all
//! children, and play counters are bumped for a whole scope at once. A
//! failure anywhere drops the transaction and leaves the store untouched.

use super::error::{CatalogError, CatalogResult, EntityKind};
use super::identifiers::{derive_album_id, derive_artist_id, derive_track_id};
use super::validation::{
    validate_album, validate_artist, validate_track, NewAlbum, NewArtist, NewTrack,
};
use crate::catalog_store::{
    Album, Artist, Field, Row, RowStore, RowTransaction, StoreError, TableName, Track,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Rows removed by a delete, parent included.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DeleteSummary {
    pub artists: usize,
    pub albums: usize,
    pub tracks: usize,
}

#[derive(Clone)]
pub struct Catalog {
    store: Arc<dyn RowStore>,
}

fn fetch<T>(tx: &dyn RowTransaction, kind: EntityKind, id: &str) -> CatalogResult<Option<T>>
where
    T: TryFrom<Row, Error = StoreError>,
{
    debug!("Looking up {} {}", kind, id);
    Ok(tx
        .get_by_key(kind.table(), id)?
        .map(T::try_from)
        .transpose()?)
}

fn require<T>(tx: &dyn RowTransaction, kind: EntityKind, id: &str) -> CatalogResult<T>
where
    T: TryFrom<Row, Error = StoreError>,
{
    fetch(tx, kind, id)?.ok_or_else(|| CatalogError::not_found(kind, id))
}

fn require_parent<T>(tx: &dyn RowTransaction, kind: EntityKind, id: &str) -> CatalogResult<T>
where
    T: TryFrom<Row, Error = StoreError>,
{
    fetch(tx, kind, id)?.ok_or_else(|| {
        warn!("Rejecting child of missing {} {}", kind, id);
        CatalogError::dangling(kind, id)
    })
}

fn ensure_absent(tx: &dyn RowTransaction, kind: EntityKind, id: &str) -> CatalogResult<()> {
    if tx.get_by_key(kind.table(), id)?.is_some() {
        warn!("{} {} already exists", kind, id);
        return Err(CatalogError::Duplicate {
            entity: kind,
            id: id.to_string(),
        });
    }
    Ok(())
}

fn rows_into<T>(rows: Vec<Row>) -> CatalogResult<Vec<T>>
where
    T: TryFrom<Row, Error = StoreError>,
{
    Ok(rows
        .into_iter()
        .map(T::try_from)
        .collect::<Result<Vec<_>, _>>()?)
}

fn children<T>(
    tx: &dyn RowTransaction,
    table: TableName,
    field: Field,
    parent_id: &str,
) -> CatalogResult<Vec<T>>
where
    T: TryFrom<Row, Error = StoreError>,
{
    rows_into(tx.get_where(table, field, parent_id)?)
}

fn delete_rows<'a>(
    tx: &dyn RowTransaction,
    table: TableName,
    ids: impl IntoIterator<Item = &'a str>,
) -> CatalogResult<usize> {
    let mut deleted = 0;
    for id in ids {
        if tx.delete(table, id)? {
            deleted += 1;
        }
    }
    Ok(deleted)
}

fn increment_plays(tx: &dyn RowTransaction, tracks: Vec<Track>) -> CatalogResult<Vec<Track>> {
    let mut played = Vec::with_capacity(tracks.len());
    for mut track in tracks {
        track.times_played = track.times_played.saturating_add(1);
        let row = Row::from(track);
        if !tx.update(&row)? {
            return Err(CatalogError::not_found(EntityKind::Track, row.id()));
        }
        played.push(Track::try_from(row)?);
    }
    Ok(played)
}

fn sorted_by_name<T>(mut items: Vec<T>, key: fn(&T) -> (&str, &str)) -> Vec<T> {
    items.sort_by(|a, b| key(a).cmp(&key(b)));
    items
}

impl Catalog {
    pub fn new(store: Arc<dyn RowStore>) -> Self {
        Catalog { store }
    }

    fn write<T>(
        &self,
        op: impl FnOnce(&dyn RowTransaction) -> CatalogResult<T>,
    ) -> CatalogResult<T> {
        let tx = self.store.begin()?;
        let result = op(&*tx)?;
        tx.commit()?;
        Ok(result)
    }

    fn read<T>(&self, op: impl FnOnce(&dyn RowTransaction) -> CatalogResult<T>) -> CatalogResult<T> {
        let tx = self.store.begin_read()?;
        op(&*tx)
    }

    // =========================================================================
    // Creation
    // =========================================================================

    pub fn create_artist(&self, new_artist: NewArtist) -> CatalogResult<Artist> {
        let age = validate_artist(&new_artist)?;
        let id = derive_artist_id(&new_artist.name);

        let artist = self.write(|tx| {
            ensure_absent(tx, EntityKind::Artist, &id)?;
            let artist = Artist {
                id: id.clone(),
                name: new_artist.name,
                age,
            };
            tx.insert(&Row::from(artist.clone()))
                .map_err(CatalogError::from_insert)?;
            Ok(artist)
        })?;

        info!("Created artist {} ({})", artist.id, artist.name);
        Ok(artist)
    }

    pub fn create_album(&self, artist_id: &str, new_album: NewAlbum) -> CatalogResult<Album> {
        validate_album(&new_album)?;
        let id = derive_album_id(&new_album.name, artist_id);

        let album = self.write(|tx| {
            let artist: Artist = require_parent(tx, EntityKind::Artist, artist_id)?;
            ensure_absent(tx, EntityKind::Album, &id)?;
            let album = Album {
                id: id.clone(),
                artist_id: artist.id,
                name: new_album.name,
                genre: new_album.genre,
            };
            tx.insert(&Row::from(album.clone()))
                .map_err(CatalogError::from_insert)?;
            Ok(album)
        })?;

        info!(
            "Created album {} ({}) for artist {}",
            album.id, album.name, album.artist_id
        );
        Ok(album)
    }

    pub fn create_track(&self, album_id: &str, new_track: NewTrack) -> CatalogResult<Track> {
        validate_track(&new_track)?;
        let id = derive_track_id(&new_track.name, album_id);

        let track = self.write(|tx| {
            let album: Album = require_parent(tx, EntityKind::Album, album_id)?;
            ensure_absent(tx, EntityKind::Track, &id)?;
            let track = Track {
                id: id.clone(),
                album_id: album.id,
                artist_id: album.artist_id,
                name: new_track.name,
                duration: new_track.duration,
                times_played: 0,
            };
            tx.insert(&Row::from(track.clone()))
                .map_err(CatalogError::from_insert)?;
            Ok(track)
        })?;

        info!(
            "Created track {} ({}) on album {}",
            track.id, track.name, track.album_id
        );
        Ok(track)
    }

    // =========================================================================
    // Reads
    // =========================================================================

    pub fn get_artist(&self, id: &str) -> CatalogResult<Artist> {
        self.read(|tx| require(tx, EntityKind::Artist, id))
    }

    pub fn get_album(&self, id: &str) -> CatalogResult<Album> {
        self.read(|tx| require(tx, EntityKind::Album, id))
    }

    pub fn get_track(&self, id: &str) -> CatalogResult<Track> {
        self.read(|tx| require(tx, EntityKind::Track, id))
    }

    /// All artists, ordered by name.
    pub fn list_artists(&self) -> CatalogResult<Vec<Artist>> {
        let artists = self.read(|tx| rows_into(tx.get_all(TableName::Artists)?))?;
        Ok(sorted_by_name(artists, |a| (a.name.as_str(), a.id.as_str())))
    }

    pub fn list_albums(&self) -> CatalogResult<Vec<Album>> {
        let albums = self.read(|tx| rows_into(tx.get_all(TableName::Albums)?))?;
        Ok(sorted_by_name(albums, |a| (a.name.as_str(), a.id.as_str())))
    }

    pub fn list_tracks(&self) -> CatalogResult<Vec<Track>> {
        let tracks = self.read(|tx| rows_into(tx.get_all(TableName::Tracks)?))?;
        Ok(sorted_by_name(tracks, |t| (t.name.as_str(), t.id.as_str())))
    }

    pub fn list_artist_albums(&self, artist_id: &str) -> CatalogResult<Vec<Album>> {
        let albums = self.read(|tx| {
            require::<Artist>(tx, EntityKind::Artist, artist_id)?;
            children(tx, TableName::Albums, Field::ArtistId, artist_id)
        })?;
        Ok(sorted_by_name(albums, |a| (a.name.as_str(), a.id.as_str())))
    }

    pub fn list_artist_tracks(&self, artist_id: &str) -> CatalogResult<Vec<Track>> {
        let tracks = self.read(|tx| {
            require::<Artist>(tx, EntityKind::Artist, artist_id)?;
            children(tx, TableName::Tracks, Field::ArtistId, artist_id)
        })?;
        Ok(sorted_by_name(tracks, |t| (t.name.as_str(), t.id.as_str())))
    }

    pub fn list_album_tracks(&self, album_id: &str) -> CatalogResult<Vec<Track>> {
        let tracks = self.read(|tx| {
            require::<Album>(tx, EntityKind::Album, album_id)?;
            children(tx, TableName::Tracks, Field::AlbumId, album_id)
        })?;
        Ok(sorted_by_name(tracks, |t| (t.name.as_str(), t.id.as_str())))
    }

    // =========================================================================
    // Deletion
    // =========================================================================

    /// Removes the artist, its albums and every track pointing at it.
    pub fn delete_artist(&self, id: &str) -> CatalogResult<DeleteSummary> {
        let summary = self.write(|tx| {
            require::<Artist>(tx, EntityKind::Artist, id)?;
            let albums: Vec<Album> = children(tx, TableName::Albums, Field::ArtistId, id)?;
            let tracks: Vec<Track> = children(tx, TableName::Tracks, Field::ArtistId, id)?;

            let tracks = delete_rows(tx, TableName::Tracks, tracks.iter().map(|t| t.id.as_str()))?;
            let albums = delete_rows(tx, TableName::Albums, albums.iter().map(|a| a.id.as_str()))?;
            let artists = delete_rows(tx, TableName::Artists, [id])?;
            Ok(DeleteSummary {
                artists,
                albums,
                tracks,
            })
        })?;

        info!(
            "Deleted artist {} with {} albums and {} tracks",
            id, summary.albums, summary.tracks
        );
        Ok(summary)
    }

    pub fn delete_album(&self, id: &str) -> CatalogResult<DeleteSummary> {
        let summary = self.write(|tx| {
            require::<Album>(tx, EntityKind::Album, id)?;
            let tracks: Vec<Track> = children(tx, TableName::Tracks, Field::AlbumId, id)?;

            let tracks = delete_rows(tx, TableName::Tracks, tracks.iter().map(|t| t.id.as_str()))?;
            let albums = delete_rows(tx, TableName::Albums, [id])?;
            Ok(DeleteSummary {
                artists: 0,
                albums,
                tracks,
            })
        })?;

        info!("Deleted album {} with {} tracks", id, summary.tracks);
        Ok(summary)
    }

    pub fn delete_track(&self, id: &str) -> CatalogResult<DeleteSummary> {
        let summary = self.write(|tx| {
            require::<Track>(tx, EntityKind::Track, id)?;
            let tracks = delete_rows(tx, TableName::Tracks, [id])?;
            Ok(DeleteSummary {
                tracks,
                ..Default::default()
            })
        })?;

        info!("Deleted track {}", id);
        Ok(summary)
    }

    // =========================================================================
    // Play counters
    // =========================================================================

    pub fn play_track(&self, id: &str) -> CatalogResult<Track> {
        let mut played = self.write(|tx| {
            let track: Track = require(tx, EntityKind::Track, id)?;
            increment_plays(tx, vec![track])
        })?;

        let track = played
            .pop()
            .ok_or_else(|| CatalogError::not_found(EntityKind::Track, id))?;
        debug!("Track {} played {} times", track.id, track.times_played);
        Ok(track)
    }

    /// Plays every track of the album once.
    pub fn play_album(&self, id: &str) -> CatalogResult<Vec<Track>> {
        let played = self.write(|tx| {
            require::<Album>(tx, EntityKind::Album, id)?;
            let tracks = children(tx, TableName::Tracks, Field::AlbumId, id)?;
            increment_plays(tx, tracks)
        })?;

        info!("Played {} tracks of album {}", played.len(), id);
        Ok(sorted_by_name(played, |t| (t.name.as_str(), t.id.as_str())))
    }

    /// Plays every track of the artist once, across all of their albums.
    pub fn play_artist(&self, id: &str) -> CatalogResult<Vec<Track>> {
        let played = self.write(|tx| {
            require::<Artist>(tx, EntityKind::Artist, id)?;
            let tracks = children(tx, TableName::Tracks, Field::ArtistId, id)?;
            increment_plays(tx, tracks)
        })?;

        info!("Played {} tracks of artist {}", played.len(), id);
        Ok(sorted_by_name(played, |t| (t.name.as_str(), t.id.as_str())))
    }
}
