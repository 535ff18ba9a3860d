//! Row store contract.
//!
//! The catalog layer talks to persistence only through these traits: exact
//! match lookups by primary key or by a secondary field, inserts, updates and
//! deletes, all scoped to a transaction the caller controls.

use super::error::{StoreError, StoreResult};
use super::models::{Album, Artist, Track};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TableName {
    Artists,
    Albums,
    Tracks,
}

impl TableName {
    pub fn as_str(&self) -> &'static str {
        match self {
            TableName::Artists => "artists",
            TableName::Albums => "albums",
            TableName::Tracks => "tracks",
        }
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Secondary fields usable with [`RowTransaction::get_where`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field {
    ArtistId,
    AlbumId,
}

impl Field {
    pub fn column(&self) -> &'static str {
        match self {
            Field::ArtistId => "artist_id",
            Field::AlbumId => "album_id",
        }
    }

    pub fn belongs_to(&self, table: TableName) -> bool {
        matches!(
            (table, self),
            (TableName::Albums, Field::ArtistId)
                | (TableName::Tracks, Field::ArtistId)
                | (TableName::Tracks, Field::AlbumId)
        )
    }

    pub(super) fn check(&self, table: TableName) -> StoreResult<()> {
        if self.belongs_to(table) {
            Ok(())
        } else {
            Err(StoreError::UnknownField {
                table,
                field: self.column(),
            })
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Row {
    Artist(Artist),
    Album(Album),
    Track(Track),
}

impl Row {
    pub fn table(&self) -> TableName {
        match self {
            Row::Artist(_) => TableName::Artists,
            Row::Album(_) => TableName::Albums,
            Row::Track(_) => TableName::Tracks,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Row::Artist(artist) => &artist.id,
            Row::Album(album) => &album.id,
            Row::Track(track) => &track.id,
        }
    }

    /// Value of a secondary field, `None` if the row's table doesn't have it.
    pub fn field(&self, field: Field) -> Option<&str> {
        match (self, field) {
            (Row::Album(album), Field::ArtistId) => Some(&album.artist_id),
            (Row::Track(track), Field::ArtistId) => Some(&track.artist_id),
            (Row::Track(track), Field::AlbumId) => Some(&track.album_id),
            _ => None,
        }
    }
}

impl From<Artist> for Row {
    fn from(artist: Artist) -> Self {
        Row::Artist(artist)
    }
}

impl From<Album> for Row {
    fn from(album: Album) -> Self {
        Row::Album(album)
    }
}

impl From<Track> for Row {
    fn from(track: Track) -> Self {
        Row::Track(track)
    }
}

impl TryFrom<Row> for Artist {
    type Error = StoreError;

    fn try_from(row: Row) -> StoreResult<Self> {
        match row {
            Row::Artist(artist) => Ok(artist),
            other => Err(StoreError::UnexpectedRow {
                table: other.table(),
            }),
        }
    }
}

impl TryFrom<Row> for Album {
    type Error = StoreError;

    fn try_from(row: Row) -> StoreResult<Self> {
        match row {
            Row::Album(album) => Ok(album),
            other => Err(StoreError::UnexpectedRow {
                table: other.table(),
            }),
        }
    }
}

impl TryFrom<Row> for Track {
    type Error = StoreError;

    fn try_from(row: Row) -> StoreResult<Self> {
        match row {
            Row::Track(track) => Ok(track),
            other => Err(StoreError::UnexpectedRow {
                table: other.table(),
            }),
        }
    }
}

/// Trait for catalog row storage backends.
pub trait RowStore: Send + Sync {
    /// Open a read-write transaction. Dropping it without calling
    /// [`RowTransaction::commit`] rolls every change back.
    fn begin(&self) -> StoreResult<Box<dyn RowTransaction + '_>>;

    /// Open a read-only view. Writes through it fail.
    fn begin_read(&self) -> StoreResult<Box<dyn RowTransaction + '_>>;
}

pub trait RowTransaction {
    fn get_by_key(&self, table: TableName, id: &str) -> StoreResult<Option<Row>>;

    /// All rows of `table` whose `field` equals `value`, in no particular order.
    fn get_where(&self, table: TableName, field: Field, value: &str) -> StoreResult<Vec<Row>>;

    fn get_all(&self, table: TableName) -> StoreResult<Vec<Row>>;

    /// Fails with [`StoreError::KeyViolation`] if the id is taken.
    fn insert(&self, row: &Row) -> StoreResult<()>;

    /// Replace the row with the same id. Returns `false` if there is none.
    fn update(&self, row: &Row) -> StoreResult<bool>;

    /// Returns `false` if there was nothing to delete.
    fn delete(&self, table: TableName, id: &str) -> StoreResult<bool>;

    fn commit(self: Box<Self>) -> StoreResult<()>;
}
