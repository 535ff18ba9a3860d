//! SQLite schema definitions for the catalog database.
//!
//! Primary keys are the derived text identifiers. Parent references are plain
//! indexed text columns: there are no SQL foreign keys, the catalog layer is
//! in charge of referential integrity and cascades.

use crate::sqlite_column;
use crate::sqlite_persistence::{Column, SqlType, Table, VersionedSchema};

const ARTISTS_TABLE: Table = Table {
    name: "artists",
    columns: &[
        sqlite_column!(
            "id",
            &SqlType::Text,
            is_primary_key = true,
            non_null = true
        ),
        sqlite_column!("name", &SqlType::Text, non_null = true),
        sqlite_column!("age", &SqlType::Integer, non_null = true),
    ],
    indices: &[],
};

const ALBUMS_TABLE: Table = Table {
    name: "albums",
    columns: &[
        sqlite_column!(
            "id",
            &SqlType::Text,
            is_primary_key = true,
            non_null = true
        ),
        sqlite_column!("artist_id", &SqlType::Text, non_null = true),
        sqlite_column!("name", &SqlType::Text, non_null = true),
        sqlite_column!("genre", &SqlType::Text, non_null = true),
    ],
    indices: &[("idx_albums_artist", "artist_id")],
};

const TRACKS_TABLE: Table = Table {
    name: "tracks",
    columns: &[
        sqlite_column!(
            "id",
            &SqlType::Text,
            is_primary_key = true,
            non_null = true
        ),
        sqlite_column!("album_id", &SqlType::Text, non_null = true),
        sqlite_column!("artist_id", &SqlType::Text, non_null = true), // copied from the album
        sqlite_column!("name", &SqlType::Text, non_null = true),
        sqlite_column!("duration", &SqlType::Real, non_null = true),
        sqlite_column!(
            "times_played",
            &SqlType::Integer,
            non_null = true,
            default_value = Some("0")
        ),
    ],
    indices: &[
        ("idx_tracks_album", "album_id"),
        ("idx_tracks_artist", "artist_id"),
    ],
};

pub const CATALOG_VERSIONED_SCHEMAS: &[VersionedSchema] = &[VersionedSchema {
    version: 0,
    tables: &[ARTISTS_TABLE, ALBUMS_TABLE, TRACKS_TABLE],
}];
