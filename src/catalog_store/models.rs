//! Catalog entity models as stored in the row store.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Artist {
    pub id: String,
    pub name: String,
    pub age: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Album {
    pub id: String,
    pub artist_id: String,
    pub name: String,
    pub genre: String,
}

/// A track keeps a copy of its album's `artist_id` so artist-wide lookups
/// don't have to go through the albums table. The copy is taken at creation
/// time and never rewritten.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    pub album_id: String,
    pub artist_id: String,
    pub name: String,
    /// Duration in seconds.
    pub duration: f64,
    pub times_played: u64,
}
