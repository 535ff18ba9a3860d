//! Catalog consistency layer: identifier derivation, parent checks,
//! cascading deletes and play counters over a [`crate::catalog_store::RowStore`].

#[allow(clippy::module_inception)]
mod catalog;
mod error;
mod identifiers;
mod validation;

pub use catalog::{Catalog, DeleteSummary};
pub use error::{CatalogError, CatalogResult, EntityKind};
pub use identifiers::{derive_album_id, derive_artist_id, derive_track_id, IDENTIFIER_LEN};
pub use validation::{NewAlbum, NewArtist, NewTrack, ValidationError};
