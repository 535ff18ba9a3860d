//! Content-derived identifiers.
//!
//! An identifier is the first 16 bytes of the SHA-256 digest of its defining
//! attributes, encoded as URL-safe base64 without padding. Albums are
//! namespaced by their artist and tracks by their album, so same-named
//! children of different parents get different ids.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use sha2::{Digest, Sha256};

/// Length of every derived identifier.
pub const IDENTIFIER_LEN: usize = 22;

const DIGEST_BYTES: usize = 16;

fn encode(input: &str) -> String {
    let digest = Sha256::digest(input.as_bytes());
    URL_SAFE_NO_PAD.encode(&digest[..DIGEST_BYTES])
}

pub fn derive_artist_id(name: &str) -> String {
    encode(name)
}

pub fn derive_album_id(name: &str, artist_id: &str) -> String {
    encode(&format!("{}:{}", name, artist_id))
}

pub fn derive_track_id(name: &str, album_id: &str) -> String {
    encode(&format!("{}:{}", name, album_id))
}
