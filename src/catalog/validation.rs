//! Input validation for new catalog entities.
//!
//! Runs before any identifier is derived or the store is touched.

use serde::Deserialize;
use std::fmt;

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct NewArtist {
    pub name: String,
    pub age: i64,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct NewAlbum {
    pub name: String,
    pub genre: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct NewTrack {
    pub name: String,
    /// Seconds.
    pub duration: f64,
}

#[derive(Debug, PartialEq)]
pub enum ValidationError {
    EmptyField { field: &'static str },
    NegativeValue { field: &'static str, value: String },
    OutOfRange { field: &'static str, value: i64 },
    NotFinite { field: &'static str },
}

impl ValidationError {
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::EmptyField { field }
            | ValidationError::NegativeValue { field, .. }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::NotFinite { field } => field,
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::EmptyField { field } => {
                write!(f, "Field '{}' is required but was empty", field)
            }
            ValidationError::NegativeValue { field, value } => {
                write!(f, "Field '{}' must be non-negative, got {}", field, value)
            }
            ValidationError::OutOfRange { field, value } => {
                write!(f, "Field '{}' is out of range, got {}", field, value)
            }
            ValidationError::NotFinite { field } => {
                write!(f, "Field '{}' must be a finite number", field)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

pub type ValidationResult<T> = Result<T, ValidationError>;

fn require_text(field: &'static str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::EmptyField { field });
    }
    Ok(())
}

/// Returns the age as stored.
pub fn validate_artist(artist: &NewArtist) -> ValidationResult<u32> {
    require_text("name", &artist.name)?;
    if artist.age < 0 {
        return Err(ValidationError::NegativeValue {
            field: "age",
            value: artist.age.to_string(),
        });
    }
    u32::try_from(artist.age).map_err(|_| ValidationError::OutOfRange {
        field: "age",
        value: artist.age,
    })
}

pub fn validate_album(album: &NewAlbum) -> ValidationResult<()> {
    require_text("name", &album.name)?;
    require_text("genre", &album.genre)
}

pub fn validate_track(track: &NewTrack) -> ValidationResult<()> {
    require_text("name", &track.name)?;
    if !track.duration.is_finite() {
        return Err(ValidationError::NotFinite { field: "duration" });
    }
    if track.duration < 0.0 {
        return Err(ValidationError::NegativeValue {
            field: "duration",
            value: track.duration.to_string(),
        });
    }
    Ok(())
}
