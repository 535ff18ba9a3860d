//! Shared constants for end-to-end tests
//!
//! This module contains all constants used across the test suite.
//! When the seeded catalog changes, update only this file.

// ============================================================================
// Seeded Catalog Metadata
// ============================================================================

/// Artist 1 name
pub const ARTIST_1_NAME: &str = "The Test Band";

/// Artist 1 age
pub const ARTIST_1_AGE: i64 = 31;

/// Artist 2 name
pub const ARTIST_2_NAME: &str = "Jazz Ensemble";

/// Artist 2 age
pub const ARTIST_2_AGE: i64 = 58;

/// Album 1 title, by The Test Band
pub const ALBUM_1_TITLE: &str = "First Album";

/// Album 1 genre
pub const ALBUM_1_GENRE: &str = "rock";

/// Album 2 title, by Jazz Ensemble
pub const ALBUM_2_TITLE: &str = "Jazz Collection";

/// Album 2 genre
pub const ALBUM_2_GENRE: &str = "jazz";

/// Tracks on First Album, with durations in seconds
pub const ALBUM_1_TRACKS: [(&str, f64); 3] = [
    ("Opening Track", 201.0),
    ("Middle Track", 185.5),
    ("Closing Track", 242.25),
];

/// Tracks on Jazz Collection, with durations in seconds
pub const ALBUM_2_TRACKS: [(&str, f64); 2] = [("Smooth Jazz", 305.0), ("Upbeat Jazz", 172.0)];

// ============================================================================
// Test Timeouts and Configuration
// ============================================================================

/// Maximum time to wait for server to become ready (milliseconds)
pub const SERVER_READY_TIMEOUT_MS: u64 = 5000;

/// Timeout for individual HTTP requests (seconds)
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Polling interval when waiting for server ready (milliseconds)
pub const SERVER_READY_POLL_INTERVAL_MS: u64 = 50;

/// Base URL the test server puts in hyperlinks
pub const PUBLIC_BASE_URL: &str = "http://catalog.test";
