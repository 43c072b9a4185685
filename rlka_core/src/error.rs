//! Errors of fetching, parsing and caching calendars.

use reqwest::StatusCode;
use thiserror::Error;

/// The provider could not deliver an export.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to the provider failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("provider answered the request for {year} with {status}")]
    Status { year: i32, status: StatusCode },
}

/// A provider export is not a usable iCalendar.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid iCalendar export for {year}: {message}")]
    Ical { year: i32, message: String },
    #[error("event without {property} in the export for {year}")]
    MissingProperty { year: i32, property: &'static str },
    #[error("invalid date or date-time `{0}`")]
    DateTime(String),
}

/// The cache storage failed.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache storage failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("corrupt cache entry `{0}`")]
    Corrupt(String),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Parse(#[from] ParseError),
}
