//! This crate turns the Rhein-Lahn-Kreis waste collection exports into one decorated iCalendar.
//! The server and the CLI both build on it.
//!
//! The dates are read from <https://www.rhein-lahn-kreis-abfallwirtschaft.de/abfuhr_export.php>.

pub use ical;

pub mod assembler;
pub mod cache;
pub mod classify;
pub mod document;
pub mod error;
pub mod provider;
pub mod schedule;
pub mod service;
pub mod text;
pub mod uid;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{CacheError, Error, FetchError, ParseError};
pub use schedule::ScheduleKey;
