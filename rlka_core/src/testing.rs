//! Test doubles shared by the unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use reqwest::StatusCode;

use crate::{error::FetchError, provider::ScheduleSource, schedule::ScheduleKey};

/// A provider answering every year with the same payload builder.
pub(crate) struct MockSource {
    payload: fn(i32) -> String,
    failing_year: Option<i32>,
    calls: AtomicUsize,
}

impl MockSource {
    pub(crate) fn new(payload: fn(i32) -> String) -> Self {
        Self {
            payload,
            failing_year: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn failing(payload: fn(i32) -> String, year: i32) -> Self {
        Self {
            failing_year: Some(year),
            ..Self::new(payload)
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ScheduleSource for MockSource {
    async fn fetch(&self, _key: ScheduleKey, year: i32) -> Result<String, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing_year == Some(year) {
            return Err(FetchError::Status {
                year,
                status: StatusCode::SERVICE_UNAVAILABLE,
            });
        }
        Ok((self.payload)(year))
    }
}

pub(crate) fn calendar(events: &str) -> String {
    format!(
        "BEGIN:VCALENDAR\r\nVERSION:2.0\r\nPRODID:-//Rhein-Lahn-Kreis//Abfuhrkalender//DE\r\n{events}END:VCALENDAR\r\n"
    )
}

/// One residual waste collection on 2024-03-01, whatever year is asked for.
pub(crate) fn residual_payload(_year: i32) -> String {
    calendar(
        "BEGIN:VEVENT\r\nDTSTART;VALUE=DATE:20240301\r\nDTEND;VALUE=DATE:20240302\r\nSUMMARY:Restabfall\r\nEND:VEVENT\r\n",
    )
}

/// A bulky waste collection, plus a hazardous waste collection with a time range in its description.
pub(crate) fn mixed_payload(year: i32) -> String {
    calendar(&format!(
        "BEGIN:VEVENT\r\nDTSTART;VALUE=DATE:{year}0610\r\nDTEND;VALUE=DATE:{year}0611\r\nSUMMARY:Sperrmüll\r\nLOCATION:Nassau\r\nEND:VEVENT\r\n\
         BEGIN:VEVENT\r\nDTSTART;VALUE=DATE:{year}0912\r\nDTEND;VALUE=DATE:{year}0913\r\nSUMMARY:Problemabfall\r\nDESCRIPTION:09:00-11:30 Sammelstelle Marktplatz\r\nEND:VEVENT\r\n"
    ))
}
