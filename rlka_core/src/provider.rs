//! This client fetches the yearly iCalendar exports of the Rhein-Lahn-Kreis.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use reqwest::Client;

use crate::{error::FetchError, schedule::ScheduleKey};

static URL: &str = "https://www.rhein-lahn-kreis-abfallwirtschaft.de/abfuhr_export.php";
static CS: &str = "6615";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Something that delivers the raw iCalendar export of one year.
#[async_trait]
pub trait ScheduleSource: Send + Sync {
    /// Fetch the export of `year` for a place and street.
    async fn fetch(&self, key: ScheduleKey, year: i32) -> Result<String, FetchError>;
}

#[async_trait]
impl<T: ScheduleSource + ?Sized> ScheduleSource for Arc<T> {
    async fn fetch(&self, key: ScheduleKey, year: i32) -> Result<String, FetchError> {
        self.as_ref().fetch(key, year).await
    }
}

/// The export endpoint of the official waste management website.
#[derive(Debug, Clone)]
pub struct RlkClient {
    client: Client,
    url: String,
}

impl RlkClient {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        Self::with_url(URL, timeout)
    }

    pub fn with_url(url: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl ScheduleSource for RlkClient {
    async fn fetch(&self, key: ScheduleKey, year: i32) -> Result<String, FetchError> {
        let response = self
            .client
            .get(&self.url)
            .query(&[
                ("cs", CS.to_string()),
                ("file", String::from("ics")),
                ("gemeinde", key.place.to_string()),
                ("strasse", key.street.to_string()),
                ("jahr", year.to_string()),
            ])
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status { year, status });
        }
        Ok(response.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Datelike, Local};

    use crate::{
        provider::{RlkClient, ScheduleSource, DEFAULT_TIMEOUT},
        schedule::{parse, ScheduleKey},
    };

    /// Test whether requests can be sent and the export contains something.
    ///
    /// This is an online test!
    #[tokio::test]
    #[ignore = "online"]
    async fn test_fetch() {
        let client = RlkClient::new(DEFAULT_TIMEOUT).unwrap();
        let year = Local::now().year();
        let ics = client.fetch(ScheduleKey::new(80, 498), year).await.unwrap();
        assert!(!parse(year, &ics).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_unreachable() {
        let client = RlkClient::with_url("http://127.0.0.1:9/abfuhr_export.php", DEFAULT_TIMEOUT)
            .unwrap();
        assert!(client.fetch(ScheduleKey::new(80, 498), 2024).await.is_err());
    }
}
