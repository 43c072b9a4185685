//! The cache-fronted entry point used by the server.

use std::sync::Arc;

use chrono::{Local, NaiveDateTime};
use tracing::{debug, warn};

use crate::{
    assembler::Assembler,
    cache::{CalendarCache, CACHE_TTL},
    error::Error,
    provider::ScheduleSource,
    schedule::ScheduleKey,
};

pub struct CalendarService {
    assembler: Assembler<Arc<dyn ScheduleSource>>,
    cache: Arc<dyn CalendarCache>,
}

impl CalendarService {
    pub fn new(
        assembler: Assembler<Arc<dyn ScheduleSource>>,
        cache: Arc<dyn CalendarCache>,
    ) -> Self {
        Self { assembler, cache }
    }

    /// Get the iCalendar text for a place and street.
    ///
    /// A failing cache only costs a fresh assembly; failed assemblies are never cached.
    pub async fn get_ical(&self, key: ScheduleKey) -> Result<String, Error> {
        self.get_ical_at(key, Local::now().naive_local()).await
    }

    /// Get the iCalendar text for a place and street, assembling as of `now` on a cache miss.
    pub async fn get_ical_at(
        &self,
        key: ScheduleKey,
        now: NaiveDateTime,
    ) -> Result<String, Error> {
        let cache_key = key.to_string();
        match self.cache.get(&cache_key).await {
            Ok(Some(ical)) => {
                debug!(%key, "cache hit");
                return Ok(ical);
            }
            Ok(None) => debug!(%key, "cache miss"),
            Err(err) => warn!(%key, error = %err, "cache read failed"),
        }
        let ical = self.assembler.assemble_at(key, now).await?.generate();
        if let Err(err) = self.cache.set(&cache_key, &ical, CACHE_TTL).await {
            warn!(%key, error = %err, "cache write failed");
        }
        Ok(ical)
    }
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, time::Duration};

    use async_trait::async_trait;
    use chrono::NaiveDateTime;

    use crate::{
        assembler::Assembler,
        cache::{CalendarCache, MemoryCache},
        error::{CacheError, Error},
        provider::ScheduleSource,
        schedule::ScheduleKey,
        service::CalendarService,
        testing::{residual_payload, MockSource},
    };

    const KEY: ScheduleKey = ScheduleKey::new(80, 498);

    struct BrokenCache;

    #[async_trait]
    impl CalendarCache for BrokenCache {
        async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
            Err(CacheError::Corrupt(key.to_string()))
        }

        async fn set(&self, key: &str, _value: &str, _ttl: Duration) -> Result<(), CacheError> {
            Err(CacheError::Corrupt(key.to_string()))
        }
    }

    fn service(
        source: Arc<MockSource>,
        cache: Arc<dyn CalendarCache>,
    ) -> CalendarService {
        let source: Arc<dyn ScheduleSource> = source;
        CalendarService::new(Assembler::new(source), cache)
    }

    #[tokio::test]
    async fn test_get_ical_cached() {
        let source = Arc::new(MockSource::new(residual_payload));
        let cache = Arc::new(MemoryCache::default());
        let service = service(source.clone(), cache.clone());

        let first = service.get_ical(KEY).await.unwrap();
        assert_eq!(source.calls(), 3);
        assert!(first.contains("Graue Tonne rausstellen"));
        assert_eq!(cache.get("80-498").await.unwrap().as_deref(), Some(first.as_str()));

        let second = service.get_ical(KEY).await.unwrap();
        assert_eq!(source.calls(), 3);
        assert_eq!(first, second);

        service.get_ical(ScheduleKey::new(80, 499)).await.unwrap();
        assert_eq!(source.calls(), 6);
    }

    #[tokio::test]
    async fn test_get_ical_broken_cache() {
        let source = Arc::new(MockSource::new(residual_payload));
        let service = service(source.clone(), Arc::new(BrokenCache));
        assert!(service.get_ical(KEY).await.is_ok());
        assert!(service.get_ical(KEY).await.is_ok());
        assert_eq!(source.calls(), 6);
    }

    #[tokio::test]
    async fn test_get_ical_failure_not_cached() {
        let now =
            NaiveDateTime::parse_from_str("2024-12-31 23:59:59", "%Y-%m-%d %H:%M:%S").unwrap();
        let source = Arc::new(MockSource::failing(residual_payload, 2024));
        let cache = Arc::new(MemoryCache::default());
        let service = service(source.clone(), cache.clone());
        assert!(matches!(
            service.get_ical_at(KEY, now).await,
            Err(Error::Fetch(_))
        ));
        assert_eq!(source.calls(), 2);
        assert_eq!(cache.get("80-498").await.unwrap(), None);
    }
}
