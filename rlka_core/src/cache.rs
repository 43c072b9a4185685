//! Short-lived storage of generated calendars.

use std::{
    collections::HashMap,
    io::ErrorKind,
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

use async_trait::async_trait;
use chrono::Utc;
use tokio::{fs, sync::RwLock};

use crate::error::CacheError;

/// How long a generated calendar is served from the cache.
pub const CACHE_TTL: Duration = Duration::from_secs(3600);

#[async_trait]
pub trait CalendarCache: Send + Sync {
    /// The cached value of `key`, unless it is missing or expired.
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError>;
}

struct CacheEntry {
    value: String,
    expires: Instant,
}

/// A cache living in the memory of the process.
#[derive(Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
}

#[async_trait]
impl CalendarCache for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let entries = self.entries.read().await;
        Ok(entries
            .get(key)
            .filter(|entry| entry.expires > Instant::now())
            .map(|entry| entry.value.clone()))
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        entries.retain(|_, entry| entry.expires > now);
        entries.insert(
            key.to_string(),
            CacheEntry {
                value: value.to_string(),
                expires: now + ttl,
            },
        );
        Ok(())
    }
}

/// A cache keeping one file per key in a directory.
///
/// The first line of a file is its expiry as a Unix timestamp, the rest is the value.
#[derive(Debug, Clone)]
pub struct DirectoryCache {
    dir: PathBuf,
}

impl DirectoryCache {
    pub async fn new(dir: impl AsRef<Path>) -> Result<Self, CacheError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).await?;
        Ok(Self { dir })
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.ics"))
    }
}

#[async_trait]
impl CalendarCache for DirectoryCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let contents = match fs::read_to_string(self.path(key)).await {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let (expires, value) = contents
            .split_once('\n')
            .ok_or_else(|| CacheError::Corrupt(key.to_string()))?;
        let expires: i64 = expires
            .parse()
            .map_err(|_| CacheError::Corrupt(key.to_string()))?;
        if expires <= Utc::now().timestamp() {
            return Ok(None);
        }
        Ok(Some(value.to_string()))
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        let ttl = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);
        let expires = Utc::now().timestamp().saturating_add(ttl);
        let path = self.path(key);
        let partial = path.with_extension("ics.partial");
        fs::write(&partial, format!("{expires}\n{value}")).await?;
        fs::rename(&partial, &path).await?;
        Ok(())
    }
}
