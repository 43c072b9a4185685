use std::{net::SocketAddr, path::PathBuf, sync::Arc, time::Duration};

use anyhow::Result;
use clap::Parser;
use rlka_core::{
    assembler::{Assembler, TimePolicy},
    cache::{CalendarCache, DirectoryCache, MemoryCache},
    provider::{RlkClient, ScheduleSource},
    service::CalendarService,
};

#[derive(Debug, Parser)]
#[command(about = "Serve the Rhein-Lahn-Kreis waste collection dates as iCalendar")]
pub struct Config {
    /// the address to listen on
    #[arg(long, env = "RLKA_ADDRESS", default_value = "0.0.0.0:8008")]
    pub address: SocketAddr,
    /// keep generated calendars in this directory instead of in memory
    #[arg(long, env = "RLKA_CACHE_DIR")]
    pub cache_dir: Option<PathBuf>,
    /// timeout of a request to the provider in seconds
    #[arg(long, env = "RLKA_TIMEOUT", default_value_t = 30)]
    pub timeout: u64,
    /// take event times from a time range at the start of the description
    #[arg(long, env = "RLKA_DESCRIPTION_TIMES")]
    pub description_times: bool,
}

impl Config {
    pub fn time_policy(&self) -> TimePolicy {
        if self.description_times {
            TimePolicy::DescriptionRange
        } else {
            TimePolicy::Provider
        }
    }

    pub async fn service(&self) -> Result<CalendarService> {
        let source: Arc<dyn ScheduleSource> =
            Arc::new(RlkClient::new(Duration::from_secs(self.timeout))?);
        let cache: Arc<dyn CalendarCache> = match &self.cache_dir {
            Some(dir) => Arc::new(DirectoryCache::new(dir).await?),
            None => Arc::new(MemoryCache::default()),
        };
        let assembler = Assembler::new(source).with_time_policy(self.time_policy());
        Ok(CalendarService::new(assembler, cache))
    }
}
