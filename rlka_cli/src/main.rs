use std::{env::current_dir, fs::write, path::PathBuf, time::Duration};

use anyhow::Result;
use clap::Parser;
use rlka_core::{
    assembler::{Assembler, TimePolicy},
    provider::RlkClient,
    ScheduleKey,
};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
pub struct Arguments {
    /// the place id
    pub place: u32,
    /// the street id
    pub street: u32,
    /// the file to write the calendar to
    #[arg(long, default_value = "calendar.ics")]
    pub output: PathBuf,
    /// timeout of a request to the provider in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout: u64,
    /// take event times from a time range at the start of the description
    #[arg(long)]
    pub description_times: bool,
}

impl From<&Arguments> for TimePolicy {
    fn from(value: &Arguments) -> Self {
        if value.description_times {
            TimePolicy::DescriptionRange
        } else {
            TimePolicy::Provider
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Arguments::parse();
    let client = RlkClient::new(Duration::from_secs(args.timeout))?;
    let document = Assembler::new(client)
        .with_time_policy(TimePolicy::from(&args))
        .assemble(ScheduleKey::new(args.place, args.street))
        .await?;
    let path = current_dir()?.join(&args.output);
    write(path, document.generate())?;
    Ok(())
}
