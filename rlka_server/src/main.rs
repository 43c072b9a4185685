//! This crate implements an iCalendar server serving the Rhein-Lahn-Kreis waste collection dates.
//!
//! The path and query string are `/ical?place=<place_id>&street=<street_id>`.

mod config;
mod route;

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::parse();
    let service = Arc::new(config.service().await?);
    let app = route::router(service);
    info!(address = %config.address, "listening");
    axum::Server::bind(&config.address)
        .serve(app.into_make_service())
        .await?;
    Ok(())
}
