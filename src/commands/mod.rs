//! Command implementations

pub mod apply;
pub mod plan;
pub mod profiles;
pub mod verify;

use anyhow::{Context as AnyhowContext, Result};
use zuora::HttpBackend;

use crate::Context;
use crate::config::Settings;

/// Load settings and build the HTTP backend for the configured tenant
fn connect(ctx: &Context) -> Result<HttpBackend> {
    let settings = Settings::load(ctx.config.as_deref())?;
    log::debug!("Loaded {:?}", settings);
    HttpBackend::new(settings.client_config())
        .with_context(|| format!("Could not set up a client for {}", settings.base_url))
}
