//! Lambda entry point.
//!
//! This binary is the composition root for the entire system. Responsibilities:
//!
//! 1. **Wire observability** — install the JSON `tracing-subscriber` layer and,
//!    when configured, the OpenTelemetry OTLP exporter.
//! 2. **Load configuration** — read [`notifier::NotifierConfig`] from the
//!    environment once. A missing token or region aborts startup.
//! 3. **Construct infrastructure** — build the [`codepipeline::CodePipelineLookup`]
//!    and [`github::GithubStatusClient`] and inject them into a
//!    [`notifier::NotificationHandler`].
//! 4. **Serve** — hand the handler to [`listener::serve`], flushing telemetry
//!    after every invocation.

mod observability;

use std::sync::Arc;

use anyhow::Context;
use codepipeline::CodePipelineLookup;
use github::GithubStatusClient;
use notifier::{NotificationHandler, NotifierConfig};
use tracing::{error, info};

use crate::observability::Telemetry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let telemetry = Arc::new(Telemetry::init().context("failed to initialise tracing")?);

    let config = NotifierConfig::from_env().context("invalid configuration")?;
    info!(
        region = %config.region,
        github_api_url = %config.github_api_url,
        "starting pipeline status notifier"
    );

    let lookup = CodePipelineLookup::from_env().await;
    let publisher = GithubStatusClient::new(config.github_api_url.clone(), config.access_token.clone());
    let handler = Arc::new(NotificationHandler::new(
        Arc::new(config),
        Arc::new(lookup),
        Arc::new(publisher),
    ));

    let flush = Arc::clone(&telemetry);
    let served = listener::serve(handler, move || flush.flush()).await;

    if let Err(err) = &served {
        error!(error = %err, "lambda runtime exited");
    }
    telemetry.shutdown();

    served.map_err(|err| anyhow::anyhow!(err))
}
