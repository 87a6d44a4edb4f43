//! Folio portal connector runtime.
//!
//! Validates the configured credentials, then runs one sync pass over every
//! resource syncer and logs what it found.

#![forbid(unsafe_code)]

use std::env;
use std::sync::Arc;
use std::time::Duration;

use folio_sync_application::{PortalConnector, ResourceSyncer};
use folio_sync_core::{ConnectorError, ConnectorResult};
use folio_sync_domain::RoleCatalog;
use folio_sync_infrastructure::HttpPortalGateway;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone)]
struct ConnectorConfig {
    domain: String,
    bearer_token: String,
    http_timeout_secs: u64,
}

impl ConnectorConfig {
    fn load() -> ConnectorResult<Self> {
        let domain = required_env("FOLIO_DOMAIN")?
            .trim_end_matches('/')
            .to_owned();
        let bearer_token = required_env("FOLIO_BEARER_TOKEN")?;
        let http_timeout_secs = parse_env_u64("FOLIO_HTTP_TIMEOUT_SECS", 15)?;

        if http_timeout_secs == 0 {
            return Err(ConnectorError::Validation(
                "FOLIO_HTTP_TIMEOUT_SECS must be greater than zero".to_owned(),
            ));
        }

        Ok(Self {
            domain,
            bearer_token,
            http_timeout_secs,
        })
    }
}

#[tokio::main]
async fn main() -> Result<(), ConnectorError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ConnectorConfig::load()?;
    let http_client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.http_timeout_secs))
        .build()
        .map_err(|error| ConnectorError::Internal(format!("failed to build HTTP client: {error}")))?;

    let gateway = Arc::new(HttpPortalGateway::new(
        http_client,
        config.domain.as_str(),
        config.bearer_token.clone(),
    )?);
    let connector = PortalConnector::new(gateway, RoleCatalog::portal_defaults());

    let metadata = connector.metadata();
    info!(
        connector = %metadata.display_name,
        domain = %config.domain,
        "starting sync"
    );

    connector.validate().await?;

    for syncer in connector.resource_syncers() {
        sync_resource_kind(syncer.as_ref()).await?;
    }

    info!("sync finished");
    Ok(())
}

async fn sync_resource_kind(syncer: &dyn ResourceSyncer) -> ConnectorResult<()> {
    let kind = syncer.kind();
    let page = syncer.list(None, None).await?;

    let mut entitlement_count = 0_usize;
    let mut grant_count = 0_usize;
    for resource in &page.items {
        entitlement_count += syncer.entitlements(resource, None).await?.items.len();
        grant_count += syncer.grants(resource, None).await?.items.len();
    }

    info!(
        kind = %kind,
        resources = page.items.len(),
        entitlements = entitlement_count,
        grants = grant_count,
        "resource kind synced"
    );
    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn required_env(name: &str) -> ConnectorResult<String> {
    env::var(name).map_err(|_| ConnectorError::Validation(format!("{name} is required")))
}

fn parse_env_u64(name: &str, default: u64) -> ConnectorResult<u64> {
    match env::var(name) {
        Ok(value) => value.trim().parse::<u64>().map_err(|error| {
            ConnectorError::Validation(format!("{name} must be a positive integer: {error}"))
        }),
        Err(_) => Ok(default),
    }
}
