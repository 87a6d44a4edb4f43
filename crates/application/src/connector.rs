use std::sync::Arc;

use folio_sync_core::{ConnectorError, ConnectorResult};
use folio_sync_domain::RoleCatalog;
use tracing::info;

use crate::portal_ports::PortalGateway;
use crate::role_sync::RoleSyncService;
use crate::sync_ports::{AccountSchemaField, ResourceSyncer};
use crate::user_sync::UserSyncService;

/// Role the connector's own credentials must hold.
const REQUIRED_SESSION_ROLE: &str = "ADMIN";

/// Descriptive metadata exposed to the governing framework.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectorMetadata {
    /// Connector display name.
    pub display_name: String,
    /// Human description of what the connector syncs.
    pub description: String,
    /// Schema of the account-creation profile.
    pub account_creation_schema: Vec<AccountSchemaField>,
}

/// The Folio portal connector: wires the gateway to one syncer per
/// resource kind and performs the one-time credential validation.
pub struct PortalConnector {
    gateway: Arc<dyn PortalGateway>,
    user_syncer: Arc<UserSyncService>,
    role_syncer: Arc<RoleSyncService>,
}

impl PortalConnector {
    /// Creates a connector over a gateway and role catalog.
    #[must_use]
    pub fn new(gateway: Arc<dyn PortalGateway>, catalog: RoleCatalog) -> Self {
        let catalog = Arc::new(catalog);
        let user_syncer = Arc::new(UserSyncService::new(
            Arc::clone(&gateway),
            Arc::clone(&catalog),
        ));
        let role_syncer = Arc::new(RoleSyncService::new(catalog, Arc::clone(&gateway)));

        Self {
            gateway,
            user_syncer,
            role_syncer,
        }
    }

    /// Returns connector metadata and the account-creation schema.
    #[must_use]
    pub fn metadata(&self) -> ConnectorMetadata {
        ConnectorMetadata {
            display_name: "Folio Portal Connector".to_owned(),
            description: "Syncs and manages users and roles in the Folio document portal."
                .to_owned(),
            account_creation_schema: vec![
                AccountSchemaField {
                    field: "name".to_owned(),
                    display_name: "Name".to_owned(),
                    description: "The display name of the user.".to_owned(),
                    required: true,
                    placeholder: "name".to_owned(),
                    order: 1,
                },
                AccountSchemaField {
                    field: "emailAddress".to_owned(),
                    display_name: "Email Address".to_owned(),
                    description: "The email address of the user.".to_owned(),
                    required: true,
                    placeholder: "user@mail.com".to_owned(),
                    order: 2,
                },
            ],
        }
    }

    /// Exercises the configured credentials against the portal.
    ///
    /// The session behind the bearer token must hold the `ADMIN` role;
    /// every sync and mutation endpoint requires it.
    pub async fn validate(&self) -> ConnectorResult<()> {
        let session = self.gateway.get_authentication_info().await?;

        if session
            .profile
            .roles
            .iter()
            .any(|role| role == REQUIRED_SESSION_ROLE)
        {
            info!("connector credentials validated");
            return Ok(());
        }

        Err(ConnectorError::Unauthorized(format!(
            "authentication user must have the {REQUIRED_SESSION_ROLE} role to use this connector"
        )))
    }

    /// Returns one syncer per resource kind, users first.
    #[must_use]
    pub fn resource_syncers(&self) -> Vec<Arc<dyn ResourceSyncer>> {
        vec![
            Arc::clone(&self.user_syncer) as Arc<dyn ResourceSyncer>,
            Arc::clone(&self.role_syncer) as Arc<dyn ResourceSyncer>,
        ]
    }

    /// Returns the user syncer.
    #[must_use]
    pub fn user_syncer(&self) -> Arc<UserSyncService> {
        Arc::clone(&self.user_syncer)
    }

    /// Returns the role syncer.
    #[must_use]
    pub fn role_syncer(&self) -> Arc<RoleSyncService> {
        Arc::clone(&self.role_syncer)
    }
}

#[cfg(test)]
mod tests;
