use async_trait::async_trait;
use folio_sync_core::{ConnectorError, ConnectorResult};
use folio_sync_domain::{
    Entitlement, Grant, ListPage, Resource, ResourceId, ResourceKind, SyncAnnotation,
};
use serde_json::{Map, Value};

/// Credential material kinds a syncer can provision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialKind {
    /// A password generated by the connector.
    RandomPassword,
}

/// Credential options selected by the caller for account creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialOptions {
    /// Generate a random password of the requested length.
    RandomPassword {
        /// Requested password length; the syncer may cap it.
        length: usize,
    },
    /// Create the account without connector-managed credentials.
    NoPassword,
}

/// Account-provisioning capabilities advertised by a syncer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountCapabilities {
    /// Credential kinds the syncer can provision.
    pub supported: Vec<CredentialKind>,
    /// Credential kind used when the caller expresses no preference.
    pub preferred: CredentialKind,
}

/// One field of the account-creation schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountSchemaField {
    /// Profile key the caller must populate.
    pub field: String,
    /// Display name shown to operators.
    pub display_name: String,
    /// Human description of the field.
    pub description: String,
    /// Whether account creation fails without this field.
    pub required: bool,
    /// Example value shown in provisioning UIs.
    pub placeholder: String,
    /// Display order.
    pub order: u8,
}

/// Secret material returned exactly once from account creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaintextSecret {
    /// Secret name, e.g. `password`.
    pub name: String,
    /// Plaintext value.
    pub value: String,
}

/// Result of a successful account creation.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateAccountResponse {
    /// The newly created user resource.
    pub resource: Resource,
    /// Secrets to hand back to the caller; never persisted here.
    pub secrets: Vec<PlaintextSecret>,
}

/// The per-resource-kind contract exposed to the governing framework.
///
/// Every syncer lists resources and computes entitlements and grants.
/// Mutation and provisioning are capabilities: the default implementations
/// reject with [`ConnectorError::Unsupported`], and only syncers that can
/// honor them override.
#[async_trait]
pub trait ResourceSyncer: Send + Sync {
    /// Kind of resource this syncer produces.
    fn kind(&self) -> ResourceKind;

    /// Lists one page of resources, optionally scoped to a parent.
    async fn list(
        &self,
        parent_id: Option<&ResourceId>,
        page_token: Option<&str>,
    ) -> ConnectorResult<ListPage<Resource>>;

    /// Lists one page of entitlements for a resource.
    async fn entitlements(
        &self,
        resource: &Resource,
        page_token: Option<&str>,
    ) -> ConnectorResult<ListPage<Entitlement>>;

    /// Lists one page of grants for a resource.
    async fn grants(
        &self,
        resource: &Resource,
        page_token: Option<&str>,
    ) -> ConnectorResult<ListPage<Grant>>;

    /// Grants an entitlement to a principal.
    async fn grant(
        &self,
        principal: &Resource,
        entitlement_id: &str,
    ) -> ConnectorResult<Vec<SyncAnnotation>> {
        let _ = (principal, entitlement_id);
        Err(ConnectorError::Unsupported(format!(
            "{} resources do not support granting",
            self.kind()
        )))
    }

    /// Revokes a previously synced grant.
    async fn revoke(&self, grant: &Grant) -> ConnectorResult<Vec<SyncAnnotation>> {
        let _ = grant;
        Err(ConnectorError::Unsupported(format!(
            "{} resources do not support revoking",
            self.kind()
        )))
    }

    /// Account-provisioning capabilities, if this syncer creates accounts.
    fn account_capabilities(&self) -> Option<AccountCapabilities> {
        None
    }

    /// Creates an account from caller-supplied profile fields.
    async fn create_account(
        &self,
        profile: &Map<String, Value>,
        credential_options: &CredentialOptions,
    ) -> ConnectorResult<CreateAccountResponse> {
        let _ = (profile, credential_options);
        Err(ConnectorError::Unsupported(format!(
            "{} resources do not support account creation",
            self.kind()
        )))
    }
}
