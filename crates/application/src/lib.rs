//! Application services and ports for the Folio portal connector.

#![forbid(unsafe_code)]

mod connector;
mod credentials;
mod portal_ports;
mod role_cache;
mod role_sync;
mod sync_ports;
mod user_sync;

pub use connector::{ConnectorMetadata, PortalConnector};
pub use credentials::{MAX_GENERATED_PASSWORD_LENGTH, generate_password};
pub use portal_ports::PortalGateway;
pub use role_cache::{RoleDiscoveryCache, RoleUsageSnapshot};
pub use role_sync::RoleSyncService;
pub use sync_ports::{
    AccountCapabilities, AccountSchemaField, CreateAccountResponse, CredentialKind,
    CredentialOptions, PlaintextSecret, ResourceSyncer,
};
pub use user_sync::UserSyncService;
