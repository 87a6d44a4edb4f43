use async_trait::async_trait;
use folio_sync_core::ConnectorResult;
use folio_sync_domain::{
    AuthenticationSession, NewUserAccount, PortalUser, UserRoleAssignment,
};

/// Capability port for the Folio portal REST API.
///
/// Implementations own the transport concerns: authentication headers,
/// retries, rate limiting, and JSON decoding. Services above this port see
/// typed records and pass gateway failures through verbatim.
#[async_trait]
pub trait PortalGateway: Send + Sync {
    /// Lists all user accounts as summary records.
    async fn list_users(&self) -> ConnectorResult<Vec<PortalUser>>;

    /// Returns the full detail record for one user.
    async fn get_user_details(&self, user_id: &str) -> ConnectorResult<PortalUser>;

    /// Returns the per-category role listing for one user.
    async fn get_roles_by_user_id(&self, user_id: &str) -> ConnectorResult<UserRoleAssignment>;

    /// Replaces one user's entire manual-role list.
    ///
    /// The portal offers no incremental add/remove and no version check;
    /// callers must send the complete desired list.
    async fn update_user_manual_roles(
        &self,
        user_id: &str,
        manual_roles: Vec<String>,
    ) -> ConnectorResult<()>;

    /// Registers a new user account.
    async fn create_user(&self, account: NewUserAccount) -> ConnectorResult<()>;

    /// Returns the authenticated session of the connector's own credentials.
    async fn get_authentication_info(&self) -> ConnectorResult<AuthenticationSession>;
}
