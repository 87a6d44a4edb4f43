use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use folio_sync_core::{ConnectorError, ConnectorResult};
use folio_sync_domain::{
    ASSIGNED_PERMISSION, Entitlement, Grant, ListPage, Resource, ResourceId, ResourceKind,
    RoleCatalog, RoleCategory, RoleKey, SyncAnnotation,
};
use tracing::info;

use crate::portal_ports::PortalGateway;
use crate::role_cache::RoleDiscoveryCache;
use crate::sync_ports::ResourceSyncer;

/// Builds the resource object for one role key.
pub(crate) fn role_resource(key: &RoleKey, description: &str) -> Resource {
    let resource_id = key.resource_id();
    Resource {
        id: ResourceId::role(resource_id.clone()),
        display_name: resource_id,
        description: description.to_owned(),
        user_trait: None,
    }
}

/// Decodes a composite entitlement id into its role category and name.
///
/// The wire format is `<kind>:<category>:<name>:<permission>`; anything
/// else is a caller error that never reaches the portal.
fn parse_entitlement_id(entitlement_id: &str) -> ConnectorResult<(RoleCategory, String)> {
    let parts: Vec<&str> = entitlement_id.split(':').collect();
    if parts.len() != 4 {
        return Err(ConnectorError::Validation(format!(
            "unexpected entitlement id format: '{entitlement_id}'"
        )));
    }
    let category = RoleCategory::from_str(parts[1])?;
    Ok((category, parts[2].to_owned()))
}

fn require_user_principal(principal_id: &ResourceId) -> ConnectorResult<()> {
    if principal_id.kind != ResourceKind::User {
        return Err(ConnectorError::Validation(format!(
            "principal must be a user resource, got '{}'",
            principal_id.kind
        )));
    }
    Ok(())
}

fn require_manual_category(category: RoleCategory) -> ConnectorResult<()> {
    if category != RoleCategory::Manual {
        return Err(ConnectorError::Unsupported(format!(
            "'{category}' roles are derived upstream and cannot be mutated"
        )));
    }
    Ok(())
}

/// Syncs portal roles as resources and mutates manual-role assignments.
///
/// Listing enumerates the static catalog and performs no I/O. Grant edges
/// are computed by the user syncer (one roles call per user); role-side
/// `grants` is always empty.
pub struct RoleSyncService {
    catalog: Arc<RoleCatalog>,
    gateway: Arc<dyn PortalGateway>,
    discovery: RoleDiscoveryCache,
}

impl RoleSyncService {
    /// Creates a role syncer over a catalog and gateway.
    #[must_use]
    pub fn new(catalog: Arc<RoleCatalog>, gateway: Arc<dyn PortalGateway>) -> Self {
        Self {
            catalog,
            gateway,
            discovery: RoleDiscoveryCache::new(),
        }
    }

    /// Lists only the roles currently held by at least one user.
    ///
    /// Alternate listing mode backed by the discovery cache: the first call
    /// performs one full user/role scan, every later call serves the same
    /// process-lifetime snapshot.
    pub async fn discovered_roles(&self) -> ConnectorResult<ListPage<Resource>> {
        let snapshot = self
            .discovery
            .snapshot(self.gateway.as_ref(), self.catalog.as_ref())
            .await?;
        Ok(ListPage::complete(snapshot.resources.clone()))
    }

    /// Returns the user ids holding one role, from the discovery snapshot.
    pub async fn holders_of(&self, key: &RoleKey) -> ConnectorResult<Vec<String>> {
        let snapshot = self
            .discovery
            .snapshot(self.gateway.as_ref(), self.catalog.as_ref())
            .await?;
        Ok(snapshot.holders.get(key).cloned().unwrap_or_default())
    }
}

#[async_trait]
impl ResourceSyncer for RoleSyncService {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Role
    }

    /// Enumerates the catalog: every standard name under all three
    /// categories, every admin name under manual and authentication only.
    async fn list(
        &self,
        _parent_id: Option<&ResourceId>,
        _page_token: Option<&str>,
    ) -> ConnectorResult<ListPage<Resource>> {
        let resources = self
            .catalog
            .descriptors()
            .iter()
            .map(|descriptor| role_resource(&descriptor.key(), &descriptor.description))
            .collect();
        Ok(ListPage::complete(resources))
    }

    /// Exactly one `assigned` entitlement per role, grantable to users.
    async fn entitlements(
        &self,
        resource: &Resource,
        _page_token: Option<&str>,
    ) -> ConnectorResult<ListPage<Entitlement>> {
        let entitlement = Entitlement {
            id: Entitlement::id_for(&resource.id, ASSIGNED_PERMISSION),
            resource_id: resource.id.clone(),
            permission: ASSIGNED_PERMISSION.to_owned(),
            display_name: resource.display_name.clone(),
            description: resource.display_name.clone(),
            grantable_to: vec![ResourceKind::User],
        };
        Ok(ListPage::complete(vec![entitlement]))
    }

    /// Always empty: grant edges are emitted during the user sync pass.
    async fn grants(
        &self,
        _resource: &Resource,
        _page_token: Option<&str>,
    ) -> ConnectorResult<ListPage<Grant>> {
        Ok(ListPage::empty())
    }

    /// Adds a manual role to a user via read-modify-write.
    ///
    /// The portal replaces the whole manual list with no version token, so
    /// two concurrent mutators on the same user are last-write-wins.
    /// Granting an already-held role is a no-op that performs no write.
    async fn grant(
        &self,
        principal: &Resource,
        entitlement_id: &str,
    ) -> ConnectorResult<Vec<SyncAnnotation>> {
        require_user_principal(&principal.id)?;
        let (category, role_name) = parse_entitlement_id(entitlement_id)?;
        require_manual_category(category)?;

        let user_id = principal.id.id.as_str();
        let assignment = self.gateway.get_roles_by_user_id(user_id).await?;
        if assignment.holds_manual(&role_name) {
            info!(user_id, role = %role_name, "manual role already granted");
            return Ok(vec![SyncAnnotation::GrantAlreadyExists]);
        }

        let mut manual_roles = assignment.manual_roles;
        manual_roles.push(role_name.clone());
        self.gateway
            .update_user_manual_roles(user_id, manual_roles)
            .await?;

        info!(user_id, role = %role_name, "manual role granted");
        Ok(Vec::new())
    }

    /// Removes a manual role from a user via read-modify-write.
    ///
    /// Revoking a role the user does not hold is a no-op that performs no
    /// write. Unrelated manual entries keep their upstream order.
    async fn revoke(&self, grant: &Grant) -> ConnectorResult<Vec<SyncAnnotation>> {
        require_user_principal(&grant.principal_id)?;
        let (category, role_name) = parse_entitlement_id(&grant.entitlement_id)?;
        require_manual_category(category)?;

        let user_id = grant.principal_id.id.as_str();
        let assignment = self.gateway.get_roles_by_user_id(user_id).await?;
        if !assignment.holds_manual(&role_name) {
            info!(user_id, role = %role_name, "manual role already revoked");
            return Ok(vec![SyncAnnotation::GrantAlreadyRevoked]);
        }

        let remaining: Vec<String> = assignment
            .manual_roles
            .into_iter()
            .filter(|name| *name != role_name)
            .collect();
        self.gateway
            .update_user_manual_roles(user_id, remaining)
            .await?;

        info!(user_id, role = %role_name, "manual role revoked");
        Ok(Vec::new())
    }
}
