use std::collections::HashMap;
use std::sync::Arc;

use folio_sync_core::ConnectorResult;
use folio_sync_domain::{Resource, RoleCatalog, RoleCategory, RoleKey};
use tokio::sync::RwLock;

use crate::portal_ports::PortalGateway;
use crate::role_sync::role_resource;

/// Immutable result of one discovery scan: the roles in use and which
/// users hold each of them.
#[derive(Debug, Clone)]
pub struct RoleUsageSnapshot {
    /// One resource per discovered role key, ordered by resource id.
    pub resources: Vec<Resource>,
    /// Reverse index from role key to the ids of users holding it.
    pub holders: HashMap<RoleKey, Vec<String>>,
}

/// Lazily populated, process-lifetime cache of roles in use.
///
/// The scan walks every user and fetches its role listing, so it runs at
/// most once: the populated snapshot is never invalidated, and grant or
/// revoke mutations do not update it. Concurrent first readers collapse
/// into a single population via a re-check under the exclusive lock.
pub struct RoleDiscoveryCache {
    snapshot: RwLock<Option<Arc<RoleUsageSnapshot>>>,
}

impl RoleDiscoveryCache {
    /// Creates an unpopulated cache.
    #[must_use]
    pub fn new() -> Self {
        Self {
            snapshot: RwLock::new(None),
        }
    }

    /// Returns the snapshot, scanning the portal on first access.
    pub async fn snapshot(
        &self,
        gateway: &dyn PortalGateway,
        catalog: &RoleCatalog,
    ) -> ConnectorResult<Arc<RoleUsageSnapshot>> {
        if let Some(snapshot) = self.snapshot.read().await.as_ref() {
            return Ok(Arc::clone(snapshot));
        }

        let mut slot = self.snapshot.write().await;
        // A concurrent caller may have populated between the read unlock
        // and the write lock.
        if let Some(snapshot) = slot.as_ref() {
            return Ok(Arc::clone(snapshot));
        }

        let snapshot = Arc::new(scan(gateway, catalog).await?);
        *slot = Some(Arc::clone(&snapshot));
        Ok(snapshot)
    }
}

impl Default for RoleDiscoveryCache {
    fn default() -> Self {
        Self::new()
    }
}

async fn scan(
    gateway: &dyn PortalGateway,
    catalog: &RoleCatalog,
) -> ConnectorResult<RoleUsageSnapshot> {
    let users = gateway.list_users().await?;

    let mut holders: HashMap<RoleKey, Vec<String>> = HashMap::new();
    for user in &users {
        let assignment = gateway.get_roles_by_user_id(&user.id).await?;
        for category in RoleCategory::ALL {
            for name in assignment.names_in(category) {
                holders
                    .entry(RoleKey::new(name.clone(), category))
                    .or_default()
                    .push(user.id.clone());
            }
        }
    }

    let mut resources: Vec<Resource> = holders
        .keys()
        .map(|key| role_resource(key, catalog.description_for(&key.name)))
        .collect();
    resources.sort_by(|left, right| left.id.id.cmp(&right.id.id));

    Ok(RoleUsageSnapshot { resources, holders })
}

#[cfg(test)]
mod tests;
