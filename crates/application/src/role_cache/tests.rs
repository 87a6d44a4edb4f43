use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use folio_sync_core::{ConnectorError, ConnectorResult};
use folio_sync_domain::{
    AuthenticationSession, NewUserAccount, PortalUser, Resource, ResourceId, RoleCatalog,
    RoleCategory, RoleKey, UserRoleAssignment,
};

use crate::portal_ports::PortalGateway;
use crate::role_sync::RoleSyncService;
use crate::sync_ports::ResourceSyncer;

use super::RoleDiscoveryCache;

struct FakePortalGateway {
    users: Vec<PortalUser>,
    assignments: HashMap<String, UserRoleAssignment>,
    list_calls: Mutex<usize>,
    roles_calls: Mutex<usize>,
}

fn summary(user_id: &str) -> PortalUser {
    PortalUser {
        id: user_id.to_owned(),
        display_name: user_id.to_owned(),
        email: format!("{user_id}@example.com"),
        creation_date: None,
        last_login_date: None,
        authentication_identifiers: Vec::new(),
        credentials: None,
    }
}

fn assignment(manual: &[&str], authentication: &[&str], default: &[&str]) -> UserRoleAssignment {
    UserRoleAssignment {
        id: String::new(),
        manual_roles: manual.iter().map(|name| (*name).to_owned()).collect(),
        authentication_roles: authentication.iter().map(|name| (*name).to_owned()).collect(),
        default_roles: default.iter().map(|name| (*name).to_owned()).collect(),
    }
}

impl FakePortalGateway {
    fn two_user_portal() -> Self {
        let mut assignments = HashMap::new();
        assignments.insert(
            "user-1".to_owned(),
            assignment(&["KHUB_ADMIN"], &["PRINT_USER"], &["PRINT_USER"]),
        );
        assignments.insert(
            "user-2".to_owned(),
            assignment(&[], &["PRINT_USER"], &["PRINT_USER"]),
        );

        Self {
            users: vec![summary("user-1"), summary("user-2")],
            assignments,
            list_calls: Mutex::new(0),
            roles_calls: Mutex::new(0),
        }
    }
}

#[async_trait]
impl PortalGateway for FakePortalGateway {
    async fn list_users(&self) -> ConnectorResult<Vec<PortalUser>> {
        *self.list_calls.lock().await += 1;
        // Widen the race window between the optimistic read and the scan.
        tokio::time::sleep(Duration::from_millis(10)).await;
        Ok(self.users.clone())
    }

    async fn get_user_details(&self, user_id: &str) -> ConnectorResult<PortalUser> {
        Err(ConnectorError::Internal(format!(
            "unexpected detail fetch for '{user_id}'"
        )))
    }

    async fn get_roles_by_user_id(&self, user_id: &str) -> ConnectorResult<UserRoleAssignment> {
        *self.roles_calls.lock().await += 1;
        Ok(self.assignments.get(user_id).cloned().unwrap_or_default())
    }

    async fn update_user_manual_roles(
        &self,
        _user_id: &str,
        _manual_roles: Vec<String>,
    ) -> ConnectorResult<()> {
        Ok(())
    }

    async fn create_user(&self, account: NewUserAccount) -> ConnectorResult<()> {
        Err(ConnectorError::Internal(format!(
            "unexpected account creation for '{}'",
            account.email_address
        )))
    }

    async fn get_authentication_info(&self) -> ConnectorResult<AuthenticationSession> {
        Ok(AuthenticationSession::default())
    }
}

#[tokio::test]
async fn concurrent_first_readers_trigger_exactly_one_scan() {
    let gateway = Arc::new(FakePortalGateway::two_user_portal());
    let catalog = Arc::new(RoleCatalog::portal_defaults());
    let cache = Arc::new(RoleDiscoveryCache::new());

    let mut handles = Vec::new();
    for _ in 0..8 {
        let gateway = Arc::clone(&gateway);
        let catalog = Arc::clone(&catalog);
        let cache = Arc::clone(&cache);
        handles.push(tokio::spawn(async move {
            cache.snapshot(gateway.as_ref(), catalog.as_ref()).await
        }));
    }

    for handle in handles {
        match handle.await {
            Ok(result) => assert!(result.is_ok()),
            Err(error) => panic!("snapshot task panicked: {error}"),
        }
    }

    assert_eq!(*gateway.list_calls.lock().await, 1);
    // One roles fetch per user, once, regardless of reader count.
    assert_eq!(*gateway.roles_calls.lock().await, 2);
}

#[tokio::test]
async fn snapshot_indexes_holders_by_role_key() {
    let gateway = Arc::new(FakePortalGateway::two_user_portal());
    let catalog = Arc::new(RoleCatalog::portal_defaults());
    let cache = RoleDiscoveryCache::new();

    let snapshot = match cache.snapshot(gateway.as_ref(), catalog.as_ref()).await {
        Ok(snapshot) => snapshot,
        Err(error) => panic!("population should not fail: {error}"),
    };

    // user-1 manual KHUB_ADMIN; both users hold PRINT_USER twice over.
    assert_eq!(
        snapshot
            .holders
            .get(&RoleKey::new("KHUB_ADMIN", RoleCategory::Manual)),
        Some(&vec!["user-1".to_owned()])
    );
    let print_holders = snapshot
        .holders
        .get(&RoleKey::new("PRINT_USER", RoleCategory::Authentication));
    assert_eq!(
        print_holders.map(Vec::len),
        Some(2)
    );
    assert_eq!(snapshot.resources.len(), 3);

    let resource_ids: Vec<&str> = snapshot
        .resources
        .iter()
        .map(|resource| resource.id.id.as_str())
        .collect();
    assert_eq!(
        resource_ids,
        vec![
            "authentication:PRINT_USER",
            "default:PRINT_USER",
            "manual:KHUB_ADMIN",
        ]
    );
}

#[tokio::test]
async fn discovered_role_descriptions_come_from_the_catalog() {
    let gateway = Arc::new(FakePortalGateway::two_user_portal());
    let catalog = Arc::new(RoleCatalog::portal_defaults());
    let cache = RoleDiscoveryCache::new();

    let snapshot = match cache.snapshot(gateway.as_ref(), catalog.as_ref()).await {
        Ok(snapshot) => snapshot,
        Err(error) => panic!("population should not fail: {error}"),
    };

    let khub = snapshot
        .resources
        .iter()
        .find(|resource| resource.id.id == "manual:KHUB_ADMIN");
    assert_eq!(
        khub.map(|resource| resource.description.as_str()),
        Some("Administer knowledge hub content and publishing.")
    );
}

#[tokio::test]
async fn mutations_never_update_the_populated_snapshot() {
    let gateway = Arc::new(FakePortalGateway::two_user_portal());
    let catalog = Arc::new(RoleCatalog::portal_defaults());
    let gateway_dyn: Arc<dyn PortalGateway> = gateway.clone();
    let service = RoleSyncService::new(catalog, gateway_dyn);

    let before = match service.discovered_roles().await {
        Ok(page) => page.items,
        Err(error) => panic!("discovery should not fail: {error}"),
    };

    let principal = Resource {
        id: ResourceId::user("user-2"),
        display_name: "user-2".to_owned(),
        description: String::new(),
        user_trait: None,
    };
    let granted = service
        .grant(&principal, "role:manual:OFFLINE_USER:assigned")
        .await;
    assert!(granted.is_ok());

    let after = match service.discovered_roles().await {
        Ok(page) => page.items,
        Err(error) => panic!("discovery should not fail: {error}"),
    };

    assert_eq!(before, after);
    assert_eq!(*gateway.list_calls.lock().await, 1);
    assert!(
        service
            .holders_of(&RoleKey::new("OFFLINE_USER", RoleCategory::Manual))
            .await
            .ok()
            .map(|holders| holders.is_empty())
            .unwrap_or(false)
    );
}
