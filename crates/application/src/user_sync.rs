use std::sync::Arc;

use async_trait::async_trait;
use folio_sync_core::{ConnectorError, ConnectorResult};
use folio_sync_domain::{
    ASSIGNED_PERMISSION, Credentials, Entitlement, Grant, ListPage, NewUserAccount, PortalUser,
    Resource, ResourceId, ResourceKind, RoleCatalog, RoleCategory, RoleKey, UserStatus, UserTrait,
};
use serde_json::{Map, Value};
use tracing::info;

use crate::credentials::{MAX_GENERATED_PASSWORD_LENGTH, generate_password};
use crate::portal_ports::PortalGateway;
use crate::role_sync::role_resource;
use crate::sync_ports::{
    AccountCapabilities, CreateAccountResponse, CredentialKind, CredentialOptions, PlaintextSecret,
    ResourceSyncer,
};

/// Builds the resource object for one portal user.
fn user_resource(user: &PortalUser) -> Resource {
    let mut profile = Map::new();
    profile.insert("user_id".to_owned(), Value::String(user.id.clone()));
    profile.insert(
        "user_name".to_owned(),
        Value::String(user.display_name.clone()),
    );
    profile.insert("email_id".to_owned(), Value::String(user.email.clone()));
    if let Some(creation_date) = user.creation_date {
        profile.insert(
            "creation_date".to_owned(),
            Value::String(creation_date.to_rfc3339()),
        );
    }
    profile.insert(
        "authentication_realm".to_owned(),
        Value::String(user.realm().unwrap_or_default().to_owned()),
    );

    Resource {
        id: ResourceId::user(user.id.clone()),
        display_name: user.display_name.clone(),
        description: String::new(),
        user_trait: Some(UserTrait {
            login: user.display_name.clone(),
            email: (!user.email.is_empty()).then(|| user.email.clone()),
            status: UserStatus::Enabled,
            last_login: user.last_login_date,
            profile,
        }),
    }
}

fn required_profile_string(profile: &Map<String, Value>, key: &str) -> ConnectorResult<String> {
    profile
        .get(key)
        .and_then(Value::as_str)
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
        .ok_or_else(|| ConnectorError::Validation(format!("{key} is required")))
}

/// Syncs portal users as resources and computes their role grants.
pub struct UserSyncService {
    gateway: Arc<dyn PortalGateway>,
    catalog: Arc<RoleCatalog>,
}

impl UserSyncService {
    /// Creates a user syncer over a gateway and role catalog.
    #[must_use]
    pub fn new(gateway: Arc<dyn PortalGateway>, catalog: Arc<RoleCatalog>) -> Self {
        Self { gateway, catalog }
    }
}

#[async_trait]
impl ResourceSyncer for UserSyncService {
    fn kind(&self) -> ResourceKind {
        ResourceKind::User
    }

    /// Lists every account, enriching each summary with its detail record.
    async fn list(
        &self,
        _parent_id: Option<&ResourceId>,
        _page_token: Option<&str>,
    ) -> ConnectorResult<ListPage<Resource>> {
        let users = self.gateway.list_users().await?;

        let mut resources = Vec::with_capacity(users.len());
        for user in &users {
            let detail = self.gateway.get_user_details(&user.id).await?;
            resources.push(user_resource(&detail));
        }

        Ok(ListPage::complete(resources))
    }

    /// Always empty: users expose no grantable permissions of their own.
    async fn entitlements(
        &self,
        _resource: &Resource,
        _page_token: Option<&str>,
    ) -> ConnectorResult<ListPage<Entitlement>> {
        Ok(ListPage::empty())
    }

    /// Emits one grant edge per role the user holds.
    ///
    /// Role grants are computed here rather than on the role syncer: one
    /// roles call per user covers every role resource at once. Edges are
    /// emitted in category order (manual, authentication, default), then
    /// upstream list order within each category.
    async fn grants(
        &self,
        resource: &Resource,
        _page_token: Option<&str>,
    ) -> ConnectorResult<ListPage<Grant>> {
        let user_id = resource.id.id.as_str();
        let assignment = self.gateway.get_roles_by_user_id(user_id).await?;

        let mut grants = Vec::new();
        for category in RoleCategory::ALL {
            for name in assignment.names_in(category) {
                let key = RoleKey::new(name.clone(), category);
                let role = role_resource(&key, self.catalog.description_for(name));
                grants.push(Grant {
                    entitlement_id: Entitlement::id_for(&role.id, ASSIGNED_PERMISSION),
                    resource_id: role.id,
                    principal_id: resource.id.clone(),
                    trace_id: Some(format!("role-grant:{name}:{user_id}:{category}")),
                });
            }
        }

        Ok(ListPage::complete(grants))
    }

    fn account_capabilities(&self) -> Option<AccountCapabilities> {
        Some(AccountCapabilities {
            supported: vec![CredentialKind::RandomPassword],
            preferred: CredentialKind::RandomPassword,
        })
    }

    /// Registers a new portal account with a generated password.
    ///
    /// `name` and `emailAddress` are required profile fields; validation
    /// failures never reach the portal. The generated password is returned
    /// exactly once as a plaintext secret.
    async fn create_account(
        &self,
        profile: &Map<String, Value>,
        credential_options: &CredentialOptions,
    ) -> ConnectorResult<CreateAccountResponse> {
        let name = required_profile_string(profile, "name")?;
        let email_address = required_profile_string(profile, "emailAddress")?;

        let password = match credential_options {
            CredentialOptions::RandomPassword { length } => {
                generate_password((*length).min(MAX_GENERATED_PASSWORD_LENGTH))
            }
            CredentialOptions::NoPassword => {
                return Err(ConnectorError::Unsupported(
                    "unsupported credential option".to_owned(),
                ));
            }
        };

        let account = NewUserAccount {
            name: name.clone(),
            email_address: email_address.clone(),
            password: password.clone(),
            privacy_policy_agreement: true,
        };
        self.gateway.create_user(account).await?;
        info!(email = %email_address, "portal account created");

        let resource = user_resource(&PortalUser {
            id: String::new(),
            display_name: name,
            email: email_address.clone(),
            creation_date: None,
            last_login_date: None,
            authentication_identifiers: Vec::new(),
            credentials: Some(Credentials {
                login: email_address,
                password: password.clone(),
            }),
        });

        Ok(CreateAccountResponse {
            resource,
            secrets: vec![PlaintextSecret {
                name: "password".to_owned(),
                value: password,
            }],
        })
    }
}
