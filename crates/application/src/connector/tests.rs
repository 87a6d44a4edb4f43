use std::sync::Arc;

use async_trait::async_trait;

use folio_sync_core::{ConnectorError, ConnectorResult, PortalApiError};
use folio_sync_domain::{
    AuthenticationSession, NewUserAccount, PortalUser, ResourceKind, RoleCatalog, SessionProfile,
    UserRoleAssignment,
};

use crate::portal_ports::PortalGateway;

use super::PortalConnector;

struct FakePortalGateway {
    session: ConnectorResult<AuthenticationSession>,
}

impl FakePortalGateway {
    fn with_session_roles(roles: &[&str]) -> Self {
        Self {
            session: Ok(AuthenticationSession {
                profile: SessionProfile {
                    roles: roles.iter().map(|role| (*role).to_owned()).collect(),
                },
            }),
        }
    }

    fn with_session_error() -> Self {
        Self {
            session: Err(ConnectorError::Api(PortalApiError {
                timestamp: None,
                status: 401,
                error_text: "Unauthorized".to_owned(),
                message: "invalid token".to_owned(),
                path: "/api/authentication/current-session".to_owned(),
            })),
        }
    }
}

#[async_trait]
impl PortalGateway for FakePortalGateway {
    async fn list_users(&self) -> ConnectorResult<Vec<PortalUser>> {
        Ok(Vec::new())
    }

    async fn get_user_details(&self, user_id: &str) -> ConnectorResult<PortalUser> {
        Err(ConnectorError::Internal(format!(
            "unexpected detail fetch for '{user_id}'"
        )))
    }

    async fn get_roles_by_user_id(&self, _user_id: &str) -> ConnectorResult<UserRoleAssignment> {
        Ok(UserRoleAssignment::default())
    }

    async fn update_user_manual_roles(
        &self,
        _user_id: &str,
        _manual_roles: Vec<String>,
    ) -> ConnectorResult<()> {
        Ok(())
    }

    async fn create_user(&self, _account: NewUserAccount) -> ConnectorResult<()> {
        Ok(())
    }

    async fn get_authentication_info(&self) -> ConnectorResult<AuthenticationSession> {
        match &self.session {
            Ok(session) => Ok(session.clone()),
            Err(ConnectorError::Api(api_error)) => Err(ConnectorError::Api(api_error.clone())),
            Err(_) => Err(ConnectorError::Internal("unreachable".to_owned())),
        }
    }
}

fn connector(gateway: FakePortalGateway) -> PortalConnector {
    PortalConnector::new(Arc::new(gateway), RoleCatalog::portal_defaults())
}

#[tokio::test]
async fn validate_accepts_sessions_holding_admin() {
    let connector = connector(FakePortalGateway::with_session_roles(&[
        "PRINT_USER",
        "ADMIN",
    ]));

    assert!(connector.validate().await.is_ok());
}

#[tokio::test]
async fn validate_rejects_sessions_without_admin() {
    let connector = connector(FakePortalGateway::with_session_roles(&["PRINT_USER"]));

    let result = connector.validate().await;
    assert!(matches!(result, Err(ConnectorError::Unauthorized(_))));
}

#[tokio::test]
async fn validate_propagates_gateway_failures() {
    let connector = connector(FakePortalGateway::with_session_error());

    let result = connector.validate().await;
    assert!(matches!(result, Err(ConnectorError::Api(_))));
}

#[tokio::test]
async fn metadata_declares_both_required_account_fields() {
    let connector = connector(FakePortalGateway::with_session_roles(&["ADMIN"]));

    let metadata = connector.metadata();
    let fields: Vec<&str> = metadata
        .account_creation_schema
        .iter()
        .map(|field| field.field.as_str())
        .collect();

    assert_eq!(fields, vec!["name", "emailAddress"]);
    assert!(
        metadata
            .account_creation_schema
            .iter()
            .all(|field| field.required)
    );
}

#[tokio::test]
async fn syncers_cover_users_then_roles() {
    let connector = connector(FakePortalGateway::with_session_roles(&["ADMIN"]));

    let kinds: Vec<ResourceKind> = connector
        .resource_syncers()
        .iter()
        .map(|syncer| syncer.kind())
        .collect();

    assert_eq!(kinds, vec![ResourceKind::User, ResourceKind::Role]);
}
