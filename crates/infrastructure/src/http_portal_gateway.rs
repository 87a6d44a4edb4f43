use async_trait::async_trait;
use reqwest::header;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::warn;
use url::Url;

use folio_sync_application::PortalGateway;
use folio_sync_core::{ConnectorError, ConnectorResult, PortalApiError};
use folio_sync_domain::{
    AuthenticationSession, NewUserAccount, PortalUser, UserRoleAssignment,
};

/// Detail payload wrapper returned by the user dump endpoint.
#[derive(Debug, Deserialize)]
struct UserDataResponse {
    user: PortalUser,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ManualRoleUpdate {
    manual_roles: Vec<String>,
}

/// HTTP implementation of the portal gateway over reqwest.
///
/// Carries no retry or rate-limit logic of its own; timeouts and connection
/// management belong to the injected client. Failures with a structured
/// portal error body surface as [`ConnectorError::Api`], everything else as
/// [`ConnectorError::Transport`].
pub struct HttpPortalGateway {
    http_client: reqwest::Client,
    base_url: Url,
    bearer_token: String,
}

impl HttpPortalGateway {
    /// Creates a gateway for one portal domain.
    ///
    /// The domain must be an `https://` origin, e.g.
    /// `https://docs.example.com`; the portal's `/api` prefix is appended
    /// here.
    pub fn new(
        http_client: reqwest::Client,
        domain: &str,
        bearer_token: impl Into<String>,
    ) -> ConnectorResult<Self> {
        if !domain.starts_with("https://") {
            return Err(ConnectorError::Validation(format!(
                "portal domain must start with https://, got '{domain}'"
            )));
        }

        let base = format!("{}/api/", domain.trim_end_matches('/'));
        let base_url = Url::parse(&base).map_err(|error| {
            ConnectorError::Validation(format!("invalid portal domain '{domain}': {error}"))
        })?;

        Ok(Self {
            http_client,
            base_url,
            bearer_token: bearer_token.into(),
        })
    }

    fn endpoint(&self, path: &str) -> ConnectorResult<Url> {
        self.base_url.join(path).map_err(|error| {
            ConnectorError::Internal(format!("failed to build endpoint url '{path}': {error}"))
        })
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> ConnectorResult<reqwest::Response> {
        let response = request
            .header(header::ACCEPT, "application/json")
            .header(header::CONTENT_TYPE, "application/json")
            .bearer_auth(&self.bearer_token)
            .send()
            .await
            .map_err(|error| ConnectorError::Transport(format!("portal request failed: {error}")))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        match serde_json::from_str::<PortalApiError>(&body) {
            Ok(api_error) => {
                warn!(status = status.as_u16(), path = %api_error.path, "portal reported an error");
                Err(ConnectorError::Api(api_error))
            }
            Err(_) => Err(ConnectorError::Transport(format!(
                "portal returned status {}: {body}",
                status.as_u16()
            ))),
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> ConnectorResult<T> {
        let url = self.endpoint(path)?;
        let response = self.send(self.http_client.get(url)).await?;
        response.json::<T>().await.map_err(|error| {
            ConnectorError::Transport(format!("failed to decode portal response: {error}"))
        })
    }
}

#[async_trait]
impl PortalGateway for HttpPortalGateway {
    async fn list_users(&self) -> ConnectorResult<Vec<PortalUser>> {
        self.get_json("users").await
    }

    async fn get_user_details(&self, user_id: &str) -> ConnectorResult<PortalUser> {
        let response: UserDataResponse = self.get_json(&format!("users/{user_id}/dump")).await?;
        Ok(response.user)
    }

    async fn get_roles_by_user_id(&self, user_id: &str) -> ConnectorResult<UserRoleAssignment> {
        self.get_json(&format!("users/{user_id}/roles")).await
    }

    async fn update_user_manual_roles(
        &self,
        user_id: &str,
        manual_roles: Vec<String>,
    ) -> ConnectorResult<()> {
        let url = self.endpoint(&format!("users/{user_id}/roles"))?;
        let body = ManualRoleUpdate { manual_roles };
        self.send(self.http_client.put(url).json(&body)).await?;
        Ok(())
    }

    async fn create_user(&self, account: NewUserAccount) -> ConnectorResult<()> {
        let url = self.endpoint("users/register")?;
        self.send(self.http_client.post(url).json(&account)).await?;
        Ok(())
    }

    async fn get_authentication_info(&self) -> ConnectorResult<AuthenticationSession> {
        self.get_json("authentication/current-session").await
    }
}
