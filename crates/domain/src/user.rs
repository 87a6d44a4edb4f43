//! Portal user records as reported and accepted by the Folio REST API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::role::RoleCategory;

/// External authentication identity attached to a portal account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticationIdentifier {
    /// Identifier within the realm, usually the login email.
    pub identifier: String,
    /// Authentication realm name, e.g. an SSO provider.
    pub realm: String,
}

/// Login credentials; only populated on the account-creation flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// Login identifier.
    pub login: String,
    /// Plaintext password, present only while provisioning.
    pub password: String,
}

/// A portal user record.
///
/// The listing endpoint returns summary fields only; the detail endpoint
/// adds timestamps and authentication identifiers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortalUser {
    /// Stable user identifier.
    #[serde(default)]
    pub id: String,
    /// Display name shown in the portal.
    pub display_name: String,
    /// Primary email address.
    #[serde(rename = "emailAddress")]
    pub email: String,
    /// Account creation timestamp.
    #[serde(default)]
    pub creation_date: Option<DateTime<Utc>>,
    /// Most recent activity timestamp.
    #[serde(rename = "lastActivityDate", default)]
    pub last_login_date: Option<DateTime<Utc>>,
    /// External authentication identities.
    #[serde(default)]
    pub authentication_identifiers: Vec<AuthenticationIdentifier>,
    /// Provisioning credentials, absent outside the creation flow.
    #[serde(default)]
    pub credentials: Option<Credentials>,
}

impl PortalUser {
    /// Returns the realm of the first authentication identifier, if any.
    #[must_use]
    pub fn realm(&self) -> Option<&str> {
        self.authentication_identifiers
            .first()
            .map(|identifier| identifier.realm.as_str())
    }
}

/// Per-user role listing: three ordered role-name lists, one per category.
///
/// Only the manual list is writable, and the write endpoint replaces it
/// wholesale; list order is preserved through every read-modify-write.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRoleAssignment {
    /// User the listing belongs to.
    #[serde(default)]
    pub id: String,
    /// Administrator-assigned roles.
    #[serde(default)]
    pub manual_roles: Vec<String>,
    /// Roles derived from the authentication realm.
    #[serde(default)]
    pub authentication_roles: Vec<String>,
    /// Roles granted to every account by default.
    #[serde(default)]
    pub default_roles: Vec<String>,
}

impl UserRoleAssignment {
    /// Returns the role-name list for one category, in upstream order.
    #[must_use]
    pub fn names_in(&self, category: RoleCategory) -> &[String] {
        match category {
            RoleCategory::Manual => &self.manual_roles,
            RoleCategory::Authentication => &self.authentication_roles,
            RoleCategory::Default => &self.default_roles,
        }
    }

    /// Returns whether the manual list contains the given role name.
    #[must_use]
    pub fn holds_manual(&self, role_name: &str) -> bool {
        self.manual_roles.iter().any(|name| name == role_name)
    }
}

/// Payload accepted by the account-registration endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUserAccount {
    /// Display name for the new account.
    pub name: String,
    /// Login email address.
    pub email_address: String,
    /// Initial plaintext password.
    pub password: String,
    /// The portal rejects registrations without this agreement.
    pub privacy_policy_agreement: bool,
}

/// Profile section of the current-session payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionProfile {
    /// Effective role names of the authenticated caller.
    #[serde(default)]
    pub roles: Vec<String>,
}

/// Current authenticated session as reported by the portal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticationSession {
    /// Profile of the authenticated caller.
    #[serde(default)]
    pub profile: SessionProfile,
}
