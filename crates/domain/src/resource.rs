//! The identity-governance object model consumed by the hosting framework.
//!
//! Synced data is expressed as resources (users, roles), entitlements
//! (grantable permissions scoped to a resource), and grants (edges asserting
//! a principal holds an entitlement). None of these objects have independent
//! storage here; they are recomputed on every sync pass.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The single permission ever attached to a role resource.
pub const ASSIGNED_PERMISSION: &str = "assigned";

/// Kind of a synced resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    /// A portal user account.
    User,
    /// A portal role under one category.
    Role,
}

impl ResourceKind {
    /// Returns the stable kind identifier.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Role => "role",
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Typed identifier of a synced resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceId {
    /// Resource kind.
    pub kind: ResourceKind,
    /// External identifier within the kind.
    pub id: String,
}

impl ResourceId {
    /// Creates a user resource identifier.
    #[must_use]
    pub fn user(id: impl Into<String>) -> Self {
        Self {
            kind: ResourceKind::User,
            id: id.into(),
        }
    }

    /// Creates a role resource identifier.
    #[must_use]
    pub fn role(id: impl Into<String>) -> Self {
        Self {
            kind: ResourceKind::Role,
            id: id.into(),
        }
    }
}

impl std::fmt::Display for ResourceId {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}:{}", self.kind, self.id)
    }
}

/// Account status surfaced on user resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    /// Account can sign in.
    Enabled,
    /// Account is blocked from signing in.
    Disabled,
}

/// User-shaped trait data attached to a user resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserTrait {
    /// Login identifier.
    pub login: String,
    /// Primary email, verified upstream.
    pub email: Option<String>,
    /// Account status.
    pub status: UserStatus,
    /// Most recent login, when the portal reported one.
    pub last_login: Option<DateTime<Utc>>,
    /// Free-form profile attributes.
    pub profile: Map<String, Value>,
}

/// A synced resource exposed to the governing framework.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    /// Typed identifier.
    pub id: ResourceId,
    /// Display name.
    pub display_name: String,
    /// Human description.
    pub description: String,
    /// User trait data; present only on user resources.
    pub user_trait: Option<UserTrait>,
}

/// A grantable permission scoped to one resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entitlement {
    /// Composite identifier, `<kind>:<resourceId>:<permission>`.
    pub id: String,
    /// Resource the entitlement is scoped to.
    pub resource_id: ResourceId,
    /// Permission name.
    pub permission: String,
    /// Display name shown to operators.
    pub display_name: String,
    /// Human description.
    pub description: String,
    /// Resource kinds the entitlement may be granted to.
    pub grantable_to: Vec<ResourceKind>,
}

impl Entitlement {
    /// Builds the composite entitlement identifier for a resource and
    /// permission.
    #[must_use]
    pub fn id_for(resource_id: &ResourceId, permission: &str) -> String {
        format!("{}:{}:{}", resource_id.kind, resource_id.id, permission)
    }
}

/// An edge asserting that a principal holds an entitlement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Grant {
    /// Entitlement being held.
    pub entitlement_id: String,
    /// Resource the entitlement is scoped to.
    pub resource_id: ResourceId,
    /// Principal holding the entitlement.
    pub principal_id: ResourceId,
    /// Synthetic composite id for traceability, when emitted.
    pub trace_id: Option<String>,
}

/// Out-of-band signals attached to otherwise successful operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SyncAnnotation {
    /// Grant was already present; no write was performed.
    GrantAlreadyExists,
    /// Grant was already absent; no write was performed.
    GrantAlreadyRevoked,
}

/// One page of a listing operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListPage<T> {
    /// Items on this page.
    pub items: Vec<T>,
    /// Opaque continuation token; `None` on the final page.
    pub next_page_token: Option<String>,
}

impl<T> ListPage<T> {
    /// Creates a single, final page.
    #[must_use]
    pub fn complete(items: Vec<T>) -> Self {
        Self {
            items,
            next_page_token: None,
        }
    }

    /// Creates an empty final page.
    #[must_use]
    pub fn empty() -> Self {
        Self::complete(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::{Entitlement, ResourceId};

    #[test]
    fn entitlement_id_has_four_segments_for_roles() {
        let role = ResourceId::role("manual:KHUB_ADMIN");
        let id = Entitlement::id_for(&role, "assigned");
        assert_eq!(id, "role:manual:KHUB_ADMIN:assigned");
        assert_eq!(id.split(':').count(), 4);
    }
}
