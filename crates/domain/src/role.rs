//! Role categories, keys, and the static role catalog.
//!
//! The portal reports three role categories per user. Only the manual
//! category is writable through the connector; authentication and default
//! roles are projections of upstream login mechanics and system defaults.

use std::str::FromStr;

use folio_sync_core::ConnectorError;
use serde::{Deserialize, Serialize};

/// Role category reported by the portal for each user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoleCategory {
    /// Assigned directly by administrators; the only mutable category.
    Manual,
    /// Derived upstream from the authentication realm; read-only.
    Authentication,
    /// Granted upstream to every account by default; read-only.
    Default,
}

impl RoleCategory {
    /// Every category, in the order grants are emitted.
    pub const ALL: [Self; 3] = [Self::Manual, Self::Authentication, Self::Default];

    /// Returns the stable wire value for this category.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::Authentication => "authentication",
            Self::Default => "default",
        }
    }
}

impl FromStr for RoleCategory {
    type Err = ConnectorError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "manual" => Ok(Self::Manual),
            "authentication" => Ok(Self::Authentication),
            "default" => Ok(Self::Default),
            _ => Err(ConnectorError::Validation(format!(
                "unknown role category '{value}'"
            ))),
        }
    }
}

impl std::fmt::Display for RoleCategory {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Unique identity of a role resource: a name under one category.
///
/// The same role name surfaces as a distinct resource per category it is
/// reported under.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoleKey {
    /// Portal role name, e.g. `PRINT_USER`.
    pub name: String,
    /// Category the role is reported under.
    pub category: RoleCategory,
}

impl RoleKey {
    /// Creates a role key.
    #[must_use]
    pub fn new(name: impl Into<String>, category: RoleCategory) -> Self {
        Self {
            name: name.into(),
            category,
        }
    }

    /// Returns the external resource identifier, `<category>:<name>`.
    #[must_use]
    pub fn resource_id(&self) -> String {
        format!("{}:{}", self.category, self.name)
    }
}

impl std::fmt::Display for RoleKey {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}:{}", self.category, self.name)
    }
}

/// One enumerated catalog entry: a role name, its description, and the
/// category it is being surfaced under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleDescriptor {
    /// Portal role name.
    pub name: String,
    /// Human description from the catalog seed.
    pub description: String,
    /// Category this descriptor expands under.
    pub category: RoleCategory,
}

impl RoleDescriptor {
    /// Returns the role key identifying this descriptor's resource.
    #[must_use]
    pub fn key(&self) -> RoleKey {
        RoleKey::new(self.name.clone(), self.category)
    }
}

/// Seed entry for one catalog tier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleSeed {
    /// Portal role name.
    pub name: String,
    /// Human description shown on the role resource.
    pub description: String,
}

impl RoleSeed {
    /// Creates a seed entry.
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// Static catalog of known portal roles, partitioned into a standard tier
/// and an admin tier.
///
/// Standard names expand across all three categories. Admin names expand
/// only under manual and authentication: default assignment is automatic
/// upstream and must never confer admin power. Enumeration is pure and
/// deterministic; an unknown name resolves to an empty description.
#[derive(Debug, Clone)]
pub struct RoleCatalog {
    standard: Vec<RoleSeed>,
    admin: Vec<RoleSeed>,
}

const STANDARD_CATEGORIES: [RoleCategory; 3] = RoleCategory::ALL;
const ADMIN_CATEGORIES: [RoleCategory; 2] =
    [RoleCategory::Manual, RoleCategory::Authentication];

impl RoleCatalog {
    /// Creates a catalog from explicit seed tables.
    #[must_use]
    pub fn new(standard: Vec<RoleSeed>, admin: Vec<RoleSeed>) -> Self {
        Self { standard, admin }
    }

    /// Returns the built-in catalog for the Folio portal.
    #[must_use]
    pub fn portal_defaults() -> Self {
        let standard = vec![
            RoleSeed::new("PERSONAL_BOOK_USER", "Create and organize personal books."),
            RoleSeed::new(
                "PERSONAL_BOOK_SHARE_USER",
                "Share personal books with other portal users.",
            ),
            RoleSeed::new("HTML_EXPORT_USER", "Export topics and books as HTML."),
            RoleSeed::new("PDF_EXPORT_USER", "Export topics and books as PDF."),
            RoleSeed::new("COLLECTION_USER", "Create and manage content collections."),
            RoleSeed::new("PRINT_USER", "Print documentation from the portal."),
            RoleSeed::new("OFFLINE_USER", "Download content for offline reading."),
            RoleSeed::new("SAVED_SEARCH_USER", "Save and replay search queries."),
            RoleSeed::new("BETA_USER", "Access features released in beta."),
            RoleSeed::new("DEBUG_USER", "Access portal diagnostic views."),
            RoleSeed::new("ANALYTICS_USER", "View content usage analytics."),
            RoleSeed::new("FEEDBACK_USER", "Submit feedback on published content."),
            RoleSeed::new("RATING_USER", "Rate published topics and books."),
            RoleSeed::new("GENERATIVE_AI_USER", "Use generative AI assisted search."),
        ];
        let admin = vec![
            RoleSeed::new("ADMIN", "Full administrative control of the portal."),
            RoleSeed::new(
                "KHUB_ADMIN",
                "Administer knowledge hub content and publishing.",
            ),
            RoleSeed::new(
                "CONTENT_PUBLISHER",
                "Publish and unpublish documentation content.",
            ),
            RoleSeed::new("USERS_ADMIN", "Manage portal user accounts."),
            RoleSeed::new("PORTAL_ADMIN", "Configure portal appearance and behavior."),
        ];

        Self::new(standard, admin)
    }

    /// Looks up the description for a role name.
    ///
    /// The standard tier is checked before the admin tier; unknown names
    /// resolve to an empty string.
    #[must_use]
    pub fn description_for(&self, name: &str) -> &str {
        self.standard
            .iter()
            .chain(self.admin.iter())
            .find(|seed| seed.name == name)
            .map(|seed| seed.description.as_str())
            .unwrap_or("")
    }

    /// Returns whether the name belongs to the admin tier.
    #[must_use]
    pub fn is_admin_role(&self, name: &str) -> bool {
        self.admin.iter().any(|seed| seed.name == name)
    }

    /// Enumerates the full role universe.
    ///
    /// Produces exactly `3 * standard + 2 * admin` descriptors: seed order
    /// within each tier, category order within each name.
    #[must_use]
    pub fn descriptors(&self) -> Vec<RoleDescriptor> {
        let standard = self.standard.iter().flat_map(|seed| {
            STANDARD_CATEGORIES.iter().map(move |category| RoleDescriptor {
                name: seed.name.clone(),
                description: seed.description.clone(),
                category: *category,
            })
        });
        let admin = self.admin.iter().flat_map(|seed| {
            ADMIN_CATEGORIES.iter().map(move |category| RoleDescriptor {
                name: seed.name.clone(),
                description: seed.description.clone(),
                category: *category,
            })
        });

        standard.chain(admin).collect()
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::{RoleCatalog, RoleCategory, RoleKey, RoleSeed};

    fn two_tier_catalog() -> RoleCatalog {
        RoleCatalog::new(
            vec![
                RoleSeed::new("PRINT_USER", "Print documentation."),
                RoleSeed::new("OFFLINE_USER", "Read offline."),
            ],
            vec![RoleSeed::new("ADMIN", "Full control.")],
        )
    }

    #[test]
    fn category_wire_values_round_trip() {
        for category in RoleCategory::ALL {
            let parsed = RoleCategory::from_str(category.as_str());
            assert_eq!(parsed.ok(), Some(category));
        }
        assert!(RoleCategory::from_str("manualRoles").is_err());
    }

    #[test]
    fn role_key_resource_id_is_category_then_name() {
        let key = RoleKey::new("KHUB_ADMIN", RoleCategory::Manual);
        assert_eq!(key.resource_id(), "manual:KHUB_ADMIN");
    }

    #[test]
    fn enumeration_size_is_three_standard_plus_two_admin() {
        let catalog = two_tier_catalog();
        assert_eq!(catalog.descriptors().len(), 3 * 2 + 2 * 1);

        let defaults = RoleCatalog::portal_defaults();
        assert_eq!(defaults.descriptors().len(), 3 * 14 + 2 * 5);
    }

    #[test]
    fn admin_names_never_enumerate_under_default() {
        let catalog = RoleCatalog::portal_defaults();
        for descriptor in catalog.descriptors() {
            if catalog.is_admin_role(&descriptor.name) {
                assert_ne!(descriptor.category, RoleCategory::Default);
            }
        }
    }

    #[test]
    fn description_lookup_prefers_standard_tier() {
        let catalog = RoleCatalog::new(
            vec![RoleSeed::new("SHARED", "standard meaning")],
            vec![RoleSeed::new("SHARED", "admin meaning")],
        );
        assert_eq!(catalog.description_for("SHARED"), "standard meaning");
    }

    #[test]
    fn unknown_names_resolve_to_empty_description() {
        let catalog = two_tier_catalog();
        assert_eq!(catalog.description_for("NOT_A_ROLE"), "");
    }
}
