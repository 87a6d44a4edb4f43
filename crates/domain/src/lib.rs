//! Domain entities and invariants for the Folio portal connector.

#![forbid(unsafe_code)]

mod resource;
mod role;
mod user;

pub use resource::{
    ASSIGNED_PERMISSION, Entitlement, Grant, ListPage, Resource, ResourceId, ResourceKind,
    SyncAnnotation, UserStatus, UserTrait,
};
pub use role::{RoleCatalog, RoleCategory, RoleDescriptor, RoleKey, RoleSeed};
pub use user::{
    AuthenticationIdentifier, AuthenticationSession, Credentials, NewUserAccount, PortalUser,
    SessionProfile, UserRoleAssignment,
};
