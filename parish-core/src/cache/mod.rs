//! Caching layer for role-default permission lookups.

pub mod role_permissions;

pub use role_permissions::{RolePermissionCache, RolePermissionKey};
