//! Role-based permission evaluation for the Vigil console
//!
//! This crate decides what a role may do:
//! - Permission expressions with a single prefix wildcard (`host/*`)
//! - Roles with grants, refusals and restrictions, inheriting from one parent
//! - Role sets combining every role assigned to a user
//! - The catalog of permissions and restrictions modules make available
//!
//! # Example
//!
//! ```rust
//! use auth_roles::{Role, RoleGraph};
//!
//! let mut admin = Role::new("admin");
//! admin.set_permissions(["*"]);
//!
//! let mut viewer = Role::new("viewer");
//! viewer.set_permissions(["host.*"]).set_refusals(["host.delete"]);
//!
//! let graph = RoleGraph::new([admin, viewer]).unwrap();
//! let viewer = graph.role("viewer").unwrap();
//!
//! assert!(viewer.grants("host.view", false));
//! assert!(viewer.denies("host.delete", false));
//! assert!(!viewer.grants("service.view", false));
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod graph;
pub mod matcher;
pub mod role;
pub mod role_set;

pub use catalog::{Catalog, CatalogBuilder, CatalogEntry, ModuleCatalog};
pub use config::{EntryDefinition, ModuleDefinition, ModulesConfig, RoleDefinition, RolesConfig};
pub use error::{AuthzError, Result};
pub use graph::{RoleGraph, RoleView};
pub use matcher::{matches, WILDCARD};
pub use role::Role;
pub use role_set::RoleSet;
