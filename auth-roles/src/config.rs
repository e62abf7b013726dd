//! Role and module definitions as they appear in configuration files.

use crate::{
    catalog::{Catalog, CatalogBuilder},
    error::{AuthzError, Result},
    graph::{Assignment, RoleGraph},
    role::Role,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One role as written in `roles.yaml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoleDefinition {
    pub name: String,
    pub parent: Option<String>,
    pub permissions: Vec<String>,
    pub refusals: Vec<String>,
    pub restrictions: BTreeMap<String, String>,
    /// Users the role is assigned to, `*` for everyone
    pub users: Vec<String>,
    pub groups: Vec<String>,
}

impl RoleDefinition {
    fn into_parts(self) -> (Role, Assignment) {
        let mut role = Role::new(self.name);
        role.set_permissions(self.permissions)
            .set_refusals(self.refusals)
            .set_restrictions(self.restrictions);
        if let Some(parent) = self.parent {
            role.set_parent(parent);
        }

        let assignment = Assignment {
            users: self.users,
            groups: self.groups,
        };
        (role, assignment)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RolesConfig {
    #[serde(default)]
    pub roles: Vec<RoleDefinition>,
}

impl RolesConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| AuthzError::InvalidConfig(e.to_string()))
    }

    /// Validate the definitions and resolve them into a [`RoleGraph`]
    pub fn into_graph(self) -> Result<RoleGraph> {
        let (roles, assignments): (Vec<Role>, Vec<Assignment>) = self
            .roles
            .into_iter()
            .map(RoleDefinition::into_parts)
            .unzip();
        RoleGraph::build(roles, assignments)
    }
}

fn enabled_by_default() -> bool {
    true
}

/// A module and what it provides, as written in `modules.yaml`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleDefinition {
    pub name: String,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    #[serde(default)]
    pub permissions: Vec<EntryDefinition>,
    #[serde(default)]
    pub restrictions: Vec<EntryDefinition>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryDefinition {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModulesConfig {
    #[serde(default)]
    pub modules: Vec<ModuleDefinition>,
}

impl ModulesConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| AuthzError::InvalidConfig(e.to_string()))
    }

    pub fn into_catalog(self) -> Result<Catalog> {
        let mut builder = Catalog::builder();
        for module in self.modules {
            builder.register_definition(module)?;
        }
        Ok(builder.build())
    }
}

impl CatalogBuilder {
    /// Register a module declared in configuration
    pub fn register_definition(&mut self, module: ModuleDefinition) -> Result<&mut Self> {
        let ModuleDefinition {
            name,
            enabled,
            permissions,
            restrictions,
        } = module;

        self.register(name, enabled, |catalog| {
            for entry in permissions {
                catalog.provide_permission(entry.name, entry.description)?;
            }
            for entry in restrictions {
                catalog.provide_restriction(entry.name, entry.description)?;
            }
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROLES: &str = r#"
roles:
  - name: base
    permissions: [dashboards]
  - name: viewer
    parent: base
    permissions: ["host.*"]
    refusals: [host.delete]
    restrictions:
      monitoring/filter/objects: hostgroup_name=linux
    groups: [Operators]
  - name: admin
    permissions: ["*"]
    users: [root]
"#;

    #[test]
    fn test_roles_from_yaml() {
        let graph = RolesConfig::from_yaml_str(ROLES).unwrap().into_graph().unwrap();

        let viewer = graph.role("viewer").unwrap();
        assert_eq!(viewer.parent().unwrap().name(), "base");
        assert!(viewer.grants("dashboards", false));
        assert_eq!(
            viewer.restriction("monitoring/filter/objects"),
            Some("hostgroup_name=linux")
        );
        assert_eq!(graph.role("base").unwrap().children(), ["viewer"]);
    }

    #[test]
    fn test_assignments_are_case_insensitive() {
        let graph = RolesConfig::from_yaml_str(ROLES).unwrap().into_graph().unwrap();

        let roles = graph.role_set_for("ROOT", &[]);
        assert_eq!(roles.names(), vec!["admin"]);

        let roles = graph.role_set_for("jdoe", &["operators".to_string()]);
        assert_eq!(roles.names(), vec!["viewer"]);
        assert!(!roles.can("host.delete"));

        assert!(graph.role_set_for("nobody", &[]).is_empty());
    }

    #[test]
    fn test_everyone_assignment() {
        let config = RolesConfig {
            roles: vec![RoleDefinition {
                name: "guest".to_string(),
                permissions: vec!["dashboards".to_string()],
                users: vec!["*".to_string()],
                ..RoleDefinition::default()
            }],
        };
        let graph = config.into_graph().unwrap();
        assert!(graph.role_set_for("anyone", &[]).can("dashboards"));
    }

    #[test]
    fn test_malformed_yaml() {
        let result = RolesConfig::from_yaml_str("roles: {name: 3");
        assert!(matches!(result, Err(AuthzError::InvalidConfig(_))));
    }

    #[test]
    fn test_modules_from_yaml() {
        let yaml = r#"
modules:
  - name: monitoring
    permissions:
      - name: monitoring/command/*
        description: Allow all commands
    restrictions:
      - name: monitoring/filter/objects
        description: Restrict views to matching objects
  - name: graphite
    enabled: false
"#;
        let catalog = ModulesConfig::from_yaml_str(yaml).unwrap().into_catalog().unwrap();
        assert_eq!(catalog.modules().len(), 2);
        assert_eq!(catalog.enabled_modules().count(), 1);
        assert!(catalog
            .module("monitoring")
            .unwrap()
            .provides_restriction("monitoring/filter/objects"));
    }

    #[test]
    fn test_duplicate_module_entry_in_yaml() {
        let yaml = r#"
modules:
  - name: monitoring
    permissions:
      - name: monitoring/command/*
      - name: monitoring/command/*
"#;
        let result = ModulesConfig::from_yaml_str(yaml).unwrap().into_catalog();
        assert!(matches!(result, Err(AuthzError::DuplicatePermission { .. })));
    }
}
