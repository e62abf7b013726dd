use crate::error::{AuthzError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, info};

/// A permission or restriction a module makes available, with a description
/// for administrators
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CatalogEntry {
    name: String,
    description: String,
}

impl CatalogEntry {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

/// Permissions and restrictions registered by one module
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleCatalog {
    name: String,
    enabled: bool,
    permissions: Vec<CatalogEntry>,
    restrictions: Vec<CatalogEntry>,
}

impl ModuleCatalog {
    fn new(name: String, enabled: bool) -> Self {
        Self {
            name,
            enabled,
            permissions: Vec::new(),
            restrictions: Vec::new(),
        }
    }

    /// Register a permission. Registering a name twice fails.
    pub fn provide_permission(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<&mut Self> {
        let entry = CatalogEntry::new(name, description);
        if self.provides_permission(entry.name()) {
            return Err(AuthzError::DuplicatePermission {
                module: self.name.clone(),
                name: entry.name,
            });
        }
        self.permissions.push(entry);
        Ok(self)
    }

    /// Register a restriction. Registering a name twice fails.
    pub fn provide_restriction(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<&mut Self> {
        let entry = CatalogEntry::new(name, description);
        if self.provides_restriction(entry.name()) {
            return Err(AuthzError::DuplicateRestriction {
                module: self.name.clone(),
                name: entry.name,
            });
        }
        self.restrictions.push(entry);
        Ok(self)
    }

    pub fn provides_permission(&self, name: &str) -> bool {
        self.permissions.iter().any(|entry| entry.name() == name)
    }

    pub fn provides_restriction(&self, name: &str) -> bool {
        self.restrictions.iter().any(|entry| entry.name() == name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn permissions(&self) -> &[CatalogEntry] {
        &self.permissions
    }

    pub fn restrictions(&self) -> &[CatalogEntry] {
        &self.restrictions
    }
}

/// Collects module registrations during startup
///
/// Each module receives its own [`ModuleCatalog`] to register into. Once
/// [`build`](Self::build) is called the result is read-only.
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    modules: Vec<ModuleCatalog>,
    names: HashSet<String>,
}

impl CatalogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a module and let it provide its entries
    pub fn register<F>(&mut self, module: impl Into<String>, enabled: bool, provide: F) -> Result<&mut Self>
    where
        F: FnOnce(&mut ModuleCatalog) -> Result<()>,
    {
        let module = module.into();
        if !self.names.insert(module.clone()) {
            return Err(AuthzError::DuplicateModule(module));
        }

        let mut catalog = ModuleCatalog::new(module, enabled);
        provide(&mut catalog)?;

        debug!(
            module = catalog.name(),
            permissions = catalog.permissions.len(),
            restrictions = catalog.restrictions.len(),
            "Module registered"
        );
        self.modules.push(catalog);
        Ok(self)
    }

    pub fn build(self) -> Catalog {
        info!(modules = self.modules.len(), "Permission catalog loaded");
        Catalog {
            modules: self.modules,
        }
    }
}

/// Read-only view over every registered module
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    modules: Vec<ModuleCatalog>,
}

impl Catalog {
    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::new()
    }

    /// Every registered module, enabled or not, in registration order
    pub fn modules(&self) -> &[ModuleCatalog] {
        &self.modules
    }

    pub fn enabled_modules(&self) -> impl Iterator<Item = &ModuleCatalog> {
        self.modules.iter().filter(|module| module.is_enabled())
    }

    pub fn module(&self, name: &str) -> Option<&ModuleCatalog> {
        self.modules.iter().find(|module| module.name() == name)
    }

    /// Permissions of all enabled modules, paired with their module name
    pub fn permissions(&self) -> impl Iterator<Item = (&str, &CatalogEntry)> {
        self.enabled_modules().flat_map(|module| {
            module
                .permissions()
                .iter()
                .map(move |entry| (module.name(), entry))
        })
    }

    /// Restrictions of all enabled modules, paired with their module name
    pub fn restrictions(&self) -> impl Iterator<Item = (&str, &CatalogEntry)> {
        self.enabled_modules().flat_map(|module| {
            module
                .restrictions()
                .iter()
                .map(move |entry| (module.name(), entry))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn monitoring(catalog: &mut ModuleCatalog) -> Result<()> {
        catalog
            .provide_permission("monitoring/command/*", "Allow all commands")?
            .provide_permission("monitoring/command/schedule-check", "Allow scheduling checks")?
            .provide_restriction("monitoring/filter/objects", "Restrict views to matching objects")?;
        Ok(())
    }

    #[test]
    fn test_duplicate_permission_is_rejected() {
        let mut builder = Catalog::builder();
        let result = builder.register("monitoring", true, |catalog| {
            catalog.provide_permission("monitoring/command/*", "Allow all commands")?;
            catalog.provide_permission("monitoring/command/*", "Again")?;
            Ok(())
        });

        let error = result.map(|_| ()).unwrap_err();
        assert_eq!(
            error,
            AuthzError::DuplicatePermission {
                module: "monitoring".to_string(),
                name: "monitoring/command/*".to_string(),
            }
        );
        assert_eq!(
            error.to_string(),
            "Cannot provide permission \"monitoring/command/*\" twice (module monitoring)"
        );
    }

    #[test]
    fn test_duplicate_restriction_is_rejected() {
        let mut builder = Catalog::builder();
        let result = builder.register("monitoring", true, |catalog| {
            catalog.provide_restriction("monitoring/filter/objects", "a")?;
            catalog.provide_restriction("monitoring/filter/objects", "b")?;
            Ok(())
        });

        assert!(matches!(
            result,
            Err(AuthzError::DuplicateRestriction { .. })
        ));
    }

    #[test]
    fn test_same_name_in_different_modules_is_allowed() {
        let mut builder = Catalog::builder();
        builder.register("monitoring", true, monitoring).unwrap();
        builder
            .register("reporting", true, |catalog| {
                catalog.provide_restriction("monitoring/filter/objects", "Shared filter")?;
                Ok(())
            })
            .unwrap();

        let catalog = builder.build();
        assert_eq!(catalog.restrictions().count(), 2);
    }

    #[test]
    fn test_duplicate_module_is_rejected() {
        let mut builder = Catalog::builder();
        builder.register("monitoring", true, monitoring).unwrap();
        let result = builder.register("monitoring", false, |_| Ok(()));

        assert_eq!(
            result.map(|_| ()).unwrap_err(),
            AuthzError::DuplicateModule("monitoring".to_string())
        );
    }

    #[test]
    fn test_disabled_modules_are_not_listed() {
        let mut builder = Catalog::builder();
        builder.register("monitoring", true, monitoring).unwrap();
        builder
            .register("graphite", false, |catalog| {
                catalog.provide_permission("graphite/view", "View graphs")?;
                Ok(())
            })
            .unwrap();
        let catalog = builder.build();

        assert_eq!(catalog.modules().len(), 2);
        let names: Vec<&str> = catalog.permissions().map(|(_, entry)| entry.name()).collect();
        assert_eq!(
            names,
            vec!["monitoring/command/*", "monitoring/command/schedule-check"]
        );
        assert!(catalog.module("graphite").unwrap().provides_permission("graphite/view"));
    }
}
