//! Settings of the `vigil` tool
//!
//! Values come from an optional YAML file, overridden by environment
//! variables such as `VIGIL__DATABASE__URL` or
//! `VIGIL__REMEMBERME__LIFETIME_DAYS`.

use anyhow::Context;
use auth_rememberme::RememberMeConfig;
use auth_roles::{Catalog, ModulesConfig, RoleGraph, RolesConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

pub const ENV_PREFIX: &str = "VIGIL";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VigilConfig {
    /// Role definitions, relative paths resolve against the working directory
    pub roles_file: PathBuf,
    pub modules_file: PathBuf,
    pub database: DatabaseConfig,
    pub rememberme: RememberMeConfig,
}

impl Default for VigilConfig {
    fn default() -> Self {
        Self {
            roles_file: PathBuf::from("roles.yaml"),
            modules_file: PathBuf::from("modules.yaml"),
            database: DatabaseConfig::default(),
            rememberme: RememberMeConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: 5,
        }
    }
}

impl VigilConfig {
    /// Load `path` if it exists, then apply `VIGIL__*` overrides
    pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let loaded: Self = settings.try_deserialize()?;
        loaded
            .rememberme
            .validate()
            .map_err(|e| config::ConfigError::Message(e.to_string()))?;
        Ok(loaded)
    }

    pub fn load_roles(&self) -> anyhow::Result<RoleGraph> {
        let yaml = std::fs::read_to_string(&self.roles_file)
            .with_context(|| format!("Failed to read roles from {}", self.roles_file.display()))?;
        let graph = RolesConfig::from_yaml_str(&yaml)
            .and_then(RolesConfig::into_graph)
            .with_context(|| format!("Invalid roles in {}", self.roles_file.display()))?;

        debug!(roles = graph.len(), "Roles loaded");
        Ok(graph)
    }

    pub fn load_catalog(&self) -> anyhow::Result<Catalog> {
        let yaml = std::fs::read_to_string(&self.modules_file)
            .with_context(|| format!("Failed to read modules from {}", self.modules_file.display()))?;
        let catalog = ModulesConfig::from_yaml_str(&yaml)
            .and_then(ModulesConfig::into_catalog)
            .with_context(|| format!("Invalid modules in {}", self.modules_file.display()))?;

        debug!(modules = catalog.modules().len(), "Module catalog loaded");
        Ok(catalog)
    }

    /// The database URL given on the command line wins over the file
    pub fn database_url(&self, from_cli: Option<&str>) -> anyhow::Result<String> {
        from_cli
            .or(self.database.url.as_deref())
            .map(str::to_string)
            .context("No database configured, set DATABASE_URL or database.url")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(dir: &tempfile::TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = VigilConfig::load(&dir.path().join("absent.yaml")).unwrap();
        assert_eq!(config.roles_file, PathBuf::from("roles.yaml"));
        assert_eq!(config.rememberme.lifetime_days, 30);
    }

    #[test]
    fn test_load_yaml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "vigil.yaml",
            "roles_file: /etc/vigil/roles.yaml\n\
             database:\n  max_connections: 2\n\
             rememberme:\n  secure_cookie: true\n  default_domain: example.com\n",
        );

        let config = VigilConfig::load(&path).unwrap();
        assert_eq!(config.roles_file, PathBuf::from("/etc/vigil/roles.yaml"));
        assert_eq!(config.modules_file, PathBuf::from("modules.yaml"));
        assert_eq!(config.database.max_connections, 2);
        assert!(config.rememberme.secure_cookie);
        assert_eq!(config.rememberme.default_domain.as_deref(), Some("example.com"));
        assert_eq!(config.rememberme.cookie_name, "remember-me");
    }

    #[test]
    fn test_out_of_range_lifetime_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "vigil.yaml", "rememberme:\n  lifetime_days: 200000000\n");

        let error = VigilConfig::load(&path).unwrap_err();
        assert!(error.to_string().contains("lifetime_days"));
    }

    #[test]
    fn test_load_roles_and_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let config = VigilConfig {
            roles_file: write_file(
                &dir,
                "roles.yaml",
                "roles:\n  - name: admin\n    permissions: ['*']\n    users: [alice]\n",
            ),
            modules_file: write_file(
                &dir,
                "modules.yaml",
                "modules:\n  - name: monitoring\n    permissions:\n      - name: host.view\n",
            ),
            ..VigilConfig::default()
        };

        assert_eq!(config.load_roles().unwrap().len(), 1);
        assert!(config.load_catalog().unwrap().module("monitoring").is_some());
    }

    #[test]
    fn test_invalid_roles_name_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = VigilConfig {
            roles_file: write_file(
                &dir,
                "roles.yaml",
                "roles:\n  - name: viewer\n    parent: missing\n",
            ),
            ..VigilConfig::default()
        };

        let error = config.load_roles().unwrap_err();
        assert!(error.to_string().starts_with("Invalid roles in"));
    }

    #[test]
    fn test_database_url_precedence() {
        let mut config = VigilConfig::default();
        assert!(config.database_url(None).is_err());

        config.database.url = Some("postgres://file".to_string());
        assert_eq!(config.database_url(None).unwrap(), "postgres://file");
        assert_eq!(config.database_url(Some("postgres://cli")).unwrap(), "postgres://cli");
    }
}
