//! Plain-text tables printed by the module and role commands

use auth_roles::{Catalog, ModuleCatalog, RoleView};

/// `MODULE STATE` listing; `installed` includes disabled modules
pub fn module_list(catalog: &Catalog, installed: bool) -> String {
    let modules: Vec<&ModuleCatalog> = if installed {
        catalog.modules().iter().collect()
    } else {
        catalog.enabled_modules().collect()
    };

    if modules.is_empty() {
        return "There are no modules installed\n".to_string();
    }

    let mut out = format!("{:<14} {:<9}\n", "MODULE", "STATE");
    for module in modules {
        let state = if module.is_enabled() { "enabled" } else { "disabled" };
        out.push_str(&format!("{:<14} {:<9}\n", module.name(), state));
    }
    out.push('\n');
    out
}

pub fn permission_table(catalog: &Catalog) -> String {
    let mut out = format!("{:<14} {:<24} {}\n", "MODULE", "PERMISSION", "DESCRIPTION");
    for (module, entry) in catalog.permissions() {
        out.push_str(&format!(
            "{:<14} {:<24} {}\n",
            module,
            entry.name(),
            entry.description()
        ));
    }
    out
}

pub fn restriction_table(catalog: &Catalog) -> String {
    let mut out = format!("{:<14} {:<16} {}\n", "MODULE", "RESTRICTION", "DESCRIPTION");
    for (module, entry) in catalog.restrictions() {
        out.push_str(&format!(
            "{:<14} {:<16} {}\n",
            module,
            entry.name(),
            entry.description()
        ));
    }
    out
}

/// A role's own rules followed by what each ancestor contributes
pub fn role_details(role: RoleView<'_>) -> String {
    let mut out = format!("Role: {}\n", role.name());

    let ancestors: Vec<&str> = role.ancestors().map(|ancestor| ancestor.name()).collect();
    if !ancestors.is_empty() {
        out.push_str(&format!("Inherits: {}\n", ancestors.join(" > ")));
    }
    if !role.children().is_empty() {
        out.push_str(&format!("Children: {}\n", role.children().join(", ")));
    }

    push_rules(&mut out, role);
    for ancestor in role.ancestors() {
        out.push_str(&format!("\nInherited from {}:\n", ancestor.name()));
        push_rules(&mut out, ancestor);
    }
    out
}

fn push_rules(out: &mut String, role: RoleView<'_>) {
    let rules = role.role();
    push_list(out, "Permissions", rules.permissions());
    push_list(out, "Refusals", rules.refusals());

    if !rules.restrictions().is_empty() {
        out.push_str("  Restrictions:\n");
        for (name, value) in rules.restrictions() {
            out.push_str(&format!("    {:<30} {}\n", name, value));
        }
    }
}

fn push_list(out: &mut String, label: &str, items: &[String]) {
    if !items.is_empty() {
        out.push_str(&format!("  {}: {}\n", label, items.join(", ")));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use auth_roles::{ModulesConfig, RolesConfig};

    fn catalog() -> Catalog {
        ModulesConfig::from_yaml_str(
            r#"
modules:
  - name: monitoring
    permissions:
      - name: monitoring/command/*
        description: Allow all commands
    restrictions:
      - name: monitoring/filter/objects
        description: Restrict access to the objects that match the filter
  - name: reporting
    enabled: false
    permissions:
      - name: reporting/export
"#,
        )
        .unwrap()
        .into_catalog()
        .unwrap()
    }

    #[test]
    fn test_module_list_enabled_only() {
        assert_eq!(
            module_list(&catalog(), false),
            "MODULE         STATE    \nmonitoring     enabled  \n\n"
        );
    }

    #[test]
    fn test_module_list_installed() {
        let listing = module_list(&catalog(), true);
        assert!(listing.contains("reporting      disabled \n"));
    }

    #[test]
    fn test_module_list_empty() {
        let empty = ModulesConfig::default().into_catalog().unwrap();
        assert_eq!(module_list(&empty, true), "There are no modules installed\n");
    }

    #[test]
    fn test_permission_table_skips_disabled_modules() {
        assert_eq!(
            permission_table(&catalog()),
            "MODULE         PERMISSION               DESCRIPTION\n\
             monitoring     monitoring/command/*     Allow all commands\n"
        );
    }

    #[test]
    fn test_restriction_table() {
        let table = restriction_table(&catalog());
        let mut lines = table.lines();
        assert_eq!(lines.next(), Some("MODULE         RESTRICTION      DESCRIPTION"));
        assert_eq!(
            lines.next(),
            Some("monitoring     monitoring/filter/objects Restrict access to the objects that match the filter")
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_role_details() {
        let graph = RolesConfig::from_yaml_str(
            r#"
roles:
  - name: base
    permissions: [host.view]
  - name: operator
    parent: base
    permissions: [host.ack]
    refusals: [host.delete]
    restrictions:
      monitoring/filter/objects: hostgroup_name=linux
"#,
        )
        .unwrap()
        .into_graph()
        .unwrap();

        let details = role_details(graph.role("operator").unwrap());
        assert!(details.starts_with("Role: operator\nInherits: base\n"));
        assert!(details.contains("  Permissions: host.ack\n  Refusals: host.delete\n"));
        assert!(details.contains("monitoring/filter/objects"));
        assert!(details.ends_with("Inherited from base:\n  Permissions: host.view\n"));
    }
}
