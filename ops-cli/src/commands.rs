//! Command handlers
//!
//! Handlers render their result into an [`Output`] instead of printing, the
//! binary decides where it goes.

use crate::{
    cli::{ModuleCommand, RememberMeCommand, RoleCommand, UserCommand},
    table,
};
use anyhow::Context;
use auth_rememberme::{RememberMeConfig, RememberMeRepository};
use auth_roles::{Catalog, RoleGraph};
use chrono::Utc;
use tracing::info;

/// Text for stdout and whether the command reports success
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Output {
    pub text: String,
    pub success: bool,
}

impl Output {
    fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            success: true,
        }
    }

    /// A negative answer: printed like any other, but exits non-zero
    fn refusal(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            success: false,
        }
    }
}

pub fn module(command: &ModuleCommand, catalog: &Catalog) -> Output {
    let text = match command {
        ModuleCommand::List { installed } => table::module_list(catalog, *installed),
        ModuleCommand::Permissions => table::permission_table(catalog),
        ModuleCommand::Restrictions => table::restriction_table(catalog),
    };
    Output::success(text)
}

pub fn role(command: &RoleCommand, roles: &RoleGraph) -> anyhow::Result<Output> {
    match command {
        RoleCommand::Show { role } => {
            let view = roles.role(role).with_context(|| format!("Unknown role \"{}\"", role))?;
            Ok(Output::success(table::role_details(view)))
        }
        RoleCommand::Check {
            role,
            permission,
            ignore_parent,
        } => {
            let view = roles.role(role).with_context(|| format!("Unknown role \"{}\"", role))?;

            let output = if view.denies(permission, *ignore_parent) {
                Output::refusal(format!("Role \"{}\" refuses \"{}\"\n", role, permission))
            } else if view.grants(permission, *ignore_parent) {
                Output::success(format!("Role \"{}\" grants \"{}\"\n", role, permission))
            } else {
                Output::refusal(format!("Role \"{}\" does not grant \"{}\"\n", role, permission))
            };
            Ok(output)
        }
    }
}

pub fn user(command: &UserCommand, roles: &RoleGraph) -> Output {
    match command {
        UserCommand::Can {
            user,
            permission,
            groups,
        } => {
            let role_set = roles.role_set_for(user, groups);
            if role_set.is_empty() {
                return Output::refusal(format!("User \"{}\" has no roles\n", user));
            }

            let names = role_set.names().join(", ");
            if role_set.can(permission) {
                Output::success(format!(
                    "User \"{}\" may \"{}\" (roles: {})\n",
                    user, permission, names
                ))
            } else {
                Output::refusal(format!(
                    "User \"{}\" may not \"{}\" (roles: {})\n",
                    user, permission, names
                ))
            }
        }
    }
}

pub async fn rememberme(
    command: &RememberMeCommand,
    repository: &dyn RememberMeRepository,
    config: &RememberMeConfig,
) -> anyhow::Result<Output> {
    match command {
        RememberMeCommand::Revoke { user, .. } => {
            let removed = repository
                .delete_by_username(user)
                .await
                .with_context(|| format!("Failed to revoke tokens of \"{}\"", user))?;

            info!(username = %user, removed, "Remember-me tokens revoked");
            Ok(Output::success(format!(
                "Revoked {} remember-me token(s) of \"{}\"\n",
                removed, user
            )))
        }
        RememberMeCommand::Purge { .. } => {
            let cutoff = config.purge_cutoff(Utc::now())?;
            let removed = repository
                .delete_created_before(cutoff)
                .await
                .context("Failed to purge expired tokens")?;

            info!(removed, %cutoff, "Expired remember-me tokens purged");
            Ok(Output::success(format!(
                "Purged {} expired remember-me token(s)\n",
                removed
            )))
        }
    }
}
