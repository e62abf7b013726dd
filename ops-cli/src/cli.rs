use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "vigil", version)]
#[command(about = "Inspect roles and modules and manage remember-me tokens")]
pub struct Cli {
    /// Configuration file; missing files fall back to defaults
    #[arg(short, long, global = true, default_value = "vigil.yaml")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Installed modules and what they provide
    #[command(subcommand)]
    Module(ModuleCommand),

    /// Inspect a single role
    #[command(subcommand)]
    Role(RoleCommand),

    /// Evaluate a user's roles
    #[command(subcommand)]
    User(UserCommand),

    /// Manage stored remember-me tokens
    #[command(subcommand)]
    Rememberme(RememberMeCommand),
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum ModuleCommand {
    /// List enabled modules
    List {
        /// Include installed but disabled modules
        #[arg(long)]
        installed: bool,
    },
    /// Permissions provided by enabled modules
    Permissions,
    /// Restrictions provided by enabled modules
    Restrictions,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum RoleCommand {
    /// Show a role with its inherited rules
    Show { role: String },
    /// Check whether a role grants a permission
    Check {
        role: String,
        permission: String,
        /// Only consider the role's own rules
        #[arg(long)]
        ignore_parent: bool,
    },
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum UserCommand {
    /// Check whether a user may do something
    Can {
        user: String,
        permission: String,
        /// Group the user belongs to, may be repeated
        #[arg(short, long = "group")]
        groups: Vec<String>,
    },
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum RememberMeCommand {
    /// Delete every token of a user
    Revoke {
        user: String,
        #[command(flatten)]
        database: DatabaseArgs,
    },
    /// Delete tokens older than the cookie lifetime
    Purge {
        #[command(flatten)]
        database: DatabaseArgs,
    },
}

impl RememberMeCommand {
    pub fn database(&self) -> &DatabaseArgs {
        match self {
            Self::Revoke { database, .. } | Self::Purge { database } => database,
        }
    }
}

#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct DatabaseArgs {
    /// Database connection URL, overrides `database.url`
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,
}
