//! Administration tool for the Vigil console
//!
//! The `vigil` binary answers the questions an operator asks about access
//! control without starting the web frontend:
//! - Which modules are installed and what permissions they provide
//! - What a role grants, refuses and restricts
//! - Whether a user may do something, through all of their roles
//! - Revoking and purging remember-me tokens

pub mod cli;
pub mod commands;
pub mod config;
pub mod table;

pub use cli::Cli;
pub use commands::Output;
pub use config::VigilConfig;
