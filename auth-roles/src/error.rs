use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("Role defined twice: {0}")]
    DuplicateRole(String),

    #[error("Role '{role}' inherits from unknown role '{parent}'")]
    UnknownParent { role: String, parent: String },

    #[error("Circular inheritance detected at role '{0}'")]
    CircularInheritance(String),

    #[error("Module registered twice: {0}")]
    DuplicateModule(String),

    #[error("Cannot provide permission \"{name}\" twice (module {module})")]
    DuplicatePermission { module: String, name: String },

    #[error("Cannot provide restriction \"{name}\" twice (module {module})")]
    DuplicateRestriction { module: String, name: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, AuthzError>;
