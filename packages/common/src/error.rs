use thiserror::Error;

/// Errors raised while building elements, reconciling instance trees or
/// driving a host renderer.
#[derive(Error, Debug)]
pub enum ReconcileError {
    #[error("Invalid element: {reason}")]
    InvalidElement { reason: String },

    #[error("Host renderer cannot create a node of type '{tag}'")]
    UnknownHostType { tag: String },

    #[error("Component '{component}' violates the component contract: {reason}")]
    ComponentContractViolation { component: String, reason: String },

    #[error("Container {container} is not a root")]
    NotARoot { container: String },

    #[error("Component '{component}' is not mounted")]
    InstanceUnmounted { component: String },

    #[error("Component '{component}' requested an update while it was already updating")]
    ReentrantUpdate { component: String },

    #[error("Host renderer error: {message}")]
    Host { message: String },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ReconcileError {
    pub fn invalid_element(reason: impl Into<String>) -> Self {
        ReconcileError::InvalidElement {
            reason: reason.into(),
        }
    }

    pub fn host(message: impl Into<String>) -> Self {
        ReconcileError::Host {
            message: message.into(),
        }
    }
}

/// Errors raised while loading a JSON configuration file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}
