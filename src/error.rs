use thiserror::Error;

/// A node broke the tick contract.
///
/// This is a bug in a node implementation, not a runtime outcome. It aborts
/// the current tick call and must not be retried as if it were a
/// [`crate::NodeStatus::Failure`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LogicError {
    #[error("[{parent}]: child {child:?} should not return Idle")]
    IdleStatus { parent: String, child: String },
    #[error("[{node}]: the root of a tree should not return Idle")]
    IdleRoot { node: String },
}

impl LogicError {
    /// Names the composite that saw the offending child, unless an inner
    /// composite already did.
    pub(crate) fn with_parent(self, name: &str) -> Self {
        match self {
            Self::IdleStatus { parent, child } if parent.is_empty() => Self::IdleStatus {
                parent: name.to_owned(),
                child,
            },
            err => err,
        }
    }
}

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum AddChildError {
    #[error("Attempted to add too many nodes")]
    TooManyNodes,
}

pub type AddChildResult = Result<(), AddChildError>;

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ConfigError {
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
    #[error("Port {port:?} is not declared by node {node:?}")]
    UnknownPort { node: String, port: String },
    #[error("Node type not found {0:?}")]
    MissingNode(String),
}
