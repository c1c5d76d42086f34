//! Error types for tree operations.

use crate::component::ComponentType;
use rk_core::ComponentId;
use thiserror::Error;

/// Errors raised by tree edits and registry lookups.
///
/// All of these indicate a caller bug (stale handle, unchecked attachment,
/// unknown configuration) rather than a runtime condition.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TreeError {
    #[error("Unknown component: {id}")]
    UnknownComponent { id: ComponentId },

    #[error("{child} cannot be attached to {parent}")]
    Incompatible {
        parent: ComponentType,
        child: ComponentType,
    },

    #[error("Child index out of bounds (index={index}, len={len})")]
    IndexOob { index: usize, len: usize },

    #[error("The rocket root cannot be detached")]
    RootRemoval,

    #[error("Motor configuration ID does not exist: {id}")]
    UnknownMotorConfig { id: String },
}

pub type TreeResult<T> = Result<T, TreeError>;
