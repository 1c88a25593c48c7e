//! Error types for docsum core.

use crate::types::LifecycleStage;
use thiserror::Error;

/// Core error type.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CoreError {
    #[error("Invalid lifecycle transition: {from} -> {to}")]
    InvalidTransition {
        from: LifecycleStage,
        to: LifecycleStage,
    },
}

/// Result type alias using `CoreError`.
pub type CoreResult<T> = std::result::Result<T, CoreError>;
