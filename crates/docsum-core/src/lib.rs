//! Docsum Core - Core types and domain models for the docsum ingestion pipeline.

mod error;
mod types;

pub use error::{CoreError, CoreResult};
pub use types::*;
