//! Core error type.
//!
//! Sub-crates define their own error enums and wrap `BridgeError` as one
//! variant via `#[from]`.

use thiserror::Error;

/// The top-level error type for `bridge-core`.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("unknown direction {0:?}: expected \"a_to_b\" or \"b_to_a\"")]
    UnknownDirection(String),
}

/// Shorthand result type for `bridge-core`.
pub type BridgeResult<T> = Result<T, BridgeError>;
