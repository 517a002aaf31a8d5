//! Error types for traversal configuration and reference scenes.

use thiserror::Error;

/// Which of the two handler slots a configuration error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerKind {
    /// The per-candidate any-hit handler.
    AnyHit,
    /// The end-of-traversal closest-hit handler.
    ClosestHit,
}

impl std::fmt::Display for HandlerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HandlerKind::AnyHit => f.write_str("any-hit"),
            HandlerKind::ClosestHit => f.write_str("closest-hit"),
        }
    }
}

/// Errors surfaced by strict traversal, settings, and scene construction.
///
/// The traversal loop itself never fails; these are all raised before a
/// scene is launched.
#[derive(Error, Debug)]
pub enum TraceError {
    /// A policy defers to a handler that was never registered.
    #[error("policy defers to the {0} handler, but none is registered")]
    MissingHandler(HandlerKind),

    /// A batch was given a different number of rays and payloads.
    #[error("batch of {rays} rays given {payloads} payloads")]
    BatchMismatch {
        /// Number of rays in the batch.
        rays: usize,
        /// Number of payloads in the batch.
        payloads: usize,
    },

    /// Settings failed validation.
    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    /// Geometry handed to a reference scene is degenerate.
    #[error("invalid primitive: {0}")]
    InvalidPrimitive(String),

    /// Settings file is not valid TOML for [`crate::TraceSettings`].
    #[error("failed to parse settings: {0}")]
    Config(#[from] toml::de::Error),

    /// Settings file could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for traversal operations.
pub type Result<T> = std::result::Result<T, TraceError>;
