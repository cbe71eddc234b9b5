//! promtest error types

/// promtest error types
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PromtestError {
    // Filter errors
    #[error("metrics labels should have two parts, e.g. key=value (got {0:?})")]
    MalformedFilter(String),

    // Decode errors
    #[error("decode error: {0}")]
    Decode(String),

    /// Snapshot entry whose recorded value disagrees with its key kind.
    #[error("metric {name} registered as {expected} but holds a {actual} value")]
    KindMismatch {
        name: String,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("metric {name} carries more than one payload")]
    ConflictingPayload { name: String },

    // Adapter errors
    #[error("collect worker panicked")]
    WorkerPanicked,
}

/// Result type alias for promtest operations
pub type Result<T> = std::result::Result<T, PromtestError>;
