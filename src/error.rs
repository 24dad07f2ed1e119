use thiserror::Error;

/// Failure while rendering an instant that was already normalized.
///
/// Never surfaces to formatter callers; it is logged once and replaced by
/// the fallback string.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("invalid display pattern {0:?}")]
    InvalidPattern(String),

    #[error("relative base does not resolve to a valid instant")]
    InvalidBase,

    /// A `Display` error from the chrono formatter itself; bad pattern tokens
    /// are caught earlier as `InvalidPattern`.
    #[error("failed to write formatted timestamp")]
    Write(#[from] std::fmt::Error),
}
