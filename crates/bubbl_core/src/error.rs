//! Error types for bubbl

use thiserror::Error;

/// Contract violations detected by the layout core.
///
/// These indicate a bug in the caller. Degenerate sizes and animation
/// interruptions are never reported through this type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    /// Two items in one reset share an identity
    #[error("duplicate identity at index {index} (first seen at {first})")]
    DuplicateIdentity { index: usize, first: usize },

    /// A content combination the geometry engine cannot place
    #[error("unsupported content combination: {0}")]
    UnsupportedContent(String),
}

/// Result type for bubbl operations
pub type Result<T> = std::result::Result<T, LayoutError>;

/// Report a contract violation at the integration layer.
///
/// Debug builds fail fast; release builds log and keep going, trading a
/// misplaced bubble for a crash.
#[track_caller]
pub fn report_contract_violation(context: &str, err: &LayoutError) {
    tracing::error!(%err, context, "layout contract violation");
    debug_assert!(false, "{context}: {err}");
}
