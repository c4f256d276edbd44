use thiserror::Error;

/// Errors raised by the layout and render pass
#[derive(Debug, Error)]
pub enum GraphError {
    /// A parent sits above its child; rows already decided cannot be repaired
    #[error("malformed ancestry: parent {parent} (row {parent_row}) is above child {child} (row {child_row})")]
    MalformedAncestry {
        child: String,
        parent: String,
        child_row: usize,
        parent_row: usize,
    },

    #[error("invalid render configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to write diagnostics: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode positions: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GraphError>;
