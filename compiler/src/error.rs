use thiserror::Error;

use crate::node::DescriptorKind;

#[derive(Debug, Error)]
pub enum LocateError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Descriptor decode error: {0}")]
    Decode(String),

    #[error("No source path relation for a {child} inside a {parent}")]
    UnsupportedRelation {
        parent: DescriptorKind,
        child:  DescriptorKind,
    },

    #[error("File \"{0}\" is not part of the descriptor set")]
    FileNotFound(String),

    #[error("Invalid name pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
