//! Error types for document operations.

use thiserror::Error;

/// Result type for document operations.
pub type Result<T> = std::result::Result<T, DomError>;

/// Errors that can occur while querying or mutating a document.
#[derive(Error, Debug)]
pub enum DomError {
    /// The node id does not refer to a node of this document.
    #[error("node not found in document")]
    NodeNotFound,

    /// An element operation was attempted on a text node.
    #[error("node is not an element")]
    NotAnElement,

    /// A text operation was attempted on an element node.
    #[error("node is not a text node")]
    NotText,

    /// The input markup had no usable content.
    #[error("no body content in document")]
    EmptyDocument,
}
