//! In-memory document model for dirfix.
//!
//! A small DOM: element/text nodes in an `ego_tree::Tree`, parsed from
//! HTML via `scraper`, with inline-style handling and MutationObserver-like
//! change reporting. The engine crate drives everything through this API;
//! nothing here knows about classification or styling policy.

mod document;
mod error;
mod html;
mod node;
mod style;

pub use document::{
    Document, MutationKind, MutationRecord, NodeId, ObserveOptions, ObserverId,
};
pub use error::{DomError, Result};
pub use node::{ElementData, NodeData};
pub use style::StyleDecls;
