//! Classification-and-reactive-styling engine.
//!
//! Inspects the text of document elements, classifies each as RTL or LTR,
//! and applies (or tags for later application) coarse directional styling.
//! A mutation subscription keeps the document correct as it changes,
//! re-evaluating only the elements each batch touched. The whole engine is
//! synchronous and single-threaded; see [`Engine`].

mod apply;
mod command;
mod engine;
mod error;
mod filter;
mod revert;

pub use apply::{ELIGIBLE_TAGS, TAG_ATTR, apply, apply_manual};
pub use command::{Command, Notification, Notifier, NullNotifier};
pub use engine::Engine;
pub use error::{EngineError, Result};
pub use filter::is_code_element;
pub use revert::revert_all;
