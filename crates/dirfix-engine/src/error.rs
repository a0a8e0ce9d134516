//! Error types for the direction engine.

use thiserror::Error;

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors surfaced by engine operations. Command handling catches and
/// logs these at its boundary; nothing propagates past
/// [`crate::Engine::handle_command`].
#[derive(Error, Debug)]
pub enum EngineError {
    /// A document operation failed.
    #[error("document error: {0}")]
    Dom(#[from] dirfix_dom::DomError),

    /// The settings collaborator failed.
    #[error("settings error: {0}")]
    Settings(#[from] dirfix_settings::SettingsError),
}
