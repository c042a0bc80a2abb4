pub mod commands;
pub mod handlers;
pub mod keyboard;

/// Error type shared by every dispatcher endpoint.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;
pub type HandlerResult = Result<(), HandlerError>;
