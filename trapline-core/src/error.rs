//! Error types for the core crate

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Unknown network protocol: {0}")]
    UnknownProtocol(String),

    #[error("Unknown action name: {0}")]
    UnknownAction(String),
}
