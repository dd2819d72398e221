//! Bridge error taxonomy
//!
//! Every failure surfaces to the immediate caller as one of these variants.
//! All variants are serializable so they can cross the IPC boundary to the
//! presentation layer unchanged.

use serde::Serialize;
use thiserror::Error;

/// Errors produced by bridge operations
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "message")]
pub enum BridgeError {
    /// No capability handle was present when the command was issued
    #[error("Automation capability unavailable. Enable the service in the accessibility settings.")]
    CapabilityUnavailable,

    /// The capability refused to start the gesture
    #[error("Gesture submission rejected: {0}")]
    SubmissionRejected(String),

    /// The capability disconnected while the command was in flight
    #[error("Command cancelled: automation capability disconnected")]
    Cancelled,

    /// Neither input focus nor accessibility focus is held by any node
    #[error("No focused target to receive text")]
    NoFocusedTarget,

    /// The focused node accepted neither set-text nor paste
    #[error("Text injection rejected by the focused target")]
    InjectionRejected,

    /// Settings or launch surface failure
    #[error("Platform error: {0}")]
    PlatformError(String),

    /// Clipboard write failure
    #[error("Clipboard error: {0}")]
    Clipboard(String),

    /// Settings file could not be read, parsed or written
    #[error("Settings error: {0}")]
    Settings(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl BridgeError {
    /// Stable error code handed to collaborators alongside a `false` result
    pub fn code(&self) -> &'static str {
        match self {
            BridgeError::CapabilityUnavailable => "CAPABILITY_UNAVAILABLE",
            BridgeError::SubmissionRejected(_) => "SUBMISSION_REJECTED",
            BridgeError::Cancelled => "CANCELLED",
            BridgeError::NoFocusedTarget => "NO_FOCUSED_TARGET",
            BridgeError::InjectionRejected => "INJECTION_REJECTED",
            BridgeError::PlatformError(_) => "PLATFORM_ERROR",
            BridgeError::Clipboard(_) => "CLIPBOARD_ERROR",
            BridgeError::Settings(_) => "SETTINGS_ERROR",
            BridgeError::Io(_) => "IO_ERROR",
        }
    }
}

impl From<std::io::Error> for BridgeError {
    fn from(err: std::io::Error) -> Self {
        BridgeError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for BridgeError {
    fn from(err: serde_json::Error) -> Self {
        BridgeError::Settings(format!("JSON error: {}", err))
    }
}

pub type BridgeResult<T> = Result<T, BridgeError>;
