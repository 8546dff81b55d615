// ── Core error types ──
//
// Nothing in the synchronization engine is fatal. These errors surface
// from the provider seam and from the public engine handle; inside the
// owner task they are logged and the task keeps running.

use thiserror::Error;

use crate::menu::NodeId;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Provider errors ──────────────────────────────────────────────
    #[error("Home provider request failed: {message}")]
    Provider { message: String },

    // ── Menu errors ──────────────────────────────────────────────────
    #[error("Menu node not found: {node}")]
    NodeNotFound { node: NodeId },

    #[error("Unsupported construction path: {path}")]
    UnsupportedConstruction { path: String },

    // ── Engine errors ────────────────────────────────────────────────
    #[error("Menu engine is not running")]
    EngineStopped,

    #[error("Menu engine event queue is full")]
    QueueFull,

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub fn provider(message: impl Into<String>) -> Self {
        Self::Provider {
            message: message.into(),
        }
    }
}
