//! Reply-generation types shared between the core turn logic and the
//! HTTP generator client.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::chat::MessageRole;

/// One prior message handed to the reply generator as context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub role: MessageRole,
    pub text: String,
}

impl HistoryEntry {
    pub fn new(role: MessageRole, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
        }
    }
}

/// Errors from the reply-generation service.
///
/// The turn coordinator treats every variant the same way: no retry, store
/// the fallback reply instead.
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("reply service unreachable: {0}")]
    Unreachable(String),

    #[error("reply service returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("reply service response malformed: {0}")]
    Malformed(String),

    #[error("reply service timed out after {0} seconds")]
    Timeout(u64),
}
