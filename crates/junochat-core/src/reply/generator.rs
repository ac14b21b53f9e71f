//! ReplyGenerator trait definition.

use junochat_types::reply::{GenerationError, HistoryEntry};

/// Trait for reply-generation backends.
///
/// Given a character's persona description, the chat's prior history, and
/// the new user text, produces the character's reply. One attempt per call:
/// the coordinator owns the timeout and the fallback, so implementations
/// must not retry internally.
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
/// Implementations live in junochat-infra (e.g., `HttpReplyGenerator`).
pub trait ReplyGenerator: Send + Sync {
    /// Human-readable backend name for logging (e.g., "http").
    fn name(&self) -> &str;

    /// Produce a reply to `prompt` in the voice described by `persona`,
    /// given the ordered prior `history` (oldest first).
    fn generate(
        &self,
        persona: &str,
        history: &[HistoryEntry],
        prompt: &str,
    ) -> impl std::future::Future<Output = Result<String, GenerationError>> + Send;
}
