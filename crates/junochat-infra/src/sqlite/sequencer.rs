//! Per-chat message numbering.
//!
//! Numbers form a gap-free ascending sequence starting at 1 within each
//! chat. Both helpers take a `&mut SqliteConnection` so callers can run
//! them inside the same transaction as the insert or delete they order;
//! calling them outside that transaction would let a concurrent append
//! observe a stale count.

use junochat_types::chat::ChatId;
use junochat_types::error::RepositoryError;
use sqlx::SqliteConnection;

/// Compute the number for the next message in a chat: current count + 1.
///
/// An empty chat's first message gets number 1.
pub(crate) async fn next_number(
    conn: &mut SqliteConnection,
    chat_id: ChatId,
) -> Result<u32, RepositoryError> {
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM messages WHERE chat_id = ?")
        .bind(chat_id.0)
        .fetch_one(conn)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

    Ok(row.0 as u32 + 1)
}

/// Close the gap left by a deletion: shift every number greater than
/// `deleted_number` down by one.
///
/// Returns the number of rows shifted. Deleting the highest-numbered
/// message shifts zero rows, which is not an error.
pub(crate) async fn compact_after_delete(
    conn: &mut SqliteConnection,
    chat_id: ChatId,
    deleted_number: u32,
) -> Result<u64, RepositoryError> {
    let result =
        sqlx::query("UPDATE messages SET number = number - 1 WHERE chat_id = ? AND number > ?")
            .bind(chat_id.0)
            .bind(deleted_number as i64)
            .execute(conn)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

    Ok(result.rows_affected())
}
