//! SQLite storage layer.
//!
//! Repository implementations backed by SQLite with WAL mode and split
//! read/write connection pools. The message sequencer lives here too: it
//! owns the per-chat numbering invariant and always runs inside the
//! writer's transactions.

pub mod character;
pub mod chat;
pub mod pool;
pub mod sequencer;
pub mod user;
