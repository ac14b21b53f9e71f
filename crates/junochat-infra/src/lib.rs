//! Infrastructure layer for JunoChat.
//!
//! Contains implementations of the repository traits defined in
//! `junochat-core`: SQLite storage with WAL mode and split read/write
//! pools, plus the HTTP client for the external reply-generation service.

pub mod config;
pub mod reply;
pub mod sqlite;
