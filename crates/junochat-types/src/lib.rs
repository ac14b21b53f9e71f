//! Shared domain types for JunoChat.
//!
//! This crate contains the core domain types used across the JunoChat backend:
//! User, Character, Chat, Message, and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod character;
pub mod chat;
pub mod config;
pub mod error;
pub mod reply;
pub mod user;
