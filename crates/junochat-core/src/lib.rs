//! Business logic and repository trait definitions for JunoChat.
//!
//! This crate defines the "ports" (repository traits) that the infrastructure
//! layer implements. It depends only on `junochat-types` -- never on
//! `junochat-infra` or any database/IO crate.

pub mod character;
pub mod chat;
pub mod reply;
#[cfg(test)]
pub(crate) mod testing;
pub mod user;
