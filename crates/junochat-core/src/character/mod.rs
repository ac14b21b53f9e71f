//! Character personas for JunoChat.
//!
//! This module defines the `CharacterRepository` trait that the
//! infrastructure layer implements, and the `CharacterService` managing the
//! persona roster.

pub mod repository;
pub mod service;
