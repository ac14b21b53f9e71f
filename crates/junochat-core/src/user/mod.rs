//! User accounts for JunoChat.
//!
//! This module defines the `UserRepository` trait that the infrastructure
//! layer implements, and the `UserService` orchestrating account rules.

pub mod repository;
pub mod service;
