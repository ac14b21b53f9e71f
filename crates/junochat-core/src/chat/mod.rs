//! Chat threads, ordered messages, and turn-taking for JunoChat.
//!
//! This module defines the `ChatRepository` trait that the infrastructure
//! layer implements, the `ChatService` for thread and message CRUD, and the
//! `TurnCoordinator` driving one conversational turn.

pub mod repository;
pub mod service;
pub mod turn;
