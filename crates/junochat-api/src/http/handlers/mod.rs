//! HTTP request handlers for the REST API.

pub mod character;
pub mod chat;
pub mod message;
pub mod user;
