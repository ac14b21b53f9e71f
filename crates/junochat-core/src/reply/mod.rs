//! Reply-generation abstractions for JunoChat.
//!
//! This module defines the `ReplyGenerator` trait that the turn coordinator
//! calls to obtain character replies.

pub mod generator;
