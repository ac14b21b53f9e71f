//! Reply generator implementations.
//!
//! Contains the concrete implementation of the
//! [`ReplyGenerator`](junochat_core::reply::generator::ReplyGenerator) trait:
//! an HTTP client for an external generation service.

pub mod http;

pub use http::HttpReplyGenerator;
