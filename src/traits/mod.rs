//! Trait abstractions for dependency injection and testability.
//!
//! # Traits
//!
//! - [`HttpClient`] - Streaming HTTP POST transport

pub mod http;

pub use http::{ByteStream, Headers, HttpClient, HttpError};
