//! gptchat - streaming chat completion client
//!
//! Keeps a conversation history, sends it to a chat completion endpoint
//! and reads the reply back as a server-sent event stream.
//!
//! - [`session::ChatSession`] - history, conversation id and sending
//! - [`sse`] - response body framing
//! - [`traits::HttpClient`] - transport seam, with [`adapters`] for reqwest
//!   and tests

pub mod adapters;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod session;
pub mod sse;
pub mod traits;
