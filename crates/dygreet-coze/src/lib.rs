//! Streaming chat client for the Coze v3 API.
//!
//! Greetings are generated over the server-sent-events stream: answer
//! deltas are accumulated until the chat-completed event, so a half-dead
//! connection fails fast instead of waiting out the full response timeout.

mod client;
mod error;
mod sse;
mod types;

pub use client::CozeClient;
pub use error::CozeError;
