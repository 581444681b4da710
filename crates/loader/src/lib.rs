//! Asynchronous model loading: fetch over HTTP with bounded retries,
//! parse/normalize off the render thread, deliver results to a poll-based
//! state machine. A failed load always yields the fallback primitive so
//! the viewport is never empty.

pub mod client;
pub mod error;
pub mod fetch;
pub mod retry;

pub use client::{LoadState, LoadedModel, ModelLoader, ModelSource};
pub use error::LoadError;
pub use retry::RetryPolicy;
