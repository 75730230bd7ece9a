//! Backend access.
//!
//! - [`Backend`]: the trait the controller depends on
//! - [`HttpBackend`]: reqwest implementation for the real service
//! - [`types`]: request and response bodies

mod backend;
mod client;
pub mod types;

pub use backend::Backend;
pub use client::HttpBackend;
pub use types::{ChatRequest, ChatResponse, ErrorBody, UploadResponse};
