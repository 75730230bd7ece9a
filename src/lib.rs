//! docchat
//!
//! Terminal client for a "chat with your PDF" service: upload a document,
//! ask questions about it, and accept the follow-up questions the backend
//! suggests.
//!
//! # Architecture
//!
//! - **Controller**: owns the transcript, upload banner and pending follow-up
//! - **Backend**: `POST /upload-pdf/` and `POST /chat/` over reqwest
//! - **Terminal**: renders controller updates and binds typed commands
//!
//! # Modules
//!
//! - [`api`]: backend trait, HTTP implementation and wire types
//! - [`config`]: layered configuration (defaults, file, env, CLI)
//! - [`controller`]: the chat controller and its state model
//! - [`document`]: files selected for upload
//! - [`terminal`]: terminal view and input loop

#![allow(clippy::missing_fields_in_debug)]

pub mod api;
pub mod config;
pub mod controller;
pub mod document;
pub mod error;
pub mod telemetry;
pub mod terminal;

pub use error::{Error, Result};
