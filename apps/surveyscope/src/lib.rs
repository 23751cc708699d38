//! # Surveyscope Application Library
//!
//! The CLI, HTTP API, configuration and Google Docs client, exposed as a
//! library so integration tests can drive them directly.

pub mod api;
pub mod cli;
pub mod config;
pub mod docs_client;
