//! Shortener - a small URL shortener service
//!
//! Long URLs are mapped to deterministic 8-character codes and stored in a
//! key/value store with a fixed time-to-live; codes resolve back to the long
//! URL through an HTTP 302 redirect.
//!
//! # Architecture
//! - `generator`: SHA-256 + Base58 short code derivation
//! - `store`: mapping store trait with Redis and in-memory backends
//! - `services`: shortening business logic shared by HTTP and CLI
//! - `api`: HTTP handlers and middleware
//! - `config`: static configuration (TOML + environment)
//! - `runtime`: startup and server mode
//! - `system`: logging

pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod generator;
pub mod runtime;
pub mod services;
pub mod store;
pub mod system;
