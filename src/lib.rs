//! http07 - HTTP/0.7 file server
//!
//! Core library: request tokenizer, resource resolver and connection handling.

pub mod config;
pub mod error;
pub mod http;
pub mod server;
