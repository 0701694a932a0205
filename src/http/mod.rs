//! HTTP/0.7 protocol engine.
//!
//! A client sends exactly one line, `GET <path>`, and receives the raw bytes
//! of a document. There is no status line, no headers and no keep-alive; the
//! server closes the connection once the document has been transferred.
//!
//! # Architecture
//!
//! - **`request`**: [`request::ParsedRequest`] and the wire constants
//! - **`parser`**: byte-at-a-time tokenizer for the request line
//! - **`resolver`**: maps a parsed request to a file, a table message or an error page
//! - **`response`**: opens the bytes for a resolved resource
//! - **`writer`**: copies a response body to the client
//! - **`connection`**: the per-connection state machine
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← Tokenize the request line
//!        └──────┬──────┘
//!               │ Valid(path) | Malformed
//!               ▼
//!        ┌──────────────────┐
//!        │   Resolving      │ ← Pick and open the resource
//!        └──────┬───────────┘
//!               │ Body ready
//!               ▼
//!        ┌──────────────────┐
//!        │    Writing       │ ← Copy the body to the client
//!        └──────┬───────────┘
//!               │
//!               ▼
//!             Closed
//! ```
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use http07::config::ServerConfig;
//! use http07::http::connection::Connection;
//! use http07::http::resolver::Resolver;
//! use tokio::net::TcpListener;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let cfg = Arc::new(ServerConfig::load());
//!     let resolver = Arc::new(Resolver::from_config(&cfg));
//!     let listener = TcpListener::bind(&cfg.listen_addr).await?;
//!
//!     loop {
//!         let (socket, _addr) = listener.accept().await?;
//!         let (cfg, resolver) = (cfg.clone(), resolver.clone());
//!         tokio::spawn(async move {
//!             let mut conn = Connection::new(socket, cfg, resolver);
//!             if let Err(e) = conn.run().await {
//!                 eprintln!("Connection error: {}", e);
//!             }
//!         });
//!     }
//! }
//! ```

pub mod request;
pub mod parser;
pub mod resolver;
pub mod response;
pub mod writer;
pub mod connection;
