//! TCP front end: binds the listening socket and hands each accepted
//! connection to [`crate::http::connection::Connection`].

pub mod listener;
