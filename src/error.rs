use std::io;

use thiserror::Error;

use crate::http::resolver::ErrorResource;

/// Failures that end a connection without a complete response.
///
/// Malformed requests and missing files are not errors: they resolve to
/// error pages and are answered normally.
#[derive(Debug, Error)]
pub enum ServeError {
    /// A designated error page could not be opened. Startup validation should
    /// have caught this; the connection is aborted but the server keeps running.
    #[error("could not open {kind:?} page {page}: {source}")]
    Configuration {
        kind: ErrorResource,
        page: String,
        #[source]
        source: io::Error,
    },

    /// Reading the request or writing the response failed.
    #[error("communication error: {0}")]
    Transport(#[from] io::Error),
}

impl ServeError {
    pub fn is_configuration(&self) -> bool {
        matches!(self, ServeError::Configuration { .. })
    }
}
