//! Turns a [`ResourceLocator`] into the bytes sent to the client.
//!
//! There is no status line and no headers: the body is the whole response.

use std::io;

use tokio::fs::File;
use tokio::io::{AsyncRead, BufReader};

use crate::config::{ErrorPages, ErrorSource};
use crate::error::ServeError;
use crate::http::resolver::{ErrorResource, ResourceLocator};

/// Opened response bytes, ready to be copied to the client.
#[derive(Debug)]
pub enum ResponseBody {
    /// A file opened for streaming.
    File(BufReader<File>),
    /// Bytes that are already in memory.
    Bytes(Vec<u8>),
    /// A compiled-in page.
    Static(&'static [u8]),
}

impl ResponseBody {
    /// Borrows the body as a reader.
    pub fn reader(&mut self) -> Box<dyn AsyncRead + Unpin + Send + '_> {
        match self {
            ResponseBody::File(file) => Box::new(file),
            ResponseBody::Bytes(bytes) => Box::new(bytes.as_slice()),
            ResponseBody::Static(bytes) => Box::new(*bytes),
        }
    }

    /// Reads the whole body into memory.
    pub async fn into_bytes(self) -> io::Result<Vec<u8>> {
        use tokio::io::AsyncReadExt;

        match self {
            ResponseBody::File(mut file) => {
                let mut buf = Vec::new();
                file.read_to_end(&mut buf).await?;
                Ok(buf)
            }
            ResponseBody::Bytes(bytes) => Ok(bytes),
            ResponseBody::Static(bytes) => Ok(bytes.to_vec()),
        }
    }
}

/// Wraps a table message in the small HTML document the server answers with.
///
/// # Example
///
/// ```
/// # use http07::http::response::render_message;
/// let page = render_message("hello world");
/// assert!(page.contains("<body>\n        hello world\n    </body>"));
/// ```
pub fn render_message(message: &str) -> String {
    format!(
        "<!DOCTYPE html>\n\
         <html lang=\"en\">\n\
         \x20   <head>\n\
         \x20       <meta charset=\"US-ASCII\">\n\
         \x20       <title>Success!</title>\n\
         \x20   </head>\n\
         \x20   <body>\n\
         \x20       {}\n\
         \x20   </body>\n\
         </html>\n",
        message
    )
}

/// Opens the bytes for a resolved resource.
///
/// A file that was resolved but cannot be opened falls back to the internal
/// error page. Only a failure to open an error page itself is an error.
pub async fn open_resource(
    locator: &ResourceLocator,
    pages: &ErrorPages,
) -> Result<ResponseBody, ServeError> {
    match locator {
        ResourceLocator::FileResource(path) => match File::open(path).await {
            Ok(file) => Ok(ResponseBody::File(BufReader::new(file))),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "could not open resolved file");
                open_error_page(ErrorResource::InternalError, pages).await
            }
        },
        ResourceLocator::StaticMessage(message) => {
            Ok(ResponseBody::Bytes(render_message(message).into_bytes()))
        }
        ResourceLocator::ErrorResource(kind) => open_error_page(*kind, pages).await,
    }
}

/// Opens one of the configured error pages.
pub async fn open_error_page(
    kind: ErrorResource,
    pages: &ErrorPages,
) -> Result<ResponseBody, ServeError> {
    match pages.get(kind) {
        ErrorSource::Embedded(page) => Ok(ResponseBody::Static(page.contents().as_bytes())),
        ErrorSource::File(path) => match File::open(path).await {
            Ok(file) => Ok(ResponseBody::File(BufReader::new(file))),
            Err(source) => Err(ServeError::Configuration {
                kind,
                page: path.display().to_string(),
                source,
            }),
        },
    }
}
