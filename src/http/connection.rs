use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, BufReader};

use crate::config::ServerConfig;
use crate::error::ServeError;
use crate::http::parser::read_request;
use crate::http::request::ParsedRequest;
use crate::http::resolver::{ResourceLocator, Resolver};
use crate::http::response::open_resource;
use crate::http::writer::{ResponseWriter, WriteOutcome};

/// One client connection: a single request line, a single response.
pub struct Connection<S> {
    stream: S,
    config: Arc<ServerConfig>,
    resolver: Arc<Resolver>,
    state: ConnectionState,
}

pub enum ConnectionState {
    Reading,
    Resolving(ParsedRequest),
    Writing(ResponseWriter),
    Closed,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, config: Arc<ServerConfig>, resolver: Arc<Resolver>) -> Self {
        Self {
            stream,
            config,
            resolver,
            state: ConnectionState::Reading,
        }
    }

    /// Runs the connection to completion. The stream is dropped, and so
    /// closed, when the returned value goes out of scope with `self`.
    pub async fn run(&mut self) -> Result<(), ServeError> {
        loop {
            match &mut self.state {
                ConnectionState::Reading => {
                    let parsed = self.read_request().await?;
                    self.state = ConnectionState::Resolving(parsed);
                }

                ConnectionState::Resolving(parsed) => {
                    let locator = self.resolver.resolve(parsed);
                    log_resolution(parsed, &locator);

                    let body = open_resource(&locator, &self.config.routing.error_pages).await?;
                    self.state = ConnectionState::Writing(ResponseWriter::new(body));
                }

                ConnectionState::Writing(writer) => {
                    match writer.write_to_stream(&mut self.stream).await? {
                        WriteOutcome::Complete(n) => tracing::debug!(bytes = n, "response sent"),
                        WriteOutcome::ClientAborted => {
                            tracing::debug!("client aborted the transfer")
                        }
                    }
                    self.state = ConnectionState::Closed;
                }

                ConnectionState::Closed => break,
            }
        }

        Ok(())
    }

    /// Reads the request line, bounded by the configured size and timeout.
    ///
    /// Hitting either bound looks like end of stream to the tokenizer.
    async fn read_request(&mut self) -> Result<ParsedRequest, ServeError> {
        let limit = self.config.max_request_bytes.unwrap_or(u64::MAX);
        let mut reader = BufReader::new((&mut self.stream).take(limit));

        let parsed = match self.config.timeout {
            Some(timeout) => match tokio::time::timeout(timeout, read_request(&mut reader)).await {
                Ok(result) => result?,
                Err(_) => {
                    tracing::debug!(?timeout, "timed out waiting for request");
                    ParsedRequest::Malformed
                }
            },
            None => read_request(&mut reader).await?,
        };

        Ok(parsed)
    }
}

fn log_resolution(parsed: &ParsedRequest, locator: &ResourceLocator) {
    match (parsed, locator) {
        (ParsedRequest::Valid(path), ResourceLocator::FileResource(file)) => {
            tracing::debug!(path = %path, file = %file.display(), "serving file")
        }
        (ParsedRequest::Valid(path), ResourceLocator::StaticMessage(_)) => {
            tracing::debug!(path = %path, "serving message")
        }
        (ParsedRequest::Valid(path), ResourceLocator::ErrorResource(kind)) => {
            tracing::debug!(path = %path, ?kind, "serving error page")
        }
        (ParsedRequest::Malformed, _) => tracing::debug!("malformed request"),
    }
}
