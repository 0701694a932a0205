use std::io;

use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::http::response::ResponseBody;

/// How a response transfer ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// Every byte was written and flushed.
    Complete(u64),
    /// The client went away first. Clients may do this at any time, so it is
    /// not reported as an error.
    ClientAborted,
}

/// Streams one response body to the client.
pub struct ResponseWriter {
    body: ResponseBody,
    written: u64,
}

impl ResponseWriter {
    pub fn new(body: ResponseBody) -> Self {
        Self { body, written: 0 }
    }

    pub async fn write_to_stream<W>(&mut self, stream: &mut W) -> io::Result<WriteOutcome>
    where
        W: AsyncWrite + Unpin,
    {
        let mut reader = self.body.reader();
        let result = async {
            let n = tokio::io::copy(&mut reader, stream).await?;
            stream.flush().await?;
            Ok::<_, io::Error>(n)
        }
        .await;

        match result {
            Ok(n) => {
                self.written += n;
                Ok(WriteOutcome::Complete(self.written))
            }
            Err(e) if is_client_abort(&e) => Ok(WriteOutcome::ClientAborted),
            Err(e) => Err(e),
        }
    }
}

pub(crate) fn is_client_abort(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::BrokenPipe
            | io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::UnexpectedEof
            | io::ErrorKind::WriteZero
    )
}
