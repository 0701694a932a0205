use std::io;

use tokio::io::{AsyncRead, AsyncReadExt};

use crate::http::request::{
    decode_ascii, ParsedRequest, CARRIAGE_RETURN, METHOD_GET, SEPARATOR, TERMINATOR,
};

/// Where the tokenizer currently is in the request line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// Accumulating the method keyword.
    Method,
    /// Accumulating the path. `ignoring` is set once a separator was seen
    /// inside the path: everything up to the terminator is consumed but dropped.
    Path { ignoring: bool },
    /// A result has been produced; further bytes are not consumed.
    Done,
}

/// Byte-fed request line tokenizer.
///
/// The tokenizer consumes exactly one byte at a time so that the separator
/// and terminator are recognised wherever they occur. Feed bytes with
/// [`Tokenizer::advance`] until it returns a result, or call
/// [`Tokenizer::finish`] when the stream ends first.
///
/// ```text
/// START → Method ─ ' ' ─→ Path ─ '\n' ─→ Valid(path)
///           │               │
///           │ '\n' / EOF    │ EOF
///           ▼               ▼
///        Malformed       Malformed
/// ```
#[derive(Debug)]
pub struct Tokenizer {
    phase: Phase,
    token: Vec<u8>,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Tokenizer {
    pub fn new() -> Self {
        Self {
            phase: Phase::Method,
            token: Vec::with_capacity(64),
        }
    }

    /// Consumes one byte. Returns `Some` once the request line is complete,
    /// after which the tokenizer is finished and ignores further input.
    pub fn advance(&mut self, byte: u8) -> Option<ParsedRequest> {
        match self.phase {
            Phase::Method => match byte {
                TERMINATOR => Some(self.complete(ParsedRequest::Malformed)),
                SEPARATOR => {
                    if self.token != METHOD_GET {
                        return Some(self.complete(ParsedRequest::Malformed));
                    }
                    self.token.clear();
                    self.phase = Phase::Path { ignoring: false };
                    None
                }
                _ => {
                    self.token.push(byte);
                    None
                }
            },

            Phase::Path { ignoring } => match byte {
                TERMINATOR => {
                    if self.token.last() == Some(&CARRIAGE_RETURN) {
                        self.token.pop();
                    }
                    let path = decode_ascii(&self.token);
                    Some(self.complete(ParsedRequest::Valid(path)))
                }
                SEPARATOR => {
                    self.phase = Phase::Path { ignoring: true };
                    None
                }
                _ => {
                    if !ignoring {
                        self.token.push(byte);
                    }
                    None
                }
            },

            Phase::Done => None,
        }
    }

    /// Signals end of stream. A request line that was not terminated is
    /// always malformed, whatever phase it reached.
    pub fn finish(mut self) -> ParsedRequest {
        self.complete(ParsedRequest::Malformed)
    }

    pub fn is_done(&self) -> bool {
        self.phase == Phase::Done
    }

    fn complete(&mut self, result: ParsedRequest) -> ParsedRequest {
        self.phase = Phase::Done;
        self.token.clear();
        result
    }
}

/// Tokenizes a request line from an in-memory byte sequence.
///
/// Bytes after the terminator are left unconsumed in the iterator.
///
/// # Example
///
/// ```
/// # use http07::http::parser::tokenize;
/// # use http07::http::request::ParsedRequest;
/// assert_eq!(tokenize(*b"GET /greeting\r\n"), ParsedRequest::Valid("/greeting".into()));
/// assert_eq!(tokenize(*b"POST /x\n"), ParsedRequest::Malformed);
/// ```
pub fn tokenize<I>(bytes: I) -> ParsedRequest
where
    I: IntoIterator<Item = u8>,
{
    let mut tokenizer = Tokenizer::new();
    for byte in bytes {
        if let Some(parsed) = tokenizer.advance(byte) {
            return parsed;
        }
    }
    tokenizer.finish()
}

/// Reads a request line from an async stream, one byte at a time.
///
/// End of stream and timed-out reads both yield `Malformed`. Any other I/O
/// error is returned to the caller unchanged. Callers should wrap raw sockets
/// in a `BufReader`; the tokenizer never reads past the terminator.
pub async fn read_request<R>(reader: &mut R) -> io::Result<ParsedRequest>
where
    R: AsyncRead + Unpin,
{
    let mut tokenizer = Tokenizer::new();

    loop {
        let byte = match reader.read_u8().await {
            Ok(byte) => byte,
            Err(e) if ends_request(&e) => return Ok(tokenizer.finish()),
            Err(e) => return Err(e),
        };

        if let Some(parsed) = tokenizer.advance(byte) {
            return Ok(parsed);
        }
    }
}

fn ends_request(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::UnexpectedEof | io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenize_simple_get() {
        assert_eq!(
            tokenize(*b"GET /greeting\n"),
            ParsedRequest::Valid("/greeting".to_string())
        );
    }

    #[test]
    fn tokenizer_stops_at_terminator() {
        let mut tokenizer = Tokenizer::new();
        let mut result = None;
        for &b in b"GET /a\nGET /b\n" {
            if let Some(parsed) = tokenizer.advance(b) {
                result = Some(parsed);
                break;
            }
        }

        assert_eq!(result, Some(ParsedRequest::Valid("/a".to_string())));
        assert!(tokenizer.is_done());
        assert_eq!(tokenizer.advance(b'x'), None);
    }

    #[test]
    fn only_one_carriage_return_is_stripped() {
        assert_eq!(
            tokenize(*b"GET /a\r\r\n"),
            ParsedRequest::Valid("/a\r".to_string())
        );
    }

    #[test]
    fn carriage_return_before_ignored_content_is_stripped() {
        assert_eq!(
            tokenize(*b"GET /a\r HTTP/1.0\n"),
            ParsedRequest::Valid("/a".to_string())
        );
    }

    #[test]
    fn finish_after_method_is_malformed() {
        let mut tokenizer = Tokenizer::new();
        for &b in b"GET" {
            assert_eq!(tokenizer.advance(b), None);
        }
        assert!(tokenizer.finish().is_malformed());
    }
}
