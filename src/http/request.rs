/// The only method keyword the protocol knows. Compared case-sensitively.
pub const METHOD_GET: &[u8] = b"GET";

/// Separates the method from the path, and the path from ignored trailing content.
pub const SEPARATOR: u8 = b' ';

/// Ends the request line. A well-behaved server does not require the carriage return.
pub const TERMINATOR: u8 = b'\n';

/// Tolerated (and stripped) immediately before [`TERMINATOR`].
pub const CARRIAGE_RETURN: u8 = b'\r';

/// Outcome of reading a request line from a client.
///
/// A request is either a well-formed `GET <path>` line, in which case the
/// path is kept verbatim (minus a trailing carriage return), or anything
/// else, which is reported as [`ParsedRequest::Malformed`]. Malformed covers
/// wrong methods, missing separators, and streams that end (or time out)
/// before the terminator arrives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedRequest {
    /// A `GET` request for the given path. The path may be empty.
    Valid(String),
    /// The request line could not be parsed.
    Malformed,
}

impl ParsedRequest {
    /// Returns the requested path, if the request was well formed.
    ///
    /// # Example
    ///
    /// ```
    /// # use http07::http::request::ParsedRequest;
    /// assert_eq!(ParsedRequest::Valid("/a".into()).path(), Some("/a"));
    /// assert_eq!(ParsedRequest::Malformed.path(), None);
    /// ```
    pub fn path(&self) -> Option<&str> {
        match self {
            ParsedRequest::Valid(path) => Some(path),
            ParsedRequest::Malformed => None,
        }
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, ParsedRequest::Malformed)
    }
}

/// Decodes request bytes under a fixed single-byte ASCII interpretation.
///
/// Bytes outside the ASCII range have no meaning in this protocol and are
/// replaced with U+FFFD rather than being combined into multi-byte characters.
pub(crate) fn decode_ascii(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|&b| if b.is_ascii() { char::from(b) } else { char::REPLACEMENT_CHARACTER })
        .collect()
}
