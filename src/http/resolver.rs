//! Maps a parsed request onto the resource that answers it.
//!
//! Resolution never opens anything: it only decides *which* resource should
//! be sent. Opening and copying the bytes is done by [`crate::http::response`].

use std::collections::BTreeMap;
use std::io;
use std::path::{Component, Path, PathBuf};

use crate::config::{RoutingConfig, RoutingMode, ServerConfig};
use crate::http::request::ParsedRequest;

/// The error resources a request can fall back to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorResource {
    BadRequest,
    NotFound,
    InternalError,
}

/// The resource chosen for a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceLocator {
    /// A regular file below the web root.
    FileResource(PathBuf),
    /// A message from the static table.
    StaticMessage(String),
    /// One of the configured error pages.
    ErrorResource(ErrorResource),
}

/// Resolves a request against the filesystem.
///
/// A single leading `/` is stripped so the path is always taken relative to
/// the web root. Paths that would climb out of the web root (`..`, a second
/// root, a drive prefix) are treated as not found. When the candidate is a
/// directory, the default page inside it is used instead.
///
/// # Example
///
/// ```
/// # use http07::config::RoutingConfig;
/// # use http07::http::request::ParsedRequest;
/// # use http07::http::resolver::{resolve, ErrorResource, ResourceLocator};
/// let config = RoutingConfig::new("/nonexistent-web-root", "index.html");
/// assert_eq!(
///     resolve(&ParsedRequest::Malformed, &config),
///     ResourceLocator::ErrorResource(ErrorResource::BadRequest)
/// );
/// ```
pub fn resolve(parsed: &ParsedRequest, config: &RoutingConfig) -> ResourceLocator {
    let path = match parsed {
        ParsedRequest::Malformed => {
            return ResourceLocator::ErrorResource(ErrorResource::BadRequest);
        }
        ParsedRequest::Valid(path) => path,
    };

    let relative = path.strip_prefix('/').unwrap_or(path);
    if escapes_root(Path::new(relative)) {
        return ResourceLocator::ErrorResource(ErrorResource::NotFound);
    }

    let mut candidate = config.web_root.join(relative);
    match probe(&candidate) {
        Probe::Directory => candidate.push(&config.default_page),
        Probe::File => return ResourceLocator::FileResource(candidate),
        Probe::Missing => return ResourceLocator::ErrorResource(ErrorResource::NotFound),
        Probe::Invalid => return ResourceLocator::ErrorResource(ErrorResource::InternalError),
    }

    match probe(&candidate) {
        Probe::File => ResourceLocator::FileResource(candidate),
        Probe::Directory | Probe::Missing => ResourceLocator::ErrorResource(ErrorResource::NotFound),
        Probe::Invalid => ResourceLocator::ErrorResource(ErrorResource::InternalError),
    }
}

enum Probe {
    File,
    Directory,
    Missing,
    /// The path cannot be represented on this filesystem at all.
    Invalid,
}

fn probe(path: &Path) -> Probe {
    match std::fs::metadata(path) {
        Ok(meta) if meta.is_dir() => Probe::Directory,
        Ok(meta) if meta.is_file() => Probe::File,
        Ok(_) => Probe::Missing,
        Err(e) if e.kind() == io::ErrorKind::InvalidInput => Probe::Invalid,
        Err(_) => Probe::Missing,
    }
}

fn escapes_root(relative: &Path) -> bool {
    relative.components().any(|c| {
        matches!(
            c,
            Component::ParentDir | Component::RootDir | Component::Prefix(_)
        )
    })
}

/// Immutable path → message mapping for the table-driven mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageTable {
    messages: BTreeMap<String, String>,
}

impl Default for MessageTable {
    fn default() -> Self {
        Self::new([
            ("/".to_string(), "index".to_string()),
            ("/greeting".to_string(), "hello world".to_string()),
        ])
    }
}

impl MessageTable {
    pub fn new(messages: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            messages: messages.into_iter().collect(),
        }
    }

    pub fn get(&self, path: &str) -> Option<&str> {
        self.messages.get(path).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Looks the path up verbatim; there is no slash stripping in this mode.
    pub fn resolve(&self, parsed: &ParsedRequest) -> ResourceLocator {
        match parsed {
            ParsedRequest::Malformed => ResourceLocator::ErrorResource(ErrorResource::BadRequest),
            ParsedRequest::Valid(path) => match self.get(path) {
                Some(message) => ResourceLocator::StaticMessage(message.to_string()),
                None => ResourceLocator::ErrorResource(ErrorResource::NotFound),
            },
        }
    }
}

/// A configured resolver, selected by [`RoutingMode`].
#[derive(Debug, Clone)]
pub enum Resolver {
    Files(RoutingConfig),
    Messages(MessageTable),
}

impl Resolver {
    pub fn from_config(cfg: &ServerConfig) -> Self {
        match cfg.mode {
            RoutingMode::Files => Resolver::Files(cfg.routing.clone()),
            RoutingMode::Messages => Resolver::Messages(cfg.messages.clone()),
        }
    }

    pub fn resolve(&self, parsed: &ParsedRequest) -> ResourceLocator {
        match self {
            Resolver::Files(routing) => resolve(parsed, routing),
            Resolver::Messages(table) => table.resolve(parsed),
        }
    }
}
