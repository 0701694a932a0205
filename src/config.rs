//! Server configuration.
//!
//! Configuration is assembled once at startup from built-in defaults, an
//! optional YAML file and the `LISTEN` environment variable, then validated
//! and shared read-only by every connection.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context};
use serde::Deserialize;

use crate::http::resolver::{ErrorResource, MessageTable};

const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8080";
const DEFAULT_WEB_ROOT: &str = "webroot";
const DEFAULT_PAGE: &str = "index.html";
const DEFAULT_MAX_REQUEST_BYTES: u64 = 8192;

/// A compiled-in error page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbeddedPage {
    BadRequest,
    NotFound,
    InternalError,
}

impl EmbeddedPage {
    pub fn for_kind(kind: ErrorResource) -> Self {
        match kind {
            ErrorResource::BadRequest => EmbeddedPage::BadRequest,
            ErrorResource::NotFound => EmbeddedPage::NotFound,
            ErrorResource::InternalError => EmbeddedPage::InternalError,
        }
    }

    pub fn contents(&self) -> &'static str {
        match self {
            EmbeddedPage::BadRequest => include_str!("../assets/BadRequest.html"),
            EmbeddedPage::NotFound => include_str!("../assets/NotFound.html"),
            EmbeddedPage::InternalError => include_str!("../assets/InternalServerError.html"),
        }
    }
}

/// Locator for the bytes of an error page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorSource {
    /// A page on the filesystem, checked once at startup.
    File(PathBuf),
    /// A page compiled into the binary.
    Embedded(EmbeddedPage),
}

impl ErrorSource {
    fn from_option(path: Option<PathBuf>, kind: ErrorResource) -> Self {
        match path {
            Some(path) => ErrorSource::File(path),
            None => ErrorSource::Embedded(EmbeddedPage::for_kind(kind)),
        }
    }

    /// Human readable locator, used in logs and error messages.
    pub fn describe(&self) -> String {
        match self {
            ErrorSource::File(path) => path.display().to_string(),
            ErrorSource::Embedded(page) => format!("embedded {:?} page", page),
        }
    }
}

/// The three error resources every server must be able to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorPages {
    pub bad_request: ErrorSource,
    pub not_found: ErrorSource,
    pub internal_error: ErrorSource,
}

impl Default for ErrorPages {
    fn default() -> Self {
        Self {
            bad_request: ErrorSource::Embedded(EmbeddedPage::BadRequest),
            not_found: ErrorSource::Embedded(EmbeddedPage::NotFound),
            internal_error: ErrorSource::Embedded(EmbeddedPage::InternalError),
        }
    }
}

impl ErrorPages {
    pub fn get(&self, kind: ErrorResource) -> &ErrorSource {
        match kind {
            ErrorResource::BadRequest => &self.bad_request,
            ErrorResource::NotFound => &self.not_found,
            ErrorResource::InternalError => &self.internal_error,
        }
    }
}

/// Immutable routing settings used by the filesystem resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingConfig {
    /// Directory all request paths are resolved against.
    pub web_root: PathBuf,
    /// File served when a request resolves to a directory.
    pub default_page: String,
    pub error_pages: ErrorPages,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            web_root: PathBuf::from(DEFAULT_WEB_ROOT),
            default_page: DEFAULT_PAGE.to_string(),
            error_pages: ErrorPages::default(),
        }
    }
}

impl RoutingConfig {
    pub fn new(web_root: impl Into<PathBuf>, default_page: impl Into<String>) -> Self {
        Self {
            web_root: web_root.into(),
            default_page: default_page.into(),
            error_pages: ErrorPages::default(),
        }
    }

    pub fn with_error_pages(mut self, error_pages: ErrorPages) -> Self {
        self.error_pages = error_pages;
        self
    }
}

/// Which resolution strategy the server runs with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoutingMode {
    /// Serve files below the web root.
    #[default]
    Files,
    /// Answer from a fixed path → message table.
    Messages,
}

/// Complete server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub listen_addr: String,
    /// Time allowed for the request line to arrive. `None` waits forever.
    pub timeout: Option<Duration>,
    /// Upper bound on request bytes read from a client. `None` is unbounded.
    /// A client that never sends the terminator is cut off here.
    pub max_request_bytes: Option<u64>,
    pub mode: RoutingMode,
    pub routing: RoutingConfig,
    pub messages: MessageTable,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: DEFAULT_LISTEN_ADDR.to_string(),
            timeout: None,
            max_request_bytes: Some(DEFAULT_MAX_REQUEST_BYTES),
            mode: RoutingMode::default(),
            routing: RoutingConfig::default(),
            messages: MessageTable::default(),
        }
    }
}

/// On-disk YAML layout. Every field is optional and falls back to the default.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileConfig {
    listen_addr: Option<String>,
    timeout_ms: Option<u64>,
    max_request_bytes: Option<u64>,
    mode: Option<RoutingMode>,
    web_root: Option<PathBuf>,
    default_page: Option<String>,
    bad_request_page: Option<PathBuf>,
    not_found_page: Option<PathBuf>,
    internal_error_page: Option<PathBuf>,
    messages: Option<BTreeMap<String, String>>,
}

impl ServerConfig {
    /// Defaults, with the listen address taken from `LISTEN` when set.
    pub fn load() -> Self {
        let mut cfg = Self::default();
        cfg.apply_env();
        cfg
    }

    /// Parses a YAML document on top of the defaults.
    pub fn from_yaml_str(yaml: &str) -> anyhow::Result<Self> {
        let file: FileConfig = if yaml.trim().is_empty() {
            FileConfig::default()
        } else {
            serde_yaml::from_str(yaml).context("invalid configuration")?
        };

        let defaults = Self::default();
        let error_pages = ErrorPages {
            bad_request: ErrorSource::from_option(file.bad_request_page, ErrorResource::BadRequest),
            not_found: ErrorSource::from_option(file.not_found_page, ErrorResource::NotFound),
            internal_error: ErrorSource::from_option(
                file.internal_error_page,
                ErrorResource::InternalError,
            ),
        };

        Ok(Self {
            listen_addr: file.listen_addr.unwrap_or(defaults.listen_addr),
            timeout: file.timeout_ms.and_then(timeout_from_millis),
            max_request_bytes: match file.max_request_bytes {
                Some(0) => None,
                Some(limit) => Some(limit),
                None => defaults.max_request_bytes,
            },
            mode: file.mode.unwrap_or_default(),
            routing: RoutingConfig {
                web_root: file.web_root.unwrap_or(defaults.routing.web_root),
                default_page: file.default_page.unwrap_or(defaults.routing.default_page),
                error_pages,
            },
            messages: file
                .messages
                .map(MessageTable::new)
                .unwrap_or(defaults.messages),
        })
    }

    /// Reads a YAML file, then applies the `LISTEN` override.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("could not read config file {}", path.display()))?;
        let mut cfg = Self::from_yaml_str(&contents)
            .with_context(|| format!("could not parse config file {}", path.display()))?;
        cfg.apply_env();
        Ok(cfg)
    }

    pub fn set_timeout_ms(&mut self, millis: u64) {
        self.timeout = timeout_from_millis(millis);
    }

    /// Checks that everything the server will serve from disk exists.
    ///
    /// Error pages are only checked here; per-request code assumes they exist.
    pub fn validate(&self) -> anyhow::Result<()> {
        let web_root = &self.routing.web_root;
        if self.mode == RoutingMode::Files && !web_root.is_dir() {
            bail!("could not find web root {}", web_root.display());
        }

        if self.routing.default_page.is_empty() {
            bail!("default page name must not be empty");
        }

        let pages = &self.routing.error_pages;
        for (name, source) in [
            ("bad request", &pages.bad_request),
            ("not found", &pages.not_found),
            ("internal server error", &pages.internal_error),
        ] {
            if let ErrorSource::File(path) = source {
                if !path.is_file() {
                    bail!("could not find {} page {}", name, path.display());
                }
            }
        }

        Ok(())
    }

    fn apply_env(&mut self) {
        if let Ok(addr) = std::env::var("LISTEN") {
            self.listen_addr = addr;
        }
    }
}

fn timeout_from_millis(millis: u64) -> Option<Duration> {
    (millis > 0).then(|| Duration::from_millis(millis))
}
