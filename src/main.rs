use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use http07::config::{RoutingMode, ServerConfig};
use http07::server;

#[derive(Parser)]
#[command(name = "http07")]
#[command(about = "Serves files over HTTP/0.7", long_about = None)]
struct Cli {
    /// YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to listen on (overrides LISTEN and the config file)
    #[arg(short, long)]
    listen: Option<String>,

    /// Timeout for reading the request line in milliseconds (0 for no timeout)
    #[arg(short, long)]
    timeout_ms: Option<u64>,

    /// Directory documents are served from
    #[arg(long)]
    web_root: Option<PathBuf>,

    /// File served when a request names a directory
    #[arg(long)]
    default_page: Option<String>,

    /// Serve files, or answer from the message table
    #[arg(long, value_parser = parse_mode)]
    mode: Option<RoutingMode>,
}

fn parse_mode(s: &str) -> Result<RoutingMode, String> {
    match s {
        "files" => Ok(RoutingMode::Files),
        "messages" => Ok(RoutingMode::Messages),
        other => Err(format!("unknown mode '{}', expected 'files' or 'messages'", other)),
    }
}

impl Cli {
    fn into_config(self) -> anyhow::Result<ServerConfig> {
        let mut cfg = match &self.config {
            Some(path) => ServerConfig::from_file(path)?,
            None => ServerConfig::load(),
        };

        if let Some(listen) = self.listen {
            cfg.listen_addr = listen;
        }
        if let Some(millis) = self.timeout_ms {
            cfg.set_timeout_ms(millis);
        }
        if let Some(web_root) = self.web_root {
            cfg.routing.web_root = web_root;
        }
        if let Some(default_page) = self.default_page {
            cfg.routing.default_page = default_page;
        }
        if let Some(mode) = self.mode {
            cfg.mode = mode;
        }

        Ok(cfg)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "http07=info".into()),
        )
        .with_target(false)
        .with_level(true)
        .init();

    let cfg = Cli::parse().into_config()?;

    if let Ok(dir) = std::env::current_dir() {
        tracing::info!("Running in {}", dir.display());
    }
    cfg.validate().context("invalid server configuration")?;

    let pages = &cfg.routing.error_pages;
    tracing::info!(
        mode = ?cfg.mode,
        web_root = %cfg.routing.web_root.display(),
        bad_request = %pages.bad_request.describe(),
        not_found = %pages.not_found.describe(),
        internal_error = %pages.internal_error.describe(),
        "Configuration loaded"
    );

    let cfg = Arc::new(cfg);

    tokio::select! {
        res = server::listener::run(cfg) => {
            res?;
        }

        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}
