use std::future::Future;
use std::io;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tracing::info;

use crate::config::ServerConfig;
use crate::http::connection::Connection;
use crate::http::resolver::Resolver;

/// Pause after a failed accept, so a persistent error (EMFILE) does not spin.
const ACCEPT_RETRY_DELAY: Duration = Duration::from_millis(100);

pub async fn run(cfg: Arc<ServerConfig>) -> anyhow::Result<()> {
    let listener = TcpListener::bind(&cfg.listen_addr).await?;
    serve(listener, cfg).await
}

/// Accepts connections forever, one task per connection.
pub async fn serve(listener: TcpListener, cfg: Arc<ServerConfig>) -> anyhow::Result<()> {
    info!("Listening on {}", listener.local_addr()?);
    let resolver = Arc::new(Resolver::from_config(&cfg));

    loop {
        let (socket, peer) = accept_with_retry(|| listener.accept(), ACCEPT_RETRY_DELAY).await;
        info!("Accepted connection from {}", peer);

        let cfg = Arc::clone(&cfg);
        let resolver = Arc::clone(&resolver);
        tokio::spawn(async move {
            let mut conn = Connection::new(socket, cfg, resolver);
            match conn.run().await {
                Ok(()) => info!("Ending connection with {}", peer),
                Err(e) if e.is_configuration() => {
                    tracing::error!("Configuration error on connection from {}: {}", peer, e)
                }
                Err(e) => tracing::error!("Connection error from {}: {}", peer, e),
            }
        });
    }
}

async fn accept_with_retry<T, F, Fut>(mut accept: F, delay: Duration) -> T
where
    F: FnMut() -> Fut,
    Fut: Future<Output = io::Result<T>>,
{
    loop {
        match accept().await {
            Ok(accepted) => return accepted,
            Err(e) => {
                tracing::error!("Accept failed: {}", e);
                tokio::time::sleep(delay).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[tokio::test]
    async fn accept_waits_between_failed_attempts() {
        let delay = Duration::from_millis(20);
        let mut attempts = 0;
        let started = Instant::now();

        let accepted = accept_with_retry(
            || {
                attempts += 1;
                let result = if attempts < 3 {
                    Err(io::Error::other("too many open files"))
                } else {
                    Ok(attempts)
                };
                async move { result }
            },
            delay,
        )
        .await;

        assert_eq!(accepted, 3);
        assert!(started.elapsed() >= delay * 2);
    }
}
