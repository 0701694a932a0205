use std::io::Write;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::time::timeout;

const TERMINATOR: &str = "\r\n";

#[derive(Parser)]
#[command(name = "http07-client")]
#[command(about = "Sends one HTTP/0.7 request line and prints the response", long_about = None)]
struct Cli {
    /// Server address
    #[arg(short, long, default_value = "127.0.0.1:8080")]
    addr: String,

    /// Timeout for each socket operation in milliseconds
    #[arg(short, long, default_value_t = 30_000)]
    timeout_ms: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let limit = Duration::from_millis(cli.timeout_ms);

    println!("Client running...");

    let mut stream = timeout(limit, TcpStream::connect(&cli.addr))
        .await
        .context("timed out connecting")?
        .with_context(|| format!("could not connect to {}", cli.addr))?;
    println!("Connected to {}", stream.peer_addr()?);

    print!("Type message and press enter to send: ");
    std::io::stdout().flush()?;

    let mut line = String::new();
    BufReader::new(tokio::io::stdin()).read_line(&mut line).await?;
    let line = line.trim_end_matches(['\r', '\n']);

    stream.write_all(line.as_bytes()).await?;
    stream.write_all(TERMINATOR.as_bytes()).await?;
    stream.flush().await?;

    let mut response = Vec::new();
    timeout(limit, stream.read_to_end(&mut response))
        .await
        .context("timed out waiting for response")??;

    println!("{}", String::from_utf8_lossy(&response));
    Ok(())
}
