use std::time::Duration;

use anyhow::{Context, Result, anyhow, bail};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use crate::config::MAX_RESPONSE_BYTES;
use crate::{log_debug, log_warn};

/// Send one WHOIS query and return the raw response text.
///
/// The server closes the connection after answering, so only a response read
/// through to EOF is returned. A response that is still open when `timeout`
/// elapses, or that grows past `MAX_RESPONSE_BYTES`, is an error.
pub async fn query_whois(query: &str, server: &str, port: u16, timeout: Duration) -> Result<String> {
    let address = format!("{}:{}", server, port);
    log_debug!("Querying WHOIS server: {}", address);

    let mut stream = tokio::time::timeout(timeout, TcpStream::connect(&address))
        .await
        .map_err(|_| anyhow!("Connection to WHOIS server {} timed out", address))?
        .with_context(|| format!("Cannot connect to WHOIS server {}", address))?;

    if let Err(e) = stream.set_nodelay(true) {
        log_warn!("Failed to set TCP_NODELAY: {}", e);
    }

    let request = format!("{}\r\n", query);
    tokio::time::timeout(timeout, async {
        stream.write_all(request.as_bytes()).await?;
        stream.flush().await
    })
    .await
    .map_err(|_| anyhow!("Sending query to WHOIS server {} timed out", address))?
    .with_context(|| format!("Failed to send query to WHOIS server {}", address))?;

    // One byte past the cap tells an oversized answer from one that fits exactly
    let mut raw = Vec::new();
    let mut limited = stream.take(MAX_RESPONSE_BYTES as u64 + 1);

    let read = tokio::time::timeout(timeout, limited.read_to_end(&mut raw)).await;
    match read {
        Ok(result) => {
            result.with_context(|| format!("Failed to read response from WHOIS server {}", address))?;
        }
        Err(_) => bail!(
            "WHOIS response from {} timed out after {} bytes",
            address,
            raw.len()
        ),
    }

    if raw.len() > MAX_RESPONSE_BYTES {
        bail!(
            "WHOIS response from {} exceeded size limit of {} bytes",
            address,
            MAX_RESPONSE_BYTES
        );
    }

    log_debug!("Received {} bytes from {}", raw.len(), address);

    if raw.is_empty() {
        bail!("Empty response from WHOIS server {}", address);
    }

    Ok(String::from_utf8_lossy(&raw).into_owned())
}
