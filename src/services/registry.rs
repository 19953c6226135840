//! Production ASN source: Team Cymru for the origin AS, RDAP for the network

use std::net::IpAddr;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;

use crate::config::{CYMRU_WHOIS_SERVER, DEFAULT_WHOIS_PORT, TIMEOUT_SECONDS};
use crate::core::query_processor::AsnSource;
use crate::core::record::AsnRecord;
use crate::services::{cymru, rdap};
use crate::{log_debug, log_warn};

#[derive(Debug, Clone)]
pub struct RegistryClient {
    whois_server: String,
    whois_port: u16,
    timeout: Duration,
    network_details: bool,
}

impl Default for RegistryClient {
    fn default() -> Self {
        Self {
            whois_server: CYMRU_WHOIS_SERVER.to_string(),
            whois_port: DEFAULT_WHOIS_PORT,
            timeout: Duration::from_secs(TIMEOUT_SECONDS),
            network_details: true,
        }
    }
}

impl RegistryClient {
    pub fn new(whois_server: impl Into<String>, whois_port: u16, timeout: Duration) -> Self {
        Self {
            whois_server: whois_server.into(),
            whois_port,
            timeout,
            network_details: true,
        }
    }

    /// Toggle the RDAP network lookup
    pub fn with_network_details(mut self, enabled: bool) -> Self {
        self.network_details = enabled;
        self
    }
}

#[async_trait]
impl AsnSource for RegistryClient {
    async fn lookup(&self, ip: IpAddr) -> Result<AsnRecord> {
        let origin = cymru::query_origin(ip, &self.whois_server, self.whois_port, self.timeout).await?;

        log_debug!("Origin of {}: AS{} ({})", ip, origin.asn, origin.prefix);

        let network = if self.network_details {
            match rdap::query_network(ip).await {
                Ok(network) => Some(network),
                Err(e) => {
                    log_warn!("Network details unavailable for {}: {:#}", ip, e);
                    None
                }
            }
        } else {
            None
        };

        Ok(AsnRecord {
            asn: origin.asn,
            other_origins: origin.other_origins,
            asn_cidr: origin.prefix,
            asn_country_code: origin.country_code,
            asn_registry: origin.registry,
            asn_description: origin.as_name,
            asn_date: origin.allocated,
            network,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn test_lookup_against_local_whois() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 128];
            let _ = socket.read(&mut buf).await.unwrap();
            socket
                .write_all(
                    b"AS | IP | BGP Prefix | CC | Registry | Allocated | AS Name\n\
                      13335 209242 | 1.1.1.1 | 1.1.1.0/24 | AU | apnic | 2011-08-11 | CLOUDFLARENET, US\n",
                )
                .await
                .unwrap();
            socket.shutdown().await.unwrap();
        });

        let client = RegistryClient::new("127.0.0.1", port, Duration::from_secs(5)).with_network_details(false);
        let record = client.lookup("1.1.1.1".parse().unwrap()).await.unwrap();

        assert_eq!(record.asn, 13335);
        assert_eq!(record.other_origins, vec![209242]);
        assert_eq!(record.asn_cidr, "1.1.1.0/24");
        assert_eq!(record.asn_country_code.as_deref(), Some("AU"));
        assert_eq!(record.asn_registry.as_deref(), Some("apnic"));
        assert_eq!(record.asn_description.as_deref(), Some("CLOUDFLARENET, US"));
        assert!(record.network.is_none());
    }

    #[tokio::test]
    #[ignore = "requires network access"]
    async fn test_lookup_google_dns() {
        let record = RegistryClient::default()
            .lookup("8.8.8.8".parse().unwrap())
            .await
            .unwrap();

        assert!(record.asn > 0);
        assert!(record.asn_cidr.contains('/'));
    }
}
