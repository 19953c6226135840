// ASN Lookup - Query Processor
// Copyright (C) 2025 Akaere Networks
// SPDX-License-Identifier: AGPL-3.0-or-later

//! The lookup pipeline: classify, resolve, refuse reserved space, query

use std::net::IpAddr;

use anyhow::anyhow;
use async_trait::async_trait;

use crate::core::error::AsnLookupError;
use crate::core::query::{AddressPreference, HostResolver, reserved_block, resolve_target};
use crate::core::record::{AsnRecord, LookupReport};
use crate::{log_debug, log_info};

/// Something that can map an address to its ASN record
#[async_trait]
pub trait AsnSource: Send + Sync {
    async fn lookup(&self, ip: IpAddr) -> anyhow::Result<AsnRecord>;
}

/// Look up the ASN record for `ip`.
///
/// IPv4-mapped IPv6 addresses are looked up as their IPv4 form.
/// Special-purpose addresses never reach the source.
pub async fn asn_lookup(source: &dyn AsnSource, ip: IpAddr) -> Result<AsnRecord, AsnLookupError> {
    let ip = ip.to_canonical();
    if let Some((name, reference)) = reserved_block(ip) {
        let family = if ip.is_ipv4() { "IPv4" } else { "IPv6" };
        return Err(AsnLookupError::Lookup {
            ip,
            cause: anyhow!("{} address {} is already defined as {} via {}", family, ip, name, reference),
        });
    }

    log_debug!("Performing ASN lookup for {}", ip);
    source
        .lookup(ip)
        .await
        .map_err(|cause| AsnLookupError::Lookup { ip, cause })
}

/// Run one full lookup for raw user input
pub async fn run_lookup(
    input: &str,
    resolver: &dyn HostResolver,
    source: &dyn AsnSource,
    preference: AddressPreference,
) -> Result<LookupReport, AsnLookupError> {
    let address = resolve_target(input, resolver, preference).await?;

    if let Some(domain) = &address.domain {
        log_info!("IP address for {} is {}", domain, address.ip);
    }

    let record = asn_lookup(source, address.ip).await?;

    Ok(LookupReport {
        input: input.trim().to_string(),
        address,
        record,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::query::SystemResolver;
    use crate::services::registry::RegistryClient;
    use std::io;
    use std::sync::Mutex;

    struct StaticResolver(Vec<IpAddr>);

    #[async_trait]
    impl HostResolver for StaticResolver {
        async fn resolve(&self, _host: &str) -> io::Result<Vec<IpAddr>> {
            if self.0.is_empty() {
                Err(io::Error::new(io::ErrorKind::NotFound, "NXDOMAIN"))
            } else {
                Ok(self.0.clone())
            }
        }
    }

    /// Source recording every address it was asked about
    #[derive(Default)]
    struct RecordingSource {
        calls: Mutex<Vec<IpAddr>>,
        fail: bool,
    }

    impl RecordingSource {
        fn failing() -> Self {
            Self {
                fail: true,
                ..Default::default()
            }
        }

        fn calls(&self) -> Vec<IpAddr> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl AsnSource for RecordingSource {
        async fn lookup(&self, ip: IpAddr) -> anyhow::Result<AsnRecord> {
            self.calls.lock().unwrap().push(ip);
            if self.fail {
                return Err(anyhow!("connection refused"));
            }
            Ok(AsnRecord {
                asn: 15169,
                other_origins: Vec::new(),
                asn_cidr: "8.8.8.0/24".to_string(),
                asn_country_code: Some("US".to_string()),
                asn_registry: Some("arin".to_string()),
                asn_description: Some("GOOGLE - Google LLC, US".to_string()),
                asn_date: None,
                network: None,
            })
        }
    }

    fn ip(s: &str) -> IpAddr {
        s.parse().unwrap()
    }

    #[tokio::test]
    async fn test_ip_input_reaches_source_unchanged() {
        let resolver = StaticResolver(vec![ip("192.0.2.1")]);
        let source = RecordingSource::default();

        let report = run_lookup("8.8.8.8", &resolver, &source, AddressPreference::Any)
            .await
            .unwrap();

        assert_eq!(report.input, "8.8.8.8");
        assert_eq!(report.address.ip, ip("8.8.8.8"));
        assert!(!report.address.is_domain());
        assert_eq!(report.record.asn, 15169);
        assert_eq!(source.calls(), vec![ip("8.8.8.8")]);
    }

    #[tokio::test]
    async fn test_domain_input_uses_resolved_address() {
        let resolver = StaticResolver(vec![ip("93.184.215.14"), ip("93.184.215.15")]);
        let source = RecordingSource::default();

        let report = run_lookup("example.com", &resolver, &source, AddressPreference::Any)
            .await
            .unwrap();

        assert_eq!(report.address.domain.as_deref(), Some("example.com"));
        assert_eq!(source.calls(), vec![ip("93.184.215.14")]);
    }

    #[tokio::test]
    async fn test_repeated_lookups_send_identical_address() {
        let resolver = StaticResolver(Vec::new());
        let source = RecordingSource::default();

        for _ in 0..3 {
            run_lookup("2001:4860:4860::8888", &resolver, &source, AddressPreference::Any)
                .await
                .unwrap();
        }

        let calls = source.calls();
        assert_eq!(calls.len(), 3);
        assert!(calls.iter().all(|call| *call == ip("2001:4860:4860::8888")));
    }

    #[tokio::test]
    async fn test_invalid_input_never_calls_source() {
        let resolver = StaticResolver(vec![ip("192.0.2.1")]);
        let source = RecordingSource::default();

        let err = run_lookup("not a real host!!", &resolver, &source, AddressPreference::Any)
            .await
            .unwrap_err();

        assert!(matches!(err, AsnLookupError::InvalidInput { .. }));
        assert_eq!(err.exit_code(), 65);
        assert!(source.calls().is_empty());
    }

    #[tokio::test]
    async fn test_unresolvable_domain_never_calls_source() {
        let resolver = StaticResolver(Vec::new());
        let source = RecordingSource::default();

        let err = run_lookup("nonexistent-domain-xyz123.invalid", &resolver, &source, AddressPreference::Any)
            .await
            .unwrap_err();

        assert!(matches!(err, AsnLookupError::Resolution { .. }));
        assert_eq!(err.exit_code(), 68);
        assert!(err.to_string().contains("nonexistent-domain-xyz123.invalid"));
        assert!(source.calls().is_empty());
    }

    #[tokio::test]
    async fn test_reserved_address_never_calls_source() {
        let source = RecordingSource::default();

        let err = asn_lookup(&source, ip("10.0.0.1")).await.unwrap_err();

        assert_eq!(
            err.to_string(),
            "ASN lookup failed for 10.0.0.1: IPv4 address 10.0.0.1 is already defined as Private-Use Networks via RFC 1918"
        );
        assert!(source.calls().is_empty());
    }

    #[tokio::test]
    async fn test_reserved_resolution_result_is_lookup_error() {
        let resolver = StaticResolver(vec![ip("127.0.0.1")]);
        let source = RecordingSource::default();

        let err = run_lookup("localhost.localdomain", &resolver, &source, AddressPreference::Any)
            .await
            .unwrap_err();

        assert!(matches!(err, AsnLookupError::Lookup { .. }));
        assert!(source.calls().is_empty());
    }

    #[tokio::test]
    async fn test_mapped_ipv6_is_looked_up_as_ipv4() {
        let resolver = StaticResolver(Vec::new());
        let source = RecordingSource::default();

        let record = asn_lookup(&source, ip("::ffff:8.8.8.8")).await.unwrap();
        assert_eq!(record.asn, 15169);

        run_lookup("::ffff:8.8.8.8", &resolver, &source, AddressPreference::Any)
            .await
            .unwrap();

        assert_eq!(source.calls(), vec![ip("8.8.8.8"), ip("8.8.8.8")]);
    }

    #[tokio::test]
    async fn test_mapped_reserved_address_names_ipv4_family() {
        let source = RecordingSource::default();

        let err = asn_lookup(&source, ip("::ffff:10.0.0.1")).await.unwrap_err();

        assert_eq!(
            err.to_string(),
            "ASN lookup failed for 10.0.0.1: IPv4 address 10.0.0.1 is already defined as Private-Use Networks via RFC 1918"
        );
        assert!(source.calls().is_empty());
    }

    #[tokio::test]
    async fn test_single_label_name_is_resolved_not_rejected() {
        let resolver = StaticResolver(vec![ip("127.0.0.1")]);
        let source = RecordingSource::default();

        let err = run_lookup("localhost", &resolver, &source, AddressPreference::Any)
            .await
            .unwrap_err();

        assert!(matches!(err, AsnLookupError::Lookup { .. }));
        assert_eq!(err.exit_code(), 69);
        assert!(err.to_string().contains("Loopback"), "{}", err);
        assert!(source.calls().is_empty());
    }

    #[tokio::test]
    async fn test_source_failure_is_wrapped() {
        let source = RecordingSource::failing();

        let err = asn_lookup(&source, ip("1.1.1.1")).await.unwrap_err();

        assert_eq!(err.exit_code(), 69);
        assert_eq!(err.to_string(), "ASN lookup failed for 1.1.1.1: connection refused");
        assert_eq!(source.calls(), vec![ip("1.1.1.1")]);
    }

    #[tokio::test]
    #[ignore = "requires network access"]
    async fn test_live_google_dns() {
        let source = RegistryClient::default();
        let report = run_lookup("8.8.8.8", &SystemResolver, &source, AddressPreference::Any)
            .await
            .unwrap();

        assert_eq!(report.address.ip, ip("8.8.8.8"));
        assert!(report.record.asn > 0);
    }

    #[tokio::test]
    #[ignore = "requires network access"]
    async fn test_live_example_com() {
        let source = RegistryClient::default();
        let report = run_lookup("example.com", &SystemResolver, &source, AddressPreference::Any)
            .await
            .unwrap();

        assert!(report.address.is_domain());
        assert!(report.record.asn > 0);
        assert!(!report.record.asn_cidr.is_empty());
    }

    #[tokio::test]
    #[ignore = "requires network access"]
    async fn test_live_nonexistent_domain() {
        let source = RecordingSource::default();
        let err = run_lookup(
            "nonexistent-domain-xyz123.invalid",
            &SystemResolver,
            &source,
            AddressPreference::Any,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AsnLookupError::Resolution { .. }));
        assert!(source.calls().is_empty());
    }
}
