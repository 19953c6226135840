// ASN Lookup - Input Classification
// Copyright (C) 2025 Akaere Networks
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Input classification and resolution
//!
//! Turns the raw user input into a [`ResolvedAddress`]: IP literals pass
//! through untouched, hostnames go through a [`HostResolver`].

use std::io;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use async_trait::async_trait;
use cidr::{Ipv4Cidr, Ipv6Cidr};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::config::{RESERVED_IPV4_RANGES, RESERVED_IPV6_RANGES};
use crate::core::error::AsnLookupError;
use crate::log_debug;

const MAX_HOSTNAME_LEN: usize = 253;

static HOSTNAME_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([a-zA-Z0-9]([a-zA-Z0-9\-]{0,61}[a-zA-Z0-9])?\.)+([a-zA-Z]{2,63}|xn--[a-zA-Z0-9\-]{1,59})$")
        .expect("hostname regex is valid")
});

// Bare names like `localhost` or `intranet`, left to hosts files and search domains
static SINGLE_LABEL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9]([a-zA-Z0-9\-]{0,61}[a-zA-Z0-9])?$").expect("label regex is valid")
});

/// Classified user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Ip(IpAddr),
    Domain(String),
}

/// Which address family to keep when a hostname resolves to several addresses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AddressPreference {
    #[default]
    Any,
    Ipv4Only,
    Ipv6Only,
}

impl AddressPreference {
    fn accepts(self, ip: &IpAddr) -> bool {
        match self {
            AddressPreference::Any => true,
            AddressPreference::Ipv4Only => ip.is_ipv4(),
            AddressPreference::Ipv6Only => ip.is_ipv6(),
        }
    }
}

/// The address handed to the ASN lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedAddress {
    pub ip: IpAddr,
    /// Hostname the address was resolved from, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
}

impl ResolvedAddress {
    pub fn is_domain(&self) -> bool {
        self.domain.is_some()
    }
}

/// Hostname to address resolution
#[async_trait]
pub trait HostResolver: Send + Sync {
    /// Resolve `host` to its addresses, in the order the resolver returned them
    async fn resolve(&self, host: &str) -> io::Result<Vec<IpAddr>>;
}

/// Resolver backed by the operating system (getaddrinfo)
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemResolver;

#[async_trait]
impl HostResolver for SystemResolver {
    async fn resolve(&self, host: &str) -> io::Result<Vec<IpAddr>> {
        let addrs = tokio::net::lookup_host((host, 0u16)).await?;
        let mut ips: Vec<IpAddr> = Vec::new();
        for addr in addrs {
            // getaddrinfo repeats each address once per socket type
            if !ips.contains(&addr.ip()) {
                ips.push(addr.ip());
            }
        }
        Ok(ips)
    }
}

pub fn classify(input: &str) -> Result<Target, AsnLookupError> {
    let query = input.trim();

    if query.is_empty() {
        return Err(AsnLookupError::invalid_input(input, "empty input"));
    }

    if let Ok(ip) = query.parse::<IpAddr>() {
        return Ok(Target::Ip(ip));
    }

    let host = query.strip_suffix('.').unwrap_or(query);
    if host.len() <= MAX_HOSTNAME_LEN && HOSTNAME_REGEX.is_match(host) {
        return Ok(Target::Domain(host.to_ascii_lowercase()));
    }

    // An all-digit label would be read as a numeric IPv4 address by getaddrinfo
    if SINGLE_LABEL_REGEX.is_match(host) && host.chars().any(|c| c.is_ascii_alphabetic()) {
        return Ok(Target::Domain(host.to_ascii_lowercase()));
    }

    Err(AsnLookupError::invalid_input(
        query,
        "neither a valid IP address nor a domain name",
    ))
}

/// Classify `input` and, for hostnames, resolve it to a single address.
///
/// When the resolver returns several addresses the first one (after applying
/// `preference`) wins.
pub async fn resolve_target(
    input: &str,
    resolver: &dyn HostResolver,
    preference: AddressPreference,
) -> Result<ResolvedAddress, AsnLookupError> {
    let domain = match classify(input)? {
        Target::Ip(ip) => {
            log_debug!("Input {} is an IP literal", ip);
            return Ok(ResolvedAddress { ip, domain: None });
        }
        Target::Domain(domain) => domain,
    };

    log_debug!("Resolving domain: {}", domain);

    let addresses = resolver
        .resolve(&domain)
        .await
        .map_err(|source| AsnLookupError::Resolution {
            input: domain.clone(),
            source,
        })?;

    log_debug!("Resolver returned {} address(es) for {}", addresses.len(), domain);

    match addresses.into_iter().find(|ip| preference.accepts(ip)) {
        Some(ip) => Ok(ResolvedAddress {
            ip,
            domain: Some(domain),
        }),
        None => {
            let message = match preference {
                AddressPreference::Any => "no addresses returned",
                AddressPreference::Ipv4Only => "no IPv4 addresses returned",
                AddressPreference::Ipv6Only => "no IPv6 addresses returned",
            };
            Err(AsnLookupError::Resolution {
                input: domain,
                source: io::Error::new(io::ErrorKind::NotFound, message),
            })
        }
    }
}

/// Name and reference of the special-purpose block containing `ip`, if any
pub fn reserved_block(ip: IpAddr) -> Option<(&'static str, &'static str)> {
    match ip {
        IpAddr::V4(ipv4) => reserved_ipv4(ipv4),
        IpAddr::V6(ipv6) => {
            // IPv4-mapped addresses are judged by their IPv4 part
            if let Some(ipv4) = ipv6.to_ipv4_mapped() {
                return reserved_ipv4(ipv4);
            }
            reserved_ipv6(ipv6)
        }
    }
}

fn reserved_ipv4(ip: Ipv4Addr) -> Option<(&'static str, &'static str)> {
    for (range_str, name, reference) in RESERVED_IPV4_RANGES {
        if let Ok(range) = range_str.parse::<Ipv4Cidr>() {
            if range.contains(&ip) {
                return Some((*name, *reference));
            }
        }
    }
    None
}

fn reserved_ipv6(ip: Ipv6Addr) -> Option<(&'static str, &'static str)> {
    for (range_str, name, reference) in RESERVED_IPV6_RANGES {
        if let Ok(range) = range_str.parse::<Ipv6Cidr>() {
            if range.contains(&ip) {
                return Some((*name, *reference));
            }
        }
    }
    None
}
