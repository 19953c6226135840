//! Team Cymru IP to ASN mapping
//!
//! The service answers a verbose query (` -v <ip>`) with a header and one
//! pipe-separated row:
//!
//! ```text
//! AS      | IP               | BGP Prefix          | CC | Registry | Allocated  | AS Name
//! 15169   | 8.8.8.8          | 8.8.8.0/24          | US | arin     | 2023-12-28 | GOOGLE - Google LLC, US
//! ```

use std::net::IpAddr;
use std::time::Duration;

use anyhow::{Context, Result, anyhow, bail};
use chrono::NaiveDate;
use cidr::IpCidr;

use super::whois::query_whois;
use crate::log_debug;

/// Origin information for one address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CymruOrigin {
    pub asn: u32,
    /// Further ASes announcing the same prefix
    pub other_origins: Vec<u32>,
    pub prefix: String,
    pub country_code: Option<String>,
    pub registry: Option<String>,
    pub allocated: Option<NaiveDate>,
    pub as_name: Option<String>,
}

pub async fn query_origin(ip: IpAddr, server: &str, port: u16, timeout: Duration) -> Result<CymruOrigin> {
    let query = format!(" -v {}", ip);
    log_debug!("Formatted Team Cymru query: {}", query);

    let response = query_whois(&query, server, port, timeout)
        .await
        .with_context(|| format!("Team Cymru query to {} failed", server))?;

    parse_origin_response(&response)
}

pub fn parse_origin_response(response: &str) -> Result<CymruOrigin> {
    for line in response.lines() {
        let line = line.trim();

        if line.is_empty() || line.starts_with("Bulk mode") {
            continue;
        }

        if let Some(message) = line.strip_prefix("Error:") {
            bail!("Team Cymru returned an error: {}", message.trim());
        }

        let columns: Vec<&str> = line.split('|').map(str::trim).collect();
        if columns.first() == Some(&"AS") {
            continue; // header row
        }

        if columns.len() < 7 {
            bail!("Malformed Team Cymru row: {}", line);
        }

        return parse_origin_row(&columns);
    }

    Err(anyhow!("Team Cymru response contained no data row"))
}

fn parse_origin_row(columns: &[&str]) -> Result<CymruOrigin> {
    if columns[0].eq_ignore_ascii_case("NA") {
        bail!("address is not announced by any AS");
    }

    let mut asns = columns[0].split_whitespace().map(|asn| {
        asn.parse::<u32>()
            .map_err(|_| anyhow!("Malformed AS number in Team Cymru row: {}", asn))
    });

    let asn = match asns.next() {
        Some(asn) => asn?,
        None => bail!("Team Cymru row has an empty AS column"),
    };
    let other_origins = asns.collect::<Result<Vec<u32>>>()?;

    let prefix = columns[2];
    if prefix.parse::<IpCidr>().is_err() {
        bail!("Malformed BGP prefix in Team Cymru row: {}", prefix);
    }

    let allocated = match optional(columns[5]) {
        Some(date) => Some(
            NaiveDate::parse_from_str(&date, "%Y-%m-%d")
                .with_context(|| format!("Malformed allocation date: {}", date))?,
        ),
        None => None,
    };

    // AS names may themselves contain '|'
    let as_name = optional(&columns[6..].join(" | "));

    Ok(CymruOrigin {
        asn,
        other_origins,
        prefix: prefix.to_string(),
        country_code: optional(columns[3]).map(|cc| cc.to_uppercase()),
        registry: optional(columns[4]).map(|registry| registry.to_lowercase()),
        allocated,
        as_name,
    })
}

fn optional(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() || value.eq_ignore_ascii_case("NA") {
        None
    } else {
        Some(value.to_string())
    }
}
