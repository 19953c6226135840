//! # ASN Lookup Library
//!
//! Resolve an IP address or domain name and look up the Autonomous System
//! that originates it:
//! - IP literals (IPv4 and IPv6) are used as-is
//! - Domain names are resolved through the system resolver
//! - Origin AS, BGP prefix, country, registry and allocation date come from
//!   the Team Cymru IP-to-ASN service
//! - Network allocation details and event history come from RDAP
//!
//! ## Quick Start
//!
//! ```no_run
//! use asn_lookup::{format_report, lookup};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let report = lookup("8.8.8.8").await?;
//!     print!("{}", format_report(&report));
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod core;
pub mod services;

pub use crate::core::{
    AddressPreference, AsnLookupError, AsnRecord, AsnSource, HostResolver, LookupReport,
    ResolvedAddress, SystemResolver, Target, asn_lookup, classify, format_report,
    format_report_json, resolve_target, run_lookup,
};
pub use services::RegistryClient;

/// Look up the ASN for an IP address or domain name with default settings
///
/// # Examples
///
/// ```no_run
/// use asn_lookup::lookup;
///
/// #[tokio::main]
/// async fn main() -> anyhow::Result<()> {
///     let report = lookup("example.com").await?;
///     println!("AS{} ({})", report.record.asn, report.record.asn_cidr);
///     Ok(())
/// }
/// ```
pub async fn lookup(input: &str) -> Result<LookupReport, AsnLookupError> {
    run_lookup(
        input,
        &SystemResolver,
        &RegistryClient::default(),
        AddressPreference::Any,
    )
    .await
}
