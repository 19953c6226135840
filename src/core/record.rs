//! Lookup result types

use chrono::NaiveDate;
use serde::Serialize;

use crate::core::query::ResolvedAddress;

/// ASN and allocation data for one address
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AsnRecord {
    pub asn: u32,
    /// Further origin ASes announcing the same prefix
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub other_origins: Vec<u32>,
    pub asn_cidr: String,
    pub asn_country_code: Option<String>,
    pub asn_registry: Option<String>,
    pub asn_description: Option<String>,
    pub asn_date: Option<NaiveDate>,
    pub network: Option<NetworkDetails>,
}

/// RDAP IP network object, flattened to display strings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NetworkDetails {
    pub name: Option<String>,
    pub handle: Option<String>,
    pub start_address: Option<String>,
    pub end_address: Option<String>,
    pub ip_version: Option<String>,
    pub network_type: Option<String>,
    pub country: Option<String>,
    pub status: Vec<String>,
    pub events: Vec<NetworkEvent>,
    pub entities: Vec<NetworkEntity>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetworkEvent {
    pub action: String,
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetworkEntity {
    pub handle: Option<String>,
    pub roles: Vec<String>,
    pub name: Option<String>,
}

/// Everything one invocation produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LookupReport {
    pub input: String,
    pub address: ResolvedAddress,
    pub record: AsnRecord,
}
