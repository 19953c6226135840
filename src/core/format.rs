//! Human-readable and JSON rendering of a [`LookupReport`]

use anyhow::Result;

use crate::core::record::{LookupReport, NetworkDetails};

const NOT_AVAILABLE: &str = "N/A";

fn or_na(value: Option<&str>) -> &str {
    value.unwrap_or(NOT_AVAILABLE)
}

pub fn format_report(report: &LookupReport) -> String {
    let mut output = String::new();
    let ip = report.address.ip;
    let record = &report.record;

    if let Some(domain) = &report.address.domain {
        output.push_str(&format!("IP address for {} is {}\n\n", domain, ip));
    }

    output.push_str(&format!("ASN Information for {}:\n\n", ip));
    output.push_str(&format!("ASN: {}\n", record.asn));
    if !record.other_origins.is_empty() {
        let others: Vec<String> = record.other_origins.iter().map(|asn| asn.to_string()).collect();
        output.push_str(&format!("ASN Other Origins: {}\n", others.join(", ")));
    }
    output.push_str(&format!("ASN CIDR: {}\n", record.asn_cidr));
    output.push_str(&format!("ASN Country Code: {}\n", or_na(record.asn_country_code.as_deref())));
    output.push_str(&format!("ASN Registry: {}\n", or_na(record.asn_registry.as_deref())));
    output.push_str(&format!("ASN Description: {}\n", or_na(record.asn_description.as_deref())));
    let date = record.asn_date.map(|d| d.format("%Y-%m-%d").to_string());
    output.push_str(&format!("ASN Allocation Date: {}\n", or_na(date.as_deref())));

    if let Some(network) = &record.network {
        format_network(&mut output, network);
    }

    output
}

fn format_network(output: &mut String, network: &NetworkDetails) {
    output.push_str("\nNetwork Details:\n");
    output.push_str(&format!("Network Name: {}\n", or_na(network.name.as_deref())));
    output.push_str(&format!("Network Handle: {}\n", or_na(network.handle.as_deref())));
    output.push_str(&format!("Network Start IP: {}\n", or_na(network.start_address.as_deref())));
    output.push_str(&format!("Network End IP: {}\n", or_na(network.end_address.as_deref())));
    output.push_str(&format!("Network IP Version: {}\n", or_na(network.ip_version.as_deref())));
    output.push_str(&format!("Network Country: {}\n", or_na(network.country.as_deref())));
    output.push_str(&format!("Network Type: {}\n", or_na(network.network_type.as_deref())));
    if !network.status.is_empty() {
        output.push_str(&format!("Network Status: {}\n", network.status.join(", ")));
    }

    if !network.events.is_empty() {
        output.push_str("\nEvent History:\n");
        for event in &network.events {
            output.push_str(&format!("Event: {}, Date: {}\n", event.action, event.date));
        }
    }

    if !network.entities.is_empty() {
        output.push_str("\nContacts:\n");
        for entity in &network.entities {
            let roles = if entity.roles.is_empty() {
                NOT_AVAILABLE.to_string()
            } else {
                entity.roles.join(", ")
            };
            output.push_str(&format!(
                "Contact: {} ({}), Roles: {}\n",
                or_na(entity.name.as_deref()),
                or_na(entity.handle.as_deref()),
                roles
            ));
        }
    }
}

pub fn format_report_json(report: &LookupReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}
