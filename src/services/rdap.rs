use std::net::IpAddr;

use anyhow::{Result, anyhow, bail};
use rdap::{RdapClient, RdapObject, RdapRequest};

use crate::core::record::{NetworkDetails, NetworkEntity, NetworkEvent};
use crate::log_debug;

/// Fetch the RDAP IP network object covering `ip`
pub async fn query_network(ip: IpAddr) -> Result<NetworkDetails> {
    let query = ip.to_string();
    log_debug!("Processing RDAP query: {}", query);

    let client = RdapClient::new().map_err(|e| anyhow!("Failed to create RDAP client: {}", e))?;

    let query_type = RdapRequest::detect_type(&query)
        .map_err(|e| anyhow!("Unable to detect RDAP query type for {}: {}", query, e))?;
    log_debug!("Detected RDAP query type: {:?}", query_type);

    let request = RdapRequest::new(query_type, &query);
    let result = client
        .query(&request)
        .await
        .map_err(|e| anyhow!("RDAP query failed for {}: {}", query, e))?;

    network_details(&result)
}

fn network_details(result: &RdapObject) -> Result<NetworkDetails> {
    match result {
        RdapObject::IpNetwork(network) => Ok(NetworkDetails {
            name: network.name.as_ref().map(|v| v.to_string()),
            handle: network.handle.as_ref().map(|v| v.to_string()),
            start_address: network.start_address.as_ref().map(|v| v.to_string()),
            end_address: network.end_address.as_ref().map(|v| v.to_string()),
            ip_version: network.ip_version.as_ref().map(|v| format!("v{}", v)),
            network_type: network.network_type.as_ref().map(|v| v.to_string()),
            country: network.country.as_ref().map(|v| v.to_string()),
            status: network.status.iter().map(|s| s.to_string()).collect(),
            events: network
                .events
                .iter()
                .map(|event| NetworkEvent {
                    action: event.action.to_string(),
                    date: event.date.to_string(),
                })
                .collect(),
            entities: network.entities.iter().map(entity_summary).collect(),
        }),

        RdapObject::Error(err) => {
            let mut message = String::from("RDAP error response");
            if let Some(code) = err.error_code {
                message.push_str(&format!(" {}", code));
            }
            if let Some(title) = &err.title {
                message.push_str(&format!(": {}", title));
            }
            if !err.description.is_empty() {
                let description: Vec<String> = err.description.iter().map(|d| d.to_string()).collect();
                message.push_str(&format!(" ({})", description.join(" ")));
            }
            Err(anyhow!(message))
        }

        _ => bail!("RDAP response is not an IP network object"),
    }
}

fn entity_summary(entity: &rdap::Entity) -> NetworkEntity {
    NetworkEntity {
        handle: entity.handle.as_ref().map(|h| h.to_string()),
        roles: entity
            .roles
            .iter()
            .map(|role| format!("{:?}", role).to_lowercase())
            .collect(),
        name: entity
            .vcard
            .as_ref()
            .and_then(|vcard| vcard.name())
            .map(|name| name.to_string()),
    }
}
