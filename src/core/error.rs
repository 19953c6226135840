// ASN Lookup - Error Taxonomy
// Copyright (C) 2025 Akaere Networks
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Terminal failures of a single lookup
//!
//! Every failure belongs to exactly one stage of the pipeline, and each stage
//! maps to a fixed process exit code (sysexits.h values).

use std::net::IpAddr;

pub const EXIT_INVALID_INPUT: u8 = 65; // EX_DATAERR
pub const EXIT_RESOLUTION: u8 = 68; // EX_NOHOST
pub const EXIT_LOOKUP: u8 = 69; // EX_UNAVAILABLE

#[derive(Debug, thiserror::Error)]
pub enum AsnLookupError {
    /// Input is neither an IP literal nor a hostname
    #[error("invalid input '{input}': {reason}")]
    InvalidInput { input: String, reason: String },

    /// Input looked like a hostname but did not resolve
    #[error("failed to resolve '{input}': {source}")]
    Resolution {
        input: String,
        #[source]
        source: std::io::Error,
    },

    /// The ASN query for a valid address failed
    #[error("ASN lookup failed for {ip}: {cause:#}")]
    Lookup { ip: IpAddr, cause: anyhow::Error },
}

impl AsnLookupError {
    pub fn invalid_input(input: &str, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            input: input.to_string(),
            reason: reason.into(),
        }
    }

    pub fn stage(&self) -> &'static str {
        match self {
            Self::InvalidInput { .. } => "input",
            Self::Resolution { .. } => "resolution",
            Self::Lookup { .. } => "lookup",
        }
    }

    pub fn exit_code(&self) -> u8 {
        match self {
            Self::InvalidInput { .. } => EXIT_INVALID_INPUT,
            Self::Resolution { .. } => EXIT_RESOLUTION,
            Self::Lookup { .. } => EXIT_LOOKUP,
        }
    }
}
