// ASN Lookup - Command Line Entry Point
// Copyright (C) 2025 Akaere Networks
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use asn_lookup::config::{Cli, PROMPT};
use asn_lookup::core::logger::init_from_args;
use asn_lookup::{
    RegistryClient, SystemResolver, format_report, format_report_json, log_debug, log_error, run_lookup,
};

#[tokio::main]
async fn main() -> ExitCode {
    let args = Cli::parse();

    if let Err(e) = init_from_args(args.debug) {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    let input = match &args.target {
        Some(target) => target.clone(),
        None => match prompt_for_target() {
            Ok(target) => target,
            Err(e) => {
                log_error!("{:#}", e);
                return ExitCode::FAILURE;
            }
        },
    };

    let source = RegistryClient::new(
        args.whois_server.as_str(),
        args.whois_port,
        Duration::from_secs(args.timeout),
    )
    .with_network_details(!args.no_network);

    let report = match run_lookup(&input, &SystemResolver, &source, args.address_preference()).await {
        Ok(report) => report,
        Err(e) => {
            log_debug!("Lookup failed at the {} stage", e.stage());
            eprintln!("Error: {}", e);
            return ExitCode::from(e.exit_code());
        }
    };

    if args.json {
        match format_report_json(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                log_error!("Failed to encode report: {:#}", e);
                return ExitCode::FAILURE;
            }
        }
    } else {
        print!("{}", format_report(&report));
    }

    ExitCode::SUCCESS
}

/// Ask for the target on stdin when none was given on the command line
fn prompt_for_target() -> Result<String> {
    let mut stdout = io::stdout();
    stdout.write_all(PROMPT.as_bytes()).context("Failed to write prompt")?;
    stdout.flush().context("Failed to write prompt")?;

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read target from stdin")?;

    Ok(line.trim().to_string())
}
