// CipherOrder - Cipher suite discovery and preference order detection
// Copyright (C) 2025 Marc Rivero (@seifreed)
// Licensed under GPL-3.0
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, version 3.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU General Public License for more details.

use anyhow::{Context, Result};
use cipherorder::output::{json, terminal::ReportFormatter};
use cipherorder::protocols::client::HandshakeClient;
use cipherorder::scanner::ProbeConfig;
use cipherorder::utils::network::Target;
use cipherorder::{Args, Registry, Scanner};
use clap::Parser;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging - respect RUST_LOG environment variable
    let log_level = std::env::var("RUST_LOG")
        .ok()
        .and_then(|s| s.parse::<Level>().ok())
        .unwrap_or(Level::INFO);

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    // Parse command line arguments
    let args = Args::parse();
    args.validate()?;

    if args.output.no_color {
        colored::control::set_override(false);
    }

    // Build the registry the report resolves names from
    let mut registry = Registry::builtin()?;
    if let Some(path) = &args.scan.suites_csv {
        registry = registry.with_suites_file(path)?;
    }
    if let Some(path) = &args.scan.curves_csv {
        registry = registry.with_curves_file(path)?;
    }
    info!(
        "Registry: {} cipher suites, {} groups",
        registry.suite_count(),
        registry.curve_count()
    );

    // Resolve target
    let target_str = args
        .target
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("No target specified"))?;
    let mut target = Target::parse(target_str).await?;
    if let Some(port) = args.port {
        target = target.with_port(port);
    }
    let addr = target
        .primary_addr()
        .ok_or_else(|| anyhow::anyhow!("No address to probe for {}", target.hostname))?;

    info!("Probing {} ({})", target.hostname, addr);

    let config = ProbeConfig::from_args(&args);
    let client = HandshakeClient::new(addr)
        .with_connect_timeout(config.connect_timeout)
        .with_read_timeout(config.read_timeout);

    let report = Scanner::new(&client, config, &registry)
        .with_target(format!("{}:{}", target.hostname, target.port))
        .run()
        .await;

    if !args.output.quiet {
        ReportFormatter::new(&registry)
            .with_ids(args.output.show_ids)
            .display(&report);
    }

    if let Some(path) = &args.output.json {
        json::write_json_file(&report, &registry, path, args.output.json_pretty)?;
        info!("JSON report written to {}", path.display());
    }

    Ok(())
}
