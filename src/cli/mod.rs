// CLI module - Command line interface and argument parsing
// Copyright (C) 2025 Marc Rivero (@seifreed)
// Licensed under GPL-3.0

use clap::Parser;

// Sub-modules for organized CLI arguments
mod connection_args;
mod output_args;
mod scan_args;

// Re-export sub-structs
pub use connection_args::ConnectionArgs;
pub use output_args::OutputArgs;
pub use scan_args::ScanArgs;

use crate::protocols::ProtocolVersion;

/// CipherOrder - discovers which cipher suites a TLS endpoint accepts and
/// whether the server or the client decides among them
#[derive(Parser, Debug, Clone, Default)]
#[command(author, version, long_about = None)]
#[command(name = "cipherorder")]
#[command(about = "Enumerates accepted cipher suites and server preference order", long_about = None)]
pub struct Args {
    // ============ Target Specification ============
    /// Target (host, host:port, [v6]:port or URL)
    #[arg(value_name = "URI")]
    pub target: Option<String>,

    /// Port to test (overrides the port in the target)
    #[arg(long = "port", short = 'p', value_name = "PORT")]
    pub port: Option<u16>,

    // ============ Scanning Options ============
    #[command(flatten)]
    pub scan: ScanArgs,

    // ============ Connection and Timeouts ============
    #[command(flatten)]
    pub connection: ConnectionArgs,

    // ============ Output Formats and Display ============
    #[command(flatten)]
    pub output: OutputArgs,
}

impl Args {
    /// Validate CLI arguments for logical consistency
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.target.is_none() {
            anyhow::bail!("No target specified");
        }

        if self.scan.no_curves && self.scan.curves_csv.is_some() {
            anyhow::bail!("Cannot use --no-curves together with --curves-csv");
        }

        if self.connection.connect_timeout == Some(0) || self.connection.socket_timeout == Some(0)
        {
            anyhow::bail!("Timeouts must be at least one second");
        }

        Ok(())
    }

    /// Get list of protocol versions to probe, oldest first
    pub fn protocols_to_test(&self) -> Vec<ProtocolVersion> {
        let mut protocols = Vec::new();
        if self.scan.ssl3 {
            protocols.push(ProtocolVersion::SSL3);
        }
        if self.scan.tls10 {
            protocols.push(ProtocolVersion::TLS10);
        }
        if self.scan.tls11 {
            protocols.push(ProtocolVersion::TLS11);
        }
        if self.scan.tls12 {
            protocols.push(ProtocolVersion::TLS12);
        }
        protocols.extend(self.scan.protocols.iter().copied());

        if protocols.is_empty() {
            return ProtocolVersion::all();
        }

        protocols.sort();
        protocols.dedup();
        protocols
    }
}
