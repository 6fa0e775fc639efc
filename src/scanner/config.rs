//! Probe configuration extracted from CLI Args.
//!
//! The scanner only sees this struct, never the full Args.

use std::time::Duration;

use crate::protocols::ProtocolVersion;

/// Configuration for one probing run
#[derive(Debug, Clone)]
pub struct ProbeConfig {
    /// Versions to probe, in order
    pub versions: Vec<ProtocolVersion>,
    /// TCP connect deadline per attempt
    pub connect_timeout: Duration,
    /// Deadline for sending the ClientHello and reading the ServerHello
    pub read_timeout: Duration,
    /// Pause between consecutive attempts
    pub sleep: Option<Duration>,
    /// Offer named groups (supported_groups + ec_point_formats)
    pub offer_curves: bool,
}

impl ProbeConfig {
    const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
    const DEFAULT_SOCKET_TIMEOUT_SECS: u64 = 5;

    /// Create configuration from CLI Args
    pub fn from_args(args: &crate::cli::Args) -> Self {
        Self {
            versions: args.protocols_to_test(),
            connect_timeout: Duration::from_secs(
                args.connection
                    .connect_timeout
                    .unwrap_or(Self::DEFAULT_CONNECT_TIMEOUT_SECS),
            ),
            read_timeout: Duration::from_secs(
                args.connection
                    .socket_timeout
                    .unwrap_or(Self::DEFAULT_SOCKET_TIMEOUT_SECS),
            ),
            sleep: args.connection.sleep.map(Duration::from_millis),
            offer_curves: !args.scan.no_curves,
        }
    }
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            versions: ProtocolVersion::all(),
            connect_timeout: Duration::from_secs(Self::DEFAULT_CONNECT_TIMEOUT_SECS),
            read_timeout: Duration::from_secs(Self::DEFAULT_SOCKET_TIMEOUT_SECS),
            sleep: None,
            offer_curves: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_probe_config_defaults() {
        let args = crate::cli::Args::default();
        let config = ProbeConfig::from_args(&args);

        assert_eq!(config.versions, ProtocolVersion::all());
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
        assert_eq!(config.read_timeout, Duration::from_secs(5));
        assert!(config.sleep.is_none());
        assert!(config.offer_curves);
    }

    #[test]
    fn test_probe_config_from_flags() {
        let args = crate::cli::Args::try_parse_from([
            "cipherorder",
            "--tls11",
            "--connect-timeout",
            "3",
            "--socket-timeout",
            "2",
            "--sleep",
            "250",
            "--no-curves",
            "example.com",
        ])
        .unwrap();
        let config = ProbeConfig::from_args(&args);

        assert_eq!(config.versions, vec![ProtocolVersion::TLS11]);
        assert_eq!(config.connect_timeout, Duration::from_secs(3));
        assert_eq!(config.read_timeout, Duration::from_secs(2));
        assert_eq!(config.sleep, Some(Duration::from_millis(250)));
        assert!(!config.offer_curves);
    }
}
