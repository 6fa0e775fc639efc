// Scanner module - Sweeps protocol versions, discovering suites and ordering

pub mod config;

pub use config::ProbeConfig;

use crate::ciphers::{OrderDetector, OrderingVerdict, StopReason, SuiteEnumerator};
use crate::data::Registry;
use crate::protocols::ProtocolVersion;
use crate::protocols::client::Handshaker;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Outcome of probing one protocol version
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum VersionStatus {
    /// At least one suite was negotiated
    Supported,
    /// No suite was negotiated
    Unsupported,
    /// The endpoint could not be reached for this version
    Failed(String),
}

/// Result for one protocol version
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionReport {
    pub version: ProtocolVersion,
    pub status: VersionStatus,
    /// Accepted suites in the order the server yielded them
    pub suites: Vec<u16>,
    pub stop: Option<StopReason>,
    pub verdict: Option<OrderingVerdict>,
    /// Set when the ordering handshake itself failed
    pub verdict_error: Option<String>,
}

impl VersionReport {
    fn failed(version: ProtocolVersion, reason: String) -> Self {
        Self {
            version,
            status: VersionStatus::Failed(reason),
            suites: Vec::new(),
            stop: None,
            verdict: None,
            verdict_error: None,
        }
    }
}

/// Results of a full sweep
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanReport {
    pub target: String,
    pub scan_time_ms: u64,
    pub versions: Vec<VersionReport>,
}

impl ScanReport {
    pub fn supported_versions(&self) -> impl Iterator<Item = &VersionReport> {
        self.versions
            .iter()
            .filter(|v| v.status == VersionStatus::Supported)
    }
}

/// Main scanner: runs discovery and order detection for each version
pub struct Scanner<'a, H: Handshaker + ?Sized> {
    handshaker: &'a H,
    config: ProbeConfig,
    target: String,
    suites: Vec<u16>,
    curves: Vec<u16>,
}

impl<'a, H: Handshaker + ?Sized> Scanner<'a, H> {
    /// Candidates are every suite (and group) the registry knows about,
    /// signalling values excluded
    pub fn new(handshaker: &'a H, config: ProbeConfig, registry: &Registry) -> Self {
        let curves = if config.offer_curves {
            registry.curve_ids()
        } else {
            Vec::new()
        };

        Self {
            handshaker,
            config,
            target: String::new(),
            suites: registry.candidate_suite_ids(),
            curves,
        }
    }

    /// Label used for the report's target field
    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = target.into();
        self
    }

    /// Probe every configured version, in order
    pub async fn run(&self) -> ScanReport {
        let start = Instant::now();
        let mut versions = Vec::with_capacity(self.config.versions.len());

        for version in &self.config.versions {
            versions.push(self.probe_version(*version).await);
        }

        ScanReport {
            target: self.target.clone(),
            scan_time_ms: start.elapsed().as_millis() as u64,
            versions,
        }
    }

    /// Discover the accepted suites for one version and classify ordering
    pub async fn probe_version(&self, version: ProtocolVersion) -> VersionReport {
        tracing::info!(
            "Probing {} with {} cipher suites and {} groups",
            version,
            self.suites.len(),
            self.curves.len()
        );

        let discovery = match SuiteEnumerator::new(self.handshaker)
            .with_sleep(self.config.sleep)
            .discover(version, &self.suites, &self.curves)
            .await
        {
            Ok(discovery) => discovery,
            Err(e) => {
                tracing::warn!("{}: probe aborted: {}", version, e);
                return VersionReport::failed(version, e.to_string());
            }
        };

        if discovery.is_empty() {
            tracing::info!("{}: not supported", version);
            return VersionReport {
                version,
                status: VersionStatus::Unsupported,
                suites: Vec::new(),
                stop: Some(discovery.stop),
                verdict: None,
                verdict_error: None,
            };
        }

        if let Some(sleep_dur) = self.config.sleep {
            tokio::time::sleep(sleep_dur).await;
        }

        let (verdict, verdict_error) = match OrderDetector::new(self.handshaker)
            .classify(version, &discovery.suites, &self.curves)
            .await
        {
            Ok(verdict) => (Some(verdict), None),
            Err(e) => {
                tracing::warn!("{}: could not determine ordering: {}", version, e);
                (None, Some(e.to_string()))
            }
        };

        tracing::info!(
            "{}: {} suites accepted, {} ordering",
            version,
            discovery.suites.len(),
            verdict.map_or_else(|| "unknown".to_string(), |v| v.to_string())
        );

        VersionReport {
            version,
            status: VersionStatus::Supported,
            suites: discovery.suites,
            stop: Some(discovery.stop),
            verdict,
            verdict_error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProbeError;
    use async_trait::async_trait;

    /// Server supporting only TLS 1.2 with a fixed preference list
    struct PreferenceServer {
        preference: Vec<u16>,
    }

    #[async_trait]
    impl Handshaker for PreferenceServer {
        async fn hello(
            &self,
            version: ProtocolVersion,
            cipher_suites: &[u16],
            _curves: &[u16],
        ) -> Result<u16, ProbeError> {
            if version != ProtocolVersion::TLS12 {
                return Err(ProbeError::UnexpectedRecordType(0x15));
            }
            self.preference
                .iter()
                .copied()
                .find(|c| cipher_suites.contains(c))
                .ok_or(ProbeError::UnexpectedRecordType(0x15))
        }
    }

    /// Accepts one suite on every version, but aborts any version below
    /// TLS 1.2 when the client signals a fallback
    struct FallbackProtectedServer;

    #[async_trait]
    impl Handshaker for FallbackProtectedServer {
        async fn hello(
            &self,
            version: ProtocolVersion,
            cipher_suites: &[u16],
            _curves: &[u16],
        ) -> Result<u16, ProbeError> {
            if version < ProtocolVersion::TLS12 && cipher_suites.contains(&0x5600) {
                return Err(ProbeError::UnexpectedRecordType(0x15));
            }
            if cipher_suites.contains(&0x002f) {
                Ok(0x002f)
            } else {
                Err(ProbeError::UnexpectedRecordType(0x15))
            }
        }
    }

    struct Unreachable;

    #[async_trait]
    impl Handshaker for Unreachable {
        async fn hello(
            &self,
            _version: ProtocolVersion,
            _cipher_suites: &[u16],
            _curves: &[u16],
        ) -> Result<u16, ProbeError> {
            Err(ProbeError::ConnectionRefused {
                addr: "127.0.0.1:443".parse().unwrap(),
            })
        }
    }

    #[tokio::test]
    async fn test_sweep_reports_each_version() {
        let server = PreferenceServer {
            preference: vec![0xc030, 0xc02f, 0x009c],
        };
        let registry = Registry::builtin().unwrap();

        let report = Scanner::new(&server, ProbeConfig::default(), &registry)
            .with_target("example.com:443")
            .run()
            .await;

        assert_eq!(report.target, "example.com:443");
        assert_eq!(report.versions.len(), 4);

        let tls12 = &report.versions[3];
        assert_eq!(tls12.version, ProtocolVersion::TLS12);
        assert_eq!(tls12.status, VersionStatus::Supported);
        assert_eq!(tls12.suites, vec![0xc030, 0xc02f, 0x009c]);
        assert_eq!(tls12.verdict, Some(OrderingVerdict::ServerPreference));

        for older in &report.versions[..3] {
            assert_eq!(older.status, VersionStatus::Unsupported);
            assert!(older.verdict.is_none());
        }

        assert_eq!(report.supported_versions().count(), 1);
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_failure_not_unsupported() {
        let registry = Registry::builtin().unwrap();
        let config = ProbeConfig {
            versions: vec![ProtocolVersion::TLS12],
            ..Default::default()
        };

        let report = Scanner::new(&Unreachable, config, &registry).run().await;

        assert!(matches!(report.versions[0].status, VersionStatus::Failed(_)));
    }

    #[test]
    fn test_no_curves_when_disabled() {
        let registry = Registry::builtin().unwrap();
        let config = ProbeConfig {
            offer_curves: false,
            ..Default::default()
        };

        let scanner = Scanner::new(&Unreachable, config, &registry);
        assert!(scanner.curves.is_empty());
        assert_eq!(scanner.suites, registry.candidate_suite_ids());
    }

    #[tokio::test]
    async fn test_signalling_values_never_offered() {
        let csv = "\
Value,Description,DTLS-OK,Recommended,Reference
\"0x00,0x2F\",TLS_RSA_WITH_AES_128_CBC_SHA,Y,N,[RFC5246]
\"0x00,0xFF\",TLS_EMPTY_RENEGOTIATION_INFO_SCSV,Y,N,[RFC5746]
\"0x56,0x00\",TLS_FALLBACK_SCSV,Y,N,[RFC7507]
";
        let registry = Registry::default().with_suites_csv(csv.as_bytes()).unwrap();
        let config = ProbeConfig {
            versions: vec![ProtocolVersion::TLS10, ProtocolVersion::TLS12],
            offer_curves: false,
            ..Default::default()
        };

        let report = Scanner::new(&FallbackProtectedServer, config, &registry)
            .run()
            .await;

        for version in &report.versions {
            assert_eq!(version.status, VersionStatus::Supported);
            assert_eq!(version.suites, vec![0x002f]);
        }
    }

    #[tokio::test]
    async fn test_default_candidates_reach_uncommon_suites() {
        let server = PreferenceServer {
            preference: vec![0xc0a0, 0x00a0, 0x0007, 0xc02f],
        };
        let registry = Registry::builtin().unwrap();
        let config = ProbeConfig {
            versions: vec![ProtocolVersion::TLS12],
            ..Default::default()
        };

        let report = Scanner::new(&server, config, &registry).run().await;

        assert_eq!(report.versions[0].suites, vec![0xc0a0, 0x00a0, 0x0007, 0xc02f]);
    }
}
