// Terminal output - Human readable report per protocol version

use crate::ciphers::{OrderingVerdict, StopReason, hex_id};
use crate::data::Registry;
use crate::scanner::{ScanReport, VersionReport, VersionStatus};
use colored::*;
use std::fmt::Write;

/// Renders a [`ScanReport`] for the terminal, resolving ids via a registry
pub struct ReportFormatter<'a> {
    registry: &'a Registry,
    show_ids: bool,
}

impl<'a> ReportFormatter<'a> {
    pub fn new(registry: &'a Registry) -> Self {
        Self {
            registry,
            show_ids: false,
        }
    }

    /// Print hex ids next to suite names
    pub fn with_ids(mut self, show_ids: bool) -> Self {
        self.show_ids = show_ids;
        self
    }

    /// Print the report to stdout
    pub fn display(&self, report: &ScanReport) {
        print!("{}", self.render(report));
    }

    /// Render the whole report
    pub fn render(&self, report: &ScanReport) -> String {
        let mut out = String::new();

        let _ = writeln!(out, "\n{}", "=".repeat(60).cyan());
        let _ = writeln!(out, "{}", "Cipher Suite Order".cyan().bold());
        let _ = writeln!(out, "{}", "=".repeat(60).cyan());
        let _ = writeln!(out, "Target:          {}", report.target.green());
        let _ = writeln!(out, "Scan Time:       {} ms", report.scan_time_ms);

        for version in &report.versions {
            self.render_version(&mut out, version);
        }

        out
    }

    fn render_version(&self, out: &mut String, report: &VersionReport) {
        let _ = writeln!(out, "\n{}", report.version.to_string().cyan().bold());
        let _ = writeln!(out, "{}", "-".repeat(50));

        match &report.status {
            VersionStatus::Unsupported => {
                let _ = writeln!(out, "  {}", "Not supported".yellow());
                return;
            }
            VersionStatus::Failed(reason) => {
                let _ = writeln!(out, "  {} {}", "Probe failed:".red().bold(), reason.red());
                return;
            }
            VersionStatus::Supported => {}
        }

        match report.verdict {
            Some(OrderingVerdict::ServerPreference) => {
                let _ = writeln!(
                    out,
                    "  {} Server uses server ordering for cipher suites",
                    "Y".green()
                );
            }
            Some(OrderingVerdict::ClientPreference) => {
                let _ = writeln!(
                    out,
                    "  {} Server uses client ordering for cipher suites",
                    "!".yellow()
                );
            }
            None => {
                let reason = report.verdict_error.as_deref().unwrap_or("no answer");
                let _ = writeln!(
                    out,
                    "  {} Ordering unknown ({})",
                    "?".yellow(),
                    reason.dimmed()
                );
            }
        }

        if let Some(note) = stop_note(report.stop.as_ref()) {
            let _ = writeln!(out, "  {} {}", "!".yellow(), note.yellow());
        }

        let _ = writeln!(out, "\n  Supported suites ({}):", report.suites.len());
        for (rank, id) in report.suites.iter().enumerate() {
            let _ = writeln!(out, "    {:>3}. {}", rank + 1, self.suite_label(*id));
        }
    }

    fn suite_label(&self, id: u16) -> String {
        match self.registry.suite_name(id) {
            Some(name) if self.show_ids => {
                format!("{} {}", name, format!("({})", hex_id(id)).dimmed())
            }
            Some(name) => name.to_string(),
            None => hex_id(id),
        }
    }
}

/// Explain an incomplete list
fn stop_note(stop: Option<&StopReason>) -> Option<String> {
    match stop? {
        StopReason::Interrupted(reason) => {
            Some(format!("List may be incomplete, connection lost: {}", reason))
        }
        StopReason::ProtocolViolation(id) => Some(format!(
            "List may be incomplete, server chose {} which was not offered",
            hex_id(*id)
        )),
        StopReason::Exhausted | StopReason::Rejected(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocols::ProtocolVersion;

    fn supported(suites: Vec<u16>, verdict: OrderingVerdict) -> VersionReport {
        VersionReport {
            version: ProtocolVersion::TLS12,
            status: VersionStatus::Supported,
            suites,
            stop: Some(StopReason::Rejected("alert".to_string())),
            verdict: Some(verdict),
            verdict_error: None,
        }
    }

    #[test]
    fn test_render_supported_version() {
        let registry = Registry::builtin().unwrap();
        let report = ScanReport {
            target: "example.com:443".to_string(),
            scan_time_ms: 12,
            versions: vec![supported(
                vec![0xc02f, 0x0a0a],
                OrderingVerdict::ServerPreference,
            )],
        };

        let text = ReportFormatter::new(&registry).render(&report);

        assert!(text.contains("example.com:443"));
        assert!(text.contains("TLS 1.2"));
        assert!(text.contains("server ordering"));
        assert!(text.contains("TLS_ECDHE_RSA_WITH_AES_128_GCM_SHA256"));
        // Unknown ids are shown, not dropped
        assert!(text.contains("0x0A0A"));
        assert!(!text.contains("incomplete"));
    }

    #[test]
    fn test_render_unsupported_and_failed() {
        let registry = Registry::builtin().unwrap();
        let report = ScanReport {
            target: "example.com:443".to_string(),
            scan_time_ms: 0,
            versions: vec![
                VersionReport {
                    version: ProtocolVersion::SSL3,
                    status: VersionStatus::Unsupported,
                    suites: vec![],
                    stop: Some(StopReason::Rejected("alert".to_string())),
                    verdict: None,
                    verdict_error: None,
                },
                VersionReport {
                    version: ProtocolVersion::TLS10,
                    status: VersionStatus::Failed("Connection refused".to_string()),
                    suites: vec![],
                    stop: None,
                    verdict: None,
                    verdict_error: None,
                },
            ],
        };

        let text = ReportFormatter::new(&registry).render(&report);
        assert!(text.contains("Not supported"));
        assert!(text.contains("Connection refused"));
    }

    #[test]
    fn test_render_interrupted_round() {
        let registry = Registry::builtin().unwrap();
        let mut version = supported(vec![0x002f], OrderingVerdict::ClientPreference);
        version.stop = Some(StopReason::Interrupted("reset".to_string()));

        let report = ScanReport {
            versions: vec![version],
            ..Default::default()
        };

        let text = ReportFormatter::new(&registry).with_ids(true).render(&report);
        assert!(text.contains("client ordering"));
        assert!(text.contains("incomplete"));
        assert!(text.contains("0x002F"));
    }
}
