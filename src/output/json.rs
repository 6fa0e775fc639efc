// JSON Output Module

use crate::Result;
use crate::ciphers::{OrderingVerdict, StopReason, hex_id};
use crate::data::Registry;
use crate::scanner::{ScanReport, VersionStatus};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    target: &'a str,
    scan_time_ms: u64,
    versions: Vec<JsonVersion<'a>>,
}

#[derive(Debug, Serialize)]
struct JsonVersion<'a> {
    version: String,
    #[serde(flatten)]
    status: &'a VersionStatus,
    ordering: Option<OrderingVerdict>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ordering_error: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stop: Option<&'a StopReason>,
    suites: Vec<JsonSuite<'a>>,
}

#[derive(Debug, Serialize)]
struct JsonSuite<'a> {
    id: String,
    name: Option<&'a str>,
}

/// Generate JSON output, resolving suite names through `registry`
pub fn generate_json(report: &ScanReport, registry: &Registry, pretty: bool) -> Result<String> {
    let view = JsonReport {
        target: &report.target,
        scan_time_ms: report.scan_time_ms,
        versions: report
            .versions
            .iter()
            .map(|v| JsonVersion {
                version: v.version.to_string(),
                status: &v.status,
                ordering: v.verdict,
                ordering_error: v.verdict_error.as_deref(),
                stop: v.stop.as_ref(),
                suites: v
                    .suites
                    .iter()
                    .map(|id| JsonSuite {
                        id: hex_id(*id),
                        name: registry.suite_name(*id),
                    })
                    .collect(),
            })
            .collect(),
    };

    if pretty {
        Ok(serde_json::to_string_pretty(&view)?)
    } else {
        Ok(serde_json::to_string(&view)?)
    }
}

/// Write JSON to file
pub fn write_json_file(
    report: &ScanReport,
    registry: &Registry,
    path: &std::path::Path,
    pretty: bool,
) -> Result<()> {
    let json = generate_json(report, registry, pretty)?;
    std::fs::write(path, json)?;
    Ok(())
}
