// Registry - Maps cipher suite and named group ids to their IANA names
//
// A registry is an explicit, read-only value handed to the scanner and the
// report writers. The built-in tables are the IANA "TLS Parameters" CSV
// exports embedded at build time (tls-parameters-4.csv for cipher suites,
// tls-parameters-8.csv for supported groups); either can be replaced by a
// newer export on disk.

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use crate::ciphers::hex_id;

/// IANA cipher suite registry export
const IANA_SUITES_CSV: &str = include_str!("../../data/tls-parameters-4.csv");

/// IANA supported groups registry export
const IANA_GROUPS_CSV: &str = include_str!("../../data/tls-parameters-8.csv");

/// Signalling values share the suite registry but are not key exchange
/// choices. TLS_FALLBACK_SCSV in particular makes a server abort any
/// version below its maximum.
const SCSV_SUFFIX: &str = "_SCSV";

/// Read-only id to name lookup for cipher suites and named groups
#[derive(Debug, Clone, Default)]
pub struct Registry {
    suites: BTreeMap<u16, String>,
    curves: BTreeMap<u16, String>,
}

impl Registry {
    /// Registry with the embedded IANA tables
    pub fn builtin() -> Result<Self> {
        Self::default()
            .with_suites_csv(IANA_SUITES_CSV.as_bytes())
            .context("Failed to parse embedded cipher suite registry")?
            .with_curves_csv(IANA_GROUPS_CSV.as_bytes())
            .context("Failed to parse embedded group registry")
    }

    /// Replace the cipher suite table with an IANA tls-parameters-4 export
    pub fn with_suites_csv<R: Read>(mut self, reader: R) -> Result<Self> {
        self.suites = parse_iana_csv(reader, parse_suite_value)?;
        Ok(self)
    }

    /// Replace the named group table with an IANA tls-parameters-8 export
    pub fn with_curves_csv<R: Read>(mut self, reader: R) -> Result<Self> {
        self.curves = parse_iana_csv(reader, parse_group_value)?;
        Ok(self)
    }

    /// Load the cipher suite table from a file
    pub fn with_suites_file(self, path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)
            .with_context(|| format!("Failed to open cipher suite registry {}", path.display()))?;
        self.with_suites_csv(file)
            .with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Load the named group table from a file
    pub fn with_curves_file(self, path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)
            .with_context(|| format!("Failed to open group registry {}", path.display()))?;
        self.with_curves_csv(file)
            .with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn suite_name(&self, id: u16) -> Option<&str> {
        self.suites.get(&id).map(String::as_str)
    }

    pub fn curve_name(&self, id: u16) -> Option<&str> {
        self.curves.get(&id).map(String::as_str)
    }

    /// Name of a cipher suite, or its hex id when unknown
    pub fn describe_suite(&self, id: u16) -> String {
        self.suite_name(id)
            .map(str::to_string)
            .unwrap_or_else(|| hex_id(id))
    }

    /// All known cipher suite ids, ascending
    pub fn suite_ids(&self) -> Vec<u16> {
        self.suites.keys().copied().collect()
    }

    /// Suite ids worth offering in a ClientHello, ascending.
    ///
    /// Same as [`Registry::suite_ids`] minus the signalling cipher suite
    /// values.
    pub fn candidate_suite_ids(&self) -> Vec<u16> {
        self.suites
            .iter()
            .filter(|(_, name)| !name.ends_with(SCSV_SUFFIX))
            .map(|(id, _)| *id)
            .collect()
    }

    /// All known named group ids, ascending
    pub fn curve_ids(&self) -> Vec<u16> {
        self.curves.keys().copied().collect()
    }

    pub fn suite_count(&self) -> usize {
        self.suites.len()
    }

    pub fn curve_count(&self) -> usize {
        self.curves.len()
    }
}

/// Parse an IANA registry export: `Value,Description,...` with a header row.
///
/// Ranges, unassigned, reserved and "arbitrary" rows are skipped.
fn parse_iana_csv<R, F>(reader: R, parse_value: F) -> Result<BTreeMap<u16, String>>
where
    R: Read,
    F: Fn(&str) -> Option<u16>,
{
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let mut entries = BTreeMap::new();

    for record in csv_reader.records() {
        let record = record?;
        let (Some(value), Some(description)) = (record.get(0), record.get(1)) else {
            continue;
        };
        let value = value.trim();
        let description = description.trim();

        if value.contains('-')
            || description.is_empty()
            || description == "Unassigned"
            || description.starts_with("Reserved")
            || description.starts_with("arbitrary")
        {
            continue;
        }

        match parse_value(value) {
            Some(id) => {
                entries.insert(id, description.to_string());
            }
            None => tracing::debug!("Skipping registry row with value {:?}", value),
        }
    }

    Ok(entries)
}

/// "0xC0,0x2F" -> 0xC02F
fn parse_suite_value(value: &str) -> Option<u16> {
    let (msb, lsb) = value.split_once(',')?;
    let msb = u8::from_str_radix(msb.trim().trim_start_matches("0x").trim_start_matches("0X"), 16).ok()?;
    let lsb = u8::from_str_radix(lsb.trim().trim_start_matches("0x").trim_start_matches("0X"), 16).ok()?;
    Some(u16::from_be_bytes([msb, lsb]))
}

/// "23" or "0x0017" -> 23
fn parse_group_value(value: &str) -> Option<u16> {
    match value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
    {
        Some(hex) => u16::from_str_radix(hex, 16).ok(),
        None => value.parse().ok(),
    }
}
