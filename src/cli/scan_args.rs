// Scanning options
// Copyright (C) 2025 Marc Rivero (@seifreed)
// Licensed under GPL-3.0

use clap::Args;
use std::path::PathBuf;

use crate::protocols::ProtocolVersion;

/// Which versions to probe and which suites and groups to offer
#[derive(Args, Debug, Clone, Default)]
pub struct ScanArgs {
    /// Test SSLv3
    #[arg(long = "ssl3")]
    pub ssl3: bool,

    /// Test TLS 1.0
    #[arg(long = "tls10")]
    pub tls10: bool,

    /// Test TLS 1.1
    #[arg(long = "tls11")]
    pub tls11: bool,

    /// Test TLS 1.2
    #[arg(long = "tls12")]
    pub tls12: bool,

    /// Comma separated protocol versions (e.g. "TLSv1.2,3.1")
    #[arg(long = "protocols", value_name = "LIST", value_delimiter = ',')]
    pub protocols: Vec<ProtocolVersion>,

    /// IANA cipher suite registry export (tls-parameters-4.csv)
    #[arg(long = "suites-csv", value_name = "FILE")]
    pub suites_csv: Option<PathBuf>,

    /// IANA supported groups registry export (tls-parameters-8.csv)
    #[arg(long = "curves-csv", value_name = "FILE")]
    pub curves_csv: Option<PathBuf>,

    /// Do not send supported_groups / ec_point_formats extensions
    #[arg(long = "no-curves")]
    pub no_curves: bool,
}
