// Output format configuration arguments
// Copyright (C) 2025 Marc Rivero (@seifreed)
// Licensed under GPL-3.0

use clap::Args;
use std::path::PathBuf;

/// Output format and display options
#[derive(Args, Debug, Clone, Default)]
pub struct OutputArgs {
    /// Output to JSON file
    #[arg(long = "json", value_name = "FILE", id = "output_json")]
    pub json: Option<PathBuf>,

    /// Pretty print JSON output
    #[arg(long = "json-pretty")]
    pub json_pretty: bool,

    /// Print cipher suite ids instead of names
    #[arg(long = "show-ids")]
    pub show_ids: bool,

    /// Disable colored output
    #[arg(long = "no-color")]
    pub no_color: bool,

    /// Quiet mode (no terminal report)
    #[arg(short = 'q', long = "quiet")]
    pub quiet: bool,
}
