// Connection and timeout configuration arguments
// Copyright (C) 2025 Marc Rivero (@seifreed)
// Licensed under GPL-3.0

use clap::Args;

/// Connection and timeout configuration options
///
/// Every handshake attempt opens its own connection; these bound how long a
/// single attempt may take and how long to wait between attempts.
#[derive(Args, Debug, Clone, Default)]
pub struct ConnectionArgs {
    /// Socket timeout in seconds (waiting for the ServerHello)
    #[arg(long = "socket-timeout", value_name = "SECONDS")]
    pub socket_timeout: Option<u64>,

    /// Connection timeout in seconds (separate from socket timeout)
    #[arg(long = "connect-timeout", value_name = "SECONDS")]
    pub connect_timeout: Option<u64>,

    /// Sleep between connection requests in milliseconds
    #[arg(long = "sleep", value_name = "MSEC")]
    pub sleep: Option<u64>,
}
