// CipherOrder - Cipher suite discovery and preference order detection
// Copyright (C) 2025 Marc Rivero (@seifreed)
// Licensed under GPL-3.0

//! CipherOrder probes a TLS/SSL endpoint with bare ClientHello messages to
//! find every cipher suite it accepts for each protocol version, in the
//! order the server hands them out, and whether the server or the client
//! ordering decides the negotiated suite. No handshake is ever completed.

pub mod ciphers;
pub mod cli;
pub mod data;
pub mod error;
pub mod output;
pub mod protocols;
pub mod scanner;
pub mod utils;

// Re-export commonly used types
pub use crate::cli::Args;
pub use crate::data::Registry;
pub use crate::error::ProbeError;
pub use crate::scanner::Scanner;

/// Result type for CipherOrder operations
pub type Result<T> = anyhow::Result<T>;

/// Error type for CipherOrder operations
pub use anyhow::Error;
