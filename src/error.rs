// Error types for handshake probing
//
// The probing core reports failures as a closed set of typed outcomes so the
// discovery loop can tell a dead endpoint apart from an exhausted offer set.
// Application layers (CLI, registry loading, reporting) keep using anyhow.

use std::io;
use std::net::SocketAddr;
use std::time::Duration;
use thiserror::Error;

/// Coarse classification of a [`ProbeError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Connection never established, or severed before any data came back
    Connection,
    /// Response record header missing or of the wrong type
    Framing,
    /// Response body shorter than its own offsets require
    Malformed,
    /// Caller violated a precondition
    Usage,
}

/// Failure of a single handshake attempt or of a probing operation
#[derive(Debug, Error)]
pub enum ProbeError {
    /// Connection refused by the remote host
    #[error("Connection refused by {addr}")]
    ConnectionRefused { addr: SocketAddr },

    /// TCP connect did not complete in time
    #[error("Connection timeout after {duration:?} to {addr}")]
    ConnectionTimeout { duration: Duration, addr: SocketAddr },

    /// Any other I/O failure while connecting or sending the request
    #[error("Connection to {addr} failed: {source}")]
    Connect {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    /// Server accepted the connection but never answered in time
    #[error("No response from {addr} within {duration:?}")]
    Timeout { duration: Duration, addr: SocketAddr },

    /// Server closed the connection before a full record arrived
    #[error("Connection closed by server after {received} of {expected} bytes")]
    PrematureClose { received: usize, expected: usize },

    /// Server answered with something other than a handshake record
    #[error("Unexpected record type from server: {0}")]
    UnexpectedRecordType(u8),

    /// ServerHello body too short for the field being read
    #[error("Malformed ServerHello: {details}")]
    MalformedMessage { details: String },

    /// Invalid arguments passed to a probing operation
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },
}

impl ProbeError {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            ProbeError::ConnectionRefused { .. }
            | ProbeError::ConnectionTimeout { .. }
            | ProbeError::Connect { .. }
            | ProbeError::Timeout { .. } => ErrorKind::Connection,
            ProbeError::PrematureClose { .. } | ProbeError::UnexpectedRecordType(_) => {
                ErrorKind::Framing
            }
            ProbeError::MalformedMessage { .. } => ErrorKind::Malformed,
            ProbeError::InvalidInput { .. } => ErrorKind::Usage,
        }
    }

    /// Whether the endpoint itself is unusable, as opposed to having
    /// rejected one particular offer
    pub fn is_connection_level(&self) -> bool {
        self.kind() == ErrorKind::Connection
    }

    /// Map an I/O error raised while connecting or writing
    pub fn from_connect(addr: SocketAddr, source: io::Error) -> Self {
        match source.kind() {
            io::ErrorKind::ConnectionRefused => ProbeError::ConnectionRefused { addr },
            _ => ProbeError::Connect { addr, source },
        }
    }

    pub(crate) fn malformed(details: impl Into<String>) -> Self {
        ProbeError::MalformedMessage {
            details: details.into(),
        }
    }

    pub(crate) fn invalid_input(message: impl Into<String>) -> Self {
        ProbeError::InvalidInput {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{IpAddr, Ipv4Addr};

    fn addr() -> SocketAddr {
        SocketAddr::new(IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)), 443)
    }

    #[test]
    fn test_connection_timeout_error() {
        let err = ProbeError::ConnectionTimeout {
            duration: Duration::from_secs(5),
            addr: addr(),
        };

        let msg = err.to_string();
        assert!(msg.contains("timeout"));
        assert!(msg.contains("127.0.0.1:443"));
        assert!(err.is_connection_level());
    }

    #[test]
    fn test_refused_is_mapped_from_io() {
        let io_err = io::Error::new(io::ErrorKind::ConnectionRefused, "refused");
        let err = ProbeError::from_connect(addr(), io_err);

        assert!(matches!(err, ProbeError::ConnectionRefused { .. }));
        assert_eq!(err.kind(), ErrorKind::Connection);
    }

    #[test]
    fn test_other_io_keeps_source() {
        use std::error::Error;

        let io_err = io::Error::new(io::ErrorKind::HostUnreachable, "no route");
        let err = ProbeError::from_connect(addr(), io_err);

        assert!(matches!(err, ProbeError::Connect { .. }));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_negotiation_errors_are_not_connection_level() {
        assert_eq!(
            ProbeError::UnexpectedRecordType(21).kind(),
            ErrorKind::Framing
        );
        assert_eq!(
            ProbeError::PrematureClose {
                received: 0,
                expected: 5
            }
            .kind(),
            ErrorKind::Framing
        );
        assert_eq!(ProbeError::malformed("short").kind(), ErrorKind::Malformed);
        assert!(!ProbeError::UnexpectedRecordType(21).is_connection_level());
        assert!(!ProbeError::invalid_input("empty").is_connection_level());
    }

    #[test]
    fn test_record_type_in_message() {
        let msg = ProbeError::UnexpectedRecordType(21).to_string();
        assert!(msg.contains("21"));
    }
}
