// Protocols module - SSL/TLS version definitions and the ClientHello exchange

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// TLS record content type for handshake messages
pub const CONTENT_TYPE_HANDSHAKE: u8 = 0x16;

/// Handshake message type of a ClientHello
pub const HANDSHAKE_CLIENT_HELLO: u8 = 0x01;

/// Length of a TLS record header (type + version + length)
pub const RECORD_HEADER_LEN: usize = 5;

/// SSL/TLS protocol version as carried on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProtocolVersion {
    pub major: u8,
    pub minor: u8,
}

impl ProtocolVersion {
    pub const SSL3: ProtocolVersion = ProtocolVersion::new(3, 0);
    pub const TLS10: ProtocolVersion = ProtocolVersion::new(3, 1);
    pub const TLS11: ProtocolVersion = ProtocolVersion::new(3, 2);
    pub const TLS12: ProtocolVersion = ProtocolVersion::new(3, 3);

    pub const fn new(major: u8, minor: u8) -> Self {
        Self { major, minor }
    }

    /// Get protocol version as hex value
    pub fn as_hex(&self) -> u16 {
        u16::from_be_bytes([self.major, self.minor])
    }

    /// Get protocol name
    pub fn name(&self) -> String {
        match (self.major, self.minor) {
            (3, 0) => "SSLv3".to_string(),
            (3, minor) => format!("TLS 1.{}", minor - 1),
            (major, minor) => format!("{}.{}", major, minor),
        }
    }

    /// Versions probed by a default sweep, oldest first
    pub fn all() -> Vec<ProtocolVersion> {
        vec![Self::SSL3, Self::TLS10, Self::TLS11, Self::TLS12]
    }
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl From<u16> for ProtocolVersion {
    fn from(value: u16) -> Self {
        let [major, minor] = value.to_be_bytes();
        Self { major, minor }
    }
}

impl FromStr for ProtocolVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "SSLv3" | "SSL 3.0" | "ssl3" => Ok(Self::SSL3),
            "TLS 1.0" | "TLSv1.0" | "TLSv1" | "tls1" | "tls1_0" => Ok(Self::TLS10),
            "TLS 1.1" | "TLSv1.1" | "tls1_1" => Ok(Self::TLS11),
            "TLS 1.2" | "TLSv1.2" | "tls1_2" => Ok(Self::TLS12),
            other => {
                // Raw "major.minor" form, e.g. "3.3"
                let (major, minor) = other
                    .split_once('.')
                    .ok_or_else(|| format!("Unknown protocol: {}", other))?;
                let major = major
                    .parse::<u8>()
                    .map_err(|_| format!("Unknown protocol: {}", other))?;
                let minor = minor
                    .parse::<u8>()
                    .map_err(|_| format!("Unknown protocol: {}", other))?;
                Ok(Self::new(major, minor))
            }
        }
    }
}

pub mod client;
pub mod handshake;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_names() {
        assert_eq!(ProtocolVersion::SSL3.name(), "SSLv3");
        assert_eq!(ProtocolVersion::TLS10.name(), "TLS 1.0");
        assert_eq!(ProtocolVersion::TLS12.name(), "TLS 1.2");
        assert_eq!(ProtocolVersion::new(2, 0).name(), "2.0");
    }

    #[test]
    fn test_version_hex() {
        assert_eq!(ProtocolVersion::TLS12.as_hex(), 0x0303);
        assert_eq!(ProtocolVersion::from(0x0301), ProtocolVersion::TLS10);
    }

    #[test]
    fn test_version_from_str() {
        assert_eq!(
            "TLSv1.1".parse::<ProtocolVersion>(),
            Ok(ProtocolVersion::TLS11)
        );
        assert_eq!("3.3".parse::<ProtocolVersion>(), Ok(ProtocolVersion::TLS12));
        assert!("TLS 9".parse::<ProtocolVersion>().is_err());
    }

    #[test]
    fn test_default_sweep_order() {
        let all = ProtocolVersion::all();
        assert_eq!(all.len(), 4);
        assert_eq!(all[0], ProtocolVersion::SSL3);
        assert_eq!(all[3], ProtocolVersion::TLS12);
    }
}
