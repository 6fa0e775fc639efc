// TLS Handshake codec - Builds ClientHello records and reads the negotiated
// cipher suite out of a ServerHello

use super::{CONTENT_TYPE_HANDSHAKE, HANDSHAKE_CLIENT_HELLO, ProtocolVersion, RECORD_HEADER_LEN};
use crate::error::ProbeError;
use bytes::{BufMut, BytesMut};
use std::collections::HashSet;

/// Byte repeated to fill the 32-byte ClientHello random.
///
/// This is deliberately not random: the handshake is abandoned right after
/// the ServerHello, so no key material is ever derived from it.
pub const FILLER_BYTE: u8 = 0x07;

/// Extension type: supported_groups (formerly elliptic_curves)
pub const EXT_SUPPORTED_GROUPS: u16 = 0x000a;

/// Extension type: ec_point_formats
pub const EXT_EC_POINT_FORMATS: u16 = 0x000b;

/// ClientHello offering a fixed list of cipher suites
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientHello {
    version: ProtocolVersion,
    cipher_suites: Vec<u16>,
    curves: Vec<u16>,
}

impl ClientHello {
    /// Create a ClientHello.
    ///
    /// `cipher_suites` must be non-empty and free of duplicates. Duplicate
    /// curves are dropped, keeping first occurrence order.
    pub fn new(
        version: ProtocolVersion,
        cipher_suites: &[u16],
        curves: &[u16],
    ) -> Result<Self, ProbeError> {
        if cipher_suites.is_empty() {
            return Err(ProbeError::invalid_input("no cipher suites to offer"));
        }

        let mut seen = HashSet::with_capacity(cipher_suites.len());
        if let Some(dup) = cipher_suites.iter().find(|c| !seen.insert(**c)) {
            return Err(ProbeError::invalid_input(format!(
                "cipher suite 0x{:04x} offered twice",
                dup
            )));
        }

        let mut seen = HashSet::with_capacity(curves.len());
        let curves: Vec<u16> = curves.iter().copied().filter(|c| seen.insert(*c)).collect();

        let hello = Self {
            version,
            cipher_suites: cipher_suites.to_vec(),
            curves,
        };

        // The record length field is 16 bits wide
        if hello.body_len() + 4 > u16::MAX as usize {
            return Err(ProbeError::invalid_input(format!(
                "ClientHello with {} suites and {} curves exceeds record size",
                hello.cipher_suites.len(),
                hello.curves.len()
            )));
        }

        Ok(hello)
    }

    /// Length of the ClientHello body (without the handshake header)
    fn body_len(&self) -> usize {
        let mut len = 2 + 32 + 1 + 2 + self.cipher_suites.len() * 2 + 2;
        if !self.curves.is_empty() {
            len += 2 + self.extensions_len();
        }
        len
    }

    /// Length of the extension list (without its own length prefix)
    fn extensions_len(&self) -> usize {
        // supported_groups: type + ext length + list length + curves
        let groups = 2 + 2 + 2 + self.curves.len() * 2;
        // ec_point_formats: type + ext length + count + format
        let point_formats = 2 + 2 + 1 + 1;
        groups + point_formats
    }

    /// Build the handshake message: header followed by the ClientHello body
    fn handshake_message(&self) -> Vec<u8> {
        let body_len = self.body_len();
        let mut buf = BytesMut::with_capacity(4 + body_len);

        // Handshake Type: ClientHello (1), 24-bit length
        buf.put_u8(HANDSHAKE_CLIENT_HELLO);
        buf.put_uint(body_len as u64, 3);

        // Client version
        buf.put_u8(self.version.major);
        buf.put_u8(self.version.minor);

        // Random (32 bytes)
        buf.put_bytes(FILLER_BYTE, 32);

        // Empty session ID
        buf.put_u8(0);

        // Cipher suites
        buf.put_u16((self.cipher_suites.len() * 2) as u16);
        for cipher in &self.cipher_suites {
            buf.put_u16(*cipher);
        }

        // One compression method: null
        buf.put_u8(1);
        buf.put_u8(0);

        if !self.curves.is_empty() {
            buf.put_u16(self.extensions_len() as u16);

            let list_len = self.curves.len() * 2;
            buf.put_u16(EXT_SUPPORTED_GROUPS);
            buf.put_u16((list_len + 2) as u16);
            buf.put_u16(list_len as u16);
            for curve in &self.curves {
                buf.put_u16(*curve);
            }

            // Only "uncompressed" points
            buf.put_u16(EXT_EC_POINT_FORMATS);
            buf.put_u16(2);
            buf.put_u8(1);
            buf.put_u8(0);
        }

        buf.to_vec()
    }

    /// Record header announcing a handshake record of `len` bytes
    fn record_header(&self, len: usize) -> [u8; RECORD_HEADER_LEN] {
        let [hi, lo] = (len as u16).to_be_bytes();
        [
            CONTENT_TYPE_HANDSHAKE,
            self.version.major,
            self.version.minor,
            hi,
            lo,
        ]
    }

    /// Build the complete record: record header plus handshake message
    pub fn encode(&self) -> Vec<u8> {
        let message = self.handshake_message();
        let mut record = Vec::with_capacity(RECORD_HEADER_LEN + message.len());
        record.extend_from_slice(&self.record_header(message.len()));
        record.extend_from_slice(&message);
        record
    }
}

/// Fields read from a ServerHello
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerHello {
    /// Version the server answered with; recorded, never checked
    pub version: ProtocolVersion,
    /// Negotiated cipher suite
    pub cipher_suite: u16,
}

/// Parse ServerHello message
pub struct ServerHelloParser;

impl ServerHelloParser {
    /// Parse the body of a handshake record carrying a ServerHello.
    ///
    /// Offsets are fixed: handshake header (4), version (2), random (32),
    /// session id (1 + N), cipher suite (2). Anything after the cipher suite
    /// is ignored.
    pub fn parse(data: &[u8]) -> Result<ServerHello, ProbeError> {
        let mut offset = 4;

        let version = Self::field(data, offset, 2, "version")?;
        let version = ProtocolVersion::new(version[0], version[1]);
        offset += 2;

        // Random
        offset += 32;

        let session_id_len = Self::field(data, offset, 1, "session id length")?[0] as usize;
        offset += 1 + session_id_len;

        let cipher = Self::field(data, offset, 2, "cipher suite")?;
        let cipher_suite = u16::from_be_bytes([cipher[0], cipher[1]]);

        Ok(ServerHello {
            version,
            cipher_suite,
        })
    }

    fn field<'a>(
        data: &'a [u8],
        offset: usize,
        len: usize,
        name: &str,
    ) -> Result<&'a [u8], ProbeError> {
        data.get(offset..offset + len).ok_or_else(|| {
            ProbeError::malformed(format!(
                "{} at offset {} needs {} bytes, message has {}",
                name,
                offset,
                len,
                data.len()
            ))
        })
    }
}
