// Ciphers module - Cipher suite discovery and server preference detection

pub mod enumerator;
pub mod order;

pub use enumerator::{DiscoveryResult, StopReason, SuiteEnumerator};
pub use order::{OrderDetector, OrderingVerdict};

/// Format a cipher suite or group id the way reports show unknown ids
pub fn hex_id(id: u16) -> String {
    format!("0x{:04X}", id)
}
