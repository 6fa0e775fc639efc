// Order detector - Decides whether the server or the client ordering wins

use crate::error::ProbeError;
use crate::protocols::ProtocolVersion;
use crate::protocols::client::Handshaker;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Who controls cipher suite selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderingVerdict {
    ServerPreference,
    ClientPreference,
}

impl fmt::Display for OrderingVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderingVerdict::ServerPreference => write!(f, "server"),
            OrderingVerdict::ClientPreference => write!(f, "client"),
        }
    }
}

pub struct OrderDetector<'a, H: Handshaker + ?Sized> {
    handshaker: &'a H,
}

impl<'a, H: Handshaker + ?Sized> OrderDetector<'a, H> {
    pub fn new(handshaker: &'a H) -> Self {
        Self { handshaker }
    }

    /// Offer `discovered` reversed and see whether the server still picks
    /// its overall favourite (`discovered[0]`).
    pub async fn classify(
        &self,
        version: ProtocolVersion,
        discovered: &[u16],
        curves: &[u16],
    ) -> Result<OrderingVerdict, ProbeError> {
        let Some(&preferred) = discovered.first() else {
            return Err(ProbeError::invalid_input(
                "cannot classify ordering without any accepted suite",
            ));
        };

        let reversed: Vec<u16> = discovered.iter().rev().copied().collect();
        let chosen = self.handshaker.hello(version, &reversed, curves).await?;

        let verdict = if chosen == preferred {
            OrderingVerdict::ServerPreference
        } else {
            OrderingVerdict::ClientPreference
        };

        tracing::debug!(
            "{}: offered {:04x?} reversed, server chose 0x{:04x} -> {} ordering",
            version,
            reversed,
            chosen,
            verdict
        );

        Ok(verdict)
    }
}
