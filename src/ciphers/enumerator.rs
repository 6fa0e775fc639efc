// Suite enumerator - Recovers the server's accepted cipher suites in the order
// the server hands them out

use crate::error::ProbeError;
use crate::protocols::ProtocolVersion;
use crate::protocols::client::Handshaker;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;

/// Why a discovery round stopped
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum StopReason {
    /// Every candidate was accepted
    Exhausted,
    /// The server refused the remaining offer (alert, close, bad framing)
    Rejected(String),
    /// The connection failed after at least one suite was found
    Interrupted(String),
    /// The server answered with a suite that was not on offer
    ProtocolViolation(u16),
}

/// Cipher suites found in one discovery round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveryResult {
    /// Accepted suites, in the order the server chose them
    pub suites: Vec<u16>,
    pub stop: StopReason,
}

impl DiscoveryResult {
    /// An empty round means the version is not supported
    pub fn is_empty(&self) -> bool {
        self.suites.is_empty()
    }

    /// Server's top choice across the whole candidate set
    pub fn preferred(&self) -> Option<u16> {
        self.suites.first().copied()
    }
}

/// Drives repeated handshakes, removing each winner from the next offer
pub struct SuiteEnumerator<'a, H: Handshaker + ?Sized> {
    handshaker: &'a H,
    sleep_duration: Option<Duration>,
}

impl<'a, H: Handshaker + ?Sized> SuiteEnumerator<'a, H> {
    pub fn new(handshaker: &'a H) -> Self {
        Self {
            handshaker,
            sleep_duration: None,
        }
    }

    /// Set sleep duration between connections
    pub fn with_sleep(mut self, duration: Option<Duration>) -> Self {
        self.sleep_duration = duration;
        self
    }

    /// Discover every candidate the server accepts for `version`.
    ///
    /// Each round offers the whole remaining working set; the server's pick
    /// is recorded and removed. The first failure ends the round. A
    /// connection-level failure before anything was found is returned as an
    /// error, since it says nothing about the version.
    pub async fn discover(
        &self,
        version: ProtocolVersion,
        candidates: &[u16],
        curves: &[u16],
    ) -> Result<DiscoveryResult, ProbeError> {
        // Snapshot of the candidates, deduplicated; only `remaining` shrinks
        let mut seen = HashSet::with_capacity(candidates.len());
        let mut remaining: Vec<u16> = candidates
            .iter()
            .copied()
            .filter(|c| seen.insert(*c))
            .collect();

        let mut found: Vec<u16> = Vec::new();

        tracing::debug!("Enumerating {} candidate suites for {}", remaining.len(), version);

        let stop = loop {
            if remaining.is_empty() {
                break StopReason::Exhausted;
            }

            if !found.is_empty()
                && let Some(sleep_dur) = self.sleep_duration
            {
                tokio::time::sleep(sleep_dur).await;
            }

            match self.handshaker.hello(version, &remaining, curves).await {
                Ok(chosen) => match remaining.iter().position(|c| *c == chosen) {
                    Some(pos) => {
                        remaining.remove(pos);
                        found.push(chosen);
                    }
                    None => {
                        tracing::warn!(
                            "{}: server chose 0x{:04x}, which was not offered",
                            version,
                            chosen
                        );
                        break StopReason::ProtocolViolation(chosen);
                    }
                },
                Err(e) if e.is_connection_level() => {
                    if found.is_empty() {
                        return Err(e);
                    }
                    tracing::warn!(
                        "{}: connection failed after {} suites, stopping: {}",
                        version,
                        found.len(),
                        e
                    );
                    break StopReason::Interrupted(e.to_string());
                }
                Err(e @ ProbeError::InvalidInput { .. }) => return Err(e),
                Err(e) => {
                    tracing::debug!("{}: offer of {} suites rejected: {}", version, remaining.len(), e);
                    break StopReason::Rejected(e.to_string());
                }
            }
        };

        tracing::debug!("{}: found {} suites ({:?})", version, found.len(), stop);

        Ok(DiscoveryResult {
            suites: found,
            stop,
        })
    }
}
