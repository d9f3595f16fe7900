//! Fan a rendered digest out to every registered device, one at a time.

use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;
use sharehub_core::Digest;
use thiserror::Error;

use crate::store::RegistrationStore;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DeliveryError {
    /// The token will never work again; its registration should be dropped.
    #[error("delivery token is no longer valid: {0}")]
    InvalidToken(String),
    #[error("push transport failed: {0}")]
    Transport(String),
}

impl DeliveryError {
    pub fn is_invalid_token(&self) -> bool {
        matches!(self, DeliveryError::InvalidToken(_))
    }
}

#[async_trait]
pub trait PushTransport: Send + Sync {
    async fn send(&self, token: &str, digest: &Digest) -> Result<(), DeliveryError>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DeliveryTally {
    pub sent: usize,
    pub failed: usize,
    /// Registrations removed after an invalid-token failure.
    pub pruned: usize,
}

impl DeliveryTally {
    pub fn summary(&self) -> String {
        let mut s = format!("Sent {}, failed {}", self.sent, self.failed);
        if self.pruned > 0 {
            s.push_str(&format!(" (removed {} stale registrations)", self.pruned));
        }
        s
    }
}

/// Attempt each recipient once, in registration order, with no retry.
///
/// Per-recipient failures are tallied and never abort the run. Only failing
/// to read the registrations is an error.
pub async fn deliver_digest<T, R>(transport: &T, registrations: &R, digest: &Digest) -> Result<DeliveryTally>
where
    T: PushTransport + ?Sized,
    R: RegistrationStore + ?Sized,
{
    let regs = registrations.load_registrations()?;
    let mut tally = DeliveryTally::default();

    if regs.is_empty() {
        log::warn!("no push registrations; nothing to deliver");
        return Ok(tally);
    }

    for (recipient, token) in regs.iter() {
        match transport.send(token, digest).await {
            Ok(()) => {
                log::info!("digest delivered to {recipient}");
                tally.sent += 1;
            }
            Err(e) => {
                log::warn!("digest delivery to {recipient} failed: {e}");
                tally.failed += 1;

                if e.is_invalid_token() {
                    match registrations.remove_registration(recipient) {
                        Ok(true) => {
                            log::info!("removed stale registration for {recipient}");
                            tally.pruned += 1;
                        }
                        Ok(false) => {}
                        Err(remove_err) => {
                            log::warn!("could not remove registration for {recipient}: {remove_err:#}");
                        }
                    }
                }
            }
        }
    }

    Ok(tally)
}
