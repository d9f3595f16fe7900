//! Aggregate -> render -> deliver, as invoked by every trigger.

use chrono::NaiveDate;
use sharehub_core::{Digest, RenderOptions, build_weekly_digest};
use thiserror::Error;

use crate::delivery::{DeliveryTally, PushTransport, deliver_digest};
use crate::store::{HubStore, RegistrationStore};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("no shared hub document found")]
    NotFound,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub digest: Digest,
    pub tally: DeliveryTally,
}

/// Render-only path used by previews. No delivery side effects.
pub fn build_digest<S>(store: &S, today: NaiveDate, opts: &RenderOptions) -> Result<Digest, PipelineError>
where
    S: HubStore + ?Sized,
{
    let hub = store.load_hub()?.ok_or(PipelineError::NotFound)?;
    if !hub.unreadable.is_empty() {
        log::warn!(
            "Skipping {} unreadable hub records ({} tasks, {} lists, {} habits)",
            hub.unreadable.len(),
            hub.unreadable.tasks.len(),
            hub.unreadable.lists.len(),
            hub.unreadable.habits.len()
        );
    }
    Ok(build_weekly_digest(&hub, today, opts))
}

/// Full pipeline. A missing hub stops before any delivery is attempted.
pub async fn run_weekly<S, T>(
    store: &S,
    transport: &T,
    today: NaiveDate,
    opts: &RenderOptions,
) -> Result<RunReport, PipelineError>
where
    S: HubStore + RegistrationStore + ?Sized,
    T: PushTransport + ?Sized,
{
    let digest = build_digest(store, today, opts)?;
    let tally = deliver_digest(transport, store, &digest).await?;
    log::info!(
        "weekly digest \"{}\": sent={} failed={} pruned={}",
        digest.title,
        tally.sent,
        tally.failed,
        tally.pruned
    );
    Ok(RunReport { digest, tally })
}
