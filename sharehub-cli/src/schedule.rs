//! Weekly cron trigger.

use std::str::FromStr;
use std::sync::Arc;

use anyhow::{Result, anyhow};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use cron::Schedule;
use sharehub_notify::{PushTransport, RunReport, run_weekly};

use crate::context::AppContext;

/// A failed run is retried once, immediately.
const MAX_ATTEMPTS: usize = 2;

pub fn parse_schedule(expr: &str) -> Result<Schedule> {
    Schedule::from_str(expr).map_err(|e| anyhow!("invalid cron expression '{expr}': {e}"))
}

/// Next fire time strictly after `after`, in the hub's zone.
pub fn next_fire(schedule: &Schedule, tz: Tz, after: DateTime<Utc>) -> Option<DateTime<Tz>> {
    schedule.after(&after.with_timezone(&tz)).next()
}

async fn fire(ctx: &AppContext, transport: &dyn PushTransport) -> Option<RunReport> {
    for attempt in 1..=MAX_ATTEMPTS {
        match run_weekly(&ctx.store, transport, ctx.today(), &ctx.render_options()).await {
            Ok(report) => return Some(report),
            Err(e) => log::error!("weekly digest attempt {attempt}/{MAX_ATTEMPTS} failed: {e:#}"),
        }
    }
    None
}

/// Sleep until each scheduled fire time and run the full pipeline. Never returns
/// unless the schedule runs out of fire times.
pub async fn run(ctx: Arc<AppContext>) -> Result<()> {
    let schedule = parse_schedule(&ctx.config.schedule.cron)?;
    let transport = ctx.transport(false)?;

    log::info!(
        "weekly digest scheduled with '{}' ({})",
        ctx.config.schedule.cron,
        ctx.tz
    );

    loop {
        let now = Utc::now();
        let Some(next) = next_fire(&schedule, ctx.tz, now) else {
            return Err(anyhow!("cron schedule has no upcoming fire times"));
        };
        log::info!("next weekly digest at {}", next.to_rfc3339());

        let wait = (next.with_timezone(&Utc) - now).to_std().unwrap_or_default();
        tokio::time::sleep(wait).await;

        if let Some(report) = fire(&ctx, transport.as_ref()).await {
            log::info!("weekly digest done: {}", report.tally.summary());
        }
    }
}
