//! Weekly wake-up for the rotation.
//!
//! The trigger only decides *when* to look; `Rotator::maybe_rotate` re-checks
//! the due condition itself, so an early, late or duplicate wake-up is harmless.

use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use cron::Schedule;
use rota_core::{Result, RotaError, Rotator};
use tokio::task::JoinHandle;

pub struct WeeklyTrigger {
    schedule: Schedule,
    tz: Tz,
}

impl WeeklyTrigger {
    /// `expr` uses the cron crate's field order: sec min hour dom month dow.
    pub fn new(expr: &str, timezone: &str) -> Result<Self> {
        let schedule = Schedule::from_str(expr)
            .map_err(|e| RotaError::Config(format!("invalid schedule '{expr}': {e}")))?;
        let tz: Tz = timezone
            .parse()
            .map_err(|e| RotaError::Config(format!("invalid timezone '{timezone}': {e}")))?;
        Ok(Self { schedule, tz })
    }

    /// First fire time strictly after `now`.
    pub fn next_fire_after(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.schedule
            .after(&now.with_timezone(&self.tz))
            .next()
            .map(|t| t.with_timezone(&Utc))
    }

    /// Run the trigger loop on the current Tokio runtime until aborted.
    pub fn spawn(self, rotator: Arc<Rotator>) -> JoinHandle<()> {
        tokio::spawn(async move {
            loop {
                let now = Utc::now();
                let Some(next) = self.next_fire_after(now) else {
                    tracing::warn!("schedule has no upcoming fire time; weekly trigger stopped");
                    return;
                };
                tracing::info!(%next, "next rotation check scheduled");
                let wait = (next - now).to_std().unwrap_or_default();
                tokio::time::sleep(wait).await;

                let rotator = rotator.clone();
                match tokio::task::spawn_blocking(move || rotator.maybe_rotate()).await {
                    Ok(Ok(Some(rotation))) => {
                        tracing::info!(stamp = %rotation.stamp, "weekly rotation applied")
                    }
                    Ok(Ok(None)) => tracing::info!("weekly check: rotation not due"),
                    Ok(Err(e)) => tracing::error!(error = %e, "weekly rotation failed"),
                    Err(e) => tracing::error!(error = %e, "weekly rotation task panicked"),
                }
            }
        })
    }
}
