// --- File: crates/planify_slots/src/submission.rs ---
//! Batch publishing of materialized slots.
//!
//! Every slot is sent on its own and its outcome recorded; a failing slot
//! never stops the batch. The paced strategy keeps the request rate under a
//! ceiling and retries rate-limited slots with capped exponential backoff.

use planify_config::{SubmissionConfig, SubmissionPolicy};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::{debug, error, info, warn};

use crate::models::SlotDto;
use crate::service::{SlotApi, SlotApiError};

/// Longest server-requested pause honored before a retry.
pub const MAX_RETRY_AFTER: Duration = Duration::from_secs(60);

/// Rate ceiling and retry policy of the paced strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacingConfig {
    pub max_requests_per_second: u32,
    pub max_retries: u32,
    pub base_backoff: Duration,
    pub max_backoff: Duration,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            max_requests_per_second: 3,
            max_retries: 5,
            base_backoff: Duration::from_millis(1000),
            max_backoff: Duration::from_millis(5000),
        }
    }
}

impl PacingConfig {
    /// `ceil(1000 / rps) + 20` ms between two slots.
    pub fn min_delay(&self) -> Duration {
        let rps = u64::from(self.max_requests_per_second.max(1));
        Duration::from_millis(1000u64.div_ceil(rps) + 20)
    }

    /// Wait before retry number `attempt` (0-based) of a rate-limited slot.
    ///
    /// A positive server hint wins, bounded by [`MAX_RETRY_AFTER`] or
    /// `max_backoff` if larger; otherwise `base * 2^attempt`, capped.
    pub fn backoff(&self, attempt: u32, retry_after: Option<Duration>) -> Duration {
        if let Some(hint) = retry_after.filter(|d| !d.is_zero()) {
            return hint.min(self.max_backoff.max(MAX_RETRY_AFTER));
        }
        let factor = 2u32.checked_pow(attempt).unwrap_or(u32::MAX);
        self.base_backoff
            .checked_mul(factor)
            .map_or(self.max_backoff, |d| d.min(self.max_backoff))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionStrategy {
    /// One request after the other, no pacing and no retry.
    Sequential,
    Paced(PacingConfig),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmissionOptions {
    pub strategy: SubmissionStrategy,
    /// Log the batch instead of sending it.
    pub dry_run: bool,
}

impl Default for SubmissionOptions {
    fn default() -> Self {
        Self {
            strategy: SubmissionStrategy::Paced(PacingConfig::default()),
            dry_run: false,
        }
    }
}

impl From<&SubmissionConfig> for SubmissionOptions {
    fn from(config: &SubmissionConfig) -> Self {
        let strategy = match config.policy {
            SubmissionPolicy::Sequential => SubmissionStrategy::Sequential,
            SubmissionPolicy::Paced => SubmissionStrategy::Paced(PacingConfig {
                max_requests_per_second: config.max_requests_per_second,
                max_retries: config.max_retries,
                base_backoff: Duration::from_millis(config.base_backoff_ms),
                max_backoff: Duration::from_millis(config.max_backoff_ms),
            }),
        };
        Self {
            strategy,
            dry_run: config.dry_run,
        }
    }
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlotSuccess {
    pub dto: SlotDto,
    pub response: Value,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotFailure {
    pub dto: SlotDto,
    /// `0` when no HTTP response was received.
    pub status_code: u16,
    pub error: Value,
}

impl SlotFailure {
    fn from_error(dto: &SlotDto, err: &SlotApiError) -> Self {
        Self {
            dto: dto.clone(),
            status_code: err.status_code(),
            error: err.body(),
        }
    }
}

/// Outcome of one batch, in submission order.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionResult {
    pub successes: Vec<SlotSuccess>,
    pub failures: Vec<SlotFailure>,
    /// Set when the batch was only logged; nothing reached the planning API.
    pub dry_run: bool,
}

impl SubmissionResult {
    pub fn total(&self) -> usize {
        self.successes.len() + self.failures.len()
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

pub struct BatchSubmitter {
    api: Arc<dyn SlotApi>,
    options: SubmissionOptions,
}

impl BatchSubmitter {
    pub fn new(api: Arc<dyn SlotApi>, options: SubmissionOptions) -> Self {
        Self { api, options }
    }

    pub fn options(&self) -> &SubmissionOptions {
        &self.options
    }

    /// Sends every slot and collects the outcomes. Never fails as a whole.
    pub async fn submit(&self, slots: &[SlotDto]) -> SubmissionResult {
        if slots.is_empty() {
            return SubmissionResult::default();
        }
        if self.options.dry_run {
            warn!(count = slots.len(), "Dry run: batch not sent");
            for dto in slots {
                debug!(start = %dto.start_time, end = %dto.end_time, "Would create slot");
            }
            return SubmissionResult {
                dry_run: true,
                ..SubmissionResult::default()
            };
        }

        let result = match self.options.strategy {
            SubmissionStrategy::Sequential => self.submit_sequential(slots).await,
            SubmissionStrategy::Paced(pacing) => self.submit_paced(slots, pacing).await,
        };

        info!(
            sent = result.total(),
            succeeded = result.successes.len(),
            failed = result.failures.len(),
            "Slot batch finished"
        );
        result
    }

    async fn submit_sequential(&self, slots: &[SlotDto]) -> SubmissionResult {
        let mut result = SubmissionResult::default();
        for dto in slots {
            match self.api.create_slot(dto).await {
                Ok(response) => result.successes.push(SlotSuccess {
                    dto: dto.clone(),
                    response,
                }),
                Err(err) => {
                    error!(start = %dto.start_time, "Failed to create slot: {}", err);
                    result.failures.push(SlotFailure::from_error(dto, &err));
                }
            }
        }
        result
    }

    async fn submit_paced(&self, slots: &[SlotDto], pacing: PacingConfig) -> SubmissionResult {
        let mut result = SubmissionResult::default();
        let min_delay = pacing.min_delay();
        let mut last_sent: Option<Instant> = None;

        for dto in slots {
            if let Some(last) = last_sent {
                let elapsed = last.elapsed();
                if elapsed < min_delay {
                    sleep(min_delay - elapsed).await;
                }
            }

            let mut attempt = 0;
            loop {
                match self.api.create_slot(dto).await {
                    Ok(response) => {
                        result.successes.push(SlotSuccess {
                            dto: dto.clone(),
                            response,
                        });
                        break;
                    }
                    Err(err) if err.is_rate_limited() && attempt < pacing.max_retries => {
                        let wait = pacing.backoff(attempt, err.retry_after());
                        warn!(
                            attempt = attempt + 1,
                            wait_ms = wait.as_millis() as u64,
                            "Rate limited, retrying slot"
                        );
                        sleep(wait).await;
                        attempt += 1;
                    }
                    Err(err) => {
                        error!(start = %dto.start_time, attempt, "Failed to create slot: {}", err);
                        result.failures.push(SlotFailure::from_error(dto, &err));
                        break;
                    }
                }
            }
            last_sent = Some(Instant::now());
        }
        result
    }
}
