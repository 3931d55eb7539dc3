// --- File: crates/planify_config/src/models.rs ---

use serde::{Deserialize, Serialize};

// --- General Server Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// How a drag gesture turns into draft ranges.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SelectionPolicy {
    /// Every drag is merged into the range set of the day it happened on.
    #[default]
    MultiRange,
    /// One base range per week, stamped onto every enabled weekday.
    SingleRange,
}

/// How a batch of slots is delivered upstream.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionPolicy {
    Sequential,
    #[default]
    Paced,
}

// --- Submission Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SubmissionConfig {
    #[serde(default)]
    pub policy: SubmissionPolicy,
    #[serde(default = "default_max_requests_per_second")]
    pub max_requests_per_second: u32,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_base_backoff_ms")]
    pub base_backoff_ms: u64,
    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,
    /// Pause between the end of a batch and the refresh of the week.
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,
    /// Log the batch instead of sending it.
    #[serde(default)]
    pub dry_run: bool,
}

impl Default for SubmissionConfig {
    fn default() -> Self {
        Self {
            policy: SubmissionPolicy::default(),
            max_requests_per_second: default_max_requests_per_second(),
            max_retries: default_max_retries(),
            base_backoff_ms: default_base_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
            settle_delay_ms: default_settle_delay_ms(),
            dry_run: false,
        }
    }
}

// --- Planning Config ---
// Holds non-secret planning settings. The admin token travels with each request.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PlanningConfig {
    pub api_base_url: String, // e.g. http://localhost:3001
    #[serde(default = "default_time_zone")]
    pub time_zone: String,
    #[serde(default = "default_grid_start_hour")]
    pub grid_start_hour: u32,
    #[serde(default = "default_grid_end_hour")]
    pub grid_end_hour: u32,
    #[serde(default = "default_interval_minutes")]
    pub interval_minutes: u32,
    /// Upper bound on how many weeks a plan may be repeated over.
    #[serde(default = "default_max_repeat_weeks")]
    pub max_repeat_weeks: u32,
    #[serde(default)]
    pub selection_policy: SelectionPolicy,
    #[serde(default)]
    pub submission: SubmissionConfig,
}

// --- Unified App Configuration ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    // Server config is mandatory
    pub server: ServerConfig,

    #[serde(default)]
    pub use_planning: bool,

    #[serde(default)]
    pub planning: Option<PlanningConfig>,
}

fn default_max_requests_per_second() -> u32 {
    3
}

fn default_max_retries() -> u32 {
    5
}

fn default_base_backoff_ms() -> u64 {
    1000
}

fn default_max_backoff_ms() -> u64 {
    5000
}

fn default_settle_delay_ms() -> u64 {
    100
}

fn default_time_zone() -> String {
    "Europe/Paris".to_string()
}

fn default_grid_start_hour() -> u32 {
    6
}

fn default_grid_end_hour() -> u32 {
    21
}

fn default_interval_minutes() -> u32 {
    30
}

fn default_max_repeat_weeks() -> u32 {
    52
}
