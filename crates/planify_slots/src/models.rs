// --- File: crates/planify_slots/src/models.rs ---
use chrono::{DateTime, Duration, NaiveTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::SlotError;

/// A half-open interval `[start, end)` between two instants.
///
/// Ranges never cross midnight implicitly: callers build one range per day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct TimeRange {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TimeRange {
    /// Builds a range, rejecting empty or inverted intervals.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, SlotError> {
        if start >= end {
            return Err(SlotError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }

    /// Extends the end of the range; only ever moves it later.
    pub(crate) fn extend_to(&mut self, end: DateTime<Utc>) {
        if end > self.end {
            self.end = end;
        }
    }
}

/// A time-of-day window stamped onto several weekdays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BaseRange {
    start: NaiveTime,
    end: NaiveTime,
}

impl BaseRange {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Result<Self, SlotError> {
        if start >= end {
            return Err(SlotError::InvalidBaseRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveTime {
        self.start
    }

    pub fn end(&self) -> NaiveTime {
        self.end
    }
}

/// One bookable slot as sent to the planning API.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotDto {
    #[cfg_attr(feature = "openapi", schema(example = "2024-01-01T09:00:00Z"))]
    pub start_time: DateTime<Utc>,
    #[cfg_attr(feature = "openapi", schema(example = "2024-01-01T09:30:00Z"))]
    pub end_time: DateTime<Utc>,
    pub is_active: bool,
}

impl SlotDto {
    pub fn active(start_time: DateTime<Utc>, end_time: DateTime<Utc>) -> Self {
        Self {
            start_time,
            end_time,
            is_active: true,
        }
    }
}

/// A slot already persisted by the planning API.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExistingSlot {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// Absent or null on the wire means active.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl ExistingSlot {
    pub fn is_available(&self) -> bool {
        self.is_active.unwrap_or(true)
    }

    pub fn covers(&self, instant: DateTime<Utc>) -> bool {
        self.start_time <= instant && instant < self.end_time
    }
}

// The API hands out numeric ids on some deployments and string ids on others.
fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(id) => Ok(id),
        serde_json::Value::Number(id) => Ok(id.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {other}"
        ))),
    }
}

/// Granularity of materialized slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SlotInterval {
    Fifteen,
    #[default]
    Thirty,
    Sixty,
}

impl SlotInterval {
    pub fn minutes(self) -> u32 {
        match self {
            SlotInterval::Fifteen => 15,
            SlotInterval::Thirty => 30,
            SlotInterval::Sixty => 60,
        }
    }

    pub fn duration(self) -> Duration {
        Duration::minutes(i64::from(self.minutes()))
    }
}

impl TryFrom<u32> for SlotInterval {
    type Error = SlotError;

    fn try_from(minutes: u32) -> Result<Self, Self::Error> {
        match minutes {
            15 => Ok(SlotInterval::Fifteen),
            30 => Ok(SlotInterval::Thirty),
            60 => Ok(SlotInterval::Sixty),
            other => Err(SlotError::InvalidInterval(other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    Other,
}

impl Role {
    /// Parses the role string stored with the user profile; only `ADMIN`
    /// (any case) is privileged.
    pub fn from_label(label: &str) -> Self {
        if label.trim().eq_ignore_ascii_case("admin") {
            Role::Admin
        } else {
            Role::Other
        }
    }
}

/// The signed-in user as seen by the planner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    pub role: Role,
    pub token: Option<String>,
}

impl SessionContext {
    pub fn new(role: Role, token: Option<String>) -> Self {
        Self { role, token }
    }

    pub fn admin(token: impl Into<String>) -> Self {
        Self::new(Role::Admin, Some(token.into()))
    }

    pub fn anonymous() -> Self {
        Self::new(Role::Other, None)
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}
