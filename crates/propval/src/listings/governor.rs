//! Outbound request accounting against the listings API's per-minute budget.
//!
//! Thresholds here are advisory: they only log. The hard cap lives in
//! [`super::limiter`].

use chrono::{DateTime, Duration, Utc};
use tracing::{error, warn};

use super::transport::OutboundResponse;

pub const REQUEST_WINDOW_SECS: i64 = 60;
pub const ELEVATED_REQUESTS_PER_MINUTE: u32 = 30;
pub const CRITICAL_REQUESTS_PER_MINUTE: u32 = 40;
pub const LOW_REMAINING_QUOTA: u64 = 15;
pub const CRITICAL_REMAINING_QUOTA: u64 = 5;

const REMAINING_HEADER: &str = "x-ratelimit-remaining";
const LIMIT_HEADER: &str = "x-ratelimit-limit";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum UsageLevel {
    Normal,
    Elevated,
    Critical,
}

/// Requests issued in the current 60-second window.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestWindow {
    count: u32,
    resets_at: Option<DateTime<Utc>>,
}

impl RequestWindow {
    /// Count one request, opening a fresh window if the previous one elapsed.
    pub fn record(&mut self, now: DateTime<Utc>) -> u32 {
        if self.resets_at.map_or(true, |resets_at| now >= resets_at) {
            self.count = 0;
            self.resets_at = Some(now + Duration::seconds(REQUEST_WINDOW_SECS));
        }
        self.count = self.count.saturating_add(1);
        self.count
    }

    /// Requests counted in the window that is live at `now`.
    pub fn current(&self, now: DateTime<Utc>) -> u32 {
        match self.resets_at {
            Some(resets_at) if now < resets_at => self.count,
            _ => 0,
        }
    }

    pub fn resets_at(&self) -> Option<DateTime<Utc>> {
        self.resets_at
    }
}

pub fn classify_request_rate(requests_this_minute: u32) -> UsageLevel {
    if requests_this_minute >= CRITICAL_REQUESTS_PER_MINUTE {
        UsageLevel::Critical
    } else if requests_this_minute >= ELEVATED_REQUESTS_PER_MINUTE {
        UsageLevel::Elevated
    } else {
        UsageLevel::Normal
    }
}

pub fn classify_remaining_quota(remaining: u64) -> UsageLevel {
    if remaining <= CRITICAL_REMAINING_QUOTA {
        UsageLevel::Critical
    } else if remaining <= LOW_REMAINING_QUOTA {
        UsageLevel::Elevated
    } else {
        UsageLevel::Normal
    }
}

pub(crate) fn log_request_rate(requests_this_minute: u32) -> UsageLevel {
    let level = classify_request_rate(requests_this_minute);
    match level {
        UsageLevel::Critical => error!(
            requests_this_minute,
            ceiling = CRITICAL_REQUESTS_PER_MINUTE,
            "Domain API request rate critical"
        ),
        UsageLevel::Elevated => warn!(
            requests_this_minute,
            ceiling = ELEVATED_REQUESTS_PER_MINUTE,
            "Domain API request rate approaching limit"
        ),
        UsageLevel::Normal => {}
    }
    level
}

/// Inspect upstream quota headers. Returns `None` when the header is absent or unparsable.
pub(crate) fn log_upstream_quota(response: &OutboundResponse) -> Option<UsageLevel> {
    let remaining = response
        .header(REMAINING_HEADER)
        .and_then(|value| value.trim().parse::<u64>().ok())?;
    let limit = response.header(LIMIT_HEADER).unwrap_or("unknown");

    let level = classify_remaining_quota(remaining);
    match level {
        UsageLevel::Critical => error!(remaining, limit, "Domain API quota nearly exhausted"),
        UsageLevel::Elevated => warn!(remaining, limit, "Domain API quota running low"),
        UsageLevel::Normal => {}
    }
    Some(level)
}
