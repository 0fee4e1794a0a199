use chrono::{DateTime, Datelike, TimeZone, Utc};
use serde::Serialize;
use std::fmt::Display;

/// Features whose consumption is counted against a numeric plan limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LimitedFeature {
    ContactRequest,
    WorkPhoto,
    Booking,
}

impl LimitedFeature {
    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "contact_request" => Some(LimitedFeature::ContactRequest),
            "work_photo" => Some(LimitedFeature::WorkPhoto),
            "booking" => Some(LimitedFeature::Booking),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LimitedFeature::ContactRequest => "contact_request",
            LimitedFeature::WorkPhoto => "work_photo",
            LimitedFeature::Booking => "booking",
        }
    }

    /// Contact requests and bookings reset on the first of each month; work
    /// photos accumulate for the life of the profile.
    pub fn is_monthly(&self) -> bool {
        matches!(
            self,
            LimitedFeature::ContactRequest | LimitedFeature::Booking
        )
    }
}

impl Display for LimitedFeature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Current usage counts, derived by the data-access layer from existing rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct UsageSnapshot {
    pub contact_requests_this_month: u32,
    pub work_photos_total: u32,
    pub bookings_this_month: u32,
}

impl UsageSnapshot {
    pub fn count_for(&self, feature: LimitedFeature) -> u32 {
        match feature {
            LimitedFeature::ContactRequest => self.contact_requests_this_month,
            LimitedFeature::WorkPhoto => self.work_photos_total,
            LimitedFeature::Booking => self.bookings_this_month,
        }
    }
}

/// Midnight UTC on the first calendar day of the month containing `now`.
/// Monthly-scoped limits count rows created at or after this instant.
pub fn month_start(now: DateTime<Utc>) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(now.year(), now.month(), 1, 0, 0, 0)
        .single()
        .unwrap_or(now)
}
