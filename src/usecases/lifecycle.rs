use chrono::{DateTime, Duration, Utc};

use crate::domain::{
    entities::subscriptions::SubscriptionEntity,
    value_objects::enums::{
        lifecycle_states::LifecycleState, subscription_statuses::SubscriptionStatus,
    },
};

/// Trial window length, fixed at record creation.
pub const TRIAL_LENGTH_DAYS: i64 = 90;

/// From this day of the trial onward the professional is reminded to pick a
/// plan and load payment data.
pub const PAYMENT_REMINDER_AFTER_DAYS: i64 = 60;

/// Day of the trial at which `payment_data_required_date` is set when the
/// record is created. The stored column is authoritative afterwards.
pub const PAYMENT_DATA_REQUIRED_AFTER_DAYS: i64 = 75;

/// Derives the lifecycle state for a subscription record at `now`.
///
/// Rules are evaluated in strict priority order, first match wins. The stored
/// status is authoritative for `active` and `expired`; inside a trial the
/// finer sub-state comes from the trial window columns. Both trial thresholds
/// are checked independently: a `payment_data_required_date` earlier than day
/// 60 wins over the reminder rule. `now` is an explicit parameter so the
/// resolver stays deterministic; all timestamps are UTC.
pub fn resolve_lifecycle_state(
    record: Option<&SubscriptionEntity>,
    now: DateTime<Utc>,
) -> LifecycleState {
    let Some(record) = record else {
        return LifecycleState::None;
    };

    match SubscriptionStatus::from_str(&record.status) {
        SubscriptionStatus::Expired => LifecycleState::Expired,
        SubscriptionStatus::Active => LifecycleState::Active,
        SubscriptionStatus::Trial => {
            if now > record.trial_end_date {
                LifecycleState::Expired
            } else if now > record.payment_data_required_date {
                LifecycleState::PaymentRequired
            } else if now - record.trial_start_date >= Duration::days(PAYMENT_REMINDER_AFTER_DAYS) {
                LifecycleState::PaymentReminder
            } else {
                LifecycleState::Trial
            }
        }
        // Statuses this version does not know yet pass through verbatim.
        SubscriptionStatus::Other(status) => LifecycleState::Other(status),
    }
}

/// Whole days left in the trial window, rounded up. Never negative: any `now`
/// at or past `trial_end_date` yields 0.
pub fn trial_days_remaining(record: &SubscriptionEntity, now: DateTime<Utc>) -> i64 {
    const SECONDS_PER_DAY: i64 = 86_400;

    let remaining_secs = (record.trial_end_date - now).num_seconds();
    if remaining_secs <= 0 {
        return 0;
    }
    // `i64::div_ceil` is unstable; `remaining_secs > 0` here so this equals it.
    (remaining_secs + SECONDS_PER_DAY - 1) / SECONDS_PER_DAY
}
