use std::fmt::Display;

use serde::{Serialize, Serializer};

/// Discrete lifecycle state derived from a subscription record and a point in
/// time. `None` means the professional has no subscription record at all.
/// `Other` carries an unrecognized stored status verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleState {
    None,
    Trial,
    PaymentReminder,
    PaymentRequired,
    Active,
    Expired,
    Other(String),
}

impl LifecycleState {
    /// Full feature access applies throughout the trial window up to the
    /// payment-required cutoff, regardless of which plan was selected for
    /// later.
    pub fn is_full_access(&self) -> bool {
        matches!(
            self,
            LifecycleState::Trial | LifecycleState::PaymentReminder
        )
    }

    /// The selected plan may be changed any time before the trial resolves
    /// into a billed or expired subscription.
    pub fn allows_plan_selection(&self) -> bool {
        matches!(
            self,
            LifecycleState::Trial
                | LifecycleState::PaymentReminder
                | LifecycleState::PaymentRequired
        )
    }

    pub fn as_str(&self) -> &str {
        match self {
            LifecycleState::None => "none",
            LifecycleState::Trial => "trial",
            LifecycleState::PaymentReminder => "payment_reminder",
            LifecycleState::PaymentRequired => "payment_required",
            LifecycleState::Active => "active",
            LifecycleState::Expired => "expired",
            LifecycleState::Other(value) => value,
        }
    }
}

impl Display for LifecycleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for LifecycleState {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}
