use std::fmt::Display;

use serde::{Serialize, Serializer};

/// Coarse status stored on the subscription row. Only `active` and `expired`
/// are authoritative on their own; during `trial` the finer lifecycle state is
/// derived from the trial window. Unknown values are carried verbatim so new
/// statuses introduced by a newer writer do not get mangled by an older reader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubscriptionStatus {
    Trial,
    Active,
    Expired,
    Other(String),
}

impl SubscriptionStatus {
    pub fn from_str(value: &str) -> Self {
        match value {
            "trial" => SubscriptionStatus::Trial,
            "active" => SubscriptionStatus::Active,
            "expired" => SubscriptionStatus::Expired,
            other => SubscriptionStatus::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            SubscriptionStatus::Trial => "trial",
            SubscriptionStatus::Active => "active",
            SubscriptionStatus::Expired => "expired",
            SubscriptionStatus::Other(value) => value,
        }
    }
}

impl Display for SubscriptionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for SubscriptionStatus {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}
