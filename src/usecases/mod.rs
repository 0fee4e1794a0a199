pub mod entitlements;
pub mod lifecycle;
pub mod subscriptions;
pub mod trial_expiry;
