use super::alerts::{AlertDispatcher, AlertEvent};
use super::config::ServiceContext;
use chrono::Utc;
use std::collections::BTreeMap;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::Context;

/// Forwards events at or above `min_level` to the alert dispatcher.
#[derive(Clone)]
pub(crate) struct AlertLayer {
    dispatcher: AlertDispatcher,
    service_context: ServiceContext,
    min_level: Level,
}

impl AlertLayer {
    pub(crate) fn new(
        dispatcher: AlertDispatcher,
        service_context: ServiceContext,
        min_level: Level,
    ) -> Self {
        Self {
            dispatcher,
            service_context,
            min_level,
        }
    }
}

#[derive(Default)]
struct FieldMapVisitor {
    values: BTreeMap<String, String>,
}

impl FieldMapVisitor {
    fn insert(&mut self, field: &Field, value: String) {
        self.values
            .insert(field.name().to_string(), redact(field.name(), value));
    }
}

impl Visit for FieldMapVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        self.insert(field, format!("{value:?}"));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.insert(field, value.to_string());
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.insert(field, value.to_string());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.insert(field, value.to_string());
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.insert(field, value.to_string());
    }
}

impl<S> Layer<S> for AlertLayer
where
    S: Subscriber,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() < self.min_level {
            return;
        }

        let mut visitor = FieldMapVisitor::default();
        event.record(&mut visitor);

        let message = visitor
            .values
            .remove("message")
            .map(|raw| unquote_debug_string(&raw));

        let alert = AlertEvent {
            level: *event.metadata().level(),
            timestamp: Utc::now(),
            service_name: self.service_context.service_name.clone(),
            environment: self.service_context.environment.clone(),
            target: event.metadata().target().to_string(),
            file: event.metadata().file().map(|f| f.to_string()),
            line: event.metadata().line(),
            message,
            fields: visitor.values,
        };

        self.dispatcher.try_dispatch(alert);
    }
}

fn unquote_debug_string(input: &str) -> String {
    let trimmed = input.trim();
    if trimmed.starts_with('"') && trimmed.ends_with('"') && trimmed.len() >= 2 {
        return trimmed[1..trimmed.len() - 1].to_string();
    }
    trimmed.to_string()
}

fn redact(field_name: &str, value: String) -> String {
    if is_sensitive_key(field_name) {
        return "[REDACTED]".to_string();
    }
    value
}

fn is_sensitive_key(field_name: &str) -> bool {
    let field = field_name.to_ascii_lowercase();
    field.contains("webhook")
        || field.contains("secret")
        || field.contains("password")
        || field.contains("token")
        || field.contains("authorization")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sensitive_field_names_are_redacted() {
        assert_eq!(redact("jwt_secret", "hunter2".to_string()), "[REDACTED]");
        assert_eq!(
            redact("webhook_url", "https://x".to_string()),
            "[REDACTED]"
        );
        assert_eq!(redact("plan_id", "abc".to_string()), "abc");
    }

    #[test]
    fn debug_quoted_messages_are_unquoted() {
        assert_eq!(unquote_debug_string("\"hello\""), "hello");
        assert_eq!(unquote_debug_string("plain"), "plain");
    }
}
