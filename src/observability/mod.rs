//! Observability
//!
//! - Structured logging (JSON lines on stderr)
//! - Typed events
//! - Atomic counters for the dashboard
//!
//! ```ignore
//! use credscope::observability::{log_event_with_fields, Event};
//!
//! log_event_with_fields(Event::ExplainComplete, &[("rows", "42")]);
//! ```

mod events;
mod logger;
mod metrics;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use metrics::{MetricsRegistry, MetricsSnapshot};

/// Log a lifecycle event at its own severity
pub fn log_event(event: Event) {
    Logger::log(event.severity(), event.as_str(), &[]);
}

/// Log a lifecycle event with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_line_carries_name_and_severity() {
        let event = Event::ModelMissing;
        let line = Logger::format_line(
            event.severity(),
            event.as_str(),
            &[("path", "/tmp/model.json")],
        );

        assert_eq!(
            line,
            "{\"event\":\"MODEL_MISSING\",\"severity\":\"WARN\",\"path\":\"/tmp/model.json\"}\n"
        );
    }

    #[test]
    fn test_error_event_line_is_valid_json() {
        let event = Event::ExplainFailed;
        let line = Logger::format_line(
            event.severity(),
            event.as_str(),
            &[("reason", "bad \"x\"")],
        );

        let parsed: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed["event"], "EXPLAIN_FAILED");
        assert_eq!(parsed["severity"], "ERROR");
        assert_eq!(parsed["reason"], "bad \"x\"");
    }
}
