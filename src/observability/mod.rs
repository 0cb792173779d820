//! Observability subsystem for aerocql
//!
//! Structured, synchronous JSON logging of lifecycle events.
//!
//! # Principles
//!
//! 1. Observability is read-only
//! 2. No side effects on compilation
//! 3. No async or background threads
//! 4. Deterministic output
//!
//! # Usage
//!
//! ```ignore
//! use aerocql::observability::{log_event_with_fields, set_min_severity, Event, Severity};
//!
//! set_min_severity(Severity::Trace);
//! log_event_with_fields(Event::WalFlush, &[("offset", "4096")]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{min_severity, set_min_severity, Logger, Severity};

/// Log a lifecycle event at its own severity
pub fn log_event(event: Event) {
    Logger::log(event.severity(), event.as_str(), &[]);
}

/// Log a lifecycle event with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}
