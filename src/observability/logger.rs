//! JSON line logger
//!
//! Each call writes exactly one line to stderr: `event`, then `severity`,
//! then the caller's fields sorted by key. Anything below the process-wide
//! minimum severity is dropped. stdout carries command responses only.

use std::fmt;
use std::io::{self, Write};
use std::sync::atomic::{AtomicU8, Ordering};

/// Log level, least severe first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Per-statement and per-record detail
    Trace,
    Info,
    /// Rejected statements
    Warn,
    Error,
    /// The log can no longer be trusted
    Fatal,
}

const LEVELS: [Severity; 5] = [
    Severity::Trace,
    Severity::Info,
    Severity::Warn,
    Severity::Error,
    Severity::Fatal,
];

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Trace => "TRACE",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
            Severity::Fatal => "FATAL",
        }
    }

    /// Looks up a `log_level` name, ignoring case
    pub fn from_name(name: &str) -> Option<Severity> {
        LEVELS
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

static MIN_SEVERITY: AtomicU8 = AtomicU8::new(Severity::Info as u8);

/// Sets the process-wide minimum severity
pub fn set_min_severity(severity: Severity) {
    MIN_SEVERITY.store(severity as u8, Ordering::Relaxed);
}

pub fn min_severity() -> Severity {
    let stored = MIN_SEVERITY.load(Ordering::Relaxed) as usize;
    LEVELS.get(stored).copied().unwrap_or(Severity::Fatal)
}

/// Stderr JSON logger
pub struct Logger;

impl Logger {
    /// Writes one line for `event` unless `severity` is filtered out
    pub fn log(severity: Severity, event: &str, fields: &[(&str, &str)]) {
        if severity < min_severity() {
            return;
        }
        let line = render(severity, event, fields);
        let _ = io::stderr().lock().write_all(line.as_bytes());
    }
}

/// One JSON object plus its newline
fn render(severity: Severity, event: &str, fields: &[(&str, &str)]) -> String {
    let mut sorted = fields.to_vec();
    sorted.sort_by_key(|&(key, _)| key);

    let mut line = format!(
        "{{\"event\":{},\"severity\":\"{}\"",
        quoted(event),
        severity
    );
    for (key, value) in sorted {
        line.push(',');
        line.push_str(&quoted(key));
        line.push(':');
        line.push_str(&quoted(value));
    }
    line.push_str("}\n");
    line
}

fn quoted(text: &str) -> String {
    serde_json::Value::from(text).to_string()
}
