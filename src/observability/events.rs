//! Observable events for aerocql
//!
//! Events are explicit and typed.

use std::fmt;

use super::Severity;

/// Observable events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Configuration
    /// Configuration loaded
    ConfigLoaded,
    /// Schema catalog loaded
    SchemasLoaded,

    // Compiler
    /// Statement compiled into a command
    StatementCompiled,
    /// Statement rejected
    StatementRejected,

    // WAL
    /// WAL record encoded
    WalAppend,
    /// WAL pages flushed
    WalFlush,
    /// WAL replay reached the end of the log
    WalReplayComplete,
    /// WAL corruption detected (FATAL)
    WalCorruption,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::SchemasLoaded => "SCHEMAS_LOADED",
            Event::StatementCompiled => "CQL_STATEMENT_COMPILED",
            Event::StatementRejected => "CQL_STATEMENT_REJECTED",
            Event::WalAppend => "WAL_APPEND",
            Event::WalFlush => "WAL_FLUSH",
            Event::WalReplayComplete => "WAL_REPLAY_COMPLETE",
            Event::WalCorruption => "WAL_CORRUPTION",
        }
    }

    /// Returns true if this event indicates a fatal condition
    pub fn is_fatal(&self) -> bool {
        matches!(self, Event::WalCorruption)
    }

    /// Severity the event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::StatementCompiled | Event::WalAppend | Event::WalFlush => Severity::Trace,
            Event::StatementRejected => Severity::Warn,
            Event::WalCorruption => Severity::Fatal,
            Event::ConfigLoaded | Event::SchemasLoaded | Event::WalReplayComplete => {
                Severity::Info
            }
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
