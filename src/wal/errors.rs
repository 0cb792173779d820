//! WAL error types
//!
//! Error codes:
//! - AERO_WAL_IO (ERROR)
//! - AERO_WAL_TORN_WRITE (ERROR: the tail of the log was cut short)
//! - AERO_WAL_RECORD_TOO_LARGE (REJECT: nothing was written)
//! - AERO_WAL_CORRUPTION (FATAL)
//! - AERO_WAL_CRC_MISMATCH (FATAL)
//! - AERO_WAL_PAYLOAD (FATAL: a record body is not a valid command)

use std::io;

use thiserror::Error;

/// Result type for WAL operations
pub type WalResult<T> = Result<T, WalError>;

/// Errors raised while encoding or decoding the log
#[derive(Debug, Error)]
pub enum WalError {
    /// Underlying reader or writer failed
    #[error("WAL I/O error: {0}")]
    Io(#[from] io::Error),

    /// Frame or record header is malformed
    #[error("WAL corruption at byte {offset}: {reason}")]
    Corruption { offset: u64, reason: String },

    /// Frame ends early or contains a zeroed sector
    #[error("WAL torn write at byte {offset}")]
    TornWrite { offset: u64 },

    /// Chained checksum does not match the record
    #[error("WAL CRC mismatch at byte {offset}: expected {expected:#010x}, found {found:#010x}")]
    CrcMismatch {
        offset: u64,
        expected: u32,
        found: u32,
    },

    /// Frame would exceed the largest size the decoder accepts
    #[error("WAL record of {bytes} bytes exceeds limit {limit}")]
    RecordTooLarge { bytes: u64, limit: u64 },

    /// Record data is not a serialized command
    #[error("WAL payload error: {0}")]
    Payload(#[from] serde_json::Error),
}

impl WalError {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            WalError::Io(_) => "AERO_WAL_IO",
            WalError::Corruption { .. } => "AERO_WAL_CORRUPTION",
            WalError::TornWrite { .. } => "AERO_WAL_TORN_WRITE",
            WalError::CrcMismatch { .. } => "AERO_WAL_CRC_MISMATCH",
            WalError::RecordTooLarge { .. } => "AERO_WAL_RECORD_TOO_LARGE",
            WalError::Payload(_) => "AERO_WAL_PAYLOAD",
        }
    }

    /// Returns whether the log content itself is damaged
    ///
    /// A torn write only loses the unfinished tail; everything decoded
    /// before it is valid.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            WalError::Corruption { .. } | WalError::CrcMismatch { .. } | WalError::Payload(_)
        )
    }

    pub(crate) fn corruption(offset: u64, reason: impl Into<String>) -> Self {
        WalError::Corruption {
            offset,
            reason: reason.into(),
        }
    }
}
