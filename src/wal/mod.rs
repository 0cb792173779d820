//! Write-Ahead Log (WAL) framing for aerocql
//!
//! Mutation commands are logged before a caller applies them to the range
//! index. This module covers record encoding and decoding only; segment
//! files, rotation and fsync policy belong to the caller.
//!
//! # Design Principles
//!
//! - Every record carries a CRC chained from the record before it
//! - Frames are 8-byte aligned so a length field is never torn
//! - Writes reach the file in whole pages, so only the last page can be
//!   partially written
//! - Explicit failure over silent recovery
//!
//! # Usage
//!
//! ```ignore
//! use aerocql::wal::{WalDecoder, WalEncoder, WalRecord, WAL_PAGE_BYTES};
//!
//! let mut enc = WalEncoder::new(file, 0, 0, WAL_PAGE_BYTES);
//! enc.encode(&mut WalRecord::command(&command)?)?;
//! enc.flush()?;
//!
//! for record in WalDecoder::new(reader).decode_all()? {
//!     let command = record.to_command()?;
//! }
//! ```

mod checksum;
mod decoder;
mod encoder;
mod errors;
mod frame;
mod page_writer;
mod record;

pub use checksum::{chain_checksum, compute_checksum};
pub use decoder::WalDecoder;
pub use encoder::WalEncoder;
pub use errors::{WalError, WalResult};
pub use frame::{
    decode_frame_size, encode_frame_size, MAX_RECORD_BYTES, MIN_SECTOR_BYTES, WAL_PAGE_BYTES,
};
pub use page_writer::{PageWriter, DEFAULT_BUFFER_BYTES};
pub use record::{RecordType, WalRecord};
