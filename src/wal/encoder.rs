//! WAL encoder
//!
//! Assigns each record its chained CRC, frames it and hands it to a
//! [`PageWriter`]. Nothing is durable until [`WalEncoder::flush`].

use std::io::Write;

use super::checksum::chain_checksum;
use super::errors::{WalError, WalResult};
use super::frame::{encode_frame_size, MAX_RECORD_BYTES};
use super::page_writer::PageWriter;
use super::record::WalRecord;
use crate::observability::{log_event_with_fields, Event};

/// Single-writer record encoder
pub struct WalEncoder<W: Write> {
    writer: PageWriter<W>,
    crc: u32,
    offset: u64,
    scratch: Vec<u8>,
}

impl<W: Write> WalEncoder<W> {
    /// `prev_crc` continues an existing chain (0 for a new log);
    /// `offset` is the current length of `inner`
    pub fn new(inner: W, prev_crc: u32, offset: u64, page_bytes: usize) -> Self {
        Self {
            writer: PageWriter::new(inner, page_bytes, offset as usize % page_bytes),
            crc: prev_crc,
            offset,
            scratch: Vec::new(),
        }
    }

    /// Encode one record, setting its `crc` field
    ///
    /// A record whose frame exceeds [`MAX_RECORD_BYTES`] is refused with
    /// [`WalError::RecordTooLarge`]; the log and the CRC chain are left
    /// untouched.
    pub fn encode(&mut self, record: &mut WalRecord) -> WalResult<()> {
        let (len_field, pad) = encode_frame_size(record.body_len());
        let frame_bytes = (record.body_len() + pad) as u64;
        if frame_bytes > MAX_RECORD_BYTES {
            return Err(WalError::RecordTooLarge {
                bytes: frame_bytes,
                limit: MAX_RECORD_BYTES,
            });
        }

        self.crc = chain_checksum(self.crc, &record.data);
        record.crc = self.crc;

        self.scratch.clear();
        record.encode_body(&mut self.scratch);
        self.scratch.resize(self.scratch.len() + pad, 0);

        self.writer.write_all(&len_field.to_le_bytes())?;
        self.writer.write_all(&self.scratch)?;

        let start = self.offset;
        self.offset += 8 + self.scratch.len() as u64;

        let offset = start.to_string();
        let bytes = self.scratch.len().to_string();
        log_event_with_fields(Event::WalAppend, &[("offset", &offset), ("bytes", &bytes)]);
        Ok(())
    }

    /// Write all buffered records to the inner writer
    pub fn flush(&mut self) -> WalResult<()> {
        self.writer.flush()?;
        let offset = self.offset.to_string();
        log_event_with_fields(Event::WalFlush, &[("offset", &offset)]);
        Ok(())
    }

    /// CRC of the last encoded record
    pub fn last_crc(&self) -> u32 {
        self.crc
    }

    /// Logical end of the log, including buffered bytes
    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn get_ref(&self) -> &W {
        self.writer.get_ref()
    }
}
