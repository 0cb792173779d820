//! WAL decoder
//!
//! Reads frames in order and verifies the CRC chain. Failures are split in
//! two: a torn write means the log ends in an unfinished frame (short read,
//! or a sector inside the frame that was never written and reads as zeros);
//! anything else that fails to verify is corruption.

use std::io::{self, Read};

use super::checksum::chain_checksum;
use super::errors::{WalError, WalResult};
use super::frame::{decode_frame_size, FRAME_SIZE_BYTES, MAX_RECORD_BYTES, MIN_SECTOR_BYTES};
use super::record::{RecordType, WalRecord};
use crate::observability::{log_event_with_fields, Event};

pub struct WalDecoder<R: Read> {
    reader: R,
    crc: u32,
    /// End of the last fully verified frame
    offset: u64,
}

impl<R: Read> WalDecoder<R> {
    pub fn new(reader: R) -> Self {
        Self::with_offset(reader, 0)
    }

    /// `offset` is the position of `reader` within the log file
    pub fn with_offset(reader: R, offset: u64) -> Self {
        Self {
            reader,
            crc: 0,
            offset,
        }
    }

    /// Decode the next record; `None` at the end of the log
    ///
    /// A zero length field marks the end, as does a clean EOF between
    /// frames.
    pub fn decode(&mut self) -> WalResult<Option<WalRecord>> {
        let result = self.decode_next();
        if let Err(e) = &result {
            if e.is_fatal() {
                let offset = self.offset.to_string();
                let code = e.code();
                log_event_with_fields(Event::WalCorruption, &[("offset", &offset), ("code", code)]);
            }
        }
        result
    }

    fn decode_next(&mut self) -> WalResult<Option<WalRecord>> {
        let mut len_buf = [0u8; FRAME_SIZE_BYTES];
        match read_full(&mut self.reader, &mut len_buf)? {
            0 => return Ok(None),
            n if n < FRAME_SIZE_BYTES => {
                return Err(WalError::TornWrite {
                    offset: self.offset,
                })
            }
            _ => {}
        }

        let len_field = u64::from_le_bytes(len_buf);
        if len_field == 0 {
            return Ok(None);
        }

        let (body_bytes, pad) = decode_frame_size(len_field);
        let frame_bytes = body_bytes + pad;
        if frame_bytes > MAX_RECORD_BYTES {
            return Err(WalError::corruption(
                self.offset,
                format!("frame of {} bytes exceeds limit {}", frame_bytes, MAX_RECORD_BYTES),
            ));
        }

        let mut frame = vec![0u8; frame_bytes as usize];
        if read_full(&mut self.reader, &mut frame)? < frame.len() {
            return Err(WalError::TornWrite {
                offset: self.offset,
            });
        }

        let data_offset = self.offset + FRAME_SIZE_BYTES as u64;
        let body = &frame[..body_bytes as usize];

        let record = match WalRecord::decode_body(body, self.offset) {
            Ok(record) => record,
            Err(e) => {
                if is_torn_frame(data_offset, &frame) {
                    return Err(WalError::TornWrite {
                        offset: self.offset,
                    });
                }
                return Err(e);
            }
        };

        match record.record_type {
            RecordType::Command => {
                let expected = chain_checksum(self.crc, &record.data);
                if expected != record.crc {
                    if is_torn_frame(data_offset, &frame) {
                        return Err(WalError::TornWrite {
                            offset: self.offset,
                        });
                    }
                    return Err(WalError::CrcMismatch {
                        offset: self.offset,
                        expected,
                        found: record.crc,
                    });
                }
                self.crc = expected;
            }
            RecordType::Crc => {
                if self.crc != 0 && self.crc != record.crc {
                    return Err(WalError::CrcMismatch {
                        offset: self.offset,
                        expected: self.crc,
                        found: record.crc,
                    });
                }
                self.crc = record.crc;
            }
        }

        self.offset = data_offset + frame_bytes;
        Ok(Some(record))
    }

    /// Decode every remaining record
    pub fn decode_all(&mut self) -> WalResult<Vec<WalRecord>> {
        let mut records = Vec::new();
        while let Some(record) = self.decode()? {
            records.push(record);
        }
        let offset = self.offset.to_string();
        let count = records.len().to_string();
        log_event_with_fields(
            Event::WalReplayComplete,
            &[("offset", &offset), ("records", &count)],
        );
        Ok(records)
    }

    /// CRC of the last verified record
    pub fn last_crc(&self) -> u32 {
        self.crc
    }

    /// End of the last verified frame
    pub fn offset(&self) -> u64 {
        self.offset
    }
}

/// Fills `buf` until it is full or the reader is exhausted
fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

/// True if any sector-aligned chunk of the frame is entirely zero
fn is_torn_frame(file_offset: u64, frame: &[u8]) -> bool {
    let sector = MIN_SECTOR_BYTES as u64;
    let mut offset = file_offset;
    let mut rest = frame;
    while !rest.is_empty() {
        let chunk_len = ((sector - offset % sector) as usize).min(rest.len());
        let (chunk, tail) = rest.split_at(chunk_len);
        if chunk.iter().all(|b| *b == 0) {
            return true;
        }
        offset += chunk_len as u64;
        rest = tail;
    }
    false
}
