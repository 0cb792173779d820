//! WAL record body
//!
//! On-disk layout of a record body (all integers little-endian):
//!
//! ```text
//! | type: u8 | crc: u32 | data_len: u32 | data: [u8; data_len] |
//! ```
//!
//! The body is wrapped in a frame by the encoder (see `frame`).

use crate::compiler::Command;

use super::errors::{WalError, WalResult};

/// Size of the fixed body header
pub const BODY_HEADER_BYTES: usize = 9;

/// Kind of a WAL record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum RecordType {
    /// Serialized mutation command
    Command = 1,
    /// Carries the running CRC so a new log can continue an old chain
    Crc = 2,
}

impl RecordType {
    pub fn from_u8(value: u8) -> Option<RecordType> {
        match value {
            1 => Some(RecordType::Command),
            2 => Some(RecordType::Crc),
            _ => None,
        }
    }
}

/// One log record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalRecord {
    pub record_type: RecordType,
    /// Chained CRC, assigned by the encoder
    pub crc: u32,
    pub data: Vec<u8>,
}

impl WalRecord {
    /// Record holding a serialized command
    pub fn command(command: &Command) -> WalResult<Self> {
        Ok(Self {
            record_type: RecordType::Command,
            crc: 0,
            data: serde_json::to_vec(command)?,
        })
    }

    /// Record with no data; after encoding its CRC is the running CRC
    pub fn crc_marker() -> Self {
        Self {
            record_type: RecordType::Crc,
            crc: 0,
            data: Vec::new(),
        }
    }

    /// Deserializes the command held by a `Command` record
    pub fn to_command(&self) -> WalResult<Command> {
        Ok(serde_json::from_slice(&self.data)?)
    }

    /// Length of the encoded body
    pub fn body_len(&self) -> usize {
        BODY_HEADER_BYTES + self.data.len()
    }

    /// Appends the encoded body to `out`
    pub fn encode_body(&self, out: &mut Vec<u8>) {
        out.reserve(self.body_len());
        out.push(self.record_type as u8);
        out.extend_from_slice(&self.crc.to_le_bytes());
        out.extend_from_slice(&(self.data.len() as u32).to_le_bytes());
        out.extend_from_slice(&self.data);
    }

    /// Decodes a body; `offset` is used for error reporting only
    pub fn decode_body(body: &[u8], offset: u64) -> WalResult<Self> {
        if body.len() < BODY_HEADER_BYTES {
            return Err(WalError::corruption(offset, "record shorter than header"));
        }

        let record_type = RecordType::from_u8(body[0]).ok_or_else(|| {
            WalError::corruption(offset, format!("unknown record type {}", body[0]))
        })?;
        let crc = u32::from_le_bytes([body[1], body[2], body[3], body[4]]);
        let data_len = u32::from_le_bytes([body[5], body[6], body[7], body[8]]) as usize;

        if BODY_HEADER_BYTES + data_len != body.len() {
            return Err(WalError::corruption(
                offset,
                format!(
                    "data length {} does not match record length {}",
                    data_len,
                    body.len()
                ),
            ));
        }

        Ok(Self {
            record_type,
            crc,
            data: body[BODY_HEADER_BYTES..].to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_layout() {
        let record = WalRecord {
            record_type: RecordType::Command,
            crc: 0x0403_0201,
            data: b"ab".to_vec(),
        };
        let mut out = Vec::new();
        record.encode_body(&mut out);

        assert_eq!(out, vec![1, 1, 2, 3, 4, 2, 0, 0, 0, b'a', b'b']);
        assert_eq!(WalRecord::decode_body(&out, 0).unwrap(), record);
    }

    #[test]
    fn test_unknown_type_is_corruption() {
        let body = [9u8, 0, 0, 0, 0, 0, 0, 0, 0];
        let err = WalRecord::decode_body(&body, 64).unwrap_err();
        assert!(matches!(err, WalError::Corruption { offset: 64, .. }));
    }

    #[test]
    fn test_length_mismatch_is_corruption() {
        let mut out = Vec::new();
        WalRecord::crc_marker().encode_body(&mut out);
        out.push(0);
        assert!(WalRecord::decode_body(&out, 0).is_err());
    }

    #[test]
    fn test_command_payload() {
        let command = Command::DropSchema {
            collection: "orders".into(),
        };
        let record = WalRecord::command(&command).unwrap();
        assert_eq!(record.record_type, RecordType::Command);
        assert_eq!(record.to_command().unwrap(), command);
    }

    #[test]
    fn test_bad_payload() {
        let record = WalRecord {
            record_type: RecordType::Command,
            crc: 0,
            data: b"not json".to_vec(),
        };
        assert!(matches!(record.to_command(), Err(WalError::Payload(_))));
    }
}
