//! Record framing
//!
//! Each record body is preceded by a u64 little-endian length field and
//! padded with zeros to an 8-byte boundary, so a length field never
//! straddles a sector. When padding is present the top byte of the length
//! field is `0x80 | pad`.

/// Bytes in the length field
pub const FRAME_SIZE_BYTES: usize = 8;

/// Smallest sector a disk writes atomically
pub const MIN_SECTOR_BYTES: usize = 512;

/// Default flush alignment
pub const WAL_PAGE_BYTES: usize = 8 * MIN_SECTOR_BYTES;

/// Largest frame body, padding included, the log accepts
pub const MAX_RECORD_BYTES: u64 = 10 * 1024 * 1024;

const PAD_FLAG: u64 = 0x80;
const SIZE_MASK: u64 = !(0xff << 56);

/// Returns the length field and pad byte count for a body of `body_bytes`
pub fn encode_frame_size(body_bytes: usize) -> (u64, usize) {
    let mut len_field = body_bytes as u64;
    let pad = (8 - (body_bytes % 8)) % 8;
    if pad != 0 {
        len_field |= (PAD_FLAG | pad as u64) << 56;
    }
    (len_field, pad)
}

/// Splits a length field into body bytes and pad bytes
pub fn decode_frame_size(len_field: u64) -> (u64, u64) {
    let body_bytes = len_field & SIZE_MASK;
    let pad = if (len_field >> 56) & PAD_FLAG != 0 {
        (len_field >> 56) & 0x7
    } else {
        0
    };
    (body_bytes, pad)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aligned_body_has_no_pad_flag() {
        assert_eq!(encode_frame_size(16), (16, 0));
        assert_eq!(decode_frame_size(16), (16, 0));
    }

    #[test]
    fn test_pad_flag_in_high_byte() {
        let (field, pad) = encode_frame_size(13);
        assert_eq!(pad, 3);
        assert_eq!(field >> 56, 0x83);
        assert_eq!(field & SIZE_MASK, 13);
        assert_eq!(decode_frame_size(field), (13, 3));
    }

    #[test]
    fn test_every_remainder() {
        for body in 1..=8usize {
            let (field, pad) = encode_frame_size(body);
            assert_eq!((body + pad) % 8, 0);
            assert_eq!(decode_frame_size(field), (body as u64, pad as u64));
        }
    }
}
