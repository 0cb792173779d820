//! CRC32 checksums for WAL records
//!
//! Record checksums are chained: each record's CRC continues from the CRC
//! of the record before it, so a record can only be verified in sequence.
//!
//! Uses CRC32 (IEEE polynomial).

use crc32fast::Hasher;

/// Computes a CRC32 checksum over the provided data.
pub fn compute_checksum(data: &[u8]) -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(data);
    hasher.finalize()
}

/// Continues the checksum `prev` over `data`.
///
/// `chain_checksum(compute_checksum(a), b)` equals the checksum of `a`
/// followed by `b`, and a chain starting at 0 equals a plain checksum.
pub fn chain_checksum(prev: u32, data: &[u8]) -> u32 {
    let mut hasher = Hasher::new_with_initial(prev);
    hasher.update(data);
    hasher.finalize()
}
