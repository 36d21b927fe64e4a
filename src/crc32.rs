//! CRC32 checksums used by MPAK archives
//!
//! Archives carry the standard IEEE CRC-32 (reflected polynomial 0xEDB88320,
//! initial value and final xor 0xFFFFFFFF), the same checksum zlib computes.
//! Checksums are always taken over the *compressed* bytes.

/// Compute the CRC32 of `data`
pub fn crc32(data: &[u8]) -> u32 {
    crc32fast::hash(data)
}
