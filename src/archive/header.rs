//! Archive preamble and obfuscated header
//!
//! An MPAK file starts with the `MPAK` magic, one byte of unknown purpose
//! and a 16-byte header whose byte `i` is stored xor `i`.

use crate::common::{AssetError, Result, MPAK_HEADER_SIZE, MPAK_MAGIC, MPAK_PREAMBLE_SIZE};

/// De-obfuscated archive header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArchiveHeader {
    /// CRC32 of the compressed directory blob
    pub directory_crc32: u32,
    /// Length of the compressed directory blob
    pub directory_compressed_length: u32,
    /// Length of the compressed archive name blob
    pub name_compressed_length: u32,
    /// Number of 284-byte directory records
    pub entry_count: u32,
}

impl ArchiveHeader {
    /// Total bytes consumed by magic, unknown byte and header
    pub const ENCODED_SIZE: usize = MPAK_PREAMBLE_SIZE + MPAK_HEADER_SIZE;

    /// Parse the preamble and header from the start of an archive
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < 4 {
            return Err(AssetError::truncated("archive magic", 4, data.len()));
        }

        let magic = u32::from_le_bytes([data[0], data[1], data[2], data[3]]);
        if magic != MPAK_MAGIC {
            return Err(AssetError::InvalidFormat(format!(
                "bad archive magic {magic:08X}, expected {MPAK_MAGIC:08X}"
            )));
        }

        if data.len() < Self::ENCODED_SIZE {
            return Err(AssetError::truncated(
                "archive header",
                Self::ENCODED_SIZE,
                data.len(),
            ));
        }

        let mut header = [0u8; MPAK_HEADER_SIZE];
        header.copy_from_slice(&data[MPAK_PREAMBLE_SIZE..Self::ENCODED_SIZE]);
        deobfuscate(&mut header);

        let word = |i: usize| {
            u32::from_le_bytes([header[i], header[i + 1], header[i + 2], header[i + 3]])
        };

        Ok(Self {
            directory_crc32: word(0),
            directory_compressed_length: word(4),
            name_compressed_length: word(8),
            entry_count: word(12),
        })
    }
}

/// Undo the positional xor applied to the header bytes
pub fn deobfuscate(header: &mut [u8; MPAK_HEADER_SIZE]) {
    for (i, byte) in header.iter_mut().enumerate() {
        *byte ^= i as u8;
    }
}
