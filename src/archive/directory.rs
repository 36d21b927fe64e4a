//! Directory records
//!
//! The inflated directory is a flat array of 284-byte records:
//!
//! | offset | size | field                 |
//! |--------|------|-----------------------|
//! | 0      | 256  | name, NUL padded      |
//! | 256    | 4    | timestamp             |
//! | 260    | 8    | reserved              |
//! | 268    | 4    | decompressed length   |
//! | 272    | 4    | payload offset        |
//! | 276    | 4    | compressed length     |
//! | 280    | 4    | CRC32 of compressed   |

use crate::common::{AssetError, Result, MPAK_RECORD_NAME_SIZE, MPAK_RECORD_SIZE};

/// One parsed directory record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryRecord {
    /// Entry name in its stored case
    pub name: String,
    /// Modification time written by the packer
    pub timestamp: u32,
    /// Expected size after decompression
    pub decompressed_length: u32,
    /// Offset of the compressed bytes in the payload region
    pub offset: u32,
    /// Number of compressed bytes
    pub compressed_length: u32,
    /// CRC32 of the compressed bytes
    pub payload_crc32: u32,
}

impl DirectoryRecord {
    /// Parse a single record
    pub fn parse(record: &[u8; MPAK_RECORD_SIZE]) -> Self {
        let word = |at: usize| {
            u32::from_le_bytes([record[at], record[at + 1], record[at + 2], record[at + 3]])
        };

        Self {
            name: nul_terminated(&record[..MPAK_RECORD_NAME_SIZE]),
            timestamp: word(256),
            decompressed_length: word(268),
            offset: word(272),
            compressed_length: word(276),
            payload_crc32: word(280),
        }
    }

    /// Byte range of this record's payload inside the payload region
    pub fn payload_range(&self) -> Option<std::ops::Range<usize>> {
        let start = self.offset as usize;
        start
            .checked_add(self.compressed_length as usize)
            .map(|end| start..end)
    }
}

/// Parse `count` records from an inflated directory
pub fn parse_records(directory: &[u8], count: u32) -> Result<Vec<DirectoryRecord>> {
    let needed = (count as usize)
        .checked_mul(MPAK_RECORD_SIZE)
        .ok_or_else(|| AssetError::InvalidFormat(format!("entry count {count} overflows")))?;
    if directory.len() < needed {
        return Err(AssetError::truncated("directory", needed, directory.len()));
    }

    Ok(directory[..needed]
        .chunks_exact(MPAK_RECORD_SIZE)
        .map(|chunk| {
            let mut record = [0u8; MPAK_RECORD_SIZE];
            record.copy_from_slice(chunk);
            DirectoryRecord::parse(&record)
        })
        .collect())
}

/// Decode a NUL-terminated (or NUL-padded) UTF-8 field
fn nul_terminated(field: &[u8]) -> String {
    let end = field.iter().position(|&b| b == 0).unwrap_or(field.len());
    String::from_utf8_lossy(&field[..end]).into_owned()
}
