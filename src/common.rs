//! Common types and constants for the asset decoders
//!
//! This module defines the error type shared by the MPAK archive reader and
//! the PCX image decoder, together with the fixed layout constants of both
//! formats.

use std::path::PathBuf;
use thiserror::Error;

/// MPAK archive magic, the ASCII bytes `MPAK` read as a little-endian u32
pub const MPAK_MAGIC: u32 = 0x4B41_504D;

/// Size of the XOR-obfuscated archive header following the magic
pub const MPAK_HEADER_SIZE: usize = 16;

/// Bytes consumed before the header: 4 bytes magic + 1 unknown byte
pub const MPAK_PREAMBLE_SIZE: usize = 5;

/// Size of one directory record
pub const MPAK_RECORD_SIZE: usize = 284;

/// Size of the NUL-padded name field inside a directory record
pub const MPAK_RECORD_NAME_SIZE: usize = 256;

/// Chunk size used when feeding and draining the inflater (2048 bytes)
pub const INFLATE_CHUNK_SIZE: usize = 0x800;

/// PCX manufacturer byte
pub const PCX_MAGIC: u8 = 0x0A;

/// Size of the fixed PCX header
pub const PCX_HEADER_SIZE: usize = 128;

/// Number of entries in an indexed image palette
pub const PCX_PALETTE_ENTRIES: usize = 256;

/// Size of the trailing palette of an indexed PCX image (256 RGB triples)
pub const PCX_PALETTE_SIZE: usize = PCX_PALETTE_ENTRIES * 3;

/// Bytes strictly above this value are run markers in RLE scanlines
pub const PCX_RUN_THRESHOLD: u8 = 0xC0;

/// Longest run a single RLE token can produce
pub const PCX_MAX_RUN: usize = (u8::MAX - PCX_RUN_THRESHOLD) as usize;

/// Broad classification of an [`AssetError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Empty or undersized input, or an unusable argument
    InvalidArgument,
    /// The file to decode does not exist
    NotFound,
    /// Wrong magic value or an unsupported header field
    InvalidFormat,
    /// Not enough bytes for a fixed-size structure
    Truncated,
    /// CRC or length mismatch on the directory or an entry
    Integrity,
    /// Underlying I/O failure
    Io,
}

/// Error type for archive and image decoding
#[derive(Debug, Error)]
pub enum AssetError {
    /// Empty or undersized input
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Missing file
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Bad magic value or unsupported header field
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// Insufficient bytes for a fixed-size structure
    #[error("Truncated {structure}: needed {needed} bytes, {available} available")]
    Truncated {
        /// Structure that could not be read
        structure: String,
        /// Bytes the structure requires
        needed: usize,
        /// Bytes that were left in the input
        available: usize,
    },

    /// Compressed directory does not match the header checksum
    #[error("Directory CRC mismatch: expected {expected:08X}, got {actual:08X}")]
    DirectoryCrcMismatch {
        /// CRC32 stored in the archive header
        expected: u32,
        /// CRC32 computed over the compressed directory
        actual: u32,
    },

    /// Compressed entry payload does not match its directory checksum
    #[error("Entry CRC mismatch for '{name}': expected {expected:08X}, got {actual:08X}")]
    EntryCrcMismatch {
        /// Entry name as stored in the directory
        name: String,
        /// CRC32 stored in the directory record
        expected: u32,
        /// CRC32 computed over the compressed payload
        actual: u32,
    },

    /// Decompressed entry length differs from the declared length
    #[error("Entry length mismatch for '{name}': expected {expected} bytes, got {actual}")]
    EntryLengthMismatch {
        /// Entry name as stored in the directory
        name: String,
        /// Declared decompressed length
        expected: u32,
        /// Actual decompressed length
        actual: usize,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AssetError {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AssetError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            AssetError::NotFound(_) => ErrorKind::NotFound,
            AssetError::InvalidFormat(_) => ErrorKind::InvalidFormat,
            AssetError::Truncated { .. } => ErrorKind::Truncated,
            AssetError::DirectoryCrcMismatch { .. }
            | AssetError::EntryCrcMismatch { .. }
            | AssetError::EntryLengthMismatch { .. } => ErrorKind::Integrity,
            AssetError::Io(_) => ErrorKind::Io,
        }
    }

    /// Whether this is a CRC or length mismatch
    pub fn is_integrity(&self) -> bool {
        self.kind() == ErrorKind::Integrity
    }

    /// Shorthand for a [`AssetError::Truncated`] error
    pub(crate) fn truncated(structure: impl Into<String>, needed: usize, available: usize) -> Self {
        AssetError::Truncated {
            structure: structure.into(),
            needed,
            available,
        }
    }
}

/// Result type alias for decoding operations
pub type Result<T> = std::result::Result<T, AssetError>;
