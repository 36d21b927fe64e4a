//! MPAK archive reader
//!
//! This module decodes the MPAK container used by the game client to store
//! tables, textures and geometry descriptors. An archive is laid out as:
//!
//! ```text
//! "MPAK" | 1 unknown byte | 16-byte header (byte i xor i)
//!        | zlib(name) | zlib(directory) | payload region
//! ```
//!
//! The header holds the CRC32 of the compressed directory, the two blob
//! lengths and the entry count. The directory is a sequence of 284-byte
//! records addressing zlib-compressed payloads in the payload region, each
//! with its own CRC32 (over the compressed bytes) and decompressed length.

mod directory;
mod entry;
mod header;
mod inflate;
mod reader;

pub use directory::DirectoryRecord;
pub use entry::Entry;
pub use header::ArchiveHeader;
pub use inflate::{inflate, inflate_limited, Inflated};
pub use reader::Archive;

use crate::Result;
use std::path::Path;

/// Convenience function to open and decode an archive from disk
pub fn open_archive<P: AsRef<Path>>(path: P) -> Result<Archive> {
    Archive::open(path)
}
