//! Archive - fully validated, in-memory MPAK archive
//!
//! This module implements construction of an [`Archive`] from a file or a
//! buffer: header parsing, name recovery, directory CRC verification and
//! per-entry CRC and length verification. Construction is all or nothing.

use super::directory::{parse_records, DirectoryRecord};
use super::entry::Entry;
use super::header::ArchiveHeader;
use super::inflate::{inflate, inflate_limited};
use crate::crc32::crc32;
use crate::{AssetError, Result};
use std::collections::{hash_map, HashMap};
use std::fs::{self, File};
use std::io::Read;
use std::path::Path;

/// A decoded MPAK archive
///
/// Entries are keyed by their lowercased name; lookups are case-insensitive.
#[derive(Debug, Clone)]
pub struct Archive {
    name: String,
    entries: HashMap<String, Entry>,
}

impl Archive {
    /// Open and decode an archive from disk
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(AssetError::InvalidArgument("archive path is empty".to_string()));
        }
        if !path.is_file() {
            return Err(AssetError::NotFound(path.to_path_buf()));
        }

        log::debug!("Opening archive {}", path.display());
        let data = fs::read(path)?;
        Self::from_bytes(&data)
    }

    /// Decode an archive from an already opened file
    pub fn from_file(file: File) -> Result<Self> {
        Self::from_reader(file)
    }

    /// Decode an archive by buffering a reader to its end
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes(&data)
    }

    /// Decode an archive held in memory
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let header = ArchiveHeader::parse(data)?;
        let mut cursor = ArchiveHeader::ENCODED_SIZE;

        let name_blob = take(
            data,
            &mut cursor,
            header.name_compressed_length as usize,
            "archive name",
        )?;
        // A short name stream keeps whatever was inflated
        let name = inflate(name_blob, "archive name")?;
        let name = String::from_utf8_lossy(&name.data).into_owned();

        let directory_blob = take(
            data,
            &mut cursor,
            header.directory_compressed_length as usize,
            "directory",
        )?;
        let actual = crc32(directory_blob);
        if actual != header.directory_crc32 {
            return Err(AssetError::DirectoryCrcMismatch {
                expected: header.directory_crc32,
                actual,
            });
        }

        let payloads = &data[cursor..];
        let directory = inflate(directory_blob, "directory")?;
        let records = parse_records(&directory.data, header.entry_count)?;

        log::debug!(
            "Archive '{}': {} entries, {} payload bytes",
            name,
            records.len(),
            payloads.len()
        );

        let mut entries = HashMap::with_capacity(records.len());
        for record in &records {
            let entry = decode_entry(record, payloads)?;
            if entries.insert(record.name.to_lowercase(), entry).is_some() {
                log::warn!(
                    "Archive '{}': duplicate entry '{}' replaces an earlier one",
                    name,
                    record.name
                );
            }
        }

        Ok(Self { name, entries })
    }

    /// Archive name recovered from the name blob
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the archive holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Case-insensitive lookup of an entry's data
    pub fn get(&self, name: &str) -> Option<&[u8]> {
        self.entry(name).map(Entry::data)
    }

    /// Case-insensitive lookup of an entry
    pub fn entry(&self, name: &str) -> Option<&Entry> {
        self.entries.get(&name.to_lowercase())
    }

    /// Whether an entry exists, ignoring case
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(&name.to_lowercase())
    }

    /// Find the first entry named `stem` followed by one of `extensions`,
    /// trying extensions in order
    ///
    /// Extensions include their leading dot, e.g. `[".pcx", ".bmp"]`.
    pub fn find_with_extensions(&self, stem: &str, extensions: &[&str]) -> Option<&Entry> {
        extensions
            .iter()
            .find_map(|ext| self.entry(&format!("{stem}{ext}")))
    }

    /// Stored names of all entries, in no particular order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.values().map(Entry::name)
    }

    /// Iterate over all entries, in no particular order
    pub fn iter(&self) -> hash_map::Values<'_, String, Entry> {
        self.entries.values()
    }

    /// Consume the archive, returning lowercased name to data
    pub fn into_entries(self) -> HashMap<String, Vec<u8>> {
        self.entries
            .into_iter()
            .map(|(key, entry)| (key, entry.into_data()))
            .collect()
    }
}

impl<'a> IntoIterator for &'a Archive {
    type Item = &'a Entry;
    type IntoIter = hash_map::Values<'a, String, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Slice `len` bytes at `cursor`, advancing it
fn take<'a>(data: &'a [u8], cursor: &mut usize, len: usize, structure: &str) -> Result<&'a [u8]> {
    let available = data.len().saturating_sub(*cursor);
    if len > available {
        return Err(AssetError::truncated(structure, len, available));
    }
    let slice = &data[*cursor..*cursor + len];
    *cursor += len;
    Ok(slice)
}

/// Verify and inflate one entry's payload
fn decode_entry(record: &DirectoryRecord, payloads: &[u8]) -> Result<Entry> {
    let range = record
        .payload_range()
        .filter(|range| range.end <= payloads.len())
        .ok_or_else(|| {
            AssetError::truncated(
                format!("payload of '{}'", record.name),
                (record.offset as usize).saturating_add(record.compressed_length as usize),
                payloads.len(),
            )
        })?;
    let compressed = &payloads[range];

    let actual = crc32(compressed);
    if actual != record.payload_crc32 {
        return Err(AssetError::EntryCrcMismatch {
            name: record.name.clone(),
            expected: record.payload_crc32,
            actual,
        });
    }

    // One byte past the declared length is enough to fail the length check
    let limit = (record.decompressed_length as usize).saturating_add(1);
    let inflated = inflate_limited(compressed, &record.name, limit)?;
    if inflated.data.len() != record.decompressed_length as usize {
        return Err(AssetError::EntryLengthMismatch {
            name: record.name.clone(),
            expected: record.decompressed_length,
            actual: inflated.data.len(),
        });
    }

    log::debug!("Entry '{}': {} bytes", record.name, inflated.data.len());
    Ok(Entry::new(record.name.clone(), inflated.data))
}
