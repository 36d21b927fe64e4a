//! Test fixtures: builders for MPAK archives and PCX images
//!
//! The crate is read-only, so tests assemble their inputs byte by byte.

#![allow(dead_code)]

use flate2::write::ZlibEncoder;
use flate2::Compression;
use std::io::Write;

/// zlib-compress a buffer
pub fn deflate(data: &[u8]) -> Vec<u8> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).expect("in-memory write");
    encoder.finish().expect("in-memory finish")
}

/// One directory entry to write
#[derive(Debug, Clone)]
pub struct FixtureEntry {
    pub name: String,
    pub data: Vec<u8>,
    /// Overrides the declared decompressed length
    pub declared_length: Option<u32>,
}

/// An assembled archive and the offsets of its sections
#[derive(Debug, Clone)]
pub struct BuiltArchive {
    pub bytes: Vec<u8>,
    pub name_start: usize,
    pub directory_start: usize,
    pub payload_start: usize,
}

/// Builder for MPAK archive bytes
#[derive(Debug, Clone)]
pub struct MpakBuilder {
    name: String,
    entries: Vec<FixtureEntry>,
    entry_count: Option<u32>,
    directory_crc: Option<u32>,
    name_cut: usize,
}

impl MpakBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            entries: Vec::new(),
            entry_count: None,
            directory_crc: None,
            name_cut: 0,
        }
    }

    pub fn entry(mut self, name: &str, data: &[u8]) -> Self {
        self.entries.push(FixtureEntry {
            name: name.to_string(),
            data: data.to_vec(),
            declared_length: None,
        });
        self
    }

    pub fn entry_with_declared_length(mut self, name: &str, data: &[u8], declared: u32) -> Self {
        self.entries.push(FixtureEntry {
            name: name.to_string(),
            data: data.to_vec(),
            declared_length: Some(declared),
        });
        self
    }

    /// Overrides the entry count written to the header
    pub fn entry_count(mut self, count: u32) -> Self {
        self.entry_count = Some(count);
        self
    }

    /// Overrides the directory CRC written to the header
    pub fn directory_crc(mut self, crc: u32) -> Self {
        self.directory_crc = Some(crc);
        self
    }

    /// Drops bytes from the end of the compressed name, header adjusted
    pub fn cut_name_blob(mut self, bytes: usize) -> Self {
        self.name_cut = bytes;
        self
    }

    pub fn build(&self) -> Vec<u8> {
        self.build_with_layout().bytes
    }

    pub fn build_with_layout(&self) -> BuiltArchive {
        let mut directory = Vec::with_capacity(self.entries.len() * 284);
        let mut payloads = Vec::new();

        for (i, entry) in self.entries.iter().enumerate() {
            let compressed = deflate(&entry.data);
            let declared = entry.declared_length.unwrap_or(entry.data.len() as u32);

            let mut record = [0u8; 284];
            let name = entry.name.as_bytes();
            record[..name.len()].copy_from_slice(name);
            record[256..260].copy_from_slice(&(0x5F00_0000u32 + i as u32).to_le_bytes());
            record[268..272].copy_from_slice(&declared.to_le_bytes());
            record[272..276].copy_from_slice(&(payloads.len() as u32).to_le_bytes());
            record[276..280].copy_from_slice(&(compressed.len() as u32).to_le_bytes());
            record[280..284].copy_from_slice(&crc32fast::hash(&compressed).to_le_bytes());

            directory.extend_from_slice(&record);
            payloads.extend_from_slice(&compressed);
        }

        let mut name_blob = deflate(self.name.as_bytes());
        name_blob.truncate(name_blob.len().saturating_sub(self.name_cut));
        let directory_blob = deflate(&directory);

        let crc = self
            .directory_crc
            .unwrap_or_else(|| crc32fast::hash(&directory_blob));
        let count = self.entry_count.unwrap_or(self.entries.len() as u32);

        let mut header = [0u8; 16];
        header[0..4].copy_from_slice(&crc.to_le_bytes());
        header[4..8].copy_from_slice(&(directory_blob.len() as u32).to_le_bytes());
        header[8..12].copy_from_slice(&(name_blob.len() as u32).to_le_bytes());
        header[12..16].copy_from_slice(&count.to_le_bytes());
        for (i, byte) in header.iter_mut().enumerate() {
            *byte ^= i as u8;
        }

        let mut bytes = b"MPAK".to_vec();
        bytes.push(0x02);
        bytes.extend_from_slice(&header);
        let name_start = bytes.len();
        bytes.extend_from_slice(&name_blob);
        let directory_start = bytes.len();
        bytes.extend_from_slice(&directory_blob);
        let payload_start = bytes.len();
        bytes.extend_from_slice(&payloads);

        BuiltArchive {
            bytes,
            name_start,
            directory_start,
            payload_start,
        }
    }
}

/// A 128-byte PCX header
pub fn pcx_header(planes: u8, width: u16, height: u16, bytes_per_line: u16, rle: bool) -> Vec<u8> {
    let mut header = vec![0u8; 128];
    header[0] = 0x0A;
    header[1] = 5;
    header[2] = u8::from(rle);
    header[3] = 8;
    header[8..10].copy_from_slice(&(width - 1).to_le_bytes());
    header[10..12].copy_from_slice(&(height - 1).to_le_bytes());
    header[12..14].copy_from_slice(&72u16.to_le_bytes());
    header[14..16].copy_from_slice(&72u16.to_le_bytes());
    header[65] = planes;
    header[66..68].copy_from_slice(&bytes_per_line.to_le_bytes());
    header[68..70].copy_from_slice(&1u16.to_le_bytes());
    header
}

/// Run-length encode one plane line
pub fn rle_encode(line: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    let mut i = 0;
    while i < line.len() {
        let value = line[i];
        let mut run = 1;
        while i + run < line.len() && line[i + run] == value && run < 63 {
            run += 1;
        }
        if run > 1 || value > 0xC0 {
            out.push(0xC0 + run as u8);
            out.push(value);
        } else {
            out.push(value);
        }
        i += run;
    }
    out
}

/// Palette where index `i` maps to `(i, 255 - i, i / 2)`
pub fn test_palette() -> Vec<u8> {
    (0..=255u8)
        .flat_map(|i| [i, 255 - i, i / 2])
        .collect()
}

/// Build an 8-bit indexed PCX from rows of palette indices
pub fn indexed_pcx(rows: &[Vec<u8>], bytes_per_line: u16, rle: bool) -> Vec<u8> {
    indexed_pcx_with_palette(rows, bytes_per_line, rle, &test_palette())
}

/// Build an 8-bit indexed PCX with an explicit 768-byte palette
pub fn indexed_pcx_with_palette(
    rows: &[Vec<u8>],
    bytes_per_line: u16,
    rle: bool,
    palette: &[u8],
) -> Vec<u8> {
    let width = rows[0].len() as u16;
    let mut out = pcx_header(1, width, rows.len() as u16, bytes_per_line, rle);
    for row in rows {
        let mut line = row.clone();
        line.resize(bytes_per_line as usize, 0);
        if rle {
            out.extend_from_slice(&rle_encode(&line));
        } else {
            out.extend_from_slice(&line);
        }
    }
    out.push(0x0C);
    out.extend_from_slice(palette);
    out
}

/// Build a 24-bit PCX from rows of `(r, g, b)` pixels
pub fn rgb_pcx(rows: &[Vec<(u8, u8, u8)>], bytes_per_line: u16, rle: bool) -> Vec<u8> {
    let width = rows[0].len() as u16;
    let mut out = pcx_header(3, width, rows.len() as u16, bytes_per_line, rle);
    for row in rows {
        let planes: [Vec<u8>; 3] = [
            row.iter().map(|p| p.0).collect(),
            row.iter().map(|p| p.1).collect(),
            row.iter().map(|p| p.2).collect(),
        ];
        for mut plane in planes {
            plane.resize(bytes_per_line as usize, 0);
            if rle {
                out.extend_from_slice(&rle_encode(&plane));
            } else {
                out.extend_from_slice(&plane);
            }
        }
    }
    out
}
