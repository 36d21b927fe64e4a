//! PcxDecoder - whole-buffer PCX decoding
//!
//! Decoding walks `height` scanlines starting right after the header. For
//! indexed images the token stream stops where the trailing 768-byte palette
//! begins and the palette is always read from the last 768 bytes of the
//! buffer, without looking for the conventional 0x0C marker.

use super::header::PcxHeader;
use super::image::{DecodedImage, PixelFormat, Rgb};
use super::scanline::{decode_indexed_line, decode_rgb_line, ScanlineReader};
use crate::common::{PCX_HEADER_SIZE, PCX_MAX_RUN, PCX_PALETTE_ENTRIES, PCX_PALETTE_SIZE};
use crate::{AssetError, Result};
use std::fs;
use std::path::Path;

/// A decoded PCX file: its header and image
#[derive(Debug, Clone)]
pub struct PcxDecoder {
    header: PcxHeader,
    image: DecodedImage,
}

impl PcxDecoder {
    /// Decode a PCX file from disk
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(AssetError::InvalidArgument("PCX path is empty".to_string()));
        }
        if !path.is_file() {
            return Err(AssetError::NotFound(path.to_path_buf()));
        }
        let data = fs::read(path)?;
        Self::from_bytes(&data)
    }

    /// Decode a PCX image held in memory
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let header = PcxHeader::parse(data)?;
        let format = header.pixel_format()?;
        let (width, height) = match (header.width(), header.height()) {
            (Some(w), Some(h)) => (w, h),
            _ => {
                return Err(AssetError::InvalidFormat(format!(
                    "invalid PCX bounding box ({}, {})-({}, {})",
                    header.xmin, header.ymin, header.xmax, header.ymax
                )))
            }
        };

        // Token stream bounds; indexed images keep their palette at the end
        let stream_end = match format {
            PixelFormat::Indexed8 => {
                let needed = PCX_HEADER_SIZE + PCX_PALETTE_SIZE;
                if data.len() < needed {
                    return Err(AssetError::truncated("PCX palette", needed, data.len()));
                }
                data.len() - PCX_PALETTE_SIZE
            }
            PixelFormat::Rgb24 => data.len(),
        };

        let stride = width as usize * format.bytes_per_pixel();
        let size = stride.checked_mul(height as usize).ok_or_else(|| {
            AssetError::InvalidFormat(format!("PCX image {width}x{height} is too large"))
        })?;

        // Every token expands to at most PCX_MAX_RUN bytes
        let stream_len = stream_end - PCX_HEADER_SIZE;
        let max_decoded = stream_len.saturating_mul(PCX_MAX_RUN);
        if size > max_decoded {
            return Err(AssetError::InvalidFormat(format!(
                "PCX image {width}x{height} needs {size} bytes, \
                 a {stream_len}-byte stream yields at most {max_decoded}"
            )));
        }

        let mut pixels = Vec::new();
        pixels.try_reserve_exact(size).map_err(|e| {
            AssetError::Io(std::io::Error::new(std::io::ErrorKind::OutOfMemory, e))
        })?;
        pixels.resize(size, 0);
        let bytes_per_line = header.bytes_per_line as usize;

        let palette = match format {
            PixelFormat::Indexed8 => {
                let mut reader =
                    ScanlineReader::new(data, PCX_HEADER_SIZE, stream_end, header.is_rle());
                for row in pixels.chunks_exact_mut(stride) {
                    let line = decode_indexed_line(&mut reader, bytes_per_line);
                    copy_cropped(row, &line);
                }
                log::trace!("PCX token stream stopped at byte {}", reader.position());
                Some(read_palette(&data[stream_end..]))
            }
            PixelFormat::Rgb24 => {
                let mut reader =
                    ScanlineReader::new(data, PCX_HEADER_SIZE, stream_end, header.is_rle());
                for row in pixels.chunks_exact_mut(stride) {
                    let line = decode_rgb_line(&mut reader, bytes_per_line);
                    copy_cropped(row, &line);
                }
                log::trace!("PCX token stream stopped at byte {}", reader.position());
                None
            }
        };

        log::debug!(
            "Decoded PCX {}x{} {:?}, rle={}",
            width,
            height,
            format,
            header.is_rle()
        );

        Ok(Self {
            header,
            image: DecodedImage::new(width, height, format, pixels, palette),
        })
    }

    /// Parsed header
    pub fn header(&self) -> &PcxHeader {
        &self.header
    }

    /// Decoded image
    pub fn image(&self) -> &DecodedImage {
        &self.image
    }

    /// Take the decoded image
    pub fn into_image(self) -> DecodedImage {
        self.image
    }
}

/// Copy a decoded line into an output row, dropping padding past the width
fn copy_cropped(row: &mut [u8], line: &[u8]) {
    let n = row.len().min(line.len());
    row[..n].copy_from_slice(&line[..n]);
}

fn read_palette(raw: &[u8]) -> Box<[Rgb; PCX_PALETTE_ENTRIES]> {
    let mut palette = Box::new([Rgb::default(); PCX_PALETTE_ENTRIES]);
    for (color, rgb) in palette.iter_mut().zip(raw.chunks_exact(3)) {
        *color = Rgb::new(rgb[0], rgb[1], rgb[2]);
    }
    palette
}
