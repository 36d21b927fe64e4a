//! Scanline decoding
//!
//! Both pixel formats share one token rule: with RLE enabled, a byte above
//! 0xC0 is a run marker whose low bits give the run length and whose
//! following byte is the repeated value; any other byte is a single literal.

use crate::common::PCX_RUN_THRESHOLD;

/// Output channel for each decoded color plane of a 24-bit scanline
///
/// Planes arrive red, green, blue and are written to byte offsets 2, 1, 0
/// of each pixel, so pixels are stored blue, green, red.
pub const PLANE_TO_CHANNEL: [usize; 3] = [2, 1, 0];

/// Token reader over the encoded pixel stream
#[derive(Debug)]
pub struct ScanlineReader<'a> {
    data: &'a [u8],
    pos: usize,
    end: usize,
    rle: bool,
}

impl<'a> ScanlineReader<'a> {
    /// Read tokens from `data[start..end]`
    ///
    /// `end` bounds where a token may *start*; the value byte of a run may
    /// lie past it as long as it is inside `data`.
    pub fn new(data: &'a [u8], start: usize, end: usize, rle: bool) -> Self {
        Self {
            data,
            pos: start,
            end: end.min(data.len()),
            rle,
        }
    }

    /// Current offset into the buffer
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Next `(value, count)` token, or `None` once the stream is exhausted
    pub fn next_run(&mut self) -> Option<(u8, usize)> {
        if self.pos >= self.end {
            return None;
        }
        let byte = self.data[self.pos];
        self.pos += 1;

        if self.rle && byte > PCX_RUN_THRESHOLD {
            let value = *self.data.get(self.pos)?;
            self.pos += 1;
            Some((value, usize::from(byte - PCX_RUN_THRESHOLD)))
        } else {
            Some((byte, 1))
        }
    }
}

/// Decode one palette-indexed scanline of `bytes_per_line` bytes
///
/// A run crossing the end of the line is cut at the line end.
pub fn decode_indexed_line(reader: &mut ScanlineReader<'_>, bytes_per_line: usize) -> Vec<u8> {
    let mut line = vec![0u8; bytes_per_line];
    let mut col = 0;

    while col < bytes_per_line {
        let Some((value, count)) = reader.next_run() else {
            break;
        };
        let end = (col + count).min(bytes_per_line);
        line[col..end].fill(value);
        col += count;
    }

    line
}

/// Decode one 24-bit scanline made of three planes of `bytes_per_line` bytes
///
/// The result is interleaved, three bytes per column, channels placed by
/// [`PLANE_TO_CHANNEL`]. A run longer than the rest of a plane continues
/// in the next plane.
pub fn decode_rgb_line(reader: &mut ScanlineReader<'_>, bytes_per_line: usize) -> Vec<u8> {
    let mut line = vec![0u8; bytes_per_line * 3];
    if bytes_per_line == 0 {
        return line;
    }

    let mut plane = 0;
    let mut col = 0;

    'planes: while plane < PLANE_TO_CHANNEL.len() {
        let Some((value, count)) = reader.next_run() else {
            break;
        };

        for _ in 0..count {
            if col >= bytes_per_line {
                plane += 1;
                col = 0;
                if plane >= PLANE_TO_CHANNEL.len() {
                    break 'planes;
                }
            }
            line[col * 3 + PLANE_TO_CHANNEL[plane]] = value;
            col += 1;
        }

        if col >= bytes_per_line {
            plane += 1;
            col = 0;
        }
    }

    line
}
