//! PCX image decoder
//!
//! Supports the two variants found in the client data: 8-bit palette
//! indexed images (one color plane, 256-color palette appended to the file)
//! and 24-bit images (three color planes per scanline), each optionally run
//! length encoded.
//!
//! The pixel format is chosen from the color plane count at header offset
//! 65. The bits-per-pixel byte at offset 3 is parsed but never consulted.
//! Only 1 and 3 planes are accepted. Other counts are rejected on purpose
//! rather than decoded as 24-bit, as a lenient reader would.

mod decoder;
mod header;
mod image;
mod scanline;

pub use decoder::PcxDecoder;
pub use header::PcxHeader;
pub use image::{DecodedImage, PixelFormat, Rgb};
pub use scanline::PLANE_TO_CHANNEL;

use crate::Result;

/// Convenience function to decode a PCX image held in memory
pub fn decode_pcx(data: &[u8]) -> Result<DecodedImage> {
    PcxDecoder::from_bytes(data).map(PcxDecoder::into_image)
}
