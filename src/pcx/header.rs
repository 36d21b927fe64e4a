//! Fixed 128-byte PCX header

use super::image::PixelFormat;
use crate::common::{AssetError, Result, PCX_HEADER_SIZE, PCX_MAGIC};

/// Parsed PCX header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PcxHeader {
    /// Manufacturer byte, always 0x0A
    pub manufacturer: u8,
    /// Paintbrush version
    pub version: u8,
    /// Nonzero when scanlines may contain runs
    pub encoding: u8,
    /// Bits per pixel per plane; informational only
    pub bits_per_pixel: u8,
    /// Left edge of the image bounding box
    pub xmin: u16,
    /// Top edge of the image bounding box
    pub ymin: u16,
    /// Right edge of the image bounding box, inclusive
    pub xmax: u16,
    /// Bottom edge of the image bounding box, inclusive
    pub ymax: u16,
    /// Horizontal resolution
    pub hres: u16,
    /// Vertical resolution
    pub vres: u16,
    /// 16-color EGA palette, unused by the decoder
    pub ega_palette: [u8; 48],
    /// Reserved byte
    pub reserved: u8,
    /// Number of color planes; selects the pixel format
    pub color_planes: u8,
    /// Decoded bytes per scanline per plane
    pub bytes_per_line: u16,
    /// Palette interpretation hint
    pub palette_type: u16,
}

impl PcxHeader {
    /// Parse the header at the start of a PCX buffer
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < PCX_HEADER_SIZE {
            return Err(AssetError::InvalidArgument(format!(
                "PCX buffer is {} bytes, shorter than the {PCX_HEADER_SIZE}-byte header",
                data.len()
            )));
        }
        if data[0] != PCX_MAGIC {
            return Err(AssetError::InvalidFormat(format!(
                "PCX magic byte is {:#04X} instead of {PCX_MAGIC:#04X}",
                data[0]
            )));
        }

        let word = |at: usize| u16::from_le_bytes([data[at], data[at + 1]]);
        let mut ega_palette = [0u8; 48];
        ega_palette.copy_from_slice(&data[16..64]);

        Ok(Self {
            manufacturer: data[0],
            version: data[1],
            encoding: data[2],
            bits_per_pixel: data[3],
            xmin: word(4),
            ymin: word(6),
            xmax: word(8),
            ymax: word(10),
            hres: word(12),
            vres: word(14),
            ega_palette,
            reserved: data[64],
            color_planes: data[65],
            bytes_per_line: word(66),
            palette_type: word(68),
        })
    }

    /// Whether scanlines are run-length encoded
    pub fn is_rle(&self) -> bool {
        self.encoding > 0
    }

    /// Image width, if the bounding box is well formed
    pub fn width(&self) -> Option<u32> {
        extent(self.xmin, self.xmax)
    }

    /// Image height, if the bounding box is well formed
    pub fn height(&self) -> Option<u32> {
        extent(self.ymin, self.ymax)
    }

    /// Pixel format selected by the color plane count
    pub fn pixel_format(&self) -> Result<PixelFormat> {
        PixelFormat::from_color_planes(self.color_planes).ok_or_else(|| {
            AssetError::InvalidFormat(format!(
                "unsupported PCX color plane count {}",
                self.color_planes
            ))
        })
    }
}

fn extent(min: u16, max: u16) -> Option<u32> {
    (max >= min).then(|| u32::from(max - min) + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    fn raw_header() -> Vec<u8> {
        let mut h = vec![0u8; PCX_HEADER_SIZE];
        h[0] = PCX_MAGIC;
        h[1] = 5;
        h[2] = 1;
        h[3] = 8;
        h[4..6].copy_from_slice(&10u16.to_le_bytes());
        h[6..8].copy_from_slice(&20u16.to_le_bytes());
        h[8..10].copy_from_slice(&41u16.to_le_bytes());
        h[10..12].copy_from_slice(&35u16.to_le_bytes());
        h[12..14].copy_from_slice(&72u16.to_le_bytes());
        h[14..16].copy_from_slice(&72u16.to_le_bytes());
        h[65] = 1;
        h[66..68].copy_from_slice(&32u16.to_le_bytes());
        h[68..70].copy_from_slice(&1u16.to_le_bytes());
        h
    }

    #[test]
    fn test_parse_fields() {
        let header = PcxHeader::parse(&raw_header()).unwrap();
        assert_eq!(header.version, 5);
        assert!(header.is_rle());
        assert_eq!(header.bits_per_pixel, 8);
        assert_eq!(header.width(), Some(32));
        assert_eq!(header.height(), Some(16));
        assert_eq!(header.hres, 72);
        assert_eq!(header.bytes_per_line, 32);
        assert_eq!(header.palette_type, 1);
        assert_eq!(header.pixel_format().unwrap(), PixelFormat::Indexed8);
    }

    #[test]
    fn test_bits_per_pixel_does_not_select_format() {
        let mut raw = raw_header();
        raw[3] = 1;
        raw[65] = 3;
        let header = PcxHeader::parse(&raw).unwrap();
        assert_eq!(header.pixel_format().unwrap(), PixelFormat::Rgb24);
    }

    #[test]
    fn test_unsupported_planes() {
        let mut raw = raw_header();
        raw[65] = 4;
        let header = PcxHeader::parse(&raw).unwrap();
        assert_eq!(header.pixel_format().unwrap_err().kind(), ErrorKind::InvalidFormat);
    }

    #[test]
    fn test_inverted_bounding_box() {
        let mut raw = raw_header();
        raw[8..10].copy_from_slice(&0u16.to_le_bytes());
        let header = PcxHeader::parse(&raw).unwrap();
        assert_eq!(header.width(), None);
    }

    #[test]
    fn test_too_short() {
        let raw = raw_header();
        assert_eq!(
            PcxHeader::parse(&raw[..127]).unwrap_err().kind(),
            ErrorKind::InvalidArgument
        );
        assert_eq!(
            PcxHeader::parse(&[]).unwrap_err().kind(),
            ErrorKind::InvalidArgument
        );
    }

    #[test]
    fn test_bad_magic() {
        let mut raw = raw_header();
        raw[0] = 0x0B;
        assert_eq!(
            PcxHeader::parse(&raw).unwrap_err().kind(),
            ErrorKind::InvalidFormat
        );
    }
}
