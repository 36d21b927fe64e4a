//! Decoded image representation

use super::scanline::PLANE_TO_CHANNEL;
use crate::common::PCX_PALETTE_ENTRIES;

/// Pixel layout of a decoded image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// One palette index per pixel
    Indexed8,
    /// Three bytes per pixel, stored blue, green, red
    Rgb24,
}

impl PixelFormat {
    /// Map the header color plane count to a format
    pub fn from_color_planes(planes: u8) -> Option<Self> {
        match planes {
            1 => Some(PixelFormat::Indexed8),
            3 => Some(PixelFormat::Rgb24),
            _ => None,
        }
    }

    /// Bytes each pixel occupies in the pixel buffer
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            PixelFormat::Indexed8 => 1,
            PixelFormat::Rgb24 => 3,
        }
    }
}

/// An RGB color
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Rgb {
    /// Red
    pub r: u8,
    /// Green
    pub g: u8,
    /// Blue
    pub b: u8,
}

impl Rgb {
    /// Build a color from its components
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// A fully decoded PCX image
///
/// `pixels` is row-major with `stride()` bytes per row and no padding.
/// Indexed images always carry a 256-entry palette.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    width: u32,
    height: u32,
    format: PixelFormat,
    pixels: Vec<u8>,
    palette: Option<Box<[Rgb; PCX_PALETTE_ENTRIES]>>,
}

impl DecodedImage {
    pub(crate) fn new(
        width: u32,
        height: u32,
        format: PixelFormat,
        pixels: Vec<u8>,
        palette: Option<Box<[Rgb; PCX_PALETTE_ENTRIES]>>,
    ) -> Self {
        debug_assert_eq!(
            pixels.len(),
            width as usize * format.bytes_per_pixel() * height as usize
        );
        debug_assert_eq!(palette.is_some(), format == PixelFormat::Indexed8);
        Self {
            width,
            height,
            format,
            pixels,
            palette,
        }
    }

    /// Width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixel layout
    pub fn pixel_format(&self) -> PixelFormat {
        self.format
    }

    /// Bytes per row
    pub fn stride(&self) -> usize {
        self.width as usize * self.format.bytes_per_pixel()
    }

    /// Raw pixel buffer
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Color table of an indexed image
    pub fn palette(&self) -> Option<&[Rgb; PCX_PALETTE_ENTRIES]> {
        self.palette.as_deref()
    }

    /// Raw bytes of row `y`
    pub fn row(&self, y: u32) -> Option<&[u8]> {
        if y >= self.height {
            return None;
        }
        let stride = self.stride();
        let start = y as usize * stride;
        Some(&self.pixels[start..start + stride])
    }

    /// Palette index at `(x, y)` of an indexed image
    pub fn index_at(&self, x: u32, y: u32) -> Option<u8> {
        if self.format != PixelFormat::Indexed8 || x >= self.width {
            return None;
        }
        self.row(y).map(|row| row[x as usize])
    }

    /// Resolved color at `(x, y)`
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb> {
        if x >= self.width {
            return None;
        }
        let row = self.row(y)?;
        match self.format {
            PixelFormat::Indexed8 => {
                let palette = self.palette.as_deref()?;
                Some(palette[usize::from(row[x as usize])])
            }
            PixelFormat::Rgb24 => {
                let px = &row[x as usize * 3..x as usize * 3 + 3];
                Some(Rgb::new(
                    px[PLANE_TO_CHANNEL[0]],
                    px[PLANE_TO_CHANNEL[1]],
                    px[PLANE_TO_CHANNEL[2]],
                ))
            }
        }
    }

    /// Expand to tightly packed R, G, B bytes
    pub fn to_rgb8(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.width as usize * self.height as usize * 3);
        for y in 0..self.height {
            for x in 0..self.width {
                let Rgb { r, g, b } = self.pixel(x, y).unwrap_or_default();
                out.extend_from_slice(&[r, g, b]);
            }
        }
        out
    }

    /// Convert into an `image` crate RGB buffer
    #[cfg(feature = "image")]
    pub fn to_rgb_image(&self) -> image::RgbImage {
        image::RgbImage::from_fn(self.width, self.height, |x, y| {
            let Rgb { r, g, b } = self.pixel(x, y).unwrap_or_default();
            image::Rgb([r, g, b])
        })
    }
}
