//! daoc-assets - decoders for Dark Age of Camelot client resources
//!
//! This crate provides pure Rust decoders for the two binary formats the game
//! client ships its resources in: the MPAK archive container (obfuscated
//! header, CRC32-checked, zlib-compressed directory and payloads) and PCX
//! raster images (8-bit indexed and 24-bit, optionally run-length encoded).
//!
//! Both decoders are read-only and work on whole buffers. Construction
//! either yields a fully validated value or fails; once an [`Archive`] or a
//! [`DecodedImage`] exists, queries on it cannot fail for structural reasons.
//!
//! # Features
//!
//! - Case-insensitive entry lookup with directory and per-entry CRC checks
//! - Declared-length verification of every decompressed entry
//! - 8-bit palette and 24-bit PCX decoding, RLE or literal
//! - `async` feature: tokio-based concurrent batch decoding
//! - `image` feature: conversion into `image::RgbImage`
//!
//! # Example - Archives
//!
//! ```no_run
//! use daoc_assets::Archive;
//!
//! let archive = Archive::open("zones/zone000.mpk")?;
//! println!("{} holds {} entries", archive.name(), archive.len());
//!
//! if let Some(data) = archive.get("Terrain.PCX") {
//!     println!("terrain map is {} bytes", data.len());
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Example - Images
//!
//! ```no_run
//! use daoc_assets::{decode_pcx, Archive};
//!
//! let archive = Archive::open("zones/zone000.mpk")?;
//! let bytes = archive.get("terrain.pcx").ok_or("missing terrain map")?;
//! let image = decode_pcx(bytes)?;
//! let color = image.pixel(0, 0).ok_or("empty image")?;
//! println!("{}x{}, first pixel {:?}", image.width(), image.height(), color);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

// Public modules
pub mod archive;
pub mod common;
pub mod crc32;
pub mod error;
pub mod pcx;

// Async modules (only available with async feature)
#[cfg(feature = "async")]
pub mod async_batch;
#[cfg(feature = "async")]
pub mod async_convenience;

// Re-export commonly used types
pub use archive::{open_archive, Archive, Entry};
pub use common::{AssetError, ErrorKind, Result};
pub use crc32::crc32;
pub use pcx::{decode_pcx, DecodedImage, PcxDecoder, PcxHeader, PixelFormat, Rgb};

// Re-export async types when async feature is enabled
#[cfg(feature = "async")]
pub use async_batch::AsyncBatchDecoder;
#[cfg(feature = "async")]
pub use async_convenience::*;
