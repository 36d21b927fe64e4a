//! Error handling for archive and image decoding
//!
//! This module re-exports the error types used throughout the crate.
//! It uses thiserror for ergonomic error handling and provides
//! structure-specific error variants.

pub use crate::common::AssetError;
pub use crate::common::ErrorKind;
pub use crate::common::Result;
