//! Async convenience functions
//!
//! This module provides easy-to-use async functions that read archives and
//! images with `tokio::fs` and run the CPU-bound decode on the blocking pool.

#[cfg(feature = "async")]
/// Async file-level decode helpers
pub mod functions {
    use crate::archive::Archive;
    use crate::pcx::{decode_pcx, DecodedImage};
    use crate::{AssetError, Result};
    use std::path::{Path, PathBuf};

    /// Open and decode an archive from disk
    pub async fn open_archive_async<P: AsRef<Path>>(path: P) -> Result<Archive> {
        let data = read_input(path.as_ref()).await?;
        run_blocking(move || Archive::from_bytes(&data)).await
    }

    /// Decode a PCX image from disk
    pub async fn decode_pcx_file_async<P: AsRef<Path>>(path: P) -> Result<DecodedImage> {
        let data = read_input(path.as_ref()).await?;
        decode_pcx_async(data).await
    }

    /// Decode a PCX image from an owned buffer
    pub async fn decode_pcx_async(data: Vec<u8>) -> Result<DecodedImage> {
        run_blocking(move || decode_pcx(&data)).await
    }

    /// Open several archives concurrently
    pub async fn open_archives<P: AsRef<Path>>(
        paths: Vec<P>,
        concurrency: Option<usize>,
    ) -> Vec<(PathBuf, Result<Archive>)> {
        use crate::async_batch::AsyncBatchDecoder;

        let mut decoder = AsyncBatchDecoder::new();
        if let Some(limit) = concurrency {
            decoder = decoder.with_concurrency(limit);
        }

        decoder.open_archives(paths).await
    }

    /// Read a whole input file, mapping a missing file to `NotFound`
    pub(crate) async fn read_input(path: &Path) -> Result<Vec<u8>> {
        if path.as_os_str().is_empty() {
            return Err(AssetError::InvalidArgument("input path is empty".to_string()));
        }
        match tokio::fs::metadata(path).await {
            Ok(meta) if meta.is_file() => {}
            _ => return Err(AssetError::NotFound(path.to_path_buf())),
        }
        Ok(tokio::fs::read(path).await?)
    }

    /// Run a decode on the blocking thread pool
    pub(crate) async fn run_blocking<T, F>(decode: F) -> Result<T>
    where
        F: FnOnce() -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        tokio::task::spawn_blocking(decode)
            .await
            .map_err(|e| AssetError::Io(std::io::Error::other(e)))?
    }
}

#[cfg(feature = "async")]
pub use functions::*;
