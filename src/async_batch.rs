//! Async batch decoding module
//!
//! This module decodes many independent inputs concurrently. Every decode
//! owns its buffer, so nothing is shared between tasks.

#[cfg(feature = "async")]
/// Concurrent decoding with a configurable concurrency limit
pub mod processor {
    use crate::archive::Archive;
    use crate::async_convenience::functions::{read_input, run_blocking};
    use crate::pcx::{decode_pcx, DecodedImage};
    use crate::Result;
    use futures::stream::{self, StreamExt};
    use std::path::{Path, PathBuf};

    /// Concurrent decoder for archives and images
    ///
    /// Results are reported per input, so one corrupt file does not abort
    /// the rest of the batch.
    #[derive(Debug, Clone)]
    pub struct AsyncBatchDecoder {
        concurrency_limit: usize,
    }

    impl AsyncBatchDecoder {
        /// Create a new batch decoder sized to the number of CPUs
        pub fn new() -> Self {
            Self {
                concurrency_limit: num_cpus::get(),
            }
        }

        /// Set the concurrency limit (at least 1)
        pub fn with_concurrency(mut self, limit: usize) -> Self {
            self.concurrency_limit = limit.max(1);
            self
        }

        /// Current concurrency limit
        pub fn concurrency(&self) -> usize {
            self.concurrency_limit
        }

        /// Open many archives concurrently
        pub async fn open_archives<P: AsRef<Path>>(
            &self,
            paths: Vec<P>,
        ) -> Vec<(PathBuf, Result<Archive>)> {
            log::debug!(
                "Opening {} archives, concurrency {}",
                paths.len(),
                self.concurrency_limit
            );

            stream::iter(paths.into_iter().map(|path| {
                let path = path.as_ref().to_path_buf();
                async move {
                    let result = match read_input(&path).await {
                        Ok(data) => run_blocking(move || Archive::from_bytes(&data)).await,
                        Err(e) => Err(e),
                    };
                    (path, result)
                }
            }))
            .buffer_unordered(self.concurrency_limit)
            .collect()
            .await
        }

        /// Decode many PCX files concurrently
        pub async fn decode_pcx_files<P: AsRef<Path>>(
            &self,
            paths: Vec<P>,
        ) -> Vec<(PathBuf, Result<DecodedImage>)> {
            stream::iter(paths.into_iter().map(|path| {
                let path = path.as_ref().to_path_buf();
                async move {
                    let result = match read_input(&path).await {
                        Ok(data) => run_blocking(move || decode_pcx(&data)).await,
                        Err(e) => Err(e),
                    };
                    (path, result)
                }
            }))
            .buffer_unordered(self.concurrency_limit)
            .collect()
            .await
        }

        /// Decode named in-memory PCX buffers concurrently, e.g. archive entries
        pub async fn decode_pcx_buffers(
            &self,
            buffers: Vec<(String, Vec<u8>)>,
        ) -> Vec<(String, Result<DecodedImage>)> {
            stream::iter(buffers.into_iter().map(|(name, data)| async move {
                let result = run_blocking(move || decode_pcx(&data)).await;
                (name, result)
            }))
            .buffer_unordered(self.concurrency_limit)
            .collect()
            .await
        }
    }

    impl Default for AsyncBatchDecoder {
        fn default() -> Self {
            Self::new()
        }
    }
}

#[cfg(feature = "async")]
pub use processor::AsyncBatchDecoder;
