//! Chunked inflate primitive
//!
//! Every compressed blob in an MPAK archive (name, directory, payloads) is a
//! zlib stream. The inflater is fed at most [`INFLATE_CHUNK_SIZE`] input
//! bytes at a time and drained into an output chunk of the same size until
//! the stream reports its end.
//!
//! Running out of input before the end of the stream is *not* an error here:
//! the bytes produced so far are returned with `finished == false`. The
//! archive name relies on this; payloads are protected by their length check.

use crate::common::{AssetError, Result, INFLATE_CHUNK_SIZE};
use flate2::{Decompress, FlushDecompress, Status};

/// Output of [`inflate`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inflated {
    /// Decompressed bytes, possibly partial
    pub data: Vec<u8>,
    /// Whether the stream end marker was reached
    pub finished: bool,
}

/// Inflate a complete zlib stream held in memory
///
/// `context` names the blob in log and error messages.
pub fn inflate(src: &[u8], context: &str) -> Result<Inflated> {
    inflate_limited(src, context, usize::MAX)
}

/// Inflate at most `max_output` bytes of a zlib stream
///
/// Decoding stops once the output grows past `max_output`; the result is
/// then cut to `max_output` bytes and reported as not finished.
pub fn inflate_limited(src: &[u8], context: &str, max_output: usize) -> Result<Inflated> {
    let mut inflater = Decompress::new(true);
    let mut out_chunk = [0u8; INFLATE_CHUNK_SIZE];
    let mut data = Vec::with_capacity(src.len().saturating_mul(2).min(max_output));
    let mut in_pos = 0usize;

    loop {
        let in_end = (in_pos + INFLATE_CHUNK_SIZE).min(src.len());
        let total_in = inflater.total_in();
        let total_out = inflater.total_out();

        let status = inflater
            .decompress(&src[in_pos..in_end], &mut out_chunk, FlushDecompress::None)
            .map_err(|e| AssetError::InvalidFormat(format!("corrupt deflate stream in {context}: {e}")))?;

        let consumed = (inflater.total_in() - total_in) as usize;
        let produced = (inflater.total_out() - total_out) as usize;
        in_pos += consumed;
        data.extend_from_slice(&out_chunk[..produced]);

        if data.len() > max_output {
            log::debug!("{context}: output limit of {max_output} bytes reached");
            data.truncate(max_output);
            return Ok(Inflated {
                data,
                finished: false,
            });
        }

        if status == Status::StreamEnd {
            return Ok(Inflated {
                data,
                finished: true,
            });
        }

        if consumed == 0 && produced == 0 {
            if in_pos >= src.len() {
                log::warn!(
                    "{context}: input exhausted before end of deflate stream, keeping {} bytes",
                    data.len()
                );
                return Ok(Inflated {
                    data,
                    finished: false,
                });
            }
            return Err(AssetError::InvalidFormat(format!(
                "deflate stream in {context} stalled at byte {in_pos}"
            )));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::ZlibEncoder;
    use flate2::Compression;
    use std::io::Write;

    fn deflate(data: &[u8]) -> Vec<u8> {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap()
    }

    #[test]
    fn test_inflate_small() {
        let out = inflate(&deflate(b"Hello World !"), "test").unwrap();
        assert!(out.finished);
        assert_eq!(out.data, b"Hello World !");
    }

    #[test]
    fn test_inflate_spans_many_chunks() {
        // Incompressible-ish data so the compressed form exceeds one input chunk
        let original: Vec<u8> = (0..20_000u32)
            .map(|i| (i.wrapping_mul(2_654_435_761) >> 13) as u8)
            .collect();
        let compressed = deflate(&original);
        assert!(compressed.len() > INFLATE_CHUNK_SIZE);

        let out = inflate(&compressed, "test").unwrap();
        assert!(out.finished);
        assert_eq!(out.data, original);
    }

    #[test]
    fn test_inflate_highly_compressible() {
        // Output is many times larger than the output chunk
        let original = vec![b'A'; 100_000];
        let out = inflate(&deflate(&original), "test").unwrap();
        assert!(out.finished);
        assert_eq!(out.data.len(), original.len());
    }

    #[test]
    fn test_truncated_input_is_soft_stop() {
        let original: Vec<u8> = (0..4096u32).map(|i| (i * 7 % 251) as u8).collect();
        let compressed = deflate(&original);
        let cut = &compressed[..compressed.len() / 2];

        let out = inflate(cut, "test").unwrap();
        assert!(!out.finished);
        assert!(out.data.len() < original.len());
        assert_eq!(&original[..out.data.len()], &out.data[..]);
    }

    #[test]
    fn test_empty_input() {
        let out = inflate(&[], "test").unwrap();
        assert!(!out.finished);
        assert!(out.data.is_empty());
    }

    #[test]
    fn test_output_limit_stops_early() {
        let compressed = deflate(&vec![0u8; 1 << 20]);

        let out = inflate_limited(&compressed, "bomb", 11).unwrap();
        assert!(!out.finished);
        assert_eq!(out.data.len(), 11);

        // A limit equal to the real size still sees the stream end
        let out = inflate_limited(&deflate(b"Hello World !"), "test", 13).unwrap();
        assert!(out.finished);
        assert_eq!(out.data, b"Hello World !");
    }

    #[test]
    fn test_garbage_is_invalid_format() {
        let err = inflate(&[0xFF, 0xFF, 0xFF, 0xFF], "garbage").unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::InvalidFormat);
    }
}
