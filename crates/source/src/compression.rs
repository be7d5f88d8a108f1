//! Transparent decompression of compressed sidecar files.

use crate::error::{ErrorKind, Result};
use bzip2::read::BzDecoder;
use exn::ResultExt;
use flate2::read::GzDecoder;
use std::io::Read;
use std::path::Path;
use tracing::instrument;

/// Compression formats recognised by file extension.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Compression {
    /// Uncompressed
    #[default]
    None,
    /// Bzip2 compression (.bz2)
    Bzip2,
    /// Gzip compression (.gz)
    Gzip,
}
impl Compression {
    /// Detect compression from a file extension.
    #[must_use]
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| match ext.to_lowercase().as_str() {
                "bz2" => Compression::Bzip2,
                "gz" => Compression::Gzip,
                _ => Compression::None,
            })
            .unwrap_or(Compression::None)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Compression::None => "none",
            Compression::Bzip2 => "bzip2",
            Compression::Gzip => "gzip",
        }
    }

    /// Decompress a whole buffer in memory. Uncompressed input is returned as-is.
    #[instrument(level = "trace", skip(input), fields(format = self.as_str(), input_size = input.len()))]
    pub fn decompress(&self, input: Vec<u8>) -> Result<Vec<u8>> {
        let mut output = Vec::new();
        let read = match self {
            Compression::None => return Ok(input),
            Compression::Bzip2 => BzDecoder::new(input.as_slice()).read_to_end(&mut output),
            Compression::Gzip => GzDecoder::new(input.as_slice()).read_to_end(&mut output),
        };
        read.or_raise(|| ErrorKind::Decompression(self.as_str().to_string()))?;
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::{Compression as GzLevel, write::GzEncoder};
    use rstest::rstest;
    use std::io::Write;

    #[rstest]
    #[case("movie.nfo", Compression::None)]
    #[case("movie.nfo.gz", Compression::Gzip)]
    #[case("movie.nfo.GZ", Compression::Gzip)]
    #[case("movie.nfo.bz2", Compression::Bzip2)]
    // A dotfile with no extension is not compressed.
    #[case(".gz", Compression::None)]
    #[case("no-extension", Compression::None)]
    fn test_from_path(#[case] path: &str, #[case] expected: Compression) {
        assert_eq!(Compression::from_path(path), expected);
    }

    #[test]
    fn test_gzip_decompresses() {
        let mut encoder = GzEncoder::new(Vec::new(), GzLevel::default());
        encoder.write_all(b"Title: Inception").unwrap();
        let compressed = encoder.finish().unwrap();
        let plain = Compression::Gzip.decompress(compressed).unwrap();
        assert_eq!(plain, b"Title: Inception");
    }

    #[test]
    fn test_garbage_fails_to_decompress() {
        let result = Compression::Bzip2.decompress(b"definitely not bzip2".to_vec());
        assert!(matches!(&*result.unwrap_err(), ErrorKind::Decompression(_)));
    }

    #[test]
    fn test_none_passes_through() {
        assert_eq!(Compression::None.decompress(b"abc".to_vec()).unwrap(), b"abc");
    }
}
