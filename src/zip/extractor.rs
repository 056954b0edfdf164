use std::io::{Cursor, Read};
use std::sync::Arc;

use flate2::read::DeflateDecoder;

use crate::error::UnzipError;
use crate::io::ReadAt;
use anyhow::{Context, Result};

use super::parser::ZipParser;
use super::structures::{CompressionMethod, ZipFileEntry};

/// ZIP file extractor
///
/// Owns the archive's reader; the archive is released when this is dropped.
pub struct ZipExtractor<R: ReadAt> {
    parser: ZipParser<R>,
}

impl<R: ReadAt> ZipExtractor<R> {
    pub fn new(reader: Arc<R>) -> Self {
        Self {
            parser: ZipParser::new(reader),
        }
    }

    /// List all files in the archive
    pub async fn list_files(&self) -> Result<Vec<ZipFileEntry>> {
        self.parser.list_files().await
    }

    /// Open the content stream of an entry.
    ///
    /// The compressed bytes are read up front; decompression happens as the
    /// returned reader is consumed.
    pub async fn open_entry(&self, entry: &ZipFileEntry) -> Result<EntryReader> {
        if entry.is_encrypted() {
            return Err(UnzipError::Encrypted {
                name: entry.file_name.clone(),
            }
            .into());
        }
        if let CompressionMethod::Unknown(method) = entry.compression_method {
            return Err(UnzipError::UnsupportedCompression {
                name: entry.file_name.clone(),
                method,
            }
            .into());
        }

        let data_offset = self.parser.get_data_offset(entry).await?;

        let mut buf = vec![0u8; entry.compressed_size as usize];
        self.parser
            .reader()
            .read_exact_at(data_offset, &mut buf)
            .await
            .with_context(|| format!("failed to read data of {}", entry.file_name))?;

        EntryReader::new(entry, buf)
    }
}

/// Decoded content of a single entry.
pub enum EntryReader {
    Stored(Cursor<Vec<u8>>),
    Deflate(DeflateDecoder<Cursor<Vec<u8>>>),
}

impl EntryReader {
    pub(crate) fn new(entry: &ZipFileEntry, compressed: Vec<u8>) -> Result<Self> {
        match entry.compression_method {
            CompressionMethod::Stored => Ok(Self::Stored(Cursor::new(compressed))),
            CompressionMethod::Deflate => {
                Ok(Self::Deflate(DeflateDecoder::new(Cursor::new(compressed))))
            }
            CompressionMethod::Unknown(method) => Err(UnzipError::UnsupportedCompression {
                name: entry.file_name.clone(),
                method,
            }
            .into()),
        }
    }
}

impl Read for EntryReader {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        match self {
            Self::Stored(inner) => inner.read(buf),
            Self::Deflate(inner) => inner.read(buf),
        }
    }
}
