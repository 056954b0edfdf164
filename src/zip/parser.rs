//! Low-level ZIP archive parser.
//!
//! This module handles the binary parsing of ZIP file structures,
//! reading from any source that implements the [`ReadAt`] trait.
//!
//! ## Parsing Strategy
//!
//! ZIP files are designed to be read from the end:
//! 1. Find the End of Central Directory (EOCD) at the file's end
//! 2. If ZIP64, read the ZIP64 EOCD for large file support
//! 3. Read the Central Directory to get metadata for all files
//! 4. For extraction, read each file's Local File Header and data
//!
//! Entries are returned in Central Directory order, which is the order
//! extraction visits them in.

use byteorder::{LittleEndian, ReadBytesExt};
use std::io::{Cursor, Read};
use std::sync::Arc;

use crate::io::ReadAt;
use anyhow::{Context, Result};

use super::structures::*;

/// Maximum ZIP comment size allowed by the format (65535 bytes).
///
/// This limits the search area when looking for EOCD with a comment.
const MAX_COMMENT_SIZE: u64 = 65535;

/// Low-level ZIP file parser.
///
/// Typically used through [`ZipExtractor`](super::ZipExtractor)
/// rather than directly.
pub struct ZipParser<R: ReadAt> {
    /// The underlying data source
    reader: Arc<R>,
    /// Total size of the archive in bytes
    size: u64,
}

impl<R: ReadAt> ZipParser<R> {
    pub fn new(reader: Arc<R>) -> Self {
        let size = reader.size();
        Self { reader, size }
    }

    /// Find and parse the End of Central Directory record.
    ///
    /// Tries the no-comment layout first, then searches backwards through
    /// the last 64 KiB for a record whose comment length matches.
    ///
    /// # Returns
    ///
    /// A tuple of (EOCD record, offset of EOCD in file).
    pub async fn find_eocd(&self) -> Result<(EndOfCentralDirectory, u64)> {
        if self.size >= EndOfCentralDirectory::SIZE as u64 {
            let offset = self.size - EndOfCentralDirectory::SIZE as u64;
            let mut buf = vec![0u8; EndOfCentralDirectory::SIZE];
            self.reader.read_exact_at(offset, &mut buf).await?;

            if &buf[0..4] == EndOfCentralDirectory::SIGNATURE && &buf[20..22] == b"\x00\x00" {
                let eocd = EndOfCentralDirectory::from_bytes(&buf)?;
                return Ok((eocd, offset));
            }
        }

        let search_size = (MAX_COMMENT_SIZE + EndOfCentralDirectory::SIZE as u64).min(self.size);
        let search_start = self.size - search_size;

        let mut buf = vec![0u8; search_size as usize];
        self.reader.read_exact_at(search_start, &mut buf).await?;

        // The no-comment position was already checked above
        for i in (0..buf.len().saturating_sub(EndOfCentralDirectory::SIZE)).rev() {
            if &buf[i..i + 4] == EndOfCentralDirectory::SIGNATURE {
                let comment_len = u16::from_le_bytes([buf[i + 20], buf[i + 21]]) as usize;

                if comment_len == buf.len() - i - EndOfCentralDirectory::SIZE {
                    let eocd = EndOfCentralDirectory::from_bytes(
                        &buf[i..i + EndOfCentralDirectory::SIZE],
                    )?;
                    return Ok((eocd, search_start + i as u64));
                }
            }
        }

        Err(invalid("not a valid ZIP file"))
    }

    /// Read the ZIP64 End of Central Directory record.
    ///
    /// Called when the regular EOCD has saturated fields (0xFFFF or
    /// 0xFFFFFFFF). The locator sits immediately before the regular EOCD.
    pub async fn read_zip64_eocd(&self, eocd_offset: u64) -> Result<Zip64EOCD> {
        let locator_offset = eocd_offset
            .checked_sub(Zip64EOCDLocator::SIZE as u64)
            .ok_or_else(|| invalid("missing ZIP64 end of central directory locator"))?;
        let mut locator_buf = vec![0u8; Zip64EOCDLocator::SIZE];
        self.reader
            .read_exact_at(locator_offset, &mut locator_buf)
            .await?;

        let locator = Zip64EOCDLocator::from_bytes(&locator_buf)?;

        let mut eocd64_buf = vec![0u8; Zip64EOCD::MIN_SIZE];
        self.reader
            .read_exact_at(locator.eocd64_offset, &mut eocd64_buf)
            .await?;

        Zip64EOCD::from_bytes(&eocd64_buf)
    }

    /// List all entries in the ZIP archive, in Central Directory order.
    pub async fn list_files(&self) -> Result<Vec<ZipFileEntry>> {
        let (eocd, eocd_offset) = self.find_eocd().await?;

        let (cd_offset, cd_size, total_entries) = if eocd.is_zip64() {
            let eocd64 = self.read_zip64_eocd(eocd_offset).await?;
            (eocd64.cd_offset, eocd64.cd_size, eocd64.total_entries)
        } else {
            (
                eocd.cd_offset as u64,
                eocd.cd_size as u64,
                eocd.total_entries as u64,
            )
        };

        if cd_offset.checked_add(cd_size).is_none_or(|end| end > self.size) {
            return Err(invalid(format!(
                "central directory ({cd_size} bytes at offset {cd_offset}) extends past end of archive"
            )));
        }
        // Each header is at least CDFH_MIN_SIZE bytes, which also caps the
        // allocation below for corrupt entry counts.
        if total_entries > cd_size / CDFH_MIN_SIZE as u64 {
            return Err(invalid(format!(
                "central directory too small for {total_entries} entries"
            )));
        }

        let mut cd_data = vec![0u8; cd_size as usize];
        self.reader.read_exact_at(cd_offset, &mut cd_data).await?;

        let mut entries = Vec::with_capacity(total_entries as usize);
        let mut cursor = Cursor::new(&cd_data);

        for index in 0..total_entries {
            let entry = self
                .parse_cdfh(&mut cursor)
                .with_context(|| format!("malformed central directory entry #{index}"))?;
            entries.push(entry);
        }

        Ok(entries)
    }

    /// Parse a Central Directory File Header from a cursor.
    fn parse_cdfh(&self, cursor: &mut Cursor<&Vec<u8>>) -> Result<ZipFileEntry> {
        let mut sig = [0u8; 4];
        cursor.read_exact(&mut sig)?;
        if sig != CDFH_SIGNATURE {
            return Err(invalid("bad central directory file header"));
        }

        let version_made_by = cursor.read_u16::<LittleEndian>()?;
        let _version_needed = cursor.read_u16::<LittleEndian>()?;
        let flags = cursor.read_u16::<LittleEndian>()?;
        let compression_method = cursor.read_u16::<LittleEndian>()?;
        let last_mod_time = cursor.read_u16::<LittleEndian>()?;
        let last_mod_date = cursor.read_u16::<LittleEndian>()?;
        let crc32 = cursor.read_u32::<LittleEndian>()?;
        let mut compressed_size = cursor.read_u32::<LittleEndian>()? as u64;
        let mut uncompressed_size = cursor.read_u32::<LittleEndian>()? as u64;
        let file_name_length = cursor.read_u16::<LittleEndian>()?;
        let extra_field_length = cursor.read_u16::<LittleEndian>()?;
        let file_comment_length = cursor.read_u16::<LittleEndian>()?;
        let _disk_number_start = cursor.read_u16::<LittleEndian>()?;
        let _internal_attrs = cursor.read_u16::<LittleEndian>()?;
        let external_attrs = cursor.read_u32::<LittleEndian>()?;
        let mut lfh_offset = cursor.read_u32::<LittleEndian>()? as u64;

        let mut file_name_bytes = vec![0u8; file_name_length as usize];
        cursor.read_exact(&mut file_name_bytes)?;
        // Non-UTF8 names are kept lossily; they only need to be matched and joined
        let file_name = String::from_utf8_lossy(&file_name_bytes).to_string();

        let is_directory = file_name.ends_with('/');

        // ZIP64 extended information lives in extra field 0x0001
        let extra_field_end = cursor.position() + extra_field_length as u64;

        while cursor.position() + 4 <= extra_field_end {
            let header_id = cursor.read_u16::<LittleEndian>()?;
            let field_size = cursor.read_u16::<LittleEndian>()?;
            let field_end = cursor.position() + field_size as u64;

            if header_id == 0x0001 {
                // Fields are present only if the header field is saturated
                if uncompressed_size == 0xFFFFFFFF && cursor.position() + 8 <= field_end {
                    uncompressed_size = cursor.read_u64::<LittleEndian>()?;
                }
                if compressed_size == 0xFFFFFFFF && cursor.position() + 8 <= field_end {
                    compressed_size = cursor.read_u64::<LittleEndian>()?;
                }
                if lfh_offset == 0xFFFFFFFF && cursor.position() + 8 <= field_end {
                    lfh_offset = cursor.read_u64::<LittleEndian>()?;
                }
            }
            cursor.set_position(field_end);
        }

        cursor.set_position(extra_field_end + file_comment_length as u64);

        Ok(ZipFileEntry {
            file_name,
            compression_method: CompressionMethod::from_u16(compression_method),
            compressed_size,
            uncompressed_size,
            crc32,
            lfh_offset,
            last_mod_time,
            last_mod_date,
            is_directory,
            version_made_by,
            flags,
            external_attrs,
        })
    }

    /// Get the actual data offset for a file entry.
    ///
    /// The Local File Header has its own name and extra field lengths,
    /// which may differ from the Central Directory copy.
    pub async fn get_data_offset(&self, entry: &ZipFileEntry) -> Result<u64> {
        let mut lfh_buf = vec![0u8; LFH_SIZE];
        self.reader
            .read_exact_at(entry.lfh_offset, &mut lfh_buf)
            .await
            .with_context(|| format!("failed to read local header of {}", entry.file_name))?;

        if &lfh_buf[0..4] != LFH_SIGNATURE {
            return Err(invalid(format!(
                "bad local file header for {}",
                entry.file_name
            )));
        }

        let mut cursor = Cursor::new(&lfh_buf);
        cursor.set_position(26); // Offset to filename length field

        let file_name_length = cursor.read_u16::<LittleEndian>()? as u64;
        let extra_field_length = cursor.read_u16::<LittleEndian>()? as u64;

        let data_offset =
            entry.lfh_offset + LFH_SIZE as u64 + file_name_length + extra_field_length;

        if data_offset
            .checked_add(entry.compressed_size)
            .is_none_or(|end| end > self.size)
        {
            return Err(invalid(format!(
                "data of {} extends past end of archive",
                entry.file_name
            )));
        }

        Ok(data_offset)
    }

    pub fn reader(&self) -> &Arc<R> {
        &self.reader
    }
}
