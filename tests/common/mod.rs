//! Shared helpers for building test archives.

#![allow(dead_code)]

use std::io::Cursor;
use std::io::Write;
use std::path::Path;

use zip::write::SimpleFileOptions;
use zip::write::ZipWriter;

/// One entry of a test archive.
pub enum Entry<'a> {
    File(&'a str, &'a [u8]),
    FileWithMode(&'a str, &'a [u8], u32),
    /// File compressed with DEFLATE.
    Deflated(&'a str, &'a [u8]),
    Dir(&'a str),
}

/// Creates an in-memory ZIP archive. Files are stored uncompressed with mode
/// 0o644 unless a mode is given.
pub fn build_zip(entries: &[Entry<'_>]) -> Vec<u8> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Stored)
        .unix_permissions(0o644);

    for entry in entries {
        match entry {
            Entry::File(name, data) => {
                zip.start_file(*name, options).unwrap();
                zip.write_all(data).unwrap();
            }
            Entry::FileWithMode(name, data, mode) => {
                zip.start_file(*name, options.unix_permissions(*mode)).unwrap();
                zip.write_all(data).unwrap();
            }
            Entry::Deflated(name, data) => {
                let deflated = options.compression_method(zip::CompressionMethod::Deflated);
                zip.start_file(*name, deflated).unwrap();
                zip.write_all(data).unwrap();
            }
            Entry::Dir(name) => {
                zip.add_directory(*name, options.unix_permissions(0o755)).unwrap();
            }
        }
    }

    zip.finish().unwrap().into_inner()
}

/// Shorthand for an archive of text files.
pub fn zip_of(files: &[(&str, &str)]) -> Vec<u8> {
    let entries: Vec<_> = files
        .iter()
        .map(|(name, text)| Entry::File(name, text.as_bytes()))
        .collect();
    build_zip(&entries)
}

/// Appends an archive comment by rewriting the trailing comment length.
///
/// `archive` must end in an end of central directory record without a
/// comment, as `build_zip` produces.
pub fn with_comment(mut archive: Vec<u8>, comment: &[u8]) -> Vec<u8> {
    let len = archive.len();
    assert_eq!(&archive[len - 22..len - 18], b"PK\x05\x06");
    archive[len - 2..].copy_from_slice(&(comment.len() as u16).to_le_bytes());
    archive.extend_from_slice(comment);
    archive
}

/// Offset of the general purpose flags within a central directory header.
pub const CENTRAL_FLAGS: usize = 8;
/// Offset of the compression method within a central directory header.
pub const CENTRAL_METHOD: usize = 10;

/// Overwrites a 16-bit field of the first central directory header.
pub fn patch_central_header(mut archive: Vec<u8>, field: usize, value: u16) -> Vec<u8> {
    let start = archive
        .windows(4)
        .position(|w| w == b"PK\x01\x02")
        .expect("archive has no central directory");
    archive[start + field..start + field + 2].copy_from_slice(&value.to_le_bytes());
    archive
}

/// Hand-assembles a single STORED file archive that uses the ZIP64 end of
/// central directory and ZIP64 sizes and offsets in the central header.
pub fn zip64_archive(name: &str, data: &[u8]) -> Vec<u8> {
    let crc = crc32(data);
    let size = data.len() as u32;
    let mut out = Vec::new();

    // Local file header
    out.extend_from_slice(b"PK\x03\x04");
    out.extend_from_slice(&45u16.to_le_bytes()); // version needed
    out.extend_from_slice(&0u16.to_le_bytes()); // flags
    out.extend_from_slice(&0u16.to_le_bytes()); // method
    out.extend_from_slice(&0u32.to_le_bytes()); // time, date
    out.extend_from_slice(&crc.to_le_bytes());
    out.extend_from_slice(&size.to_le_bytes());
    out.extend_from_slice(&size.to_le_bytes());
    out.extend_from_slice(&(name.len() as u16).to_le_bytes());
    out.extend_from_slice(&0u16.to_le_bytes()); // extra length
    out.extend_from_slice(name.as_bytes());
    out.extend_from_slice(data);

    // Central directory header with every 32-bit field saturated
    let cd_offset = out.len() as u64;
    out.extend_from_slice(b"PK\x01\x02");
    out.extend_from_slice(&((3u16 << 8) | 45).to_le_bytes()); // made by unix
    out.extend_from_slice(&45u16.to_le_bytes());
    out.extend_from_slice(&0u16.to_le_bytes());
    out.extend_from_slice(&0u16.to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes());
    out.extend_from_slice(&crc.to_le_bytes());
    out.extend_from_slice(&u32::MAX.to_le_bytes()); // compressed
    out.extend_from_slice(&u32::MAX.to_le_bytes()); // uncompressed
    out.extend_from_slice(&(name.len() as u16).to_le_bytes());
    out.extend_from_slice(&28u16.to_le_bytes()); // extra length
    out.extend_from_slice(&0u16.to_le_bytes()); // comment length
    out.extend_from_slice(&0u16.to_le_bytes()); // disk start
    out.extend_from_slice(&0u16.to_le_bytes()); // internal attrs
    out.extend_from_slice(&(0o100644u32 << 16).to_le_bytes());
    out.extend_from_slice(&u32::MAX.to_le_bytes()); // local header offset
    out.extend_from_slice(name.as_bytes());
    out.extend_from_slice(&1u16.to_le_bytes()); // ZIP64 extra field
    out.extend_from_slice(&24u16.to_le_bytes());
    out.extend_from_slice(&(data.len() as u64).to_le_bytes());
    out.extend_from_slice(&(data.len() as u64).to_le_bytes());
    out.extend_from_slice(&0u64.to_le_bytes());
    let cd_size = out.len() as u64 - cd_offset;

    // ZIP64 end of central directory
    let eocd64_offset = out.len() as u64;
    out.extend_from_slice(b"PK\x06\x06");
    out.extend_from_slice(&44u64.to_le_bytes());
    out.extend_from_slice(&45u16.to_le_bytes());
    out.extend_from_slice(&45u16.to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes());
    out.extend_from_slice(&1u64.to_le_bytes());
    out.extend_from_slice(&1u64.to_le_bytes());
    out.extend_from_slice(&cd_size.to_le_bytes());
    out.extend_from_slice(&cd_offset.to_le_bytes());

    // Locator
    out.extend_from_slice(b"PK\x06\x07");
    out.extend_from_slice(&0u32.to_le_bytes());
    out.extend_from_slice(&eocd64_offset.to_le_bytes());
    out.extend_from_slice(&1u32.to_le_bytes());

    // End of central directory pointing at the ZIP64 records
    out.extend_from_slice(b"PK\x05\x06");
    out.extend_from_slice(&0u16.to_le_bytes());
    out.extend_from_slice(&0u16.to_le_bytes());
    out.extend_from_slice(&u16::MAX.to_le_bytes());
    out.extend_from_slice(&u16::MAX.to_le_bytes());
    out.extend_from_slice(&u32::MAX.to_le_bytes());
    out.extend_from_slice(&u32::MAX.to_le_bytes());
    out.extend_from_slice(&0u16.to_le_bytes());
    out
}

fn crc32(data: &[u8]) -> u32 {
    let mut crc = !0u32;
    for &byte in data {
        crc ^= byte as u32;
        for _ in 0..8 {
            crc = if crc & 1 != 0 { (crc >> 1) ^ 0xEDB8_8320 } else { crc >> 1 };
        }
    }
    !crc
}

/// Writes `data` to `dir/name` and returns the path.
pub fn write_archive(dir: &Path, name: &str, data: &[u8]) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, data).unwrap();
    path
}

/// Sorted file names directly inside `dir`.
pub fn listing(dir: &Path) -> Vec<String> {
    let mut names: Vec<_> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
