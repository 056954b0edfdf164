mod local;

pub use local::LocalFileReader;

use anyhow::{Result, bail};
use async_trait::async_trait;

/// Trait for random access reading from a data source
#[async_trait]
pub trait ReadAt: Send + Sync {
    /// Read data at the specified offset into the buffer
    async fn read_at(&self, offset: u64, buf: &mut [u8]) -> Result<usize>;

    /// Get the total size of the data source
    fn size(&self) -> u64;

    /// Fill `buf` completely starting at `offset`.
    ///
    /// Positional reads may come back short, so this keeps reading until the
    /// buffer is full and fails if the source ends first.
    async fn read_exact_at(&self, offset: u64, buf: &mut [u8]) -> Result<()> {
        let mut filled = 0;
        while filled < buf.len() {
            let n = self.read_at(offset + filled as u64, &mut buf[filled..]).await?;
            if n == 0 {
                bail!(
                    "Unexpected end of archive: wanted {} bytes at offset {}",
                    buf.len(),
                    offset
                );
            }
            filled += n;
        }
        Ok(())
    }
}
