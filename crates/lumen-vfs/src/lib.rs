//! File access for `file://` pages.
//!
//! The browser only ever opens a path and reads it through. [`Vfs`] is the
//! seam: [`StdVfs`] reads the host filesystem, [`MemoryVfs`] serves a tree
//! held in memory for tests.

mod memory;
mod std_fs;

pub use memory::MemoryVfs;
pub use std_fs::StdVfs;

use lumen_types::error::Result;

/// A file system the fetch client can open files through.
///
/// A missing path must be reported as
/// [`LumenError::NotFound`](lumen_types::error::LumenError::NotFound) so
/// callers can tell it apart from other failures.
pub trait Vfs {
    fn open(&self, path: &str) -> Result<Box<dyn VfsFile>>;
}

/// An open file handle. Dropping it releases the handle.
pub trait VfsFile {
    /// File size in bytes, as reported when opened.
    fn size(&self) -> u64;

    /// Read into `buf` starting at `offset`. Returns 0 at end of file.
    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> Result<usize>;

    /// Read the whole file. Stops early if the file shrinks underneath.
    fn read_all(&mut self) -> Result<Vec<u8>> {
        let size = self.size() as usize;
        let mut data = vec![0u8; size];
        let mut filled = 0;
        while filled < size {
            let n = self.read_at(filled as u64, &mut data[filled..])?;
            if n == 0 {
                break;
            }
            filled += n;
        }
        data.truncate(filled);
        Ok(data)
    }
}
