//! Host filesystem access through `std::fs`.

use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};

use lumen_types::error::{LumenError, Result};

use crate::{Vfs, VfsFile};

/// Opens paths on the host filesystem exactly as given.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdVfs;

impl StdVfs {
    pub fn new() -> Self {
        Self
    }
}

impl Vfs for StdVfs {
    fn open(&self, path: &str) -> Result<Box<dyn VfsFile>> {
        let file = File::open(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => LumenError::NotFound(path.to_string()),
            _ => LumenError::Io(e),
        })?;
        let meta = file.metadata()?;
        if meta.is_dir() {
            return Err(LumenError::Backend(format!("is a directory: {path}")));
        }
        log::debug!("opened {path} ({} bytes)", meta.len());
        Ok(Box::new(StdFile {
            file,
            size: meta.len(),
        }))
    }
}

struct StdFile {
    file: File,
    size: u64,
}

impl VfsFile for StdFile {
    fn size(&self) -> u64 {
        self.size
    }

    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> Result<usize> {
        self.file.seek(SeekFrom::Start(offset))?;
        Ok(self.file.read(buf)?)
    }
}
