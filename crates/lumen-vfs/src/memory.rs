//! In-memory VFS implementation.
//!
//! Serves `file://` pages in tests without touching disk. The whole tree
//! lives in a `BTreeMap<String, Node>` keyed by normalized absolute path.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::sync::Arc;

use lumen_types::error::{LumenError, Result};

use crate::{Vfs, VfsFile};

#[derive(Debug, Clone)]
enum Node {
    File(Arc<[u8]>),
    Dir,
}

/// A fully in-memory file tree.
#[derive(Debug)]
pub struct MemoryVfs {
    nodes: BTreeMap<String, Node>,
}

impl MemoryVfs {
    /// Create an empty tree containing only `/`.
    pub fn new() -> Self {
        let mut nodes = BTreeMap::new();
        nodes.insert("/".to_string(), Node::Dir);
        Self { nodes }
    }

    /// Create a directory and any missing parents.
    pub fn mkdir(&mut self, path: &str) -> Result<()> {
        let path = normalize(path);
        match self.nodes.get(path.as_ref()) {
            Some(Node::Dir) => return Ok(()),
            Some(Node::File(_)) => {
                return Err(LumenError::Backend(format!("not a directory: {path}")));
            },
            None => {},
        }
        let par = parent(&path).to_string();
        if par != path.as_ref() {
            self.mkdir(&par)?;
        }
        self.nodes.insert(path.into_owned(), Node::Dir);
        Ok(())
    }

    /// Write a file, creating parent directories as needed.
    pub fn write(&mut self, path: &str, data: &[u8]) -> Result<()> {
        let path = normalize(path);
        if matches!(self.nodes.get(path.as_ref()), Some(Node::Dir)) {
            return Err(LumenError::Backend(format!("is a directory: {path}")));
        }
        self.mkdir(parent(&path))?;
        self.nodes
            .insert(path.into_owned(), Node::File(Arc::from(data)));
        Ok(())
    }

    pub fn exists(&self, path: &str) -> bool {
        self.nodes.contains_key(normalize(path).as_ref())
    }
}

impl Default for MemoryVfs {
    fn default() -> Self {
        Self::new()
    }
}

impl Vfs for MemoryVfs {
    fn open(&self, path: &str) -> Result<Box<dyn VfsFile>> {
        let path = normalize(path);
        match self.nodes.get(path.as_ref()) {
            Some(Node::File(data)) => Ok(Box::new(MemoryFile {
                data: Arc::clone(data),
            })),
            Some(Node::Dir) => Err(LumenError::Backend(format!("is a directory: {path}"))),
            None => Err(LumenError::NotFound(path.into_owned())),
        }
    }
}

/// Handle onto a shared in-memory file body.
struct MemoryFile {
    data: Arc<[u8]>,
}

impl VfsFile for MemoryFile {
    fn size(&self) -> u64 {
        self.data.len() as u64
    }

    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> Result<usize> {
        let start = (offset as usize).min(self.data.len());
        let n = buf.len().min(self.data.len() - start);
        buf[..n].copy_from_slice(&self.data[start..start + n]);
        Ok(n)
    }
}

/// Whether a path is already in normal form (leading `/`, no `//`, no
/// trailing `/` unless root).
fn is_normalized(path: &str) -> bool {
    path.starts_with('/') && !(path.len() > 1 && path.ends_with('/')) && !path.contains("//")
}

/// Normalize a path: ensure leading `/`, collapse `//`, strip trailing `/`
/// except for root. Borrows when already normal.
fn normalize(path: &str) -> Cow<'_, str> {
    if is_normalized(path) {
        return Cow::Borrowed(path);
    }
    let mut result = String::with_capacity(path.len() + 1);
    result.push('/');
    for segment in path.split('/').filter(|s| !s.is_empty()) {
        if !result.ends_with('/') {
            result.push('/');
        }
        result.push_str(segment);
    }
    Cow::Owned(result)
}

/// Parent of a normalized path.
fn parent(path: &str) -> &str {
    match path.rfind('/') {
        Some(0) | None => "/",
        Some(i) => &path[..i],
    }
}
