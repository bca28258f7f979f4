//! `file://` fetches.

use lumen_types::error::LumenError;
use lumen_vfs::Vfs;

use super::FetchResponse;

/// Read `path` through `vfs`.
///
/// A missing file is a 404, any other open or read failure a 500. The
/// handle is dropped before returning.
pub fn fetch_file(vfs: &dyn Vfs, path: &str) -> FetchResponse {
    let mut file = match vfs.open(path) {
        Ok(file) => file,
        Err(LumenError::NotFound(_)) => {
            return FetchResponse::error(404, format!("File not found: {path}"));
        },
        Err(e) => {
            log::warn!("open {path}: {e}");
            return FetchResponse::error(500, format!("Failed to open file: {path}"));
        },
    };

    match file.read_all() {
        Ok(data) => FetchResponse::ok(String::from_utf8_lossy(&data)),
        Err(e) => {
            log::warn!("read {path}: {e}");
            FetchResponse::error(500, "Failed to read file")
        },
    }
}
