//! Read-only memory-mapped entry files.

pub mod error;

pub use error::{MmapError, MmapResult};

use std::fs::File;
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use memmap2::Mmap;

/// rkyv archives must start on this boundary; page-aligned maps always do.
pub const RKYV_ALIGNMENT: usize = 16;

/// Shared, cheaply clonable view of one persisted entry file.
///
/// The mapping stays valid after the file is replaced or unlinked, so a reader
/// holding a handle keeps seeing the entry as it was when the handle was taken.
#[derive(Clone)]
pub struct MmapFileHandle {
    inner: Arc<Mmap>,
    path: Arc<PathBuf>,
}

impl std::fmt::Debug for MmapFileHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MmapFileHandle")
            .field("path", &self.path)
            .field("len", &self.len())
            .field("strong_count", &self.strong_count())
            .finish()
    }
}

impl MmapFileHandle {
    pub fn open<P: AsRef<Path>>(path: P) -> MmapResult<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;

        let metadata = file.metadata()?;
        if metadata.len() == 0 {
            return Err(MmapError::EmptyFile);
        }

        // SAFETY: entry files are only ever replaced by rename, never written in place.
        let mmap = unsafe { Mmap::map(&file)? };

        let handle = Self {
            inner: Arc::new(mmap),
            path: Arc::new(path.to_path_buf()),
        };

        if !(handle.as_slice().as_ptr() as usize).is_multiple_of(RKYV_ALIGNMENT) {
            return Err(MmapError::AlignmentError {
                offset: 0,
                alignment: RKYV_ALIGNMENT,
            });
        }

        Ok(handle)
    }

    pub fn as_slice(&self) -> &[u8] {
        self.inner.deref()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn strong_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_open_reads_bytes() {
        let mut file = NamedTempFile::new().expect("create temp file");
        file.write_all(b"entry bytes").expect("write");
        file.flush().expect("flush");

        let handle = MmapFileHandle::open(file.path()).expect("open mmap");
        assert_eq!(handle.as_slice(), b"entry bytes");
        assert_eq!(handle.len(), 11);
        assert_eq!(handle.path(), file.path());
    }

    #[test]
    fn test_open_empty_file_fails() {
        let file = NamedTempFile::new().expect("create temp file");
        let result = MmapFileHandle::open(file.path());
        assert!(matches!(result, Err(MmapError::EmptyFile)));
    }

    #[test]
    fn test_open_missing_file_fails() {
        let dir = tempfile::TempDir::new().expect("temp dir");
        let result = MmapFileHandle::open(dir.path().join("missing.rkyv"));
        assert!(matches!(result, Err(MmapError::Io(_))));
    }

    #[test]
    fn test_clone_shares_mapping() {
        let mut file = NamedTempFile::new().expect("create temp file");
        file.write_all(b"x").expect("write");
        file.flush().expect("flush");

        let handle = MmapFileHandle::open(file.path()).expect("open mmap");
        let clone = handle.clone();
        assert_eq!(handle.strong_count(), 2);
        drop(clone);
        assert_eq!(handle.strong_count(), 1);
    }
}
