//! Local filesystem adapter using std::fs.

use std::{
    fs::OpenOptions,
    io::{self, Write},
    path::Path,
};

use externals_core::{
    application::{ApplicationError, ports::Filesystem},
    error::{ExternalsError, ExternalsResult},
};

/// Production filesystem implementation using `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    /// Create a new local filesystem adapter.
    pub fn new() -> Self {
        Self
    }
}

impl Filesystem for LocalFilesystem {
    fn create_dir_all(&self, path: &Path) -> ExternalsResult<()> {
        std::fs::create_dir_all(path).map_err(|e| map_io_error(path, e, "create directory"))
    }

    fn write_file(&self, path: &Path, content: &str) -> ExternalsResult<()> {
        std::fs::write(path, content).map_err(|e| map_io_error(path, e, "write file"))
    }

    fn append_file(&self, path: &Path, content: &str) -> ExternalsResult<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| map_io_error(path, e, "open file"))?;

        file.write_all(content.as_bytes())
            .map_err(|e| map_io_error(path, e, "append to file"))
    }

    fn read_file(&self, path: &Path) -> ExternalsResult<String> {
        std::fs::read_to_string(path).map_err(|e| map_io_error(path, e, "read file"))
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn remove(&self, path: &Path) -> ExternalsResult<()> {
        let result = if path.is_dir() {
            std::fs::remove_dir_all(path)
        } else {
            std::fs::remove_file(path)
        };
        result.map_err(|e| map_io_error(path, e, "remove"))
    }

    fn copy(&self, from: &Path, to: &Path) -> ExternalsResult<()> {
        std::fs::copy(from, to)
            .map(|_| ())
            .map_err(|e| map_io_error(from, e, "copy file"))
    }

    fn rename(&self, from: &Path, to: &Path) -> ExternalsResult<()> {
        std::fs::rename(from, to).map_err(|e| map_io_error(from, e, "rename"))
    }
}

fn map_io_error(path: &Path, e: io::Error, operation: &str) -> ExternalsError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: format!("Failed to {}: {}", operation, e),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn write_append_read() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("codes.jsonl");
        let fs = LocalFilesystem::new();

        fs.append_file(&path, "a\n").unwrap();
        fs.append_file(&path, "b\n").unwrap();
        assert_eq!(fs.read_file(&path).unwrap(), "a\nb\n");

        fs.write_file(&path, "c\n").unwrap();
        assert_eq!(fs.read_file(&path).unwrap(), "c\n");
    }

    #[test]
    fn copy_rename_remove() {
        let dir = TempDir::new().unwrap();
        let fs = LocalFilesystem::new();
        let a = dir.path().join("a.txt");
        let b = dir.path().join("b.txt");
        let c = dir.path().join("nested/c.txt");

        fs.write_file(&a, "hello").unwrap();
        fs.copy(&a, &b).unwrap();
        fs.create_dir_all(c.parent().unwrap()).unwrap();
        fs.rename(&b, &c).unwrap();

        assert!(fs.exists(&a));
        assert!(!fs.exists(&b));
        assert_eq!(fs.read_file(&c).unwrap(), "hello");

        fs.remove(&dir.path().join("nested")).unwrap();
        assert!(!fs.exists(&c));
    }

    #[test]
    fn missing_file_maps_to_filesystem_error() {
        let dir = TempDir::new().unwrap();
        let err = LocalFilesystem::new()
            .read_file(&dir.path().join("missing"))
            .unwrap_err();

        assert_eq!(err.code(), 2004);
    }
}
