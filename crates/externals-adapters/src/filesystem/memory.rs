//! In-memory filesystem adapter for testing.

use std::{
    collections::{HashMap, HashSet},
    path::{Path, PathBuf},
    sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use externals_core::{
    application::{ApplicationError, ports::Filesystem},
    error::{ExternalsError, ExternalsResult},
};

/// In-memory filesystem for testing.
#[derive(Debug, Clone, Default)]
pub struct MemoryFilesystem {
    inner: Arc<RwLock<MemoryFilesystemInner>>,
}

#[derive(Debug, Default)]
struct MemoryFilesystemInner {
    files: HashMap<PathBuf, String>,
    directories: HashSet<PathBuf>,
}

impl MemoryFilesystemInner {
    fn ensure_parent(&self, path: &Path) -> ExternalsResult<()> {
        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() && !self.directories.contains(parent) => {
                Err(not_found(path, "Parent directory does not exist"))
            }
            _ => Ok(()),
        }
    }
}

impl MemoryFilesystem {
    /// Create a new empty memory filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    /// List all files.
    pub fn list_files(&self) -> Vec<PathBuf> {
        self.read()
            .map(|inner| inner.files.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Clear all contents.
    pub fn clear(&self) {
        if let Ok(mut inner) = self.write() {
            inner.files.clear();
            inner.directories.clear();
        }
    }

    fn read(&self) -> ExternalsResult<RwLockReadGuard<'_, MemoryFilesystemInner>> {
        self.inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError.into())
    }

    fn write(&self) -> ExternalsResult<RwLockWriteGuard<'_, MemoryFilesystemInner>> {
        self.inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError.into())
    }
}

impl Filesystem for MemoryFilesystem {
    fn create_dir_all(&self, path: &Path) -> ExternalsResult<()> {
        let mut inner = self.write()?;

        let mut current = PathBuf::new();
        for component in path.components() {
            current.push(component);
            inner.directories.insert(current.clone());
        }

        Ok(())
    }

    fn write_file(&self, path: &Path, content: &str) -> ExternalsResult<()> {
        let mut inner = self.write()?;
        inner.ensure_parent(path)?;
        inner.files.insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn append_file(&self, path: &Path, content: &str) -> ExternalsResult<()> {
        let mut inner = self.write()?;
        inner.ensure_parent(path)?;
        inner
            .files
            .entry(path.to_path_buf())
            .or_default()
            .push_str(content);
        Ok(())
    }

    fn read_file(&self, path: &Path) -> ExternalsResult<String> {
        self.read()?
            .files
            .get(path)
            .cloned()
            .ok_or_else(|| not_found(path, "File does not exist"))
    }

    fn exists(&self, path: &Path) -> bool {
        self.read()
            .map(|inner| inner.files.contains_key(path) || inner.directories.contains(path))
            .unwrap_or(false)
    }

    fn remove(&self, path: &Path) -> ExternalsResult<()> {
        let mut inner = self.write()?;

        if !inner.files.contains_key(path) && !inner.directories.contains(path) {
            return Err(not_found(path, "Path does not exist"));
        }

        inner.directories.retain(|p| !p.starts_with(path));
        inner.files.retain(|p, _| !p.starts_with(path));
        Ok(())
    }

    fn copy(&self, from: &Path, to: &Path) -> ExternalsResult<()> {
        let mut inner = self.write()?;
        let content = inner
            .files
            .get(from)
            .cloned()
            .ok_or_else(|| not_found(from, "File does not exist"))?;

        inner.ensure_parent(to)?;
        inner.files.insert(to.to_path_buf(), content);
        Ok(())
    }

    fn rename(&self, from: &Path, to: &Path) -> ExternalsResult<()> {
        let mut inner = self.write()?;
        inner.ensure_parent(to)?;

        let content = inner
            .files
            .remove(from)
            .ok_or_else(|| not_found(from, "File does not exist"))?;

        inner.files.insert(to.to_path_buf(), content);
        Ok(())
    }
}

fn not_found(path: &Path, reason: &str) -> ExternalsError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: reason.into(),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_requires_parent() {
        let fs = MemoryFilesystem::new();

        assert!(fs.write_file(Path::new("data/codes.jsonl"), "x").is_err());

        fs.create_dir_all(Path::new("data")).unwrap();
        fs.write_file(Path::new("data/codes.jsonl"), "x").unwrap();
        assert!(fs.exists(Path::new("data/codes.jsonl")));
    }

    #[test]
    fn append_creates_then_extends() {
        let fs = MemoryFilesystem::new();
        let path = Path::new("codes.jsonl");

        fs.append_file(path, "a\n").unwrap();
        fs.append_file(path, "b\n").unwrap();

        assert_eq!(fs.read_file(path).unwrap(), "a\nb\n");
    }

    #[test]
    fn copy_and_rename() {
        let fs = MemoryFilesystem::new();
        fs.write_file(Path::new("a"), "1").unwrap();

        fs.copy(Path::new("a"), Path::new("b")).unwrap();
        fs.rename(Path::new("b"), Path::new("c")).unwrap();

        assert_eq!(fs.read_file(Path::new("a")).unwrap(), "1");
        assert_eq!(fs.read_file(Path::new("c")).unwrap(), "1");
        assert!(!fs.exists(Path::new("b")));
    }

    #[test]
    fn remove_directory_removes_children() {
        let fs = MemoryFilesystem::new();
        fs.create_dir_all(Path::new("out/nested")).unwrap();
        fs.write_file(Path::new("out/nested/f"), "x").unwrap();

        fs.remove(Path::new("out")).unwrap();

        assert!(fs.list_files().is_empty());
        assert!(!fs.exists(Path::new("out/nested")));
    }

    #[test]
    fn missing_paths_are_errors() {
        let fs = MemoryFilesystem::new();

        assert!(fs.read_file(Path::new("nope")).is_err());
        assert!(fs.remove(Path::new("nope")).is_err());
        assert!(fs.rename(Path::new("nope"), Path::new("other")).is_err());
    }
}
