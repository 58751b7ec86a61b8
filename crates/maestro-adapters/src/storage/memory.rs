//! In-memory storage adapter for testing.

use std::{
    collections::{BTreeMap, BTreeSet},
    io,
    path::{Path, PathBuf},
    sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use maestro_core::{
    application::{ApplicationError, Document, EntryFilter, Storage},
    error::MaestroResult,
};

/// A mutating call received by [`MemoryStorage`], in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Write(PathBuf),
    Copy { from: PathBuf, to: PathBuf },
    CopyDirectory { from: PathBuf, to: PathBuf },
    Delete(PathBuf),
    CreateDirectory(PathBuf),
    Link { target: PathBuf, link: PathBuf },
}

/// In-memory storage for testing.
///
/// Clones share state, so a test can keep a handle while a service owns
/// another.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    inner: Arc<RwLock<MemoryStorageInner>>,
}

#[derive(Debug, Default)]
struct MemoryStorageInner {
    files: BTreeMap<PathBuf, Document>,
    directories: BTreeSet<PathBuf>,
    links: BTreeMap<PathBuf, PathBuf>,
    journal: Vec<Operation>,
    failing: BTreeSet<PathBuf>,
}

impl MemoryStorageInner {
    fn add_directory(&mut self, path: &Path) {
        let mut current = PathBuf::new();
        for component in path.components() {
            current.push(component);
            self.directories.insert(current.clone());
        }
    }

    fn add_parent(&mut self, path: &Path) {
        if let Some(parent) = path.parent() {
            self.add_directory(parent);
        }
    }

    fn contains(&self, path: &Path) -> bool {
        self.files.contains_key(path)
            || self.directories.contains(path)
            || self.links.contains_key(path)
    }

    fn check_failure(&self, path: &Path, operation: &str) -> MaestroResult<()> {
        if self.failing.contains(path) {
            let err = io::Error::new(io::ErrorKind::PermissionDenied, "injected failure");
            return Err(ApplicationError::filesystem(path, &err, operation).into());
        }
        Ok(())
    }
}

impl MemoryStorage {
    /// Create a new empty memory storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a file without journaling it.
    pub fn with_file(self, path: impl Into<PathBuf>, document: Document) -> Self {
        if let Ok(mut inner) = self.inner.write() {
            let path = path.into();
            inner.add_parent(&path);
            inner.files.insert(path, document);
        }
        self
    }

    /// Seed a directory (and its ancestors) without journaling it.
    pub fn with_directory(self, path: impl Into<PathBuf>) -> Self {
        if let Ok(mut inner) = self.inner.write() {
            inner.add_directory(&path.into());
        }
        self
    }

    /// Make every mutating call whose destination is `path` fail.
    pub fn fail_on(&self, path: impl Into<PathBuf>) {
        if let Ok(mut inner) = self.inner.write() {
            inner.failing.insert(path.into());
        }
    }

    /// Mutating calls received so far.
    pub fn journal(&self) -> Vec<Operation> {
        self.inner
            .read()
            .map(|inner| inner.journal.clone())
            .unwrap_or_default()
    }

    pub fn clear_journal(&self) {
        if let Ok(mut inner) = self.inner.write() {
            inner.journal.clear();
        }
    }

    /// Stored document at `path` (testing helper).
    pub fn document(&self, path: impl AsRef<Path>) -> Option<Document> {
        let inner = self.inner.read().ok()?;
        inner.files.get(path.as_ref()).cloned()
    }

    /// Stored text at `path` (testing helper).
    pub fn text(&self, path: impl AsRef<Path>) -> Option<String> {
        self.document(path)
            .and_then(|d| d.as_text().map(str::to_string))
    }

    /// Target of the symlink at `path`.
    pub fn link_target(&self, path: impl AsRef<Path>) -> Option<PathBuf> {
        let inner = self.inner.read().ok()?;
        inner.links.get(path.as_ref()).cloned()
    }

    /// All file paths, sorted.
    pub fn files(&self) -> Vec<PathBuf> {
        self.inner
            .read()
            .map(|inner| inner.files.keys().cloned().collect())
            .unwrap_or_default()
    }

    fn read_guard(&self) -> MaestroResult<RwLockReadGuard<'_, MemoryStorageInner>> {
        self.inner
            .read()
            .map_err(|_| ApplicationError::StorageLockError.into())
    }

    fn write_guard(&self) -> MaestroResult<RwLockWriteGuard<'_, MemoryStorageInner>> {
        self.inner
            .write()
            .map_err(|_| ApplicationError::StorageLockError.into())
    }
}

fn not_found(path: &Path, operation: &str) -> maestro_core::error::MaestroError {
    let err = io::Error::new(io::ErrorKind::NotFound, "no such file or directory");
    ApplicationError::filesystem(path, &err, operation).into()
}

impl Storage for MemoryStorage {
    fn exists(&self, path: &Path) -> bool {
        self.inner
            .read()
            .map(|inner| inner.contains(path))
            .unwrap_or(false)
    }

    fn read(&self, path: &Path) -> MaestroResult<Document> {
        let inner = self.read_guard()?;
        inner
            .files
            .get(path)
            .cloned()
            .ok_or_else(|| not_found(path, "read file"))
    }

    fn write(&self, path: &Path, document: &Document) -> MaestroResult<()> {
        let mut inner = self.write_guard()?;
        inner.journal.push(Operation::Write(path.to_path_buf()));
        inner.check_failure(path, "write file")?;

        inner.add_parent(path);
        inner.files.insert(path.to_path_buf(), document.clone());
        Ok(())
    }

    fn copy(&self, from: &Path, to: &Path) -> MaestroResult<()> {
        let mut inner = self.write_guard()?;
        inner.journal.push(Operation::Copy {
            from: from.to_path_buf(),
            to: to.to_path_buf(),
        });
        inner.check_failure(to, "copy file")?;

        let document = inner
            .files
            .get(from)
            .cloned()
            .ok_or_else(|| not_found(from, "copy file"))?;
        inner.add_parent(to);
        inner.files.insert(to.to_path_buf(), document);
        Ok(())
    }

    fn copy_directory(&self, from: &Path, to: &Path) -> MaestroResult<()> {
        let mut inner = self.write_guard()?;
        inner.journal.push(Operation::CopyDirectory {
            from: from.to_path_buf(),
            to: to.to_path_buf(),
        });
        inner.check_failure(to, "copy directory")?;

        if !inner.directories.contains(from) {
            return Err(not_found(from, "copy directory"));
        }

        let files: Vec<(PathBuf, Document)> = inner
            .files
            .iter()
            .filter_map(|(path, doc)| {
                path.strip_prefix(from)
                    .ok()
                    .map(|rel| (to.join(rel), doc.clone()))
            })
            .collect();
        let directories: Vec<PathBuf> = inner
            .directories
            .iter()
            .filter_map(|path| path.strip_prefix(from).ok().map(|rel| to.join(rel)))
            .collect();

        inner.add_directory(to);
        for dir in directories {
            inner.add_directory(&dir);
        }
        for (path, doc) in files {
            inner.files.insert(path, doc);
        }
        Ok(())
    }

    fn delete(&self, path: &Path) -> MaestroResult<()> {
        let mut inner = self.write_guard()?;
        inner.journal.push(Operation::Delete(path.to_path_buf()));
        inner.check_failure(path, "delete")?;

        inner.files.retain(|p, _| !p.starts_with(path));
        inner.directories.retain(|p| !p.starts_with(path));
        inner.links.retain(|p, _| !p.starts_with(path));
        Ok(())
    }

    fn create_directory(&self, path: &Path) -> MaestroResult<()> {
        let mut inner = self.write_guard()?;
        inner
            .journal
            .push(Operation::CreateDirectory(path.to_path_buf()));
        inner.check_failure(path, "create directory")?;

        inner.add_directory(path);
        Ok(())
    }

    fn list_entries(&self, path: &Path, filter: EntryFilter) -> MaestroResult<Vec<PathBuf>> {
        let inner = self.read_guard()?;
        if !inner.directories.contains(path) {
            return Err(not_found(path, "list directory"));
        }

        let children = |p: &&PathBuf| p.parent() == Some(path);
        let mut entries = BTreeSet::new();
        if filter.accepts(true) {
            entries.extend(inner.directories.iter().filter(children).cloned());
        }
        if filter.accepts(false) {
            entries.extend(inner.files.keys().filter(children).cloned());
            entries.extend(inner.links.keys().filter(children).cloned());
        }
        Ok(entries.into_iter().collect())
    }

    fn link(&self, target: &Path, link: &Path) -> MaestroResult<()> {
        let mut inner = self.write_guard()?;
        inner.journal.push(Operation::Link {
            target: target.to_path_buf(),
            link: link.to_path_buf(),
        });
        inner.check_failure(link, "create symlink")?;

        inner.add_parent(link);
        inner.links.insert(link.to_path_buf(), target.to_path_buf());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copy_directory_copies_nested_files() {
        let storage = MemoryStorage::new()
            .with_file("project/sites/a/settings.php", Document::Text("<?php".into()))
            .with_directory("project/sites/a/files");

        storage
            .copy_directory(Path::new("project/sites/a"), Path::new("project/sites/b"))
            .unwrap();

        assert_eq!(
            storage.text("project/sites/b/settings.php").as_deref(),
            Some("<?php")
        );
        assert!(storage.exists(Path::new("project/sites/b/files")));
        assert!(storage.exists(Path::new("project/sites/a/settings.php")));
    }

    #[test]
    fn delete_removes_subtree() {
        let storage = MemoryStorage::new().with_file("a/b/c.txt", Document::Text(String::new()));
        storage.delete(Path::new("a/b")).unwrap();
        assert!(!storage.exists(Path::new("a/b/c.txt")));
        assert!(!storage.exists(Path::new("a/b")));
        assert!(storage.exists(Path::new("a")));
    }

    #[test]
    fn list_entries_filters_immediate_children() {
        let storage = MemoryStorage::new()
            .with_directory("res/drupal/Lando")
            .with_directory("res/wordpress")
            .with_file("res/README.md", Document::Text(String::new()));

        let dirs = storage
            .list_entries(Path::new("res"), EntryFilter::Directories)
            .unwrap();
        assert_eq!(dirs, vec![PathBuf::from("res/drupal"), PathBuf::from("res/wordpress")]);

        let files = storage.list_entries(Path::new("res"), EntryFilter::Files).unwrap();
        assert_eq!(files, vec![PathBuf::from("res/README.md")]);
    }

    #[test]
    fn injected_failure_is_journaled_and_reported() {
        let storage = MemoryStorage::new();
        storage.fail_on("out.md");

        let err = storage
            .write(Path::new("out.md"), &Document::Text("x".into()))
            .unwrap_err();

        assert!(matches!(
            err.as_application(),
            Some(ApplicationError::Filesystem {
                kind: io::ErrorKind::PermissionDenied,
                ..
            })
        ));
        assert_eq!(storage.journal(), vec![Operation::Write(PathBuf::from("out.md"))]);
        assert!(storage.document("out.md").is_none());
    }
}
