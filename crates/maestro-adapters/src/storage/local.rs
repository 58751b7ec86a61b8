//! Local filesystem adapter using std::fs.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::trace;
use walkdir::WalkDir;

use maestro_core::{
    application::{ApplicationError, Document, EntryFilter, Storage},
    error::{MaestroError, MaestroResult},
};

use crate::codec;

/// Production storage rooted at the project directory.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root: PathBuf,
}

impl LocalStorage {
    /// Create a storage adapter resolving relative paths against `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute location of `path`.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    fn ensure_parent(&self, full: &Path, requested: &Path) -> MaestroResult<()> {
        match full.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent)
                .map_err(|e| map_io_error(requested, e, "create parent directory")),
            _ => Ok(()),
        }
    }
}

impl Storage for LocalStorage {
    fn exists(&self, path: &Path) -> bool {
        // symlink_metadata so dangling links still count
        fs::symlink_metadata(self.resolve(path)).is_ok()
    }

    fn read(&self, path: &Path) -> MaestroResult<Document> {
        let text = fs::read_to_string(self.resolve(path))
            .map_err(|e| map_io_error(path, e, "read file"))?;
        codec::decode(path, &text)
    }

    fn write(&self, path: &Path, document: &Document) -> MaestroResult<()> {
        let full = self.resolve(path);
        let text = codec::encode(path, document)?;
        self.ensure_parent(&full, path)?;
        trace!(path = %full.display(), "write");
        fs::write(&full, text).map_err(|e| map_io_error(path, e, "write file"))
    }

    fn copy(&self, from: &Path, to: &Path) -> MaestroResult<()> {
        let target = self.resolve(to);
        self.ensure_parent(&target, to)?;
        fs::copy(self.resolve(from), &target)
            .map(|_| ())
            .map_err(|e| map_io_error(from, e, "copy file"))
    }

    fn copy_directory(&self, from: &Path, to: &Path) -> MaestroResult<()> {
        let source = self.resolve(from);
        let target = self.resolve(to);

        for entry in WalkDir::new(&source).follow_links(true) {
            let entry = entry.map_err(|e| {
                let path = e.path().map_or_else(|| from.to_path_buf(), Path::to_path_buf);
                match e.into_io_error() {
                    Some(io) => map_io_error(&path, io, "walk directory"),
                    None => ApplicationError::Filesystem {
                        path,
                        kind: io::ErrorKind::Other,
                        reason: "filesystem loop detected".into(),
                    }
                    .into(),
                }
            })?;

            let relative = entry
                .path()
                .strip_prefix(&source)
                .map_err(|e| MaestroError::Internal {
                    message: e.to_string(),
                })?;
            let destination = target.join(relative);

            if entry.file_type().is_dir() {
                fs::create_dir_all(&destination)
                    .map_err(|e| map_io_error(&destination, e, "create directory"))?;
            } else {
                fs::copy(entry.path(), &destination)
                    .map_err(|e| map_io_error(entry.path(), e, "copy file"))?;
            }
        }

        Ok(())
    }

    fn delete(&self, path: &Path) -> MaestroResult<()> {
        let full = self.resolve(path);
        let metadata = match fs::symlink_metadata(&full) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(map_io_error(path, e, "inspect path")),
        };

        let result = if metadata.is_dir() {
            fs::remove_dir_all(&full)
        } else {
            fs::remove_file(&full)
        };
        result.map_err(|e| map_io_error(path, e, "delete"))
    }

    fn create_directory(&self, path: &Path) -> MaestroResult<()> {
        fs::create_dir_all(self.resolve(path)).map_err(|e| map_io_error(path, e, "create directory"))
    }

    fn list_entries(&self, path: &Path, filter: EntryFilter) -> MaestroResult<Vec<PathBuf>> {
        let reader =
            fs::read_dir(self.resolve(path)).map_err(|e| map_io_error(path, e, "list directory"))?;

        let mut entries = Vec::new();
        for entry in reader {
            let entry = entry.map_err(|e| map_io_error(path, e, "list directory"))?;
            if filter.accepts(entry.path().is_dir()) {
                entries.push(path.join(entry.file_name()));
            }
        }
        entries.sort();
        Ok(entries)
    }

    fn link(&self, target: &Path, link: &Path) -> MaestroResult<()> {
        self.delete(link)?;
        let full_link = self.resolve(link);
        self.ensure_parent(&full_link, link)?;
        symlink(&self.resolve(target), &full_link).map_err(|e| map_io_error(link, e, "create symlink"))
    }
}

#[cfg(unix)]
fn symlink(target: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn symlink(target: &Path, link: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_dir(target, link)
}

fn map_io_error(path: &Path, e: io::Error, operation: &str) -> MaestroError {
    ApplicationError::filesystem(path, &e, operation).into()
}
