use super::{attachment_candidate, Vault};
use crate::error::{Result, SnError};
use crate::model::FileHandle;
use crate::unique::normalize_folder;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Component, Path, PathBuf};

/// A vault backed by a directory on disk.
pub struct FsVault {
    root: PathBuf,
    attachment_folder: String,
}

impl FsVault {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            attachment_folder: String::new(),
        }
    }

    pub fn with_attachment_folder(mut self, folder: &str) -> Self {
        self.attachment_folder = normalize_folder(folder).to_string();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn read_binary(&self, path: &str) -> Result<Vec<u8>> {
        let full = self.resolve(path)?;
        fs::read(full).map_err(SnError::Io)
    }

    /// Map a vault path onto the filesystem, refusing anything that would
    /// escape the root.
    fn resolve(&self, path: &str) -> Result<PathBuf> {
        let relative = Path::new(normalize_folder(path));
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)))
        {
            return Err(SnError::Store(format!(
                "Path must stay inside the vault: {}",
                path
            )));
        }
        Ok(self.root.join(relative))
    }

    fn write(&self, path: &str, bytes: &[u8]) -> Result<FileHandle> {
        let full = self.resolve(path)?;
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&full)
            .map_err(|e| match e.kind() {
                ErrorKind::AlreadyExists => {
                    SnError::Store(format!("File already exists: {}", path))
                }
                ErrorKind::NotFound => SnError::Store(format!(
                    "Folder does not exist for: {}",
                    path
                )),
                _ => SnError::Io(e),
            })?;
        file.write_all(bytes).map_err(SnError::Io)?;
        Ok(FileHandle::new(normalize_folder(path)))
    }
}

impl Vault for FsVault {
    fn exists(&self, path: &str) -> bool {
        self.resolve(path).map(|p| p.exists()).unwrap_or(false)
    }

    fn create_folder(&self, path: &str) -> Result<()> {
        let full = self.resolve(path)?;
        fs::create_dir_all(full).map_err(SnError::Io)
    }

    fn write_text(&self, path: &str, content: &str) -> Result<FileHandle> {
        self.write(path, content.as_bytes())
    }

    fn write_binary(&self, path: &str, bytes: &[u8]) -> Result<FileHandle> {
        self.write(path, bytes)
    }

    fn default_attachment_path(&self, filename: &str) -> Result<String> {
        if !self.attachment_folder.is_empty() {
            self.create_folder(&self.attachment_folder)?;
        }
        let mut attempt = 0;
        loop {
            let candidate = attachment_candidate(&self.attachment_folder, filename, attempt);
            if !self.exists(&candidate) {
                return Ok(candidate);
            }
            attempt += 1;
        }
    }
}
