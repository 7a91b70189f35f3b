use super::{attachment_candidate, Vault};
use crate::error::{Result, SnError};
use crate::model::FileHandle;
use crate::unique::normalize_folder;
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};

/// In-memory vault for testing.
///
/// Uses `RefCell` for interior mutability since exports are single-threaded,
/// which lets [`Vault`] take `&self` everywhere. Like a real vault, writing into
/// a folder that was never created fails.
pub struct MemVault {
    files: RefCell<BTreeMap<String, Vec<u8>>>,
    folders: RefCell<BTreeSet<String>>,
    attachment_folder: String,
    simulate_write_error: RefCell<bool>,
}

impl Default for MemVault {
    fn default() -> Self {
        Self {
            files: RefCell::new(BTreeMap::new()),
            folders: RefCell::new(BTreeSet::new()),
            attachment_folder: String::new(),
            simulate_write_error: RefCell::new(false),
        }
    }
}

impl MemVault {
    pub fn new() -> Self {
        Self::default()
    }

    /// Vault whose unrouted attachments go to `folder` (created up front).
    pub fn with_attachment_folder(folder: &str) -> Self {
        let vault = Self {
            attachment_folder: normalize_folder(folder).to_string(),
            ..Self::default()
        };
        vault.add_folders(folder);
        vault
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        *self.simulate_write_error.borrow_mut() = simulate;
    }

    /// Test helper: place a file as if it already existed, creating its folders.
    pub fn insert_file(&self, path: &str, bytes: &[u8]) {
        let path = normalize_folder(path);
        if let Some((parent, _)) = path.rsplit_once('/') {
            self.add_folders(parent);
        }
        self.files
            .borrow_mut()
            .insert(path.to_string(), bytes.to_vec());
    }

    pub fn read_binary(&self, path: &str) -> Option<Vec<u8>> {
        self.files.borrow().get(normalize_folder(path)).cloned()
    }

    pub fn read_text(&self, path: &str) -> Option<String> {
        self.read_binary(path)
            .and_then(|bytes| String::from_utf8(bytes).ok())
    }

    /// All file paths, sorted.
    pub fn files(&self) -> Vec<String> {
        self.files.borrow().keys().cloned().collect()
    }

    pub fn has_folder(&self, path: &str) -> bool {
        self.folders.borrow().contains(normalize_folder(path))
    }

    fn add_folders(&self, path: &str) {
        let path = normalize_folder(path);
        let mut folders = self.folders.borrow_mut();
        let mut prefix = String::new();
        for part in path.split('/').filter(|p| !p.is_empty()) {
            if !prefix.is_empty() {
                prefix.push('/');
            }
            prefix.push_str(part);
            folders.insert(prefix.clone());
        }
    }

    fn write(&self, path: &str, bytes: &[u8]) -> Result<FileHandle> {
        if *self.simulate_write_error.borrow() {
            return Err(SnError::Store("Simulated write error".to_string()));
        }
        let path = normalize_folder(path);
        if self.exists(path) {
            return Err(SnError::Store(format!("File already exists: {}", path)));
        }
        if let Some((parent, _)) = path.rsplit_once('/') {
            if !self.has_folder(parent) {
                return Err(SnError::Store(format!("Folder does not exist: {}", parent)));
            }
        }
        self.files
            .borrow_mut()
            .insert(path.to_string(), bytes.to_vec());
        Ok(FileHandle::new(path))
    }
}

impl Vault for MemVault {
    fn exists(&self, path: &str) -> bool {
        let path = normalize_folder(path);
        self.files.borrow().contains_key(path) || self.folders.borrow().contains(path)
    }

    fn create_folder(&self, path: &str) -> Result<()> {
        if *self.simulate_write_error.borrow() {
            return Err(SnError::Store("Simulated write error".to_string()));
        }
        if self.files.borrow().contains_key(normalize_folder(path)) {
            return Err(SnError::Store(format!("A file is in the way: {}", path)));
        }
        self.add_folders(path);
        Ok(())
    }

    fn write_text(&self, path: &str, content: &str) -> Result<FileHandle> {
        self.write(path, content.as_bytes())
    }

    fn write_binary(&self, path: &str, bytes: &[u8]) -> Result<FileHandle> {
        self.write(path, bytes)
    }

    fn default_attachment_path(&self, filename: &str) -> Result<String> {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_requires_folder() {
        let vault = MemVault::new();
        assert!(vault.write_text("a/b.md", "x").is_err());

        vault.create_folder("a").unwrap();
        let handle = vault.write_text("a/b.md", "x").unwrap();
        assert_eq!(handle.path, "a/b.md");
        assert_eq!(vault.read_text("a/b.md").as_deref(), Some("x"));
    }

    #[test]
    fn test_write_never_overwrites() {
        let vault = MemVault::new();
        vault.write_text("n.md", "one").unwrap();
        assert!(matches!(
            vault.write_text("n.md", "two"),
            Err(SnError::Store(_))
        ));
        assert_eq!(vault.read_text("n.md").as_deref(), Some("one"));
    }

    #[test]
    fn test_create_folder_is_idempotent_and_makes_parents() {
        let vault = MemVault::new();
        vault.create_folder("x/y/z").unwrap();
        vault.create_folder("x/y/z/").unwrap();
        assert!(vault.exists("x"));
        assert!(vault.exists("x/y"));
        assert!(vault.has_folder("x/y/z"));
    }

    #[test]
    fn test_default_attachment_path_suffixes_with_space() {
        let vault = MemVault::with_attachment_folder("Attachments");
        assert_eq!(
            vault.default_attachment_path("n.png").unwrap(),
            "Attachments/n.png"
        );
        vault.insert_file("Attachments/n.png", b"");
        vault.insert_file("Attachments/n 1.png", b"");
        assert_eq!(
            vault.default_attachment_path("n.png").unwrap(),
            "Attachments/n 2.png"
        );
    }

    #[test]
    fn test_simulated_write_error() {
        let vault = MemVault::new();
        vault.set_simulate_write_error(true);
        assert!(vault.write_binary("a.png", &[1, 2]).is_err());
        assert!(vault.create_folder("a").is_err());
        assert!(vault.files().is_empty());
    }
}
