//! # Storage Layer
//!
//! Exports land in a notes vault: a folder tree addressed with `/`-separated
//! paths relative to its root. The [`Vault`] trait is everything the export
//! pipeline needs from it.
//!
//! ## Implementations
//!
//! - [`fs::FsVault`]: a directory on disk
//!   - Creates files with create-new semantics, so a name taken between the
//!     existence probe and the write surfaces as an error instead of an overwrite
//!   - Unrouted attachments go to the configured attachment folder
//!
//! - [`memory::MemVault`]: in-memory vault for testing
//!   - Records every write, can simulate write failures
//!
//! ## Create semantics
//!
//! `write_text` and `write_binary` never replace an existing file. Callers pick
//! a free name first (see [`crate::unique::allocate`]) or ask the vault for one
//! with [`Vault::default_attachment_path`].

use crate::error::Result;
use crate::model::FileHandle;

pub mod fs;
pub mod memory;

pub trait Vault {
    /// Whether a file or folder exists at the vault path.
    fn exists(&self, path: &str) -> bool;

    /// Create a folder and its parents. Existing folders are fine.
    fn create_folder(&self, path: &str) -> Result<()>;

    fn write_text(&self, path: &str, content: &str) -> Result<FileHandle>;

    fn write_binary(&self, path: &str, bytes: &[u8]) -> Result<FileHandle>;

    /// Free path for a new attachment named `filename`, following the vault's
    /// own placement and naming rules.
    fn default_attachment_path(&self, filename: &str) -> Result<String>;
}

/// Split `name.ext` into `("name", Some("ext"))`; dotfiles keep their dot.
pub(crate) fn split_extension(filename: &str) -> (&str, Option<&str>) {
    match filename.rfind('.') {
        Some(0) | None => (filename, None),
        Some(dot) => (&filename[..dot], Some(&filename[dot + 1..])),
    }
}

/// Host-style attachment naming: `name.ext`, `name 1.ext`, `name 2.ext`, ...
pub(crate) fn attachment_candidate(folder: &str, filename: &str, attempt: u64) -> String {
    let folder = crate::unique::normalize_folder(folder);
    let name = if attempt == 0 {
        filename.to_string()
    } else {
        match split_extension(filename) {
            (stem, Some(ext)) => format!("{} {}.{}", stem, attempt, ext),
            (stem, None) => format!("{} {}", stem, attempt),
        }
    };
    if folder.is_empty() {
        name
    } else {
        format!("{}/{}", folder, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_extension() {
        assert_eq!(split_extension("a.png"), ("a", Some("png")));
        assert_eq!(split_extension("a.b.pdf"), ("a.b", Some("pdf")));
        assert_eq!(split_extension("plain"), ("plain", None));
        assert_eq!(split_extension(".env"), (".env", None));
    }

    #[test]
    fn test_attachment_candidate() {
        assert_eq!(attachment_candidate("", "n.md", 0), "n.md");
        assert_eq!(attachment_candidate("att/", "n.md", 0), "att/n.md");
        assert_eq!(attachment_candidate("att", "n.md", 2), "att/n 2.md");
        assert_eq!(attachment_candidate("", "n", 1), "n 1");
    }
}
