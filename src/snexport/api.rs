//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer and the single
//! entry point for every snexport operation, whatever the UI.
//!
//! ## Role and Responsibilities
//!
//! The API facade:
//! - **Owns the export context**: the vault, decoder and rasterizer are built
//!   once and handed to each call explicitly, so no state is shared between
//!   calls behind the caller's back
//! - **Loads configuration per call**: settings may change between exports
//! - **Normalizes inputs** (e.g., parsing page lists like `1,3,5-7`)
//! - **Returns structured types** (`Result<CmdResult>`)
//!
//! ## What the API Does NOT Do
//!
//! - **Business logic**: that belongs in `commands/*.rs`
//! - **I/O to the terminal**: no stdout, stderr, or formatting
//!
//! ## Generic Over Vault
//!
//! `SnexportApi<V: Vault>` is generic over the storage backend:
//! - Production: `SnexportApi<FsVault>`
//! - Testing: `SnexportApi<MemVault>`

use crate::commands;
use crate::commands::export::ExportContext;
use crate::config::ExportConfig;
use crate::decode::NoteDecoder;
use crate::error::{Result, SnError};
use crate::model::SourceNote;
use crate::raster::Rasterizer;
use crate::store::Vault;
use chrono::Local;
use std::path::PathBuf;

pub struct SnexportApi<V: Vault> {
    vault: V,
    decoder: Box<dyn NoteDecoder>,
    rasterizer: Box<dyn Rasterizer>,
    config_dir: PathBuf,
}

impl<V: Vault> SnexportApi<V> {
    pub fn new(
        vault: V,
        decoder: Box<dyn NoteDecoder>,
        rasterizer: Box<dyn Rasterizer>,
        config_dir: PathBuf,
    ) -> Self {
        Self {
            vault,
            decoder,
            rasterizer,
            config_dir,
        }
    }

    pub fn vault(&self) -> &V {
        &self.vault
    }

    pub fn config_dir(&self) -> &std::path::Path {
        &self.config_dir
    }

    pub fn load_config(&self) -> Result<ExportConfig> {
        ExportConfig::load(&self.config_dir)
    }

    pub fn export(
        &self,
        note_path: &str,
        bytes: &[u8],
        request: &ExportRequest,
    ) -> Result<commands::CmdResult> {
        let config = self.load_config()?;
        commands::export::run(
            &self.context(&config),
            &SourceNote::new(note_path),
            bytes,
            request,
        )
    }

    pub fn save_page_image(
        &self,
        note_path: &str,
        bytes: &[u8],
        page: usize,
    ) -> Result<commands::CmdResult> {
        let config = self.load_config()?;
        commands::export::save_page_image(
            &self.context(&config),
            &SourceNote::new(note_path),
            bytes,
            page,
        )
        .map(commands::CmdResult::from)
    }

    pub fn inspect(&self, note_path: &str, bytes: &[u8]) -> Result<commands::CmdResult> {
        let config = self.load_config()?;
        commands::inspect::run(self.decoder.as_ref(), &config, note_path, bytes)
    }

    pub fn classify(&self, name: &str) -> Result<commands::CmdResult> {
        let config = self.load_config()?;
        commands::classify::run(&config, name)
    }

    /// Current local time rendered with `pattern`, or with the configured
    /// daily-note pattern.
    pub fn timestamp(&self, pattern: Option<&str>) -> Result<commands::CmdResult> {
        let template = match pattern {
            Some(p) => p.to_string(),
            None => self.load_config()?.daily_note_pattern,
        };
        commands::timestamp::run(&template, &Local::now())
    }

    pub fn config(&self, action: ConfigAction) -> Result<commands::CmdResult> {
        commands::config::run(&self.config_dir, action)
    }

    pub fn init(&self) -> Result<commands::CmdResult> {
        commands::init::run(&self.config_dir)
    }

    fn context<'a>(&'a self, config: &'a ExportConfig) -> ExportContext<'a> {
        ExportContext {
            vault: &self.vault,
            decoder: self.decoder.as_ref(),
            rasterizer: self.rasterizer.as_ref(),
            config,
        }
    }
}

/// Highest page number a page list may name.
pub const MAX_PAGE_NUMBER: usize = 10_000;

/// Parse a page list such as `1,3,5-7` into 1-based page numbers, in order.
pub fn parse_pages(input: &str) -> Result<Vec<usize>> {
    let invalid = || SnError::Api(format!("Invalid page list: {}", input));
    let mut pages = Vec::new();

    for part in input.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        match part.split_once('-') {
            Some((start, end)) => {
                let start: usize = start.trim().parse().map_err(|_| invalid())?;
                let end: usize = end.trim().parse().map_err(|_| invalid())?;
                if start == 0 || end < start || end > MAX_PAGE_NUMBER {
                    return Err(invalid());
                }
                pages.extend(start..=end);
            }
            None => {
                let page: usize = part.parse().map_err(|_| invalid())?;
                if page == 0 || page > MAX_PAGE_NUMBER {
                    return Err(invalid());
                }
                pages.push(page);
            }
        }
    }

    if pages.is_empty() {
        return Err(invalid());
    }
    Ok(pages)
}

pub use crate::commands::config::ConfigAction;
pub use crate::commands::export::{ExportReport, ExportRequest};
pub use commands::{CmdMessage, CmdResult, MessageLevel};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::JsonNoteDecoder;
    use crate::model::{ExportMode, NoteDocument, Page};
    use crate::raster::PlaceholderRasterizer;
    use crate::store::memory::MemVault;

    fn api(dir: &tempfile::TempDir) -> SnexportApi<MemVault> {
        SnexportApi::new(
            MemVault::new(),
            Box::new(JsonNoteDecoder),
            Box::new(PlaceholderRasterizer),
            dir.path().to_path_buf(),
        )
    }

    fn note_bytes() -> Vec<u8> {
        let note = NoteDocument::new(1404, 1872, vec![Page::with_text("hi"), Page::blank()]);
        serde_json::to_vec(&note).unwrap()
    }

    #[test]
    fn test_export_reads_config_each_call() {
        let dir = tempfile::tempdir().unwrap();
        let api = api(&dir);
        let request = ExportRequest::new(ExportMode::Markdown);

        api.config(ConfigAction::Set("markdown_path".into(), "first".into()))
            .unwrap();
        let res = api.export("a.note", &note_bytes(), &request).unwrap();
        assert_eq!(res.created[0].path, "first/a.md");

        api.config(ConfigAction::Set("markdown_path".into(), "second".into()))
            .unwrap();
        let res = api.export("a.note", &note_bytes(), &request).unwrap();
        assert_eq!(res.created[0].path, "second/a.md");
    }

    #[test]
    fn test_save_page_image() {
        let dir = tempfile::tempdir().unwrap();
        let api = api(&dir);
        let res = api.save_page_image("x/a.note", &note_bytes(), 2).unwrap();
        assert_eq!(res.created[0].path, "_assets/supernote/images/a-1.png");
        assert!(api.vault().read_binary(&res.created[0].path).is_some());
    }

    #[test]
    fn test_timestamp_with_explicit_pattern() {
        let dir = tempfile::tempdir().unwrap();
        let res = api(&dir).timestamp(Some("YYYY")).unwrap();
        assert_eq!(res.messages[0].content.len(), 4);
    }

    #[test]
    fn test_parse_pages() {
        assert_eq!(parse_pages("1,3").unwrap(), vec![1, 3]);
        assert_eq!(parse_pages("2-4, 7").unwrap(), vec![2, 3, 4, 7]);
        assert!(parse_pages("").is_err());
        assert!(parse_pages("0").is_err());
        assert!(parse_pages("3-1").is_err());
        assert!(parse_pages("a").is_err());
    }

    #[test]
    fn test_parse_pages_rejects_huge_ranges() {
        assert!(parse_pages("1-18446744073709551615").is_err());
        assert!(parse_pages("1-4000000000").is_err());
        assert!(parse_pages("10001").is_err());
        assert_eq!(parse_pages("9999-10000").unwrap(), vec![9999, 10000]);
    }
}
