//! # Configuration
//!
//! Export settings live in `.snexport/config.json` at the vault root. A missing
//! file means defaults; missing keys inside the file fall back individually.
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `markdown_path` | `""` | Folder for Markdown transcripts (empty: host attachment location) |
//! | `images_path` | `_assets/supernote/images` | Folder for page images |
//! | `pdf_path` | `_assets/supernote/pdf` | Folder for PDFs |
//! | `use_note_categorization` | `false` | Route transcripts by daily-note pattern |
//! | `daily_note_pattern` | `YYYYMMDD-HHMMSS` | Filename template of daily notes |
//! | `daily_note_folder` | `Daily Notes` | Transcript folder for daily notes |
//! | `concept_note_folder` | `""` | Transcript folder for every other note |
//! | `invert_colors_when_dark` | `true` | Add the dark-mode invert marker to embeds |
//! | `collapse_recognized_text` | `false` | Show only the first line of page text when inspecting |
//! | `show_toc` | `true` | Print a table of contents when inspecting multi-page notes |
//! | `note_image_max_dim` | `800` | Display size hint for hosts, in px |
//! | `attachment_folder` | `""` | Where the filesystem vault puts unrouted attachments |
//! | `dictionary` | disabled, empty | Recognition corrections, see [`CustomDictionary`] |
//!
//! Only the scalar keys can be read or written with `snexport config`.

use crate::dictionary::CustomDictionary;
use crate::error::{Result, SnError};
use crate::model::ArtifactKind;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const CONFIG_DIRNAME: &str = ".snexport";
pub const CONFIG_FILENAME: &str = "config.json";

pub const DEFAULT_DAILY_NOTE_PATTERN: &str = "YYYYMMDD-HHMMSS";

const SCALAR_KEYS: &[&str] = &[
    "markdown_path",
    "images_path",
    "pdf_path",
    "use_note_categorization",
    "daily_note_pattern",
    "daily_note_folder",
    "concept_note_folder",
    "invert_colors_when_dark",
    "collapse_recognized_text",
    "show_toc",
    "note_image_max_dim",
    "attachment_folder",
    "dictionary.enabled",
];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ExportConfig {
    pub markdown_path: String,
    pub images_path: String,
    pub pdf_path: String,
    pub use_note_categorization: bool,
    pub daily_note_pattern: String,
    pub daily_note_folder: String,
    pub concept_note_folder: String,
    pub invert_colors_when_dark: bool,
    pub collapse_recognized_text: bool,
    pub show_toc: bool,
    pub note_image_max_dim: u32,
    pub attachment_folder: String,
    pub dictionary: CustomDictionary,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            markdown_path: String::new(),
            images_path: "_assets/supernote/images".to_string(),
            pdf_path: "_assets/supernote/pdf".to_string(),
            use_note_categorization: false,
            daily_note_pattern: DEFAULT_DAILY_NOTE_PATTERN.to_string(),
            daily_note_folder: "Daily Notes".to_string(),
            concept_note_folder: String::new(),
            invert_colors_when_dark: true,
            collapse_recognized_text: false,
            show_toc: true,
            note_image_max_dim: 800,
            attachment_folder: String::new(),
            dictionary: CustomDictionary::default(),
        }
    }
}

impl ExportConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(SnError::Io)?;
        let config: ExportConfig =
            serde_json::from_str(&content).map_err(SnError::Serialization)?;
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();
        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(SnError::Io)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(SnError::Serialization)?;
        fs::write(config_path, content).map_err(SnError::Io)?;
        Ok(())
    }

    /// Configured folder for an artifact kind, before categorization.
    pub fn base_path(&self, kind: ArtifactKind) -> &str {
        match kind {
            ArtifactKind::Markdown => &self.markdown_path,
            ArtifactKind::Image => &self.images_path,
            ArtifactKind::Pdf => &self.pdf_path,
        }
    }

    pub fn keys() -> &'static [&'static str] {
        SCALAR_KEYS
    }

    pub fn get(&self, key: &str) -> Option<String> {
        let value = match key {
            "markdown_path" => self.markdown_path.clone(),
            "images_path" => self.images_path.clone(),
            "pdf_path" => self.pdf_path.clone(),
            "use_note_categorization" => self.use_note_categorization.to_string(),
            "daily_note_pattern" => self.daily_note_pattern.clone(),
            "daily_note_folder" => self.daily_note_folder.clone(),
            "concept_note_folder" => self.concept_note_folder.clone(),
            "invert_colors_when_dark" => self.invert_colors_when_dark.to_string(),
            "collapse_recognized_text" => self.collapse_recognized_text.to_string(),
            "show_toc" => self.show_toc.to_string(),
            "note_image_max_dim" => self.note_image_max_dim.to_string(),
            "attachment_folder" => self.attachment_folder.clone(),
            "dictionary.enabled" => self.dictionary.enabled.to_string(),
            _ => return None,
        };
        Some(value)
    }

    pub fn set(&mut self, key: &str, value: &str) -> std::result::Result<(), String> {
        match key {
            "markdown_path" => self.markdown_path = value.to_string(),
            "images_path" => self.images_path = value.to_string(),
            "pdf_path" => self.pdf_path = value.to_string(),
            "use_note_categorization" => self.use_note_categorization = parse_bool(key, value)?,
            "daily_note_pattern" => self.daily_note_pattern = value.to_string(),
            "daily_note_folder" => self.daily_note_folder = value.to_string(),
            "concept_note_folder" => self.concept_note_folder = value.to_string(),
            "invert_colors_when_dark" => self.invert_colors_when_dark = parse_bool(key, value)?,
            "collapse_recognized_text" => {
                self.collapse_recognized_text = parse_bool(key, value)?
            }
            "show_toc" => self.show_toc = parse_bool(key, value)?,
            "note_image_max_dim" => {
                self.note_image_max_dim = value
                    .parse()
                    .map_err(|_| format!("{} expects a positive number, got '{}'", key, value))?
            }
            "attachment_folder" => self.attachment_folder = value.to_string(),
            "dictionary.enabled" => self.dictionary.enabled = parse_bool(key, value)?,
            _ => return Err(format!("Unknown config key: {}", key)),
        }
        Ok(())
    }
}

fn parse_bool(key: &str, value: &str) -> std::result::Result<bool, String> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(format!("{} expects true or false, got '{}'", key, value)),
    }
}
