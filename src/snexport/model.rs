use serde::{Deserialize, Serialize};
use std::fmt;

/// Page size used when a decoded note carries no usable dimensions
/// (the Supernote A5X/A6X portrait canvas).
pub const DEFAULT_PAGE_WIDTH: i64 = 1404;
pub const DEFAULT_PAGE_HEIGHT: i64 = 1872;

/// Extension of the source note container.
pub const NOTE_EXTENSION: &str = "note";

/// Decoded, in-memory form of a source note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteDocument {
    #[serde(default)]
    pub page_width: i64,
    #[serde(default)]
    pub page_height: i64,
    #[serde(default)]
    pub pages: Vec<Page>,
}

impl NoteDocument {
    pub fn new(page_width: i64, page_height: i64, pages: Vec<Page>) -> Self {
        Self {
            page_width,
            page_height,
            pages,
        }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Page dimensions, falling back to the default canvas when absent or non-positive.
    pub fn page_size(&self) -> (i64, i64) {
        let width = if self.page_width > 0 {
            self.page_width
        } else {
            DEFAULT_PAGE_WIDTH
        };
        let height = if self.page_height > 0 {
            self.page_height
        } else {
            DEFAULT_PAGE_HEIGHT
        };
        (width, height)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    #[serde(default)]
    pub text: Option<String>,
}

impl Page {
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
        }
    }

    pub fn blank() -> Self {
        Self::default()
    }

    /// The recognized text, only when present and non-empty.
    pub fn recognized_text(&self) -> Option<&str> {
        self.text.as_deref().filter(|t| !t.is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    Markdown,
    Image,
    Pdf,
}

impl ArtifactKind {
    pub fn extension(&self) -> &'static str {
        match self {
            ArtifactKind::Markdown => "md",
            ArtifactKind::Image => "png",
            ArtifactKind::Pdf => "pdf",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ArtifactKind::Markdown => "markdown",
            ArtifactKind::Image => "images",
            ArtifactKind::Pdf => "PDF",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportMode {
    Markdown,
    MarkdownWithImages,
    Pdf,
}

impl ExportMode {
    /// Artifact kinds the mode produces, in the order they are written.
    pub fn kinds(&self) -> &'static [ArtifactKind] {
        match self {
            ExportMode::Markdown => &[ArtifactKind::Markdown],
            ExportMode::MarkdownWithImages => &[ArtifactKind::Image, ArtifactKind::Markdown],
            ExportMode::Pdf => &[ArtifactKind::Pdf],
        }
    }

    /// The artifact a failure before any writing is attributed to.
    pub fn primary_kind(&self) -> ArtifactKind {
        match self {
            ExportMode::Pdf => ArtifactKind::Pdf,
            _ => ArtifactKind::Markdown,
        }
    }
}

/// A source note, identified by its vault path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceNote {
    pub path: String,
}

impl SourceNote {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    /// File name without folders.
    pub fn name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }

    /// File name without folders and without its final extension.
    pub fn basename(&self) -> &str {
        let name = self.name();
        match name.rfind('.') {
            Some(0) | None => name,
            Some(dot) => &name[..dot],
        }
    }
}

/// Handle to a file the vault created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHandle {
    pub path: String,
}

impl FileHandle {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

/// Encoded raster payload for one page (1-based page number).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageImage {
    pub page: usize,
    pub bytes: Vec<u8>,
}
