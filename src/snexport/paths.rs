//! Destination folders per artifact kind.
//!
//! Every kind starts from its configured base path. With categorization on,
//! the Markdown transcript is routed instead: notes whose filename matches the
//! daily-note pattern go to `daily_note_folder`, all others to
//! `concept_note_folder`. Images and PDFs hang off the transcript and always
//! stay in their base paths.

use crate::config::ExportConfig;
use crate::error::PatternError;
use crate::model::ArtifactKind;
use crate::pattern::DatePattern;
use log::warn;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDestination {
    /// Vault folder; empty means the vault root.
    pub folder: String,
}

impl ResolvedDestination {
    pub fn new(folder: impl Into<String>) -> Self {
        Self {
            folder: folder.into(),
        }
    }

    pub fn is_root(&self) -> bool {
        crate::unique::normalize_folder(&self.folder).is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteCategory {
    Daily,
    Concept,
}

impl fmt::Display for NoteCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoteCategory::Daily => f.write_str("daily"),
            NoteCategory::Concept => f.write_str("concept"),
        }
    }
}

/// Categorization could not run; the unrouted base path was used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathResolutionWarning {
    pub pattern: String,
    pub reason: String,
}

impl fmt::Display for PathResolutionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Daily note pattern '{}' is unusable ({}); using the configured output folder",
            self.pattern, self.reason
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub destination: ResolvedDestination,
    /// Set when categorization ran.
    pub category: Option<NoteCategory>,
    pub warning: Option<PathResolutionWarning>,
}

pub fn classify(filename_base: &str, pattern: &str) -> Result<NoteCategory, PatternError> {
    let pattern = DatePattern::compile(pattern)?;
    if pattern.test(filename_base) {
        Ok(NoteCategory::Daily)
    } else {
        Ok(NoteCategory::Concept)
    }
}

pub fn resolve(kind: ArtifactKind, filename_base: &str, config: &ExportConfig) -> Resolution {
    let base = config.base_path(kind);
    let unrouted = |warning| Resolution {
        destination: ResolvedDestination::new(base),
        category: None,
        warning,
    };

    if !config.use_note_categorization {
        return unrouted(None);
    }

    let category = match classify(filename_base, &config.daily_note_pattern) {
        Ok(category) => category,
        Err(e) => {
            let warning = PathResolutionWarning {
                pattern: config.daily_note_pattern.clone(),
                reason: e.to_string(),
            };
            warn!("{}", warning);
            return unrouted(Some(warning));
        }
    };

    let folder = match (kind, category) {
        (ArtifactKind::Markdown, NoteCategory::Daily) => config.daily_note_folder.as_str(),
        (ArtifactKind::Markdown, NoteCategory::Concept) => config.concept_note_folder.as_str(),
        _ => base,
    };

    Resolution {
        destination: ResolvedDestination::new(folder),
        category: Some(category),
        warning: None,
    }
}
