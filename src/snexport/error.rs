use crate::model::{ArtifactKind, FileHandle};
use thiserror::Error;

/// Failures while compiling a date/time filename template.
#[derive(Error, Debug)]
pub enum PatternError {
    #[error("date pattern is empty")]
    Empty,

    #[error("date pattern `{0}` contains no date or time tokens")]
    NoTokens(String),

    #[error("year {0} does not fit a four-digit `YYYY` token")]
    YearOutOfRange(i64),

    #[error("date pattern could not be compiled: {0}")]
    Regex(#[from] regex::Error),
}

#[derive(Error, Debug)]
pub enum SnError {
    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Raster error on page {page}: {reason}")]
    Raster { page: usize, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid date pattern: {0}")]
    Pattern(#[from] PatternError),

    #[error("Store error: {0}")]
    Store(String),

    #[error("PDF error: {0}")]
    Pdf(String),

    #[error("Export cancelled before page {0}")]
    Cancelled(usize),

    #[error("Api Error: {0}")]
    Api(String),

    /// A fatal failure while producing one artifact kind. `written` holds the
    /// files created before the failure; they are never rolled back.
    #[error("Failed to export {kind}: {source}{}", partial_suffix(.written))]
    Export {
        kind: ArtifactKind,
        written: Vec<FileHandle>,
        source: Box<SnError>,
    },
}

impl SnError {
    pub fn export(kind: ArtifactKind, written: Vec<FileHandle>, source: SnError) -> Self {
        SnError::Export {
            kind,
            written,
            source: Box::new(source),
        }
    }

    /// Files already created when an export failed part-way.
    pub fn written(&self) -> &[FileHandle] {
        match self {
            SnError::Export { written, .. } => written,
            _ => &[],
        }
    }
}

fn partial_suffix(written: &[FileHandle]) -> String {
    match written.len() {
        0 => String::new(),
        1 => " (partial: 1 file was written before the failure)".to_string(),
        n => format!(" (partial: {} files were written before the failure)", n),
    }
}

pub type Result<T> = std::result::Result<T, SnError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_error_names_kind_and_cause() {
        let err = SnError::export(
            ArtifactKind::Pdf,
            Vec::new(),
            SnError::Decode("bad magic".into()),
        );
        let msg = err.to_string();
        assert!(msg.contains("PDF"));
        assert!(msg.contains("bad magic"));
        assert!(!msg.contains("partial"));
    }

    #[test]
    fn test_export_error_reports_partial_writes() {
        let written = vec![
            FileHandle::new("img/a-0.png"),
            FileHandle::new("img/a-1.png"),
        ];
        let err = SnError::export(
            ArtifactKind::Image,
            written,
            SnError::Raster {
                page: 3,
                reason: "boom".into(),
            },
        );
        assert!(err.to_string().contains("partial: 2 files"));
        assert_eq!(err.written().len(), 2);
    }

    #[test]
    fn test_pattern_error_converts() {
        let err: SnError = PatternError::Empty.into();
        assert!(err.to_string().contains("empty"));
    }
}
