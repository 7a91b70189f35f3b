//! Source note decoding.
//!
//! Parsing the device's binary container is outside this crate. Decoders turn
//! whatever the host hands over into a [`NoteDocument`].

use crate::error::{Result, SnError};
use crate::model::NoteDocument;
use log::debug;

pub trait NoteDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<NoteDocument>;
}

/// Reads an already-decoded note manifest:
///
/// ```json
/// { "pageWidth": 1404, "pageHeight": 1872, "pages": [{ "text": "..." }, {}] }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonNoteDecoder;

impl NoteDecoder for JsonNoteDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<NoteDocument> {
        let note: NoteDocument =
            serde_json::from_slice(bytes).map_err(|e| SnError::Decode(e.to_string()))?;
        debug!(
            "decoded note: {} pages, {}x{}",
            note.page_count(),
            note.page_width,
            note.page_height
        );
        Ok(note)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_manifest() {
        let bytes = br#"{"pageWidth":1404,"pageHeight":1872,"pages":[{"text":"hi"},{}]}"#;
        let note = JsonNoteDecoder.decode(bytes).unwrap();
        assert_eq!(note.page_count(), 2);
        assert_eq!(note.pages[0].recognized_text(), Some("hi"));
    }

    #[test]
    fn test_missing_fields_default() {
        let note = JsonNoteDecoder.decode(b"{}").unwrap();
        assert_eq!(note.page_count(), 0);
        assert_eq!(note.page_size(), (1404, 1872));
    }

    #[test]
    fn test_malformed_input_is_decode_error() {
        assert!(matches!(
            JsonNoteDecoder.decode(b"\x89NOTE binary"),
            Err(SnError::Decode(_))
        ));
        assert!(matches!(
            JsonNoteDecoder.decode(br#"{"pages": 3}"#),
            Err(SnError::Decode(_))
        ));
    }
}
