use crate::commands::{CmdMessage, CmdResult};
use crate::config::ExportConfig;
use crate::error::Result;
use crate::model::SourceNote;
use crate::paths::{self, NoteCategory};

/// Report whether a note name counts as a daily note under the configured
/// pattern. A malformed pattern is an error here rather than a fallback.
pub fn run(config: &ExportConfig, name: &str) -> Result<CmdResult> {
    let base = SourceNote::new(name);
    let category = paths::classify(base.name(), &config.daily_note_pattern)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::info(category.to_string()));
    if category == NoteCategory::Daily && config.use_note_categorization {
        result.add_message(CmdMessage::info(format!(
            "Transcripts go to: {}",
            display_folder(&config.daily_note_folder)
        )));
    } else if config.use_note_categorization {
        result.add_message(CmdMessage::info(format!(
            "Transcripts go to: {}",
            display_folder(&config.concept_note_folder)
        )));
    }
    Ok(result)
}

fn display_folder(folder: &str) -> &str {
    if folder.trim_matches('/').is_empty() {
        "(vault attachment folder)"
    } else {
        folder
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_names() {
        let config = ExportConfig::default();
        let res = run(&config, "Supernote/20240115-093000.note").unwrap();
        assert_eq!(res.messages[0].content, "daily");
        assert_eq!(res.messages.len(), 1);

        let res = run(&config, "MyIdeas").unwrap();
        assert_eq!(res.messages[0].content, "concept");
    }

    #[test]
    fn test_reports_destination_when_categorizing() {
        let config = ExportConfig {
            use_note_categorization: true,
            ..Default::default()
        };
        let res = run(&config, "20240115-093000").unwrap();
        assert_eq!(res.messages[1].content, "Transcripts go to: Daily Notes");

        let res = run(&config, "MyIdeas").unwrap();
        assert_eq!(
            res.messages[1].content,
            "Transcripts go to: (vault attachment folder)"
        );
    }

    #[test]
    fn test_bad_pattern_is_an_error() {
        let config = ExportConfig {
            daily_note_pattern: String::new(),
            ..Default::default()
        };
        assert!(run(&config, "x").is_err());
    }
}
