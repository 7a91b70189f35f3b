use crate::commands::CmdResult;
use crate::config::ExportConfig;
use crate::decode::NoteDecoder;
use crate::dictionary::TextTransform;
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteInspection {
    pub name: String,
    pub page_width: i64,
    pub page_height: i64,
    /// Page titles, only for multi-page notes with the table of contents on.
    pub toc: Vec<String>,
    pub pages: Vec<PageSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSummary {
    pub number: usize,
    pub lines: Vec<String>,
    /// Lines left out because recognized text is collapsed.
    pub hidden_lines: usize,
}

pub fn run(
    decoder: &dyn NoteDecoder,
    config: &ExportConfig,
    name: &str,
    bytes: &[u8],
) -> Result<CmdResult> {
    let note = decoder.decode(bytes)?;
    let (page_width, page_height) = note.page_size();

    let toc = if config.show_toc && note.page_count() > 1 {
        (1..=note.page_count())
            .map(|n| format!("Page {}", n))
            .collect()
    } else {
        Vec::new()
    };

    let pages = note
        .pages
        .iter()
        .enumerate()
        .map(|(i, page)| {
            let text = page
                .recognized_text()
                .map(|t| config.dictionary.apply(t))
                .unwrap_or_default();
            let mut lines: Vec<String> = text.lines().map(str::to_string).collect();
            let mut hidden_lines = 0;
            if config.collapse_recognized_text && lines.len() > 1 {
                hidden_lines = lines.len() - 1;
                lines.truncate(1);
            }
            PageSummary {
                number: i + 1,
                lines,
                hidden_lines,
            }
        })
        .collect();

    Ok(CmdResult::default().with_inspection(NoteInspection {
        name: name.to_string(),
        page_width,
        page_height,
        toc,
        pages,
    }))
}
