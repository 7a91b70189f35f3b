use crate::dictionary::TextTransform;
use crate::model::{FileHandle, NoteDocument, SourceNote};

/// Embed modifier asking hosts to invert the image in dark themes.
pub const INVERT_DARK_SUBPATH: &str = "supernote-invert-dark";

#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownOptions {
    pub invert_colors_when_dark: bool,
}

pub fn wiki_link(path: &str) -> String {
    format!("[[{}]]", path)
}

pub fn embed(path: &str, subpath: Option<&str>) -> String {
    match subpath {
        Some(sub) => format!("![[{}#{}]]", path, sub),
        None => format!("![[{}]]", path),
    }
}

/// Backslash-escape lines that Markdown would read as a heading, either ATX
/// (`# title`) or a setext underline (`---`, `===`), so the only headings in
/// a transcript are the page headings.
pub fn escape_headings(text: &str) -> String {
    text.split('\n')
        .map(|line| {
            let indent = line.len() - line.trim_start_matches(' ').len();
            let body = line[indent..].trim_end();
            let heading_like = indent < 4
                && (is_atx_opener(body)
                    || (!body.is_empty() && body.chars().all(|c| c == '-'))
                    || (!body.is_empty() && body.chars().all(|c| c == '=')));
            if heading_like {
                format!("{}\\{}", &line[..indent], &line[indent..])
            } else {
                line.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// One to six `#` followed by whitespace or the end of the line.
fn is_atx_opener(line: &str) -> bool {
    let hashes = line.len() - line.trim_start_matches('#').len();
    (1..=6).contains(&hashes)
        && line[hashes..]
            .chars()
            .next()
            .map_or(true, |c| c == ' ' || c == '\t')
}

/// Build the transcript.
///
/// `images[i]` is the image for page `i + 1`. Pages past the end of `images`,
/// or with `None`, get no embed.
pub fn assemble(
    source: &SourceNote,
    note: &NoteDocument,
    images: &[Option<FileHandle>],
    transform: &dyn TextTransform,
    options: &MarkdownOptions,
) -> String {
    let subpath = options
        .invert_colors_when_dark
        .then_some(INVERT_DARK_SUBPATH);

    let mut out = wiki_link(&source.path);
    out.push('\n');

    for (i, page) in note.pages.iter().enumerate() {
        out.push_str(&format!("## Page {}\n\n", i + 1));
        if let Some(text) = page.recognized_text() {
            out.push_str(&escape_headings(&transform.apply(text)));
            out.push('\n');
        }
        if let Some(Some(image)) = images.get(i) {
            out.push_str(&embed(&image.path, subpath));
            out.push('\n');
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::{CustomDictionary, DictionaryEntry, Verbatim};
    use crate::model::Page;
    use pulldown_cmark::{Event, HeadingLevel, Parser, Tag, TagEnd};

    fn source() -> SourceNote {
        SourceNote::new("Supernote/Note/meeting.note")
    }

    fn headings(markdown: &str) -> Vec<String> {
        let mut out = Vec::new();
        let mut current: Option<String> = None;
        for event in Parser::new(markdown) {
            match event {
                Event::Start(Tag::Heading {
                    level: HeadingLevel::H2,
                    ..
                }) => current = Some(String::new()),
                Event::Text(text) => {
                    if let Some(h) = current.as_mut() {
                        h.push_str(&text);
                    }
                }
                Event::End(TagEnd::Heading(HeadingLevel::H2)) => {
                    out.extend(current.take());
                }
                _ => {}
            }
        }
        out
    }

    #[test]
    fn test_layout() {
        let note = NoteDocument::new(
            1404,
            1872,
            vec![Page::blank(), Page::with_text("hello"), Page::with_text("")],
        );
        let md = assemble(&source(), &note, &[], &Verbatim, &MarkdownOptions::default());
        assert_eq!(
            md,
            "[[Supernote/Note/meeting.note]]\n\
             ## Page 1\n\n\
             ## Page 2\n\nhello\n\
             ## Page 3\n\n"
        );
    }

    #[test]
    fn test_one_heading_per_page_in_order() {
        for n in [0, 1, 2, 7] {
            let pages = (0..n)
                .map(|i| {
                    if i % 2 == 0 {
                        Page::blank()
                    } else {
                        Page::with_text(format!("text {}", i))
                    }
                })
                .collect();
            let note = NoteDocument::new(1404, 1872, pages);
            let md = assemble(&source(), &note, &[], &Verbatim, &MarkdownOptions::default());
            let expected: Vec<String> = (1..=n).map(|i| format!("Page {}", i)).collect();
            assert_eq!(headings(&md), expected);
        }
    }

    #[test]
    fn test_image_embeds_with_invert_marker() {
        let note = NoteDocument::new(1404, 1872, vec![Page::with_text("a"), Page::blank()]);
        let images = vec![
            Some(FileHandle::new("img/meeting-0.png")),
            Some(FileHandle::new("img/meeting-1.png")),
        ];
        let options = MarkdownOptions {
            invert_colors_when_dark: true,
        };
        let md = assemble(&source(), &note, &images, &Verbatim, &options);
        assert!(md.contains("## Page 1\n\na\n![[img/meeting-0.png#supernote-invert-dark]]\n"));
        assert!(md.contains("## Page 2\n\n![[img/meeting-1.png#supernote-invert-dark]]\n"));

        let md = assemble(
            &source(),
            &note,
            &images,
            &Verbatim,
            &MarkdownOptions::default(),
        );
        assert!(md.contains("![[img/meeting-0.png]]\n"));
    }

    #[test]
    fn test_partial_image_set_skips_missing_pages() {
        let note = NoteDocument::new(1404, 1872, vec![Page::blank(); 3]);
        let images = vec![None, Some(FileHandle::new("p2.png"))];
        let md = assemble(&source(), &note, &images, &Verbatim, &MarkdownOptions::default());
        assert_eq!(md.matches("![[").count(), 1);
        assert!(md.contains("## Page 2\n\n![[p2.png]]\n## Page 3"));
    }

    #[test]
    fn test_page_text_cannot_add_headings() {
        let note = NoteDocument::new(
            1404,
            1872,
            vec![
                Page::with_text("Shopping\n---"),
                Page::with_text("## todo\nTotals\n  ===\n#tag"),
            ],
        );
        let md = assemble(&source(), &note, &[], &Verbatim, &MarkdownOptions::default());
        assert_eq!(headings(&md), vec!["Page 1", "Page 2"]);
        assert!(md.contains("Shopping\n\\---\n"));
        assert!(md.contains("\\## todo\n"));
        assert!(md.contains("  \\===\n"));
        assert!(md.contains("\n#tag\n"));
    }

    #[test]
    fn test_escape_headings_leaves_ordinary_lines() {
        assert_eq!(escape_headings("a - b\n- item\n    # code"), "a - b\n- item\n    # code");
        assert_eq!(escape_headings("#tag\n####### seven"), "#tag\n####### seven");
        assert_eq!(escape_headings("#\n### x"), "\\#\n\\### x");
        assert_eq!(escape_headings(""), "");
    }

    #[test]
    fn test_dictionary_applies_to_page_text() {
        let note = NoteDocument::new(1404, 1872, vec![Page::with_text("teh plan")]);
        let dict = CustomDictionary {
            enabled: true,
            entries: vec![DictionaryEntry::new("teh", "the")],
        };
        let md = assemble(&source(), &note, &[], &dict, &MarkdownOptions::default());
        assert!(md.contains("the plan\n"));
        assert!(!md.contains("teh"));
    }
}
