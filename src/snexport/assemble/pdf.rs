//! Searchable PDF output.
//!
//! Each page draws its raster image over the full page. When the page has
//! recognized text, it is laid out first in text render mode 3 (neither filled
//! nor stroked), so the image is all that shows while viewers can still search
//! and select the words.

use crate::dictionary::TextTransform;
use crate::error::{Result, SnError};
use crate::model::{NoteDocument, PageImage};
use flate2::write::ZlibEncoder;
use flate2::Compression;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};
use std::io::Write;

const FONT_NAME: &str = "F1";
const FONT_SIZE: i64 = 100;
const TEXT_MARGIN: i64 = 20;
/// Line advance as a multiple of the font size.
const LINE_HEIGHT_FACTOR: f32 = 1.15;
/// Rough Helvetica advance width per character, as a fraction of the font size.
const GLYPH_WIDTH_FACTOR: f32 = 0.5;

struct PendingPage {
    operations: Vec<Operation>,
    xobjects: lopdf::Dictionary,
}

impl PendingPage {
    fn new() -> Self {
        Self {
            operations: Vec::new(),
            xobjects: lopdf::Dictionary::new(),
        }
    }
}

/// Incremental page builder. The first page exists from the start; every
/// further page needs [`PdfCanvas::add_page`] before content goes on it.
pub struct PdfCanvas {
    doc: Document,
    pages_id: ObjectId,
    font_id: ObjectId,
    width: i64,
    height: i64,
    finished: Vec<ObjectId>,
    current: PendingPage,
    image_count: usize,
}

impl PdfCanvas {
    pub fn new(width: i64, height: i64) -> Self {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });
        Self {
            doc,
            pages_id,
            font_id,
            width,
            height,
            finished: Vec::new(),
            current: PendingPage::new(),
            image_count: 0,
        }
    }

    pub fn page_count(&self) -> usize {
        self.finished.len() + 1
    }

    /// Close the current page and start a new, empty one.
    pub fn add_page(&mut self) -> Result<()> {
        let page = std::mem::replace(&mut self.current, PendingPage::new());
        let id = self.write_page(page)?;
        self.finished.push(id);
        Ok(())
    }

    /// Lay out invisible text from the top-left corner, wrapped to the page width.
    pub fn invisible_text(&mut self, text: &str) {
        let lines = wrap(text, self.chars_per_line());
        if lines.is_empty() {
            return;
        }

        let leading = FONT_SIZE as f32 * LINE_HEIGHT_FACTOR;
        let baseline = self.height - TEXT_MARGIN - FONT_SIZE;
        let ops = &mut self.current.operations;
        ops.push(Operation::new("BT", vec![]));
        ops.push(Operation::new(
            "Tf",
            vec![FONT_NAME.into(), FONT_SIZE.into()],
        ));
        ops.push(Operation::new("Tr", vec![3.into()]));
        ops.push(Operation::new("TL", vec![leading.into()]));
        ops.push(Operation::new(
            "Td",
            vec![TEXT_MARGIN.into(), baseline.into()],
        ));
        for (i, line) in lines.iter().enumerate() {
            if i > 0 {
                ops.push(Operation::new("T*", vec![]));
            }
            ops.push(Operation::new(
                "Tj",
                vec![Object::string_literal(to_win_ansi(line))],
            ));
        }
        ops.push(Operation::new("ET", vec![]));
    }

    /// Draw an encoded image (any format the `image` crate reads) over the
    /// whole page. Transparency is flattened onto white.
    pub fn full_page_image(&mut self, encoded: &[u8]) -> Result<()> {
        let decoded = image::load_from_memory(encoded)
            .map_err(|e| SnError::Pdf(format!("unreadable page image: {}", e)))?
            .to_rgba8();
        let (w, h) = decoded.dimensions();

        let mut rgb = Vec::with_capacity((w as usize) * (h as usize) * 3);
        for pixel in decoded.pixels() {
            let [r, g, b, a] = pixel.0;
            for channel in [r, g, b] {
                rgb.push(over_white(channel, a));
            }
        }

        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&rgb)?;
        let compressed = encoder.finish()?;

        let stream = Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => i64::from(w),
                "Height" => i64::from(h),
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8,
                "Filter" => "FlateDecode",
            },
            compressed,
        );
        let image_id = self.doc.add_object(stream);

        self.image_count += 1;
        let name = format!("Im{}", self.image_count);
        self.current.xobjects.set(name.as_bytes().to_vec(), image_id);

        let ops = &mut self.current.operations;
        ops.push(Operation::new("q", vec![]));
        ops.push(Operation::new(
            "cm",
            vec![
                self.width.into(),
                0.into(),
                0.into(),
                self.height.into(),
                0.into(),
                0.into(),
            ],
        ));
        ops.push(Operation::new("Do", vec![Object::Name(name.into_bytes())]));
        ops.push(Operation::new("Q", vec![]));
        Ok(())
    }

    /// Close the last page and serialize the document.
    pub fn finish(mut self) -> Result<Vec<u8>> {
        let page = std::mem::replace(&mut self.current, PendingPage::new());
        let id = self.write_page(page)?;
        self.finished.push(id);

        let kids: Vec<Object> = self.finished.iter().map(|id| (*id).into()).collect();
        let count = kids.len() as i64;
        self.doc.objects.insert(
            self.pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );

        let catalog_id = self.doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });
        self.doc.trailer.set("Root", catalog_id);

        let mut out = Vec::new();
        self.doc
            .save_to(&mut out)
            .map_err(|e| SnError::Pdf(e.to_string()))?;
        Ok(out)
    }

    fn write_page(&mut self, page: PendingPage) -> Result<ObjectId> {
        let content = Content {
            operations: page.operations,
        };
        let encoded = content.encode().map_err(|e| SnError::Pdf(e.to_string()))?;
        let content_id = self.doc.add_object(Stream::new(lopdf::Dictionary::new(), encoded));

        let media_box: Vec<Object> = vec![
            0.into(),
            0.into(),
            self.width.into(),
            self.height.into(),
        ];
        let resources = dictionary! {
            "Font" => dictionary! { FONT_NAME => self.font_id },
            "XObject" => page.xobjects,
        };
        Ok(self.doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "MediaBox" => media_box,
            "Contents" => content_id,
            "Resources" => resources,
        }))
    }

    fn chars_per_line(&self) -> usize {
        let usable = (self.width - 2 * TEXT_MARGIN).max(0) as f32;
        let glyph = FONT_SIZE as f32 * GLYPH_WIDTH_FACTOR;
        ((usable / glyph) as usize).max(1)
    }
}

/// Build the searchable PDF. `images` must hold one image per note page, in
/// page order. A note without pages yields a single blank page.
pub fn assemble(
    note: &NoteDocument,
    images: &[PageImage],
    transform: &dyn TextTransform,
) -> Result<Vec<u8>> {
    if images.len() != note.page_count() {
        return Err(SnError::Pdf(format!(
            "expected {} page images, got {}",
            note.page_count(),
            images.len()
        )));
    }

    let (width, height) = note.page_size();
    let mut canvas = PdfCanvas::new(width, height);

    for (i, (page, image)) in note.pages.iter().zip(images).enumerate() {
        if i > 0 {
            canvas.add_page()?;
        }
        if let Some(text) = page.recognized_text() {
            canvas.invisible_text(&transform.apply(text));
        }
        canvas.full_page_image(&image.bytes)?;
    }

    canvas.finish()
}

fn over_white(channel: u8, alpha: u8) -> u8 {
    let c = u16::from(channel);
    let a = u16::from(alpha);
    ((c * a + 255 * (255 - a)) / 255) as u8
}

/// Greedy word wrap; explicit newlines always break. Words longer than a line
/// are split.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.lines() {
        let mut line = String::new();
        for word in paragraph.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();
            while word.len() > width {
                if !line.is_empty() {
                    lines.push(std::mem::take(&mut line));
                }
                lines.push(word.drain(..width).collect());
            }
            let word: String = word.into_iter().collect();
            if word.is_empty() {
                continue;
            }
            let needed = line.chars().count() + usize::from(!line.is_empty()) + word.chars().count();
            if needed > width && !line.is_empty() {
                lines.push(std::mem::take(&mut line));
            }
            if !line.is_empty() {
                line.push(' ');
            }
            line.push_str(&word);
        }
        if !line.is_empty() {
            lines.push(line);
        }
    }
    lines
}

/// Characters WinAnsi places in 0x80..=0x9F, where Latin-1 has C1 controls.
const WIN_ANSI_HIGH: &[(char, u8)] = &[
    ('€', 0x80),
    ('‚', 0x82),
    ('ƒ', 0x83),
    ('„', 0x84),
    ('…', 0x85),
    ('†', 0x86),
    ('‡', 0x87),
    ('ˆ', 0x88),
    ('‰', 0x89),
    ('Š', 0x8A),
    ('‹', 0x8B),
    ('Œ', 0x8C),
    ('Ž', 0x8E),
    ('‘', 0x91),
    ('’', 0x92),
    ('“', 0x93),
    ('”', 0x94),
    ('•', 0x95),
    ('–', 0x96),
    ('—', 0x97),
    ('˜', 0x98),
    ('™', 0x99),
    ('š', 0x9A),
    ('›', 0x9B),
    ('œ', 0x9C),
    ('ž', 0x9E),
    ('Ÿ', 0x9F),
];

/// WinAnsi bytes for `text`. Controls and unencodable characters become `?`.
fn to_win_ansi(text: &str) -> Vec<u8> {
    text.chars().map(win_ansi_byte).collect()
}

fn win_ansi_byte(c: char) -> u8 {
    if c.is_control() {
        return b'?';
    }
    if let Ok(byte) = u8::try_from(u32::from(c)) {
        return byte;
    }
    WIN_ANSI_HIGH
        .iter()
        .find(|(ch, _)| *ch == c)
        .map_or(b'?', |(_, byte)| *byte)
}
