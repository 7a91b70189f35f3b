//! Page rasterization.
//!
//! A [`Rasterizer`] hands out a [`RenderSession`] for the duration of one
//! export. Whatever the session holds (worker, buffers) is released when it is
//! dropped, so every exit path, including `?` returns, gives it back.

use crate::error::{Result, SnError};
use crate::model::{NoteDocument, PageImage};
use image::{DynamicImage, ImageFormat, RgbaImage};
use log::debug;
use std::io::Cursor;

pub trait Rasterizer {
    fn acquire(&self) -> Result<Box<dyn RenderSession + '_>>;
}

pub trait RenderSession {
    /// Encoded image bytes for one page (1-based).
    fn render_page(&mut self, note: &NoteDocument, page: usize) -> Result<Vec<u8>>;
}

/// Check a requested page subset against the note. `None` selects every page.
pub fn select_pages(note: &NoteDocument, pages: Option<&[usize]>) -> Result<Vec<usize>> {
    let count = note.page_count();
    match pages {
        None => Ok((1..=count).collect()),
        Some(pages) => {
            if let Some(bad) = pages.iter().find(|p| **p == 0 || **p > count) {
                return Err(SnError::Api(format!(
                    "Page {} is out of range (note has {} pages)",
                    bad, count
                )));
            }
            Ok(pages.to_vec())
        }
    }
}

/// Render pages inside a single session. A zero-page note yields nothing
/// without acquiring the rasterizer.
pub fn render_pages(
    rasterizer: &dyn Rasterizer,
    note: &NoteDocument,
    pages: Option<&[usize]>,
) -> Result<Vec<PageImage>> {
    let pages = select_pages(note, pages)?;
    if pages.is_empty() {
        return Ok(Vec::new());
    }

    let mut session = rasterizer.acquire()?;
    pages
        .into_iter()
        .map(|page| {
            let bytes = session.render_page(note, page)?;
            Ok(PageImage { page, bytes })
        })
        .collect()
}

/// Stand-in rasterizer: every page renders as a 1x1 transparent PNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderRasterizer;

struct PlaceholderSession;

impl Rasterizer for PlaceholderRasterizer {
    fn acquire(&self) -> Result<Box<dyn RenderSession + '_>> {
        debug!("rasterizer acquired");
        Ok(Box::new(PlaceholderSession))
    }
}

impl RenderSession for PlaceholderSession {
    fn render_page(&mut self, _note: &NoteDocument, page: usize) -> Result<Vec<u8>> {
        let mut bytes = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(RgbaImage::new(1, 1))
            .write_to(&mut bytes, ImageFormat::Png)
            .map_err(|e| SnError::Raster {
                page,
                reason: e.to_string(),
            })?;
        Ok(bytes.into_inner())
    }
}

impl Drop for PlaceholderSession {
    fn drop(&mut self) {
        debug!("rasterizer released");
    }
}
