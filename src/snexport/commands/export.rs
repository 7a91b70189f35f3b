//! # Export
//!
//! Runs one export request end to end:
//!
//! ```text
//! decode -> resolve paths -> [render + write images] -> assemble -> persist
//! ```
//!
//! The first fatal failure ends the request. Files written before it stay in
//! the vault and are listed in the returned [`SnError::Export`], which also names
//! the artifact kind that failed. In particular a raster failure on page 3 keeps
//! pages 1 and 2 on disk and skips the transcript, so no transcript ever embeds
//! an incomplete image set.
//!
//! Leaf names come from [`crate::unique::allocate`] when the destination is a
//! configured folder. When it is the vault root, naming is left to the vault's
//! attachment rules ([`Vault::default_attachment_path`]).

use crate::assemble::{markdown, pdf};
use crate::commands::{CmdMessage, CmdResult};
use crate::config::ExportConfig;
use crate::decode::NoteDecoder;
use crate::error::{Result, SnError};
use crate::model::{ArtifactKind, ExportMode, FileHandle, NoteDocument, PageImage, SourceNote};
use crate::paths::{self, NoteCategory, PathResolutionWarning, ResolvedDestination};
use crate::raster::{select_pages, Rasterizer};
use crate::store::Vault;
use crate::unique::{allocate, normalize_folder};
use log::{debug, info};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Everything one export needs, passed in explicitly.
pub struct ExportContext<'a> {
    pub vault: &'a dyn Vault,
    pub decoder: &'a dyn NoteDecoder,
    pub rasterizer: &'a dyn Rasterizer,
    pub config: &'a ExportConfig,
}

#[derive(Debug, Clone)]
pub struct ExportRequest {
    pub mode: ExportMode,
    /// 1-based pages to render; `None` renders all. Ignored for markdown-only.
    pub pages: Option<Vec<usize>>,
    /// Checked before each page is rendered.
    pub cancel: Option<Arc<AtomicBool>>,
}

impl ExportRequest {
    pub fn new(mode: ExportMode) -> Self {
        Self {
            mode,
            pages: None,
            cancel: None,
        }
    }

    pub fn with_pages(mut self, pages: Vec<usize>) -> Self {
        self.pages = Some(pages);
        self
    }

    pub fn with_cancel(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    fn check_cancelled(&self, page: usize) -> Result<()> {
        match &self.cancel {
            Some(flag) if flag.load(Ordering::SeqCst) => Err(SnError::Cancelled(page)),
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Default)]
pub struct ExportReport {
    pub markdown: Option<FileHandle>,
    pub images: Vec<FileHandle>,
    pub pdf: Option<FileHandle>,
    /// Category of the transcript, when categorization ran.
    pub category: Option<NoteCategory>,
    pub warnings: Vec<PathResolutionWarning>,
}

impl ExportReport {
    /// Created files in creation order.
    pub fn created(&self) -> Vec<FileHandle> {
        self.images
            .iter()
            .chain(self.markdown.iter())
            .chain(self.pdf.iter())
            .cloned()
            .collect()
    }

    fn note_warning(&mut self, warning: Option<PathResolutionWarning>) {
        if let Some(warning) = warning {
            if !self.warnings.contains(&warning) {
                self.warnings.push(warning);
            }
        }
    }
}

impl From<ExportReport> for CmdResult {
    fn from(report: ExportReport) -> Self {
        let mut result = CmdResult::default().with_created(report.created());
        for warning in &report.warnings {
            result.add_message(CmdMessage::warning(warning.to_string()));
        }
        for image in &report.images {
            result.add_message(CmdMessage::success(format!(
                "Image file created at: {}",
                image.path
            )));
        }
        if let Some(md) = &report.markdown {
            result.add_message(CmdMessage::success(format!(
                "Markdown file created at: {}",
                md.path
            )));
        }
        if let Some(pdf) = &report.pdf {
            result.add_message(CmdMessage::success(format!(
                "PDF file created at: {}",
                pdf.path
            )));
        }
        result
    }
}

pub fn run(
    ctx: &ExportContext,
    source: &SourceNote,
    bytes: &[u8],
    request: &ExportRequest,
) -> Result<CmdResult> {
    export(ctx, source, bytes, request).map(CmdResult::from)
}

pub fn export(
    ctx: &ExportContext,
    source: &SourceNote,
    bytes: &[u8],
    request: &ExportRequest,
) -> Result<ExportReport> {
    // 1. Decode; nothing has been written yet
    let note = ctx
        .decoder
        .decode(bytes)
        .map_err(|e| SnError::export(request.mode.primary_kind(), Vec::new(), e))?;

    debug!(
        "exporting {} ({} pages) as {:?}",
        source.path,
        note.page_count(),
        request.mode.kinds()
    );
    let mut report = ExportReport::default();

    match request.mode {
        ExportMode::Markdown => {
            let md = write_markdown(ctx, source, &note, &[], &mut report)
                .map_err(|e| SnError::export(ArtifactKind::Markdown, Vec::new(), e))?;
            report.markdown = Some(md);
        }
        ExportMode::MarkdownWithImages => {
            // 2. Images first; a failure here stops before the transcript
            let pages = select_pages(&note, request.pages.as_deref())
                .map_err(|e| SnError::export(ArtifactKind::Image, Vec::new(), e))?;
            let images = write_images(ctx, source, &note, &pages, request, &mut report)?;

            let mut aligned: Vec<Option<FileHandle>> = vec![None; note.page_count()];
            for (page, handle) in pages.iter().zip(&images) {
                aligned[page - 1] = Some(handle.clone());
            }
            report.images = images;

            // 3. Transcript embedding the images just written
            let md = write_markdown(ctx, source, &note, &aligned, &mut report)
                .map_err(|e| SnError::export(ArtifactKind::Markdown, report.images.clone(), e))?;
            report.markdown = Some(md);
        }
        ExportMode::Pdf => {
            let handle = write_pdf(ctx, source, &note, request, &mut report)
                .map_err(|e| SnError::export(ArtifactKind::Pdf, Vec::new(), e))?;
            report.pdf = Some(handle);
        }
    }

    Ok(report)
}

/// Render one page (1-based) and save it as an image.
pub fn save_page_image(
    ctx: &ExportContext,
    source: &SourceNote,
    bytes: &[u8],
    page: usize,
) -> Result<ExportReport> {
    let wrap = |e| SnError::export(ArtifactKind::Image, Vec::new(), e);

    let note = ctx.decoder.decode(bytes).map_err(wrap)?;
    select_pages(&note, Some(&[page][..])).map_err(wrap)?;

    let image = {
        let mut session = ctx.rasterizer.acquire().map_err(wrap)?;
        session.render_page(&note, page).map_err(wrap)?
    };

    let mut report = ExportReport::default();
    let resolution = paths::resolve(ArtifactKind::Image, source.basename(), ctx.config);
    report.note_warning(resolution.warning);

    let handle = persist_image(ctx, &resolution.destination, source, page, &image).map_err(wrap)?;
    report.images.push(handle);
    Ok(report)
}

fn write_images(
    ctx: &ExportContext,
    source: &SourceNote,
    note: &NoteDocument,
    pages: &[usize],
    request: &ExportRequest,
    report: &mut ExportReport,
) -> Result<Vec<FileHandle>> {
    let mut written = Vec::with_capacity(pages.len());
    if pages.is_empty() {
        return Ok(written);
    }

    let resolution = paths::resolve(ArtifactKind::Image, source.basename(), ctx.config);
    report.note_warning(resolution.warning);

    let mut session = match ctx.rasterizer.acquire() {
        Ok(session) => session,
        Err(e) => return Err(SnError::export(ArtifactKind::Image, written, e)),
    };

    for &page in pages {
        let step = request
            .check_cancelled(page)
            .and_then(|_| session.render_page(note, page))
            .and_then(|bytes| {
                persist_image(ctx, &resolution.destination, source, page, &bytes)
            });
        match step {
            Ok(handle) => written.push(handle),
            Err(e) => return Err(SnError::export(ArtifactKind::Image, written, e)),
        }
    }

    Ok(written)
}

fn persist_image(
    ctx: &ExportContext,
    destination: &ResolvedDestination,
    source: &SourceNote,
    page: usize,
    bytes: &[u8],
) -> Result<FileHandle> {
    ensure_folder(ctx.vault, destination)?;
    let stem = format!("{}-{}", source.basename(), page - 1);
    let path = leaf_path(ctx.vault, destination, &stem, ArtifactKind::Image)?;
    let handle = ctx.vault.write_binary(&path, bytes)?;
    info!("wrote page {} image to {}", page, handle.path);
    Ok(handle)
}

fn write_markdown(
    ctx: &ExportContext,
    source: &SourceNote,
    note: &NoteDocument,
    images: &[Option<FileHandle>],
    report: &mut ExportReport,
) -> Result<FileHandle> {
    let resolution = paths::resolve(ArtifactKind::Markdown, source.basename(), ctx.config);
    report.note_warning(resolution.warning);
    report.category = resolution.category;

    let options = markdown::MarkdownOptions {
        invert_colors_when_dark: ctx.config.invert_colors_when_dark,
    };
    let content = markdown::assemble(source, note, images, &ctx.config.dictionary, &options);

    ensure_folder(ctx.vault, &resolution.destination)?;
    let path = leaf_path(
        ctx.vault,
        &resolution.destination,
        source.basename(),
        ArtifactKind::Markdown,
    )?;
    let handle = ctx.vault.write_text(&path, &content)?;
    info!("wrote transcript to {}", handle.path);
    Ok(handle)
}

fn write_pdf(
    ctx: &ExportContext,
    source: &SourceNote,
    note: &NoteDocument,
    request: &ExportRequest,
    report: &mut ExportReport,
) -> Result<FileHandle> {
    let resolution = paths::resolve(ArtifactKind::Pdf, source.basename(), ctx.config);
    report.note_warning(resolution.warning);

    let pages = select_pages(note, request.pages.as_deref())?;
    let document = match &request.pages {
        None => note.clone(),
        Some(_) => NoteDocument::new(
            note.page_width,
            note.page_height,
            pages.iter().map(|p| note.pages[p - 1].clone()).collect(),
        ),
    };

    let mut images = Vec::with_capacity(pages.len());
    if !pages.is_empty() {
        let mut session = ctx.rasterizer.acquire()?;
        for &page in &pages {
            request.check_cancelled(page)?;
            let bytes = session.render_page(note, page)?;
            images.push(PageImage { page, bytes });
        }
    }

    let bytes = pdf::assemble(&document, &images, &ctx.config.dictionary)?;
    debug!("assembled {} page PDF ({} bytes)", images.len(), bytes.len());

    ensure_folder(ctx.vault, &resolution.destination)?;
    let path = leaf_path(
        ctx.vault,
        &resolution.destination,
        source.basename(),
        ArtifactKind::Pdf,
    )?;
    let handle = ctx.vault.write_binary(&path, &bytes)?;
    info!("wrote PDF to {}", handle.path);
    Ok(handle)
}

fn ensure_folder(vault: &dyn Vault, destination: &ResolvedDestination) -> Result<()> {
    let folder = normalize_folder(&destination.folder);
    if !folder.is_empty() && !vault.exists(folder) {
        vault.create_folder(folder)?;
    }
    Ok(())
}

fn leaf_path(
    vault: &dyn Vault,
    destination: &ResolvedDestination,
    stem: &str,
    kind: ArtifactKind,
) -> Result<String> {
    if destination.is_root() {
        vault.default_attachment_path(&format!("{}.{}", stem, kind.extension()))
    } else {
        Ok(allocate(&destination.folder, stem, kind.extension(), |p| {
            vault.exists(p)
        }))
    }
}
