//! Document Export
//!
//! One page per chapter, each page a full-page raster capture of the rendered
//! chapter, written as a single PDF. Rendering itself belongs to the caller and
//! is reached through the [`PageCapture`] trait.
//!
//! # Failure policy
//!
//! Capture is sequential and fails fast: the first page that cannot be
//! captured aborts the export with [`ExportError::Capture`] naming the chapter.
//! The document is built in memory, written to a temporary file beside the
//! destination and only then persisted under its final name, so a failed
//! export never leaves a partial file behind.
//!
//! ```text
//!   Book ──> capture(ch 1..=n) ──> flatten on background ──> PdfEncoder
//!                 │ Err                                         │
//!                 v                                             v
//!          ExportError::Capture        lopdf::Document ─save_to─> NamedTempFile ─persist─> <title>.pdf
//! ```

use std::io::Write;
use std::path::{Path, PathBuf};

use flate2::write::ZlibEncoder;
use flate2::Compression;
use image::{Rgba, RgbaImage};
use lopdf::{dictionary, Dictionary, Document, Object, Stream};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::book_gen::{Book, ChapterOutline};

// ============================================================================
// Constants
// ============================================================================

/// A4 width in PDF points.
pub const A4_WIDTH_PT: f64 = 595.28;
/// A4 height in PDF points.
pub const A4_HEIGHT_PT: f64 = 841.89;
/// Capture density relative to the page size.
pub const DEFAULT_PIXEL_RATIO: u32 = 2;
/// Page background, slate-900.
pub const DEFAULT_BACKGROUND: &str = "#0f172a";

// ============================================================================
// Errors
// ============================================================================

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Book has no chapters to export")]
    NoChapters,

    #[error("Failed to capture chapter {chapter_index} ('{title}'): {reason}")]
    Capture {
        chapter_index: u32,
        title: String,
        reason: String,
    },

    #[error("Failed to encode page {page}: {reason}")]
    Encode { page: usize, reason: String },

    #[error("Failed to write PDF: {0}")]
    Pdf(String),

    #[error("Invalid background color '{0}', expected #rrggbb")]
    InvalidColor(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ExportError {
    pub fn capture(chapter: &ChapterOutline, reason: impl Into<String>) -> Self {
        Self::Capture {
            chapter_index: chapter.index,
            title: chapter.title.clone(),
            reason: reason.into(),
        }
    }

    pub fn encode(page: usize, reason: impl ToString) -> Self {
        Self::Encode {
            page,
            reason: reason.to_string(),
        }
    }

    pub fn pdf(err: impl ToString) -> Self {
        Self::Pdf(err.to_string())
    }
}

pub type ExportResult<T> = Result<T, ExportError>;

// ============================================================================
// File naming
// ============================================================================

/// Document file name for a book title.
///
/// Each run of characters outside `[A-Za-z0-9-]` becomes one `_`; case is kept.
pub fn export_file_name(title: &str) -> String {
    let mut name = String::with_capacity(title.len() + 4);
    let mut in_run = false;
    for c in title.chars() {
        if c.is_ascii_alphanumeric() || c == '-' {
            name.push(c);
            in_run = false;
        } else if !in_run {
            name.push('_');
            in_run = true;
        }
    }
    name.push_str(".pdf");
    name
}

// ============================================================================
// Page geometry
// ============================================================================

/// Fixed page size, capture density and background color.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSpec {
    pub width_pt: f64,
    pub height_pt: f64,
    pub pixel_ratio: u32,
    pub background: [u8; 3],
}

impl Default for PageSpec {
    fn default() -> Self {
        Self::a4_dark()
    }
}

impl PageSpec {
    /// A4 portrait, 2x density, dark slate background.
    pub fn a4_dark() -> Self {
        Self {
            width_pt: A4_WIDTH_PT,
            height_pt: A4_HEIGHT_PT,
            pixel_ratio: DEFAULT_PIXEL_RATIO,
            background: [0x0f, 0x17, 0x2a],
        }
    }

    pub fn with_background_hex(mut self, color: &str) -> ExportResult<Self> {
        self.background = parse_hex_color(color)?;
        Ok(self)
    }

    pub fn with_pixel_ratio(mut self, ratio: u32) -> Self {
        self.pixel_ratio = ratio.max(1);
        self
    }

    pub fn pixel_width(&self) -> u32 {
        (self.width_pt * self.pixel_ratio as f64).round() as u32
    }

    pub fn pixel_height(&self) -> u32 {
        (self.height_pt * self.pixel_ratio as f64).round() as u32
    }

    /// Opaque canvas of the page's pixel size filled with the background.
    pub fn blank_canvas(&self) -> RgbaImage {
        let [r, g, b] = self.background;
        RgbaImage::from_pixel(self.pixel_width(), self.pixel_height(), Rgba([r, g, b, 255]))
    }
}

/// Parse `#rrggbb` (leading `#` optional).
pub fn parse_hex_color(color: &str) -> ExportResult<[u8; 3]> {
    let digits = color.trim().trim_start_matches('#');
    let bytes = hex::decode(digits).map_err(|_| ExportError::InvalidColor(color.to_string()))?;
    <[u8; 3]>::try_from(bytes.as_slice()).map_err(|_| ExportError::InvalidColor(color.to_string()))
}

// ============================================================================
// Page capture
// ============================================================================

/// Renders one chapter to a raster image. Implemented by the presentation layer.
#[cfg_attr(test, mockall::automock)]
pub trait PageCapture {
    /// Capture `chapter` at `page.pixel_width() x page.pixel_height()`.
    ///
    /// Images of another size are stretched to the page.
    fn capture(&self, chapter: &ChapterOutline, page: &PageSpec) -> Result<RgbaImage, String>;
}

/// Adapts a closure into a [`PageCapture`].
pub struct FnCapture<F>(F);

impl<F> FnCapture<F>
where
    F: Fn(&ChapterOutline, &PageSpec) -> Result<RgbaImage, String>,
{
    pub fn new(capture: F) -> Self {
        Self(capture)
    }
}

impl<F> PageCapture for FnCapture<F>
where
    F: Fn(&ChapterOutline, &PageSpec) -> Result<RgbaImage, String>,
{
    fn capture(&self, chapter: &ChapterOutline, page: &PageSpec) -> Result<RgbaImage, String> {
        (self.0)(chapter, page)
    }
}

/// Built-in renderer for headless export: an accent rule across the top and
/// the chapter's lead chart drawn as one bar per value.
///
/// Bar heights are relative to the largest value in the first dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartCardCapture {
    pub accent: [u8; 3],
    pub bar: [u8; 3],
}

impl Default for ChartCardCapture {
    fn default() -> Self {
        Self {
            accent: [0x38, 0xbd, 0xf8],
            bar: [0xe2, 0xe8, 0xf0],
        }
    }
}

impl PageCapture for ChartCardCapture {
    fn capture(&self, chapter: &ChapterOutline, page: &PageSpec) -> Result<RgbaImage, String> {
        let values = chapter
            .charts
            .first()
            .and_then(|chart| chart.datasets.first())
            .map(|dataset| dataset.data.as_slice())
            .filter(|data| !data.is_empty())
            .ok_or_else(|| format!("chapter {} has no chart data", chapter.index))?;

        let mut canvas = page.blank_canvas();
        let (width, height) = canvas.dimensions();
        let margin = (width / 12).max(1);
        let inner_width = width.saturating_sub(2 * margin);
        let inner_height = height.saturating_sub(2 * margin);

        fill_rect(&mut canvas, margin, margin, inner_width, (height / 80).max(1), self.accent);

        let max = values.iter().cloned().fold(f64::MIN, f64::max);
        let slot = inner_width / values.len() as u32;
        let chart_height = inner_height / 2;
        let baseline = margin + inner_height;
        for (i, value) in values.iter().enumerate() {
            let ratio = if max > 0.0 { (value / max).clamp(0.0, 1.0) } else { 0.0 };
            let bar_height = (chart_height as f64 * ratio).round() as u32;
            let x = margin + slot * i as u32 + slot / 8;
            fill_rect(
                &mut canvas,
                x,
                baseline - bar_height,
                slot - slot / 4,
                bar_height,
                self.bar,
            );
        }
        Ok(canvas)
    }
}

/// Paint an opaque rectangle, clipped to the image.
fn fill_rect(image: &mut RgbaImage, x: u32, y: u32, w: u32, h: u32, [r, g, b]: [u8; 3]) {
    let x_end = x.saturating_add(w).min(image.width());
    let y_end = y.saturating_add(h).min(image.height());
    for py in y..y_end {
        for px in x..x_end {
            image.put_pixel(px, py, Rgba([r, g, b, 255]));
        }
    }
}

/// Composite RGBA pixels over the page background into packed RGB.
fn flatten(image: &RgbaImage, background: [u8; 3]) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(image.width() as usize * image.height() as usize * 3);
    for Rgba([r, g, b, a]) in image.pixels() {
        let alpha = *a as u32;
        for (channel, bg) in [*r, *g, *b].into_iter().zip(background) {
            let blended = (channel as u32 * alpha + bg as u32 * (255 - alpha) + 127) / 255;
            rgb.push(blended as u8);
        }
    }
    rgb
}

// ============================================================================
// PDF encoder
// ============================================================================

/// A page image ready for encoding: packed 8-bit RGB.
#[derive(Debug, Clone)]
pub struct RgbPage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl RgbPage {
    pub fn from_rgba(image: &RgbaImage, background: [u8; 3]) -> Self {
        Self {
            width: image.width(),
            height: image.height(),
            pixels: flatten(image, background),
        }
    }
}

/// PDF 1.4 encoder: each page is one Flate-compressed DeviceRGB image drawn
/// over the full media box.
#[derive(Debug, Clone)]
pub struct PdfEncoder {
    page: PageSpec,
    compression: Compression,
}

impl PdfEncoder {
    pub fn new(page: PageSpec) -> Self {
        Self {
            page,
            compression: Compression::default(),
        }
    }

    pub fn with_compression(mut self, level: u32) -> Self {
        self.compression = Compression::new(level.min(9));
        self
    }

    /// Build the document for `pages`, in order.
    pub fn document(&self, pages: &[RgbPage]) -> ExportResult<Document> {
        let mut doc = Document::with_version("1.4");
        let pages_id = doc.new_object_id();

        let (w, h) = (self.page.width_pt, self.page.height_pt);
        let content = format!("q {w:.2} 0 0 {h:.2} 0 0 cm /Im0 Do Q").into_bytes();

        let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
        for (i, page) in pages.iter().enumerate() {
            if page.pixels.len() != page.width as usize * page.height as usize * 3 {
                return Err(ExportError::encode(i + 1, "pixel buffer does not match dimensions"));
            }

            let compressed = self.deflate(&page.pixels).map_err(|e| ExportError::encode(i + 1, e))?;
            let image_id = doc.add_object(Stream::new(
                dictionary! {
                    "Type" => "XObject",
                    "Subtype" => "Image",
                    "Width" => i64::from(page.width),
                    "Height" => i64::from(page.height),
                    "ColorSpace" => "DeviceRGB",
                    "BitsPerComponent" => 8i64,
                    "Filter" => "FlateDecode",
                },
                compressed,
            ));
            let content_id = doc.add_object(Stream::new(Dictionary::new(), content.clone()));

            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Real(w as _),
                    Object::Real(h as _),
                ],
                "Resources" => dictionary! {
                    "XObject" => dictionary! { "Im0" => image_id },
                },
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        Ok(doc)
    }

    /// Encode `pages` in order into PDF bytes.
    pub fn encode(&self, pages: &[RgbPage]) -> ExportResult<Vec<u8>> {
        let mut doc = self.document(pages)?;
        let mut out = Vec::new();
        doc.save_to(&mut out).map_err(ExportError::pdf)?;
        Ok(out)
    }

    fn deflate(&self, data: &[u8]) -> std::io::Result<Vec<u8>> {
        let mut encoder = ZlibEncoder::new(Vec::new(), self.compression);
        encoder.write_all(data)?;
        encoder.finish()
    }
}

// ============================================================================
// Pipeline
// ============================================================================

/// Captures every chapter and writes the book as one PDF.
pub struct ExportPipeline<C: PageCapture> {
    capture: C,
    page: PageSpec,
    encoder: PdfEncoder,
}

impl<C: PageCapture> ExportPipeline<C> {
    pub fn new(capture: C) -> Self {
        Self::with_page(capture, PageSpec::a4_dark())
    }

    pub fn with_page(capture: C, page: PageSpec) -> Self {
        Self {
            capture,
            page,
            encoder: PdfEncoder::new(page),
        }
    }

    pub fn page(&self) -> &PageSpec {
        &self.page
    }

    /// Capture each chapter in index order. Stops at the first failure.
    pub fn capture_pages(&self, book: &Book) -> ExportResult<Vec<RgbPage>> {
        if book.chapters.is_empty() {
            return Err(ExportError::NoChapters);
        }

        let mut chapters: Vec<&ChapterOutline> = book.chapters.iter().collect();
        chapters.sort_by_key(|c| c.index);

        let mut pages = Vec::with_capacity(chapters.len());
        for chapter in chapters {
            let image = self.capture.capture(chapter, &self.page).map_err(|reason| {
                log::error!("Capture failed for chapter {}: {reason}", chapter.index);
                ExportError::capture(chapter, reason)
            })?;
            log::debug!(
                "Captured chapter {} at {}x{}",
                chapter.index,
                image.width(),
                image.height()
            );
            pages.push(RgbPage::from_rgba(&image, self.page.background));
        }
        Ok(pages)
    }

    /// Export `book` into `dir`, returning the written file's path.
    pub fn export(&self, book: &Book, dir: &Path) -> ExportResult<PathBuf> {
        let pages = self.capture_pages(book)?;
        let mut document = self.encoder.document(&pages)?;

        std::fs::create_dir_all(dir)?;
        let path = dir.join(export_file_name(&book.title));

        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        document.save_to(&mut tmp).map_err(ExportError::pdf)?;
        tmp.as_file().sync_all()?;
        let bytes = tmp.as_file().metadata()?.len();
        tmp.persist(&path).map_err(|e| ExportError::Io(e.error))?;

        log::info!(
            "Exported '{}' ({} pages, {} bytes) to {}",
            book.title,
            pages.len(),
            bytes,
            path.display()
        );
        Ok(path)
    }
}
