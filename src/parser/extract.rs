//! Text span extraction from PDF content streams.
//!
//! Walks each page's content operators, tracking the text matrix, the
//! current transformation matrix and the font state, and emits one run per
//! text-showing operator. Adjacent runs that share font, size and baseline
//! are merged into a single [`TextSpan`].

use std::collections::HashMap;
use std::path::Path;

use crate::detect;
use crate::error::{Error, Result};
use crate::model::{DocumentMetadata, SpanDocument, TextSpan};

use super::backend::{ContentOp, LopdfBackend, PageBox, PageId, PdfBackend, PdfValue};
use super::options::{ErrorMode, ExtractOptions};

/// TJ adjustment (thousandths of text space) read as a word break.
const TJ_SPACE_THRESHOLD: f32 = 200.0;

/// Estimated glyph advance as a fraction of the font size.
const CHAR_WIDTH_RATIO: f32 = 0.5;

/// Baseline to glyph top, as a fraction of the font size.
const ASCENT_RATIO: f32 = 0.8;

/// A gap wider than this fraction of a character is a word space.
const GAP_SPACE_RATIO: f32 = 0.2;

/// Runs further apart than this many font sizes are never merged.
const MAX_MERGE_GAP_RATIO: f32 = 2.0;

/// Affine matrix `[a b c d e f]` as used by PDF.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Matrix([f32; 6]);

impl Matrix {
    const IDENTITY: Matrix = Matrix([1.0, 0.0, 0.0, 1.0, 0.0, 0.0]);

    fn translation(tx: f32, ty: f32) -> Self {
        Matrix([1.0, 0.0, 0.0, 1.0, tx, ty])
    }

    fn from_operands(op: &ContentOp) -> Option<Self> {
        let mut m = [0.0; 6];
        for (i, slot) in m.iter_mut().enumerate() {
            *slot = op.number(i)?;
        }
        Some(Matrix(m))
    }

    /// `self × other`
    fn multiply(&self, other: &Matrix) -> Matrix {
        let [a1, b1, c1, d1, e1, f1] = self.0;
        let [a2, b2, c2, d2, e2, f2] = other.0;
        Matrix([
            a1 * a2 + b1 * c2,
            a1 * b2 + b1 * d2,
            c1 * a2 + d1 * c2,
            c1 * b2 + d1 * d2,
            e1 * a2 + f1 * c2 + e2,
            e1 * b2 + f1 * d2 + f2,
        ])
    }

    fn origin(&self) -> (f32, f32) {
        (self.0[4], self.0[5])
    }

    fn horizontal_scale(&self) -> f32 {
        (self.0[0] * self.0[0] + self.0[1] * self.0[1]).sqrt()
    }

    fn vertical_scale(&self) -> f32 {
        (self.0[2] * self.0[2] + self.0[3] * self.0[3]).sqrt()
    }
}

/// Graphics and text state while walking a content stream.
#[derive(Debug, Clone)]
struct TextState {
    font_key: Vec<u8>,
    font_name: String,
    font_size: f32,
    leading: f32,
    tm: Matrix,
    tlm: Matrix,
    ctm: Matrix,
    ctm_stack: Vec<Matrix>,
    in_text: bool,
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            font_key: Vec::new(),
            font_name: String::new(),
            font_size: 12.0,
            leading: 0.0,
            tm: Matrix::IDENTITY,
            tlm: Matrix::IDENTITY,
            ctm: Matrix::IDENTITY,
            ctm_stack: Vec::new(),
            in_text: false,
        }
    }
}

impl TextState {
    fn move_line(&mut self, tx: f32, ty: f32) {
        self.tlm = Matrix::translation(tx, ty).multiply(&self.tlm);
        self.tm = self.tlm;
    }

    fn next_line(&mut self) {
        self.move_line(0.0, -self.leading);
    }

    fn rendering_matrix(&self) -> Matrix {
        self.tm.multiply(&self.ctm)
    }
}

/// A text run in device space, before conversion to a [`TextSpan`].
#[derive(Debug, Clone)]
struct Run {
    text: String,
    x: f32,
    baseline: f32,
    size: f32,
    font: String,
    width: f32,
}

impl Run {
    fn end(&self) -> f32 {
        self.x + self.width
    }

    fn char_width(&self) -> f32 {
        let chars = self.text.chars().count();
        if chars > 0 && self.width > 0.0 {
            self.width / chars as f32
        } else {
            self.size * CHAR_WIDTH_RATIO
        }
    }

    fn continues_with(&self, next: &Run) -> bool {
        let gap = next.x - self.end();
        self.font == next.font
            && (self.size - next.size).abs() < 0.05
            && (self.baseline - next.baseline).abs() < 0.5
            && gap > -self.char_width()
            && gap <= self.size * MAX_MERGE_GAP_RATIO
    }

    fn append(&mut self, next: Run) {
        let gap = next.x - self.end();
        let prev_last = self.text.chars().last();
        let next_first = next.text.chars().next();

        let spaced = prev_last.is_some_and(char::is_whitespace)
            || next_first.is_some_and(char::is_whitespace);
        let spaceless = prev_last.is_some_and(is_spaceless_script_char)
            && next_first.is_some_and(is_spaceless_script_char);

        if gap > next.char_width() * GAP_SPACE_RATIO && !spaced && !spaceless {
            self.text.push(' ');
        }
        self.text.push_str(&next.text);
        self.width = self.width.max(next.end() - self.x);
    }
}

/// Extracts positioned text spans from a PDF through a [`PdfBackend`].
pub struct SpanExtractor<B: PdfBackend> {
    backend: B,
    options: ExtractOptions,
}

impl SpanExtractor<LopdfBackend> {
    /// Open a PDF file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_options(path, ExtractOptions::default())
    }

    /// Open a PDF file with custom options.
    pub fn open_with_options<P: AsRef<Path>>(path: P, options: ExtractOptions) -> Result<Self> {
        let path = path.as_ref();
        let format = detect::detect_format_from_path(path)?;
        log::debug!("opening {} ({})", path.display(), format);
        let backend = LopdfBackend::load_file(path)?;
        Ok(Self::with_options(backend, options))
    }

    /// Load a PDF from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::from_bytes_with_options(data, ExtractOptions::default())
    }

    /// Load a PDF from bytes with custom options.
    pub fn from_bytes_with_options(data: &[u8], options: ExtractOptions) -> Result<Self> {
        detect::detect_format_from_bytes(data)?;
        let backend = LopdfBackend::load_bytes(data)?;
        Ok(Self::with_options(backend, options))
    }
}

impl<B: PdfBackend> SpanExtractor<B> {
    /// Create an extractor over a backend with default options.
    pub fn new(backend: B) -> Self {
        Self::with_options(backend, ExtractOptions::default())
    }

    /// Create an extractor over a backend with custom options.
    pub fn with_options(backend: B, options: ExtractOptions) -> Self {
        Self { backend, options }
    }

    /// The underlying backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Number of pages in the document.
    pub fn page_count(&self) -> u32 {
        self.backend.pages().len() as u32
    }

    /// Extract the spans of every page plus document metadata.
    pub fn extract_document(&self) -> Result<SpanDocument> {
        let pages = self.backend.pages();
        let mut spans = Vec::new();

        for (&page_num, &page_id) in pages.iter() {
            if !self.options.includes_page(page_num) {
                break;
            }
            match self.extract_page_id(page_num, page_id) {
                Ok(page_spans) => spans.extend(page_spans),
                Err(e) if self.options.error_mode == ErrorMode::Lenient => {
                    log::warn!("skipping page {}: {}", page_num, e);
                }
                Err(e) => return Err(e),
            }
        }

        log::debug!("extracted {} spans from {} pages", spans.len(), pages.len());

        let metadata = DocumentMetadata {
            title: self.backend.metadata_title(),
        };
        Ok(SpanDocument::new(spans)
            .with_metadata(metadata)
            .with_page_count(pages.len() as u32))
    }

    /// Extract the spans of a single page (1-indexed).
    pub fn extract_page(&self, page_num: u32) -> Result<Vec<TextSpan>> {
        let pages = self.backend.pages();
        let page_id = pages
            .get(&page_num)
            .copied()
            .ok_or(Error::PageOutOfRange(page_num, pages.len() as u32))?;
        self.extract_page_id(page_num, page_id)
    }

    fn extract_page_id(&self, page_num: u32, page_id: PageId) -> Result<Vec<TextSpan>> {
        let page_box = self.backend.page_box(page_id);
        let fonts: HashMap<Vec<u8>, String> = self
            .backend
            .page_fonts(page_id)?
            .into_iter()
            .map(|f| (f.name, f.base_font))
            .collect();

        let content = self.backend.page_content(page_id)?;
        if content.is_empty() {
            return Ok(Vec::new());
        }
        let ops = self
            .backend
            .decode_content(&content)
            .map_err(|e| Error::TextExtract(format!("page {}: {}", page_num, e)))?;

        let runs = self.collect_runs(page_id, &ops, &fonts);
        let runs = if self.options.merge_runs {
            merge_runs(runs)
        } else {
            runs
        };

        Ok(runs
            .into_iter()
            .filter_map(|run| to_span(run, page_num, &page_box))
            .collect())
    }

    fn collect_runs(
        &self,
        page_id: PageId,
        ops: &[ContentOp],
        fonts: &HashMap<Vec<u8>, String>,
    ) -> Vec<Run> {
        let mut runs = Vec::new();
        let mut state = TextState::default();

        for op in ops {
            match op.operator.as_str() {
                "q" => state.ctm_stack.push(state.ctm),
                "Q" => {
                    if let Some(ctm) = state.ctm_stack.pop() {
                        state.ctm = ctm;
                    }
                }
                "cm" => {
                    if let Some(m) = Matrix::from_operands(op) {
                        state.ctm = m.multiply(&state.ctm);
                    }
                }
                "BT" => {
                    state.in_text = true;
                    state.tm = Matrix::IDENTITY;
                    state.tlm = Matrix::IDENTITY;
                }
                "ET" => state.in_text = false,
                "Tf" => {
                    if let Some(PdfValue::Name(key)) = op.operands.first() {
                        state.font_name = fonts
                            .get(key)
                            .cloned()
                            .unwrap_or_else(|| String::from_utf8_lossy(key).to_string());
                        state.font_key = key.clone();
                    }
                    if let Some(size) = op.number(1) {
                        state.font_size = size;
                    }
                }
                "TL" => {
                    if let Some(leading) = op.number(0) {
                        state.leading = leading;
                    }
                }
                "Td" | "TD" => {
                    if let (Some(tx), Some(ty)) = (op.number(0), op.number(1)) {
                        if op.operator == "TD" {
                            state.leading = -ty;
                        }
                        state.move_line(tx, ty);
                    }
                }
                "Tm" => {
                    if let Some(m) = Matrix::from_operands(op) {
                        state.tm = m;
                        state.tlm = m;
                    }
                }
                "T*" => state.next_line(),
                "Tj" => {
                    if let Some(PdfValue::Str(bytes)) = op.operands.first() {
                        let pieces = [PdfValue::Str(bytes.clone())];
                        self.show_text(page_id, &mut state, &pieces, &mut runs);
                    }
                }
                "TJ" => {
                    if let Some(PdfValue::Array(items)) = op.operands.first() {
                        self.show_text(page_id, &mut state, items, &mut runs);
                    }
                }
                "'" | "\"" => {
                    state.next_line();
                    let text_idx = if op.operator == "\"" { 2 } else { 0 };
                    if let Some(PdfValue::Str(bytes)) = op.operands.get(text_idx) {
                        let pieces = [PdfValue::Str(bytes.clone())];
                        self.show_text(page_id, &mut state, &pieces, &mut runs);
                    }
                }
                _ => {}
            }
        }

        runs
    }

    /// Decode a TJ-style array, record the run and advance the text matrix.
    fn show_text(
        &self,
        page_id: PageId,
        state: &mut TextState,
        items: &[PdfValue],
        runs: &mut Vec<Run>,
    ) {
        if !state.in_text {
            return;
        }

        let mut text = String::new();
        // Advance in unscaled text space units (multiples of the font size).
        let mut advance = 0.0f32;

        for item in items {
            match item {
                PdfValue::Str(bytes) => {
                    let decoded = self.backend.decode_text(page_id, &state.font_key, bytes);
                    advance += decoded.chars().count() as f32 * CHAR_WIDTH_RATIO;
                    text.push_str(&decoded);
                }
                PdfValue::Integer(_) | PdfValue::Real(_) => {
                    let adjustment = -item.as_number().unwrap_or(0.0);
                    advance += adjustment / 1000.0;
                    let ends_spaceless = text
                        .chars()
                        .last()
                        .map_or(true, |c| c.is_whitespace() || is_spaceless_script_char(c));
                    if adjustment > TJ_SPACE_THRESHOLD && !ends_spaceless {
                        text.push(' ');
                    }
                }
                _ => {}
            }
        }

        let trm = state.rendering_matrix();
        let size = state.font_size * trm.vertical_scale();
        let width = advance * state.font_size * trm.horizontal_scale();

        if !text.trim().is_empty() && size > 0.0 {
            let (x, baseline) = trm.origin();
            runs.push(Run {
                text,
                x,
                baseline,
                size,
                font: state.font_name.clone(),
                width,
            });
        }

        state.tm = Matrix::translation(advance * state.font_size, 0.0).multiply(&state.tm);
    }
}

fn merge_runs(runs: Vec<Run>) -> Vec<Run> {
    let mut merged: Vec<Run> = Vec::with_capacity(runs.len());
    for run in runs {
        if let Some(prev) = merged.last_mut() {
            if prev.continues_with(&run) {
                prev.append(run);
                continue;
            }
        }
        merged.push(run);
    }
    merged
}

fn to_span(run: Run, page: u32, page_box: &PageBox) -> Option<TextSpan> {
    let text = run.text.trim();
    if text.is_empty() {
        return None;
    }
    let y = page_box.top - (run.baseline + ASCENT_RATIO * run.size);
    let x = run.x - page_box.left;
    Some(TextSpan::new(text, page, x, y, run.size, run.font))
}

/// Check if character is from a script that doesn't use word spaces.
///
/// Chinese and Japanese don't use spaces between words, but Korean does.
fn is_spaceless_script_char(c: char) -> bool {
    let code = c as u32;

    // CJK Unified Ideographs and extensions
    (0x4E00..=0x9FFF).contains(&code)
        || (0x3400..=0x4DBF).contains(&code)
        || (0x20000..=0x2EBEF).contains(&code)
        // Hiragana, Katakana
        || (0x3040..=0x30FF).contains(&code)
        // CJK Symbols and Punctuation
        || (0x3000..=0x303F).contains(&code)
}
