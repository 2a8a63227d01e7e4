use std::path::{Path, PathBuf};

use printpdf::{BuiltinFont, Mm, PdfDocument};
use tracing::{debug, info, warn};

use super::font::{fold_to_win_ansi, glyph_width_em, text_width_pt};
use super::markdown::{html_paragraphs, markdown_to_html};
use crate::errors::RenderError;

const MM_PER_PT: f32 = 25.4 / 72.0;

/// Page geometry and paragraph style
#[derive(Debug, Clone)]
pub struct PageLayout {
    pub page_width_mm: f32,
    pub page_height_mm: f32,
    /// Applied on all four sides
    pub margin_mm: f32,
    pub font_size_pt: f32,
    /// Baseline-to-baseline distance
    pub leading_pt: f32,
    /// Gap after every paragraph
    pub paragraph_spacing_mm: f32,
}

impl Default for PageLayout {
    fn default() -> Self {
        Self {
            page_width_mm: 210.0, // A4
            page_height_mm: 297.0,
            margin_mm: 25.4,
            font_size_pt: 10.0,
            leading_pt: 12.0,
            paragraph_spacing_mm: 5.08, // 0.2 inch
        }
    }
}

impl PageLayout {
    /// Usable line width between the side margins
    pub fn frame_width_pt(&self) -> f32 {
        (self.page_width_mm - 2.0 * self.margin_mm) / MM_PER_PT
    }

    fn leading_mm(&self) -> f32 {
        self.leading_pt * MM_PER_PT
    }

    fn font_size_mm(&self) -> f32 {
        self.font_size_pt * MM_PER_PT
    }
}

/// One wrapped line placed on a page
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    /// Index of the paragraph this line belongs to
    pub paragraph: usize,
    pub text: String,
    /// Baseline height measured from the bottom edge
    pub baseline_mm: f32,
}

#[derive(Debug, Clone, Default)]
pub struct LaidOutPage {
    pub lines: Vec<PlacedLine>,
}

/// Paragraphs wrapped and distributed across pages
#[derive(Debug, Clone)]
pub struct DocumentLayout {
    /// Always holds at least one page
    pub pages: Vec<LaidOutPage>,
}

impl DocumentLayout {
    /// Paragraph indices in the order they first appear
    pub fn paragraph_order(&self) -> Vec<usize> {
        let mut order: Vec<usize> = Vec::new();
        for line in self.pages.iter().flat_map(|p| &p.lines) {
            if order.last() != Some(&line.paragraph) {
                order.push(line.paragraph);
            }
        }
        order
    }

    pub fn paragraph_count(&self) -> usize {
        self.paragraph_order().len()
    }
}

/// A written PDF
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPdf {
    pub path: PathBuf,
    /// Characters the font could not draw, shown as `?` in the document
    pub replaced_chars: usize,
}

/// Wrap each paragraph to the frame and paginate
pub fn layout_paragraphs(paragraphs: &[String], layout: &PageLayout) -> DocumentLayout {
    let top = layout.page_height_mm - layout.margin_mm;
    let bottom = layout.margin_mm;
    let leading = layout.leading_mm();
    let frame_width = layout.frame_width_pt();

    let mut pages = vec![LaidOutPage::default()];
    let mut cursor = top;

    for (index, paragraph) in paragraphs.iter().enumerate() {
        for text in wrap_text(paragraph, frame_width, layout.font_size_pt) {
            let page_has_lines = pages.last().is_some_and(|p| !p.lines.is_empty());
            if cursor - leading < bottom && page_has_lines {
                pages.push(LaidOutPage::default());
                cursor = top;
            }

            let baseline_mm = cursor - layout.font_size_mm();
            cursor -= leading;
            if let Some(page) = pages.last_mut() {
                page.lines.push(PlacedLine {
                    paragraph: index,
                    text,
                    baseline_mm,
                });
            }
        }
        cursor -= layout.paragraph_spacing_mm;
    }

    DocumentLayout { pages }
}

/// Encode a laid-out document as PDF bytes using built-in Helvetica
///
/// Line text must already be folded with `fold_to_win_ansi`.
pub fn build_pdf(
    document: &DocumentLayout,
    title: &str,
    layout: &PageLayout,
) -> Result<Vec<u8>, RenderError> {
    let width = Mm(layout.page_width_mm);
    let height = Mm(layout.page_height_mm);

    let (doc, first_page, first_layer) = PdfDocument::new(title, width, height, "Layer 1");
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(pdf_error)?;

    for (index, page) in document.pages.iter().enumerate() {
        let (page_index, layer_index) = if index == 0 {
            (first_page, first_layer)
        } else {
            doc.add_page(width, height, "Layer 1")
        };
        let layer = doc.get_page(page_index).get_layer(layer_index);

        for line in &page.lines {
            layer.use_text(
                line.text.as_str(),
                layout.font_size_pt,
                Mm(layout.margin_mm),
                Mm(line.baseline_mm),
                &font,
            );
        }
    }

    doc.save_to_bytes().map_err(pdf_error)
}

/// Markup paragraphs of a Markdown document, folded for the built-in font
///
/// Returns the paragraphs and how many characters were replaced with `?`.
pub fn markdown_paragraphs(markdown: &str) -> (Vec<String>, usize) {
    let mut replaced = 0;
    let paragraphs = html_paragraphs(&markdown_to_html(markdown))
        .into_iter()
        .map(|paragraph| {
            let (text, count) = fold_to_win_ansi(&paragraph);
            replaced += count;
            text
        })
        .collect();
    (paragraphs, replaced)
}

/// Render a Markdown file to a paginated PDF
///
/// Markdown is converted to HTML and each non-blank line of markup becomes one
/// paragraph. Tags are drawn as literal text.
pub fn render_markdown_file(
    markdown_path: &Path,
    pdf_path: &Path,
    layout: &PageLayout,
) -> Result<RenderedPdf, RenderError> {
    let markdown = std::fs::read_to_string(markdown_path).map_err(|source| RenderError::Io {
        path: markdown_path.to_path_buf(),
        source,
    })?;

    let (paragraphs, replaced_chars) = markdown_paragraphs(&markdown);
    if replaced_chars > 0 {
        warn!(
            "{} characters are outside the PDF font and were replaced with '?'",
            replaced_chars
        );
    }

    let document = layout_paragraphs(&paragraphs, layout);
    debug!(
        "Laid out {} paragraphs on {} pages",
        paragraphs.len(),
        document.pages.len()
    );

    let bytes = build_pdf(&document, "Travel Plan", layout)?;
    std::fs::write(pdf_path, bytes).map_err(|source| RenderError::Io {
        path: pdf_path.to_path_buf(),
        source,
    })?;

    info!("PDF written to {:?}", pdf_path);
    Ok(RenderedPdf {
        path: pdf_path.to_path_buf(),
        replaced_chars,
    })
}

fn pdf_error(e: impl std::fmt::Debug) -> RenderError {
    RenderError::Pdf(format!("{e:?}"))
}

/// Greedy word wrap by measured width; words wider than the line are split
fn wrap_text(text: &str, max_width_pt: f32, font_size_pt: f32) -> Vec<String> {
    let space = text_width_pt(" ", font_size_pt);
    let mut lines = Vec::new();
    let mut line = String::new();
    let mut line_width = 0.0;

    for word in text.split_whitespace() {
        for piece in split_to_width(word, max_width_pt, font_size_pt) {
            let width = text_width_pt(&piece, font_size_pt);
            if !line.is_empty() && line_width + space + width > max_width_pt {
                lines.push(std::mem::take(&mut line));
                line_width = 0.0;
            }
            if !line.is_empty() {
                line.push(' ');
                line_width += space;
            }
            line.push_str(&piece);
            line_width += width;
        }
    }

    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

fn split_to_width(word: &str, max_width_pt: f32, font_size_pt: f32) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut piece = String::new();
    let mut width = 0.0;

    for c in word.chars() {
        let glyph = glyph_width_em(c) * font_size_pt;
        if !piece.is_empty() && width + glyph > max_width_pt {
            pieces.push(std::mem::take(&mut piece));
            width = 0.0;
        }
        piece.push(c);
        width += glyph;
    }

    if !piece.is_empty() {
        pieces.push(piece);
    }
    pieces
}
