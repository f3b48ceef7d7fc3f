//! Renderer interface and the genpdf-backed PDF implementation.
//!
//! The core hands a complete [`DocumentModel`] to a [`DocumentRenderer`] in a
//! single blocking call and receives an opaque byte package back.  The
//! [`PdfRenderer`] in this module is one such capability; the document model
//! itself never depends on it.

use std::fmt;

use genpdf::elements::{
    FrameCellDecorator, Image, LinearLayout, OrderedList, TableLayout, UnorderedList,
};
use genpdf::error::{Context as _, Error as PdfError};
use genpdf::style::{Color, Style};
use genpdf::{elements, Element, Margins as PdfMargins, Mm, PageDecorator, Position};

use crate::fonts;
use crate::model::{
    Block, DocSection, DocumentModel, Heading, ImageBlock, List, Margins, Paragraph, Table,
    TableCell, TextRun, TocBlock,
};
use crate::style::{Alignment, Rgb, StyleDef, StyleId, StyleRegistry, UnresolvedStyleError};

const MM_PER_INCH: f64 = 25.4;
const TWIPS_PER_INCH: f64 = 1440.0;
const IMAGE_SOURCE_DPI: f64 = 96.0;
const IMAGE_RENDER_DPI: f64 = 300.0;
const FOOTER_HEIGHT_MM: f64 = 12.0;
const TOC_INDENT_MM: f64 = 6.0;
const DEFAULT_FONT_SIZE_PT: u8 = 11;

fn mm_from_f64(value: f64) -> Mm {
    Mm::from(printpdf::Mm(value))
}

fn twips_to_mm(twips: u32) -> Mm {
    mm_from_f64(f64::from(twips) * MM_PER_INCH / TWIPS_PER_INCH)
}

fn px_to_mm(px: u32) -> f64 {
    f64::from(px) * MM_PER_INCH / IMAGE_SOURCE_DPI
}

fn color_from_rgb(rgb: Rgb) -> Color {
    Color::Rgb(rgb.0, rgb.1, rgb.2)
}

fn map_alignment(alignment: Alignment) -> genpdf::Alignment {
    match alignment {
        Alignment::Left => genpdf::Alignment::Left,
        Alignment::Center => genpdf::Alignment::Center,
        Alignment::Right => genpdf::Alignment::Right,
    }
}

/// An opaque rendered document package.
#[derive(Clone, Debug)]
pub struct RenderedDocument {
    /// The package bytes, ready to be written to an output artifact.
    pub bytes: Vec<u8>,
}

/// Errors surfaced by a renderer.
#[derive(Debug)]
pub enum RenderError {
    /// The renderer fonts could not be loaded; the document was not rendered.
    FontLoad(PdfError),
    /// The PDF backend rejected the document tree or failed while packaging.
    Pdf(PdfError),
    /// A numbering reference in the tree did not resolve.
    UnresolvedStyle(UnresolvedStyleError),
    /// The outline post-processing step failed.
    #[cfg(feature = "bookmarks")]
    Outline(crate::bookmarks::BookmarkError),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FontLoad(err) => write!(f, "failed to load renderer fonts: {err}"),
            Self::Pdf(err) => write!(f, "PDF rendering failed: {err}"),
            Self::UnresolvedStyle(err) => write!(f, "document tree is malformed: {err}"),
            #[cfg(feature = "bookmarks")]
            Self::Outline(err) => write!(f, "failed to attach document outline: {err}"),
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::FontLoad(err) | Self::Pdf(err) => Some(err),
            Self::UnresolvedStyle(err) => Some(err),
            #[cfg(feature = "bookmarks")]
            Self::Outline(err) => Some(err),
        }
    }
}

/// The narrow capability the core depends on: one blocking call that turns a
/// document tree into a complete binary package or fails.
pub trait DocumentRenderer {
    /// Renders the full document model into an opaque byte package.
    fn render(&self, doc: &DocumentModel) -> Result<RenderedDocument, RenderError>;
}

/// PDF backend producing the binary document package via `genpdf`.
#[derive(Clone, Debug)]
pub struct PdfRenderer {
    styles: StyleRegistry,
    page_numbers: bool,
}

impl Default for PdfRenderer {
    fn default() -> Self {
        Self::new(StyleRegistry::standard())
    }
}

impl PdfRenderer {
    /// Creates a renderer resolving paragraph styles against `styles`.
    pub fn new(styles: StyleRegistry) -> Self {
        Self {
            styles,
            page_numbers: true,
        }
    }

    /// Enables or disables the page-number footer and returns the renderer.
    pub fn with_page_numbers(mut self, page_numbers: bool) -> Self {
        self.page_numbers = page_numbers;
        self
    }

    fn style_def(&self, id: Option<StyleId>) -> &'static StyleDef {
        self.styles.get(id.unwrap_or(StyleId::Body))
    }

    fn run_style(&self, def: &StyleDef, run: &TextRun, shading: Option<Rgb>) -> Style {
        let mut style = Style::new();

        let size = run.size().unwrap_or(def.size);
        style.set_font_size((size / 2) as u8);

        if run.is_bold() || def.bold {
            style.set_bold();
        }

        let mut color = run.color().or(def.color);
        // The frame decorator cannot fill cell backgrounds, so shaded header
        // cells carry the fill color in their text instead of white-on-fill.
        if let Some(fill) = shading {
            if color == Some(Rgb::WHITE) {
                color = Some(fill);
            }
        }
        if let Some(color) = color {
            style.set_color(color_from_rgb(color));
        }

        style
    }

    fn paragraph_lines(
        &self,
        paragraph: &Paragraph,
        shading: Option<Rgb>,
    ) -> Vec<elements::Paragraph> {
        let def = self.style_def(paragraph.style());
        let alignment = map_alignment(paragraph.alignment().unwrap_or(def.alignment));

        let new_line = || {
            let mut line = elements::Paragraph::default();
            line.set_alignment(alignment);
            line
        };

        let mut lines = Vec::new();
        let mut current = new_line();
        for run in paragraph.runs() {
            let style = self.run_style(def, run, shading);
            let mut parts = run.text().split('\n');
            if let Some(first) = parts.next() {
                if !first.is_empty() {
                    current.push_styled(first.to_string(), style);
                }
            }
            for part in parts {
                lines.push(std::mem::replace(&mut current, new_line()));
                if !part.is_empty() {
                    current.push_styled(part.to_string(), style);
                }
            }
        }
        lines.push(current);
        lines
    }

    fn paragraph_element(
        &self,
        paragraph: &Paragraph,
        shading: Option<Rgb>,
    ) -> impl Element + 'static {
        let def = self.style_def(paragraph.style());
        let before = paragraph.spacing_before().unwrap_or(def.spacing_before);
        let after = paragraph.spacing_after().unwrap_or(def.spacing_after);

        let mut layout = LinearLayout::vertical();
        for line in self.paragraph_lines(paragraph, shading) {
            layout.push(line);
        }
        layout.padded(PdfMargins::trbl(
            twips_to_mm(before),
            Mm::default(),
            twips_to_mm(after),
            Mm::default(),
        ))
    }

    fn heading_element(&self, heading: &Heading) -> impl Element + 'static {
        let paragraph =
            Paragraph::text(heading.text().to_string()).with_style(heading.level().style());
        self.paragraph_element(&paragraph, None)
    }

    fn cell_element(&self, cell: &TableCell) -> impl Element + 'static {
        let mut layout = LinearLayout::vertical();
        for paragraph in cell.paragraphs() {
            for line in self.paragraph_lines(paragraph, cell.shading()) {
                layout.push(line);
            }
        }
        layout.padded(PdfMargins::trbl(
            mm_from_f64(1.0),
            mm_from_f64(1.5),
            mm_from_f64(1.0),
            mm_from_f64(1.5),
        ))
    }

    fn table_element(&self, table: &Table) -> Result<TableLayout, RenderError> {
        let weights: Vec<usize> = table
            .column_widths()
            .iter()
            .map(|width| *width as usize)
            .collect();

        let mut layout = TableLayout::new(weights);
        layout.set_cell_decorator(FrameCellDecorator::new(true, true, false));

        for row in table.rows() {
            let mut table_row = layout.row();
            for cell in row.cells() {
                table_row.push_element(self.cell_element(cell));
            }
            table_row.push().map_err(RenderError::Pdf)?;
        }

        Ok(layout)
    }

    fn list_element(&self, list: &List) -> impl Element + 'static {
        let mut items = Vec::new();
        for item in list.items() {
            let paragraph = Paragraph::new(item.runs().to_vec()).with_style(StyleId::Body);
            let mut layout = LinearLayout::vertical();
            for line in self.paragraph_lines(&paragraph, None) {
                layout.push(line);
            }
            items.push(layout);
        }

        let mut container = LinearLayout::vertical();
        if list.scheme().is_ordered() {
            let mut ordered = OrderedList::new();
            for item in items {
                ordered.push(item);
            }
            container.push(ordered);
        } else {
            let mut unordered = UnorderedList::new();
            for item in items {
                unordered.push(item);
            }
            container.push(unordered);
        }
        container
    }

    fn image_element(&self, block: &ImageBlock) -> Result<Image, RenderError> {
        let dynamic = image::load_from_memory(block.data())
            .context("Failed to decode image payload")
            .map_err(RenderError::Pdf)?;

        use image::GenericImageView;
        let (px_width, _) = dynamic.dimensions();
        let natural_width_mm = MM_PER_INCH * f64::from(px_width) / IMAGE_RENDER_DPI;
        let desired_width_mm = px_to_mm(block.width());

        let mut image = Image::from_dynamic_image(dynamic).map_err(RenderError::Pdf)?;
        if natural_width_mm > f64::EPSILON {
            let scale = desired_width_mm / natural_width_mm;
            image.set_scale(genpdf::Scale::new(scale, scale));
        }
        image.set_alignment(map_alignment(block.alignment()));
        Ok(image)
    }

    /// Expands a table-of-contents placeholder into one indented entry per
    /// included heading.  A single-pass backend cannot know page numbers, so
    /// entries list titles only; navigation comes from the outline feature.
    fn toc_element(&self, doc: &DocumentModel, toc: &TocBlock) -> impl Element + 'static {
        let mut layout = LinearLayout::vertical();
        for heading in doc.headings() {
            if !toc.includes(heading.level()) {
                continue;
            }
            let indent = TOC_INDENT_MM * f64::from(heading.level().outline_level());
            let paragraph = Paragraph::text(heading.text().to_string())
                .with_style(StyleId::Body)
                .with_spacing_after(60);
            let mut entry = LinearLayout::vertical();
            for line in self.paragraph_lines(&paragraph, None) {
                entry.push(line);
            }
            layout.push(entry.padded(PdfMargins::trbl(
                Mm::default(),
                Mm::default(),
                mm_from_f64(1.0),
                mm_from_f64(indent),
            )));
        }
        layout
    }

    fn push_block(
        &self,
        document: &mut genpdf::Document,
        doc: &DocumentModel,
        block: &Block,
    ) -> Result<(), RenderError> {
        match block {
            Block::Heading(heading) => document.push(self.heading_element(heading)),
            Block::Paragraph(paragraph) => document.push(self.paragraph_element(paragraph, None)),
            Block::Table(table) => document.push(self.table_element(table)?),
            Block::List(list) => document.push(self.list_element(list)),
            Block::Image(image) => document.push(self.image_element(image)?),
            Block::TableOfContents(toc) => document.push(self.toc_element(doc, toc)),
            Block::PageBreak => document.push(elements::PageBreak::new()),
        }
        Ok(())
    }

    fn render_document(&self, doc: &DocumentModel) -> Result<Vec<u8>, RenderError> {
        doc.validate_numbering().map_err(RenderError::UnresolvedStyle)?;

        let family = fonts::default_font_family().map_err(RenderError::FontLoad)?;
        let mut document = genpdf::Document::new(family);
        document.set_font_size(DEFAULT_FONT_SIZE_PT);

        let margins = doc
            .sections()
            .first()
            .and_then(DocSection::margins)
            .unwrap_or_default();
        document.set_page_decorator(PageFrameDecorator::new(margins, self.page_numbers));

        for (index, section) in doc.sections().iter().enumerate() {
            if index > 0 {
                document.push(elements::PageBreak::new());
            }
            for block in section.blocks() {
                self.push_block(&mut document, doc, block)?;
            }
        }

        let mut bytes = Vec::new();
        document.render(&mut bytes).map_err(RenderError::Pdf)?;
        Ok(bytes)
    }

    /// Renders the document and attaches a PDF outline entry per top-level
    /// heading.  Target pages are derived from the explicit page breaks of the
    /// fixed layout; content overflow may shift them by a page.
    #[cfg(feature = "bookmarks")]
    pub fn render_with_outline(
        &self,
        doc: &DocumentModel,
    ) -> Result<RenderedDocument, RenderError> {
        let bytes = self.render_document(doc)?;
        let entries = outline_entries(doc);
        let bytes = crate::bookmarks::apply_heading_outline(&bytes, &entries)
            .map_err(RenderError::Outline)?;
        Ok(RenderedDocument { bytes })
    }
}

impl DocumentRenderer for PdfRenderer {
    #[cfg(feature = "bookmarks")]
    fn render(&self, doc: &DocumentModel) -> Result<RenderedDocument, RenderError> {
        self.render_with_outline(doc)
    }

    #[cfg(not(feature = "bookmarks"))]
    fn render(&self, doc: &DocumentModel) -> Result<RenderedDocument, RenderError> {
        let bytes = self.render_document(doc)?;
        Ok(RenderedDocument { bytes })
    }
}

/// Estimated start page per level-1 heading, counting explicit page breaks.
#[cfg(feature = "bookmarks")]
fn outline_entries(doc: &DocumentModel) -> Vec<crate::bookmarks::OutlineHeading> {
    use crate::model::HeadingLevel;

    let mut entries = Vec::new();
    let mut page = 1usize;
    for block in doc.blocks() {
        match block {
            Block::PageBreak => page += 1,
            Block::Heading(heading) if heading.level() == HeadingLevel::H1 => {
                entries.push(crate::bookmarks::OutlineHeading::new(heading.text(), page));
            }
            _ => {}
        }
    }
    entries
}

#[cfg(all(test, feature = "bookmarks"))]
mod outline_tests {
    use super::*;
    use crate::builder::{build_document, BuildContext};
    use crate::record::SpecificationRecord;
    use chrono::NaiveDate;

    fn sample_document() -> DocumentModel {
        let record = SpecificationRecord::new("Flow", "TECH_Flow", "/x")
            .with_overview("Overview text.");
        let ctx = BuildContext::new(
            NaiveDate::from_ymd_opt(2025, 11, 6).expect("valid date"),
            vec![0u8; 8],
        );
        build_document(&record, &StyleRegistry::standard(), &ctx).expect("build succeeds")
    }

    #[test]
    fn outline_entries_count_page_breaks_before_each_section() {
        let doc = sample_document();
        let entries = outline_entries(&doc);

        // Cover, front matter, and TOC each end with a page break, so the
        // first numbered section starts on page four; the remaining three
        // sections each follow one more break.
        let expected = [
            ("1. BUSINESS CONTEXT", 4),
            ("2. DETAILED DESIGN", 5),
            ("3. TESTING", 6),
            ("4. APPENDIX", 7),
        ];
        assert_eq!(entries.len(), expected.len());
        for (entry, (title, page)) in entries.iter().zip(expected) {
            assert_eq!(entry.title(), title);
            assert_eq!(entry.page(), page);
        }
    }

    #[test]
    fn only_top_level_headings_enter_the_outline() {
        let doc = sample_document();
        let entries = outline_entries(&doc);
        assert!(entries.iter().all(|entry| !entry.title().contains("1.1")));
    }
}

/// Page decorator applying the section margins and an optional centered
/// page-number footer.
struct PageFrameDecorator {
    page: usize,
    margins: Margins,
    page_numbers: bool,
}

impl PageFrameDecorator {
    fn new(margins: Margins, page_numbers: bool) -> Self {
        Self {
            page: 0,
            margins,
            page_numbers,
        }
    }
}

impl PageDecorator for PageFrameDecorator {
    fn decorate_page<'a>(
        &mut self,
        context: &genpdf::Context,
        mut area: genpdf::render::Area<'a>,
        style: Style,
    ) -> Result<genpdf::render::Area<'a>, PdfError> {
        self.page += 1;

        area.add_margins(PdfMargins::trbl(
            twips_to_mm(self.margins.top),
            twips_to_mm(self.margins.right),
            twips_to_mm(self.margins.bottom),
            twips_to_mm(self.margins.left),
        ));

        if self.page_numbers {
            let footer_height = mm_from_f64(FOOTER_HEIGHT_MM);
            let available = area.size().height;
            if footer_height < available {
                let mut footer_area = area.clone();
                footer_area.add_offset(Position::new(0, available - footer_height));
                let mut footer = elements::Paragraph::new(format!("Page {}", self.page));
                footer.set_alignment(genpdf::Alignment::Center);
                footer.render(context, footer_area, style)?;
                area.set_height(available - footer_height);
            }
        }

        Ok(area)
    }
}
