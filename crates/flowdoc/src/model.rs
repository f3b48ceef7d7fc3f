//! Data structures describing the logical content of a generated document.
//!
//! The types in this module form a renderer-agnostic tree of sections,
//! headings, styled paragraphs, tables, lists, images, and layout markers.
//! They intentionally avoid referencing any rendering crate directly so the
//! values can be produced by the document builder, inspected in tests, and
//! handed to a renderer in a single pass.  Every node except the root is
//! owned exclusively by its parent; a tree is built once per specification
//! record and never mutated afterwards.

use crate::style::{Alignment, NumberingScheme, Rgb, StyleId, UnresolvedStyleError};

/// Page margins in twips.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Margins {
    /// Top margin.
    pub top: u32,
    /// Right margin.
    pub right: u32,
    /// Bottom margin.
    pub bottom: u32,
    /// Left margin.
    pub left: u32,
}

impl Margins {
    /// Uniform margins on all four sides.
    pub fn uniform(value: u32) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }
}

impl Default for Margins {
    fn default() -> Self {
        // One inch on every side.
        Self::uniform(1440)
    }
}

/// A fragment of text together with inline style overrides.
///
/// Embedded `\n` characters represent intra-paragraph line breaks; renderers
/// must keep the fragment inside a single paragraph rather than splitting it
/// into separate blocks.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TextRun {
    text: String,
    bold: bool,
    color: Option<Rgb>,
    size: Option<u16>,
}

impl TextRun {
    /// Creates a run with the provided text and no overrides.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Returns the raw text of the run.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns whether the run is bold.
    pub fn is_bold(&self) -> bool {
        self.bold
    }

    /// Returns the color override, if any.
    pub fn color(&self) -> Option<Rgb> {
        self.color
    }

    /// Returns the size override in half-points, if any.
    pub fn size(&self) -> Option<u16> {
        self.size
    }

    /// Marks the run as bold and returns it.
    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    /// Assigns a color override and returns the updated run.
    pub fn colored(mut self, color: Rgb) -> Self {
        self.color = Some(color);
        self
    }

    /// Assigns a size override (half-points) and returns the updated run.
    pub fn sized(mut self, size: u16) -> Self {
        self.size = Some(size);
        self
    }
}

/// Heading levels participating in the document outline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum HeadingLevel {
    /// Top-level section heading.
    H1,
    /// Second-level heading.
    H2,
    /// Third-level heading.
    H3,
}

impl HeadingLevel {
    /// Outline level used by the table of contents, zero-based.
    pub fn outline_level(self) -> u8 {
        match self {
            Self::H1 => 0,
            Self::H2 => 1,
            Self::H3 => 2,
        }
    }

    /// Paragraph style backing the heading level.
    pub fn style(self) -> StyleId {
        match self {
            Self::H1 => StyleId::Heading1,
            Self::H2 => StyleId::Heading2,
            Self::H3 => StyleId::Heading3,
        }
    }
}

/// A heading with its outline level.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Heading {
    level: HeadingLevel,
    text: String,
}

impl Heading {
    /// Creates a heading at the given level.
    pub fn new(level: HeadingLevel, text: impl Into<String>) -> Self {
        Self {
            level,
            text: text.into(),
        }
    }

    /// Returns the heading level.
    pub fn level(&self) -> HeadingLevel {
        self.level
    }

    /// Returns the heading text.
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// A styled paragraph of text runs.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Paragraph {
    runs: Vec<TextRun>,
    style: Option<StyleId>,
    alignment: Option<Alignment>,
    spacing_before: Option<u32>,
    spacing_after: Option<u32>,
}

impl Paragraph {
    /// Creates a paragraph from the provided runs.
    pub fn new(runs: impl Into<Vec<TextRun>>) -> Self {
        Self {
            runs: runs.into(),
            ..Self::default()
        }
    }

    /// Creates a plain paragraph from a single unstyled run.
    pub fn text(text: impl Into<String>) -> Self {
        Self::new(vec![TextRun::new(text)])
    }

    /// Returns the text runs.
    pub fn runs(&self) -> &[TextRun] {
        &self.runs
    }

    /// Returns the named style, if any.
    pub fn style(&self) -> Option<StyleId> {
        self.style
    }

    /// Returns the alignment override, if any.
    pub fn alignment(&self) -> Option<Alignment> {
        self.alignment
    }

    /// Returns the spacing before the paragraph in twips, if set.
    pub fn spacing_before(&self) -> Option<u32> {
        self.spacing_before
    }

    /// Returns the spacing after the paragraph in twips, if set.
    pub fn spacing_after(&self) -> Option<u32> {
        self.spacing_after
    }

    /// Assigns a named style and returns the updated paragraph.
    pub fn with_style(mut self, style: StyleId) -> Self {
        self.style = Some(style);
        self
    }

    /// Overrides the alignment and returns the updated paragraph.
    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment.into();
        self
    }

    /// Sets the spacing before the paragraph and returns it.
    pub fn with_spacing_before(mut self, twips: u32) -> Self {
        self.spacing_before = Some(twips);
        self
    }

    /// Sets the spacing after the paragraph and returns it.
    pub fn with_spacing_after(mut self, twips: u32) -> Self {
        self.spacing_after = Some(twips);
        self
    }

    /// Concatenated plain text of all runs, for inspection and tests.
    pub fn plain_text(&self) -> String {
        self.runs.iter().map(TextRun::text).collect()
    }
}

/// A single table cell holding paragraph content.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TableCell {
    paragraphs: Vec<Paragraph>,
    shading: Option<Rgb>,
}

impl TableCell {
    /// Creates a cell from paragraph content.
    pub fn new(paragraphs: impl Into<Vec<Paragraph>>) -> Self {
        Self {
            paragraphs: paragraphs.into(),
            shading: None,
        }
    }

    /// Creates a cell holding a single plain paragraph.
    pub fn text(text: impl Into<String>) -> Self {
        Self::new(vec![Paragraph::text(text).with_style(StyleId::TableCell)])
    }

    /// Returns the cell paragraphs.
    pub fn paragraphs(&self) -> &[Paragraph] {
        &self.paragraphs
    }

    /// Returns the background fill, if any.
    pub fn shading(&self) -> Option<Rgb> {
        self.shading
    }

    /// Sets the background fill and returns the updated cell.
    pub fn with_shading(mut self, fill: Rgb) -> Self {
        self.shading = Some(fill);
        self
    }

    /// Concatenated plain text of the cell, for inspection and tests.
    pub fn plain_text(&self) -> String {
        self.paragraphs
            .iter()
            .map(Paragraph::plain_text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// An ordered row of cells.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TableRow {
    cells: Vec<TableCell>,
    header: bool,
}

impl TableRow {
    /// Creates a data row from the provided cells.
    pub fn new(cells: impl Into<Vec<TableCell>>) -> Self {
        Self {
            cells: cells.into(),
            header: false,
        }
    }

    /// Returns the cells in order.
    pub fn cells(&self) -> &[TableCell] {
        &self.cells
    }

    /// Returns whether the row is a header row.
    pub fn is_header(&self) -> bool {
        self.header
    }

    /// Marks the row as a header row and returns it.
    pub fn header(mut self) -> Self {
        self.header = true;
        self
    }
}

/// A table with fixed column widths and ordered rows.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Table {
    column_widths: Vec<u32>,
    rows: Vec<TableRow>,
}

impl Table {
    /// Creates a table with the given column widths (twips).
    pub fn new(column_widths: impl Into<Vec<u32>>) -> Self {
        Self {
            column_widths: column_widths.into(),
            rows: Vec::new(),
        }
    }

    /// Returns the fixed column widths.
    pub fn column_widths(&self) -> &[u32] {
        &self.column_widths
    }

    /// Returns the rows in order.
    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    /// Appends a row and returns the updated table.
    pub fn with_row(mut self, row: TableRow) -> Self {
        self.rows.push(row);
        self
    }

    /// Extends the table with multiple rows and returns it.
    pub fn with_rows<I>(mut self, rows: I) -> Self
    where
        I: IntoIterator<Item = TableRow>,
    {
        self.rows.extend(rows);
        self
    }
}

/// One item of a numbered or bulleted list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListItem {
    runs: Vec<TextRun>,
    level: u8,
}

impl ListItem {
    /// Creates a top-level list item from the provided runs.
    pub fn new(runs: impl Into<Vec<TextRun>>) -> Self {
        Self {
            runs: runs.into(),
            level: 0,
        }
    }

    /// Creates a top-level item holding plain text.
    pub fn text(text: impl Into<String>) -> Self {
        Self::new(vec![TextRun::new(text)])
    }

    /// Returns the item runs.
    pub fn runs(&self) -> &[TextRun] {
        &self.runs
    }

    /// Returns the nesting level, zero-based.
    pub fn level(&self) -> u8 {
        self.level
    }

    /// Concatenated plain text of the item.
    pub fn plain_text(&self) -> String {
        self.runs.iter().map(TextRun::text).collect()
    }
}

/// A list bound to a declared numbering scheme.
///
/// Numbering for ordered schemes restarts at 1 in every document.  An empty
/// item vector is a valid list that renders no items.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct List {
    scheme: NumberingScheme,
    items: Vec<ListItem>,
}

impl List {
    /// Creates an empty list referencing the given scheme.
    pub fn new(scheme: NumberingScheme) -> Self {
        Self {
            scheme,
            items: Vec::new(),
        }
    }

    /// Returns the referenced numbering scheme.
    pub fn scheme(&self) -> NumberingScheme {
        self.scheme
    }

    /// Returns the items in order.
    pub fn items(&self) -> &[ListItem] {
        &self.items
    }

    /// Extends the list with items and returns it.
    pub fn with_items<I>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = ListItem>,
    {
        self.items.extend(items);
        self
    }
}

/// An image block carrying a pre-loaded binary payload.
///
/// The payload is supplied by the caller; the model never fetches or decodes
/// it.  Dimensions are in pixels at the nominal 96 dpi of the source asset.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageBlock {
    data: Vec<u8>,
    width: u32,
    height: u32,
    alt_text: String,
    alignment: Alignment,
}

impl ImageBlock {
    /// Creates an image block from raw bytes and target dimensions.
    pub fn new(data: impl Into<Vec<u8>>, width: u32, height: u32) -> Self {
        Self {
            data: data.into(),
            width,
            height,
            alt_text: String::new(),
            alignment: Alignment::Left,
        }
    }

    /// Returns the raw image bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Returns the target width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the target height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the alternative text.
    pub fn alt_text(&self) -> &str {
        &self.alt_text
    }

    /// Returns the alignment.
    pub fn alignment(&self) -> Alignment {
        self.alignment
    }

    /// Sets the alternative text and returns the updated block.
    pub fn with_alt_text(mut self, alt_text: impl Into<String>) -> Self {
        self.alt_text = alt_text.into();
        self
    }

    /// Sets the alignment and returns the updated block.
    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }
}

/// A table-of-contents placeholder bound to a heading level range.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TocBlock {
    from_level: HeadingLevel,
    to_level: HeadingLevel,
    hyperlink: bool,
}

impl TocBlock {
    /// Creates a placeholder covering the given inclusive level range.
    pub fn new(from_level: HeadingLevel, to_level: HeadingLevel) -> Self {
        Self {
            from_level,
            to_level,
            hyperlink: false,
        }
    }

    /// Returns the first included heading level.
    pub fn from_level(&self) -> HeadingLevel {
        self.from_level
    }

    /// Returns the last included heading level.
    pub fn to_level(&self) -> HeadingLevel {
        self.to_level
    }

    /// Returns whether entries should link to their headings.
    pub fn is_hyperlinked(&self) -> bool {
        self.hyperlink
    }

    /// Enables hyperlinking and returns the updated placeholder.
    pub fn hyperlinked(mut self) -> Self {
        self.hyperlink = true;
        self
    }

    /// Whether a heading at `level` is listed by this table of contents.
    pub fn includes(&self, level: HeadingLevel) -> bool {
        self.from_level <= level && level <= self.to_level
    }
}

/// Structural elements that make up a document section.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Block {
    /// Outline heading.
    Heading(Heading),
    /// Styled paragraph content.
    Paragraph(Paragraph),
    /// Fixed-width table.
    Table(Table),
    /// Numbered or bulleted list.
    List(List),
    /// Pre-loaded image payload.
    Image(ImageBlock),
    /// Table-of-contents placeholder.
    TableOfContents(TocBlock),
    /// Explicit page break, a layout marker with no content.
    PageBreak,
}

impl Block {
    /// Convenience helper for building a heading block.
    pub fn heading(level: HeadingLevel, text: impl Into<String>) -> Self {
        Self::Heading(Heading::new(level, text))
    }

    /// Convenience helper for building a paragraph block.
    pub fn paragraph(paragraph: Paragraph) -> Self {
        Self::Paragraph(paragraph)
    }

    /// Convenience helper that yields an explicit page break block.
    pub fn page_break() -> Self {
        Self::PageBreak
    }
}

/// A document section: ordered children plus page properties.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DocSection {
    margins: Option<Margins>,
    blocks: Vec<Block>,
}

impl DocSection {
    /// Creates an empty section with default page properties.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the page margins, if overridden.
    pub fn margins(&self) -> Option<Margins> {
        self.margins
    }

    /// Returns the blocks contained in the section.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Sets the page margins and returns the updated section.
    pub fn with_margins(mut self, margins: Margins) -> Self {
        self.margins = Some(margins);
        self
    }

    /// Appends a block and returns the updated section.
    pub fn with_block(mut self, block: Block) -> Self {
        self.blocks.push(block);
        self
    }

    /// Extends the section with additional blocks and returns it.
    pub fn with_blocks<I>(mut self, blocks: I) -> Self
    where
        I: IntoIterator<Item = Block>,
    {
        self.blocks.extend(blocks);
        self
    }
}

/// The complete abstract document tree handed to a renderer.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DocumentModel {
    numbering: Vec<NumberingScheme>,
    sections: Vec<DocSection>,
}

impl DocumentModel {
    /// Creates an empty document with no declared numbering schemes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the declared numbering schemes.
    pub fn numbering(&self) -> &[NumberingScheme] {
        &self.numbering
    }

    /// Returns the sections in order.
    pub fn sections(&self) -> &[DocSection] {
        &self.sections
    }

    /// Declares a numbering scheme and returns the updated document.
    pub fn with_numbering(mut self, scheme: NumberingScheme) -> Self {
        self.numbering.push(scheme);
        self
    }

    /// Appends a section and returns the updated document.
    pub fn with_section(mut self, section: DocSection) -> Self {
        self.sections.push(section);
        self
    }

    /// Iterates over every block in document order.
    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.sections.iter().flat_map(|section| section.blocks().iter())
    }

    /// Iterates over every heading in document order.
    pub fn headings(&self) -> impl Iterator<Item = &Heading> {
        self.blocks().filter_map(|block| match block {
            Block::Heading(heading) => Some(heading),
            _ => None,
        })
    }

    /// Checks that every list references a declared numbering scheme.
    ///
    /// The document builder always declares both schemes, so a failure here
    /// indicates a construction defect rather than a runtime condition.
    pub fn validate_numbering(&self) -> Result<(), UnresolvedStyleError> {
        for block in self.blocks() {
            if let Block::List(list) = block {
                if !self.numbering.contains(&list.scheme()) {
                    return Err(UnresolvedStyleError::new(list.scheme().reference()));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headings_iterate_in_document_order() {
        let doc = DocumentModel::new().with_section(
            DocSection::new()
                .with_block(Block::heading(HeadingLevel::H1, "1. FIRST"))
                .with_block(Block::paragraph(Paragraph::text("body")))
                .with_block(Block::heading(HeadingLevel::H2, "1.1 Nested")),
        );

        let titles: Vec<_> = doc.headings().map(Heading::text).collect();
        assert_eq!(titles, vec!["1. FIRST", "1.1 Nested"]);
    }

    #[test]
    fn undeclared_numbering_scheme_is_detected() {
        let doc = DocumentModel::new().with_section(
            DocSection::new().with_block(Block::List(List::new(NumberingScheme::Requirements))),
        );

        let err = doc.validate_numbering().unwrap_err();
        assert_eq!(err.reference(), "requirements-list");
    }

    #[test]
    fn declared_numbering_scheme_validates() {
        let doc = DocumentModel::new()
            .with_numbering(NumberingScheme::Requirements)
            .with_section(
                DocSection::new()
                    .with_block(Block::List(List::new(NumberingScheme::Requirements))),
            );

        assert!(doc.validate_numbering().is_ok());
    }

    #[test]
    fn toc_level_range_is_inclusive() {
        let toc = TocBlock::new(HeadingLevel::H1, HeadingLevel::H3).hyperlinked();
        assert!(toc.includes(HeadingLevel::H1));
        assert!(toc.includes(HeadingLevel::H2));
        assert!(toc.includes(HeadingLevel::H3));
        assert!(toc.is_hyperlinked());
    }

    #[test]
    fn paragraph_plain_text_joins_runs() {
        let paragraph = Paragraph::new(vec![
            TextRun::new("Package Name: ").bold(),
            TextRun::new("SF-WorkAssignment"),
        ]);
        assert_eq!(paragraph.plain_text(), "Package Name: SF-WorkAssignment");
    }
}
