//! Assembly of a [`DocumentModel`] from a [`SpecificationRecord`].
//!
//! [`build_document`] is a pure, deterministic transform: the same record and
//! build context always yield a structurally identical tree.  The document
//! date is an explicit input rather than sampled from the clock, and every
//! fixed string of the canonical layout lives in a module-level constant.
//!
//! The canonical shape, invariant across all records: cover page, document
//! release note, revision history, contact information, table of contents,
//! then the four numbered sections (business context, detailed design,
//! testing, appendix).

use chrono::NaiveDate;

use crate::model::{
    Block, DocSection, DocumentModel, HeadingLevel, ImageBlock, List, ListItem, Margins,
    Paragraph, Table, TableCell, TableRow, TextRun, TocBlock,
};
use crate::record::{MissingFieldError, SpecificationRecord};
use crate::style::{table_widths, Alignment, NumberingScheme, StyleId, StyleRegistry};

/// Fixed document version shown in the release note and revision history.
const DOCUMENT_VERSION: &str = "1.0.0";

/// Seeded revision row values (revision, description, page, rationale, type).
const INITIAL_REVISION: &str = "1.0";
const INITIAL_DESCRIPTION: &str = "Initial Draft";
const INITIAL_PAGE: &str = "All";
const INITIAL_RATIONALE: &str = "Initial Version";
const INITIAL_TYPE: &str = "Add";

/// Fixed contact rows.
const CONTACT_NAME: &str = "Abdelrahman Hussein";
const CONTACT_ROLE: &str = "Technical Consultant";

/// Cover page title lines.
const COVER_TITLE: &str = "SAP Cloud Platform Integration";
const COVER_SUBTITLE: &str = "Technical Specification";
const COVER_LINE: &str = "Technical Specifications Document";

/// Rendered logo dimensions in pixels.
const LOGO_WIDTH: u32 = 150;
const LOGO_HEIGHT: u32 = 200;

const DESIGN_INTRO: &str = "This is a custom-designed SAP CPI Integration flow \
for work assignment and timesheet conflict resolution.";

const ERROR_HANDLING: &str = "Standard CPI error handling applies. Errors are \
logged to message processing log. Failed messages are stored in error queue \
for manual intervention. Retry mechanism is configured for transient failures \
(3 attempts with 5-second delay).";

const TEST_DATA_NOTES: &str = "Test data should include: (1) Typical scenarios \
with standard work assignments and timesheets, (2) Edge cases with time zone \
boundaries, (3) Error scenarios with malformed data, (4) Load testing with \
bulk data volumes.";

const PERFORMANCE_NOTES: &str = "Expected processing time: <5 seconds for \
single record, <60 seconds for batch of 100 records. SF API rate limits: 5000 \
calls/hour. Memory usage: <500MB for typical batch operations.";

const APPENDIX_TEXT: &str = "Additional technical documentation, API \
specifications, and code samples are available in the project repository: \
https://github.com/eco-nadec/SF-WA-CPI";

/// Caller-supplied inputs that accompany a record through one build.
///
/// The logo payload is a precondition: the builder embeds the bytes as-is and
/// never loads or decodes assets itself.
#[derive(Clone, Debug)]
pub struct BuildContext {
    release_date: NaiveDate,
    logo: Vec<u8>,
}

impl BuildContext {
    /// Creates a build context from the document date and logo payload.
    pub fn new(release_date: NaiveDate, logo: impl Into<Vec<u8>>) -> Self {
        Self {
            release_date,
            logo: logo.into(),
        }
    }

    /// Returns the document release date.
    pub fn release_date(&self) -> NaiveDate {
        self.release_date
    }

    /// Returns the cover logo payload.
    pub fn logo(&self) -> &[u8] {
        &self.logo
    }

    fn date_string(&self) -> String {
        self.release_date.format("%Y-%m-%d").to_string()
    }
}

/// Builds the complete document tree for one specification record.
///
/// Fails fast with [`MissingFieldError`] when a mandatory field is empty;
/// never fails for well-formed input.
pub fn build_document(
    record: &SpecificationRecord,
    styles: &StyleRegistry,
    ctx: &BuildContext,
) -> Result<DocumentModel, MissingFieldError> {
    record.validate()?;

    let mut section = DocSection::new().with_margins(Margins::default());

    section = section.with_blocks(cover_blocks(ctx));
    section = section.with_block(Block::page_break());
    section = section.with_blocks(release_note_blocks(record, ctx));
    section = section.with_blocks(revision_history_blocks(styles, ctx));
    section = section.with_blocks(contact_blocks());
    section = section.with_block(Block::page_break());
    section = section.with_blocks(toc_blocks());
    section = section.with_block(Block::page_break());
    section = section.with_blocks(business_context_blocks(record));
    section = section.with_block(Block::page_break());
    section = section.with_blocks(detailed_design_blocks(record, styles));
    section = section.with_block(Block::page_break());
    section = section.with_blocks(testing_blocks(record, styles));
    section = section.with_block(Block::page_break());
    section = section.with_blocks(appendix_blocks());

    Ok(DocumentModel::new()
        .with_numbering(NumberingScheme::Requirements)
        .with_numbering(NumberingScheme::Bullet)
        .with_section(section))
}

/// Bold pre-contents block title, deliberately not a heading so it stays out
/// of the table of contents.
fn block_title(text: &str, spacing_before: u32) -> Block {
    Block::paragraph(
        Paragraph::new(vec![TextRun::new(text).bold().sized(28)])
            .with_spacing_before(spacing_before)
            .with_spacing_after(100),
    )
}

fn body_paragraph(text: &str) -> Paragraph {
    Paragraph::text(text).with_style(StyleId::Body)
}

fn key_value_row(key: &str, value: &str) -> TableRow {
    TableRow::new(vec![TableCell::text(key), TableCell::text(value)])
}

fn header_row(styles: &StyleRegistry, headers: &[&str]) -> TableRow {
    let cells = headers
        .iter()
        .map(|text| {
            TableCell::new(vec![Paragraph::text(*text)
                .with_style(StyleId::TableHeader)
                .with_alignment(Alignment::Center)])
            .with_shading(styles.header_fill())
        })
        .collect::<Vec<_>>();
    TableRow::new(cells).header()
}

fn cover_blocks(ctx: &BuildContext) -> Vec<Block> {
    vec![
        Block::Image(
            ImageBlock::new(ctx.logo().to_vec(), LOGO_WIDTH, LOGO_HEIGHT)
                .with_alt_text("Company Logo")
                .with_alignment(Alignment::Center),
        ),
        Block::paragraph(
            Paragraph::text(COVER_TITLE)
                .with_style(StyleId::Title)
                .with_spacing_before(200),
        ),
        Block::paragraph(Paragraph::text(COVER_SUBTITLE).with_style(StyleId::Subtitle)),
        Block::paragraph(Paragraph::text(COVER_LINE).with_style(StyleId::CoverLine)),
    ]
}

fn release_note_blocks(record: &SpecificationRecord, ctx: &BuildContext) -> Vec<Block> {
    let table = Table::new(table_widths::KEY_VALUE.to_vec()).with_rows([
        key_value_row("Document Name:", record.name()),
        key_value_row("Version:", DOCUMENT_VERSION),
        key_value_row("Description:", record.overview()),
        key_value_row("Release Date:", &ctx.date_string()),
    ]);

    vec![block_title("Document Release Note", 200), Block::Table(table)]
}

fn revision_history_blocks(styles: &StyleRegistry, ctx: &BuildContext) -> Vec<Block> {
    let date = ctx.date_string();
    let seed = TableRow::new(vec![
        TableCell::text(INITIAL_REVISION),
        TableCell::text(&date),
        TableCell::text(INITIAL_DESCRIPTION),
        TableCell::text(INITIAL_PAGE),
        TableCell::text(INITIAL_RATIONALE),
        TableCell::text(INITIAL_TYPE),
    ]);

    let table = Table::new(table_widths::REVISION.to_vec())
        .with_row(header_row(
            styles,
            &["Revision", "Date", "Description", "Page", "Rationale", "Type"],
        ))
        .with_row(seed);

    vec![block_title("Revision History", 300), Block::Table(table)]
}

fn contact_blocks() -> Vec<Block> {
    let table = Table::new(table_widths::KEY_VALUE.to_vec()).with_rows([
        key_value_row("Name:", CONTACT_NAME),
        key_value_row("Role:", CONTACT_ROLE),
    ]);

    vec![
        block_title("Document Contact Information", 300),
        Block::Table(table),
    ]
}

fn toc_blocks() -> Vec<Block> {
    vec![
        block_title("Table of Contents", 200),
        Block::TableOfContents(TocBlock::new(HeadingLevel::H1, HeadingLevel::H3).hyperlinked()),
    ]
}

fn business_context_blocks(record: &SpecificationRecord) -> Vec<Block> {
    let unit_info = Table::new(table_widths::KEY_VALUE.to_vec()).with_rows([
        key_value_row("Module", record.module()),
        key_value_row("Sub Module", record.sub_module()),
        key_value_row("iFlow Title", record.name()),
        key_value_row("Processing Type", record.processing_type()),
        key_value_row("Execution Frequency", record.frequency()),
    ]);

    vec![
        Block::heading(HeadingLevel::H1, "1. BUSINESS CONTEXT"),
        Block::heading(HeadingLevel::H2, "1.1 Overview"),
        Block::paragraph(body_paragraph(record.overview()).with_spacing_after(200)),
        Block::heading(HeadingLevel::H2, "1.2 Development Unit Information"),
        Block::Table(unit_info),
    ]
}

fn labeled_paragraph(label: &str, value: &str, spacing_after: u32) -> Block {
    Block::paragraph(
        Paragraph::new(vec![TextRun::new(label).bold(), TextRun::new(value)])
            .with_style(StyleId::Body)
            .with_spacing_after(spacing_after),
    )
}

fn detailed_design_blocks(record: &SpecificationRecord, styles: &StyleRegistry) -> Vec<Block> {
    let requirements = List::new(NumberingScheme::Requirements)
        .with_items(record.requirements().iter().map(ListItem::text));

    let scripts = Table::new(table_widths::SCRIPTS.to_vec())
        .with_row(header_row(styles, &["Script Name", "Description"]))
        .with_rows(record.scripts().iter().map(|step| {
            TableRow::new(vec![
                TableCell::text(step.name()),
                TableCell::text(step.description()),
            ])
        }));

    vec![
        Block::heading(HeadingLevel::H1, "2. DETAILED DESIGN"),
        Block::heading(HeadingLevel::H2, "2.1 Configuration Details"),
        labeled_paragraph("Package Name: ", record.package(), 100),
        labeled_paragraph("iFlow Name: ", record.name(), 100),
        labeled_paragraph("Technical Name: ", record.technical_name(), 100),
        labeled_paragraph("Endpoint: ", record.endpoint(), 200),
        Block::heading(HeadingLevel::H2, "2.2 SAP CPI iFlow Design"),
        Block::paragraph(body_paragraph(DESIGN_INTRO).with_spacing_after(100)),
        Block::heading(HeadingLevel::H3, "Detailed Requirements:"),
        Block::List(requirements),
        Block::heading(HeadingLevel::H3, "Groovy Scripts"),
        Block::Table(scripts),
        Block::heading(
            HeadingLevel::H2,
            "2.3 Adapter Configuration (Sender & Receiver)",
        ),
        // Embedded line breaks stay inside the one paragraph.
        Block::paragraph(body_paragraph(record.adapter()).with_spacing_after(200)),
        Block::heading(HeadingLevel::H2, "2.4 Error Handling"),
        Block::paragraph(body_paragraph(ERROR_HANDLING).with_spacing_after(200)),
    ]
}

fn testing_blocks(record: &SpecificationRecord, styles: &StyleRegistry) -> Vec<Block> {
    let conditions = Table::new(table_widths::TESTS.to_vec())
        .with_row(header_row(styles, &["Test Condition", "Expected Result"]))
        .with_rows(record.test_conditions().iter().map(|case| {
            TableRow::new(vec![
                TableCell::text(case.condition()),
                TableCell::text(case.expected_result()),
            ])
        }));

    vec![
        Block::heading(HeadingLevel::H1, "3. TESTING"),
        Block::heading(HeadingLevel::H2, "3.1 Test Conditions and Expected Results"),
        Block::Table(conditions),
        Block::heading(HeadingLevel::H2, "3.2 Test Data Considerations"),
        Block::paragraph(body_paragraph(TEST_DATA_NOTES).with_spacing_after(200)),
        Block::heading(HeadingLevel::H2, "3.3 Performance Considerations"),
        Block::paragraph(body_paragraph(PERFORMANCE_NOTES).with_spacing_after(200)),
    ]
}

fn appendix_blocks() -> Vec<Block> {
    vec![
        Block::heading(HeadingLevel::H1, "4. APPENDIX"),
        Block::paragraph(body_paragraph(APPENDIX_TEXT).with_spacing_after(200)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{ScriptStep, TestCondition};

    fn context() -> BuildContext {
        let date = NaiveDate::from_ymd_opt(2025, 11, 6).expect("valid date");
        BuildContext::new(date, vec![0u8; 16])
    }

    fn sample_record() -> SpecificationRecord {
        SpecificationRecord::new(
            "Delete Work Assignment",
            "SF_WorkAssignment_Delete",
            "/deleteWAList",
        )
        .with_classification(
            "SF-Nadec-WorkAssignment",
            "SAP Cloud Platform",
            "Hana Cloud Integration",
            "Background Online",
            "On-Demand",
        )
        .with_overview("Deletes work assignments by cancelling them.")
        .with_requirements(["A", "B", "C"])
        .with_scripts([
            ScriptStep::new("Parse Delete List", "Reads XML item nodes"),
            ScriptStep::new("Transform to SF Format", "Creates upsert payload"),
        ])
        .with_adapter("Receiver (SF): OData v2 API\nAuthentication: Basic")
        .with_test_conditions([TestCondition::new(
            "IDs provided with deleted=true",
            "Assignments cancelled",
        )])
    }

    fn find_tables(doc: &DocumentModel) -> Vec<&Table> {
        doc.blocks()
            .filter_map(|block| match block {
                Block::Table(table) => Some(table),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn build_is_deterministic() {
        let styles = StyleRegistry::standard();
        let ctx = context();
        let record = sample_record();

        let first = build_document(&record, &styles, &ctx).expect("build succeeds");
        let second = build_document(&record, &styles, &ctx).expect("build succeeds");
        assert_eq!(first, second);
    }

    #[test]
    fn canonical_layout_shape_is_invariant() {
        let styles = StyleRegistry::standard();
        let ctx = context();
        let doc = build_document(&sample_record(), &styles, &ctx).expect("build succeeds");

        assert_eq!(doc.sections().len(), 1);

        // Four numbered section headings, always present and in order.
        let h1_titles: Vec<_> = doc
            .headings()
            .filter(|heading| heading.level() == HeadingLevel::H1)
            .map(|heading| heading.text().to_string())
            .collect();
        assert_eq!(
            h1_titles,
            vec![
                "1. BUSINESS CONTEXT",
                "2. DETAILED DESIGN",
                "3. TESTING",
                "4. APPENDIX"
            ]
        );

        // Release note, revision history, contacts, unit info, scripts, tests.
        assert_eq!(find_tables(&doc).len(), 6);

        let breaks = doc
            .blocks()
            .filter(|block| matches!(block, Block::PageBreak))
            .count();
        assert_eq!(breaks, 6);

        assert!(doc
            .blocks()
            .any(|block| matches!(block, Block::TableOfContents(_))));
        assert!(doc.blocks().any(|block| matches!(block, Block::Image(_))));
        assert!(doc.validate_numbering().is_ok());
    }

    #[test]
    fn requirements_become_ordered_items_in_input_order() {
        let styles = StyleRegistry::standard();
        let doc =
            build_document(&sample_record(), &styles, &context()).expect("build succeeds");

        let list = doc
            .blocks()
            .find_map(|block| match block {
                Block::List(list) => Some(list),
                _ => None,
            })
            .expect("requirements list present");

        assert_eq!(list.scheme(), NumberingScheme::Requirements);
        let texts: Vec<_> = list.items().iter().map(|item| item.plain_text()).collect();
        assert_eq!(texts, vec!["A", "B", "C"]);
    }

    #[test]
    fn empty_collections_keep_containers() {
        let styles = StyleRegistry::standard();
        let record = SpecificationRecord::new("Flow", "TECH_Flow", "/x")
            .with_overview("Overview text.");
        let doc = build_document(&record, &styles, &context()).expect("build succeeds");

        let list = doc
            .blocks()
            .find_map(|block| match block {
                Block::List(list) => Some(list),
                _ => None,
            })
            .expect("list container still present");
        assert!(list.items().is_empty());

        // Scripts and test-conditions tables carry only their header rows.
        let tables = find_tables(&doc);
        let header_only: Vec<_> = tables
            .iter()
            .filter(|table| table.rows().len() == 1 && table.rows()[0].is_header())
            .collect();
        assert_eq!(header_only.len(), 2);
    }

    #[test]
    fn key_value_cells_carry_record_fields_verbatim() {
        let styles = StyleRegistry::standard();
        let record = sample_record();
        let doc = build_document(&record, &styles, &context()).expect("build succeeds");
        let tables = find_tables(&doc);

        // Development Unit Information is the fourth table in layout order.
        let unit_info = tables[3];
        let values: Vec<_> = unit_info
            .rows()
            .iter()
            .map(|row| row.cells()[1].plain_text())
            .collect();
        assert_eq!(
            values,
            vec![
                record.module(),
                record.sub_module(),
                record.name(),
                record.processing_type(),
                record.frequency()
            ]
        );
    }

    #[test]
    fn scripts_rows_preserve_input_order() {
        let styles = StyleRegistry::standard();
        let record = sample_record();
        let doc = build_document(&record, &styles, &context()).expect("build succeeds");

        let scripts = find_tables(&doc)[4];
        assert!(scripts.rows()[0].is_header());
        assert_eq!(scripts.rows()[1].cells()[0].plain_text(), "Parse Delete List");
        assert_eq!(
            scripts.rows()[2].cells()[0].plain_text(),
            "Transform to SF Format"
        );
    }

    #[test]
    fn release_note_uses_supplied_date() {
        let styles = StyleRegistry::standard();
        let doc =
            build_document(&sample_record(), &styles, &context()).expect("build succeeds");

        let release_note = find_tables(&doc)[0];
        assert_eq!(release_note.rows()[3].cells()[1].plain_text(), "2025-11-06");
        assert_eq!(release_note.rows()[1].cells()[1].plain_text(), "1.0.0");
    }

    #[test]
    fn adapter_line_breaks_stay_in_one_paragraph() {
        let styles = StyleRegistry::standard();
        let doc =
            build_document(&sample_record(), &styles, &context()).expect("build succeeds");

        let adapter = doc
            .blocks()
            .filter_map(|block| match block {
                Block::Paragraph(paragraph) => Some(paragraph),
                _ => None,
            })
            .find(|paragraph| paragraph.plain_text().contains("Authentication: Basic"))
            .expect("adapter paragraph present");
        assert!(adapter.plain_text().contains('\n'));
    }

    #[test]
    fn missing_overview_fails_fast() {
        let styles = StyleRegistry::standard();
        let record = SpecificationRecord::new("Flow", "TECH_Flow", "/x");
        let err = build_document(&record, &styles, &context()).unwrap_err();
        assert_eq!(err.field(), "overview");
        assert_eq!(err.record(), "TECH_Flow");
    }
}
