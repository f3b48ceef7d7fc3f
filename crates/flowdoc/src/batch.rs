//! Batch driver: builds, renders, and writes one artifact per record.
//!
//! Records are independent; a failure in one never aborts its siblings.  The
//! driver collects per-record diagnostics so the caller can decide whether to
//! retry or skip; no retry logic lives here.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::builder::{build_document, BuildContext};
use crate::record::{MissingFieldError, SpecificationRecord};
use crate::render::{DocumentRenderer, RenderError};
use crate::style::StyleRegistry;

/// File extension of the produced document packages.
const ARTIFACT_EXTENSION: &str = "pdf";

/// Failure of a single record at a specific pipeline stage.
#[derive(Debug)]
pub enum DocError {
    /// Record validation failed before any document was built.
    MissingField(MissingFieldError),
    /// The renderer rejected or failed to package the document tree.
    Render(RenderError),
    /// Writing the output artifact failed.
    Io(io::Error),
}

impl fmt::Display for DocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingField(err) => write!(f, "invalid record: {err}"),
            Self::Render(err) => write!(f, "rendering failed: {err}"),
            Self::Io(err) => write!(f, "writing artifact failed: {err}"),
        }
    }
}

impl std::error::Error for DocError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::MissingField(err) => Some(err),
            Self::Render(err) => Some(err),
            Self::Io(err) => Some(err),
        }
    }
}

/// A failed record together with its identity for diagnostics.
#[derive(Debug)]
pub struct BatchFailure {
    /// Identity of the failing record (technical name, or display name).
    pub record: String,
    /// The failure, tagged by pipeline stage.
    pub error: DocError,
}

/// Outcome of one batch run: the artifacts written and the failures observed.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Paths of the artifacts successfully written.
    pub artifacts: Vec<PathBuf>,
    /// Per-record failures; empty on a fully successful run.
    pub failures: Vec<BatchFailure>,
}

impl BatchReport {
    /// Whether every record produced an artifact.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Generates one document package per record into `out_dir`.
///
/// The output directory is created if needed; that is the only error that
/// aborts the whole batch.  Artifacts are named `{technical_name}.pdf`.
pub fn generate_documents(
    records: &[SpecificationRecord],
    styles: &StyleRegistry,
    ctx: &BuildContext,
    renderer: &dyn DocumentRenderer,
    out_dir: &Path,
) -> io::Result<BatchReport> {
    fs::create_dir_all(out_dir)?;

    let mut report = BatchReport::default();
    for record in records {
        match generate_one(record, styles, ctx, renderer, out_dir) {
            Ok(path) => {
                info!("generated {}", path.display());
                report.artifacts.push(path);
            }
            Err(error) => {
                warn!("record '{}' failed: {}", record.identity(), error);
                report.failures.push(BatchFailure {
                    record: record.identity().to_string(),
                    error,
                });
            }
        }
    }

    info!(
        "batch finished: {} artifacts, {} failures",
        report.artifacts.len(),
        report.failures.len()
    );
    Ok(report)
}

fn generate_one(
    record: &SpecificationRecord,
    styles: &StyleRegistry,
    ctx: &BuildContext,
    renderer: &dyn DocumentRenderer,
    out_dir: &Path,
) -> Result<PathBuf, DocError> {
    let doc = build_document(record, styles, ctx).map_err(DocError::MissingField)?;
    let rendered = renderer.render(&doc).map_err(DocError::Render)?;

    let path = out_dir
        .join(record.technical_name())
        .with_extension(ARTIFACT_EXTENSION);
    fs::write(&path, &rendered.bytes).map_err(DocError::Io)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DocumentModel;
    use crate::render::RenderedDocument;
    use chrono::NaiveDate;

    /// Renderer stand-in that returns a fixed byte marker without touching
    /// fonts or the PDF backend.
    struct StubRenderer;

    impl DocumentRenderer for StubRenderer {
        fn render(&self, _doc: &DocumentModel) -> Result<RenderedDocument, RenderError> {
            Ok(RenderedDocument {
                bytes: b"%stub%".to_vec(),
            })
        }
    }

    fn context() -> BuildContext {
        let date = NaiveDate::from_ymd_opt(2025, 11, 6).expect("valid date");
        BuildContext::new(date, vec![0u8; 8])
    }

    fn valid_record(technical_name: &str) -> SpecificationRecord {
        SpecificationRecord::new("Flow", technical_name, "/endpoint")
            .with_overview("Overview text.")
    }

    #[test]
    fn failing_record_does_not_block_siblings() {
        let dir = std::env::temp_dir().join("flowdoc-batch-isolation");
        let records = vec![
            valid_record("TECH_First"),
            SpecificationRecord::new("Broken Flow", "TECH_Broken", "/x"),
        ];

        let report = generate_documents(
            &records,
            &StyleRegistry::standard(),
            &context(),
            &StubRenderer,
            &dir,
        )
        .expect("output directory is writable");

        assert_eq!(report.artifacts.len(), 1);
        assert_eq!(report.failures.len(), 1);
        assert!(!report.is_complete());

        let failure = &report.failures[0];
        assert_eq!(failure.record, "TECH_Broken");
        assert!(matches!(failure.error, DocError::MissingField(_)));

        let artifact = &report.artifacts[0];
        assert!(artifact.ends_with("TECH_First.pdf"));
        assert_eq!(fs::read(artifact).expect("artifact exists"), b"%stub%");

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn artifacts_are_named_by_technical_name() {
        let dir = std::env::temp_dir().join("flowdoc-batch-naming");
        let records = vec![valid_record("SF_WorkAssignment_Delete")];

        let report = generate_documents(
            &records,
            &StyleRegistry::standard(),
            &context(),
            &StubRenderer,
            &dir,
        )
        .expect("output directory is writable");

        assert!(report.is_complete());
        assert!(report.artifacts[0].ends_with("SF_WorkAssignment_Delete.pdf"));

        let _ = fs::remove_dir_all(&dir);
    }
}
