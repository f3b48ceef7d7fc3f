use chrono::NaiveDate;
use flowdoc::builder::{build_document, BuildContext};
use flowdoc::catalog::{builtin_records, placeholder_logo};
use flowdoc::render::{DocumentRenderer, PdfRenderer, RenderError};
use flowdoc::style::StyleRegistry;
use sha2::{Digest, Sha256};

fn build_context() -> BuildContext {
    let date = NaiveDate::from_ymd_opt(2025, 11, 6).expect("valid date");
    BuildContext::new(date, placeholder_logo().expect("logo encodes"))
}

/// Renders one built-in flow document, or returns `None` when the bundled
/// fonts are not installed so that rendering tests degrade to a skip.
fn render_sample_document() -> Option<Vec<u8>> {
    if !flowdoc::fonts::default_fonts_available() {
        eprintln!("Skipping rendering assertions, bundled fonts not installed");
        return None;
    }

    let styles = StyleRegistry::standard();
    let ctx = build_context();
    let record = builtin_records().into_iter().next().expect("catalog entry");
    let doc = build_document(&record, &styles, &ctx).expect("built-in record builds");

    match PdfRenderer::new(StyleRegistry::standard()).render(&doc) {
        Ok(rendered) => Some(rendered.bytes),
        Err(RenderError::FontLoad(err)) => {
            eprintln!("Skipping rendering assertions, fonts unavailable: {}", err);
            None
        }
        Err(other) => panic!("render sample document: {other}"),
    }
}

fn scrub_pdf(bytes: &[u8]) -> Vec<u8> {
    fn scrub_segment(data: &mut [u8], tag: &[u8], terminator: u8) {
        let mut index = 0;
        while index + tag.len() < data.len() {
            if data[index..].starts_with(tag) {
                let mut cursor = index + tag.len();
                while cursor < data.len() {
                    let byte = data[cursor];
                    if byte == terminator {
                        break;
                    }
                    if terminator == b')' {
                        data[cursor] = b'0';
                    } else if !matches!(byte, b'<' | b'>' | b' ' | b'\n' | b'\r' | b'\t') {
                        data[cursor] = b'0';
                    }
                    cursor += 1;
                }
                index = cursor;
            } else {
                index += 1;
            }
        }
    }

    fn scrub_xml(data: &mut [u8], start: &[u8], end: &[u8]) {
        let mut offset = 0;
        while offset + start.len() < data.len() {
            if let Some(start_pos) = data[offset..]
                .windows(start.len())
                .position(|window| window == start)
            {
                let start_index = offset + start_pos + start.len();
                if let Some(end_pos) = data[start_index..]
                    .windows(end.len())
                    .position(|window| window == end)
                {
                    for byte in &mut data[start_index..start_index + end_pos] {
                        if !matches!(*byte, b'<' | b'>' | b'/' | b' ' | b'\n' | b'\r' | b'\t') {
                            *byte = b'0';
                        }
                    }
                    offset = start_index + end_pos + end.len();
                } else {
                    break;
                }
            } else {
                break;
            }
        }
    }

    let mut normalized = bytes.to_vec();
    scrub_segment(&mut normalized, b"/CreationDate(", b')');
    scrub_segment(&mut normalized, b"/ModDate(", b')');
    scrub_segment(&mut normalized, b"/ID[", b']');
    scrub_segment(&mut normalized, b"/Producer(", b')');
    scrub_xml(&mut normalized, b"<xmp:CreateDate>", b"</xmp:CreateDate>");
    scrub_xml(&mut normalized, b"<xmp:ModifyDate>", b"</xmp:ModifyDate>");
    scrub_xml(
        &mut normalized,
        b"<xmp:MetadataDate>",
        b"</xmp:MetadataDate>",
    );
    scrub_xml(
        &mut normalized,
        b"<xmpMM:DocumentID>",
        b"</xmpMM:DocumentID>",
    );
    scrub_xml(
        &mut normalized,
        b"<xmpMM:InstanceID>",
        b"</xmpMM:InstanceID>",
    );
    scrub_xml(&mut normalized, b"<xmpMM:VersionID>", b"</xmpMM:VersionID>");
    normalized
}

fn normalized_hash(bytes: &[u8]) -> [u8; 32] {
    let normalized = scrub_pdf(bytes);
    let digest = Sha256::digest(&normalized);
    digest.into()
}

#[test]
fn renders_non_empty_pdf() {
    let Some(bytes) = render_sample_document() else {
        return;
    };
    assert!(
        bytes.starts_with(b"%PDF"),
        "rendered package should carry a PDF header"
    );
}

#[test]
fn rendering_is_deterministic() {
    let Some(bytes_a) = render_sample_document() else {
        return;
    };
    let Some(bytes_b) = render_sample_document() else {
        return;
    };

    assert_eq!(bytes_a.len(), bytes_b.len(), "PDF sizes should match");

    let hash_a = normalized_hash(&bytes_a);
    let hash_b = normalized_hash(&bytes_b);

    assert_eq!(
        hash_a, hash_b,
        "renders of the same record must be byte-stable after metadata normalization"
    );
}

#[cfg(feature = "bookmarks")]
#[test]
fn rendered_outline_targets_the_numbered_sections() {
    use lopdf::Object;

    let Some(bytes) = render_sample_document() else {
        return;
    };

    let document = lopdf::Document::load_mem(&bytes).expect("rendered PDF parses");
    let catalog_id = document
        .trailer
        .get(b"Root")
        .and_then(Object::as_reference)
        .expect("catalog reference present");
    let catalog = document
        .objects
        .get(&catalog_id)
        .expect("catalog object present")
        .as_dict()
        .expect("catalog is a dictionary");

    let outlines_id = catalog
        .get(b"Outlines")
        .and_then(Object::as_reference)
        .expect("outline root attached");
    let outlines = document
        .objects
        .get(&outlines_id)
        .expect("outline object present")
        .as_dict()
        .expect("outline root is a dictionary");

    // One entry per numbered section of the fixed layout.
    assert_eq!(
        outlines
            .get(b"Count")
            .and_then(Object::as_i64)
            .expect("entry count present"),
        4
    );

    let first_id = outlines
        .get(b"First")
        .and_then(Object::as_reference)
        .expect("first entry linked");
    let first = document
        .objects
        .get(&first_id)
        .expect("first entry present")
        .as_dict()
        .expect("entry is a dictionary");
    assert_eq!(
        first
            .get(b"Title")
            .and_then(Object::as_str)
            .expect("entry title present"),
        b"1. BUSINESS CONTEXT"
    );
    assert!(first.get(b"Dest").is_ok());
}

#[test]
fn every_builtin_record_builds() {
    let styles = StyleRegistry::standard();
    let ctx = build_context();
    for record in builtin_records() {
        build_document(&record, &styles, &ctx)
            .unwrap_or_else(|err| panic!("record '{}' should build: {err}", record.identity()));
    }
}
