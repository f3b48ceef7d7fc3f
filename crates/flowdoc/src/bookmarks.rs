//! PDF outline injection built on top of `lopdf`.
//!
//! The renderer estimates a start page per top-level heading; this module
//! rewrites the rendered bytes with a flat `/Outlines` tree so viewers can
//! jump between the numbered sections of the document.

use std::collections::BTreeMap;

use lopdf::{Dictionary, Document, Object, ObjectId};

/// A heading title together with its (1-indexed) target page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutlineHeading {
    title: String,
    page: usize,
}

impl OutlineHeading {
    /// Creates an outline entry for `title` starting on `page`.
    pub fn new(title: impl Into<String>, page: usize) -> Self {
        Self {
            title: title.into(),
            page,
        }
    }

    /// Returns the entry title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the 1-indexed target page.
    pub fn page(&self) -> usize {
        self.page
    }
}

/// Errors that can occur while embedding the outline into a rendered PDF.
#[derive(Debug)]
pub enum BookmarkError {
    /// The PDF bytes could not be parsed by `lopdf`.
    Parse(lopdf::Error),
    /// A required catalog entry was missing from the document trailer.
    MissingCatalog,
    /// The catalog object was not a dictionary, preventing outline injection.
    InvalidCatalog,
    /// A heading referenced a page that does not exist in the rendered output.
    MissingPage {
        /// Title of the heading whose page reference is missing.
        title: String,
        /// The requested (1-indexed) page number that could not be resolved.
        page: usize,
    },
}

impl From<lopdf::Error> for BookmarkError {
    fn from(err: lopdf::Error) -> Self {
        Self::Parse(err)
    }
}

impl From<std::io::Error> for BookmarkError {
    fn from(err: std::io::Error) -> Self {
        Self::Parse(err.into())
    }
}

impl std::fmt::Display for BookmarkError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "Failed to parse PDF bytes: {err}"),
            Self::MissingCatalog => write!(f, "PDF catalog entry is missing"),
            Self::InvalidCatalog => write!(f, "PDF catalog entry is not a dictionary"),
            Self::MissingPage { title, page } => write!(
                f,
                "Heading '{}' refers to missing page {} for its outline destination",
                title, page
            ),
        }
    }
}

impl std::error::Error for BookmarkError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::MissingCatalog | Self::InvalidCatalog | Self::MissingPage { .. } => None,
        }
    }
}

/// Applies a flat outline tree mapping headings to their start pages.
///
/// Opens the provided PDF bytes, builds an `/Outlines` dictionary, and
/// associates each heading with a `/Dest [page /Fit]` entry.  An empty entry
/// list returns the input bytes unchanged.
pub fn apply_heading_outline(
    pdf_bytes: &[u8],
    headings: &[OutlineHeading],
) -> Result<Vec<u8>, BookmarkError> {
    let mut document = Document::load_mem(pdf_bytes)?;

    let pages = document.get_pages();
    let mut entries = collect_entries(&mut document, headings, &pages)?;

    if entries.is_empty() {
        return Ok(pdf_bytes.to_vec());
    }

    let outlines_id = document.new_object_id();
    link_entries(outlines_id, &mut document, &mut entries);
    insert_outlines_root(outlines_id, &mut document, &entries)?;

    let mut buffer = Vec::new();
    document.save_to(&mut buffer).map_err(BookmarkError::from)?;
    Ok(buffer)
}

struct Entry {
    object_id: ObjectId,
    page_ref: ObjectId,
    title: String,
}

fn collect_entries(
    document: &mut Document,
    headings: &[OutlineHeading],
    pages: &BTreeMap<u32, ObjectId>,
) -> Result<Vec<Entry>, BookmarkError> {
    let mut entries = Vec::new();

    for heading in headings {
        let page_ref = pages.get(&(heading.page() as u32)).copied().ok_or_else(|| {
            BookmarkError::MissingPage {
                title: heading.title().to_string(),
                page: heading.page(),
            }
        })?;

        entries.push(Entry {
            object_id: document.new_object_id(),
            page_ref,
            title: heading.title().to_string(),
        });
    }

    Ok(entries)
}

fn link_entries(outlines_id: ObjectId, document: &mut Document, entries: &mut [Entry]) {
    for index in 0..entries.len() {
        let mut dictionary = Dictionary::new();
        dictionary.set(
            "Title",
            Object::string_literal(entries[index].title.as_str()),
        );
        dictionary.set(
            "Dest",
            Object::Array(vec![
                Object::Reference(entries[index].page_ref),
                Object::Name("Fit".into()),
            ]),
        );
        dictionary.set("Parent", Object::Reference(outlines_id));

        if index > 0 {
            dictionary.set("Prev", Object::Reference(entries[index - 1].object_id));
        }
        if index + 1 < entries.len() {
            dictionary.set("Next", Object::Reference(entries[index + 1].object_id));
        }

        document
            .objects
            .insert(entries[index].object_id, Object::Dictionary(dictionary));
    }
}

fn insert_outlines_root(
    outlines_id: ObjectId,
    document: &mut Document,
    entries: &[Entry],
) -> Result<(), BookmarkError> {
    let catalog_id = document
        .trailer
        .get(b"Root")
        .and_then(Object::as_reference)
        .map_err(|_| BookmarkError::MissingCatalog)?;

    document
        .objects
        .get_mut(&catalog_id)
        .ok_or(BookmarkError::MissingCatalog)?
        .as_dict_mut()
        .map_err(|_| BookmarkError::InvalidCatalog)?;

    let mut dictionary = Dictionary::new();
    dictionary.set("Type", Object::Name("Outlines".into()));
    dictionary.set("Count", Object::Integer(entries.len() as i64));
    if let Some(first) = entries.first() {
        dictionary.set("First", Object::Reference(first.object_id));
    }
    if let Some(last) = entries.last() {
        dictionary.set("Last", Object::Reference(last.object_id));
    }

    document
        .objects
        .insert(outlines_id, Object::Dictionary(dictionary));

    let catalog = document
        .objects
        .get_mut(&catalog_id)
        .ok_or(BookmarkError::MissingCatalog)?
        .as_dict_mut()
        .map_err(|_| BookmarkError::InvalidCatalog)?;

    catalog.set("Outlines", Object::Reference(outlines_id));

    Ok(())
}
