//! Declarative document assembly for integration-flow specifications.
//!
//! The crate turns [`record::SpecificationRecord`] metadata into a
//! renderer-independent [`model::DocumentModel`] via [`builder::build_document`],
//! then renders the model to PDF bytes with [`render::PdfRenderer`].
//! [`batch::generate_documents`] drives the whole pipeline for a set of
//! records with per-record failure isolation.
//!
//! With the optional `bookmarks` feature the rendered PDF additionally gets
//! a navigation outline built from the document's top-level headings.

pub mod batch;
#[cfg(feature = "bookmarks")]
pub mod bookmarks;
pub mod builder;
pub mod catalog;
pub mod fonts;
pub mod model;
pub mod record;
pub mod render;
pub mod style;
