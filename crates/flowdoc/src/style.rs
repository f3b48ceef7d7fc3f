//! Fixed catalog of named visual styles and numbering schemes.
//!
//! The registry is a closed vocabulary: every identifier the document builder
//! may reference resolves via an exhaustive match, so an unresolved *style* is
//! impossible by construction.  Numbering schemes referenced by list blocks
//! are the one place the check has to happen at runtime, because the scheme
//! declaration lives in the document model; see
//! [`crate::model::DocumentModel::validate_numbering`].
//!
//! Sizes are stored in half-points and spacing in twips (twentieths of a
//! point), matching the units of the portable document package the rendered
//! output descends from.  Renderers convert to their own units.

use std::fmt;

/// RGB color triple owned by the style layer so the document model never has
/// to reference a rendering crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// White, used for text on shaded table headers.
    pub const WHITE: Rgb = Rgb(0xFF, 0xFF, 0xFF);
    /// Black body-text color.
    pub const BLACK: Rgb = Rgb(0x00, 0x00, 0x00);
    /// The fixed brand accent used for headings and table-header shading.
    pub const ACCENT: Rgb = Rgb(0x00, 0x70, 0xC0);
}

/// Horizontal alignment for paragraphs and table cell content.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Alignment {
    /// Left aligned content.
    #[default]
    Left,
    /// Center aligned content.
    Center,
    /// Right aligned content.
    Right,
}

/// Identifiers for the fixed set of paragraph styles.
///
/// The vocabulary is closed and not user-extensible; the builder can only
/// reference variants of this enum, which is what makes style lookup total.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StyleId {
    /// Main cover-page title line.
    Title,
    /// Secondary cover-page title line.
    Subtitle,
    /// Tertiary cover-page line.
    CoverLine,
    /// Top-level section heading (outline level 0).
    Heading1,
    /// Second-level heading (outline level 1).
    Heading2,
    /// Third-level heading (outline level 2).
    Heading3,
    /// Regular body text.
    Body,
    /// Bold white text on shaded table header cells.
    TableHeader,
    /// Regular table cell text.
    TableCell,
}

/// Visual definition behind a [`StyleId`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StyleDef {
    /// Font size in half-points.
    pub size: u16,
    /// Whether the text is bold.
    pub bold: bool,
    /// Text color; `None` means the document default (black).
    pub color: Option<Rgb>,
    /// Spacing before the paragraph, in twips.
    pub spacing_before: u32,
    /// Spacing after the paragraph, in twips.
    pub spacing_after: u32,
    /// Horizontal alignment.
    pub alignment: Alignment,
}

const TITLE: StyleDef = StyleDef {
    size: 32,
    bold: true,
    color: None,
    spacing_before: 200,
    spacing_after: 100,
    alignment: Alignment::Center,
};

const SUBTITLE: StyleDef = StyleDef {
    size: 28,
    bold: true,
    color: None,
    spacing_before: 0,
    spacing_after: 100,
    alignment: Alignment::Center,
};

const COVER_LINE: StyleDef = StyleDef {
    size: 24,
    bold: false,
    color: None,
    spacing_before: 0,
    spacing_after: 400,
    alignment: Alignment::Center,
};

const HEADING_1: StyleDef = StyleDef {
    size: 32,
    bold: true,
    color: Some(Rgb::ACCENT),
    spacing_before: 240,
    spacing_after: 120,
    alignment: Alignment::Left,
};

const HEADING_2: StyleDef = StyleDef {
    size: 28,
    bold: true,
    color: Some(Rgb::ACCENT),
    spacing_before: 180,
    spacing_after: 120,
    alignment: Alignment::Left,
};

const HEADING_3: StyleDef = StyleDef {
    size: 24,
    bold: true,
    color: Some(Rgb::BLACK),
    spacing_before: 120,
    spacing_after: 120,
    alignment: Alignment::Left,
};

const BODY: StyleDef = StyleDef {
    size: 22,
    bold: false,
    color: None,
    spacing_before: 0,
    spacing_after: 0,
    alignment: Alignment::Left,
};

const TABLE_HEADER: StyleDef = StyleDef {
    size: 20,
    bold: true,
    color: Some(Rgb::WHITE),
    spacing_before: 0,
    spacing_after: 0,
    alignment: Alignment::Center,
};

const TABLE_CELL: StyleDef = StyleDef {
    size: 20,
    bold: false,
    color: None,
    spacing_before: 0,
    spacing_after: 0,
    alignment: Alignment::Left,
};

/// Numbering schemes available to list blocks.
///
/// Each scheme must be declared once in the document model's numbering
/// configuration before a list may reference it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NumberingScheme {
    /// Decimal-ordered list ("1.", "2.", ...); numbering restarts at 1 for
    /// every document.
    Requirements,
    /// Unordered bullet list.
    Bullet,
}

impl NumberingScheme {
    /// Stable reference name of the scheme.
    pub fn reference(self) -> &'static str {
        match self {
            Self::Requirements => "requirements-list",
            Self::Bullet => "bullet-list",
        }
    }

    /// Whether items are numbered sequentially rather than bulleted.
    pub fn is_ordered(self) -> bool {
        matches!(self, Self::Requirements)
    }
}

impl fmt::Display for NumberingScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.reference())
    }
}

/// Fixed table column widths in twips, per table type.  Widths are constants
/// of the layout and never derived from cell content.
pub mod table_widths {
    /// Two-column key/value tables (release note, contacts, unit info).
    pub const KEY_VALUE: [u32; 2] = [2800, 6560];
    /// Six-column revision history table.
    pub const REVISION: [u32; 6] = [1400, 1400, 2600, 1400, 1560, 1000];
    /// Two-column scripts table.
    pub const SCRIPTS: [u32; 2] = [3000, 6360];
    /// Two-column test-conditions table.
    pub const TESTS: [u32; 2] = [4680, 4680];
}

/// Process-wide, read-only catalog of styles.
///
/// Constructed once and shared freely; lookup is a total function so there is
/// no error path for style resolution.
#[derive(Clone, Copy, Debug, Default)]
pub struct StyleRegistry {
    _private: (),
}

impl StyleRegistry {
    /// Returns the one fixed style set used by every generated document.
    pub fn standard() -> Self {
        Self { _private: () }
    }

    /// Looks up the definition behind a style identifier.  Always succeeds.
    pub fn get(&self, id: StyleId) -> &'static StyleDef {
        match id {
            StyleId::Title => &TITLE,
            StyleId::Subtitle => &SUBTITLE,
            StyleId::CoverLine => &COVER_LINE,
            StyleId::Heading1 => &HEADING_1,
            StyleId::Heading2 => &HEADING_2,
            StyleId::Heading3 => &HEADING_3,
            StyleId::Body => &BODY,
            StyleId::TableHeader => &TABLE_HEADER,
            StyleId::TableCell => &TABLE_CELL,
        }
    }

    /// Shading fill applied to header cells.
    pub fn header_fill(&self) -> Rgb {
        Rgb::ACCENT
    }
}

/// The document builder referenced a numbering scheme that the document model
/// does not declare.  Unreachable in correct construction code; fatal to the
/// affected document only.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnresolvedStyleError {
    reference: String,
}

impl UnresolvedStyleError {
    pub(crate) fn new(reference: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
        }
    }

    /// The reference that failed to resolve.
    pub fn reference(&self) -> &str {
        &self.reference
    }
}

impl fmt::Display for UnresolvedStyleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "numbering scheme '{}' is not declared in the document numbering configuration",
            self.reference
        )
    }
}

impl std::error::Error for UnresolvedStyleError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_style_resolves() {
        let registry = StyleRegistry::standard();
        for id in [
            StyleId::Title,
            StyleId::Subtitle,
            StyleId::CoverLine,
            StyleId::Heading1,
            StyleId::Heading2,
            StyleId::Heading3,
            StyleId::Body,
            StyleId::TableHeader,
            StyleId::TableCell,
        ] {
            let def = registry.get(id);
            assert!(def.size > 0);
        }
    }

    #[test]
    fn header_style_is_bold_white_on_accent() {
        let registry = StyleRegistry::standard();
        let header = registry.get(StyleId::TableHeader);
        assert!(header.bold);
        assert_eq!(header.color, Some(Rgb::WHITE));
        assert_eq!(registry.header_fill(), Rgb::ACCENT);
    }

    #[test]
    fn numbering_references_are_stable() {
        assert_eq!(NumberingScheme::Requirements.reference(), "requirements-list");
        assert_eq!(NumberingScheme::Bullet.reference(), "bullet-list");
        assert!(NumberingScheme::Requirements.is_ordered());
        assert!(!NumberingScheme::Bullet.is_ordered());
    }
}
