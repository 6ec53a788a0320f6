//! Banner fonts
//!
//! Font types, the glyph index arithmetic, and the logic for decoding banner `.txt` files.
//!
//! A banner font is a plain list of lines. Each of the 95 printable ASCII characters (`' '` to
//! `'~'`) owns a block of [`GLYPH_HEIGHT`] + 1 lines: one separator line followed by the
//! [`GLYPH_HEIGHT`] rows of the glyph. Blocks are packed back to back in codepoint order, so the
//! file starts with the (empty) separator line of the space character.

mod library;

use std::num::NonZero;
use std::ops::RangeInclusive;

use bstr::ByteSlice as _;
use itertools::Itertools as _;
use thiserror::Error;

pub use library::{BannerLibrary, DEFAULT_BANNERS, FontLoadError};

/// Number of rows in every glyph of a banner font
pub const GLYPH_HEIGHT: usize = 8;

/// The characters a banner font provides glyphs for, in the order their blocks appear.
pub const SUPPORTED_CHARS: RangeInclusive<char> = ' '..='~';

/// A loaded banner font
///
/// The table keeps the physical lines of the font source (with carriage returns removed) and
/// resolves glyph rows by index arithmetic. Lookups that fall outside the table are not errors:
/// the character simply contributes nothing to that row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontTable {
    lines: Vec<String>,
    height: NonZero<usize>,
}

impl FontTable {
    /// Builds a table from already split lines, using the standard [`GLYPH_HEIGHT`].
    #[must_use]
    pub fn from_lines(lines: Vec<String>) -> Self {
        Self::with_height(lines, NonZero::<usize>::MIN.saturating_add(GLYPH_HEIGHT - 1))
    }

    /// Builds a table whose glyphs are `height` rows tall.
    #[must_use]
    pub const fn with_height(lines: Vec<String>, height: NonZero<usize>) -> Self {
        Self { lines, height }
    }

    /// Decodes the contents of a banner file.
    ///
    /// This is a convenience wrapper around [`FontTable::from_bytes_with_warnings`] that drops the
    /// warnings. Decoding never fails: a truncated or malformed file yields a table that renders
    /// fewer rows.
    #[must_use]
    pub fn from_bytes(bytes: impl AsRef<[u8]>) -> Self {
        Self::from_bytes_with_warnings(bytes).0
    }

    /// Decodes the contents of a banner file and also returns any non-fatal issues found while
    /// decoding. See [`FontWarning`] for details.
    #[must_use]
    pub fn from_bytes_with_warnings(bytes: impl AsRef<[u8]>) -> (Self, Vec<FontWarning>) {
        let cleaned = bytes.as_ref().replace("\r", "");
        let lines = cleaned
            .split_str("\n")
            .map(|line| line.to_str_lossy().into_owned())
            .collect();
        let font = Self::from_lines(lines);
        let warnings = font.check();
        (font, warnings)
    }

    fn check(&self) -> Vec<FontWarning> {
        let mut warnings = Vec::new();
        let expected = self.expected_len();
        if self.lines.len() < expected {
            warnings.push(FontWarning::ShortTable {
                found: self.lines.len(),
                expected,
            });
        }
        for c in SUPPORTED_CHARS {
            let widths = self
                .glyph_rows(c)
                .map(|row| row.chars().count())
                .collect::<Vec<_>>();
            if !widths.iter().all_equal() {
                warnings.push(FontWarning::InconsistentWidth(c));
            }
        }
        warnings
    }

    /// Number of rows in each glyph.
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height.get()
    }

    /// Number of physical lines in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Returns true if the table holds no lines at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The number of lines a complete font of this height has.
    #[must_use]
    pub fn expected_len(&self) -> usize {
        SUPPORTED_CHARS
            .count()
            .saturating_mul(self.height().saturating_add(1))
    }

    /// The line of the table holding `row` (1-based, up to [`height`](Self::height)) of the glyph
    /// for `c`.
    ///
    /// This is pure arithmetic and does not check the table length; see
    /// [`segment`](Self::segment) for the bounds-checked lookup. Returns `None` for characters
    /// before `' '`, which have no block, and when the index does not fit in a `usize`.
    #[must_use]
    pub fn glyph_index(&self, c: char, row: usize) -> Option<usize> {
        let offset = u32::from(c).checked_sub(u32::from(*SUPPORTED_CHARS.start()))?;
        let offset = usize::try_from(offset).ok()?;
        offset
            .checked_mul(self.height().checked_add(1)?)?
            .checked_add(row)
    }

    /// The glyph segment of `c` for `row`, or `None` if the computed line lies outside the table.
    #[must_use]
    pub fn segment(&self, c: char, row: usize) -> Option<&str> {
        self.glyph_index(c, row)
            .and_then(|index| self.lines.get(index))
            .map(String::as_str)
    }

    fn glyph_rows(&self, c: char) -> impl Iterator<Item = &str> {
        (1..=self.height()).filter_map(move |row| self.segment(c, row))
    }
}

/// A non-fatal issue with a banner font found while decoding
#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum FontWarning {
    /// The font has fewer lines than the 95 glyph blocks require. Characters near the end of the
    /// ASCII range render partially or not at all.
    #[error("font has {found} lines, expected {expected}")]
    ShortTable {
        /// The number of lines in the font
        found: usize,
        /// The number of lines a complete font has
        expected: usize,
    },
    /// A glyph has rows of different widths, which breaks the column layout of rendered output.
    #[error("glyph for {} has inconsistent width", Self::char_debug(*.0))]
    InconsistentWidth(char),
}

impl FontWarning {
    pub(crate) fn char_debug(c: char) -> String {
        if c.is_ascii_graphic() {
            format!("'{c}'")
        } else {
            format!("\\u{{{:04X}}}", u32::from(c))
        }
    }
}
