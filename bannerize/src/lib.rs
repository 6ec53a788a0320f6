//! A crate for rendering text as large banner glyphs.
//!
//! Banner fonts are plain text files holding one fixed-height block of lines per printable ASCII
//! character (see [`font`]). Rendering looks up the rows of each character's block and
//! concatenates them, one output row per glyph row.
//!
//! # Features
//!
//! - Multi-line input, using a literal `\n` marker as line separator
//!   ([`LINE_BREAK`](crate::render::LINE_BREAK))
//! - Coloring every occurrence of a substring with a palette, `rgb()` or `hsl()` color
//!   ([`Highlight`](crate::render::Highlight), [`Color`](crate::color::Color))
//! - Left, center or right alignment within a given width
//!   ([`Alignment`](crate::render::Alignment))
//! - Output to a string or appended row by row to a file
//!   ([`RowSink`](crate::sink::RowSink))
//!
//! # Example
//!
//! ```
//! # use bannerize::font::{FontTable, GLYPH_HEIGHT, SUPPORTED_CHARS};
//! # use bannerize::render::Renderer;
//! // A font where every glyph is its character followed by the row number
//! let mut lines = Vec::new();
//! for c in SUPPORTED_CHARS {
//!     lines.push(String::new());
//!     for row in 1..=GLYPH_HEIGHT {
//!         lines.push(format!("{c}{row}"));
//!     }
//! }
//! let font = FontTable::from_lines(lines);
//! let rendered = Renderer::new(&font).render(r"Hi\n!");
//! let expected = concat!(
//!     "H1i1\nH2i2\nH3i3\nH4i4\nH5i5\nH6i6\nH7i7\nH8i8\n",
//!     "!1\n!2\n!3\n!4\n!5\n!6\n!7\n!8"
//! );
//! assert_eq!(rendered, expected);
//! ```

pub mod color;
pub mod font;
pub mod render;
pub mod search;
pub mod sink;
