//! Renderer and rendering settings

use std::convert::Infallible;
use std::iter::repeat_n;
use std::path::PathBuf;

use log::debug;
use thiserror::Error;

use crate::color::{Color, ColorParseError, RESET};
use crate::font::FontTable;
use crate::search::HighlightRanges;
use crate::sink::{FileSink, RowSink, SinkError};

/// The two-character marker (a backslash followed by `n`) that separates input lines.
pub const LINE_BREAK: &str = "\\n";

/// Replaces native line breaks (`\r\n` or `\n`) with [`LINE_BREAK`] markers.
///
/// ```
/// # use bannerize::render::normalize_line_breaks;
/// assert_eq!(normalize_line_breaks("Hello\r\nThere\n"), r"Hello\nThere\n");
/// ```
#[must_use]
pub fn normalize_line_breaks(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\n', LINE_BREAK)
}

/// The main type for rendering
///
/// Use [`render()`](Renderer::render) to produce a string, or
/// [`render_into()`](Renderer::render_into) to send rows to a [`RowSink`].
///
/// The other methods are meant to be used in a builder pattern:
/// ```
/// # use bannerize::color::{Color, NamedColor};
/// # use bannerize::font::FontTable;
/// # use bannerize::render::{Alignment, Highlight, Renderer};
/// let mut lines = vec![String::new(); 34 * 9];
/// for row in 1..=8 {
///     lines[33 * 9 + row] = format!("A{row}");
/// }
/// let font = FontTable::from_lines(lines);
/// let rendered = Renderer::new(&font)
///     .highlight(Highlight::All)
///     .color(&Color::Named(NamedColor::Red))
///     .alignment(Alignment::Right)
///     .width(4)
///     .render("A");
/// assert_eq!(rendered.lines().count(), 8);
/// assert_eq!(rendered.lines().next(), Some("  \x1b[31mA1\x1b[0m"));
/// ```
#[must_use]
#[derive(Debug, Clone)]
pub struct Renderer<'a> {
    font: &'a FontTable,
    highlight: Highlight<'a>,
    escape: Option<String>,
    alignment: Alignment,
    width: Option<usize>,
}

impl<'a> Renderer<'a> {
    /// Creates a new renderer without highlighting, color or alignment.
    pub const fn new(font: &'a FontTable) -> Self {
        Self {
            font,
            highlight: Highlight::None,
            escape: None,
            alignment: Alignment::Left,
            width: None,
        }
    }

    /// Sets which characters are drawn in the highlight color.
    pub const fn highlight(mut self, highlight: Highlight<'a>) -> Self {
        self.highlight = highlight;
        self
    }

    /// Sets the highlight color. The escape sequence is resolved here, once, and reused for every
    /// highlighted segment. An [unknown](Color::Unknown) color disables coloring.
    pub fn color(mut self, color: &Color) -> Self {
        self.escape = color.sgr().map(|sgr| sgr.to_string());
        self
    }

    /// Sets the alignment. It only has an effect once a [`width`](Self::width) is set.
    pub const fn alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// Sets the width (in columns) rows are aligned within, usually the terminal width.
    pub const fn width(mut self, width: usize) -> Self {
        self.width = Some(width);
        self
    }

    /// Renders the given string.
    ///
    /// Input lines are separated by [`LINE_BREAK`] markers. Each non-empty input line produces up
    /// to [`height`](FontTable::height) rows; an empty input line produces one blank row. Rows
    /// that end up empty, because none of their characters have a glyph in the font, are left out.
    /// Rows are joined by newlines, without a trailing newline.
    #[must_use]
    pub fn render(&self, text: &str) -> String {
        let mut rows = Vec::new();
        let Ok(()) = self.each_row(text, |row| {
            rows.push(row);
            Ok::<_, Infallible>(())
        });
        rows.join("\n")
    }

    /// Renders the given string, appending each row to `sink` instead of returning it.
    ///
    /// # Errors
    /// Returns the first error from the sink. Rows appended before the failure stay in the sink.
    pub fn render_into(&self, text: &str, sink: &mut impl RowSink) -> Result<(), SinkError> {
        self.each_row(text, |row| sink.append_row(&row))
    }

    /// Composes `row` (1-based) of the glyphs of `line`, coloring highlighted characters.
    ///
    /// Segments are concatenated in column order without separators. Characters without a glyph
    /// line for this row, or with an empty one, contribute nothing. No alignment is applied.
    #[must_use]
    pub fn compose_row(&self, line: &str, row: usize, ranges: &HighlightRanges) -> String {
        self.compose(line, row, ranges).0
    }

    fn each_row<E>(
        &self,
        text: &str,
        mut emit: impl FnMut(String) -> Result<(), E>,
    ) -> Result<(), E> {
        let mut lines = text.split(LINE_BREAK).collect::<Vec<_>>();
        if lines.iter().all(|line| line.is_empty()) {
            lines.pop();
        }
        debug!(
            "rendering {} line(s) with {:?}, alignment {:?}",
            lines.len(),
            self.highlight,
            self.alignment
        );
        for line in lines {
            if line.is_empty() {
                emit(String::new())?;
                continue;
            }
            let ranges = self.highlight.ranges(line);
            for row in 1..=self.font.height() {
                let (text, visible_width) = self.compose(line, row, &ranges);
                if text.is_empty() {
                    continue;
                }
                emit(self.align(text, visible_width))?;
            }
        }
        Ok(())
    }

    fn compose(&self, line: &str, row: usize, ranges: &HighlightRanges) -> (String, usize) {
        let mut text = String::new();
        let mut width = 0;
        for (offset, c) in line.char_indices() {
            let Some(segment) = self.font.segment(c, row) else {
                continue;
            };
            width += segment.chars().count();
            match &self.escape {
                Some(escape) if !segment.is_empty() && ranges.contains(offset) => {
                    text.push_str(escape);
                    text.push_str(segment);
                    text.push_str(RESET);
                }
                _ => text.push_str(segment),
            }
        }
        (text, width)
    }

    fn align(&self, row: String, visible_width: usize) -> String {
        match self.width {
            Some(width) => self.alignment.pad(row, visible_width, width),
            None => row,
        }
    }
}

/// Which characters of each input line are drawn in the highlight color
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Highlight<'a> {
    /// Nothing is highlighted. This is the default.
    #[default]
    None,
    /// Every character is highlighted.
    All,
    /// Every non-overlapping occurrence of the substring is highlighted. An empty substring
    /// highlights nothing.
    Substring(&'a str),
}

impl Highlight<'_> {
    fn ranges(self, line: &str) -> HighlightRanges {
        match self {
            Self::None => HighlightRanges::default(),
            Self::All => HighlightRanges::whole(line),
            Self::Substring(needle) => HighlightRanges::of(line, needle),
        }
    }
}

/// The horizontal placement of rows within the configured width
///
/// The default is [`Alignment::Left`], which leaves rows untouched.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Alignment {
    /// Rows start in the first column. This is the default.
    #[default]
    Left,
    /// Rows are centered. When the free space is odd, the extra column goes to the right (and is
    /// not written).
    Center,
    /// Rows end in the last column.
    Right,
}

impl Alignment {
    /// Looks up an alignment by name (`"left"`, `"center"` or `"right"`, ignoring case). Any other
    /// name means [`Alignment::Left`].
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "center" => Self::Center,
            "right" => Self::Right,
            _ => Self::Left,
        }
    }

    /// Left-pads `row`, which occupies `width` visible columns, with spaces to place it within
    /// `to_width` columns. Rows that are not narrower than `to_width` are returned unchanged.
    #[must_use]
    pub fn pad(self, row: String, width: usize, to_width: usize) -> String {
        let Some(padding) = to_width.checked_sub(width).filter(|&padding| padding > 0) else {
            return row;
        };
        let start = match self {
            Self::Left => return row,
            Self::Center => padding / 2,
            Self::Right => padding,
        };
        repeat_n(' ', start).chain(row.chars()).collect()
    }
}

/// Where a [`RenderRequest`] writes its rows instead of returning them
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputFile {
    /// Directory holding the file, created if missing
    pub dir: PathBuf,
    /// File name within `dir`
    pub file: PathBuf,
}

/// Settings for a [`RenderRequest`]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Color expression for highlighted characters; see [`Color`]
    pub color: Option<String>,
    /// Row alignment
    pub alignment: Alignment,
    /// Width rows are aligned within
    pub width: Option<usize>,
    /// File to append rows to instead of returning them
    pub output: Option<OutputFile>,
}

/// Everything one render call needs
#[derive(Clone, Debug)]
pub struct RenderRequest<'a> {
    /// The text, with lines separated by [`LINE_BREAK`] markers
    pub text: &'a str,
    /// Which characters to color
    pub highlight: Highlight<'a>,
    /// The banner font
    pub font: &'a FontTable,
    /// Remaining settings
    pub options: RenderOptions,
}

impl RenderRequest<'_> {
    /// Performs the render.
    ///
    /// Returns the rendered text, or an empty string if the rows were written to an
    /// [`OutputFile`]. The output file is emptied first, so repeating a request gives the same
    /// file contents.
    ///
    /// # Errors
    /// Returns `Err` if the color expression is malformed or the output file cannot be written;
    /// see [`RenderError`].
    pub fn render(&self) -> Result<String, RenderError> {
        let mut renderer = Renderer::new(self.font)
            .highlight(self.highlight)
            .alignment(self.options.alignment);
        if let Some(color) = &self.options.color {
            renderer = renderer.color(&color.parse()?);
        }
        if let Some(width) = self.options.width {
            renderer = renderer.width(width);
        }
        let Some(output) = &self.options.output else {
            return Ok(renderer.render(self.text));
        };
        let mut sink = FileSink::create(&output.dir, &output.file)?;
        renderer.render_into(self.text, &mut sink)?;
        Ok(String::new())
    }
}

/// An error that aborts a render
#[derive(Debug, Error)]
pub enum RenderError {
    /// The color expression is malformed.
    #[error("invalid color: {0}")]
    Color(#[from] ColorParseError),
    /// The output could not be written.
    #[error("{0}")]
    Sink(#[from] SinkError),
}

#[cfg(test)]
mod tests {
    use std::{fs, io};

    use pretty_assertions::assert_eq;
    use test_case::test_case;

    use super::{
        Alignment, Highlight, OutputFile, RenderError, RenderOptions, RenderRequest, Renderer,
        normalize_line_breaks,
    };
    use crate::color::{Color, NamedColor, RgbColor};
    use crate::font::FontTable;
    use crate::font::tests::{sample_font, sample_lines};
    use crate::search::HighlightRanges;
    use crate::sink::{RowSink, SinkError};

    /// Accepts rows until the `fail_at`-th append (1-based), which fails.
    struct FailingSink {
        rows: Vec<String>,
        attempts: usize,
        fail_at: usize,
    }

    impl RowSink for FailingSink {
        fn append_row(&mut self, row: &str) -> Result<(), SinkError> {
            self.attempts += 1;
            if self.attempts == self.fail_at {
                return Err(SinkError::Write {
                    path: "full.txt".into(),
                    source: io::Error::other("disk full"),
                });
            }
            self.rows.push(row.to_owned());
            Ok(())
        }
    }

    fn strip_escapes(text: &str) -> String {
        let mut plain = String::new();
        let mut chars = text.chars();
        while let Some(c) = chars.next() {
            if c == '\x1b' {
                chars.by_ref().find(|&c| c == 'm');
            } else {
                plain.push(c);
            }
        }
        plain
    }

    fn glyph(word: &str, row: usize) -> String {
        word.chars().map(|c| format!("{c}{row} ")).collect()
    }

    #[test]
    fn single_character() {
        let font = sample_font();
        let rendered = Renderer::new(&font).render("A");
        let expected = (1..=8)
            .map(|row| font.segment('A', row).unwrap())
            .collect::<Vec<_>>()
            .join("\n");
        assert_eq!(rendered, expected);
        assert_eq!(rendered.lines().filter(|line| !line.is_empty()).count(), 8);
    }

    #[test]
    fn deterministic() {
        let font = sample_font();
        let renderer = Renderer::new(&font).highlight(Highlight::Substring("l"));
        assert_eq!(renderer.render("hello\\nworld"), renderer.render("hello\\nworld"));
    }

    #[test]
    fn multi_line() {
        let font = sample_font();
        let rendered = Renderer::new(&font).render("Hi\\n!");
        let expected = (1..=8)
            .map(|row| glyph("Hi", row))
            .chain((1..=8).map(|row| glyph("!", row)))
            .collect::<Vec<_>>()
            .join("\n");
        assert_eq!(rendered, expected);
    }

    #[test]
    fn blank_line_between() {
        let font = sample_font();
        let mut rows: Vec<String> = Vec::new();
        Renderer::new(&font)
            .render_into("a\\n\\nb", &mut rows)
            .unwrap();
        assert_eq!(rows.len(), 17);
        assert_eq!(rows[7], glyph("a", 8));
        assert_eq!(rows[8], "");
        assert_eq!(rows[9], glyph("b", 1));
    }

    #[test_case("", 0)]
    #[test_case("\\n", 1)]
    #[test_case("\\n\\n", 2)]
    fn only_line_breaks(text: &str, blank_rows: usize) {
        let font = sample_font();
        let mut rows: Vec<String> = Vec::new();
        Renderer::new(&font).render_into(text, &mut rows).unwrap();
        assert_eq!(rows, vec![String::new(); blank_rows]);
    }

    #[test]
    fn unsupported_characters_are_skipped() {
        let font = sample_font();
        let renderer = Renderer::new(&font);
        assert_eq!(renderer.render("A\tB"), renderer.render("AB"));
        assert_eq!(renderer.render("é"), "");
        assert_eq!(renderer.render("é\\nA"), renderer.render("A"));
    }

    #[test]
    fn truncated_font() {
        let mut lines = sample_lines();
        lines.truncate(300);
        let font = FontTable::from_lines(lines);
        let rendered = Renderer::new(&font).render("Az");
        assert_eq!(rendered, "A1 \nA2 ");
    }

    #[test]
    fn highlighted_substring() {
        let font = sample_font();
        let rendered = Renderer::new(&font)
            .highlight(Highlight::Substring("ll"))
            .color(&Color::Named(NamedColor::Red))
            .render("hello");
        let first = rendered.lines().next().unwrap();
        assert_eq!(
            first,
            "h1 e1 \x1b[31ml1 \x1b[0m\x1b[31ml1 \x1b[0mo1 "
        );
    }

    #[test]
    fn color_only_adds_escapes() {
        let font = sample_font();
        let plain = Renderer::new(&font)
            .highlight(Highlight::Substring("hello"))
            .render("hello world");
        let colored = Renderer::new(&font)
            .highlight(Highlight::Substring("hello"))
            .color(&Color::Rgb(RgbColor {
                red: 255,
                green: 0,
                blue: 0,
            }))
            .render("hello world");
        assert_ne!(plain, colored);
        assert!(colored.contains("\x1b[38;2;255;0;0m"));
        assert_eq!(strip_escapes(&colored), plain);
        assert_eq!(plain, Renderer::new(&font).render("hello world"));
    }

    #[test]
    fn empty_glyph_row_is_not_colored() {
        let mut lines = sample_lines();
        let index = sample_font().glyph_index('h', 8).unwrap();
        lines[index] = String::new();
        let font = FontTable::from_lines(lines);
        let renderer = Renderer::new(&font).highlight(Highlight::Substring("h"));
        let plain = renderer.clone().render("h");
        let colored = renderer.color(&Color::Named(NamedColor::Red)).render("h");
        assert_eq!(plain.lines().count(), 7);
        assert_eq!(colored.lines().count(), 7);
        assert_eq!(strip_escapes(&colored), plain);

        let colored = Renderer::new(&font)
            .highlight(Highlight::All)
            .color(&Color::Named(NamedColor::Red))
            .render("hi");
        assert_eq!(colored.lines().last(), Some("\x1b[31mi8 \x1b[0m"));
    }

    #[test]
    fn highlight_all() {
        let font = sample_font();
        let rendered = Renderer::new(&font)
            .highlight(Highlight::All)
            .color(&Color::Named(NamedColor::Blue))
            .render("ab");
        assert_eq!(
            rendered.lines().next(),
            Some("\x1b[34ma1 \x1b[0m\x1b[34mb1 \x1b[0m")
        );
    }

    #[test]
    fn unknown_color_leaves_text_plain() {
        let font = sample_font();
        let rendered = Renderer::new(&font)
            .highlight(Highlight::All)
            .color(&Color::Unknown("chartreuse".to_owned()))
            .render("ab");
        assert_eq!(rendered, Renderer::new(&font).render("ab"));
    }

    #[test]
    fn empty_substring_highlights_nothing() {
        let font = sample_font();
        let rendered = Renderer::new(&font)
            .highlight(Highlight::Substring(""))
            .color(&Color::Named(NamedColor::Red))
            .render("abc");
        assert!(!rendered.contains('\x1b'));
    }

    #[test]
    fn compose_row_without_alignment() {
        let font = sample_font();
        let renderer = Renderer::new(&font).alignment(Alignment::Right).width(80);
        let row = renderer.compose_row("abc", 3, &HighlightRanges::default());
        assert_eq!(row, "a3 b3 c3 ");
    }

    #[test_case(Alignment::Center, 20, 5)]
    #[test_case(Alignment::Right, 20, 10)]
    #[test_case(Alignment::Left, 20, 0)]
    #[test_case(Alignment::Center, 10, 0)]
    #[test_case(Alignment::Right, 10, 0)]
    #[test_case(Alignment::Right, 4, 0)]
    #[test_case(Alignment::Center, 15, 2)]
    fn pad(alignment: Alignment, to_width: usize, spaces: usize) {
        let row = "0123456789".to_owned();
        let padded = alignment.pad(row.clone(), row.len(), to_width);
        assert_eq!(padded, format!("{}{row}", " ".repeat(spaces)));
    }

    #[test_case("left", Alignment::Left)]
    #[test_case("Center", Alignment::Center)]
    #[test_case("right", Alignment::Right)]
    #[test_case("justify", Alignment::Left)]
    #[test_case("", Alignment::Left)]
    fn alignment_from_name(name: &str, expected: Alignment) {
        assert_eq!(Alignment::from_name(name), expected);
    }

    #[test]
    fn alignment_ignores_escapes() {
        let font = sample_font();
        let rendered = Renderer::new(&font)
            .highlight(Highlight::All)
            .color(&Color::Named(NamedColor::Green))
            .alignment(Alignment::Right)
            .width(9)
            .render("A");
        assert_eq!(
            rendered.lines().next(),
            Some("      \x1b[32mA1 \x1b[0m")
        );
    }

    #[test]
    fn aligned_multi_line() {
        let font = sample_font();
        let rendered = Renderer::new(&font)
            .alignment(Alignment::Center)
            .width(12)
            .render("ab\\nc");
        let rows = rendered.lines().collect::<Vec<_>>();
        assert_eq!(rows[0], "   a1 b1 ");
        assert_eq!(rows[8], "    c1 ");
    }

    #[test]
    fn normalize() {
        assert_eq!(normalize_line_breaks("a\r\nb\nc"), r"a\nb\nc");
        assert_eq!(normalize_line_breaks("plain"), "plain");
    }

    #[test]
    fn request_returns_text() {
        let font = sample_font();
        let request = RenderRequest {
            text: "hi",
            highlight: Highlight::Substring("i"),
            font: &font,
            options: RenderOptions {
                color: Some("yellow".to_owned()),
                ..RenderOptions::default()
            },
        };
        let rendered = request.render().unwrap();
        assert_eq!(rendered.lines().count(), 8);
        assert!(rendered.starts_with("h1 \x1b[33mi1 \x1b[0m"));
    }

    #[test]
    fn request_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let font = sample_font();
        let request = RenderRequest {
            text: "A",
            highlight: Highlight::None,
            font: &font,
            options: RenderOptions {
                output: Some(OutputFile {
                    dir: dir.path().join("outputs"),
                    file: "banner.txt".into(),
                }),
                ..RenderOptions::default()
            },
        };
        assert_eq!(request.render().unwrap(), "");
        assert_eq!(request.render().unwrap(), "");
        let written = fs::read_to_string(dir.path().join("outputs/banner.txt")).unwrap();
        assert_eq!(written, format!("{}\n", Renderer::new(&font).render("A")));
    }

    #[test]
    fn sink_failure_stops_render() {
        let font = sample_font();
        let mut sink = FailingSink {
            rows: Vec::new(),
            attempts: 0,
            fail_at: 3,
        };
        let error = Renderer::new(&font).render_into("AB", &mut sink).unwrap_err();
        assert!(matches!(error, SinkError::Write { .. }));
        assert_eq!(sink.rows, [glyph("AB", 1), glyph("AB", 2)]);
        assert_eq!(sink.attempts, 3);
    }

    #[test]
    fn request_with_blocked_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("outputs");
        fs::write(&blocker, "").unwrap();
        let font = sample_font();
        let request = RenderRequest {
            text: "A",
            highlight: Highlight::None,
            font: &font,
            options: RenderOptions {
                output: Some(OutputFile {
                    dir: blocker,
                    file: "banner.txt".into(),
                }),
                ..RenderOptions::default()
            },
        };
        assert!(matches!(
            request.render(),
            Err(RenderError::Sink(SinkError::CreateDir { .. }))
        ));
    }

    #[test]
    fn request_rejects_bad_color() {
        let font = sample_font();
        let request = RenderRequest {
            text: "A",
            highlight: Highlight::All,
            font: &font,
            options: RenderOptions {
                color: Some("rgb(1,x,3)".to_owned()),
                ..RenderOptions::default()
            },
        };
        assert!(matches!(request.render(), Err(RenderError::Color(_))));
    }
}
