//! Colors and their terminal escape sequences
//!
//! A [`Color`] is parsed once from a user supplied expression: a palette name (`red`, `cyan`, ...),
//! an `rgb(r, g, b)` literal or an `hsl(h, s%, l%)` literal. HSL is converted to RGB while parsing.
//! The resulting escape is an [`SgrCode`].
//!
//! More info:
//! - <https://en.wikipedia.org/wiki/ANSI_escape_code#SGR_(Select_Graphic_Rendition)_parameters>
//! - <https://en.wikipedia.org/wiki/ANSI_escape_code#24-bit>
//! - <https://en.wikipedia.org/wiki/HSL_and_HSV#HSL_to_RGB>

use std::fmt::{self, Display};
use std::str::FromStr;

use itertools::Itertools as _;
use strum_macros::{AsRefStr, EnumIter, EnumString};
use thiserror::Error;

pub(crate) const CSI: &str = "\x1b[";
pub(crate) const SGR: &str = "m";

/// The escape switching all attributes off, the rendered form of [`SgrCode::Reset`].
pub const RESET: &str = "\x1b[0m";

/// A "select graphic rendition" escape sequence
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SgrCode {
    /// Reset all attributes
    Reset,
    /// One of the 16 basic foreground colors, given as its SGR parameter (30-37, 90-97)
    Foreground(u8),
    /// A 24-bit foreground color
    ForegroundRgb(u8, u8, u8),
}

impl Display for SgrCode {
    #[rustfmt::skip]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Reset                  => write!(f, "{CSI}0{SGR}"),
            Self::Foreground(code)       => write!(f, "{CSI}{code}{SGR}"),
            Self::ForegroundRgb(r, g, b) => write!(f, "{CSI}38;2;{r};{g};{b}{SGR}"),
        }
    }
}

/// The fixed color palette, addressed by lowercase name
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumString, EnumIter, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum NamedColor {
    /// Not a color: switches all attributes off.
    Reset,
    /// SGR 31
    Red,
    /// SGR 32
    Green,
    /// SGR 33
    Yellow,
    /// SGR 34
    Blue,
    /// SGR 35
    Magenta,
    /// SGR 36
    Cyan,
    /// Standard white (SGR 37), which most terminals show as light gray.
    Gray,
    /// Bright white (SGR 97).
    White,
}

impl NamedColor {
    /// The escape selecting this color.
    #[must_use]
    pub const fn sgr(self) -> SgrCode {
        match self {
            Self::Reset => SgrCode::Reset,
            Self::Red => SgrCode::Foreground(31),
            Self::Green => SgrCode::Foreground(32),
            Self::Yellow => SgrCode::Foreground(33),
            Self::Blue => SgrCode::Foreground(34),
            Self::Magenta => SgrCode::Foreground(35),
            Self::Cyan => SgrCode::Foreground(36),
            Self::Gray => SgrCode::Foreground(37),
            Self::White => SgrCode::Foreground(97),
        }
    }
}

/// A color with 8-bit channels
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RgbColor {
    /// Red channel
    pub red: u8,
    /// Green channel
    pub green: u8,
    /// Blue channel
    pub blue: u8,
}

impl RgbColor {
    /// The truecolor foreground escape for this color.
    #[must_use]
    pub const fn sgr(self) -> SgrCode {
        SgrCode::ForegroundRgb(self.red, self.green, self.blue)
    }
}

/// A color in the HSL space
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hsl {
    /// Hue in degrees. Any finite value is accepted and taken modulo 360.
    pub hue: f64,
    /// Saturation, from 0 to 1
    pub saturation: f64,
    /// Lightness, from 0 to 1
    pub lightness: f64,
}

impl Hsl {
    /// Converts to RGB. Channels are scaled to 0-255 and truncated.
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "clamped to 0..=255 before the cast"
    )]
    pub fn to_rgb(self) -> RgbColor {
        let hue = self.hue.rem_euclid(360.0);
        let saturation = self.saturation.clamp(0.0, 1.0);
        let lightness = self.lightness.clamp(0.0, 1.0);

        let chroma = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
        let x = chroma * (1.0 - ((hue / 60.0) % 2.0 - 1.0).abs());
        let m = lightness - chroma / 2.0;
        let (red, green, blue) = match hue {
            hue if hue < 60.0 => (chroma, x, 0.0),
            hue if hue < 120.0 => (x, chroma, 0.0),
            hue if hue < 180.0 => (0.0, chroma, x),
            hue if hue < 240.0 => (0.0, x, chroma),
            hue if hue < 300.0 => (x, 0.0, chroma),
            _ => (chroma, 0.0, x),
        };
        let scale = |channel: f64| ((channel + m) * 255.0).clamp(0.0, 255.0) as u8;
        RgbColor {
            red: scale(red),
            green: scale(green),
            blue: scale(blue),
        }
    }
}

/// A parsed color expression
///
/// ```
/// # use bannerize::color::{Color, NamedColor, RgbColor};
/// assert_eq!("Cyan".parse(), Ok(Color::Named(NamedColor::Cyan)));
/// assert_eq!(
///     "hsl(120, 100%, 50%)".parse(),
///     Ok(Color::Rgb(RgbColor { red: 0, green: 255, blue: 0 }))
/// );
/// assert_eq!("chartreuse".parse::<Color>().unwrap().sgr(), None);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Color {
    /// A palette color
    Named(NamedColor),
    /// A truecolor value, from an `rgb()` or `hsl()` literal
    Rgb(RgbColor),
    /// A name outside the palette. Text is left uncolored.
    Unknown(String),
}

impl Color {
    /// The escape selecting this color, `None` for [`Color::Unknown`].
    #[must_use]
    pub fn sgr(&self) -> Option<SgrCode> {
        match self {
            Self::Named(named) => Some(named.sgr()),
            Self::Rgb(rgb) => Some(rgb.sgr()),
            Self::Unknown(_) => None,
        }
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(expr: &str) -> Result<Self, Self::Err> {
        let expr = expr.trim().to_lowercase();
        if let Some([red, green, blue]) = Functional::Rgb.components(&expr)? {
            let rgb = RgbColor {
                red: Functional::Rgb.channel(&expr, red)?,
                green: Functional::Rgb.channel(&expr, green)?,
                blue: Functional::Rgb.channel(&expr, blue)?,
            };
            return Ok(Self::Rgb(rgb));
        }
        if let Some([hue, saturation, lightness]) = Functional::Hsl.components(&expr)? {
            let hsl = Hsl {
                hue: Functional::Hsl.number(&expr, hue)?,
                saturation: Functional::Hsl.percentage(&expr, saturation)?,
                lightness: Functional::Hsl.percentage(&expr, lightness)?,
            };
            return Ok(Self::Rgb(hsl.to_rgb()));
        }
        Ok(expr
            .parse()
            .map_or_else(|_| Self::Unknown(expr), Self::Named))
    }
}

/// Parses `expr` and returns its escape sequence, `None` if the color is not known.
///
/// ```
/// # use bannerize::color::resolve_color;
/// assert_eq!(
///     resolve_color("rgb(255,0,0)").unwrap().unwrap().to_string(),
///     "\x1b[38;2;255;0;0m"
/// );
/// ```
///
/// # Errors
/// Returns `Err` if an `rgb()` or `hsl()` literal is malformed; see [`ColorParseError`].
pub fn resolve_color(expr: &str) -> Result<Option<SgrCode>, ColorParseError> {
    Ok(expr.parse::<Color>()?.sgr())
}

#[derive(Clone, Copy, Debug)]
enum Functional {
    Rgb,
    Hsl,
}

impl Functional {
    const fn prefix(self) -> &'static str {
        match self {
            Self::Rgb => "rgb(",
            Self::Hsl => "hsl(",
        }
    }

    fn components(self, expr: &str) -> Result<Option<[&str; 3]>, ColorParseError> {
        let Some(inner) = expr.strip_prefix(self.prefix()) else {
            return Ok(None);
        };
        let Some(inner) = inner.strip_suffix(')') else {
            return Err(ColorParseError::Unterminated(expr.to_owned()));
        };
        let mut parts = inner.split(',').map(str::trim);
        match (parts.next_array(), parts.next()) {
            (Some(parts), None) => Ok(Some(parts)),
            _ => Err(ColorParseError::Arity {
                expr: expr.to_owned(),
                found: inner.split(',').count(),
            }),
        }
    }

    fn channel(self, expr: &str, component: &str) -> Result<u8, ColorParseError> {
        let value: i64 = component
            .parse()
            .map_err(|_| self.component_error(expr, component))?;
        u8::try_from(value).map_err(|_| ColorParseError::OutOfRange {
            expr: expr.to_owned(),
            component: component.to_owned(),
        })
    }

    fn number(self, expr: &str, component: &str) -> Result<f64, ColorParseError> {
        component
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
            .ok_or_else(|| self.component_error(expr, component))
    }

    fn percentage(self, expr: &str, component: &str) -> Result<f64, ColorParseError> {
        let value = self.number(expr, component.strip_suffix('%').unwrap_or(component))?;
        if (0.0..=100.0).contains(&value) {
            Ok(value / 100.0)
        } else {
            Err(ColorParseError::OutOfRange {
                expr: expr.to_owned(),
                component: component.to_owned(),
            })
        }
    }

    fn component_error(self, expr: &str, component: &str) -> ColorParseError {
        ColorParseError::Component {
            expr: expr.to_owned(),
            component: component.to_owned(),
        }
    }
}

/// An error in parsing a color expression
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ColorParseError {
    /// An `rgb(` or `hsl(` literal without the closing parenthesis
    #[error(r#""{0}" is missing a closing parenthesis"#)]
    Unterminated(String),
    /// A literal that does not have exactly three components
    #[error(r#""{expr}" has {found} components, expected 3"#)]
    Arity {
        /// The whole expression
        expr: String,
        /// The number of comma separated components
        found: usize,
    },
    /// A component that is not a number
    #[error(r#""{component}" in "{expr}" is not a number"#)]
    Component {
        /// The whole expression
        expr: String,
        /// The offending component
        component: String,
    },
    /// A number outside the allowed range: 0-255 for `rgb()`, 0-100 for HSL percentages
    #[error(r#""{component}" in "{expr}" is out of range"#)]
    OutOfRange {
        /// The whole expression
        expr: String,
        /// The offending component
        component: String,
    },
}
