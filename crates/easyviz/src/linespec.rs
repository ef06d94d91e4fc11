//! MATLAB-style line specifications such as `"r--o"`.

use std::fmt;

use crate::error::{Error, Result};

/// Line colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    /// `y`
    Yellow,
    /// `m`
    Magenta,
    /// `c`
    Cyan,
    /// `r`
    Red,
    /// `g`
    Green,
    /// `b`
    Blue,
    /// `w`
    White,
    /// `k`
    Black,
}

impl Color {
    /// Parse a single-letter colour code.
    fn from_code(c: char) -> Option<Self> {
        Some(match c {
            'y' => Self::Yellow,
            'm' => Self::Magenta,
            'c' => Self::Cyan,
            'r' => Self::Red,
            'g' => Self::Green,
            'b' => Self::Blue,
            'w' => Self::White,
            'k' => Self::Black,
            _ => return None,
        })
    }

    /// Single-letter code.
    pub fn code(self) -> char {
        match self {
            Self::Yellow => 'y',
            Self::Magenta => 'm',
            Self::Cyan => 'c',
            Self::Red => 'r',
            Self::Green => 'g',
            Self::Blue => 'b',
            Self::White => 'w',
            Self::Black => 'k',
        }
    }

    /// Lowercase English name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Yellow => "yellow",
            Self::Magenta => "magenta",
            Self::Cyan => "cyan",
            Self::Red => "red",
            Self::Green => "green",
            Self::Blue => "blue",
            Self::White => "white",
            Self::Black => "black",
        }
    }

    /// `(r, g, b)` in `0.0..=1.0`.
    pub fn rgb(self) -> (f64, f64, f64) {
        match self {
            Self::Yellow => (1.0, 1.0, 0.0),
            Self::Magenta => (1.0, 0.0, 1.0),
            Self::Cyan => (0.0, 1.0, 1.0),
            Self::Red => (1.0, 0.0, 0.0),
            Self::Green => (0.0, 1.0, 0.0),
            Self::Blue => (0.0, 0.0, 1.0),
            Self::White => (1.0, 1.0, 1.0),
            Self::Black => (0.0, 0.0, 0.0),
        }
    }
}

/// Point marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    /// `.`
    Dot,
    /// `o`
    Circle,
    /// `x`
    Cross,
    /// `+`
    Plus,
    /// `*`
    Asterisk,
    /// `s`
    Square,
    /// `d`
    Diamond,
    /// `^`
    TriangleUp,
    /// `v`
    TriangleDown,
    /// `<`
    TriangleLeft,
    /// `>`
    TriangleRight,
    /// `p`
    Pentagram,
    /// `h`
    Hexagram,
}

impl Marker {
    /// Parse a single-character marker code.
    fn from_code(c: char) -> Option<Self> {
        Some(match c {
            '.' => Self::Dot,
            'o' => Self::Circle,
            'x' => Self::Cross,
            '+' => Self::Plus,
            '*' => Self::Asterisk,
            's' => Self::Square,
            'd' => Self::Diamond,
            '^' => Self::TriangleUp,
            'v' => Self::TriangleDown,
            '<' => Self::TriangleLeft,
            '>' => Self::TriangleRight,
            'p' => Self::Pentagram,
            'h' => Self::Hexagram,
            _ => return None,
        })
    }

    /// Single-character code.
    pub fn code(self) -> char {
        match self {
            Self::Dot => '.',
            Self::Circle => 'o',
            Self::Cross => 'x',
            Self::Plus => '+',
            Self::Asterisk => '*',
            Self::Square => 's',
            Self::Diamond => 'd',
            Self::TriangleUp => '^',
            Self::TriangleDown => 'v',
            Self::TriangleLeft => '<',
            Self::TriangleRight => '>',
            Self::Pentagram => 'p',
            Self::Hexagram => 'h',
        }
    }
}

/// Line style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    /// `-`
    Solid,
    /// `--`
    Dashed,
    /// `:`
    Dotted,
    /// `-.`
    DashDot,
}

impl LineStyle {
    /// MATLAB code for this style.
    pub fn code(self) -> &'static str {
        match self {
            Self::Solid => "-",
            Self::Dashed => "--",
            Self::Dotted => ":",
            Self::DashDot => "-.",
        }
    }
}

/// A parsed line specification. Every component is optional.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineSpec {
    /// Colour, if given.
    pub color: Option<Color>,
    /// Marker, if given.
    pub marker: Option<Marker>,
    /// Line style, if given.
    pub style: Option<LineStyle>,
}

impl LineSpec {
    /// Parse a spec like `"r--o"`, `"b:"`, `"kx"`. Components may appear in
    /// any order, each at most once.
    pub fn parse(spec: &str) -> Result<Self> {
        let mut out = Self::default();
        let chars: Vec<char> = spec.trim().chars().collect();
        let mut i = 0;
        while i < chars.len() {
            let c = chars[i];
            let next = chars.get(i + 1).copied();
            let (consumed, ok) = match (c, next) {
                ('-', Some('-')) => (2, set(&mut out.style, LineStyle::Dashed)),
                ('-', Some('.')) => (2, set(&mut out.style, LineStyle::DashDot)),
                ('-', _) => (1, set(&mut out.style, LineStyle::Solid)),
                (':', _) => (1, set(&mut out.style, LineStyle::Dotted)),
                _ => {
                    if let Some(color) = Color::from_code(c) {
                        (1, set(&mut out.color, color))
                    } else if let Some(marker) = Marker::from_code(c) {
                        (1, set(&mut out.marker, marker))
                    } else {
                        return Err(Error::args(
                            "linespec",
                            format!("unrecognised character '{c}' in '{spec}'"),
                        ));
                    }
                }
            };
            if !ok {
                return Err(Error::args(
                    "linespec",
                    format!("'{spec}' sets the same property twice"),
                ));
            }
            i += consumed;
        }
        Ok(out)
    }

    /// True when nothing was specified.
    pub fn is_empty(&self) -> bool {
        self.color.is_none() && self.marker.is_none() && self.style.is_none()
    }

    /// Whether a line should be drawn: explicit style, or no marker.
    pub fn draws_line(&self) -> bool {
        self.style.is_some() || self.marker.is_none()
    }
}

/// Fill an empty slot, reporting whether it was empty.
fn set<T>(slot: &mut Option<T>, value: T) -> bool {
    if slot.is_some() {
        return false;
    }
    *slot = Some(value);
    true
}

impl fmt::Display for LineSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(c) = self.color {
            write!(f, "{}", c.code())?;
        }
        if let Some(s) = self.style {
            write!(f, "{}", s.code())?;
        }
        if let Some(m) = self.marker {
            write!(f, "{}", m.code())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_components_in_any_order() {
        let spec = LineSpec::parse("o--r").unwrap();
        assert_eq!(spec.color, Some(Color::Red));
        assert_eq!(spec.marker, Some(Marker::Circle));
        assert_eq!(spec.style, Some(LineStyle::Dashed));
        assert_eq!(spec.to_string(), "r--o");
    }

    #[test]
    fn dash_dot_and_dotted() {
        assert_eq!(
            LineSpec::parse("-.").unwrap().style,
            Some(LineStyle::DashDot)
        );
        assert_eq!(LineSpec::parse("b:").unwrap().style, Some(LineStyle::Dotted));
    }

    #[test]
    fn marker_only_draws_no_line() {
        let spec = LineSpec::parse("kx").unwrap();
        assert!(!spec.draws_line());
        assert!(LineSpec::parse("").unwrap().draws_line());
        assert!(LineSpec::parse("").unwrap().is_empty());
    }

    #[test]
    fn rejects_garbage_and_duplicates() {
        assert!(LineSpec::parse("q").is_err());
        assert!(LineSpec::parse("rb").is_err());
        assert!(LineSpec::parse("--:").is_err());
    }
}
