use std::fmt;

/// Favourite colour vocabulary. Requests carry the integer code, responses the
/// display name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(i32)]
pub enum Color {
    Blue = 1,
    Green = 2,
    Purple = 3,
    Red = 4,
    Yellow = 5,
    Turquoise = 6,
    White = 7,
}

impl Color {
    pub const ALL: [Color; 7] = [
        Color::Blue,
        Color::Green,
        Color::Purple,
        Color::Red,
        Color::Yellow,
        Color::Turquoise,
        Color::White,
    ];

    /// Exclusive upper bound of the valid codes.
    pub const LAST_INDEX: i64 = 8;

    pub fn from_code(code: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|color| i64::from(color.code()) == code)
    }

    pub fn is_valid_code(code: i64) -> bool {
        (1..Self::LAST_INDEX).contains(&code)
    }

    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Color::Blue => "blau",
            Color::Green => "grün",
            Color::Purple => "violett",
            Color::Red => "rot",
            Color::Yellow => "gelb",
            Color::Turquoise => "türkis",
            Color::White => "weiß",
        }
    }

    /// Display name for a stored code; unknown codes render as an empty string.
    pub fn name_of(code: i32) -> &'static str {
        Self::from_code(i64::from(code)).map_or("", Color::as_str)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
