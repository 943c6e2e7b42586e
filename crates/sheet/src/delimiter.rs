use crate::error::{Result, SheetError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A field separator accepted by the parser and the formatter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Delimiter {
    Tab,
    Space,
    #[default]
    Comma,
    Semicolon,
    Pipe,
    Tilde,
    Colon,
}

impl Delimiter {
    /// All valid delimiters, in a fixed order
    pub const ALL: [Delimiter; 7] = [
        Delimiter::Tab,
        Delimiter::Space,
        Delimiter::Comma,
        Delimiter::Semicolon,
        Delimiter::Pipe,
        Delimiter::Tilde,
        Delimiter::Colon,
    ];

    /// The separator character
    #[must_use]
    pub fn as_char(self) -> char {
        match self {
            Delimiter::Tab => '\t',
            Delimiter::Space => ' ',
            Delimiter::Comma => ',',
            Delimiter::Semicolon => ';',
            Delimiter::Pipe => '|',
            Delimiter::Tilde => '~',
            Delimiter::Colon => ':',
        }
    }

    /// Look up the delimiter for a character, rejecting anything off the whitelist
    pub fn from_char(c: char) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|d| d.as_char() == c)
            .ok_or(SheetError::InvalidDelimiter(c))
    }

    /// Lowercase name, as accepted by `FromStr`
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Delimiter::Tab => "tab",
            Delimiter::Space => "space",
            Delimiter::Comma => "comma",
            Delimiter::Semicolon => "semicolon",
            Delimiter::Pipe => "pipe",
            Delimiter::Tilde => "tilde",
            Delimiter::Colon => "colon",
        }
    }
}

impl TryFrom<char> for Delimiter {
    type Error = SheetError;

    fn try_from(c: char) -> Result<Self> {
        Delimiter::from_char(c)
    }
}

impl From<Delimiter> for char {
    fn from(d: Delimiter) -> Self {
        d.as_char()
    }
}

impl fmt::Display for Delimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Delimiter {
    type Err = SheetError;

    /// Accepts either the literal character or its name (`"tab"`, `"pipe"`, ...).
    /// `"\t"` is accepted as an escaped tab for shells that make a raw tab awkward.
    fn from_str(s: &str) -> Result<Self> {
        if s == "\\t" {
            return Ok(Delimiter::Tab);
        }

        let mut chars = s.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return Delimiter::from_char(c);
        }

        Self::ALL
            .into_iter()
            .find(|d| d.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| SheetError::InvalidDelimiter(s.chars().next().unwrap_or('\0')))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whitelist() {
        for c in ['\t', ' ', ',', ';', '|', '~', ':'] {
            assert_eq!(Delimiter::from_char(c).unwrap().as_char(), c);
        }
    }

    #[test]
    fn test_rejects_other_characters() {
        for c in ['\n', '\r', '\0', '"', 'a', '.', '\u{1}'] {
            assert!(matches!(
                Delimiter::from_char(c),
                Err(SheetError::InvalidDelimiter(x)) if x == c
            ));
        }
    }

    #[test]
    fn test_from_str() {
        assert_eq!("tab".parse::<Delimiter>().unwrap(), Delimiter::Tab);
        assert_eq!("\\t".parse::<Delimiter>().unwrap(), Delimiter::Tab);
        assert_eq!("PIPE".parse::<Delimiter>().unwrap(), Delimiter::Pipe);
        assert_eq!(";".parse::<Delimiter>().unwrap(), Delimiter::Semicolon);
        assert!("#".parse::<Delimiter>().is_err());
        assert!("hash".parse::<Delimiter>().is_err());
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&Delimiter::Semicolon).unwrap();
        assert_eq!(json, "\"semicolon\"");
        let back: Delimiter = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Delimiter::Semicolon);
    }
}
