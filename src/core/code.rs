//! Purpose: Fixed-width identifier newtypes shared by every table family.
//! Exports: `BookCode` (3 ASCII uppercase) and `LangId` (3 ASCII lowercase).
//! Role: Preserve the 3-character width contract of the derived C tables.
//! Invariants: A constructed value is always exactly 3 bytes of valid ASCII.
//! Invariants: Codes order and compare byte-wise, matching sorted C arrays.

use crate::core::error::{Error, ErrorKind};
use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Width of a reference abbreviation or ISO 639-3 identifier, in bytes.
/// The C rendering is `[CODE_LEN + 1]` to leave room for the NUL terminator.
pub const CODE_LEN: usize = 3;

/// A Bible book reference abbreviation: exactly 3 ASCII uppercase
/// alphanumeric bytes, e.g. `GEN`, `CO1`, `JN3`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BookCode([u8; CODE_LEN]);

/// An ISO 639-3 language identifier: exactly 3 ASCII lowercase letters.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LangId([u8; CODE_LEN]);

impl BookCode {
    pub fn parse(text: &str) -> Result<Self, Error> {
        let bytes = text.as_bytes();
        if bytes.len() != CODE_LEN {
            return Err(Error::new(ErrorKind::Invalid)
                .with_message(format!("book code must be exactly {CODE_LEN} characters"))
                .with_code(text));
        }
        let mut code = [0u8; CODE_LEN];
        for (slot, byte) in code.iter_mut().zip(bytes) {
            if !(byte.is_ascii_uppercase() || byte.is_ascii_digit()) {
                return Err(Error::new(ErrorKind::Invalid)
                    .with_message("book code must be ASCII uppercase letters or digits")
                    .with_code(text));
            }
            *slot = *byte;
        }
        Ok(Self(code))
    }

    pub fn as_str(&self) -> &str {
        // Construction guarantees ASCII.
        std::str::from_utf8(&self.0).unwrap_or("???")
    }
}

impl LangId {
    pub fn parse(text: &str) -> Result<Self, Error> {
        let bytes = text.as_bytes();
        if bytes.len() != CODE_LEN {
            return Err(Error::new(ErrorKind::Invalid)
                .with_message(format!("language id must be exactly {CODE_LEN} characters"))
                .with_code(text));
        }
        let mut code = [0u8; CODE_LEN];
        for (slot, byte) in code.iter_mut().zip(bytes) {
            if !byte.is_ascii_lowercase() {
                return Err(Error::new(ErrorKind::Invalid)
                    .with_message("language id must be ASCII lowercase letters")
                    .with_code(text));
            }
            *slot = *byte;
        }
        Ok(Self(code))
    }

    pub fn as_str(&self) -> &str {
        std::str::from_utf8(&self.0).unwrap_or("???")
    }
}

impl fmt::Display for BookCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for BookCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BookCode({})", self.as_str())
    }
}

impl fmt::Display for LangId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for LangId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LangId({})", self.as_str())
    }
}

impl FromStr for BookCode {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Self::parse(text)
    }
}

impl FromStr for LangId {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Self::parse(text)
    }
}

impl Serialize for BookCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for BookCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::parse(&text).map_err(|err| de::Error::custom(err.to_string()))
    }
}

impl Serialize for LangId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for LangId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::parse(&text).map_err(|err| de::Error::custom(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::{BookCode, LangId};

    #[test]
    fn book_code_accepts_uppercase_and_digits() {
        assert_eq!(BookCode::parse("GEN").unwrap().as_str(), "GEN");
        assert_eq!(BookCode::parse("CO1").unwrap().as_str(), "CO1");
        assert_eq!(BookCode::parse("JN3").unwrap().as_str(), "JN3");
    }

    #[test]
    fn book_code_rejects_bad_shapes() {
        assert!(BookCode::parse("GE").is_err());
        assert!(BookCode::parse("GENE").is_err());
        assert!(BookCode::parse("gen").is_err());
        assert!(BookCode::parse("G-N").is_err());
        assert!(BookCode::parse("").is_err());
    }

    #[test]
    fn lang_id_accepts_lowercase_only() {
        assert_eq!(LangId::parse("eng").unwrap().as_str(), "eng");
        assert!(LangId::parse("ENG").is_err());
        assert!(LangId::parse("en").is_err());
        assert!(LangId::parse("en1").is_err());
    }

    #[test]
    fn codes_order_bytewise() {
        let mut codes = vec![
            BookCode::parse("REV").unwrap(),
            BookCode::parse("GEN").unwrap(),
            BookCode::parse("CO1").unwrap(),
        ];
        codes.sort();
        let order: Vec<&str> = codes.iter().map(|code| code.as_str()).collect();
        assert_eq!(order, ["CO1", "GEN", "REV"]);
    }
}
