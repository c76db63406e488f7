//! Purpose: Punctuation system records and the registry that keys them.
//! Exports: `PunctuationSystem`, `PunctuationSystems`, `FieldDiff`.
//! Role: Named scripture-reference punctuation conventions, keyed by system.
//! Invariants: System names are unique; field names follow the dataset vocabulary.
//! Invariants: `FIELD_NAMES` is the full, fixed field set, in export order.

use crate::core::error::{Error, ErrorKind};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Every punctuation field, in the order the derived tables list them.
pub const FIELD_NAMES: [&str; 11] = [
    "booknameCase",
    "booknameLength",
    "punctuationAfterBookAbbreviation",
    "bookChapterSeparator",
    "spaceAllowedAfterBCS",
    "chapterBridgeCharacter",
    "chapterVerseSeparator",
    "verseSeparator",
    "verseBridgeCharacter",
    "chapterSeparator",
    "bookSeparator",
];

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PunctuationSystem {
    pub name: String,
    pub bookname_case: String,
    pub bookname_length: String,
    pub punctuation_after_book_abbreviation: String,
    pub book_chapter_separator: String,
    #[serde(rename = "spaceAllowedAfterBCS")]
    pub space_allowed_after_bcs: String,
    pub chapter_bridge_character: String,
    pub chapter_verse_separator: String,
    pub verse_separator: String,
    pub verse_bridge_character: String,
    pub chapter_separator: String,
    pub book_separator: String,
}

impl PunctuationSystem {
    /// Field values in `FIELD_NAMES` order.
    pub fn field_values(&self) -> [&str; 11] {
        [
            &self.bookname_case,
            &self.bookname_length,
            &self.punctuation_after_book_abbreviation,
            &self.book_chapter_separator,
            &self.space_allowed_after_bcs,
            &self.chapter_bridge_character,
            &self.chapter_verse_separator,
            &self.verse_separator,
            &self.verse_bridge_character,
            &self.chapter_separator,
            &self.book_separator,
        ]
    }
}

/// One differing field between a probe and a known system.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldDiff {
    pub field: &'static str,
    pub expected: String,
    pub found: String,
}

#[derive(Clone, Debug, Default)]
pub struct PunctuationSystems {
    systems: Vec<PunctuationSystem>,
    by_name: HashMap<String, usize>,
}

impl PunctuationSystems {
    pub fn from_systems(systems: Vec<PunctuationSystem>) -> Result<Self, Error> {
        let mut registry = Self {
            systems,
            ..Self::default()
        };
        for (idx, system) in registry.systems.iter().enumerate() {
            if registry.by_name.insert(system.name.clone(), idx).is_some() {
                return Err(Error::new(ErrorKind::Invalid)
                    .with_message(format!("duplicate punctuation system '{}'", system.name))
                    .with_table("punctuation"));
            }
        }
        Ok(registry)
    }

    pub fn len(&self) -> usize {
        self.systems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&PunctuationSystem> {
        self.by_name.get(name).map(|idx| &self.systems[*idx])
    }

    pub fn require(&self, name: &str) -> Result<&PunctuationSystem, Error> {
        self.get(name).ok_or_else(|| {
            Error::new(ErrorKind::NotFound)
                .with_message("unknown punctuation system")
                .with_table("punctuation")
                .with_code(name)
                .with_hint("Use `canonkit punct list` to see known systems.")
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &PunctuationSystem> {
        self.systems.iter()
    }

    /// Compare a probe's fields against every known system. An empty diff
    /// list means an exact match.
    pub fn identify(&self, probe: &PunctuationSystem) -> Vec<(String, Vec<FieldDiff>)> {
        let probe_values = probe.field_values();
        self.systems
            .iter()
            .map(|system| {
                let diffs = system
                    .field_values()
                    .iter()
                    .zip(probe_values.iter())
                    .zip(FIELD_NAMES.iter())
                    .filter(|((expected, found), _)| expected != found)
                    .map(|((expected, found), field)| FieldDiff {
                        field: *field,
                        expected: (*expected).to_string(),
                        found: (*found).to_string(),
                    })
                    .collect();
                (system.name.clone(), diffs)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{FIELD_NAMES, PunctuationSystem, PunctuationSystems};
    use crate::core::error::ErrorKind;

    pub(crate) fn english(name: &str) -> PunctuationSystem {
        PunctuationSystem {
            name: name.to_string(),
            bookname_case: "ME".to_string(),
            bookname_length: "ME".to_string(),
            punctuation_after_book_abbreviation: ".".to_string(),
            book_chapter_separator: " ".to_string(),
            space_allowed_after_bcs: "E".to_string(),
            chapter_bridge_character: "-".to_string(),
            chapter_verse_separator: ":".to_string(),
            verse_separator: ",".to_string(),
            verse_bridge_character: "-".to_string(),
            chapter_separator: ";".to_string(),
            book_separator: ";".to_string(),
        }
    }

    #[test]
    fn field_values_follow_declared_order() {
        let system = english("English");
        let values = system.field_values();
        assert_eq!(values.len(), FIELD_NAMES.len());
        assert_eq!(values[0], "ME");
        assert_eq!(values[6], ":");
        assert_eq!(values[10], ";");
    }

    #[test]
    fn identify_finds_exact_match_and_field_diffs() {
        let mut other = english("Other");
        other.chapter_verse_separator = ".".to_string();
        let registry =
            PunctuationSystems::from_systems(vec![english("English"), other]).unwrap();

        let matches = registry.identify(&english("probe"));
        assert_eq!(matches[0].0, "English");
        assert!(matches[0].1.is_empty());
        assert_eq!(matches[1].1.len(), 1);
        assert_eq!(matches[1].1[0].field, "chapterVerseSeparator");
        assert_eq!(matches[1].1[0].expected, ".");
        assert_eq!(matches[1].1[0].found, ":");
    }

    #[test]
    fn duplicate_system_name_is_rejected() {
        let err =
            PunctuationSystems::from_systems(vec![english("English"), english("English")])
                .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Invalid);
    }
}
