//! Purpose: Bible book code records and the registry that indexes them.
//! Exports: `BookRecord`, `BookCodes`.
//! Role: The base table every other table family resolves codes against.
//! Invariants: Reference abbreviations and reference numbers are unique.
//! Invariants: Iteration order is the dataset's reference-number order.

use crate::core::code::BookCode;
use crate::core::error::{Error, ErrorKind};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookRecord {
    pub reference_abbreviation: BookCode,
    pub reference_number: u16,
    pub name_english: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub osis_abbreviation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sbl_abbreviation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paratext_abbreviation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paratext_number: Option<u16>,
}

/// Registry of book records with lookup in every direction the derived
/// tables pivot on: abbreviation, reference number, OSIS, and Paratext.
#[derive(Clone, Debug, Default)]
pub struct BookCodes {
    records: Vec<BookRecord>,
    by_abbreviation: HashMap<BookCode, usize>,
    by_number: HashMap<u16, usize>,
    by_osis: HashMap<String, usize>,
    by_paratext: HashMap<String, usize>,
}

impl BookCodes {
    pub fn from_records(records: Vec<BookRecord>) -> Result<Self, Error> {
        let mut registry = Self {
            records,
            ..Self::default()
        };
        for (idx, record) in registry.records.iter().enumerate() {
            let abbreviation = record.reference_abbreviation;
            if registry.by_abbreviation.insert(abbreviation, idx).is_some() {
                return Err(Error::new(ErrorKind::Invalid)
                    .with_message("duplicate reference abbreviation")
                    .with_table("books")
                    .with_code(abbreviation.as_str()));
            }
            if registry.by_number.insert(record.reference_number, idx).is_some() {
                return Err(Error::new(ErrorKind::Invalid)
                    .with_message(format!(
                        "duplicate reference number {}",
                        record.reference_number
                    ))
                    .with_table("books")
                    .with_code(abbreviation.as_str()));
            }
            if let Some(osis) = &record.osis_abbreviation {
                if registry.by_osis.insert(osis.clone(), idx).is_some() {
                    return Err(Error::new(ErrorKind::Invalid)
                        .with_message(format!("duplicate OSIS abbreviation '{osis}'"))
                        .with_table("books")
                        .with_code(abbreviation.as_str()));
                }
            }
            if let Some(paratext) = &record.paratext_abbreviation {
                if registry.by_paratext.insert(paratext.clone(), idx).is_some() {
                    return Err(Error::new(ErrorKind::Invalid)
                        .with_message(format!("duplicate Paratext abbreviation '{paratext}'"))
                        .with_table("books")
                        .with_code(abbreviation.as_str()));
                }
            }
        }
        Ok(registry)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains(&self, code: BookCode) -> bool {
        self.by_abbreviation.contains_key(&code)
    }

    pub fn get(&self, code: BookCode) -> Option<&BookRecord> {
        self.by_abbreviation
            .get(&code)
            .map(|idx| &self.records[*idx])
    }

    pub fn by_reference_number(&self, number: u16) -> Option<&BookRecord> {
        self.by_number.get(&number).map(|idx| &self.records[*idx])
    }

    pub fn by_osis(&self, osis: &str) -> Option<&BookRecord> {
        self.by_osis.get(osis).map(|idx| &self.records[*idx])
    }

    pub fn by_paratext(&self, paratext: &str) -> Option<&BookRecord> {
        self.by_paratext.get(paratext).map(|idx| &self.records[*idx])
    }

    /// Resolve a user-supplied abbreviation: reference first, then OSIS,
    /// then Paratext. Returns a usage-shaped error for malformed input.
    pub fn resolve(&self, text: &str) -> Result<&BookRecord, Error> {
        if let Ok(code) = BookCode::parse(text) {
            if let Some(record) = self.get(code) {
                return Ok(record);
            }
        }
        if let Some(record) = self.by_osis(text) {
            return Ok(record);
        }
        if let Some(record) = self.by_paratext(text) {
            return Ok(record);
        }
        Err(Error::new(ErrorKind::NotFound)
            .with_message("unknown book code")
            .with_table("books")
            .with_code(text)
            .with_hint("Use `canonkit book list` to see known reference abbreviations."))
    }

    pub fn iter(&self) -> impl Iterator<Item = &BookRecord> {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::{BookCodes, BookRecord};
    use crate::core::code::BookCode;
    use crate::core::error::ErrorKind;

    fn record(code: &str, number: u16, osis: &str) -> BookRecord {
        BookRecord {
            reference_abbreviation: BookCode::parse(code).unwrap(),
            reference_number: number,
            name_english: format!("Book {code}"),
            osis_abbreviation: Some(osis.to_string()),
            sbl_abbreviation: None,
            paratext_abbreviation: Some(code.to_string()),
            paratext_number: Some(number),
        }
    }

    #[test]
    fn lookups_cover_all_pivots() {
        let registry = BookCodes::from_records(vec![
            record("GEN", 1, "Gen"),
            record("EXO", 2, "Exod"),
        ])
        .unwrap();

        assert_eq!(registry.len(), 2);
        let genesis = registry.get(BookCode::parse("GEN").unwrap()).unwrap();
        assert_eq!(genesis.reference_number, 1);
        assert_eq!(
            registry.by_reference_number(2).unwrap().name_english,
            "Book EXO"
        );
        assert_eq!(
            registry.by_osis("Exod").unwrap().reference_abbreviation.as_str(),
            "EXO"
        );
        assert_eq!(
            registry.by_paratext("GEN").unwrap().reference_number,
            1
        );
    }

    #[test]
    fn resolve_falls_back_through_schemes() {
        let registry = BookCodes::from_records(vec![record("GEN", 1, "Gen")]).unwrap();
        assert_eq!(registry.resolve("GEN").unwrap().reference_number, 1);
        assert_eq!(registry.resolve("Gen").unwrap().reference_number, 1);
        let err = registry.resolve("Nope").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn duplicate_abbreviation_is_rejected() {
        let err =
            BookCodes::from_records(vec![record("GEN", 1, "Gen"), record("GEN", 2, "Gen2")])
                .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Invalid);
    }

    #[test]
    fn duplicate_number_is_rejected() {
        let err =
            BookCodes::from_records(vec![record("GEN", 1, "Gen"), record("EXO", 1, "Exod")])
                .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Invalid);
    }
}
