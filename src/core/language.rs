//! Purpose: ISO 639-3 language identity records and their registry.
//! Exports: `LanguageRecord`, `LanguageType`, `LanguageScope`, `Languages`.
//! Role: Serves the ID-keyed and Name-keyed directions of the language tables.
//! Invariants: IDs and names are unique across the table.
//! Invariants: Type and Scope round-trip as their single-letter ISO codes.

use crate::core::code::LangId;
use crate::core::error::{Error, ErrorKind};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LanguageType {
    #[serde(rename = "L")]
    Living,
    #[serde(rename = "E")]
    Extinct,
    #[serde(rename = "A")]
    Ancient,
    #[serde(rename = "H")]
    Historical,
    #[serde(rename = "C")]
    Constructed,
    #[serde(rename = "S")]
    Special,
}

impl LanguageType {
    pub fn letter(self) -> char {
        match self {
            LanguageType::Living => 'L',
            LanguageType::Extinct => 'E',
            LanguageType::Ancient => 'A',
            LanguageType::Historical => 'H',
            LanguageType::Constructed => 'C',
            LanguageType::Special => 'S',
        }
    }

    pub fn describe(self) -> &'static str {
        match self {
            LanguageType::Living => "living",
            LanguageType::Extinct => "extinct",
            LanguageType::Ancient => "ancient",
            LanguageType::Historical => "historical",
            LanguageType::Constructed => "constructed",
            LanguageType::Special => "special",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LanguageScope {
    #[serde(rename = "I")]
    Individual,
    #[serde(rename = "M")]
    Macrolanguage,
    #[serde(rename = "S")]
    Special,
}

impl LanguageScope {
    pub fn letter(self) -> char {
        match self {
            LanguageScope::Individual => 'I',
            LanguageScope::Macrolanguage => 'M',
            LanguageScope::Special => 'S',
        }
    }

    pub fn describe(self) -> &'static str {
        match self {
            LanguageScope::Individual => "individual",
            LanguageScope::Macrolanguage => "macrolanguage",
            LanguageScope::Special => "special",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageRecord {
    pub id: LangId,
    pub name: String,
    #[serde(rename = "type")]
    pub lang_type: LanguageType,
    pub scope: LanguageScope,
    #[serde(
        rename = "part1Code",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub part1_code: Option<String>,
    #[serde(
        rename = "part2Code",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub part2_code: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct Languages {
    records: Vec<LanguageRecord>,
    by_id: HashMap<LangId, usize>,
    by_name: HashMap<String, usize>,
}

impl Languages {
    pub fn from_records(records: Vec<LanguageRecord>) -> Result<Self, Error> {
        let mut registry = Self {
            records,
            ..Self::default()
        };
        for (idx, record) in registry.records.iter().enumerate() {
            if registry.by_id.insert(record.id, idx).is_some() {
                return Err(Error::new(ErrorKind::Invalid)
                    .with_message("duplicate language id")
                    .with_table("languages")
                    .with_code(record.id.as_str()));
            }
            if registry.by_name.insert(record.name.clone(), idx).is_some() {
                return Err(Error::new(ErrorKind::Invalid)
                    .with_message(format!("duplicate language name '{}'", record.name))
                    .with_table("languages")
                    .with_code(record.id.as_str()));
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

    pub fn get(&self, id: LangId) -> Option<&LanguageRecord> {
        self.by_id.get(&id).map(|idx| &self.records[*idx])
    }

    pub fn by_name(&self, name: &str) -> Option<&LanguageRecord> {
        self.by_name.get(name).map(|idx| &self.records[*idx])
    }

    /// Resolve a user-supplied identifier: ISO id first, then exact name.
    pub fn require(&self, text: &str) -> Result<&LanguageRecord, Error> {
        if let Ok(id) = LangId::parse(text) {
            if let Some(record) = self.get(id) {
                return Ok(record);
            }
        }
        if let Some(record) = self.by_name(text) {
            return Ok(record);
        }
        Err(Error::new(ErrorKind::NotFound)
            .with_message("unknown language id")
            .with_table("languages")
            .with_code(text)
            .with_hint("Use `canonkit lang list` or `canonkit lang find <NAME>`."))
    }

    /// Case-insensitive substring search over language names.
    pub fn find(&self, needle: &str) -> Vec<&LanguageRecord> {
        let needle = needle.to_lowercase();
        self.records
            .iter()
            .filter(|record| record.name.to_lowercase().contains(&needle))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LanguageRecord> {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::{LanguageRecord, LanguageScope, LanguageType, Languages};
    use crate::core::code::LangId;
    use crate::core::error::ErrorKind;

    fn record(id: &str, name: &str, part1: Option<&str>) -> LanguageRecord {
        LanguageRecord {
            id: LangId::parse(id).unwrap(),
            name: name.to_string(),
            lang_type: LanguageType::Living,
            scope: LanguageScope::Individual,
            part1_code: part1.map(str::to_string),
            part2_code: Some(id.to_string()),
        }
    }

    #[test]
    fn lookup_by_id_and_name() {
        let registry = Languages::from_records(vec![
            record("eng", "English", Some("en")),
            record("deu", "German", Some("de")),
        ])
        .unwrap();

        assert_eq!(
            registry.get(LangId::parse("eng").unwrap()).unwrap().name,
            "English"
        );
        assert_eq!(
            registry.by_name("German").unwrap().id.as_str(),
            "deu"
        );
        assert!(registry.by_name("french").is_none());
    }

    #[test]
    fn find_is_case_insensitive_substring() {
        let registry = Languages::from_records(vec![
            record("eng", "English", Some("en")),
            record("enm", "Middle English (1100-1500)", None),
            record("deu", "German", Some("de")),
        ])
        .unwrap();

        let hits = registry.find("english");
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn type_and_scope_letters_round_trip() {
        assert_eq!(LanguageType::Living.letter(), 'L');
        assert_eq!(LanguageType::Ancient.letter(), 'A');
        assert_eq!(LanguageScope::Macrolanguage.letter(), 'M');
        let parsed: LanguageType = serde_json::from_str("\"C\"").unwrap();
        assert_eq!(parsed, LanguageType::Constructed);
        assert_eq!(serde_json::to_string(&LanguageScope::Special).unwrap(), "\"S\"");
    }

    #[test]
    fn duplicate_id_is_rejected() {
        let err = Languages::from_records(vec![
            record("eng", "English", None),
            record("eng", "English 2", None),
        ])
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Invalid);
    }
}
