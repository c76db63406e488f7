//! Purpose: Parse the JSON dataset documents that feed every registry.
//! Exports: dataset document types, `Table`, and the embedded dataset text.
//! Role: Single decode path shared by embedded data and `--data-dir` overlays.
//! Invariants: Embedded datasets always parse; a failure there is a packaging bug.
//! Invariants: Overlay files replace a table family wholesale, never merge.

use crate::core::books::BookRecord;
use crate::core::error::{Error, ErrorKind};
use crate::core::language::LanguageRecord;
use crate::core::order::BookOrderSystem;
use crate::core::punctuation::PunctuationSystem;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

pub const EMBEDDED_BOOK_CODES: &str = include_str!("../../data/book_codes.json");
pub const EMBEDDED_BOOK_ORDERS: &str = include_str!("../../data/book_orders.json");
pub const EMBEDDED_PUNCTUATION: &str = include_str!("../../data/punctuation_systems.json");
pub const EMBEDDED_LANGUAGES: &str = include_str!("../../data/iso_639_3.json");

/// The four table families, in the order the CLI and doctor report them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Table {
    Books,
    Orders,
    Punctuation,
    Languages,
}

impl Table {
    pub const ALL: [Table; 4] = [
        Table::Books,
        Table::Orders,
        Table::Punctuation,
        Table::Languages,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Table::Books => "books",
            Table::Orders => "orders",
            Table::Punctuation => "punctuation",
            Table::Languages => "languages",
        }
    }

    /// File name the overlay loader looks for under `--data-dir`.
    pub fn file_name(self) -> &'static str {
        match self {
            Table::Books => "book_codes.json",
            Table::Orders => "book_orders.json",
            Table::Punctuation => "punctuation_systems.json",
            Table::Languages => "iso_639_3.json",
        }
    }

    pub fn parse(name: &str) -> Result<Self, Error> {
        Table::ALL
            .into_iter()
            .find(|table| table.name() == name)
            .ok_or_else(|| {
                Error::new(ErrorKind::Usage)
                    .with_message("unknown table")
                    .with_code(name)
                    .with_hint("Known tables: books, orders, punctuation, languages.")
            })
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Dataset provenance header, mirroring the `work` element the source
/// data carries.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkHeader {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BookCodesDoc {
    #[serde(default)]
    pub work: WorkHeader,
    pub books: Vec<BookRecord>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BookOrdersDoc {
    #[serde(default)]
    pub work: WorkHeader,
    pub systems: Vec<BookOrderSystem>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PunctuationDoc {
    #[serde(default)]
    pub work: WorkHeader,
    pub systems: Vec<PunctuationSystem>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LanguagesDoc {
    #[serde(default)]
    pub work: WorkHeader,
    pub languages: Vec<LanguageRecord>,
}

pub fn parse_book_codes(text: &str) -> Result<BookCodesDoc, Error> {
    let doc: BookCodesDoc = parse_json(text, Table::Books)?;
    tracing::debug!(count = doc.books.len(), "parsed book codes dataset");
    Ok(doc)
}

pub fn parse_book_orders(text: &str) -> Result<BookOrdersDoc, Error> {
    let doc: BookOrdersDoc = parse_json(text, Table::Orders)?;
    tracing::debug!(count = doc.systems.len(), "parsed book order dataset");
    Ok(doc)
}

pub fn parse_punctuation(text: &str) -> Result<PunctuationDoc, Error> {
    let doc: PunctuationDoc = parse_json(text, Table::Punctuation)?;
    tracing::debug!(count = doc.systems.len(), "parsed punctuation dataset");
    Ok(doc)
}

pub fn parse_languages(text: &str) -> Result<LanguagesDoc, Error> {
    let doc: LanguagesDoc = parse_json(text, Table::Languages)?;
    tracing::debug!(count = doc.languages.len(), "parsed language dataset");
    Ok(doc)
}

fn parse_json<'de, T: Deserialize<'de>>(text: &'de str, table: Table) -> Result<T, Error> {
    serde_json::from_str(text).map_err(|err| {
        Error::new(ErrorKind::Invalid)
            .with_message(format!("malformed dataset: {err}"))
            .with_table(table.name())
    })
}

/// Read an overlay dataset file as text, distinguishing missing from broken.
pub fn read_overlay(dir: &Path, table: Table) -> Result<Option<String>, Error> {
    let path = dir.join(table.file_name());
    match std::fs::read_to_string(&path) {
        Ok(text) => {
            tracing::info!(table = table.name(), path = %path.display(), "loaded overlay dataset");
            Ok(Some(text))
        }
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(Error::new(ErrorKind::Io)
            .with_message("failed to read dataset overlay")
            .with_table(table.name())
            .with_path(path)
            .with_source(err)),
    }
}

#[cfg(test)]
mod tests {
    use super::{
        EMBEDDED_BOOK_CODES, EMBEDDED_BOOK_ORDERS, EMBEDDED_LANGUAGES, EMBEDDED_PUNCTUATION,
        Table, parse_book_codes, parse_book_orders, parse_languages, parse_punctuation,
        read_overlay,
    };
    use crate::core::error::ErrorKind;

    #[test]
    fn embedded_datasets_parse() {
        let books = parse_book_codes(EMBEDDED_BOOK_CODES).unwrap();
        assert!(books.books.len() >= 66);
        assert_eq!(books.work.title.as_deref(), Some("Bible books codes"));

        let orders = parse_book_orders(EMBEDDED_BOOK_ORDERS).unwrap();
        assert!(orders.systems.iter().any(|system| system.name == "English"));

        let punctuation = parse_punctuation(EMBEDDED_PUNCTUATION).unwrap();
        assert!(punctuation.systems.iter().any(|system| system.name == "English"));

        let languages = parse_languages(EMBEDDED_LANGUAGES).unwrap();
        assert!(languages.languages.iter().any(|record| record.id.as_str() == "eng"));
    }

    #[test]
    fn malformed_dataset_reports_invalid_with_table() {
        let err = parse_book_codes("{ not json").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Invalid);
        assert_eq!(err.table(), Some("books"));
    }

    #[test]
    fn table_names_round_trip() {
        for table in Table::ALL {
            assert_eq!(Table::parse(table.name()).unwrap(), table);
        }
        assert_eq!(Table::parse("nope").unwrap_err().kind(), ErrorKind::Usage);
    }

    #[test]
    fn missing_overlay_is_none() {
        let temp = tempfile::tempdir().unwrap();
        assert!(read_overlay(temp.path(), Table::Books).unwrap().is_none());
    }

    #[test]
    fn present_overlay_is_read() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join(Table::Books.file_name());
        std::fs::write(&path, "{}").unwrap();
        assert_eq!(
            read_overlay(temp.path(), Table::Books).unwrap().as_deref(),
            Some("{}")
        );
    }
}
