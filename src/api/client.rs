//! Purpose: Define the public API surface for loading the reference tables.
//! Exports: `Loader`, `Registry`, `TableSource`, and the doctor entry point.
//! Role: Stable boundary for callers; mirrors CLI overlay resolution rules.
//! Invariants: An overlay file replaces its table wholesale; tables never merge.
//! Invariants: `Registry` is immutable once loaded.
#![allow(clippy::result_large_err)]

use crate::core::books::BookCodes;
use crate::core::error::Error;
use crate::core::language::Languages;
use crate::core::load::{
    self, BookCodesDoc, BookOrdersDoc, LanguagesDoc, PunctuationDoc, Table, WorkHeader,
};
use crate::core::order::BookOrders;
use crate::core::punctuation::PunctuationSystems;
use crate::core::validate::{
    ValidationReport, check_books, check_languages, check_orders, check_punctuation,
    known_book_codes,
};
use crate::data_paths::default_data_dir;
use std::borrow::Cow;
use std::path::{Path, PathBuf};

pub type ApiResult<T> = Result<T, Error>;

/// Where a table's dataset came from.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TableSource {
    Embedded,
    Overlay(PathBuf),
}

impl TableSource {
    pub fn describe(&self) -> String {
        match self {
            TableSource::Embedded => "embedded".to_string(),
            TableSource::Overlay(path) => path.to_string_lossy().to_string(),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Loader {
    data_dir: Option<PathBuf>,
}

impl Loader {
    pub fn new() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }

    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(data_dir.into());
        self
    }

    pub fn without_data_dir(mut self) -> Self {
        self.data_dir = None;
        self
    }

    pub fn data_dir(&self) -> Option<&Path> {
        self.data_dir.as_deref()
    }

    fn table_text(&self, table: Table) -> ApiResult<(Cow<'static, str>, TableSource)> {
        if let Some(dir) = &self.data_dir {
            if let Some(text) = load::read_overlay(dir, table)? {
                let path = dir.join(table.file_name());
                return Ok((Cow::Owned(text), TableSource::Overlay(path)));
            }
        }
        let embedded = match table {
            Table::Books => load::EMBEDDED_BOOK_CODES,
            Table::Orders => load::EMBEDDED_BOOK_ORDERS,
            Table::Punctuation => load::EMBEDDED_PUNCTUATION,
            Table::Languages => load::EMBEDDED_LANGUAGES,
        };
        Ok((Cow::Borrowed(embedded), TableSource::Embedded))
    }

    pub fn load(&self) -> ApiResult<Registry> {
        let (text, books_source) = self.table_text(Table::Books)?;
        let books_doc = load::parse_book_codes(&text)?;
        let (text, orders_source) = self.table_text(Table::Orders)?;
        let orders_doc = load::parse_book_orders(&text)?;
        let (text, punctuation_source) = self.table_text(Table::Punctuation)?;
        let punctuation_doc = load::parse_punctuation(&text)?;
        let (text, languages_source) = self.table_text(Table::Languages)?;
        let languages_doc = load::parse_languages(&text)?;

        Ok(Registry {
            books_work: books_doc.work,
            orders_work: orders_doc.work,
            punctuation_work: punctuation_doc.work,
            languages_work: languages_doc.work,
            books: BookCodes::from_records(books_doc.books)?,
            orders: BookOrders::from_systems(orders_doc.systems)?,
            punctuation: PunctuationSystems::from_systems(punctuation_doc.systems)?,
            languages: Languages::from_records(languages_doc.languages)?,
            sources: [
                books_source,
                orders_source,
                punctuation_source,
                languages_source,
            ],
        })
    }

    /// Validate datasets without requiring them to load cleanly.
    pub fn doctor(&self, tables: &[Table]) -> ApiResult<Vec<ValidationReport>> {
        let books_doc = self.parse_books_doc()?;
        let known = match &books_doc {
            Ok(doc) => Some(known_book_codes(doc)),
            Err(_) => None,
        };

        let mut reports = Vec::new();
        for table in tables {
            let report = match table {
                Table::Books => match &books_doc {
                    Ok(doc) => check_books(doc),
                    Err(report) => report.clone(),
                },
                Table::Orders => match self.parse_orders_doc()? {
                    Ok(doc) => check_orders(&doc, known.as_ref()),
                    Err(report) => report,
                },
                Table::Punctuation => match self.parse_punctuation_doc()? {
                    Ok(doc) => check_punctuation(&doc),
                    Err(report) => report,
                },
                Table::Languages => match self.parse_languages_doc()? {
                    Ok(doc) => check_languages(&doc),
                    Err(report) => report,
                },
            };
            reports.push(report);
        }
        Ok(reports)
    }

    fn parse_books_doc(&self) -> ApiResult<Result<BookCodesDoc, ValidationReport>> {
        let (text, _) = self.table_text(Table::Books)?;
        Ok(match load::parse_book_codes(&text) {
            Ok(doc) => Ok(doc),
            Err(err) => Err(ValidationReport::unparsable(Table::Books, err.to_string())),
        })
    }

    fn parse_orders_doc(&self) -> ApiResult<Result<BookOrdersDoc, ValidationReport>> {
        let (text, _) = self.table_text(Table::Orders)?;
        Ok(match load::parse_book_orders(&text) {
            Ok(doc) => Ok(doc),
            Err(err) => Err(ValidationReport::unparsable(Table::Orders, err.to_string())),
        })
    }

    fn parse_punctuation_doc(&self) -> ApiResult<Result<PunctuationDoc, ValidationReport>> {
        let (text, _) = self.table_text(Table::Punctuation)?;
        Ok(match load::parse_punctuation(&text) {
            Ok(doc) => Ok(doc),
            Err(err) => Err(ValidationReport::unparsable(
                Table::Punctuation,
                err.to_string(),
            )),
        })
    }

    fn parse_languages_doc(&self) -> ApiResult<Result<LanguagesDoc, ValidationReport>> {
        let (text, _) = self.table_text(Table::Languages)?;
        Ok(match load::parse_languages(&text) {
            Ok(doc) => Ok(doc),
            Err(err) => Err(ValidationReport::unparsable(
                Table::Languages,
                err.to_string(),
            )),
        })
    }
}

/// Loaded, validated-on-construction reference tables.
#[derive(Clone, Debug)]
pub struct Registry {
    books: BookCodes,
    orders: BookOrders,
    punctuation: PunctuationSystems,
    languages: Languages,
    books_work: WorkHeader,
    orders_work: WorkHeader,
    punctuation_work: WorkHeader,
    languages_work: WorkHeader,
    sources: [TableSource; 4],
}

impl Registry {
    pub fn books(&self) -> &BookCodes {
        &self.books
    }

    pub fn orders(&self) -> &BookOrders {
        &self.orders
    }

    pub fn punctuation(&self) -> &PunctuationSystems {
        &self.punctuation
    }

    pub fn languages(&self) -> &Languages {
        &self.languages
    }

    pub fn work(&self, table: Table) -> &WorkHeader {
        match table {
            Table::Books => &self.books_work,
            Table::Orders => &self.orders_work,
            Table::Punctuation => &self.punctuation_work,
            Table::Languages => &self.languages_work,
        }
    }

    pub fn source(&self, table: Table) -> &TableSource {
        match table {
            Table::Books => &self.sources[0],
            Table::Orders => &self.sources[1],
            Table::Punctuation => &self.sources[2],
            Table::Languages => &self.sources[3],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Loader, TableSource};
    use crate::core::code::BookCode;
    use crate::core::load::Table;
    use crate::core::validate::ValidationStatus;

    fn embedded_loader() -> Loader {
        Loader::default()
    }

    #[test]
    fn embedded_registry_loads() {
        let registry = embedded_loader().load().expect("registry");
        assert!(registry.books().len() >= 66);
        assert!(registry.orders().get("English").is_some());
        assert!(registry.punctuation().get("English").is_some());
        assert!(registry.languages().len() >= 60);
        assert_eq!(registry.source(Table::Books), &TableSource::Embedded);
    }

    #[test]
    fn embedded_doctor_is_clean() {
        let reports = embedded_loader().doctor(&Table::ALL).expect("reports");
        assert_eq!(reports.len(), 4);
        for report in reports {
            assert_eq!(report.status, ValidationStatus::Ok, "{:?}", report.issues);
        }
    }

    #[test]
    fn english_order_starts_at_genesis() {
        let registry = embedded_loader().load().expect("registry");
        let english = registry.orders().get("English").expect("system");
        assert_eq!(english.books[0], BookCode::parse("GEN").unwrap());
        assert_eq!(english.books.len(), 66);
    }
}
