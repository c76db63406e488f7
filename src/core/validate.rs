//! Purpose: Dataset validation: per-table reports for the doctor command.
//! Exports: `ValidationReport`, `ValidationStatus`, `ValidationIssue`, checks.
//! Role: Shared contract between CLI diagnostics and API users.
//! Invariants: Reports never panic on bad data; every finding is an issue.
//! Invariants: `checked` counts records examined, even when issues are found.

use crate::core::code::BookCode;
use crate::core::load::{BookCodesDoc, BookOrdersDoc, LanguagesDoc, PunctuationDoc, Table};
use std::collections::HashSet;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValidationStatus {
    Ok,
    Invalid,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationIssue {
    pub code: String,
    pub message: String,
    /// Record key the issue points at (book code, system name, language id).
    pub record: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationReport {
    pub table: Table,
    pub status: ValidationStatus,
    pub checked: usize,
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    fn from_issues(table: Table, checked: usize, issues: Vec<ValidationIssue>) -> Self {
        let status = if issues.is_empty() {
            ValidationStatus::Ok
        } else {
            ValidationStatus::Invalid
        };
        Self {
            table,
            status,
            checked,
            issues,
        }
    }

    /// Report for a dataset that failed to parse at all.
    pub fn unparsable(table: Table, message: impl Into<String>) -> Self {
        Self::from_issues(
            table,
            0,
            vec![issue("parse", message, None)],
        )
    }

    pub fn issue_count(&self) -> usize {
        self.issues.len()
    }
}

fn is_c_identifier(name: &str) -> bool {
    let mut bytes = name.bytes();
    match bytes.next() {
        Some(byte) if byte.is_ascii_alphabetic() || byte == b'_' => {}
        _ => return false,
    }
    bytes.all(|byte| byte.is_ascii_alphanumeric() || byte == b'_')
}

fn issue(code: &str, message: impl Into<String>, record: Option<String>) -> ValidationIssue {
    ValidationIssue {
        code: code.to_string(),
        message: message.into(),
        record,
    }
}

pub fn check_books(doc: &BookCodesDoc) -> ValidationReport {
    let mut issues = Vec::new();
    let mut abbreviations = HashSet::new();
    let mut numbers = HashSet::new();
    let mut osis = HashSet::new();
    let mut paratext = HashSet::new();
    let mut previous_number = 0u16;

    for record in &doc.books {
        let key = record.reference_abbreviation.as_str().to_string();
        if !abbreviations.insert(record.reference_abbreviation) {
            issues.push(issue(
                "duplicate-code",
                "reference abbreviation repeated",
                Some(key.clone()),
            ));
        }
        if !numbers.insert(record.reference_number) {
            issues.push(issue(
                "duplicate-number",
                format!("reference number {} repeated", record.reference_number),
                Some(key.clone()),
            ));
        }
        if record.reference_number <= previous_number {
            issues.push(issue(
                "number-order",
                format!(
                    "reference number {} not ascending (previous was {})",
                    record.reference_number, previous_number
                ),
                Some(key.clone()),
            ));
        }
        previous_number = record.reference_number;
        if let Some(value) = &record.osis_abbreviation {
            if !osis.insert(value.clone()) {
                issues.push(issue(
                    "duplicate-osis",
                    format!("OSIS abbreviation '{value}' repeated"),
                    Some(key.clone()),
                ));
            }
        }
        if let Some(value) = &record.paratext_abbreviation {
            if !paratext.insert(value.clone()) {
                issues.push(issue(
                    "duplicate-paratext",
                    format!("Paratext abbreviation '{value}' repeated"),
                    Some(key),
                ));
            }
        }
    }
    ValidationReport::from_issues(Table::Books, doc.books.len(), issues)
}

/// Set of reference abbreviations an order system may legally use.
pub fn known_book_codes(doc: &BookCodesDoc) -> HashSet<BookCode> {
    doc.books
        .iter()
        .map(|record| record.reference_abbreviation)
        .collect()
}

/// `known` is `None` when the books table itself could not be loaded; the
/// cross-table membership check is skipped in that case.
pub fn check_orders(doc: &BookOrdersDoc, known: Option<&HashSet<BookCode>>) -> ValidationReport {
    let mut issues = Vec::new();
    let mut names = HashSet::new();
    let mut checked = 0usize;

    for system in &doc.systems {
        if !names.insert(system.name.clone()) {
            issues.push(issue(
                "duplicate-system",
                "book order system name repeated",
                Some(system.name.clone()),
            ));
        }
        // The C export interpolates system names as array identifiers
        // (`<name>_byRef`), so they must be valid C identifiers.
        if !is_c_identifier(&system.name) {
            issues.push(issue(
                "bad-system-name",
                format!(
                    "system name '{}' is not a valid C identifier",
                    system.name
                ),
                Some(system.name.clone()),
            ));
        }
        if system.books.is_empty() {
            issues.push(issue(
                "empty-system",
                "book order system lists no books",
                Some(system.name.clone()),
            ));
        }
        let mut seen = HashSet::new();
        for code in &system.books {
            checked += 1;
            if !seen.insert(*code) {
                issues.push(issue(
                    "duplicate-book",
                    format!("book {code} listed twice in '{}'", system.name),
                    Some(system.name.clone()),
                ));
            }
            if known.is_some_and(|known| !known.contains(code)) {
                issues.push(issue(
                    "unknown-book",
                    format!("book {code} in '{}' is not a known book code", system.name),
                    Some(code.as_str().to_string()),
                ));
            }
        }
    }
    ValidationReport::from_issues(Table::Orders, checked, issues)
}

pub fn check_punctuation(doc: &PunctuationDoc) -> ValidationReport {
    let mut issues = Vec::new();
    let mut names = HashSet::new();

    for system in &doc.systems {
        if !names.insert(system.name.clone()) {
            issues.push(issue(
                "duplicate-system",
                "punctuation system name repeated",
                Some(system.name.clone()),
            ));
        }
        if system.name.trim().is_empty() {
            issues.push(issue("empty-name", "punctuation system name is blank", None));
        }
        // Separator fields must carry at least one character; terminal
        // punctuation and bridge characters may legitimately be empty.
        let separators: [(&str, &str); 5] = [
            ("bookChapterSeparator", &system.book_chapter_separator),
            ("chapterVerseSeparator", &system.chapter_verse_separator),
            ("verseSeparator", &system.verse_separator),
            ("chapterSeparator", &system.chapter_separator),
            ("bookSeparator", &system.book_separator),
        ];
        for (field, value) in separators {
            if value.is_empty() {
                issues.push(issue(
                    "empty-separator",
                    format!("{field} is empty in '{}'", system.name),
                    Some(system.name.clone()),
                ));
            }
        }
        for (field, value) in [
            ("booknameCase", &system.bookname_case),
            ("booknameLength", &system.bookname_length),
            ("spaceAllowedAfterBCS", &system.space_allowed_after_bcs),
        ] {
            if value.is_empty() {
                issues.push(issue(
                    "empty-field",
                    format!("{field} is empty in '{}'", system.name),
                    Some(system.name.clone()),
                ));
            }
        }
    }
    ValidationReport::from_issues(Table::Punctuation, doc.systems.len(), issues)
}

pub fn check_languages(doc: &LanguagesDoc) -> ValidationReport {
    let mut issues = Vec::new();
    let mut ids = HashSet::new();
    let mut names = HashSet::new();

    for record in &doc.languages {
        let key = record.id.as_str().to_string();
        if !ids.insert(record.id) {
            issues.push(issue("duplicate-id", "language id repeated", Some(key.clone())));
        }
        if !names.insert(record.name.clone()) {
            issues.push(issue(
                "duplicate-name",
                format!("language name '{}' repeated", record.name),
                Some(key.clone()),
            ));
        }
        if let Some(part1) = &record.part1_code {
            if part1.len() != 2 || !part1.bytes().all(|byte| byte.is_ascii_lowercase()) {
                issues.push(issue(
                    "bad-part1",
                    format!("part1 code '{part1}' is not 2 lowercase letters"),
                    Some(key.clone()),
                ));
            }
        }
        if let Some(part2) = &record.part2_code {
            if part2.len() != 3 || !part2.bytes().all(|byte| byte.is_ascii_lowercase()) {
                issues.push(issue(
                    "bad-part2",
                    format!("part2 code '{part2}' is not 3 lowercase letters"),
                    Some(key),
                ));
            }
        }
    }
    ValidationReport::from_issues(Table::Languages, doc.languages.len(), issues)
}
