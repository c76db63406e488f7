//! Purpose: Define the stable public Rust API boundary for canonkit.
//! Exports: Registries, loading, validation, and export operations.
//! Role: Public, additive-only surface; hides internal table modules.
//! Invariants: This module is the only public path to the table registries.

mod client;
mod export;

pub use crate::core::books::{BookCodes, BookRecord};
pub use crate::core::code::{BookCode, CODE_LEN, LangId};
#[doc(hidden)]
pub use crate::core::error::to_exit_code;
pub use crate::core::error::{Error, ErrorKind};
pub use crate::core::language::{LanguageRecord, LanguageScope, LanguageType, Languages};
pub use crate::core::load::{Table, WorkHeader};
pub use crate::core::order::{BookOrderSystem, BookOrders, OrderMatch};
pub use crate::core::punctuation::{FIELD_NAMES, FieldDiff, PunctuationSystem, PunctuationSystems};
pub use crate::core::validate::{ValidationIssue, ValidationReport, ValidationStatus};
pub use client::{ApiResult, Loader, Registry, TableSource};
pub use export::{
    ExportFormat, ExportOptions, ExportOutcome, ExportedFile, INCLUDE_TEST_FILE,
    LANGUAGES_DATA_FILE, LANGUAGES_HEADER_FILE, ORDERS_DATA_FILE, ORDERS_HEADER_FILE,
    PUNCTUATION_DATA_FILE, PUNCTUATION_HEADER_FILE, run_export,
};
