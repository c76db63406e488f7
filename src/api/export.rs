//! Purpose: Render and write the derived C tables, JSON dumps, and smoke file.
//! Exports: `ExportFormat`, `ExportOptions`, `ExportOutcome`, `run_export`.
//! Role: The external surface of the crate; header layout is an exact contract.
//! Invariants: Struct field names, widths, and ordering in the `.h` files never
//! change: `referenceAbbreviation` stays `[3+1]` (3 chars plus terminator).
//! Invariants: Existing files are never overwritten unless forced.
#![allow(clippy::result_large_err)]

use super::client::{ApiResult, Registry};
use crate::core::error::{Error, ErrorKind};
use crate::core::load::{
    BookCodesDoc, BookOrdersDoc, LanguagesDoc, PunctuationDoc, Table, WorkHeader,
};
use crate::core::punctuation::FIELD_NAMES;
use std::fmt::Write as _;
use std::io::Write as _;
use std::path::PathBuf;

pub const ORDERS_HEADER_FILE: &str = "BibleBookOrders_Tables.h";
pub const ORDERS_DATA_FILE: &str = "BibleBookOrders_Tables.c";
pub const PUNCTUATION_HEADER_FILE: &str = "BiblePunctuationSystems_Tables.h";
pub const PUNCTUATION_DATA_FILE: &str = "BiblePunctuationSystems_Tables.c";
pub const LANGUAGES_HEADER_FILE: &str = "iso_639_3_Tables.h";
pub const LANGUAGES_DATA_FILE: &str = "iso_639_3_Tables.c";
pub const INCLUDE_TEST_FILE: &str = "include_test.c";

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ExportFormat {
    C,
    Json,
    All,
}

impl ExportFormat {
    fn wants_c(self) -> bool {
        matches!(self, ExportFormat::C | ExportFormat::All)
    }

    fn wants_json(self) -> bool {
        matches!(self, ExportFormat::Json | ExportFormat::All)
    }
}

#[derive(Clone, Debug)]
pub struct ExportOptions {
    pub out_dir: PathBuf,
    pub format: ExportFormat,
    pub include_test: bool,
    pub force: bool,
}

#[derive(Clone, Debug, serde::Serialize)]
pub struct ExportedFile {
    pub path: PathBuf,
    pub bytes: u64,
}

#[derive(Clone, Debug, serde::Serialize)]
pub struct ExportOutcome {
    pub files: Vec<ExportedFile>,
}

pub fn run_export(registry: &Registry, options: &ExportOptions) -> ApiResult<ExportOutcome> {
    std::fs::create_dir_all(&options.out_dir).map_err(|err| {
        Error::new(ErrorKind::Io)
            .with_message("failed to create output directory")
            .with_path(&options.out_dir)
            .with_source(err)
    })?;

    let stamp = utc_stamp();
    let mut files = Vec::new();

    if options.format.wants_c() {
        write_file(
            &mut files,
            options,
            ORDERS_HEADER_FILE,
            &render_orders_header(&stamp),
        )?;
        write_file(
            &mut files,
            options,
            ORDERS_DATA_FILE,
            &render_orders_data(registry, &stamp),
        )?;
        write_file(
            &mut files,
            options,
            PUNCTUATION_HEADER_FILE,
            &render_punctuation_header(&stamp),
        )?;
        write_file(
            &mut files,
            options,
            PUNCTUATION_DATA_FILE,
            &render_punctuation_data(registry, &stamp),
        )?;
        write_file(
            &mut files,
            options,
            LANGUAGES_HEADER_FILE,
            &render_languages_header(&stamp),
        )?;
        write_file(
            &mut files,
            options,
            LANGUAGES_DATA_FILE,
            &render_languages_data(registry, &stamp),
        )?;
    }

    if options.format.wants_json() {
        for table in Table::ALL {
            write_file(&mut files, options, table.file_name(), &render_json(registry, table)?)?;
        }
    }

    if options.include_test {
        write_file(&mut files, options, INCLUDE_TEST_FILE, &render_include_test())?;
    }

    tracing::info!(files = files.len(), out_dir = %options.out_dir.display(), "export complete");
    Ok(ExportOutcome { files })
}

fn write_file(
    files: &mut Vec<ExportedFile>,
    options: &ExportOptions,
    name: &str,
    contents: &str,
) -> ApiResult<()> {
    let path = options.out_dir.join(name);
    if !options.force && path.exists() {
        return Err(Error::new(ErrorKind::AlreadyExists)
            .with_message("refusing to overwrite existing export file")
            .with_path(&path)
            .with_hint("Pass --force to overwrite exported files."));
    }
    let mut file = std::fs::File::create(&path).map_err(|err| {
        Error::new(ErrorKind::Io)
            .with_message("failed to create export file")
            .with_path(&path)
            .with_source(err)
    })?;
    file.write_all(contents.as_bytes()).map_err(|err| {
        Error::new(ErrorKind::Io)
            .with_message("failed to write export file")
            .with_path(&path)
            .with_source(err)
    })?;
    tracing::debug!(path = %path.display(), bytes = contents.len(), "wrote export file");
    files.push(ExportedFile {
        path,
        bytes: contents.len() as u64,
    });
    Ok(())
}

fn utc_stamp() -> String {
    use time::format_description::well_known::Rfc3339;
    time::OffsetDateTime::now_utc()
        .replace_nanosecond(0)
        .unwrap_or_else(|_| time::OffsetDateTime::now_utc())
        .format(&Rfc3339)
        .unwrap_or_else(|_| "unknown".to_string())
}

fn banner(out: &mut String, file_name: &str, stamp: &str, work: Option<&WorkHeader>) {
    let _ = writeln!(out, "// {file_name}");
    out.push_str("//\n");
    let _ = writeln!(
        out,
        "// This UTF-8 file was automatically generated by canonkit on {stamp}"
    );
    out.push_str("//\n");
    if let Some(work) = work {
        if let Some(title) = &work.title {
            let _ = writeln!(out, "// {title}");
        }
        if let Some(version) = &work.version {
            let _ = writeln!(out, "//  Version: {version}");
        }
        if let Some(date) = &work.date {
            let _ = writeln!(out, "//  Date: {date}");
        }
        out.push_str("//\n");
    }
    out.push('\n');
}

fn footer(out: &mut String, file_name: &str) {
    let _ = writeln!(out, "\n// end of {file_name}");
}

fn c_string(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{escaped}\"")
}

pub fn render_orders_header(stamp: &str) -> String {
    let mut out = String::new();
    banner(&mut out, ORDERS_HEADER_FILE, stamp, None);
    out.push_str(
        "#ifndef BIBLEBOOKORDERS_Tables_h\n\
         #define BIBLEBOOKORDERS_Tables_h\n\
         \n\
         typedef struct bookOrderByRefEntryStruct {\n\
         \x20   const unsigned char referenceAbbreviation[3+1];\n\
         \x20   const int indexNumber;\n\
         } bookOrderByRefEntry;\n\
         \n\
         typedef struct bookOrderByIndexEntryStruct {\n\
         \x20   const int indexNumber;\n\
         \x20   const unsigned char referenceAbbreviation[3+1];\n\
         } bookOrderByIndexEntry;\n\
         \n\
         typedef struct tableEntryStruct {\n\
         \x20   const unsigned char* systemName;\n\
         \x20   bookOrderByRefEntry* byReference;\n\
         \x20   bookOrderByIndexEntry* byBook;\n\
         } tableEntry;\n\
         \n\
         #endif // BIBLEBOOKORDERS_Tables_h\n",
    );
    footer(&mut out, ORDERS_HEADER_FILE);
    out
}

pub fn render_punctuation_header(stamp: &str) -> String {
    let mut out = String::new();
    banner(&mut out, PUNCTUATION_HEADER_FILE, stamp, None);
    out.push_str(
        "#ifndef BIBLEPUNCTUATIONSYSTEMS_Tables_h\n\
         #define BIBLEPUNCTUATIONSYSTEMS_Tables_h\n\
         \n\
         typedef struct punctuationByRefEntryStruct {\n\
         \x20   const unsigned char referenceAbbreviation[3+1];\n\
         \x20   const int indexNumber;\n\
         } punctuationByRefEntry;\n\
         \n\
         typedef struct punctuationByIndexEntryStruct {\n\
         \x20   const int indexNumber;\n\
         \x20   const unsigned char referenceAbbreviation[3+1];\n\
         } punctuationByIndexEntry;\n\
         \n\
         typedef struct tableEntryStruct {\n\
         \x20   const unsigned char* systemName;\n\
         \x20   punctuationByRefEntry* byReference;\n\
         \x20   punctuationByIndexEntry* byBook;\n\
         } tableEntry;\n\
         \n\
         #endif // BIBLEPUNCTUATIONSYSTEMS_Tables_h\n",
    );
    footer(&mut out, PUNCTUATION_HEADER_FILE);
    out
}

pub fn render_languages_header(stamp: &str) -> String {
    let mut out = String::new();
    banner(&mut out, LANGUAGES_HEADER_FILE, stamp, None);
    out.push_str(
        "#ifndef ISO_639_3_Tables_h\n\
         #define ISO_639_3_Tables_h\n\
         \n\
         typedef struct IDDictEntryStruct {\n\
         \x20   const unsigned char* ID;\n\
         \x20   const unsigned char* Name;\n\
         \x20   const unsigned char Type;\n\
         \x20   const unsigned char Scope;\n\
         \x20   const unsigned char* Part1Code;\n\
         \x20   const unsigned char* Part2Code;\n\
         } IDDictEntry;\n\
         \n\
         typedef struct NameDictEntryStruct {\n\
         \x20   const unsigned char* Name;\n\
         \x20   const unsigned char* ID;\n\
         \x20   const unsigned char Type;\n\
         \x20   const unsigned char Scope;\n\
         \x20   const unsigned char* Part1Code;\n\
         \x20   const unsigned char* Part2Code;\n\
         } NameDictEntry;\n\
         \n\
         #endif // ISO_639_3_Tables_h\n",
    );
    footer(&mut out, LANGUAGES_HEADER_FILE);
    out
}

pub fn render_orders_data(registry: &Registry, stamp: &str) -> String {
    let mut out = String::new();
    banner(
        &mut out,
        ORDERS_DATA_FILE,
        stamp,
        Some(registry.work(Table::Orders)),
    );
    let _ = writeln!(out, "#include \"{ORDERS_HEADER_FILE}\"\n");

    let mut systems: Vec<_> = registry.orders().iter().collect();
    systems.sort_by(|a, b| a.name.cmp(&b.name));

    for system in &systems {
        let mut by_ref: Vec<_> = system
            .books
            .iter()
            .enumerate()
            .map(|(pos, code)| (*code, pos + 1))
            .collect();
        by_ref.sort_by_key(|(code, _)| *code);

        let _ = writeln!(out, "static bookOrderByRefEntry {}_byRef[] = {{", system.name);
        out.push_str("  // Fields are referenceAbbreviation (sorted), indexNumber\n");
        for (code, index) in &by_ref {
            let _ = writeln!(out, "  {{{}, {index}}},", c_string(code.as_str()));
        }
        let _ = writeln!(out, "}}; // {}_byRef\n", system.name);

        let _ = writeln!(out, "static bookOrderByIndexEntry {}_byBook[] = {{", system.name);
        out.push_str("  // Fields are indexNumber (sorted), referenceAbbreviation\n");
        for (pos, code) in system.books.iter().enumerate() {
            let _ = writeln!(out, "  {{{}, {}}},", pos + 1, c_string(code.as_str()));
        }
        let _ = writeln!(out, "}}; // {}_byBook\n", system.name);
    }

    out.push_str("static tableEntry bookOrderSystemTable[] = {\n");
    out.push_str("  // Fields are systemName, byReference, byBook\n");
    for system in &systems {
        let _ = writeln!(
            out,
            "  {{{}, {name}_byRef, {name}_byBook}},",
            c_string(&system.name),
            name = system.name
        );
    }
    out.push_str("}; // bookOrderSystemTable\n");

    footer(&mut out, ORDERS_DATA_FILE);
    out
}

pub fn render_punctuation_data(registry: &Registry, stamp: &str) -> String {
    let mut out = String::new();
    banner(
        &mut out,
        PUNCTUATION_DATA_FILE,
        stamp,
        Some(registry.work(Table::Punctuation)),
    );
    let _ = writeln!(out, "#include \"{PUNCTUATION_HEADER_FILE}\"\n");

    let mut systems: Vec<_> = registry.punctuation().iter().collect();
    systems.sort_by(|a, b| a.name.cmp(&b.name));

    // Field values keep the layout's fixed field order; the layout header's
    // by-reference entry types stay reserved for index-keyed tables.
    out.push_str("static struct punctuationSystemEntryStruct {\n");
    out.push_str("    const unsigned char* systemName;\n");
    let _ = writeln!(
        out,
        "    const unsigned char* fieldValues[{}];",
        FIELD_NAMES.len()
    );
    out.push_str("} punctuationSystemTable[] = {\n");
    let _ = writeln!(
        out,
        "  // Fields are systemName (sorted), {}",
        FIELD_NAMES.join(", ")
    );
    for system in &systems {
        let values: Vec<String> = system
            .field_values()
            .iter()
            .map(|value| c_string(value))
            .collect();
        let _ = writeln!(
            out,
            "  {{{}, {{{}}}}},",
            c_string(&system.name),
            values.join(", ")
        );
    }
    out.push_str("}; // punctuationSystemTable\n");

    footer(&mut out, PUNCTUATION_DATA_FILE);
    out
}

pub fn render_languages_data(registry: &Registry, stamp: &str) -> String {
    let mut out = String::new();
    banner(
        &mut out,
        LANGUAGES_DATA_FILE,
        stamp,
        Some(registry.work(Table::Languages)),
    );
    let _ = writeln!(out, "#include \"{LANGUAGES_HEADER_FILE}\"\n");

    let mut by_id: Vec<_> = registry.languages().iter().collect();
    by_id.sort_by_key(|record| record.id);

    out.push_str("static IDDictEntry ISO639_3_IDDict[] = {\n");
    out.push_str("  // Fields are ID (sorted), Name, Type, Scope, Part1Code, Part2Code\n");
    for record in &by_id {
        let _ = writeln!(
            out,
            "  {{{}, {}, '{}', '{}', {}, {}}},",
            c_string(record.id.as_str()),
            c_string(&record.name),
            record.lang_type.letter(),
            record.scope.letter(),
            c_string(record.part1_code.as_deref().unwrap_or("")),
            c_string(record.part2_code.as_deref().unwrap_or("")),
        );
    }
    out.push_str("}; // ISO639_3_IDDict\n\n");

    let mut by_name: Vec<_> = registry.languages().iter().collect();
    by_name.sort_by(|a, b| a.name.cmp(&b.name));

    out.push_str("static NameDictEntry ISO639_3_NameDict[] = {\n");
    out.push_str("  // Fields are Name (sorted), ID, Type, Scope, Part1Code, Part2Code\n");
    for record in &by_name {
        let _ = writeln!(
            out,
            "  {{{}, {}, '{}', '{}', {}, {}}},",
            c_string(&record.name),
            c_string(record.id.as_str()),
            record.lang_type.letter(),
            record.scope.letter(),
            c_string(record.part1_code.as_deref().unwrap_or("")),
            c_string(record.part2_code.as_deref().unwrap_or("")),
        );
    }
    out.push_str("}; // ISO639_3_NameDict\n");

    footer(&mut out, LANGUAGES_DATA_FILE);
    out
}

pub fn render_include_test() -> String {
    format!(
        "/* {INCLUDE_TEST_FILE}      This file is just for testing\n\
         \x20*                      that the generated include files compile ok.\n\
         \x20*\n\
         \x20* If the .h files are formed correctly, compiling this file\n\
         \x20* should give no errors or warnings.\n\
         \x20*\n\
         \x20* Under Linux use:\n\
         \x20*      gcc -c {INCLUDE_TEST_FILE}\n\
         \x20*/\n\
         \n\
         #include \"{ORDERS_HEADER_FILE}\"\n\
         #include \"{PUNCTUATION_HEADER_FILE}\"\n\
         #include \"{LANGUAGES_HEADER_FILE}\"\n\
         \n\
         /* A dummy main program to keep the compiler happy */\n\
         int main(void) {{ return 0; }}\n\
         \n\
         /* end of {INCLUDE_TEST_FILE} */\n"
    )
}

fn render_json(registry: &Registry, table: Table) -> ApiResult<String> {
    let value = match table {
        Table::Books => serde_json::to_value(BookCodesDoc {
            work: registry.work(table).clone(),
            books: registry.books().iter().cloned().collect(),
        }),
        Table::Orders => serde_json::to_value(BookOrdersDoc {
            work: registry.work(table).clone(),
            systems: registry.orders().iter().cloned().collect(),
        }),
        Table::Punctuation => serde_json::to_value(PunctuationDoc {
            work: registry.work(table).clone(),
            systems: registry.punctuation().iter().cloned().collect(),
        }),
        Table::Languages => serde_json::to_value(LanguagesDoc {
            work: registry.work(table).clone(),
            languages: registry.languages().iter().cloned().collect(),
        }),
    };
    let value = value.map_err(|err| {
        Error::new(ErrorKind::Internal)
            .with_message("failed to serialize table for export")
            .with_table(table.name())
            .with_source(err)
    })?;
    let mut text = serde_json::to_string_pretty(&value).map_err(|err| {
        Error::new(ErrorKind::Internal)
            .with_message("failed to render table JSON")
            .with_table(table.name())
            .with_source(err)
    })?;
    text.push('\n');
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::{
        ExportFormat, ExportOptions, c_string, render_include_test, render_languages_data,
        render_languages_header, render_orders_data, render_orders_header,
        render_punctuation_data, render_punctuation_header, run_export,
    };
    use crate::api::client::Loader;

    const STAMP: &str = "2026-08-29T00:00:00Z";

    #[test]
    fn orders_header_declares_exact_layout() {
        let text = render_orders_header(STAMP);
        assert!(text.contains(
            "typedef struct bookOrderByRefEntryStruct {\n    const unsigned char referenceAbbreviation[3+1];\n    const int indexNumber;\n} bookOrderByRefEntry;"
        ));
        assert!(text.contains(
            "typedef struct bookOrderByIndexEntryStruct {\n    const int indexNumber;\n    const unsigned char referenceAbbreviation[3+1];\n} bookOrderByIndexEntry;"
        ));
        assert!(text.contains(
            "typedef struct tableEntryStruct {\n    const unsigned char* systemName;\n    bookOrderByRefEntry* byReference;\n    bookOrderByIndexEntry* byBook;\n} tableEntry;"
        ));
        assert!(text.starts_with("// BibleBookOrders_Tables.h\n//\n"));
        assert!(text.ends_with("// end of BibleBookOrders_Tables.h\n"));
        assert!(text.contains("#ifndef BIBLEBOOKORDERS_Tables_h"));
    }

    #[test]
    fn punctuation_header_declares_exact_layout() {
        let text = render_punctuation_header(STAMP);
        assert!(text.contains("#ifndef BIBLEPUNCTUATIONSYSTEMS_Tables_h"));
        assert!(text.contains(
            "typedef struct punctuationByRefEntryStruct {\n    const unsigned char referenceAbbreviation[3+1];\n    const int indexNumber;\n} punctuationByRefEntry;"
        ));
        assert!(text.contains("punctuationByIndexEntry* byBook;"));
    }

    #[test]
    fn languages_header_declares_both_directions() {
        let text = render_languages_header(STAMP);
        assert!(text.contains("#ifndef ISO_639_3_Tables_h"));
        assert!(text.contains(
            "typedef struct IDDictEntryStruct {\n    const unsigned char* ID;\n    const unsigned char* Name;\n    const unsigned char Type;\n    const unsigned char Scope;\n    const unsigned char* Part1Code;\n    const unsigned char* Part2Code;\n} IDDictEntry;"
        ));
        assert!(text.contains(
            "typedef struct NameDictEntryStruct {\n    const unsigned char* Name;\n    const unsigned char* ID;"
        ));
    }

    #[test]
    fn orders_data_lists_each_system_and_master_table() {
        let registry = Loader::default().load().expect("registry");
        let text = render_orders_data(&registry, STAMP);
        assert!(text.contains("static bookOrderByRefEntry English_byRef[] = {"));
        assert!(text.contains("static bookOrderByIndexEntry English_byBook[] = {"));
        assert!(text.contains("  {1, \"GEN\"},"));
        assert!(text.contains("{\"English\", English_byRef, English_byBook},"));
        assert!(text.contains("{\"Hebrew\", Hebrew_byRef, Hebrew_byBook},"));
        assert!(text.contains("#include \"BibleBookOrders_Tables.h\""));
    }

    #[test]
    fn punctuation_data_carries_all_field_values() {
        let registry = Loader::default().load().expect("registry");
        let text = render_punctuation_data(&registry, STAMP);
        assert!(text.contains("punctuationSystemTable"));
        assert!(text.contains("\"English\""));
        // English chapterVerseSeparator
        assert!(text.contains("\":\""));
    }

    #[test]
    fn languages_data_sorts_both_directions() {
        let registry = Loader::default().load().expect("registry");
        let text = render_languages_data(&registry, STAMP);
        let id_dict = text.find("ISO639_3_IDDict").expect("id dict");
        let name_dict = text.find("ISO639_3_NameDict").expect("name dict");
        assert!(id_dict < name_dict);
        assert!(text.contains("{\"eng\", \"English\", 'L', 'I', \"en\", \"eng\"},"));
        assert!(text.contains("{\"English\", \"eng\", 'L', 'I', \"en\", \"eng\"},"));
    }

    #[test]
    fn include_test_includes_every_header() {
        let text = render_include_test();
        assert!(text.contains("#include \"BibleBookOrders_Tables.h\""));
        assert!(text.contains("#include \"BiblePunctuationSystems_Tables.h\""));
        assert!(text.contains("#include \"iso_639_3_Tables.h\""));
        assert!(text.contains("int main(void)"));
    }

    #[test]
    fn c_string_escapes_quotes_and_backslashes() {
        assert_eq!(c_string(r#"a"b"#), r#""a\"b""#);
        assert_eq!(c_string(r"a\b"), r#""a\\b""#);
        assert_eq!(c_string(""), "\"\"");
    }

    #[test]
    fn export_refuses_overwrite_without_force() {
        let dir = tempfile::tempdir().expect("tempdir");
        let registry = Loader::default().load().expect("registry");
        let options = ExportOptions {
            out_dir: dir.path().to_path_buf(),
            format: ExportFormat::C,
            include_test: true,
            force: false,
        };
        let outcome = run_export(&registry, &options).expect("first export");
        assert_eq!(outcome.files.len(), 7);

        let err = run_export(&registry, &options).expect_err("second export");
        assert_eq!(
            err.kind(),
            crate::core::error::ErrorKind::AlreadyExists
        );

        let forced = ExportOptions {
            force: true,
            ..options
        };
        run_export(&registry, &forced).expect("forced export");
    }

    #[test]
    fn json_export_writes_all_tables() {
        let dir = tempfile::tempdir().expect("tempdir");
        let registry = Loader::default().load().expect("registry");
        let options = ExportOptions {
            out_dir: dir.path().to_path_buf(),
            format: ExportFormat::Json,
            include_test: false,
            force: false,
        };
        let outcome = run_export(&registry, &options).expect("export");
        assert_eq!(outcome.files.len(), 4);
        let books = std::fs::read_to_string(dir.path().join("book_codes.json")).expect("books");
        assert!(books.contains("\"referenceAbbreviation\": \"GEN\""));
    }
}
