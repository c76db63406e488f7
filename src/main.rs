//! Purpose: `canonkit` CLI entry point and command bootstrap.
//! Role: Binary crate root; parses args, runs commands, emits JSON on stdout.
//! Invariants: Commands emit stable stdout formats (human or JSON by command/flags).
//! Invariants: Non-interactive errors are emitted as JSON on stderr.
//! Invariants: Process exit code is derived from `api::to_exit_code`.
#![allow(clippy::result_large_err)]

use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;

use clap::{
    CommandFactory, Parser, Subcommand, ValueEnum, ValueHint,
    error::ErrorKind as ClapErrorKind,
};
use clap_complete::aot::Shell;
use serde_json::{Map, Value, json};
use std::error::Error as StdError;

mod color_json;
mod command_dispatch;

use canonkit::api::{
    BookCode, BookOrderSystem, BookRecord, Error, ErrorKind, ExportFormat, ExportOptions,
    FieldDiff, LanguageRecord, Loader, OrderMatch, PunctuationSystem, Registry, Table,
    ValidationReport, ValidationStatus, run_export, to_exit_code,
};
use color_json::colorize_json;

#[derive(Copy, Clone, Debug)]
struct RunOutcome {
    exit_code: i32,
}

impl RunOutcome {
    fn ok() -> Self {
        Self { exit_code: 0 }
    }

    fn with_code(exit_code: i32) -> Self {
        Self { exit_code }
    }
}

fn main() {
    init_tracing();
    let exit_code = match run() {
        Ok(outcome) => outcome.exit_code,
        Err((err, color_mode)) => {
            emit_error(&err, color_mode);
            to_exit_code(err.kind())
        }
    };
    std::process::exit(exit_code);
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn run() -> Result<RunOutcome, (Error, ColorMode)> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ClapErrorKind::DisplayHelp
            | ClapErrorKind::DisplayVersion
            | ClapErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
                err.print().map_err(|io_err| {
                    (
                        Error::new(ErrorKind::Io)
                            .with_message("failed to write help")
                            .with_source(io_err),
                        ColorMode::Auto,
                    )
                })?;
                let exit_code = if matches!(
                    err.kind(),
                    ClapErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
                ) {
                    2
                } else {
                    0
                };
                return Ok(RunOutcome::with_code(exit_code));
            }
            _ => {
                let message = clap_error_summary(&err);
                let hint = clap_error_hint(&err);
                return Err((
                    Error::new(ErrorKind::Usage)
                        .with_message(message)
                        .with_hint(hint),
                    ColorMode::Auto,
                ));
            }
        },
    };

    let color_mode = cli.color;
    let result = command_dispatch::dispatch_command(cli.command, cli.data_dir, color_mode);
    result.map_err(add_io_hint).map_err(|err| (err, color_mode))
}

#[derive(Parser)]
#[command(
    name = "canonkit",
    version,
    about = "Reference tables for Bible book orders, punctuation systems, and ISO 639-3 codes",
    help_template = r#"{about-with-newline}
{before-help}USAGE
  {usage}

COMMANDS
{subcommands}

OPTIONS
{options}

{after-help}
"#,
    long_about = None,
    before_help = r#"Tables ship embedded in the binary. Point --data-dir at a directory of
JSON dataset files to replace any table wholesale.

Mental model:
  - `book` / `order` / `punct` / `lang` query the registries
  - `export` writes the derived C and JSON tables
  - `doctor` validates datasets
"#,
    after_help = r#"EXAMPLES
  $ canonkit book show GEN
  $ canonkit order identify books.txt       # one code per line, `-` for stdin
  $ canonkit export --out DerivedFiles --include-test
  $ canonkit doctor --json

LEARN MORE
  $ canonkit <command> --help
  https://github.com/sandover/canonkit"#,
    arg_required_else_help = true,
    disable_help_subcommand = false
)]
struct Cli {
    #[arg(
        long,
        global = true,
        help = "Directory of dataset overlay files (default: embedded tables)",
        value_hint = ValueHint::DirPath
    )]
    data_dir: Option<PathBuf>,
    #[arg(
        long,
        global = true,
        default_value = "auto",
        value_enum,
        help = "Colorize stderr diagnostics and pretty JSON output: auto|always|never"
    )]
    color: ColorMode,

    #[command(subcommand)]
    command: Command,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum ColorMode {
    Auto,
    Always,
    Never,
}

impl ColorMode {
    fn use_color(self, is_tty: bool) -> bool {
        match self {
            ColorMode::Auto => is_tty,
            ColorMode::Always => true,
            ColorMode::Never => false,
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum ExportFormatCli {
    C,
    Json,
    All,
}

impl From<ExportFormatCli> for ExportFormat {
    fn from(format: ExportFormatCli) -> Self {
        match format {
            ExportFormatCli::C => ExportFormat::C,
            ExportFormatCli::Json => ExportFormat::Json,
            ExportFormatCli::All => ExportFormat::All,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    #[command(
        about = "Query the book code registry",
        after_help = r#"EXAMPLES
  $ canonkit book list
  $ canonkit book show CO1
  $ canonkit book show 1Cor --json          # OSIS and Paratext abbreviations resolve too"#
    )]
    Book {
        #[command(subcommand)]
        command: BookCommand,
    },
    #[command(
        about = "Query and identify book order systems",
        after_help = r#"EXAMPLES
  $ canonkit order list
  $ canonkit order show Septuagint
  $ cat books.txt | canonkit order identify -

  `identify` exits 3 when no known system matches the probe exactly."#
    )]
    Order {
        #[command(subcommand)]
        command: OrderCommand,
    },
    #[command(
        about = "Query and identify punctuation systems",
        after_help = r#"EXAMPLES
  $ canonkit punct list
  $ canonkit punct show English
  $ canonkit punct identify probe.json      # JSON object of the 11 fields"#
    )]
    Punct {
        #[command(subcommand)]
        command: PunctCommand,
    },
    #[command(
        about = "Query the ISO 639-3 language registry",
        after_help = r#"EXAMPLES
  $ canonkit lang show eng
  $ canonkit lang find manobo"#
    )]
    Lang {
        #[command(subcommand)]
        command: LangCommand,
    },
    #[command(
        about = "Write the derived C tables, JSON dumps, and include smoke file",
        long_about = r#"Write derived tables to a directory.

The C headers declare the fixed record layouts (reference abbreviations are
3 characters plus a NUL terminator); the C data files carry the sorted table
rows. `--include-test` adds a smoke file that #includes every header so a C
compiler can verify they parse."#,
        after_help = r#"EXAMPLES
  $ canonkit export --out DerivedFiles
  $ canonkit export --out DerivedFiles --format json
  $ canonkit export --out DerivedFiles --include-test --force
  $ gcc -c DerivedFiles/include_test.c      # headers compile cleanly"#
    )]
    Export {
        #[arg(long, value_hint = ValueHint::DirPath, help = "Output directory")]
        out: PathBuf,
        #[arg(long, value_enum, default_value = "c", help = "What to write: c|json|all")]
        format: ExportFormatCli,
        #[arg(long, help = "Also write the include_test.c smoke file")]
        include_test: bool,
        #[arg(long, help = "Overwrite existing files")]
        force: bool,
    },
    #[command(
        about = "Validate datasets and emit a diagnostic report",
        after_help = r#"EXAMPLES
  $ canonkit doctor
  $ canonkit doctor books --json
  $ canonkit --data-dir ./tables doctor

  Exits 5 when any checked table is invalid."#
    )]
    Doctor {
        #[arg(help = "Table to check: books|orders|punctuation|languages (default: all)")]
        table: Option<String>,
        #[arg(long, help = "Emit the report as JSON")]
        json: bool,
    },
    #[command(about = "Emit version info as JSON (stable, machine-readable)")]
    Version,
    #[command(about = "Generate shell completion script")]
    Completion {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
enum BookCommand {
    #[command(about = "List all book codes")]
    List {
        #[arg(long, help = "Emit JSON")]
        json: bool,
    },
    #[command(about = "Show one book record")]
    Show {
        #[arg(help = "Reference, OSIS, or Paratext abbreviation")]
        code: String,
        #[arg(long, help = "Emit JSON")]
        json: bool,
    },
}

#[derive(Subcommand)]
enum OrderCommand {
    #[command(about = "List book order systems")]
    List {
        #[arg(long, help = "Emit JSON")]
        json: bool,
    },
    #[command(about = "Show one system's ordering")]
    Show {
        #[arg(help = "System name, e.g. English")]
        system: String,
        #[arg(long, help = "Emit JSON")]
        json: bool,
    },
    #[command(about = "Match an ordered code list against known systems")]
    Identify {
        #[arg(help = "File of reference abbreviations, one per line (`-` for stdin)")]
        file: String,
        #[arg(long, help = "Emit JSON")]
        json: bool,
    },
}

#[derive(Subcommand)]
enum PunctCommand {
    #[command(about = "List punctuation systems")]
    List {
        #[arg(long, help = "Emit JSON")]
        json: bool,
    },
    #[command(about = "Show one system's fields")]
    Show {
        #[arg(help = "System name, e.g. English")]
        system: String,
        #[arg(long, help = "Emit JSON")]
        json: bool,
    },
    #[command(about = "Match a field set against known systems")]
    Identify {
        #[arg(help = "JSON file of the 11 punctuation fields (`-` for stdin)")]
        file: String,
        #[arg(long, help = "Emit JSON")]
        json: bool,
    },
}

#[derive(Subcommand)]
enum LangCommand {
    #[command(about = "List all languages")]
    List {
        #[arg(long, help = "Emit JSON")]
        json: bool,
    },
    #[command(about = "Show one language record")]
    Show {
        #[arg(help = "ISO 639-3 identifier or exact name")]
        id: String,
        #[arg(long, help = "Emit JSON")]
        json: bool,
    },
    #[command(about = "Search languages by name substring")]
    Find {
        #[arg(help = "Case-insensitive name fragment")]
        needle: String,
        #[arg(long, help = "Emit JSON")]
        json: bool,
    },
}

fn build_loader(data_dir: Option<PathBuf>) -> Loader {
    match data_dir {
        Some(dir) => Loader::new().with_data_dir(dir),
        None => Loader::new(),
    }
}

fn load_registry(data_dir: Option<PathBuf>) -> Result<Registry, Error> {
    build_loader(data_dir).load()
}

fn add_io_hint(err: Error) -> Error {
    if err.hint().is_some() {
        return err;
    }
    match err.kind() {
        ErrorKind::Io => err.with_hint("I/O error. Check the path, permissions, and disk space."),
        ErrorKind::Internal => err.with_hint(
            "Unexpected internal failure. Retry with RUST_BACKTRACE=1 and share the command if it persists.",
        ),
        _ => err,
    }
}

// ---- input helpers ----------------------------------------------------------

fn read_input_text(file: &str) -> Result<String, Error> {
    if file == "-" {
        let mut text = String::new();
        io::stdin().read_to_string(&mut text).map_err(|err| {
            Error::new(ErrorKind::Io)
                .with_message("failed to read stdin")
                .with_source(err)
        })?;
        return Ok(text);
    }
    std::fs::read_to_string(file).map_err(|err| {
        Error::new(ErrorKind::Io)
            .with_message("failed to read input file")
            .with_path(file)
            .with_source(err)
    })
}

/// One reference abbreviation per line; blank lines and `#` comments skip.
fn parse_code_lines(text: &str) -> Result<Vec<BookCode>, Error> {
    let mut codes = Vec::new();
    for (lineno, line) in text.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let code = BookCode::parse(trimmed).map_err(|err| {
            err.with_hint(format!("Line {} is not a 3-character book code.", lineno + 1))
        })?;
        codes.push(code);
    }
    if codes.is_empty() {
        return Err(Error::new(ErrorKind::Usage)
            .with_message("no book codes in input")
            .with_hint("Provide one reference abbreviation per line, e.g. GEN."));
    }
    Ok(codes)
}

/// A probe is the 11 punctuation fields as a JSON object; `name` is optional.
fn parse_punctuation_probe(text: &str) -> Result<PunctuationSystem, Error> {
    let mut value: Value = serde_json::from_str(text).map_err(|err| {
        Error::new(ErrorKind::Usage)
            .with_message("probe is not valid JSON")
            .with_source(err)
    })?;
    let Some(object) = value.as_object_mut() else {
        return Err(Error::new(ErrorKind::Usage)
            .with_message("probe must be a JSON object of punctuation fields")
            .with_hint("See `canonkit punct show English --json` for the field names."));
    };
    object.entry("name").or_insert_with(|| json!("probe"));
    serde_json::from_value(value).map_err(|err| {
        Error::new(ErrorKind::Usage)
            .with_message("probe is missing punctuation fields")
            .with_hint("See `canonkit punct show English --json` for the field names.")
            .with_source(err)
    })
}

// ---- JSON builders ----------------------------------------------------------

fn record_json<T: serde::Serialize>(record: &T) -> Value {
    serde_json::to_value(record).unwrap_or(Value::Null)
}

fn order_match_json(name: &str, result: &OrderMatch) -> Value {
    match result {
        OrderMatch::Exact => json!({ "system": name, "match": "exact" }),
        OrderMatch::DiffersAt {
            index,
            expected,
            found,
        } => json!({
            "system": name,
            "match": "differs",
            "index": index,
            "expected": expected.as_str(),
            "found": found.as_str(),
        }),
        OrderMatch::LengthMismatch { expected, found } => json!({
            "system": name,
            "match": "length",
            "expected": expected,
            "found": found,
        }),
    }
}

fn field_diffs_json(name: &str, diffs: &[FieldDiff]) -> Value {
    if diffs.is_empty() {
        return json!({ "system": name, "match": "exact" });
    }
    let fields: Vec<Value> = diffs
        .iter()
        .map(|diff| {
            json!({
                "field": diff.field,
                "expected": diff.expected,
                "found": diff.found,
            })
        })
        .collect();
    json!({ "system": name, "match": "differs", "fields": fields })
}

fn report_json(report: &ValidationReport) -> Value {
    let issues: Vec<Value> = report
        .issues
        .iter()
        .map(|issue| {
            let mut map = Map::new();
            map.insert("code".to_string(), json!(issue.code));
            map.insert("message".to_string(), json!(issue.message));
            if let Some(record) = &issue.record {
                map.insert("record".to_string(), json!(record));
            }
            Value::Object(map)
        })
        .collect();
    json!({
        "table": report.table.name(),
        "status": match report.status {
            ValidationStatus::Ok => "ok",
            ValidationStatus::Invalid => "invalid",
        },
        "checked": report.checked,
        "issues": issues,
    })
}

// ---- human emitters ---------------------------------------------------------

fn emit_table(headers: &[&str], rows: &[Vec<String>]) {
    println!("{}", render_table(headers, rows));
}

fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|header| header.chars().count()).collect();
    for row in rows {
        for (idx, width) in widths.iter_mut().enumerate() {
            let cell = row.get(idx).map(String::as_str).unwrap_or("");
            *width = (*width).max(cell.chars().count());
        }
    }

    let format_line = |cells: &[String]| -> String {
        let mut line = String::new();
        for (idx, cell) in cells.iter().enumerate() {
            if idx > 0 {
                line.push_str("  ");
            }
            line.push_str(cell);
            if idx + 1 < cells.len() {
                let pad = widths[idx].saturating_sub(cell.chars().count());
                for _ in 0..pad {
                    line.push(' ');
                }
            }
        }
        line
    };

    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(format_line(
        &headers.iter().map(|h| h.to_string()).collect::<Vec<_>>(),
    ));
    for row in rows {
        lines.push(format_line(row));
    }
    lines.join("\n")
}

fn book_row(record: &BookRecord) -> Vec<String> {
    vec![
        record.reference_abbreviation.as_str().to_string(),
        record.reference_number.to_string(),
        record.osis_abbreviation.clone().unwrap_or_default(),
        record.paratext_abbreviation.clone().unwrap_or_default(),
        record.name_english.clone(),
    ]
}

fn emit_book_human(record: &BookRecord) {
    println!(
        "{}  {}",
        record.reference_abbreviation, record.name_english
    );
    println!("  referenceNumber: {}", record.reference_number);
    if let Some(osis) = &record.osis_abbreviation {
        println!("  osis: {osis}");
    }
    if let Some(sbl) = &record.sbl_abbreviation {
        println!("  sbl: {sbl}");
    }
    if let Some(paratext) = &record.paratext_abbreviation {
        println!("  paratext: {paratext}");
    }
    if let Some(number) = record.paratext_number {
        println!("  paratextNumber: {number:02}");
    }
}

fn emit_order_human(system: &BookOrderSystem) {
    println!("{} ({} books)", system.name, system.books.len());
    if let Some(title) = &system.title {
        println!("  {title}");
    }
    for (pos, code) in system.books.iter().enumerate() {
        println!("  {:3}  {code}", pos + 1);
    }
}

fn emit_punct_human(system: &PunctuationSystem) {
    println!("{}", system.name);
    for (field, value) in canonkit::api::FIELD_NAMES.iter().zip(system.field_values()) {
        println!("  {field}: {value:?}");
    }
}

fn lang_row(record: &LanguageRecord) -> Vec<String> {
    vec![
        record.id.as_str().to_string(),
        record.name.clone(),
        record.lang_type.letter().to_string(),
        record.scope.letter().to_string(),
        record.part1_code.clone().unwrap_or_default(),
        record.part2_code.clone().unwrap_or_default(),
    ]
}

fn emit_lang_human(record: &LanguageRecord) {
    println!("{}  {}", record.id, record.name);
    println!("  type: {}", record.lang_type.describe());
    println!("  scope: {}", record.scope.describe());
    if let Some(part1) = &record.part1_code {
        println!("  part1: {part1}");
    }
    if let Some(part2) = &record.part2_code {
        println!("  part2: {part2}");
    }
}

fn emit_order_matches_human(results: &[(String, OrderMatch)], probe_len: usize) {
    for (name, result) in results {
        match result {
            OrderMatch::Exact => println!("Matched {name} ({probe_len} books)"),
            OrderMatch::DiffersAt {
                index,
                expected,
                found,
            } => println!("{name}: differs at position {index} (expected {expected}, found {found})"),
            OrderMatch::LengthMismatch { expected, found } => {
                println!("{name}: length mismatch ({expected} books vs {found})")
            }
        }
    }
}

fn emit_punct_matches_human(results: &[(String, Vec<FieldDiff>)]) {
    for (name, diffs) in results {
        if diffs.is_empty() {
            println!("Matched {name}");
        } else {
            println!("{name}: {} field(s) differ", diffs.len());
            for diff in diffs {
                println!(
                    "  {}: expected {:?}, found {:?}",
                    diff.field, diff.expected, diff.found
                );
            }
        }
    }
}

fn emit_doctor_human(report: &ValidationReport) {
    match report.status {
        ValidationStatus::Ok => {
            println!("OK: {} ({} records checked)", report.table.name(), report.checked);
        }
        ValidationStatus::Invalid => {
            println!(
                "INVALID: {} ({} issues, {} records checked)",
                report.table.name(),
                report.issue_count(),
                report.checked
            );
            for issue in &report.issues {
                match &issue.record {
                    Some(record) => {
                        println!("  - [{}] {} ({record})", issue.code, issue.message)
                    }
                    None => println!("  - [{}] {}", issue.code, issue.message),
                }
            }
        }
    }
}

fn emit_version_output(color_mode: ColorMode) {
    if io::stdout().is_terminal() {
        println!("canonkit {}", env!("CARGO_PKG_VERSION"));
    } else {
        emit_json(
            json!({
                "name": "canonkit",
                "version": env!("CARGO_PKG_VERSION"),
            }),
            color_mode,
        );
    }
}

// ---- JSON / error emission --------------------------------------------------

fn emit_json(value: Value, color_mode: ColorMode) {
    let is_tty = io::stdout().is_terminal();
    let use_color = color_mode.use_color(is_tty);
    let pretty = is_tty || use_color;
    let json = if pretty {
        if use_color {
            colorize_json(&value, true)
        } else {
            serde_json::to_string_pretty(&value)
                .unwrap_or_else(|_| "{\"error\":\"json encode failed\"}".to_string())
        }
    } else {
        serde_json::to_string(&value)
            .unwrap_or_else(|_| "{\"error\":\"json encode failed\"}".to_string())
    };
    println!("{json}");
}

#[derive(Copy, Clone, Debug)]
enum AnsiColor {
    Red,
    Yellow,
}

fn colorize_label(label: &str, enabled: bool, color: AnsiColor) -> String {
    if !enabled {
        return label.to_string();
    }
    let code = match color {
        AnsiColor::Red => "31",
        AnsiColor::Yellow => "33",
    };
    format!("\u{1b}[{code}m{label}\u{1b}[0m")
}

fn emit_error(err: &Error, color_mode: ColorMode) {
    let is_tty = io::stderr().is_terminal();
    if is_tty {
        eprintln!("{}", error_text(err, color_mode.use_color(is_tty)));
        return;
    }

    let value = error_json(err);
    let json = serde_json::to_string(&value).unwrap_or_else(|_| {
        "{\"error\":{\"kind\":\"Internal\",\"message\":\"json encode failed\"}}".to_string()
    });
    eprintln!("{json}");
}

fn error_message(err: &Error) -> String {
    if let Some(message) = err.message() {
        return message.to_string();
    }
    match err.kind() {
        ErrorKind::Internal => "internal error".to_string(),
        ErrorKind::Usage => "usage error".to_string(),
        ErrorKind::NotFound => "not found".to_string(),
        ErrorKind::AlreadyExists => "already exists".to_string(),
        ErrorKind::Invalid => "invalid data".to_string(),
        ErrorKind::Io => "i/o error".to_string(),
    }
}

fn error_causes(err: &Error) -> Vec<String> {
    let mut causes = Vec::new();
    let mut cur = err.source();
    while let Some(source) = cur {
        causes.push(source.to_string());
        cur = source.source();
    }
    causes
}

fn error_json(err: &Error) -> Value {
    let mut inner = Map::new();
    inner.insert("kind".to_string(), json!(format!("{:?}", err.kind())));
    inner.insert("message".to_string(), json!(error_message(err)));
    if let Some(hint) = err.hint() {
        inner.insert("hint".to_string(), json!(hint));
    }
    if let Some(table) = err.table() {
        inner.insert("table".to_string(), json!(table));
    }
    if let Some(code) = err.code() {
        inner.insert("code".to_string(), json!(code));
    }
    if let Some(path) = err.path() {
        inner.insert("path".to_string(), json!(path.display().to_string()));
    }
    let causes = error_causes(err);
    if !causes.is_empty() {
        inner.insert("causes".to_string(), json!(causes));
    }

    let mut outer = Map::new();
    outer.insert("error".to_string(), Value::Object(inner));
    Value::Object(outer)
}

fn error_text(err: &Error, use_color: bool) -> String {
    let mut lines = Vec::new();
    lines.push(format!(
        "{} {}",
        colorize_label("error:", use_color, AnsiColor::Red),
        error_message(err)
    ));
    if let Some(table) = err.table() {
        lines.push(format!("table: {table}"));
    }
    if let Some(code) = err.code() {
        lines.push(format!("code: {code}"));
    }
    if let Some(path) = err.path() {
        lines.push(format!("path: {}", path.display()));
    }
    if let Some(hint) = err.hint() {
        lines.push(format!(
            "{} {hint}",
            colorize_label("hint:", use_color, AnsiColor::Yellow)
        ));
    }
    for cause in error_causes(err) {
        lines.push(format!("cause: {cause}"));
    }
    lines.join("\n")
}

fn clap_error_summary(err: &clap::Error) -> String {
    for line in err.to_string().lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if let Some(rest) = trimmed.strip_prefix("error:") {
            return rest.trim().to_string();
        }
        return trimmed.to_string();
    }
    "invalid arguments".to_string()
}

fn clap_error_hint(err: &clap::Error) -> String {
    let rendered = err.to_string();
    let usage = rendered
        .lines()
        .find_map(|line| line.trim().strip_prefix("Usage: "))
        .map(str::trim);

    let Some(usage) = usage else {
        return "Try `canonkit --help`.".to_string();
    };

    let tokens: Vec<&str> = usage.split_whitespace().collect();
    let Some(pos) = tokens.iter().position(|t| *t == "canonkit") else {
        return "Try `canonkit --help`.".to_string();
    };

    let mut parts = Vec::new();
    for token in tokens.iter().skip(pos + 1) {
        if token.starts_with('-') || token.starts_with('<') || token.starts_with('[') {
            break;
        }
        parts.push(*token);
    }

    if parts.is_empty() {
        return "Try `canonkit --help`.".to_string();
    }
    format!("Try `canonkit {} --help`.", parts.join(" "))
}

#[cfg(test)]
mod tests {
    use super::{
        error_json, parse_code_lines, parse_punctuation_probe, render_table,
    };
    use canonkit::api::{Error, ErrorKind};

    #[test]
    fn render_table_pads_columns() {
        let rows = vec![
            vec!["GEN".to_string(), "1".to_string(), "Genesis".to_string()],
            vec!["REV".to_string(), "66".to_string(), "Revelation".to_string()],
        ];
        let text = render_table(&["CODE", "NUM", "NAME"], &rows);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("CODE  NUM  NAME"));
        assert!(lines[1].starts_with("GEN   1    Genesis"));
    }

    #[test]
    fn parse_code_lines_skips_blanks_and_comments() {
        let codes = parse_code_lines("# header\nGEN\n\nEXO\n").expect("codes");
        assert_eq!(codes.len(), 2);
        assert_eq!(codes[0].as_str(), "GEN");
    }

    #[test]
    fn parse_code_lines_rejects_bad_code() {
        let err = parse_code_lines("GENESIS\n").expect_err("err");
        assert_eq!(err.kind(), ErrorKind::Invalid);
        assert!(err.hint().unwrap_or_default().contains("Line 1"));
    }

    #[test]
    fn parse_code_lines_rejects_empty_input() {
        let err = parse_code_lines("# nothing\n").expect_err("err");
        assert_eq!(err.kind(), ErrorKind::Usage);
    }

    #[test]
    fn punctuation_probe_accepts_nameless_object() {
        let probe = parse_punctuation_probe(
            r#"{
                "booknameCase": "ME",
                "booknameLength": "ME",
                "punctuationAfterBookAbbreviation": ".",
                "bookChapterSeparator": " ",
                "spaceAllowedAfterBCS": "E",
                "chapterBridgeCharacter": "-",
                "chapterVerseSeparator": ":",
                "verseSeparator": ",",
                "verseBridgeCharacter": "-",
                "chapterSeparator": ";",
                "bookSeparator": ";"
            }"#,
        )
        .expect("probe");
        assert_eq!(probe.name, "probe");
        assert_eq!(probe.chapter_verse_separator, ":");
    }

    #[test]
    fn punctuation_probe_rejects_non_object() {
        let err = parse_punctuation_probe("[1, 2]").expect_err("err");
        assert_eq!(err.kind(), ErrorKind::Usage);
    }

    #[test]
    fn error_json_includes_context() {
        let err = Error::new(ErrorKind::NotFound)
            .with_message("unknown book code")
            .with_table("books")
            .with_code("XXX")
            .with_hint("Use `canonkit book list`.");
        let value = error_json(&err);
        assert_eq!(value["error"]["kind"], "NotFound");
        assert_eq!(value["error"]["table"], "books");
        assert_eq!(value["error"]["code"], "XXX");
        assert!(value["error"]["hint"].as_str().unwrap().contains("book list"));
    }
}
