//! Purpose: Map parsed CLI commands onto the library API.
//! Role: Keeps `main.rs` focused on argument parsing and output plumbing.
//! Invariants: Every arm returns a RunOutcome; errors bubble as `api::Error`.

use super::*;

pub(super) fn dispatch_command(
    command: Command,
    data_dir: Option<PathBuf>,
    color_mode: ColorMode,
) -> Result<RunOutcome, Error> {
    match command {
        Command::Book { command } => match command {
            BookCommand::List { json } => {
                let registry = load_registry(data_dir)?;
                let books = registry.books();
                if json {
                    let records: Vec<Value> = books.iter().map(record_json).collect();
                    emit_json(json!({ "books": records }), color_mode);
                } else {
                    let rows: Vec<Vec<String>> = books.iter().map(book_row).collect();
                    emit_table(&["CODE", "NUM", "OSIS", "PARATEXT", "NAME"], &rows);
                }
                Ok(RunOutcome::ok())
            }
            BookCommand::Show { code, json } => {
                let registry = load_registry(data_dir)?;
                let record = registry.books().resolve(&code)?;
                if json {
                    emit_json(record_json(record), color_mode);
                } else {
                    emit_book_human(record);
                }
                Ok(RunOutcome::ok())
            }
        },

        Command::Order { command } => match command {
            OrderCommand::List { json } => {
                let registry = load_registry(data_dir)?;
                let orders = registry.orders();
                if json {
                    let systems: Vec<Value> = orders
                        .iter()
                        .map(|system| {
                            json!({
                                "name": system.name,
                                "books": system.books.len(),
                                "title": system.title,
                            })
                        })
                        .collect();
                    emit_json(json!({ "systems": systems }), color_mode);
                } else {
                    let rows: Vec<Vec<String>> = orders
                        .iter()
                        .map(|system| {
                            vec![
                                system.name.clone(),
                                system.books.len().to_string(),
                                system.title.clone().unwrap_or_default(),
                            ]
                        })
                        .collect();
                    emit_table(&["SYSTEM", "BOOKS", "TITLE"], &rows);
                }
                Ok(RunOutcome::ok())
            }
            OrderCommand::Show { system, json } => {
                let registry = load_registry(data_dir)?;
                let system = registry.orders().require(&system)?;
                if json {
                    emit_json(record_json(system), color_mode);
                } else {
                    emit_order_human(system);
                }
                Ok(RunOutcome::ok())
            }
            OrderCommand::Identify { file, json } => {
                let registry = load_registry(data_dir)?;
                let probe = parse_code_lines(&read_input_text(&file)?)?;
                let results = registry.orders().identify(&probe);
                let matched = results
                    .iter()
                    .any(|(_, result)| matches!(result, OrderMatch::Exact));
                if json {
                    let entries: Vec<Value> = results
                        .iter()
                        .map(|(name, result)| order_match_json(name, result))
                        .collect();
                    emit_json(
                        json!({
                            "probe": probe.len(),
                            "matched": matched,
                            "results": entries,
                        }),
                        color_mode,
                    );
                } else {
                    emit_order_matches_human(&results, probe.len());
                }
                if matched {
                    Ok(RunOutcome::ok())
                } else {
                    Ok(RunOutcome::with_code(to_exit_code(ErrorKind::NotFound)))
                }
            }
        },

        Command::Punct { command } => match command {
            PunctCommand::List { json } => {
                let registry = load_registry(data_dir)?;
                let punctuation = registry.punctuation();
                if json {
                    let systems: Vec<Value> = punctuation.iter().map(record_json).collect();
                    emit_json(json!({ "systems": systems }), color_mode);
                } else {
                    let rows: Vec<Vec<String>> = punctuation
                        .iter()
                        .map(|system| {
                            vec![
                                system.name.clone(),
                                system.chapter_verse_separator.clone(),
                                system.verse_separator.clone(),
                                system.book_separator.clone(),
                            ]
                        })
                        .collect();
                    emit_table(&["SYSTEM", "CH:VS", "VS,VS", "BOOK;BOOK"], &rows);
                }
                Ok(RunOutcome::ok())
            }
            PunctCommand::Show { system, json } => {
                let registry = load_registry(data_dir)?;
                let system = registry.punctuation().require(&system)?;
                if json {
                    emit_json(record_json(system), color_mode);
                } else {
                    emit_punct_human(system);
                }
                Ok(RunOutcome::ok())
            }
            PunctCommand::Identify { file, json } => {
                let registry = load_registry(data_dir)?;
                let probe = parse_punctuation_probe(&read_input_text(&file)?)?;
                let results = registry.punctuation().identify(&probe);
                let matched = results.iter().any(|(_, diffs)| diffs.is_empty());
                if json {
                    let entries: Vec<Value> = results
                        .iter()
                        .map(|(name, diffs)| field_diffs_json(name, diffs))
                        .collect();
                    emit_json(
                        json!({ "matched": matched, "results": entries }),
                        color_mode,
                    );
                } else {
                    emit_punct_matches_human(&results);
                }
                if matched {
                    Ok(RunOutcome::ok())
                } else {
                    Ok(RunOutcome::with_code(to_exit_code(ErrorKind::NotFound)))
                }
            }
        },

        Command::Lang { command } => match command {
            LangCommand::List { json } => {
                let registry = load_registry(data_dir)?;
                let languages = registry.languages();
                if json {
                    let records: Vec<Value> = languages.iter().map(record_json).collect();
                    emit_json(json!({ "languages": records }), color_mode);
                } else {
                    let rows: Vec<Vec<String>> = languages.iter().map(lang_row).collect();
                    emit_table(&["ID", "NAME", "TYPE", "SCOPE", "PART1", "PART2"], &rows);
                }
                Ok(RunOutcome::ok())
            }
            LangCommand::Show { id, json } => {
                let registry = load_registry(data_dir)?;
                let record = registry.languages().require(&id)?;
                if json {
                    emit_json(record_json(record), color_mode);
                } else {
                    emit_lang_human(record);
                }
                Ok(RunOutcome::ok())
            }
            LangCommand::Find { needle, json } => {
                let registry = load_registry(data_dir)?;
                let matches = registry.languages().find(&needle);
                if matches.is_empty() {
                    return Err(Error::new(ErrorKind::NotFound)
                        .with_message("no language names match")
                        .with_table("languages")
                        .with_code(needle)
                        .with_hint("Matching is a case-insensitive substring of the name."));
                }
                if json {
                    let records: Vec<Value> =
                        matches.iter().map(|record| record_json(record)).collect();
                    emit_json(json!({ "languages": records }), color_mode);
                } else {
                    let rows: Vec<Vec<String>> =
                        matches.iter().map(|record| lang_row(record)).collect();
                    emit_table(&["ID", "NAME", "TYPE", "SCOPE", "PART1", "PART2"], &rows);
                }
                Ok(RunOutcome::ok())
            }
        },

        Command::Export {
            out,
            format,
            include_test,
            force,
        } => {
            let registry = load_registry(data_dir)?;
            let options = ExportOptions {
                out_dir: out,
                format: format.into(),
                include_test,
                force,
            };
            let outcome = run_export(&registry, &options)?;
            if io::stdout().is_terminal() {
                for file in &outcome.files {
                    println!("wrote {} ({} bytes)", file.path.display(), file.bytes);
                }
            } else {
                emit_json(record_json(&outcome), color_mode);
            }
            Ok(RunOutcome::ok())
        }

        Command::Doctor { table, json } => {
            let tables: Vec<Table> = match table {
                Some(name) => vec![Table::parse(&name)?],
                None => Table::ALL.to_vec(),
            };
            let reports = build_loader(data_dir).doctor(&tables)?;
            let invalid = reports
                .iter()
                .any(|report| report.status == ValidationStatus::Invalid);
            if json {
                let entries: Vec<Value> = reports.iter().map(report_json).collect();
                emit_json(
                    json!({ "ok": !invalid, "reports": entries }),
                    color_mode,
                );
            } else {
                for report in &reports {
                    emit_doctor_human(report);
                }
            }
            if invalid {
                Ok(RunOutcome::with_code(to_exit_code(ErrorKind::Invalid)))
            } else {
                Ok(RunOutcome::ok())
            }
        }

        Command::Version => {
            emit_version_output(color_mode);
            Ok(RunOutcome::ok())
        }

        Command::Completion { shell } => {
            let mut command = Cli::command();
            clap_complete::aot::generate(shell, &mut command, "canonkit", &mut io::stdout());
            Ok(RunOutcome::ok())
        }
    }
}
