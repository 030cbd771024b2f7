//! amplscan: Token dump for AMPL source files.
//!
//! Usage:
//!   amplscan [--config FILE] [--dump-symbols] FILE
//!
//! Prints one token per line with its position. Useful when working on the
//! scanner or checking how a file is tokenized; this is not a compiler.

use ampl_diagnostics::{messages, Diagnostic, DiagnosticCollection};
use ampl_options::AmplOptions;
use ampl_scanner::{Scanner, Token, TokenKind, TokenValue};
use ampl_symbols::{IdProperty, SymbolError, SymbolTable, ValueType};
use clap::Parser as ClapParser;
use std::fs::File;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process;

#[derive(ClapParser, Debug)]
#[command(name = "amplscan", version, about = "Dump the tokens of an AMPL source file")]
struct Cli {
    /// AMPL source file to scan.
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Path to a JSON options file.
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Register every identifier as an integer variable and print the
    /// resulting symbol table.
    #[arg(long = "dump-symbols")]
    dump_symbols: bool,
}

// ANSI color codes
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

fn main() {
    init_tracing();
    let cli = Cli::parse();
    let exit_code = run_scan(&cli);
    process::exit(exit_code);
}

/// Install a subscriber when `RUST_LOG` is set, e.g.
/// `RUST_LOG=ampl_scanner=trace` to see every token as it is produced.
fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::registry()
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .with(EnvFilter::from_default_env())
            .init();
    }
}

fn run_scan(cli: &Cli) -> i32 {
    let file_name = cli.file.display().to_string();
    let use_color = std::io::stderr().is_terminal();

    let options = match &cli.config {
        Some(path) => match AmplOptions::from_file(path) {
            Ok(options) => options,
            Err(e) => {
                let reason = e.to_string();
                let diag = Diagnostic::new(&messages::INVALID_CONFIGURATION_0, &[reason.as_str()])
                    .in_file(path.display().to_string());
                print_diagnostic(&diag, use_color);
                return 1;
            }
        },
        None => AmplOptions::default(),
    };
    tracing::debug!(?options, "loaded options");

    let source = match File::open(&cli.file) {
        Ok(file) => file,
        Err(e) => {
            tracing::debug!(error = %e, "open failed");
            let diag = Diagnostic::new(&messages::CANNOT_OPEN_FILE_0, &[file_name.as_str()]);
            print_diagnostic(&diag, use_color);
            return 1;
        }
    };

    let mut symbols = if cli.dump_symbols {
        match SymbolTable::with_options(options.symbols) {
            Ok(table) => Some(table),
            Err(e) => {
                print_error(&e.to_string(), use_color);
                return 1;
            }
        }
    } else {
        None
    };

    let mut scanner = Scanner::with_options(source, options.scanner);
    let mut reported = DiagnosticCollection::new();
    let mut token_count = 0usize;
    let mut failed = false;

    loop {
        let result = scanner.next_token();
        reported.extend(scanner.take_diagnostics());

        match result {
            Ok(token) if token.kind == TokenKind::Eof => break,
            Ok(token) => {
                token_count += 1;
                println!("{}", format_token(&token));
                if let Some(table) = symbols.as_mut() {
                    if let Err(e) = register(table, &token) {
                        reported.add(e.to_diagnostic(token.pos));
                        failed = true;
                        break;
                    }
                }
            }
            Err(e) => {
                reported.add(Diagnostic::from(&e));
                failed = true;
                break;
            }
        }
    }

    if token_count == 0 && !failed {
        reported.add(Diagnostic::new(&messages::EMPTY_SOURCE_FILE_0, &[file_name.as_str()]));
    }

    let has_errors = reported.has_errors();
    tracing::debug!(
        tokens = token_count,
        errors = reported.error_count(),
        "scan finished"
    );
    for diag in reported.into_diagnostics() {
        print_diagnostic(&diag.in_file(&file_name), use_color);
    }

    if let Some(table) = &symbols {
        print!("{}", table.debug_dump());
    }

    if failed || has_errors {
        1
    } else {
        0
    }
}

/// Add an identifier to the table unless it is already there.
fn register(table: &mut SymbolTable, token: &Token) -> Result<(), SymbolError> {
    let Some(name) = token.text().filter(|_| token.kind == TokenKind::Id) else {
        return Ok(());
    };
    match table.insert(name, IdProperty::variable(ValueType::INTEGER)) {
        Err(SymbolError::Duplicate(_)) => Ok(()),
        other => other,
    }
}

/// `line:col KIND payload`, columns padded but always space separated.
fn format_token(token: &Token) -> String {
    let kind = format!("{:?}", token.kind).to_uppercase();
    let position = token.pos.to_string();
    match &token.value {
        TokenValue::None => format!("{:<8} {}", position, kind),
        TokenValue::Number(value) => format!("{:<8} {:<9} {}", position, kind, value),
        TokenValue::Text(text) if token.kind == TokenKind::Str => {
            format!("{:<8} {:<9} {:?}", position, kind, text)
        }
        TokenValue::Text(text) => format!("{:<8} {:<9} {}", position, kind, text),
    }
}

fn print_error(msg: &str, use_color: bool) {
    if use_color {
        eprintln!("{}{}error{}: {}", BOLD, RED, RESET, msg);
    } else {
        eprintln!("error: {}", msg);
    }
}

fn print_diagnostic(diag: &Diagnostic, use_color: bool) {
    if !use_color {
        eprintln!("{}", diag);
        return;
    }
    let color = if diag.is_error() { RED } else { YELLOW };
    if let Some(ref file) = diag.file {
        eprint!("{}{}{}:", CYAN, file, RESET);
    }
    if let Some(pos) = diag.pos {
        eprint!("{}:", pos);
    }
    if diag.file.is_some() || diag.pos.is_some() {
        eprint!(" ");
    }
    eprintln!(
        "{}{}{}{}: {}",
        BOLD, color, diag.category, RESET, diag.message_text
    );
}
