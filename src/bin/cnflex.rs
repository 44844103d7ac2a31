//! Command-line interface for cnflex
//! This binary tokenizes OpenSSL configuration files for inspection and highlighting.
//!
//! Usage:
//!   cnflex tokenize `<path>` [--format `<format>`] [--raw] [--lexer `<alias>`] [--config `<file>`]
//!   cnflex detect `<path>`                                  - Print the lexer that would be picked
//!   cnflex list-lexers                                    - List all registered lexers

use clap::{Arg, ArgAction, Command};
use cnflex::cnf::config::Loader;
use cnflex::cnf::formats::Format;
use cnflex::cnf::{Lexer, LexerRegistry, Result, ScanOptions};
use std::path::Path;
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let matches = Command::new("cnflex")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A lexer for OpenSSL configuration files")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("tokenize")
                .about("Print the token stream of a file")
                .arg(
                    Arg::new("path")
                        .help("Path to the configuration file")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .help("Output format (plain, json, yaml, html)")
                        .default_value("plain"),
                )
                .arg(
                    Arg::new("raw")
                        .long("raw")
                        .help("Skip merging adjacent tokens of the same kind")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("lexer")
                        .long("lexer")
                        .short('l')
                        .help("Lexer alias (default: picked by file name, then content)"),
                )
                .arg(
                    Arg::new("config")
                        .long("config")
                        .short('c')
                        .help("Configuration file layered over the defaults"),
                ),
        )
        .subcommand(
            Command::new("detect")
                .about("Print the lexer picked for a file")
                .arg(
                    Arg::new("path")
                        .help("Path to the file")
                        .required(true)
                        .index(1),
                ),
        )
        .subcommand(Command::new("list-lexers").about("List registered lexers"))
        .get_matches();

    let result = match matches.subcommand() {
        Some(("tokenize", tokenize_matches)) => {
            let path = tokenize_matches.get_one::<String>("path").unwrap();
            let format = tokenize_matches.get_one::<String>("format").unwrap();
            handle_tokenize_command(
                path,
                format,
                tokenize_matches.get_flag("raw"),
                tokenize_matches.get_one::<String>("lexer").map(String::as_str),
                tokenize_matches.get_one::<String>("config").map(String::as_str),
            )
        }
        Some(("detect", detect_matches)) => {
            let path = detect_matches.get_one::<String>("path").unwrap();
            handle_detect_command(path)
        }
        Some(("list-lexers", _)) => {
            handle_list_lexers_command();
            Ok(())
        }
        _ => unreachable!(),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Pick a lexer: explicit alias, then file name, then content, then OpenSSL.
fn select_lexer<'r>(
    registry: &'r LexerRegistry,
    alias: Option<&str>,
    path: &str,
    source: &str,
) -> Result<&'r dyn Lexer> {
    if let Some(alias) = alias {
        return registry.get_by_name(alias);
    }
    if let Ok(lexer) = registry.for_filename(Path::new(path)) {
        return Ok(lexer);
    }
    match registry.guess(source) {
        Some(lexer) => Ok(lexer),
        None => registry.get_by_name("openssl"),
    }
}

/// Handle the tokenize command
fn handle_tokenize_command(
    path: &str,
    format: &str,
    raw: bool,
    alias: Option<&str>,
    config: Option<&str>,
) -> Result<()> {
    let format: Format = format.parse()?;
    let source = std::fs::read_to_string(path)?;

    let mut loader = Loader::new();
    if let Some(config) = config {
        loader = loader.with_file(config);
    }
    let options = ScanOptions::from(&loader.build()?);
    debug!(?options, "scan options");

    let registry = LexerRegistry::with_options(options);
    let lexer = select_lexer(&registry, alias, path, &source)?;
    debug!(lexer = lexer.name(), raw, "selected lexer");

    let output = if raw {
        format.render(&source, lexer.tokenize_raw(&source))?
    } else {
        format.render(&source, lexer.tokenize(&source))?
    };

    print!("{}", output);
    Ok(())
}

/// Handle the detect command
fn handle_detect_command(path: &str) -> Result<()> {
    let source = std::fs::read_to_string(path)?;
    let registry = LexerRegistry::default();
    let lexer = registry
        .for_filename(Path::new(path))
        .ok()
        .or_else(|| registry.guess(&source));
    match lexer {
        Some(lexer) => println!("{}", lexer.name()),
        None => println!("unknown"),
    }
    Ok(())
}

/// Handle the list-lexers command
fn handle_list_lexers_command() {
    let registry = LexerRegistry::default();
    println!("Available lexers:\n");
    for lexer in registry.list_lexers() {
        println!("  {}", lexer.name());
        println!("    aliases: {}", lexer.aliases().join(", "));
        println!("    filenames: {}", lexer.filenames().join(", "));
    }
}
