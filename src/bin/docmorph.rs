//! Command-line interface for docmorph
//! This binary converts documents between Markdown, LaTeX and DOCX, and exposes the
//! intermediate representation for inspection.
//!
//! Usage:
//!   docmorph convert `<input>` --to `<format>` [--from `<format>`] [--output `<path>`]
//!   docmorph inspect `<input>` [--from `<format>`]     - Print the normalized IR as JSON
//!   docmorph validate `<file.json>`                    - Check an IR JSON file
//!   docmorph list-formats                              - List available formats
//!
//! Every subcommand accepts `--config <path>`. Without it, `docmorph.toml` in the working
//! directory is layered over the built-in defaults when present.

use clap::{Arg, ArgMatches, Command};
use docmorph::{validate_document, DocmorphConfig, FormatRegistry, Loader};
use std::io::{IsTerminal, Write};
use std::path::Path;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const LOCAL_CONFIG: &str = "docmorph.toml";

fn config_arg() -> Arg {
    Arg::new("config")
        .long("config")
        .short('c')
        .global(true)
        .help("Configuration file layered over the defaults")
}

fn from_arg() -> Arg {
    Arg::new("from")
        .long("from")
        .short('f')
        .help("Input format (default: inferred from the file extension)")
}

fn cli() -> Command {
    Command::new("docmorph")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert documents between Markdown, LaTeX and DOCX")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(config_arg())
        .subcommand(
            Command::new("convert")
                .about("Convert a document to another format")
                .arg(
                    Arg::new("input")
                        .help("Path to the input document")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("to")
                        .long("to")
                        .short('t')
                        .help("Output format (e.g., 'markdown', 'latex', 'docx')")
                        .required(true),
                )
                .arg(from_arg())
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .help("Write to this file instead of stdout"),
                ),
        )
        .subcommand(
            Command::new("inspect")
                .about("Print the normalized intermediate representation as JSON")
                .arg(
                    Arg::new("input")
                        .help("Path to the input document")
                        .required(true)
                        .index(1),
                )
                .arg(from_arg()),
        )
        .subcommand(
            Command::new("validate")
                .about("Validate an intermediate representation JSON file")
                .arg(
                    Arg::new("path")
                        .help("Path to the JSON file")
                        .required(true)
                        .index(1),
                ),
        )
        .subcommand(Command::new("list-formats").about("List available formats"))
}

#[tokio::main]
async fn main() {
    let matches = cli().get_matches();

    let config = load_config(matches.get_one::<String>("config")).unwrap_or_else(|e| {
        eprintln!("Configuration error: {}", e);
        std::process::exit(1);
    });
    init_logging(&config);
    let registry = FormatRegistry::with_config(&config);

    match matches.subcommand() {
        Some(("convert", convert_matches)) => handle_convert_command(&registry, convert_matches).await,
        Some(("inspect", inspect_matches)) => handle_inspect_command(&registry, inspect_matches).await,
        Some(("validate", validate_matches)) => {
            let path = validate_matches
                .get_one::<String>("path")
                .expect("path is required");
            handle_validate_command(path);
        }
        Some(("list-formats", _)) => handle_list_formats_command(&registry),
        _ => unreachable!(),
    }
}

fn load_config(path: Option<&String>) -> Result<DocmorphConfig, config::ConfigError> {
    let loader = match path {
        Some(path) => Loader::new().with_file(path),
        None => Loader::new().with_optional_file(LOCAL_CONFIG),
    };
    loader.build()
}

/// `RUST_LOG` wins over the configured filter. Logs go to stderr, stdout carries documents.
fn init_logging(config: &DocmorphConfig) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.logging.filter.as_str().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("Error: {}", message);
    std::process::exit(1);
}

fn read_input(path: &str) -> Vec<u8> {
    std::fs::read(path).unwrap_or_else(|e| fail(format!("cannot read {}: {}", path, e)))
}

/// Explicit `--from`, else the format claiming the file extension.
fn input_format(registry: &FormatRegistry, matches: &ArgMatches, path: &str) -> String {
    if let Some(from) = matches.get_one::<String>("from") {
        return from.clone();
    }
    let extension = Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("");
    match registry.for_extension(extension) {
        Some(format) => format.name().to_string(),
        None => fail(format!(
            "cannot infer the format of {}, pass --from (available: {})",
            path,
            registry.list_formats().join(", ")
        )),
    }
}

/// Handle the convert command
async fn handle_convert_command(registry: &FormatRegistry, matches: &ArgMatches) {
    let path = matches
        .get_one::<String>("input")
        .expect("input is required");
    let to = matches.get_one::<String>("to").expect("to is required");
    let from = input_format(registry, matches, path);

    let target = registry.get(to).unwrap_or_else(|e| fail(e));
    let output_path = matches.get_one::<String>("output");
    if target.is_binary() && output_path.is_none() && std::io::stdout().is_terminal() {
        fail(format!(
            "'{}' output is binary, pass --output or redirect stdout",
            to
        ));
    }

    let input = read_input(path);
    let output = registry
        .convert(&input, &from, to)
        .await
        .unwrap_or_else(|e| fail(e));

    match output_path {
        Some(output_path) => std::fs::write(output_path, &output)
            .unwrap_or_else(|e| fail(format!("cannot write {}: {}", output_path, e))),
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(&output)
                .and_then(|_| stdout.flush())
                .unwrap_or_else(|e| fail(e));
        }
    }
}

/// Handle the inspect command
async fn handle_inspect_command(registry: &FormatRegistry, matches: &ArgMatches) {
    let path = matches
        .get_one::<String>("input")
        .expect("input is required");
    let from = input_format(registry, matches, path);

    let input = read_input(path);
    let doc = registry
        .parse(&input, &from)
        .await
        .unwrap_or_else(|e| fail(e));
    let json = serde_json::to_string_pretty(&doc).unwrap_or_else(|e| fail(e));
    println!("{}", json);
}

/// Handle the validate command
fn handle_validate_command(path: &str) {
    let source = String::from_utf8(read_input(path))
        .unwrap_or_else(|e| fail(format!("{} is not UTF-8: {}", path, e)));
    let value: serde_json::Value =
        serde_json::from_str(&source).unwrap_or_else(|e| fail(format!("invalid JSON: {}", e)));

    let violations = validate_document(&value);
    if violations.is_empty() {
        println!("{}: valid", path);
        return;
    }
    for violation in &violations {
        println!("{}", violation);
    }
    eprintln!("{} violation(s) in {}", violations.len(), path);
    std::process::exit(1);
}

/// Handle the list-formats command
fn handle_list_formats_command(registry: &FormatRegistry) {
    println!("Available formats:\n");
    for name in registry.list_formats() {
        if let Ok(format) = registry.get(&name) {
            println!("  {} (.{})", name, format.file_extensions().join(", ."));
            println!("    {}", format.description());
            println!();
        }
    }
}
