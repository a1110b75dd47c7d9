// Inherit lint configuration from lib.rs for consistency
#![allow(clippy::missing_errors_doc, clippy::needless_pass_by_value)]

use clap::Parser;
use serde::Serialize;

use ratecard::cli::commands::{Cli, Command, DocumentArgs};
use ratecard::cli::output;
use ratecard::config::Config;
use ratecard::operations::{self, Conversion};

fn main() {
    init_tracing();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{}", output::format_error(&e));
        std::process::exit(1);
    }
}

/// Logs go to stderr; stdout carries the JSON summary.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

fn run(cli: Cli) -> CmdResult {
    let mut config = match cli.root.as_deref() {
        Some(root) => Config::new(root),
        None => Config::from_cwd().map_err(map_err)?,
    };
    if cli.pretty {
        config.settings.output.format = "pretty".into();
    }

    match cli.command {
        Command::Extract { source, doc } => {
            if let Some(source) = source {
                config.settings.paths.rate_card_source = source;
            }
            cmd_extract(&mut config, doc)
        }
        Command::Restore { doc } => cmd_restore(&mut config, doc),
        Command::Suppliers { source, doc } => {
            if let Some(source) = source {
                config.settings.paths.suppliers_source = source;
            }
            cmd_suppliers(&mut config, doc)
        }
        Command::Show { write_defaults } => cmd_show(&config, write_defaults),
    }
}

type CmdResult = Result<(), Box<dyn std::fmt::Display>>;

fn map_err(e: impl std::fmt::Display + 'static) -> Box<dyn std::fmt::Display> {
    Box::new(e.to_string())
}

fn apply_document_args(config: &mut Config, args: &DocumentArgs) {
    if let Some(document) = &args.document {
        config.settings.paths.document.clone_from(document);
    }
}

/// Print the merged document when previewing, else the summary.
fn emit<T: Serialize>(config: &Config, run: Conversion<T>) {
    match run.preview {
        Some(document) => println!("{document}"),
        None => println!(
            "{}",
            output::format_summary(&run.summary, config.settings.output.is_pretty())
        ),
    }
}

fn cmd_extract(config: &mut Config, args: DocumentArgs) -> CmdResult {
    apply_document_args(config, &args);
    let run = operations::run_extract(config, args.preview).map_err(map_err)?;
    emit(config, run);
    Ok(())
}

fn cmd_restore(config: &mut Config, args: DocumentArgs) -> CmdResult {
    apply_document_args(config, &args);
    let run = operations::run_restore(config, args.preview).map_err(map_err)?;
    emit(config, run);
    Ok(())
}

fn cmd_suppliers(config: &mut Config, args: DocumentArgs) -> CmdResult {
    apply_document_args(config, &args);
    let run = operations::run_suppliers(config, args.preview).map_err(map_err)?;
    emit(config, run);
    Ok(())
}

fn cmd_show(config: &Config, write_defaults: bool) -> CmdResult {
    let result = operations::show_config(config, write_defaults).map_err(map_err)?;
    println!(
        "{}",
        output::format_summary(&result, config.settings.output.is_pretty())
    );
    Ok(())
}
