mod audit;
mod commands;
mod config;
mod diagnostics;
mod directive;
mod error;
mod language;
mod lines;
mod parser;
mod registry;
mod render;
mod scanner;
mod types;
mod watch;
mod weaver;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use crate::commands::{Format, Inputs};

#[derive(Parser)]
#[command(name = "docweave", version, about = "Weave tagged source code chunks into documents")]
struct Cli {
    /// Log progress to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Weave the document without writing it; report references and unused chunks
    Check {
        #[command(flatten)]
        inputs: Inputs,
        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: Format,
    },
    /// List every chunk the sources define
    Chunks {
        /// Source files or directories
        sources: Vec<PathBuf>,
        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: Format,
    },
    /// Weave the document, then re-weave whenever it or a source changes
    Watch {
        #[command(flatten)]
        inputs: Inputs,
        /// Destination for the woven document
        #[arg(short, long)]
        output: PathBuf,
        /// Don't report chunks the document never references
        #[arg(long)]
        no_warn_unused: bool,
    },
    /// Weave source chunks into the document and write the result
    Weave {
        #[command(flatten)]
        inputs: Inputs,
        /// Destination for the woven document
        #[arg(short, long)]
        output: PathBuf,
        /// Don't report chunks the document never references
        #[arg(long)]
        no_warn_unused: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    let result = match &cli.command {
        Commands::Check { inputs, format } => commands::check(inputs, *format),
        Commands::Chunks { sources, format } => commands::chunks(sources, *format).map(|()| return ExitCode::SUCCESS),
        Commands::Watch { inputs, output, no_warn_unused } => watch::run(inputs, output, *no_warn_unused),
        Commands::Weave { inputs, output, no_warn_unused } => commands::weave(inputs, output, *no_warn_unused),
    };

    return match result {
        Ok(code) => code,
        Err(e) => {
            diagnostics::print_error(&e);
            ExitCode::from(2)
        },
    };
}

/// Route `log` output to stderr; warnings only unless verbose.
fn init_logger(verbose: bool) {
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();
}
