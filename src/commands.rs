//! Core CLI commands for docweave: weave, check, chunks.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use serde::Serialize;

use crate::audit;
use crate::config::Config;
use crate::directive::DirectivePattern;
use crate::error;
use crate::language::RendererKind;
use crate::lines;
use crate::registry::{self, Registry};
use crate::render;
use crate::scanner;
use crate::types::{ReferenceTally, UnusedChunk};
use crate::weaver::{self, Woven};

/// Report format for `check` and `chunks`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Format {
    /// Machine-readable JSON on stdout.
    Json,
    /// Human-readable lines.
    Text,
}

/// Inputs shared by every command that weaves a document.
#[derive(Debug, Clone, clap::Args)]
pub struct Inputs {
    /// Override the directive sentinel
    #[arg(long)]
    pub directive: Option<String>,
    /// Document containing directives
    pub document: PathBuf,
    /// Output markup (defaults to the config, then tex)
    #[arg(long, value_enum)]
    pub renderer: Option<RendererKind>,
    /// Source files or directories to extract chunks from
    pub sources: Vec<PathBuf>,
}

/// One chunk as listed by `chunks`.
#[derive(Serialize)]
struct ChunkSummary {
    /// Number of body lines.
    body_lines: usize,
    /// Source file.
    file: PathBuf,
    /// Group tag, empty when ungrouped.
    group: String,
    /// Start line.
    line: usize,
    /// Chunk name.
    name: String,
}

/// JSON shape of a `check` report.
#[derive(Serialize)]
struct CheckReport<'a> {
    /// References per name and group.
    tally: &'a ReferenceTally,
    /// Chunks nothing referenced.
    unused: &'a [UnusedChunk],
}

/// Everything a weave run produces, kept for reporting.
struct Run {
    /// Loaded configuration.
    config: Config,
    /// Registry the document was woven against.
    registry: Registry,
    /// Woven lines and tally.
    woven: Woven,
}

/// Weave the document and report the tally and unused chunks without
/// writing anything. Exits 1 when any chunk is unused.
///
/// # Errors
///
/// Returns errors from config loading, parsing, or weaving.
pub fn check(inputs: &Inputs, format: Format) -> Result<ExitCode, error::Error> {
    let run = run_weave(Path::new("."), inputs)?;
    let unused = audit::audit(&run.registry, &run.woven.tally);

    match format {
        Format::Json => {
            let report = CheckReport { tally: &run.woven.tally, unused: &unused };
            println!("{}", serde_json::to_string_pretty(&report)?);
        },
        Format::Text => {
            for (name, count) in &run.woven.tally.names {
                println!("{count:>4}  {name}");
            }
            for (tag, count) in &run.woven.tally.groups {
                println!("{count:>4}  ({tag})");
            }
            audit::print_warnings(&unused);
        },
    }

    if unused.is_empty() {
        let total = run.registry.names().count();
        eprintln!("All {total} chunks referenced");
        return Ok(ExitCode::SUCCESS);
    } else {
        eprintln!("{} unused chunks", unused.len());
        return Ok(ExitCode::from(1));
    }
}

/// List every chunk the sources define, in registry order.
///
/// # Errors
///
/// Returns errors from config loading, scanning, or parsing.
pub fn chunks(sources: &[PathBuf], format: Format) -> Result<(), error::Error> {
    let config = Config::load(Path::new("."))?;
    let files = scanner::scan(sources, &config.languages)?;
    let registry = registry::gather(&files)?;

    let summaries: Vec<ChunkSummary> = registry
        .chunks()
        .iter()
        .map(|c| {
            return ChunkSummary {
                body_lines: c.body.len(),
                file: c.source_file.clone(),
                group: c.group_tag.clone(),
                line: c.start_line,
                name: c.name.clone(),
            };
        })
        .collect();

    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&summaries)?),
        Format::Text => {
            for s in &summaries {
                let group = if s.group.is_empty() { String::new() } else { format!("({}) ", s.group) };
                println!("{}:{}  {group}{}  [{} lines]", s.file.display(), s.line, s.name, s.body_lines);
            }
        },
    }
    eprintln!("{} chunks in {} files", registry.len(), files.len());
    return Ok(());
}

/// Parse the sources, weave the document, and return everything produced.
///
/// # Errors
///
/// Returns the first configuration, I/O, parse, or weave error.
fn run_weave(root: &Path, inputs: &Inputs) -> Result<Run, error::Error> {
    let config = Config::load(root)?;
    let sentinel = inputs.directive.as_deref().unwrap_or(&config.directive);
    let directive = DirectivePattern::new(sentinel)?;
    let renderer = render::for_kind(inputs.renderer.unwrap_or(config.renderer));

    let files = scanner::scan(&inputs.sources, &config.languages)?;
    let registry = registry::gather(&files)?;
    let document = lines::read_lines(&inputs.document)?;
    let woven = weaver::weave(&registry, &*renderer, &directive, document)?;

    return Ok(Run { config, registry, woven });
}

/// Weave the document into `output`, then warn about unused chunks unless
/// disabled by flag or config.
///
/// # Errors
///
/// Returns errors from config loading, parsing, weaving, or writing.
pub fn weave(inputs: &Inputs, output: &Path, no_warn_unused: bool) -> Result<ExitCode, error::Error> {
    let run = run_weave(Path::new("."), inputs)?;
    lines::write_lines(output, &run.woven.lines)?;

    let directives: usize = run
        .woven
        .tally
        .names
        .values()
        .chain(run.woven.tally.groups.values())
        .sum();
    eprintln!("Wove {directives} directives into {}", output.display());

    if run.config.warn_unused && !no_warn_unused {
        audit::print_warnings(&audit::audit(&run.registry, &run.woven.tally));
    }
    return Ok(ExitCode::SUCCESS);
}
