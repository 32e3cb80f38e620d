use std::path::Path;

use crate::error::Error;

const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// Render an error as valid markdown with bold headings and print to stderr.
pub fn print_error(e: &Error) {
    let md = render_error(e);
    for line in md.lines() {
        if line.starts_with('#') {
            eprintln!("{BOLD}{line}{RESET}");
        } else {
            eprintln!("{line}");
        }
    }
}

/// Render an error as a structured markdown diagnostic.
///
/// Each variant produces a block with what happened and, where there is a
/// single obvious remedy, how to fix it.
pub fn render_error(e: &Error) -> String {
    match e {
        Error::DanglingEnd { file, line } => render_dangling_end(file, *line),
        Error::UnterminatedAtEof { file, name, start_line } => render_unterminated(file, name, *start_line),
        Error::UnnamedChunk { file, line } => render_unnamed_chunk(file, *line),
        Error::MissingChunk { name } => render_missing_chunk(name),
        Error::MissingGroup { tag } => render_missing_group(tag),
        Error::NoLanguage { file } => render_no_language(file),
        _ => render_generic(e),
    }
}

fn render_generic(e: &Error) -> String {
    match e {
        Error::FileNotFound { path } => format!("\
# Error: File Not Found

`{}` does not exist.
", path.display()),

        Error::InvalidMatchRule { pattern, reason } => format!("\
# Error: Invalid Match Rule

`{pattern}` is not a valid regular expression: {reason}

## Fix

Correct the `match` key of the language in `.docweave.toml`.
"),

        Error::InvalidDirective { sentinel, reason } => format!("\
# Error: Invalid Directive Sentinel

`{sentinel}` cannot be used as a directive sentinel: {reason}
"),

        Error::Io(e) => format!("\
# Error: I/O

{e}
"),
        Error::TomlDe(e) => format!("\
# Error: Invalid Config

{e}
"),
        // Already handled in render_error, but need exhaustive match.
        _ => format!("\
# Error

{e}
"),
    }
}

fn render_dangling_end(file: &Path, line: usize) -> String {
    format!("\
# Error: Dangling End Marker

`{}:{line}` closes a chunk, but no chunk is open.

## Fix

Add a `BEGIN` marker above it, or delete the stray `END`.
", file.display())
}

fn render_unterminated(file: &Path, name: &str, start_line: usize) -> String {
    format!("\
# Error: Unterminated Chunk

`{}` ends while chunk `{name}` (opened at line {start_line}) is still open.

## Fix

The last chunk of a file needs an explicit `END` marker.
", file.display())
}

fn render_unnamed_chunk(file: &Path, line: usize) -> String {
    format!("\
# Error: Unnamed Chunk

The `BEGIN` marker at `{}:{line}` has no chunk name.
", file.display())
}

fn render_missing_chunk(name: &str) -> String {
    format!("\
# Error: Missing Chunk

The document references `{name}`, but no source file defines it.

## Fix

List the chunks the sources define:

    docweave chunks <SOURCES>
")
}

fn render_missing_group(tag: &str) -> String {
    format!("\
# Error: Missing Group

The document references group `({tag})`, but no chunk carries that tag.

## Fix

Tag chunks with `BEGIN({tag}) <name>`, or reference a chunk by name.
")
}

fn render_no_language(file: &Path) -> String {
    format!("\
# Error: Unknown Language

No language matches `{}`.

## Fix

Add it to `.docweave.toml`:

    [[languages]]
    name = \"mylang\"
    match = '\\.ext$'
    comment = \"//\"
", file.display())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn dangling_end_names_file_and_line() {
        let md = render_error(&Error::DanglingEnd { file: PathBuf::from("src/lib.rs"), line: 42 });
        assert!(md.starts_with("# Error: Dangling End Marker"));
        assert!(md.contains("`src/lib.rs:42`"));
    }

    #[test]
    fn missing_chunk_suggests_listing() {
        let md = render_error(&Error::MissingChunk { name: "Parse args".to_string() });
        assert!(md.contains("`Parse args`"));
        assert!(md.contains("docweave chunks"));
    }

    #[test]
    fn other_errors_fall_back_to_display() {
        let md = render_error(&Error::Watch { reason: "inotify limit".to_string() });
        assert!(md.contains("inotify limit"));
    }
}
