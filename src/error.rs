/// Crate-level error types for docweave diagnostics.
use std::path::PathBuf;

/// All errors in docweave carry enough context to produce a useful diagnostic
/// without a debugger. Each variant names the file, line, or chunk at fault.
/// Every variant is fatal for the run that produces it.
#[allow(clippy::error_impl_error, reason = "crate-internal error type in binary")]
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An end marker appeared while no chunk was open.
    #[error("dangling end marker in {} at line {line}", file.display())]
    DanglingEnd {
        /// Source file containing the marker.
        file: PathBuf,
        /// One-based line number of the end marker.
        line: usize,
    },

    /// A referenced source or document file does not exist on disk.
    #[error("file not found: {}", path.display())]
    FileNotFound {
        /// Path to the missing file.
        path: PathBuf,
    },

    /// The configured directive sentinel does not produce a usable pattern.
    #[error("invalid directive sentinel `{sentinel}`: {reason}")]
    InvalidDirective {
        /// Reason the sentinel was rejected.
        reason: String,
        /// Sentinel text as configured.
        sentinel: String,
    },

    /// A language match rule is not a valid regular expression.
    #[error("invalid match rule `{pattern}`: {reason}")]
    InvalidMatchRule {
        /// Match rule as written in the language table.
        pattern: String,
        /// Compiler message for the rejected pattern.
        reason: String,
    },

    /// Underlying I/O error from the filesystem.
    #[error("io: {0}")]
    Io(
        /// The wrapped I/O error.
        #[from]
        std::io::Error,
    ),

    /// JSON serialization of a report failed.
    #[error("json: {0}")]
    Json(
        /// The wrapped JSON error.
        #[from]
        serde_json::Error,
    ),

    /// A directive names a chunk that no source file defines.
    #[error("missing chunk: `{name}`")]
    MissingChunk {
        /// Chunk name requested by the directive.
        name: String,
    },

    /// A directive names a group tag that no source file uses.
    #[error("missing group: `({tag})`")]
    MissingGroup {
        /// Group tag requested by the directive.
        tag: String,
    },

    /// No language descriptor matches a source file.
    #[error("no language matches {}", file.display())]
    NoLanguage {
        /// Source file that could not be classified.
        file: PathBuf,
    },

    /// TOML deserialization failed.
    #[error("toml deserialize: {0}")]
    TomlDe(
        /// The wrapped TOML deserialization error.
        #[from]
        toml::de::Error,
    ),

    /// A begin marker carries no chunk name.
    #[error("unnamed chunk in {} at line {line}", file.display())]
    UnnamedChunk {
        /// Source file containing the marker.
        file: PathBuf,
        /// One-based line number of the begin marker.
        line: usize,
    },

    /// A source file ended while a chunk was still open.
    #[error("end of file inside chunk `{name}` in {} (opened at line {start_line})", file.display())]
    UnterminatedAtEof {
        /// Source file that ended early.
        file: PathBuf,
        /// Name of the chunk left open.
        name: String,
        /// One-based line number of the unterminated begin marker.
        start_line: usize,
    },

    /// The filesystem watcher could not be set up.
    #[error("watch: {reason}")]
    Watch {
        /// Description of the watcher failure.
        reason: String,
    },
}
