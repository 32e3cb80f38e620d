/// Core domain types for docweave chunks, references, and warnings.
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use crate::language::Language;

/// One contiguous annotated region of one source file.
/// Built by the parser when its region closes; immutable afterwards.
#[derive(Debug, Clone)]
pub struct Chunk {
    /// Raw lines between the opening and closing markers.
    pub body: Vec<String>,
    /// Optional secondary key; empty means ungrouped.
    pub group_tag: String,
    /// Leading whitespace of the opening marker line.
    pub indentation: String,
    /// Descriptor of the language the chunk was parsed under.
    pub language: Arc<Language>,
    /// Canonical chunk name, never empty.
    pub name: String,
    /// Source file the chunk came from.
    pub source_file: PathBuf,
    /// One-based line number of the opening marker.
    pub start_line: usize,
}

impl Chunk {
    /// Whether the chunk belongs to a group.
    pub fn is_grouped(&self) -> bool {
        return !self.group_tag.is_empty();
    }

    /// `file:line` location used in renderings and diagnostics.
    pub fn location(&self) -> String {
        return format!("{}:{}", self.source_file.display(), self.start_line);
    }
}

/// What a document directive asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChunkQuery {
    /// Every fragment tagged `(tag)`.
    Group(String),
    /// Every fragment sharing this name.
    Name(String),
}

/// How many times each chunk name and group tag was referenced.
/// Returned by the weaver, consumed by the auditor.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct ReferenceTally {
    /// Directive count per group tag.
    pub groups: BTreeMap<String, usize>,
    /// Directive count per chunk name.
    pub names: BTreeMap<String, usize>,
}

impl ReferenceTally {
    /// Number of directives that named this group tag.
    pub fn group_count(&self, tag: &str) -> usize {
        return self.groups.get(tag).copied().unwrap_or(0);
    }

    /// Number of directives that named this chunk.
    pub fn name_count(&self, name: &str) -> usize {
        return self.names.get(name).copied().unwrap_or(0);
    }

    /// Count one directive.
    pub fn record(&mut self, query: &ChunkQuery) {
        let (map, key) = match query {
            ChunkQuery::Group(tag) => (&mut self.groups, tag),
            ChunkQuery::Name(name) => (&mut self.names, name),
        };
        let count = map.entry(key.clone()).or_insert(0);
        *count = count.saturating_add(1);
    }
}

/// Advisory finding: a chunk that no directive pulled into the document.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct UnusedChunk {
    /// Source file of the chunk's first fragment.
    pub file: PathBuf,
    /// Chunk name.
    pub name: String,
    /// Start line of the chunk's first fragment.
    pub start_line: usize,
}
