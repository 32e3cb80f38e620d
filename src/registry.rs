//! Chunk registry: every parsed fragment, indexed by name and by group tag.
//!
//! Source files are parsed concurrently, one worker per file, all feeding a
//! single bounded queue drained by the aggregator.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender};

use crate::error::Error;
use crate::language::Language;
use crate::lines;
use crate::parser;
use crate::types::{Chunk, ChunkQuery};

/// Capacity of the queue between parser workers and the aggregator.
const QUEUE_CAPACITY: usize = 64;

/// A source file paired with the descriptor chosen for it.
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// Descriptor used to recognise markers in this file.
    pub language: Arc<Language>,
    /// Path to the file.
    pub path: PathBuf,
}

/// Read-only index of parsed chunks. Fragment lists keep discovery order.
#[derive(Debug, Default)]
pub struct Registry {
    /// Fragments keyed by group tag; ungrouped chunks are absent.
    by_group: HashMap<String, Vec<Arc<Chunk>>>,
    /// Fragments keyed by chunk name.
    by_name: HashMap<String, Vec<Arc<Chunk>>>,
    /// Every chunk in discovery order.
    ordered: Vec<Arc<Chunk>>,
}

impl Registry {
    /// Build a registry from a chunk stream, preserving arrival order.
    pub fn aggregate<I>(chunks: I) -> Self
    where
        I: IntoIterator<Item = Chunk>,
    {
        let mut registry = Self::default();
        for chunk in chunks {
            registry.insert(chunk);
        }
        return registry;
    }

    /// Every chunk in discovery order.
    pub fn chunks(&self) -> &[Arc<Chunk>] {
        return &self.ordered;
    }

    /// Fragments answering a directive query, first-discovered first.
    pub fn fragments(&self, query: &ChunkQuery) -> Option<&[Arc<Chunk>]> {
        let list = match query {
            ChunkQuery::Group(tag) => self.by_group.get(tag),
            ChunkQuery::Name(name) => self.by_name.get(name),
        };
        return list.map(Vec::as_slice).filter(|l| return !l.is_empty());
    }

    /// Add one chunk to the name index and, when tagged, the group index.
    fn insert(&mut self, chunk: Chunk) {
        let chunk = Arc::new(chunk);
        if chunk.is_grouped() {
            self.by_group
                .entry(chunk.group_tag.clone())
                .or_default()
                .push(Arc::clone(&chunk));
        }
        self.by_name
            .entry(chunk.name.clone())
            .or_default()
            .push(Arc::clone(&chunk));
        self.ordered.push(chunk);
    }

    /// Number of chunks registered.
    pub fn len(&self) -> usize {
        return self.ordered.len();
    }

    /// Chunk names with their fragments, in no particular order.
    pub fn names(&self) -> impl Iterator<Item = (&str, &[Arc<Chunk>])> {
        return self
            .by_name
            .iter()
            .map(|(name, fragments)| return (name.as_str(), fragments.as_slice()));
    }
}

/// What a parser worker hands to the aggregator.
enum Message {
    /// A finished chunk from the source at `index`.
    Chunk {
        /// The parsed chunk.
        chunk: Chunk,
        /// Position of the chunk's file in the source list.
        index: usize,
    },
    /// The worker's file could not be read or parsed.
    Failed(Error),
}

/// Parse every source concurrently and aggregate the results.
///
/// Each file gets its own worker; the workers share one bounded queue, so a
/// slow aggregator applies backpressure instead of buffering everything.
/// Fragment lists are ordered by the sources' position in `sources`, then by
/// position within the file, whatever order the workers finish in.
///
/// # Errors
///
/// Returns the first read or parse error any worker reports.
pub fn gather(sources: &[SourceFile]) -> Result<Registry, Error> {
    let (tx, rx) = crossbeam_channel::bounded::<Message>(QUEUE_CAPACITY);
    return std::thread::scope(|scope| {
        for (index, source) in sources.iter().enumerate() {
            let tx = tx.clone();
            scope.spawn(move || return produce(index, source, &tx));
        }
        drop(tx);
        return collect(rx, sources.len());
    });
}

/// Drain the queue until every worker has hung up. On failure the receiver
/// is dropped so blocked workers wake up and exit.
fn collect(rx: Receiver<Message>, source_count: usize) -> Result<Registry, Error> {
    let mut arrivals: Vec<(usize, Chunk)> = Vec::new();
    for message in &rx {
        match message {
            Message::Chunk { chunk, index } => arrivals.push((index, chunk)),
            Message::Failed(e) => return Err(e),
        }
    }
    arrivals.sort_by_key(|&(index, _)| return index);
    log::info!("gathered {} chunks from {source_count} sources", arrivals.len());
    return Ok(Registry::aggregate(arrivals.into_iter().map(|(_, chunk)| return chunk)));
}

/// Worker body: read and parse one file, then stream its chunks.
fn produce(index: usize, source: &SourceFile, tx: &Sender<Message>) {
    let parsed = lines::read_lines(&source.path)
        .and_then(|lines| return parser::parse(&source.language, &source.path, &lines));
    match parsed {
        Err(e) => {
            let _ = tx.send(Message::Failed(e));
        },
        Ok(chunks) => {
            for chunk in chunks {
                if tx.send(Message::Chunk { chunk, index }).is_err() {
                    return;
                }
            }
        },
    }
    return;
}
