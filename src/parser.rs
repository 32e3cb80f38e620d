//! Chunk parser: a line-at-a-time state machine over one source file.
//!
//! A begin marker opens a chunk, an end marker closes it, and a begin marker
//! seen while a chunk is open closes the open chunk and starts the next one.
//! Only the last chunk of a run needs an explicit end marker.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use regex::{Captures, Regex};

use crate::error::Error;
use crate::language::Language;
use crate::types::Chunk;

/// Begin and end marker patterns for one comment leader.
#[derive(Debug, Clone)]
pub struct Markers {
    /// Captures indentation, optional group tag, and name.
    begin: Regex,
    /// Matches a bare end marker.
    end: Regex,
}

impl Markers {
    /// Compile the marker patterns for a comment leader.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidMatchRule` if the leader yields an unusable pattern.
    pub fn for_leader(leader: &str) -> Result<Self, Error> {
        let leader = regex::escape(leader.trim_end());
        let begin = compile_marker(&format!(
            r"^(\s*){leader}\s*BEGIN(?:\(([^)]*)\)\s*|\s+|$)(.*?)\s*$"
        ))?;
        let end = compile_marker(&format!(r"^\s*{leader}\s*END\s*$"))?;
        return Ok(Self { begin, end });
    }
}

/// Compile one marker pattern.
fn compile_marker(pattern: &str) -> Result<Regex, Error> {
    return Regex::new(pattern).map_err(|e| {
        return Error::InvalidMatchRule {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        };
    });
}

/// The chunk currently being accumulated.
#[derive(Debug)]
struct OpenChunk {
    /// Lines collected so far.
    body: Vec<String>,
    /// Group tag from the begin marker, possibly empty.
    group_tag: String,
    /// Whitespace before the comment leader.
    indentation: String,
    /// Chunk name from the begin marker.
    name: String,
    /// Line number of the begin marker.
    start_line: usize,
}

/// Incremental parser for one file. Feed it lines in order, then `finish`.
#[derive(Debug)]
pub struct ChunkParser {
    /// File the lines come from.
    file: PathBuf,
    /// Descriptor every emitted chunk points at.
    language: Arc<Language>,
    /// Number of lines consumed so far.
    line_number: usize,
    /// Compiled marker patterns.
    markers: Markers,
    /// The open chunk, if any.
    open: Option<OpenChunk>,
}

impl ChunkParser {
    /// Start parsing `file` under `language`.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidMatchRule` if the marker patterns cannot be built.
    pub fn new(language: Arc<Language>, file: &Path) -> Result<Self, Error> {
        let markers = Markers::for_leader(&language.comment_leader)?;
        return Ok(Self {
            file: file.to_path_buf(),
            language,
            line_number: 0,
            markers,
            open: None,
        });
    }

    /// Consume the next line. Returns a chunk when this line closed one.
    ///
    /// # Errors
    ///
    /// Returns `Error::DanglingEnd` for an end marker with no open chunk,
    /// or `Error::UnnamedChunk` for a begin marker without a name.
    pub fn feed(&mut self, line: &str) -> Result<Option<Chunk>, Error> {
        self.line_number = self.line_number.saturating_add(1);

        if let Some(caps) = self.markers.begin.captures(line) {
            let next = self.open_from_marker(&caps)?;
            let closed = self.open.replace(next).map(|open| return self.close(open));
            return Ok(closed);
        }

        if self.markers.end.is_match(line) {
            return match self.open.take() {
                Some(open) => Ok(Some(self.close(open))),
                None => Err(Error::DanglingEnd {
                    file: self.file.clone(),
                    line: self.line_number,
                }),
            };
        }

        if let Some(open) = self.open.as_mut() {
            open.body.push(line.to_string());
        }
        return Ok(None);
    }

    /// Signal end of input.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnterminatedAtEof` if a chunk is still open.
    pub fn finish(self) -> Result<(), Error> {
        return match self.open {
            Some(open) => Err(Error::UnterminatedAtEof {
                file: self.file,
                name: open.name,
                start_line: open.start_line,
            }),
            None => Ok(()),
        };
    }

    /// Turn an open chunk into a finished one.
    fn close(&self, open: OpenChunk) -> Chunk {
        return Chunk {
            body: open.body,
            group_tag: open.group_tag,
            indentation: open.indentation,
            language: Arc::clone(&self.language),
            name: open.name,
            source_file: self.file.clone(),
            start_line: open.start_line,
        };
    }

    /// Build the open-chunk state from a begin marker match.
    fn open_from_marker(&self, caps: &Captures<'_>) -> Result<OpenChunk, Error> {
        let group = |i: usize| return caps.get(i).map_or("", |m| return m.as_str());
        let name = group(3).trim();
        if name.is_empty() {
            return Err(Error::UnnamedChunk {
                file: self.file.clone(),
                line: self.line_number,
            });
        }
        return Ok(OpenChunk {
            body: Vec::new(),
            group_tag: group(2).trim().to_string(),
            indentation: group(1).to_string(),
            name: name.to_string(),
            start_line: self.line_number,
        });
    }
}

/// Parse a whole file's lines into chunks, in file order.
/// Never returns a partial result: any malformed marker fails the whole file.
///
/// # Errors
///
/// Returns `Error::DanglingEnd`, `Error::UnnamedChunk`, or `Error::UnterminatedAtEof`.
pub fn parse<I, S>(language: &Arc<Language>, file: &Path, lines: I) -> Result<Vec<Chunk>, Error>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut parser = ChunkParser::new(Arc::clone(language), file)?;
    let mut chunks = Vec::new();
    for line in lines {
        if let Some(chunk) = parser.feed(line.as_ref())? {
            chunks.push(chunk);
        }
    }
    parser.finish()?;
    log::debug!("parsed {} chunks from {}", chunks.len(), file.display());
    return Ok(chunks);
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lang(leader: &str) -> Arc<Language> {
        return Arc::new(Language::new("test", r".*", leader, HashMap::new()).unwrap());
    }

    #[test]
    fn single_chunk_with_explicit_end() {
        let chunks = parse(&lang("//"), Path::new("a.go"), ["// BEGIN Hello", "print(1)", "// END"]).unwrap();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].name, "Hello");
        assert_eq!(chunks[0].start_line, 1);
        assert_eq!(chunks[0].body, vec!["print(1)"]);
        assert_eq!(chunks[0].source_file, PathBuf::from("a.go"));
        assert!(!chunks[0].is_grouped());
    }

    #[test]
    fn begin_implicitly_closes_open_chunk() {
        let chunks = parse(&lang("#"), Path::new("a.py"), ["# BEGIN A", "x", "# BEGIN B", "y", "# END"]).unwrap();
        let summary: Vec<(&str, usize, Vec<String>)> = chunks
            .iter()
            .map(|c| (c.name.as_str(), c.start_line, c.body.clone()))
            .collect();
        assert_eq!(
            summary,
            vec![("A", 1, vec!["x".to_string()]), ("B", 3, vec!["y".to_string()])]
        );
    }

    #[test]
    fn captures_group_tag_and_indentation() {
        let lines = ["fn main() {", "    // BEGIN(Main) Set up state", "    let x = 1;", "    // END", "}"];
        let chunks = parse(&lang("//"), Path::new("main.rs"), lines).unwrap();
        assert_eq!(chunks[0].group_tag, "Main");
        assert_eq!(chunks[0].name, "Set up state");
        assert_eq!(chunks[0].indentation, "    ");
        assert_eq!(chunks[0].start_line, 2);
        assert_eq!(chunks[0].body, vec!["    let x = 1;"]);
    }

    #[test]
    fn tag_without_space_before_name() {
        let chunks = parse(&lang("//"), Path::new("a.go"), ["//BEGIN(P)Define P", "// END"]).unwrap();
        assert_eq!(chunks[0].group_tag, "P");
        assert_eq!(chunks[0].name, "Define P");
    }

    #[test]
    fn tag_forms_with_and_without_name() {
        let chunks = parse(&lang("//"), Path::new("a.go"), ["// BEGIN(P)   Step", "x", "//BEGIN Plain", "// END"]).unwrap();
        assert_eq!((chunks[0].group_tag.as_str(), chunks[0].name.as_str()), ("P", "Step"));
        assert_eq!((chunks[1].group_tag.as_str(), chunks[1].name.as_str()), ("", "Plain"));
        let err = parse(&lang("//"), Path::new("a.go"), ["// BEGIN(P)", "// END"]).unwrap_err();
        assert!(matches!(err, Error::UnnamedChunk { line: 1, .. }));
    }

    #[test]
    fn dangling_end_is_rejected_wherever_it_appears() {
        for lines in [
            vec!["// END"],
            vec!["let a = 1;", "// END", "let b = 2;"],
            vec!["// BEGIN A", "// END", "// END"],
        ] {
            let err = parse(&lang("//"), Path::new("a.rs"), lines).unwrap_err();
            assert!(matches!(err, Error::DanglingEnd { .. }), "got {err:?}");
        }
    }

    #[test]
    fn dangling_end_reports_its_line() {
        let err = parse(&lang("//"), Path::new("a.rs"), ["x", "y", "  // END"]).unwrap_err();
        let Error::DanglingEnd { file, line } = err else {
            panic!("expected DanglingEnd, got {err:?}");
        };
        assert_eq!(file, PathBuf::from("a.rs"));
        assert_eq!(line, 3);
    }

    #[test]
    fn file_ending_inside_chunk_is_rejected() {
        let err = parse(&lang("#"), Path::new("a.py"), ["# BEGIN A", "x", "# BEGIN B", "y"]).unwrap_err();
        let Error::UnterminatedAtEof { name, start_line, .. } = err else {
            panic!("expected UnterminatedAtEof, got {err:?}");
        };
        assert_eq!(name, "B");
        assert_eq!(start_line, 3);
    }

    #[test]
    fn unnamed_begin_is_rejected() {
        let err = parse(&lang("//"), Path::new("a.rs"), ["// BEGIN", "// END"]).unwrap_err();
        assert!(matches!(err, Error::UnnamedChunk { line: 1, .. }));
    }

    #[test]
    fn file_without_markers_yields_nothing() {
        let chunks = parse(&lang("//"), Path::new("a.rs"), ["fn f() {}", "// BEGINNING of time", "// ENDGAME"]).unwrap();
        assert!(chunks.is_empty());
    }

    #[test]
    fn implicit_close_drops_no_lines() {
        let lines = ["-- BEGIN one", "a", "b", "-- BEGIN two", "c", "-- BEGIN three", "-- BEGIN four", "d", "-- END"];
        let chunks = parse(&lang("-- "), Path::new("M.hs"), lines).unwrap();
        assert_eq!(chunks.len(), 4);
        assert!(chunks[2].body.is_empty());
        let rebuilt: Vec<&str> = chunks.iter().flat_map(|c| c.body.iter().map(String::as_str)).collect();
        let expected: Vec<&str> = lines.iter().copied().filter(|l| !l.starts_with("--")).collect();
        assert_eq!(rebuilt, expected);
    }

    #[test]
    fn leader_is_matched_literally() {
        let chunks = parse(&lang("#"), Path::new("a.py"), ["x = 1  # BEGIN not a marker", "#+ BEGIN nope"]).unwrap();
        assert!(chunks.is_empty());
    }
}
