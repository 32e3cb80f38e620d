/// Reference audit: chunks that were documented in source but never woven.
use crate::registry::Registry;
use crate::types::{ReferenceTally, UnusedChunk};

/// Every chunk name that no directive reached, either by name or through the
/// group tag of its first fragment. Sorted by file, line, then name.
pub fn audit(registry: &Registry, tally: &ReferenceTally) -> Vec<UnusedChunk> {
    let mut unused: Vec<UnusedChunk> = registry
        .names()
        .filter_map(|(name, fragments)| {
            let first = fragments.first()?;
            let used = tally.name_count(name) > 0
                || (first.is_grouped() && tally.group_count(&first.group_tag) > 0);
            if used {
                return None;
            }
            return Some(UnusedChunk {
                file: first.source_file.clone(),
                name: name.to_string(),
                start_line: first.start_line,
            });
        })
        .collect();
    unused.sort_by(|a, b| return (&a.file, a.start_line, &a.name).cmp(&(&b.file, b.start_line, &b.name)));
    return unused;
}

/// Print one warning per unused chunk to stderr.
pub fn print_warnings(unused: &[UnusedChunk]) {
    for chunk in unused {
        eprintln!(
            "warning: chunk \"{}\" defined at {}:{} was never used",
            chunk.name,
            chunk.file.display(),
            chunk.start_line
        );
    }
    return;
}
