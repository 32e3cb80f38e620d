//! Weaving engine: expands directives in a document into rendered chunks.

use crate::directive::DirectivePattern;
use crate::error::Error;
use crate::registry::Registry;
use crate::render::Renderer;
use crate::types::{ChunkQuery, ReferenceTally};

/// Output of one weave.
#[derive(Debug, Default)]
pub struct Woven {
    /// Document lines with every directive expanded in place.
    pub lines: Vec<String>,
    /// How often each name and group tag was referenced.
    pub tally: ReferenceTally,
}

/// Expand every directive in `document`, in order, in a single pass.
/// Non-directive lines are copied through unchanged. Chunk bodies are not
/// scanned for further directives.
///
/// # Errors
///
/// Returns `Error::MissingChunk` or `Error::MissingGroup` for the first
/// directive whose target is not in the registry.
pub fn weave<I, S>(
    registry: &Registry,
    renderer: &dyn Renderer,
    directive: &DirectivePattern,
    document: I,
) -> Result<Woven, Error>
where
    I: IntoIterator<Item = S>,
    S: Into<String> + AsRef<str>,
{
    let mut woven = Woven::default();
    for line in document {
        let Some(query) = directive.detect(line.as_ref()) else {
            woven.lines.push(line.into());
            continue;
        };

        woven.tally.record(&query);
        let Some(fragments) = registry.fragments(&query) else {
            return Err(missing(query));
        };
        log::debug!("weaving {query:?} from {} fragments", fragments.len());
        renderer.render(fragments, &mut woven.lines);
    }
    return Ok(woven);
}

/// Error for a directive that resolved to nothing.
fn missing(query: ChunkQuery) -> Error {
    return match query {
        ChunkQuery::Group(tag) => Error::MissingGroup { tag },
        ChunkQuery::Name(name) => Error::MissingChunk { name },
    };
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::path::Path;
    use std::sync::Arc;

    use super::*;
    use crate::language::Language;
    use crate::parser;
    use crate::render::{MarkdownRenderer, TexRenderer};

    fn registry(source: &[&str]) -> Registry {
        let lang = Arc::new(Language::new("python", r"\.py$", "#", HashMap::new()).unwrap());
        let chunks = parser::parse(&lang, Path::new("lib.py"), source).unwrap();
        return Registry::aggregate(chunks);
    }

    fn directive() -> DirectivePattern {
        return DirectivePattern::new("%REF").unwrap();
    }

    #[test]
    fn counts_every_reference() {
        let registry = registry(&["# BEGIN A", "a = 1", "# BEGIN B", "b = 2", "# BEGIN C", "c = 3", "# END"]);
        let woven = weave(&registry, &MarkdownRenderer, &directive(), ["%REF A", "%REF B", "%REF A"]).unwrap();
        assert_eq!(woven.tally.name_count("A"), 2);
        assert_eq!(woven.tally.name_count("B"), 1);
        assert_eq!(woven.tally.name_count("C"), 0);
        assert_eq!(woven.tally.names.len(), 2);
    }

    #[test]
    fn document_without_directives_is_unchanged() {
        let registry = registry(&["# BEGIN A", "a = 1", "# END"]);
        let document = ["\\section{Intro}", "", "Plain text %REF"];
        let woven = weave(&registry, &TexRenderer, &directive(), document).unwrap();
        assert_eq!(woven.lines, document);
        assert_eq!(woven.tally, ReferenceTally::default());
    }

    #[test]
    fn directives_expand_in_place() {
        let registry = registry(&["# BEGIN A", "a = 1", "a += 1", "# END"]);
        let document = ["before", "%REF A", "after"];
        let woven = weave(&registry, &MarkdownRenderer, &directive(), document).unwrap();
        assert_eq!(
            woven.lines,
            ["before", "| A | lib.py:1 |", "| ----- | ----- |", "```python", "a = 1", "a += 1", "```", "after"]
        );
    }

    #[test]
    fn group_directive_renders_skeleton() {
        let registry = registry(&[
            "# BEGIN(Run) Define run",
            "def run():",
            "    # BEGIN(Run) Load input",
            "    data = load()",
            "# BEGIN(Run) Define run",
            "    return data",
            "# END",
        ]);
        let woven = weave(&registry, &MarkdownRenderer, &directive(), ["%REF (Run)"]).unwrap();
        assert_eq!(
            woven.lines,
            [
                "| Define run | lib.py:1 |",
                "| ----- | ----- |",
                "```python",
                "def run():",
                "```",
                "```python",
                "    # Load input",
                "```",
                "```python",
                "    return data",
                "```",
            ]
        );
        assert_eq!(woven.tally.group_count("Run"), 1);
        assert_eq!(woven.tally.name_count("Define run"), 0);
    }

    #[test]
    fn chunk_bodies_are_not_rescanned() {
        let registry = registry(&["# BEGIN A", "%REF Nowhere", "# END"]);
        let woven = weave(&registry, &MarkdownRenderer, &directive(), ["%REF A"]).unwrap();
        assert!(woven.lines.contains(&"%REF Nowhere".to_string()));
        assert_eq!(woven.tally.name_count("Nowhere"), 0);
    }

    #[test]
    fn undefined_name_is_fatal() {
        let registry = registry(&["# BEGIN A", "a = 1", "# END"]);
        let err = weave(&registry, &TexRenderer, &directive(), ["%REF A", "%REF Ghost", "%REF A"]).unwrap_err();
        assert!(matches!(err, Error::MissingChunk { ref name } if name == "Ghost"));
    }

    #[test]
    fn undefined_group_is_fatal() {
        let registry = registry(&["# BEGIN A", "a = 1", "# END"]);
        let err = weave(&registry, &TexRenderer, &directive(), ["%REF (A)"]).unwrap_err();
        assert!(matches!(err, Error::MissingGroup { ref tag } if tag == "A"));
    }
}
