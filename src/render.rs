//! Renderer capability: turns the fragments of one directive into markup.
//!
//! The weaver picks the fragments; a renderer only decides how they look.
//! Every renderer emits the first fragment as a labeled definition with its
//! file and line, same-named later fragments as continuations of that
//! definition, and differently-named later fragments as a one-line
//! placeholder pointing at their own definition.

mod markdown;
mod tex;

use std::sync::Arc;

pub use markdown::MarkdownRenderer;
pub use tex::TexRenderer;

use crate::language::RendererKind;
use crate::types::Chunk;

/// Output markup for a weave record.
pub trait Renderer {
    /// Emit the lines for one directive. `fragments` is never empty.
    fn render(&self, fragments: &[Arc<Chunk>], out: &mut Vec<String>);
}

/// How a later fragment relates to the primary one.
pub enum Fragment<'a> {
    /// Same name as the primary: more of the same definition.
    Continuation(&'a Chunk),
    /// Different name, shared group: shown as a cross-reference.
    Placeholder(&'a Chunk),
}

/// Split fragments into the primary and the classified rest.
pub fn classify(fragments: &[Arc<Chunk>]) -> Option<(&Chunk, Vec<Fragment<'_>>)> {
    let (primary, rest) = fragments.split_first()?;
    let rest = rest
        .iter()
        .map(|f| {
            let f: &Chunk = f;
            return if f.name == primary.name {
                Fragment::Continuation(f)
            } else {
                Fragment::Placeholder(f)
            };
        })
        .collect();
    return Some((&**primary, rest));
}

/// Comment that stands in for a placeholder fragment: its indentation, then
/// the primary's leader and one space. The placeholder sits inside the
/// primary's listing, so it is commented in the primary's language.
pub fn placeholder_prefix(primary: &Chunk, placeholder: &Chunk) -> String {
    return format!("{}{} ", placeholder.indentation, primary.language.comment_leader);
}

/// Renderer for the selected markup.
pub fn for_kind(kind: RendererKind) -> Box<dyn Renderer> {
    return match kind {
        RendererKind::Markdown => Box::new(MarkdownRenderer),
        RendererKind::Tex => Box::new(TexRenderer),
    };
}

#[cfg(test)]
pub(crate) mod fixtures {
    use std::collections::HashMap;
    use std::path::PathBuf;
    use std::sync::Arc;

    use crate::language::{Language, RendererKind};
    use crate::types::Chunk;

    /// A Go descriptor with distinct names per renderer.
    pub fn go() -> Arc<Language> {
        let names = HashMap::from([
            (RendererKind::Markdown, "golang".to_string()),
            (RendererKind::Tex, "go".to_string()),
        ]);
        return Arc::new(Language::new("go", r"\.go$", "//", names).unwrap());
    }

    /// A Go chunk from `main.go`.
    pub fn chunk(name: &str, indent: &str, line: usize, body: &[&str]) -> Arc<Chunk> {
        return Arc::new(Chunk {
            body: body.iter().map(|l| l.to_string()).collect(),
            group_tag: "P".to_string(),
            indentation: indent.to_string(),
            language: go(),
            name: name.to_string(),
            source_file: PathBuf::from("main.go"),
            start_line: line,
        });
    }
}
