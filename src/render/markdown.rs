//! Flat markdown output: a one-row table header and fenced code.

use std::sync::Arc;

use super::{Fragment, Renderer, classify, placeholder_prefix};
use crate::language::RendererKind;
use crate::types::Chunk;

/// Renders a weave record as a table header plus fenced code blocks.
pub struct MarkdownRenderer;

impl Renderer for MarkdownRenderer {
    fn render(&self, fragments: &[Arc<Chunk>], out: &mut Vec<String>) {
        let Some((primary, rest)) = classify(fragments) else { return };
        let fence = format!("```{}", primary.language.display_name(RendererKind::Markdown));

        out.push(format!("| {} | {} |", primary.name, primary.location()));
        out.push("| ----- | ----- |".to_string());
        push_fenced(&fence, primary.body.iter().cloned(), out);

        for fragment in rest {
            match fragment {
                Fragment::Continuation(chunk) => push_fenced(&fence, chunk.body.iter().cloned(), out),
                Fragment::Placeholder(chunk) => {
                    let reference = format!("{}{}", placeholder_prefix(primary, chunk), chunk.name);
                    push_fenced(&fence, std::iter::once(reference), out);
                },
            }
        }
    }
}

/// Wrap lines in a code fence.
fn push_fenced<I>(fence: &str, lines: I, out: &mut Vec<String>)
where
    I: Iterator<Item = String>,
{
    out.push(fence.to_string());
    out.extend(lines);
    out.push("```".to_string());
}
