//! LaTeX output: a labeled `defquote` block with minted listings.

use std::sync::Arc;

use super::{Fragment, Renderer, classify, placeholder_prefix};
use crate::language::RendererKind;
use crate::types::Chunk;

/// Renders a weave record as a captioned, cross-referenceable minted block.
pub struct TexRenderer;

impl Renderer for TexRenderer {
    fn render(&self, fragments: &[Arc<Chunk>], out: &mut Vec<String>) {
        let Some((primary, rest)) = classify(fragments) else { return };
        let lexer = primary.language.display_name(RendererKind::Tex);
        let open_listing = format!("\\begin{{minted}}[tabsize=4]{{{lexer}}}");

        out.push("\\phantomsection".to_string());
        out.push(format!("\\label{{{}}}", label(primary)));
        out.push("\\begin{defquote}".to_string());
        out.push(format!(
            "\\noindent \\( \\ll \\) {} \\( \\gg \\enspace \\equiv \\) \\hfill {}",
            primary.name,
            primary.location()
        ));
        push_listing(&open_listing, primary, out);

        for fragment in rest {
            match fragment {
                Fragment::Continuation(chunk) => push_listing(&open_listing, chunk, out),
                Fragment::Placeholder(chunk) => out.push(format!(
                    "\\mintinline[tabsize=4]{{{lexer}}}|{}| \\( \\ll \\) {} \\( \\gg \\) \\hfill (\\ref{{{}}}) \\\\",
                    placeholder_prefix(primary, chunk),
                    chunk.name,
                    label(chunk)
                )),
            }
        }
        out.push("\\end{defquote}".to_string());
    }
}

/// Label anchoring a chunk's definition: `lst:` + name + start line.
fn label(chunk: &Chunk) -> String {
    return format!("lst:{}{}", chunk.name, chunk.start_line);
}

/// One minted environment holding a chunk body.
fn push_listing(open_listing: &str, chunk: &Chunk, out: &mut Vec<String>) {
    out.push(open_listing.to_string());
    out.extend(chunk.body.iter().cloned());
    out.push("\\end{minted}".to_string());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::fixtures::chunk;

    #[test]
    fn single_fragment_is_a_labeled_definition() {
        let mut out = Vec::new();
        TexRenderer.render(&[chunk("Hello", "", 3, &["fmt.Println(1)"])], &mut out);
        assert_eq!(
            out,
            vec![
                "\\phantomsection",
                "\\label{lst:Hello3}",
                "\\begin{defquote}",
                "\\noindent \\( \\ll \\) Hello \\( \\gg \\enspace \\equiv \\) \\hfill main.go:3",
                "\\begin{minted}[tabsize=4]{go}",
                "fmt.Println(1)",
                "\\end{minted}",
                "\\end{defquote}",
            ]
        );
    }

    #[test]
    fn later_fragments_continue_or_cross_reference() {
        let fragments = [
            chunk("Define P", "", 1, &["func P() {"]),
            chunk("Set up", "\t", 3, &["\tx := 1"]),
            chunk("Define P", "", 6, &["}"]),
        ];
        let mut out = Vec::new();
        TexRenderer.render(&fragments, &mut out);
        assert_eq!(
            out[4..],
            [
                "\\begin{minted}[tabsize=4]{go}",
                "func P() {",
                "\\end{minted}",
                "\\mintinline[tabsize=4]{go}|\t// | \\( \\ll \\) Set up \\( \\gg \\) \\hfill (\\ref{lst:Set up3}) \\\\",
                "\\begin{minted}[tabsize=4]{go}",
                "}",
                "\\end{minted}",
                "\\end{defquote}",
            ]
        );
    }
}
