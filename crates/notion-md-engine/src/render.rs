//! Markdown rendering of block sequences.
//!
//! Rendering is a pure, single pass over the blocks: each supported block with
//! non-empty rich text appends one fragment to a shared buffer, everything else
//! contributes nothing. Plain text is emitted verbatim, without escaping.

use crate::models::{Block, BlockKind, BlockWithIndent, RichText};

const NESTED_INDENT: &str = "    ";

#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownRenderer {
    indent_nested_lists: bool,
}

impl MarkdownRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Indent list items under their enclosing list items when rendering a fetched tree.
    ///
    /// Only an unbroken chain of list-item ancestors counts, so a list nested
    /// in a paragraph or an unrendered block starts flush left.
    pub fn with_nested_indent(mut self, enabled: bool) -> Self {
        self.indent_nested_lists = enabled;
        self
    }

    /// Render a flat sequence of blocks, all treated as top level.
    pub fn render<'a, I>(&self, blocks: I) -> String
    where
        I: IntoIterator<Item = &'a Block>,
    {
        let mut out = String::new();
        for block in blocks {
            self.push_block(&mut out, block, 0);
        }
        out
    }

    /// Render the depth-annotated output of a tree fetch.
    ///
    /// Depth only affects output when nested indentation is enabled.
    pub fn render_tree(&self, blocks: &[BlockWithIndent]) -> String {
        let mut out = String::new();
        // Whether the latest block seen at each depth rendered as a list item
        let mut list_path: Vec<bool> = Vec::new();
        for entry in blocks {
            list_path.truncate(entry.depth);
            list_path.resize(entry.depth, false);
            let nesting = list_path.iter().rev().take_while(|&&item| item).count();

            self.push_block(&mut out, &entry.block, nesting);
            list_path.push(renders_as_list_item(&entry.block));
        }
        out
    }

    fn push_block(&self, out: &mut String, block: &Block, list_nesting: usize) {
        let text = block.kind.rich_text();
        if text.is_empty() {
            return;
        }

        match &block.kind {
            BlockKind::Heading { level, .. } => {
                out.push_str(level.marker());
                out.push(' ');
                push_rich_text(out, text);
                out.push_str("\n\n");
            }
            BlockKind::Paragraph(_) => {
                push_rich_text(out, text);
                out.push_str("\n\n");
            }
            BlockKind::BulletedListItem(_) => {
                self.push_list_indent(out, list_nesting);
                out.push_str("- ");
                push_rich_text(out, text);
                out.push('\n');
            }
            BlockKind::NumberedListItem(_) => {
                // Literal "1." for every item, regardless of position
                self.push_list_indent(out, list_nesting);
                out.push_str("1. ");
                push_rich_text(out, text);
                out.push('\n');
            }
            BlockKind::Code { language, .. } => {
                out.push_str("```");
                out.push_str(language);
                out.push('\n');
                push_rich_text(out, text);
                out.push_str("\n```\n\n");
            }
            BlockKind::Unsupported(_) => {}
        }
    }

    fn push_list_indent(&self, out: &mut String, list_nesting: usize) {
        if self.indent_nested_lists {
            for _ in 0..list_nesting {
                out.push_str(NESTED_INDENT);
            }
        }
    }
}

fn renders_as_list_item(block: &Block) -> bool {
    matches!(
        block.kind,
        BlockKind::BulletedListItem(_) | BlockKind::NumberedListItem(_)
    ) && !block.kind.rich_text().is_empty()
}

/// Render blocks with the default, depth-blind renderer.
pub fn render(blocks: &[Block]) -> String {
    MarkdownRenderer::default().render(blocks)
}

/// Format rich text runs as inline Markdown.
///
/// Each run is wrapped, innermost first, in inline code, bold, italic and
/// strikethrough markers for the flags it has set. A non-empty link then wraps
/// the fully annotated text.
pub fn format_rich_text(runs: &[RichText]) -> String {
    let mut out = String::new();
    push_rich_text(&mut out, runs);
    out
}

fn push_rich_text(out: &mut String, runs: &[RichText]) {
    for run in runs {
        push_run(out, run);
    }
}

fn push_run(out: &mut String, run: &RichText) {
    let a = run.annotations;
    let link = run.link();

    if link.is_some() {
        out.push('[');
    }
    if a.strikethrough {
        out.push_str("~~");
    }
    if a.italic {
        out.push('*');
    }
    if a.bold {
        out.push_str("**");
    }
    if a.code {
        out.push('`');
    }

    out.push_str(&run.plain_text);

    if a.code {
        out.push('`');
    }
    if a.bold {
        out.push_str("**");
    }
    if a.italic {
        out.push('*');
    }
    if a.strikethrough {
        out.push_str("~~");
    }
    if let Some(href) = link {
        out.push_str("](");
        out.push_str(href);
        out.push(')');
    }
}
