//! crates/study_aid_core/src/formatter.rs
//!
//! Turns the constrained markdown used by generated summaries into block nodes.
//!
//! Only a handful of line prefixes are recognised (`## `, `### `, `* `, `- `) and the
//! single inline marker `**`. Everything else is paragraph text. Formatting is total:
//! there is no input it rejects.

/// A run of inline text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InlineSpan {
    Plain(String),
    Bold(String),
}

impl InlineSpan {
    pub fn text(&self) -> &str {
        match self {
            InlineSpan::Plain(text) | InlineSpan::Bold(text) => text,
        }
    }
}

/// One block of rendered content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderNode {
    /// `level` is 2 or 3.
    Heading { level: u8, spans: Vec<InlineSpan> },
    Paragraph { spans: Vec<InlineSpan> },
    List { items: Vec<Vec<InlineSpan>> },
}

/// The open accumulation while walking the lines. At most one is open at a time.
#[derive(Debug)]
enum Block {
    None,
    InList(Vec<String>),
    InParagraph(Vec<String>),
}

/// Formats `content` into block nodes.
///
/// Returns `None` when no structure was found (in practice: blank input). Callers then
/// show `content` verbatim with its whitespace preserved.
pub fn format_content(content: &str) -> Option<Vec<RenderNode>> {
    let mut nodes = Vec::new();
    let last = content
        .split('\n')
        .fold(Block::None, |state, line| step(state, line.trim(), &mut nodes));
    nodes.extend(flush(last));

    if nodes.is_empty() {
        None
    } else {
        Some(nodes)
    }
}

fn step(state: Block, line: &str, nodes: &mut Vec<RenderNode>) -> Block {
    if let Some(rest) = line.strip_prefix("## ") {
        nodes.extend(flush(state));
        nodes.push(RenderNode::Heading {
            level: 2,
            spans: split_inline(rest),
        });
        return Block::None;
    }
    if let Some(rest) = line.strip_prefix("### ") {
        nodes.extend(flush(state));
        nodes.push(RenderNode::Heading {
            level: 3,
            spans: split_inline(rest),
        });
        return Block::None;
    }
    if let Some(rest) = line.strip_prefix("* ").or_else(|| line.strip_prefix("- ")) {
        return match state {
            Block::InList(mut items) => {
                items.push(rest.to_string());
                Block::InList(items)
            }
            other => {
                nodes.extend(flush(other));
                Block::InList(vec![rest.to_string()])
            }
        };
    }
    if line.is_empty() {
        nodes.extend(flush(state));
        return Block::None;
    }
    match state {
        Block::InParagraph(mut lines) => {
            lines.push(line.to_string());
            Block::InParagraph(lines)
        }
        other => {
            nodes.extend(flush(other));
            Block::InParagraph(vec![line.to_string()])
        }
    }
}

/// Closes the open accumulation, if any.
fn flush(state: Block) -> Option<RenderNode> {
    match state {
        Block::None => None,
        Block::InList(items) => Some(RenderNode::List {
            items: items.iter().map(|item| split_inline(item)).collect(),
        }),
        Block::InParagraph(lines) => Some(RenderNode::Paragraph {
            spans: split_inline(&lines.join(" ")),
        }),
    }
}

/// Splits on `**`: even segments are plain, odd segments are bold, empty ones included.
/// An unpaired trailing marker makes the rest bold.
pub fn split_inline(text: &str) -> Vec<InlineSpan> {
    text.split("**")
        .enumerate()
        .map(|(index, segment)| {
            if index % 2 == 1 {
                InlineSpan::Bold(segment.to_string())
            } else {
                InlineSpan::Plain(segment.to_string())
            }
        })
        .collect()
}

/// Writes nodes back in the authoring convention, one blank line between blocks.
pub fn to_markup(nodes: &[RenderNode]) -> String {
    let blocks: Vec<String> = nodes
        .iter()
        .map(|node| match node {
            RenderNode::Heading { level, spans } => {
                format!("{} {}", "#".repeat(usize::from(*level)), spans_to_markup(spans))
            }
            RenderNode::Paragraph { spans } => spans_to_markup(spans),
            RenderNode::List { items } => items
                .iter()
                .map(|item| format!("* {}", spans_to_markup(item)))
                .collect::<Vec<_>>()
                .join("\n"),
        })
        .collect();
    blocks.join("\n\n")
}

/// A trailing bold span is left unclosed, so an unpaired marker survives the round trip.
fn spans_to_markup(spans: &[InlineSpan]) -> String {
    let last = spans.len().saturating_sub(1);
    spans
        .iter()
        .enumerate()
        .map(|(index, span)| match span {
            InlineSpan::Plain(text) => text.clone(),
            InlineSpan::Bold(text) if index == last => format!("**{}", text),
            InlineSpan::Bold(text) => format!("**{}**", text),
        })
        .collect()
}

/// The text of a span sequence without markers.
pub fn plain_text(spans: &[InlineSpan]) -> String {
    spans.iter().map(InlineSpan::text).collect()
}
