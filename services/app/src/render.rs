//! services/app/src/render.rs
//!
//! Terminal presentation of formatted summary content.

use console::Style;
use study_aid_core::formatter::{format_content, plain_text, InlineSpan, RenderNode};

/// Renders `content` for the terminal. Content without any structure is shown
/// exactly as it came in.
pub fn render_content(content: &str) -> String {
    match format_content(content) {
        Some(nodes) => render_nodes(&nodes),
        None => content.to_string(),
    }
}

pub fn render_nodes(nodes: &[RenderNode]) -> String {
    let blocks: Vec<String> = nodes.iter().map(render_node).collect();
    blocks.join("\n\n")
}

fn render_node(node: &RenderNode) -> String {
    match node {
        RenderNode::Heading { level, spans } => {
            let style = if *level <= 2 {
                Style::new().bold().underlined().cyan()
            } else {
                Style::new().bold().cyan()
            };
            style.apply_to(plain_text(spans)).to_string()
        }
        RenderNode::Paragraph { spans } => render_spans(spans),
        RenderNode::List { items } => items
            .iter()
            .map(|spans| format!("  • {}", render_spans(spans)))
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

fn render_spans(spans: &[InlineSpan]) -> String {
    let bold = Style::new().bold();
    spans
        .iter()
        .map(|span| match span {
            InlineSpan::Plain(text) => text.clone(),
            InlineSpan::Bold(text) => bold.apply_to(text).to_string(),
        })
        .collect()
}
