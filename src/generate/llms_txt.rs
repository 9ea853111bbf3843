//! `llms.txt`: a plain-text digest sized for a small context window.
//!
//! Name and tagline, then one paragraph per top-level tree node. A page gives
//! `Title: summary`; a folder gives its title and a `- Title: summary` line per
//! page below it. The summary is the front-matter description or the first
//! prose paragraph, markup stripped, cut at a word boundary. Headings and
//! code never appear.

use super::GenerateContext;
use crate::metadata;
use crate::types::{PageItem, PageNode};

pub fn render(ctx: &GenerateContext) -> String {
    let project = &ctx.config.project;
    let max_chars = ctx.config.llms.max_paragraph_chars;
    let mut blocks: Vec<String> = Vec::new();

    let mut header = format!("# {}", project.name);
    if !project.tagline.is_empty() {
        header.push_str(&format!("\n\n> {}", project.tagline));
    }
    blocks.push(header);

    for node in &ctx.tree.nodes {
        match node {
            PageNode::Page(item) => {
                if let Some(line) = page_line(ctx, item, max_chars) {
                    blocks.push(line);
                }
            }
            PageNode::Folder(folder) => {
                let mut items = Vec::new();
                collect_items(&folder.children, &mut items);
                let lines: Vec<String> = items
                    .into_iter()
                    .filter_map(|item| page_line(ctx, item, max_chars))
                    .map(|line| format!("- {line}"))
                    .collect();
                if !lines.is_empty() {
                    blocks.push(format!("{}\n{}", folder.title, lines.join("\n")));
                }
            }
            PageNode::Separator(_) => {}
        }
    }

    let mut out = blocks.join("\n\n");
    out.push('\n');
    out
}

fn collect_items<'a>(nodes: &'a [PageNode], items: &mut Vec<&'a PageItem>) {
    for node in nodes {
        match node {
            PageNode::Page(item) => items.push(item),
            PageNode::Folder(folder) => collect_items(&folder.children, items),
            PageNode::Separator(_) => {}
        }
    }
}

/// `Title: summary`, `Title` when the page has no prose, `None` when missing.
fn page_line(ctx: &GenerateContext, item: &PageItem, max_chars: usize) -> Option<String> {
    if item.status.is_missing() {
        return None;
    }
    let page = ctx.page(&item.id)?;
    let summary = page
        .description
        .clone()
        .or_else(|| metadata::first_paragraph(page.body()));
    Some(match summary {
        Some(text) => format!("{}: {}", page.title, truncate_words(&text, max_chars)),
        None => page.title.clone(),
    })
}

/// Cut `text` to at most `max` characters at a word boundary, ending in `...`.
pub fn truncate_words(text: &str, max: usize) -> String {
    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if text.chars().count() <= max {
        return text;
    }
    let budget = max.saturating_sub(3);
    let mut out = String::new();
    for word in text.split(' ') {
        let needed = if out.is_empty() { 0 } else { 1 } + word.chars().count();
        if out.chars().count() + needed > budget {
            break;
        }
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }
    if out.is_empty() {
        // A single word longer than the budget; cut inside it.
        out = text.chars().take(budget).collect();
    }
    let trimmed = out.trim_end_matches([',', ';', ':', '.']).len();
    out.truncate(trimmed);
    out.push_str("...");
    out
}
