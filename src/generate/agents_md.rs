//! `AGENTS.md`: the context document coding agents read first.
//!
//! ```text
//! # docpack
//!
//! > Docs audit and agent context generator
//!
//! <!-- generated notice -->
//!
//! ## Critical Context
//! 1. ...                         # config order, verbatim
//!
//! ## Entry Points
//! - **CLI**: `src/main.rs`       # sorted by label
//!
//! ## Rules
//! - ...
//!
//! ## Documentation
//! ### Overview                    # one per selected page, flat order
//! Source: `docs/overview.md`
//! <raw page content>
//! ```

use super::GenerateContext;
use crate::naming;
use std::collections::HashSet;

pub const GENERATED_NOTICE: &str =
    "<!-- Generated by docpack from docpack.toml and the docs tree. Do not edit by hand. -->";

pub fn render(ctx: &GenerateContext) -> String {
    let project = &ctx.config.project;
    let agent = &ctx.config.agent;
    let mut out = String::new();

    out.push_str(&format!("# {}\n\n", project.name));
    if !project.tagline.is_empty() {
        out.push_str(&format!("> {}\n\n", project.tagline));
    }
    out.push_str(GENERATED_NOTICE);
    out.push_str("\n\n");

    if !agent.critical_context.is_empty() {
        out.push_str("## Critical Context\n\n");
        for (i, item) in agent.critical_context.iter().enumerate() {
            out.push_str(&format!("{}. {}\n", i + 1, item));
        }
        out.push('\n');
    }

    if !agent.entry_points.is_empty() {
        out.push_str("## Entry Points\n\n");
        for (label, path) in &agent.entry_points {
            out.push_str(&format!("- **{label}**: `{path}`\n"));
        }
        out.push('\n');
    }

    if !agent.rules.is_empty() {
        out.push_str("## Rules\n\n");
        for rule in &agent.rules {
            out.push_str(&format!("- {rule}\n"));
        }
        out.push('\n');
    }

    let docs_path = ctx.config.docs.path.trim_end_matches('/');
    let mut wrote_header = false;
    for id in selected_ids(ctx) {
        let Some(page) = ctx.page(id) else {
            continue;
        };
        if !wrote_header {
            out.push_str("## Documentation\n\n");
            wrote_header = true;
        }
        out.push_str(&format!("### {}\n\n", page.title));
        out.push_str(&format!("Source: `{}/{}`\n\n", docs_path, page.path));
        out.push_str(page.raw_content.trim_end());
        out.push_str("\n\n");
    }

    let trimmed = out.trim_end().len();
    out.truncate(trimmed);
    out.push('\n');
    out
}

/// Present page ids to include, in flat order.
///
/// With `agent.sections` empty every present page is selected. Otherwise the
/// listed sections are kept in flat order; names that match no page are
/// logged and skipped.
fn selected_ids<'a>(ctx: &GenerateContext<'a>) -> Vec<&'a str> {
    let present = ctx.flat.iter().filter(|f| !f.missing).map(|f| f.id.as_str());
    let sections = &ctx.config.agent.sections;
    if sections.is_empty() {
        return present.collect();
    }

    let wanted: HashSet<String> = sections.iter().map(|s| naming::page_id(s)).collect();
    let known: HashSet<&str> = ctx.flat.iter().filter(|f| !f.missing).map(|f| f.id.as_str()).collect();
    for section in sections {
        if !known.contains(naming::page_id(section).as_str()) {
            tracing::warn!(section = %section, "agent section matches no page; skipped");
        }
    }
    present.filter(|id| wanted.contains(*id)).collect()
}
