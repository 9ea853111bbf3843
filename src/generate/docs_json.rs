//! `docs.json`: the machine-readable page index.
//!
//! ```json
//! {
//!   "project": { "name": "demo", "tagline": "...", "type": "cli-tool" },
//!   "tree": [
//!     { "type": "page", "id": "overview", "title": "Overview", "path": "overview.md",
//!       "status": "present", "headings": [{ "depth": 2, "slug": "install", "text": "Install" }] },
//!     { "type": "separator", "label": "Guides" },
//!     { "type": "folder", "id": "guides", "title": "Guides", "children": [ ... ] },
//!     { "type": "page", "id": "api", "title": "Api", "status": "missing", "headings": [] }
//!   ],
//!   "pages": [
//!     { "id": "overview", "title": "Overview", "path": "overview.md", "prev": null, "next": "guides/index" }
//!   ]
//! }
//! ```
//!
//! `tree` has exactly the shape of the built page tree; `pages` is the flat
//! sequence. Navigation sidebars read this file, so its shape is a contract.

use super::{GenerateContext, GenerateError};
use crate::config::ProjectType;
use crate::types::{FlatPage, Heading, PageNode, PageStatus};
use serde::Serialize;

#[derive(Serialize)]
struct DocsIndex<'a> {
    project: ProjectEntry<'a>,
    tree: Vec<TreeEntry<'a>>,
    pages: &'a [FlatPage],
}

#[derive(Serialize)]
struct ProjectEntry<'a> {
    name: &'a str,
    tagline: &'a str,
    #[serde(rename = "type")]
    kind: ProjectType,
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum TreeEntry<'a> {
    Page {
        id: &'a str,
        title: &'a str,
        #[serde(skip_serializing_if = "Option::is_none")]
        path: Option<&'a str>,
        status: PageStatus,
        #[serde(skip_serializing_if = "Option::is_none")]
        description: Option<&'a str>,
        headings: &'a [Heading],
    },
    Folder {
        id: &'a str,
        title: &'a str,
        children: Vec<TreeEntry<'a>>,
    },
    Separator {
        label: &'a str,
    },
}

fn tree_entries<'a>(ctx: &GenerateContext<'a>, nodes: &'a [PageNode]) -> Vec<TreeEntry<'a>> {
    nodes
        .iter()
        .map(|node| match node {
            PageNode::Page(item) => {
                let page = ctx.page(&item.id);
                TreeEntry::Page {
                    id: &item.id,
                    title: &item.title,
                    path: item.path.as_deref(),
                    status: item.status,
                    description: page.and_then(|p| p.description.as_deref()),
                    headings: page.map(|p| p.headings.as_slice()).unwrap_or(&[]),
                }
            }
            PageNode::Folder(folder) => TreeEntry::Folder {
                id: &folder.id,
                title: &folder.title,
                children: tree_entries(ctx, &folder.children),
            },
            PageNode::Separator(sep) => TreeEntry::Separator { label: &sep.label },
        })
        .collect()
}

pub fn render(ctx: &GenerateContext) -> Result<String, GenerateError> {
    let project = &ctx.config.project;
    let index = DocsIndex {
        project: ProjectEntry {
            name: &project.name,
            tagline: &project.tagline,
            kind: project.kind,
        },
        tree: tree_entries(ctx, &ctx.tree.nodes),
        pages: ctx.flat,
    };
    let mut json = serde_json::to_string_pretty(&index)?;
    json.push('\n');
    Ok(json)
}
