//! Shared document model used across all pipeline stages.
//!
//! The scanner creates [`Page`]s, the tree builder arranges them into
//! [`PageNode`]s and linearizes them into [`FlatPage`]s, and the audit and
//! generators only read. Tree nodes and flat entries refer to pages by id and
//! never copy page content.

use serde::{Deserialize, Serialize};

/// One scanned markdown source file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// Stable slug derived from the docs-relative path (`guides/install`).
    pub id: String,
    /// Front matter `title`, first H1, or the id.
    pub title: String,
    /// Docs-relative source path with `/` separators.
    pub path: String,
    /// Second- and third-level headings in document order.
    pub headings: Vec<Heading>,
    /// Prose words outside code blocks.
    pub word_count: usize,
    /// Fenced code blocks.
    pub code_block_count: usize,
    /// Front matter `description`, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Front matter `order` ordering hint, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
    /// Unmodified source text.
    pub raw_content: String,
}

impl Page {
    /// Markdown body with any front-matter block removed.
    pub fn body(&self) -> &str {
        crate::metadata::split_front_matter(&self.raw_content).body
    }

    /// Whether the page has content beyond whitespace and front matter.
    pub fn is_empty(&self) -> bool {
        self.body().trim().is_empty()
    }

    /// File name component of `path`.
    pub fn file_name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }
}

/// An in-page heading used for navigation anchors and structure checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    /// 2 or 3.
    pub depth: u8,
    /// Unique within the page.
    pub slug: String,
    pub text: String,
}

/// A file the scanner could not turn into a page. The scan continues.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageWarning {
    pub path: String,
    pub message: String,
}

/// Whether a tree entry has a file behind it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageStatus {
    #[default]
    Present,
    /// Referenced by configuration but not found on disk.
    Missing,
}

impl PageStatus {
    pub fn is_missing(self) -> bool {
        self == PageStatus::Missing
    }
}

/// Page hierarchy node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PageNode {
    Page(PageItem),
    Folder(PageFolder),
    Separator(PageSeparator),
}

impl PageNode {
    /// Number of `PageItem` leaves at or below this node.
    pub fn page_count(&self) -> usize {
        match self {
            PageNode::Page(_) => 1,
            PageNode::Folder(folder) => folder.children.iter().map(PageNode::page_count).sum(),
            PageNode::Separator(_) => 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageItem {
    pub id: String,
    pub title: String,
    /// Source path; absent for missing entries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default)]
    pub status: PageStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageFolder {
    /// Folder path relative to the docs root, kebab-cased like page ids.
    pub id: String,
    pub title: String,
    pub children: Vec<PageNode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSeparator {
    pub label: String,
}

/// Ordered root-level nodes of the page hierarchy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageTree {
    pub nodes: Vec<PageNode>,
}

impl PageTree {
    pub fn page_count(&self) -> usize {
        self.nodes.iter().map(PageNode::page_count).sum()
    }
}

/// One page in final display order, with its sequential neighbours.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatPage {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub missing: bool,
    pub prev: Option<String>,
    pub next: Option<String>,
}
