//! Page tree construction and linearization.
//!
//! Stage 2 of the docpack pipeline. Arranges scanned pages into the ordered
//! hierarchy every artifact is rendered from, then flattens it into the
//! sequence that drives previous/next navigation.
//!
//! ## Ordering
//!
//! At every folder level:
//!
//! 1. Entries named in `docs.order` come first, in that order. A
//!    `---Label---` entry places a separator before the next named entry.
//! 2. A folder's `index.md` leads the rest and lends the folder its title.
//! 3. Pages with a front-matter `order` follow, ascending.
//! 4. Everything else keeps directory listing order (file name order).
//! 5. Placeholders for missing pages come last.
//!
//! ```text
//! docs.order = ["overview", "---Guides---", "guides", "api"]
//!
//! Overview
//! ── Guides ──
//! Guides/
//! │   Introduction        (guides/index.md)
//! │   Getting started
//! Api                      (missing: required but not on disk)
//! ```
//!
//! ## Invariants
//!
//! - A folder with no `PageItem` below it is dropped; a separator with no
//!   page or folder after it at its level is dropped.
//! - [`flatten`] is a pure pre-order walk: the same tree always yields the
//!   same sequence, and prev/next come only from that sequence.

use crate::config::DocsConfig;
use crate::naming;
use crate::scan::ScanResult;
use crate::types::{
    FlatPage, Page, PageFolder, PageItem, PageNode, PageSeparator, PageStatus, PageTree,
};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

/// Hints that apply to one folder level, in config order.
#[derive(Debug, Clone, PartialEq)]
enum Hint {
    Item(String),
    Separator(String),
}

#[derive(Debug)]
enum BuildNode {
    Page {
        item: PageItem,
        order: Option<i64>,
        is_index: bool,
        sort_name: String,
    },
    Folder {
        folder: FolderBuild,
        sort_name: String,
    },
    Separator(String),
}

impl BuildNode {
    fn id(&self) -> Option<&str> {
        match self {
            BuildNode::Page { item, .. } => Some(&item.id),
            BuildNode::Folder { folder, .. } => Some(&folder.id),
            BuildNode::Separator(_) => None,
        }
    }

    fn is_folder(&self, id: &str) -> bool {
        matches!(self, BuildNode::Folder { folder, .. } if folder.id == id)
    }

    /// Sort key for entries no hint placed.
    fn sort_key(&self) -> (bool, bool, i64, bool, &str) {
        match self {
            BuildNode::Page {
                item,
                order,
                is_index,
                sort_name,
            } => (
                !is_index,
                order.is_none(),
                order.unwrap_or(0),
                item.status.is_missing(),
                sort_name.as_str(),
            ),
            BuildNode::Folder { sort_name, .. } => (true, true, 0, false, sort_name.as_str()),
            BuildNode::Separator(label) => (true, true, 0, true, label.as_str()),
        }
    }
}

#[derive(Debug, Default)]
struct FolderBuild {
    id: String,
    title: String,
    children: Vec<BuildNode>,
}

impl FolderBuild {
    /// Descend through `segments` (`(folder id, raw name)` pairs), creating
    /// folders as needed.
    fn folder_at(&mut self, segments: &[(String, String)]) -> &mut FolderBuild {
        let Some(((id, raw_name), rest)) = segments.split_first() else {
            return self;
        };
        let pos = match self.children.iter().position(|c| c.is_folder(id)) {
            Some(pos) => pos,
            None => {
                self.children.push(BuildNode::Folder {
                    folder: FolderBuild {
                        id: id.clone(),
                        title: naming::display_title(raw_name),
                        children: Vec::new(),
                    },
                    sort_name: raw_name.clone(),
                });
                self.children.len() - 1
            }
        };
        match &mut self.children[pos] {
            BuildNode::Folder { folder, .. } => folder.folder_at(rest),
            _ => unreachable!("position() only matches folders"),
        }
    }

    fn apply_order(&mut self, hints: &HashMap<String, Vec<Hint>>) {
        let mut remaining = std::mem::take(&mut self.children);
        let mut ordered = Vec::with_capacity(remaining.len());

        if let Some(level_hints) = hints.get(&self.id) {
            // A separator is placed only once a named entry lands after it.
            let mut pending = Vec::new();
            for hint in level_hints {
                match hint {
                    Hint::Separator(label) => pending.push(BuildNode::Separator(label.clone())),
                    Hint::Item(id) => {
                        let (matched, rest): (Vec<_>, Vec<_>) = remaining
                            .into_iter()
                            .partition(|c| c.id() == Some(id.as_str()));
                        remaining = rest;
                        if !matched.is_empty() {
                            ordered.append(&mut pending);
                            ordered.extend(matched);
                        }
                    }
                }
            }
        }

        remaining.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
        ordered.extend(remaining);

        for child in &mut ordered {
            if let BuildNode::Folder { folder, .. } = child {
                folder.apply_order(hints);
            }
        }
        self.children = ordered;
    }

    fn into_nodes(self) -> Vec<PageNode> {
        let mut nodes: Vec<PageNode> = Vec::new();
        for child in self.children {
            match child {
                BuildNode::Page { item, .. } => nodes.push(PageNode::Page(item)),
                BuildNode::Folder { folder, .. } => {
                    let id = folder.id.clone();
                    let title = folder.title.clone();
                    let children = folder.into_nodes();
                    let node = PageNode::Folder(PageFolder {
                        id,
                        title,
                        children,
                    });
                    if node.page_count() > 0 {
                        nodes.push(node);
                    }
                }
                BuildNode::Separator(label) => {
                    nodes.push(PageNode::Separator(PageSeparator { label }))
                }
            }
        }
        drop_dangling_separators(nodes)
    }
}

/// Keep a separator only when a page or folder follows it before the next
/// separator.
fn drop_dangling_separators(nodes: Vec<PageNode>) -> Vec<PageNode> {
    let mut kept = Vec::with_capacity(nodes.len());
    let mut iter = nodes.into_iter().peekable();
    while let Some(node) = iter.next() {
        let is_separator = matches!(node, PageNode::Separator(_));
        let next_is_content = matches!(
            iter.peek(),
            Some(PageNode::Page(_)) | Some(PageNode::Folder(_))
        );
        if !is_separator || next_is_content {
            kept.push(node);
        }
    }
    kept
}

/// Parent level of an id: `"guides/install"` → `"guides"`, `"api"` → `""`.
fn parent_id(id: &str) -> &str {
    id.rsplit_once('/').map(|(parent, _)| parent).unwrap_or("")
}

/// Cumulative `(folder id, raw name)` pairs for a `/` path of directories.
fn folder_segments(raw_dirs: &str) -> Vec<(String, String)> {
    let mut segments = Vec::new();
    let mut id = String::new();
    for raw in raw_dirs.split('/').filter(|s| !s.is_empty()) {
        let kebab = naming::kebab_segment(raw);
        if kebab.is_empty() {
            continue;
        }
        if !id.is_empty() {
            id.push('/');
        }
        id.push_str(&kebab);
        segments.push((id.clone(), raw.to_string()));
    }
    segments
}

/// Group `docs.order` entries by the folder level they apply to.
fn level_hints(order: &[String]) -> HashMap<String, Vec<Hint>> {
    let mut hints: HashMap<String, Vec<Hint>> = HashMap::new();
    let mut pending = Vec::new();
    for entry in order {
        if let Some(label) = naming::parse_separator(entry) {
            pending.push(Hint::Separator(label.to_string()));
            continue;
        }
        let id = naming::page_id(entry);
        if id.is_empty() {
            continue;
        }
        let level = hints.entry(parent_id(&id).to_string()).or_default();
        level.append(&mut pending);
        level.push(Hint::Item(id));
    }
    // Separators left in `pending` have no named entry after them.
    hints
}

/// Page ids the configuration refers to: required pages and order hints.
pub fn referenced_ids(docs: &DocsConfig) -> BTreeSet<String> {
    references(docs).into_keys().collect()
}

/// Referenced ids mapped to whether only a page can satisfy them.
///
/// `docs.required` entries and `.md` order entries name pages. A bare order
/// entry like `"guides"` may also name a folder.
fn references(docs: &DocsConfig) -> BTreeMap<String, bool> {
    let mut refs: BTreeMap<String, bool> = BTreeMap::new();
    let required = docs.required.iter().map(|entry| (entry, true));
    let ordered = docs
        .order
        .iter()
        .filter(|entry| naming::parse_separator(entry).is_none())
        .map(|entry| (entry, naming::strip_md_extension(entry.trim()) != entry.trim()));
    for (entry, page_only) in required.chain(ordered) {
        let id = naming::page_id(entry);
        if !id.is_empty() {
            *refs.entry(id).or_default() |= page_only;
        }
    }
    refs
}

/// Ids of every folder that holds at least one scanned page.
fn folders_with_pages(scan: &ScanResult) -> HashSet<&str> {
    let mut folders = HashSet::new();
    for page in &scan.pages {
        let mut id = page.id.as_str();
        while let Some((parent, _)) = id.rsplit_once('/') {
            folders.insert(parent);
            id = parent;
        }
    }
    folders
}

/// Build the ordered page tree from scanned pages and the docs config.
pub fn build_tree(scan: &ScanResult, docs: &DocsConfig) -> PageTree {
    let mut root = FolderBuild::default();

    for dir in &scan.directories {
        root.folder_at(&folder_segments(dir));
    }

    for page in &scan.pages {
        insert_page(&mut root, page);
    }

    let page_ids: HashSet<&str> = scan.pages.iter().map(|p| p.id.as_str()).collect();
    let folder_ids = folders_with_pages(scan);

    for (id, page_only) in references(docs) {
        if page_ids.contains(id.as_str()) || (!page_only && folder_ids.contains(id.as_str())) {
            continue;
        }
        tracing::warn!(id = %id, "configured page not found on disk");
        let parent = parent_id(&id);
        let segments: Vec<(String, String)> = folder_segments(parent);
        let name = id.rsplit('/').next().unwrap_or(&id).to_string();
        root.folder_at(&segments).children.push(BuildNode::Page {
            item: PageItem {
                id: id.clone(),
                title: naming::display_title(&name),
                path: None,
                status: PageStatus::Missing,
            },
            order: None,
            is_index: false,
            sort_name: name,
        });
    }

    root.apply_order(&level_hints(&docs.order));
    PageTree {
        nodes: root.into_nodes(),
    }
}

fn insert_page(root: &mut FolderBuild, page: &Page) {
    let (dirs, file_name) = page.path.rsplit_once('/').unwrap_or(("", page.path.as_str()));
    let folder = root.folder_at(&folder_segments(dirs));
    let is_index = naming::page_id(file_name) == "index";
    if is_index && !folder.id.is_empty() {
        folder.title = page.title.clone();
    }
    folder.children.push(BuildNode::Page {
        item: PageItem {
            id: page.id.clone(),
            title: page.title.clone(),
            path: Some(page.path.clone()),
            status: PageStatus::Present,
        },
        order: page.order,
        is_index,
        sort_name: file_name.to_string(),
    });
}

/// Linearize the tree: one entry per `PageItem`, depth-first pre-order,
/// folders and separators skipped.
pub fn flatten(tree: &PageTree) -> Vec<FlatPage> {
    let mut items: Vec<&PageItem> = Vec::with_capacity(tree.page_count());
    collect_items(&tree.nodes, &mut items);

    let ids: Vec<&str> = items.iter().map(|i| i.id.as_str()).collect();
    items
        .iter()
        .enumerate()
        .map(|(i, item)| FlatPage {
            id: item.id.clone(),
            title: item.title.clone(),
            path: item.path.clone(),
            missing: item.status.is_missing(),
            prev: i.checked_sub(1).map(|p| ids[p].to_string()),
            next: ids.get(i + 1).map(|n| n.to_string()),
        })
        .collect()
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

/// Previous and next page ids for `id`, or `None` if the page is not in the
/// sequence.
pub fn neighbors<'a>(flat: &'a [FlatPage], id: &str) -> Option<(Option<&'a str>, Option<&'a str>)> {
    flat.iter()
        .find(|f| f.id == id)
        .map(|f| (f.prev.as_deref(), f.next.as_deref()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::build_page;
    use crate::test_helpers::*;

    fn page(path: &str, content: &str) -> Page {
        build_page(naming::page_id(path), path, content.to_string())
    }

    fn scan_of(pages: Vec<Page>, directories: &[&str]) -> ScanResult {
        ScanResult {
            pages,
            warnings: Vec::new(),
            directories: directories.iter().map(|d| d.to_string()).collect(),
        }
    }

    fn docs_with(required: &[&str], order: &[&str]) -> DocsConfig {
        DocsConfig {
            required: required.iter().map(|s| s.to_string()).collect(),
            order: order.iter().map(|s| s.to_string()).collect(),
            ..DocsConfig::default()
        }
    }

    fn sample_scan() -> ScanResult {
        scan_of(
            vec![
                page("api.md", "# API"),
                page("guides/index.md", "# Introduction"),
                page("guides/install.md", "# Install"),
                page("guides/usage.md", "# Usage"),
                page("overview.md", "# Overview"),
            ],
            &["empty", "guides"],
        )
    }

    // =========================================================================
    // Tree shape
    // =========================================================================

    #[test]
    fn filesystem_order_without_hints() {
        let tree = build_tree(&sample_scan(), &DocsConfig::default());
        assert_eq!(
            tree_outline(&tree),
            vec![
                "page:api",
                "folder:guides",
                "  page:guides/index",
                "  page:guides/install",
                "  page:guides/usage",
                "page:overview",
            ]
        );
    }

    #[test]
    fn empty_folder_dropped() {
        let tree = build_tree(&sample_scan(), &DocsConfig::default());
        assert!(!tree_outline(&tree).iter().any(|l| l.contains("empty")));
    }

    #[test]
    fn index_page_titles_folder() {
        let tree = build_tree(&sample_scan(), &DocsConfig::default());
        let folder = find_folder(&tree, "guides");
        assert_eq!(folder.title, "Introduction");
    }

    #[test]
    fn folder_title_from_directory_name() {
        let scan = scan_of(vec![page("getting-started/step.md", "# Step")], &["getting-started"]);
        let tree = build_tree(&scan, &DocsConfig::default());
        assert_eq!(find_folder(&tree, "getting-started").title, "Getting started");
    }

    #[test]
    fn explicit_order_with_separator() {
        let docs = docs_with(&[], &["overview", "---Guides---", "guides", "guides/usage"]);
        let tree = build_tree(&sample_scan(), &docs);
        assert_eq!(
            tree_outline(&tree),
            vec![
                "page:overview",
                "separator:Guides",
                "folder:guides",
                "  page:guides/usage",
                "  page:guides/index",
                "  page:guides/install",
                "page:api",
            ]
        );
    }

    #[test]
    fn trailing_separator_dropped() {
        let docs = docs_with(&[], &["overview", "---Nothing after---"]);
        let tree = build_tree(&sample_scan(), &docs);
        assert!(!tree_outline(&tree).iter().any(|l| l.starts_with("separator")));
    }

    #[test]
    fn front_matter_order_beats_file_name() {
        let scan = scan_of(
            vec![
                page("a.md", "# A"),
                page("b.md", "---\norder: 1\n---\n# B"),
                page("c.md", "---\norder: 0\n---\n# C"),
            ],
            &[],
        );
        let tree = build_tree(&scan, &DocsConfig::default());
        assert_eq!(tree_outline(&tree), vec!["page:c", "page:b", "page:a"]);
    }

    // =========================================================================
    // Missing placeholders
    // =========================================================================

    #[test]
    fn required_but_absent_page_is_missing_entry() {
        let scan = scan_of(vec![page("overview.md", "# Overview")], &[]);
        let docs = docs_with(&["overview.md", "api.md"], &[]);
        let tree = build_tree(&scan, &docs);
        assert_eq!(tree_outline(&tree), vec!["page:overview", "missing:api"]);
        let flat = flatten(&tree);
        assert!(flat[1].missing);
        assert_eq!(flat[1].path, None);
    }

    #[test]
    fn missing_page_creates_folder() {
        let scan = scan_of(vec![page("overview.md", "# Overview")], &[]);
        let docs = docs_with(&["reference/cli.md"], &[]);
        let tree = build_tree(&scan, &docs);
        assert_eq!(
            tree_outline(&tree),
            vec!["page:overview", "folder:reference", "  missing:reference/cli"]
        );
    }

    #[test]
    fn order_hint_for_existing_folder_is_not_missing() {
        let docs = docs_with(&[], &["guides"]);
        let tree = build_tree(&sample_scan(), &docs);
        assert!(!tree_outline(&tree).iter().any(|l| l.starts_with("missing")));
    }

    #[test]
    fn folder_hint_resolved_from_pages_not_directory_list() {
        let scan = scan_of(vec![page("guides/install.md", "# Install")], &[]);
        let tree = build_tree(&scan, &docs_with(&[], &["guides"]));
        assert_eq!(tree_outline(&tree), vec!["folder:guides", "  page:guides/install"]);
    }

    #[test]
    fn required_page_named_like_empty_directory_is_missing() {
        let scan = scan_of(vec![page("overview.md", "# Overview")], &["drafts"]);
        let docs = docs_with(&["overview.md", "drafts.md"], &[]);
        let tree = build_tree(&scan, &docs);
        assert_eq!(tree_outline(&tree), vec!["page:overview", "missing:drafts"]);
    }

    #[test]
    fn md_order_entry_is_not_satisfied_by_folder() {
        let docs = docs_with(&[], &["guides.md"]);
        let tree = build_tree(&sample_scan(), &docs);
        let outline = tree_outline(&tree);
        assert!(outline.contains(&"missing:guides".to_string()), "{outline:?}");
        assert_eq!(find_folder(&tree, "guides").children.len(), 3);
    }

    // =========================================================================
    // Flattening
    // =========================================================================

    #[test]
    fn flatten_length_equals_page_items() {
        let docs = docs_with(&["missing-one.md"], &["---Sep---", "overview"]);
        let tree = build_tree(&sample_scan(), &docs);
        assert_eq!(flatten(&tree).len(), tree.page_count());
        assert_eq!(tree.page_count(), 6);
    }

    #[test]
    fn flatten_is_stable() {
        let tree = build_tree(&sample_scan(), &DocsConfig::default());
        assert_eq!(flatten(&tree), flatten(&tree));
    }

    #[test]
    fn prev_next_follow_sequence() {
        let tree = build_tree(&sample_scan(), &DocsConfig::default());
        let flat = flatten(&tree);
        assert_eq!(flat.first().unwrap().prev, None);
        assert_eq!(flat.last().unwrap().next, None);
        for i in 1..flat.len() - 1 {
            assert_eq!(flat[i].prev.as_deref(), Some(flat[i - 1].id.as_str()));
            assert_eq!(flat[i].next.as_deref(), Some(flat[i + 1].id.as_str()));
        }
    }

    #[test]
    fn neighbors_lookup() {
        let tree = build_tree(&sample_scan(), &DocsConfig::default());
        let flat = flatten(&tree);
        assert_eq!(
            neighbors(&flat, "guides/index"),
            Some((Some("api"), Some("guides/install")))
        );
        assert_eq!(neighbors(&flat, "nope"), None);
    }

    #[test]
    fn single_page_has_no_neighbors() {
        let scan = scan_of(vec![page("only.md", "# Only")], &[]);
        let flat = flatten(&build_tree(&scan, &DocsConfig::default()));
        assert_eq!(flat.len(), 1);
        assert_eq!((flat[0].prev.clone(), flat[0].next.clone()), (None, None));
    }
}
