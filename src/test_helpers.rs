//! Shared test utilities for the docpack test suite.
//!
//! Provides fixture setup, lookup helpers and page-tree assertions that work
//! with scan and tree data structures (`ScanResult`, `PageTree`).
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! let loaded = load_fixture_config(&tmp);
//! let result = scan_project(&loaded).unwrap();
//!
//! let page = find_page(&result, "overview");
//! assert_eq!(page.title, "Overview");
//!
//! let tree = build_tree(&result, &loaded.config.docs);
//! assert_eq!(tree_outline(&tree)[0], "page:overview");
//! ```

use std::path::Path;
use tempfile::TempDir;

use crate::config::{self, LoadedConfig};
use crate::scan::ScanResult;
use crate::types::{Page, PageFolder, PageNode, PageTree};

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/project/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/project");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

/// Load the `docpack.toml` of a fixture copy.
pub fn load_fixture_config(tmp: &TempDir) -> LoadedConfig {
    config::load_config(&tmp.path().join(config::CONFIG_FILENAME)).unwrap()
}

// =========================================================================
// Lookups — panics with a clear message on miss
// =========================================================================

/// Find a scanned page by id. Panics if not found.
pub fn find_page<'a>(result: &'a ScanResult, id: &str) -> &'a Page {
    result.page(id).unwrap_or_else(|| {
        let ids = page_ids(result);
        panic!("page '{id}' not found. Available: {ids:?}")
    })
}

/// Find a folder anywhere in the tree by id. Panics if not found.
pub fn find_folder<'a>(tree: &'a PageTree, id: &str) -> &'a PageFolder {
    fn search<'a>(nodes: &'a [PageNode], id: &str) -> Option<&'a PageFolder> {
        nodes.iter().find_map(|node| match node {
            PageNode::Folder(folder) if folder.id == id => Some(folder),
            PageNode::Folder(folder) => search(&folder.children, id),
            _ => None,
        })
    }
    search(&tree.nodes, id).unwrap_or_else(|| {
        let outline = tree_outline(tree);
        panic!("folder '{id}' not found. Tree: {outline:#?}")
    })
}

// =========================================================================
// Bulk extractors
// =========================================================================

/// All page ids in scan order.
pub fn page_ids(result: &ScanResult) -> Vec<&str> {
    result.pages.iter().map(|p| p.id.as_str()).collect()
}

/// One line per tree node, two spaces of indent per level:
/// `page:<id>`, `missing:<id>`, `folder:<id>` or `separator:<label>`.
pub fn tree_outline(tree: &PageTree) -> Vec<String> {
    fn walk(nodes: &[PageNode], depth: usize, lines: &mut Vec<String>) {
        let pad = "  ".repeat(depth);
        for node in nodes {
            match node {
                PageNode::Page(item) if item.status.is_missing() => {
                    lines.push(format!("{pad}missing:{}", item.id))
                }
                PageNode::Page(item) => lines.push(format!("{pad}page:{}", item.id)),
                PageNode::Folder(folder) => {
                    lines.push(format!("{pad}folder:{}", folder.id));
                    walk(&folder.children, depth + 1, lines);
                }
                PageNode::Separator(sep) => lines.push(format!("{pad}separator:{}", sep.label)),
            }
        }
    }
    let mut lines = Vec::new();
    walk(&tree.nodes, 0, &mut lines);
    lines
}
