//! Docs tree scanning.
//!
//! Stage 1 of the docpack pipeline. Walks the docs root, reads every markdown
//! file and turns it into a [`Page`]. Nothing here decides display order or
//! scores anything; later stages only read what the scan produced.
//!
//! ## Directory Structure
//!
//! ```text
//! docs/                         # Docs root (docs.path)
//! ├── overview.md               # Page "overview"
//! ├── api.md                    # Page "api"
//! ├── Guides/                   # Folder "guides"
//! │   ├── index.md              # Page "guides/index" (leads the folder)
//! │   └── Getting Started.md    # Page "guides/getting-started"
//! ├── drafts/                   # Excluded via docs.exclude = ["drafts/**"]
//! └── .obsidian/                # Hidden entries are never scanned
//! ```
//!
//! ## Failure Modes
//!
//! - The docs root missing, not a directory, or unreadable is fatal
//!   ([`ScanError`]); nothing else is attempted.
//! - A single unreadable (or non-UTF-8) file becomes a [`PageWarning`] and is
//!   left out. The scan continues.
//! - Two files normalizing to the same page id (`Foo.md` / `foo.md`) is fatal:
//!   silently keeping one would hide content.
//!
//! ## Concurrency
//!
//! File reads run on rayon's pool. Pages have no cross-page dependency and
//! results are collected back in walk order, so output is deterministic.

use crate::config::LoadedConfig;
use crate::metadata;
use crate::naming;
use crate::types::{Page, PageWarning};
use glob::Pattern;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Docs root not found: {0}")]
    RootNotFound(PathBuf),
    #[error("Docs root is not a directory: {0}")]
    NotADirectory(PathBuf),
    #[error("Cannot read docs root {0}: {1}")]
    RootUnreadable(PathBuf, std::io::Error),
    #[error("Pages '{first}' and '{second}' both normalize to id '{id}'")]
    DuplicateId {
        id: String,
        first: String,
        second: String,
    },
    #[error("Invalid glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),
}

/// Include/exclude glob filter applied to docs-relative paths.
#[derive(Debug, Clone, Default)]
pub struct ScanFilter {
    include: Vec<Pattern>,
    exclude: Vec<Pattern>,
}

impl ScanFilter {
    pub fn new(include: &[String], exclude: &[String]) -> Result<Self, ScanError> {
        let compile = |patterns: &[String]| -> Result<Vec<Pattern>, ScanError> {
            patterns
                .iter()
                .map(|p| Pattern::new(p).map_err(ScanError::from))
                .collect()
        };
        Ok(Self {
            include: compile(include)?,
            exclude: compile(exclude)?,
        })
    }

    /// Whether a docs-relative `/` path passes the filter.
    pub fn matches(&self, rel_path: &str) -> bool {
        let included = self.include.is_empty() || self.include.iter().any(|p| p.matches(rel_path));
        included && !self.exclude.iter().any(|p| p.matches(rel_path))
    }
}

/// Everything the scan stage produces.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScanResult {
    /// Pages in walk order (sorted by file name at every level).
    pub pages: Vec<Page>,
    /// Files that were skipped, with the reason.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<PageWarning>,
    /// Every non-hidden directory below the root, as docs-relative `/` paths,
    /// in walk order. Lets the tree builder mirror the on-disk layout.
    pub directories: Vec<String>,
}

impl ScanResult {
    /// Look up a page by id.
    pub fn page(&self, id: &str) -> Option<&Page> {
        self.pages.iter().find(|p| p.id == id)
    }

    /// Page id → page, for repeated lookups.
    pub fn index(&self) -> HashMap<&str, &Page> {
        self.pages.iter().map(|p| (p.id.as_str(), p)).collect()
    }
}

/// Scan using the docs path and filters from a loaded config.
pub fn scan_project(loaded: &LoadedConfig) -> Result<ScanResult, ScanError> {
    let filter = ScanFilter::new(&loaded.config.docs.include, &loaded.config.docs.exclude)?;
    scan(&loaded.docs_root(), &filter)
}

pub fn scan(root: &Path, filter: &ScanFilter) -> Result<ScanResult, ScanError> {
    if !root.exists() {
        return Err(ScanError::RootNotFound(root.to_path_buf()));
    }
    if !root.is_dir() {
        return Err(ScanError::NotADirectory(root.to_path_buf()));
    }
    fs::read_dir(root).map_err(|e| ScanError::RootUnreadable(root.to_path_buf(), e))?;

    let mut warnings = Vec::new();
    let mut directories = Vec::new();
    let mut candidates: Vec<(String, PathBuf)> = Vec::new();

    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e.file_name()));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                let path = err
                    .path()
                    .map(|p| relative_path(p, root))
                    .unwrap_or_default();
                warnings.push(PageWarning {
                    path,
                    message: err.to_string(),
                });
                continue;
            }
        };
        if entry.depth() == 0 {
            continue;
        }
        let rel = relative_path(entry.path(), root);
        if entry.file_type().is_dir() {
            directories.push(rel);
        } else if is_markdown(entry.path()) && filter.matches(&rel) {
            candidates.push((rel, entry.into_path()));
        }
    }

    let results: Vec<Result<Page, PageWarning>> = candidates
        .par_iter()
        .map(|(rel, path)| read_page(rel, path))
        .collect();

    let mut pages = Vec::with_capacity(results.len());
    for result in results {
        match result {
            Ok(page) => pages.push(page),
            Err(warning) => warnings.push(warning),
        }
    }

    check_unique_ids(&pages)?;

    for warning in &warnings {
        tracing::warn!(path = %warning.path, "skipped: {}", warning.message);
    }
    tracing::debug!(
        pages = pages.len(),
        warnings = warnings.len(),
        root = %root.display(),
        "scan complete"
    );

    Ok(ScanResult {
        pages,
        warnings,
        directories,
    })
}

/// Read one file and derive its page record.
fn read_page(rel: &str, path: &Path) -> Result<Page, PageWarning> {
    let content = fs::read_to_string(path).map_err(|e| PageWarning {
        path: rel.to_string(),
        message: e.to_string(),
    })?;
    let id = naming::page_id(rel);
    if id.is_empty() {
        return Err(PageWarning {
            path: rel.to_string(),
            message: "file name does not yield a page id".to_string(),
        });
    }
    Ok(build_page(id, rel, content))
}

/// Build a [`Page`] from its id, relative path and source text.
pub fn build_page(id: String, rel_path: &str, content: String) -> Page {
    let front = metadata::split_front_matter(&content);
    let title = front
        .get("title")
        .filter(|t| !t.trim().is_empty())
        .map(str::to_string)
        .or_else(|| metadata::first_h1(front.body))
        .unwrap_or_else(|| id.clone());
    let description = front
        .get("description")
        .filter(|d| !d.trim().is_empty())
        .map(str::to_string);
    let order = front.get("order").and_then(|o| o.trim().parse::<i64>().ok());
    let headings = metadata::extract_headings(front.body);
    let (word_count, code_block_count) = metadata::content_metrics(front.body);

    Page {
        id,
        title,
        path: rel_path.to_string(),
        headings,
        word_count,
        code_block_count,
        description,
        order,
        raw_content: content,
    }
}

fn check_unique_ids(pages: &[Page]) -> Result<(), ScanError> {
    let mut seen: HashMap<&str, &str> = HashMap::new();
    for page in pages {
        if let Some(first) = seen.insert(&page.id, &page.path) {
            return Err(ScanError::DuplicateId {
                id: page.id.clone(),
                first: first.to_string(),
                second: page.path.clone(),
            });
        }
    }
    Ok(())
}

fn is_hidden(name: &std::ffi::OsStr) -> bool {
    name.to_string_lossy().starts_with('.')
}

fn is_markdown(path: &Path) -> bool {
    path.extension()
        .map(|e| e.eq_ignore_ascii_case("md"))
        .unwrap_or(false)
}

/// Docs-relative path with `/` separators on every platform.
fn relative_path(path: &Path, root: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
