//! Centralized naming rules for ids, slugs and display titles.
//!
//! Every identifier docpack emits is derived here so the scanner, the tree
//! builder, the audit and the config validator agree on what a name means:
//!
//! - `Guides/Getting Started.md` → page id `guides/getting-started`
//! - `## Install & Run` → heading slug `install-run`
//! - `getting-started/` → folder title `Getting started`

use std::collections::HashMap;

/// Lower-kebab-case a single path segment.
///
/// ASCII letters are lowercased, runs of whitespace, `_`, `.` and `-` collapse
/// into one hyphen, and anything else is dropped. Leading and trailing hyphens
/// are trimmed.
pub fn kebab_segment(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    let mut pending_dash = false;
    for ch in segment.chars() {
        if ch.is_alphanumeric() {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.extend(ch.to_lowercase());
        } else if ch.is_whitespace() || matches!(ch, '_' | '.' | '-') {
            pending_dash = true;
        }
    }
    out
}

/// Normalize a docs-relative path (or a config reference to one) into a page id.
///
/// Accepts both `/` and `\` separators, ignores a leading `./`, strips a
/// trailing `.md` (any case) and kebab-cases every segment.
///
/// - `"overview.md"` → `"overview"`
/// - `"Guides/Getting Started.md"` → `"guides/getting-started"`
/// - `"api"` → `"api"`
pub fn page_id(path: &str) -> String {
    let trimmed = path.trim().trim_start_matches("./");
    let without_ext = strip_md_extension(trimmed);
    without_ext
        .split(['/', '\\'])
        .map(kebab_segment)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

/// Strip a trailing `.md` extension, case-insensitively.
pub fn strip_md_extension(path: &str) -> &str {
    let len = path.len();
    if len >= 3 && path.is_char_boundary(len - 3) && path[len - 3..].eq_ignore_ascii_case(".md") {
        &path[..len - 3]
    } else {
        path
    }
}

/// Slugify heading text: lowercase, whitespace → `-`, punctuation stripped.
///
/// Backticks and other punctuation vanish, existing hyphens and underscores
/// are kept, and repeated separators collapse.
pub fn slugify(text: &str) -> String {
    let mut out = String::new();
    let mut prev_dash = false;
    for ch in text.chars() {
        if ch.is_alphanumeric() || ch == '_' {
            out.extend(ch.to_lowercase());
            prev_dash = false;
        } else if (ch.is_whitespace() || ch == '-') && !out.is_empty() && !prev_dash {
            out.push('-');
            prev_dash = true;
        }
    }
    while out.ends_with('-') {
        out.pop();
    }
    out
}

/// Hands out unique heading slugs within one page.
///
/// The first occurrence keeps its slug, later ones get `-2`, `-3`, …
#[derive(Debug, Default)]
pub struct SlugAllocator {
    counts: HashMap<String, usize>,
}

impl SlugAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate(&mut self, text: &str) -> String {
        let base = slugify(text);
        let base = if base.is_empty() {
            "section".to_string()
        } else {
            base
        };
        let count = self.counts.entry(base.clone()).or_insert(0);
        *count += 1;
        if *count == 1 {
            base
        } else {
            let candidate = format!("{base}-{count}");
            // "intro-2" may itself be a real heading later on; reserve it.
            self.counts.entry(candidate.clone()).or_insert(1);
            candidate
        }
    }
}

/// Display title for a directory name: separators become spaces and the first
/// letter is upper-cased.
///
/// - `"getting-started"` → `"Getting started"`
/// - `"api_reference"` → `"Api reference"`
pub fn display_title(name: &str) -> String {
    let spaced: String = name
        .chars()
        .map(|c| if c == '-' || c == '_' { ' ' } else { c })
        .collect();
    let spaced = spaced.split_whitespace().collect::<Vec<_>>().join(" ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Parse a `---Label---` separator hint. Returns the trimmed label.
pub fn parse_separator(entry: &str) -> Option<&str> {
    let inner = entry.trim().strip_prefix("---")?.strip_suffix("---")?;
    Some(inner.trim())
}
