//! # docpack
//!
//! Audits a project's hand-written markdown docs and derives the files coding
//! agents and LLM tools read: `AGENTS.md`, `llms.txt`, `docs.json` and
//! `install.md`. The docs directory is the data source; `docpack.toml`
//! declares what must exist and how the artifacts look.
//!
//! # Architecture: One Model, Several Projections
//!
//! ```text
//! 1. Scan      docs/        →  pages          (filesystem → Page records)
//! 2. Tree      pages        →  page tree      (ordering, folders, missing entries)
//!              page tree    →  flat sequence  (prev/next)
//! 3. Audit     pages        →  score          (four checks per required section)
//! 4. Generate  model        →  artifacts      (AGENTS.md, llms.txt, docs.json, install.md)
//! ```
//!
//! Audit and generation only read the model. Every artifact is a projection
//! of the same pages in the same order, so they cannot disagree about which
//! pages exist or what follows what.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | `docpack.toml` loading, layering over stock defaults, validation |
//! | [`naming`] | Page ids, heading slugs, folder display titles |
//! | [`metadata`] | Front matter, titles, headings, word and code-block counts |
//! | [`types`] | Shared document model (`Page`, `PageNode`, `FlatPage`) |
//! | [`scan`] | Stage 1: walks the docs root and builds pages |
//! | [`tree`] | Stage 2: orders pages into a tree and flattens it |
//! | [`audit`] | Stage 3: completeness score and pass/fail |
//! | [`template`] | `{placeholder}` substitution |
//! | [`generate`] | Stage 4: renders, writes and checks the four artifacts |
//! | [`skills`] | Prompt templates for external agents |
//! | [`pipeline`] | Runs the stages and collects partial results |
//! | [`output`] | CLI output formatting for every stage |
//!
//! # Design Decisions
//!
//! ## Audit Is Data
//!
//! A missing page is the most common finding, not an error. The audit
//! returns a report for any docs tree; only an absent docs root stops a run.
//!
//! ## Deterministic Artifacts
//!
//! No timestamps, sorted maps, fixed iteration order. Regenerating with the
//! same inputs gives byte-identical files, which is what makes
//! `generate --check` usable in CI.
//!
//! ## Per-Artifact Isolation
//!
//! The four artifacts are written independently. An install guide with an
//! unresolved placeholder is reported and the other three are still written.

pub mod audit;
pub mod config;
pub mod generate;
pub mod metadata;
pub mod naming;
pub mod output;
pub mod pipeline;
pub mod scan;
pub mod skills;
pub mod template;
pub mod tree;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
