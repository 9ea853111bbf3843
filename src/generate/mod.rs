//! Artifact generation.
//!
//! Stage 4 of the docpack pipeline. Renders the scanned pages and the page
//! tree into four derived files, all written under `docs.output`:
//!
//! ```text
//! .
//! ├── AGENTS.md      # Agent context: critical context, entry points, rules, page bodies
//! ├── llms.txt       # One short paragraph per top-level section
//! ├── docs.json      # Page tree + flat page sequence with prev/next
//! └── install.md     # LLM-executable install guide for the project type
//! ```
//!
//! ## Rendering
//!
//! Each artifact has its own submodule with a pure `render` function over a
//! [`GenerateContext`]. Output carries no timestamps and iterates only over
//! ordered collections, so re-running with unchanged inputs is byte-identical.
//!
//! ## Writing
//!
//! [`generate`] renders and writes the selected artifacts on rayon's pool,
//! one task per artifact and each to its own path. A failure in one artifact
//! (an install template with an unresolved placeholder, a write error) is
//! recorded in its [`ArtifactOutcome`] and the others still complete.
//!
//! In [`Mode::Check`] nothing is written: each artifact is rendered and
//! compared with what is on disk.
//!
//! Concurrent runs against one output directory are not coordinated; callers
//! must serialize them.

pub mod agents_md;
pub mod docs_json;
pub mod install_md;
pub mod llms_txt;

use crate::config::ProjectConfig;
use crate::scan::ScanResult;
use crate::template::TemplateError;
use crate::types::{FlatPage, Page, PageTree};
use rayon::prelude::*;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("Unresolved placeholder {{{0}}}: set it in [install] or [project]")]
    TemplateMissingPlaceholder(String),
    #[error("Template error: {0}")]
    Template(TemplateError),
    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<TemplateError> for GenerateError {
    fn from(err: TemplateError) -> Self {
        match err {
            TemplateError::MissingPlaceholder(name) => GenerateError::TemplateMissingPlaceholder(name),
            other => GenerateError::Template(other),
        }
    }
}

/// Everything an artifact is rendered from. Read-only.
#[derive(Debug, Clone, Copy)]
pub struct GenerateContext<'a> {
    pub config: &'a ProjectConfig,
    pub scan: &'a ScanResult,
    pub tree: &'a PageTree,
    pub flat: &'a [FlatPage],
}

impl<'a> GenerateContext<'a> {
    pub fn page(&self, id: &str) -> Option<&'a Page> {
        self.scan.page(id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArtifactKind {
    AgentsMd,
    LlmsTxt,
    DocsJson,
    InstallMd,
}

impl ArtifactKind {
    pub const ALL: [ArtifactKind; 4] = [
        ArtifactKind::AgentsMd,
        ArtifactKind::LlmsTxt,
        ArtifactKind::DocsJson,
        ArtifactKind::InstallMd,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            ArtifactKind::AgentsMd => "AGENTS.md",
            ArtifactKind::LlmsTxt => "llms.txt",
            ArtifactKind::DocsJson => "docs.json",
            ArtifactKind::InstallMd => "install.md",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ArtifactKind::AgentsMd => "agents-md",
            ArtifactKind::LlmsTxt => "llms-txt",
            ArtifactKind::DocsJson => "docs-json",
            ArtifactKind::InstallMd => "install-md",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A rendered artifact, not yet written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedArtifact {
    pub kind: ArtifactKind,
    pub contents: String,
}

impl GeneratedArtifact {
    pub fn file_name(&self) -> &'static str {
        self.kind.file_name()
    }

    pub fn digest(&self) -> String {
        short_digest(&self.contents)
    }
}

/// Render one artifact.
pub fn render(kind: ArtifactKind, ctx: &GenerateContext) -> Result<GeneratedArtifact, GenerateError> {
    let contents = match kind {
        ArtifactKind::AgentsMd => agents_md::render(ctx),
        ArtifactKind::LlmsTxt => llms_txt::render(ctx),
        ArtifactKind::DocsJson => docs_json::render(ctx)?,
        ArtifactKind::InstallMd => install_md::render(ctx.config)?,
    };
    Ok(GeneratedArtifact { kind, contents })
}

/// First 12 hex chars of the SHA-256 of `contents`.
pub fn short_digest(contents: &str) -> String {
    let hex = format!("{:x}", Sha256::digest(contents.as_bytes()));
    hex[..12].to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    Write,
    Check,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArtifactStatus {
    /// Written with new contents.
    Written,
    /// Already on disk with identical contents; not rewritten.
    Unchanged,
    /// Check mode: disk matches.
    UpToDate,
    /// Check mode: disk differs.
    Stale,
    /// Check mode: not on disk.
    Missing,
    Failed(String),
}

impl ArtifactStatus {
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            ArtifactStatus::Failed(_) | ArtifactStatus::Stale | ArtifactStatus::Missing
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactOutcome {
    pub kind: ArtifactKind,
    pub path: PathBuf,
    pub status: ArtifactStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationReport {
    pub mode: Mode,
    /// One outcome per selected artifact, in [`ArtifactKind::ALL`] order.
    pub outcomes: Vec<ArtifactOutcome>,
}

impl GenerationReport {
    /// True when nothing failed and, in check mode, nothing is out of date.
    pub fn is_success(&self) -> bool {
        !self.outcomes.iter().any(|o| o.status.is_failure())
    }

    pub fn failures(&self) -> impl Iterator<Item = &ArtifactOutcome> {
        self.outcomes.iter().filter(|o| o.status.is_failure())
    }
}

/// Render and write (or check) the selected artifacts under `out_dir`.
///
/// An empty selection means all four.
pub fn generate(
    ctx: &GenerateContext,
    kinds: &[ArtifactKind],
    out_dir: &Path,
    mode: Mode,
) -> GenerationReport {
    let mut selected: Vec<ArtifactKind> = if kinds.is_empty() {
        ArtifactKind::ALL.to_vec()
    } else {
        kinds.to_vec()
    };
    selected.sort();
    selected.dedup();

    let outcomes: Vec<ArtifactOutcome> = selected
        .par_iter()
        .map(|&kind| {
            let path = out_dir.join(kind.file_name());
            let (status, digest) = match render(kind, ctx) {
                Ok(artifact) => {
                    let digest = artifact.digest();
                    let status = match mode {
                        Mode::Write => write_artifact(&path, &artifact.contents),
                        Mode::Check => check_artifact(&path, &artifact.contents),
                    };
                    (status, Some(digest))
                }
                Err(err) => (ArtifactStatus::Failed(err.to_string()), None),
            };
            if let ArtifactStatus::Failed(reason) = &status {
                tracing::warn!(artifact = %kind, "{reason}");
            } else {
                tracing::debug!(artifact = %kind, path = %path.display(), ?status, "artifact done");
            }
            ArtifactOutcome {
                kind,
                path,
                status,
                digest,
            }
        })
        .collect();

    GenerationReport { mode, outcomes }
}

fn write_artifact(path: &Path, contents: &str) -> ArtifactStatus {
    if fs::read_to_string(path).is_ok_and(|existing| existing == contents) {
        return ArtifactStatus::Unchanged;
    }
    let result = path
        .parent()
        .map_or(Ok(()), fs::create_dir_all)
        .and_then(|_| fs::write(path, contents))
        .map_err(|source| GenerateError::Io {
            path: path.to_path_buf(),
            source,
        });
    match result {
        Ok(()) => ArtifactStatus::Written,
        Err(err) => ArtifactStatus::Failed(err.to_string()),
    }
}

fn check_artifact(path: &Path, contents: &str) -> ArtifactStatus {
    match fs::read_to_string(path) {
        Ok(existing) if existing == contents => ArtifactStatus::UpToDate,
        Ok(_) => ArtifactStatus::Stale,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => ArtifactStatus::Missing,
        Err(source) => ArtifactStatus::Failed(
            GenerateError::Io {
                path: path.to_path_buf(),
                source,
            }
            .to_string(),
        ),
    }
}
