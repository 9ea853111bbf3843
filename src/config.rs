//! Project configuration module.
//!
//! Handles loading, validating, and layering `docpack.toml` files. Stock
//! defaults are overridden by the project file, which is in turn overridden by
//! an optional, uncommitted `docpack.local.toml` next to it:
//!
//! ```text
//! my-project/
//! ├── docpack.toml          # Project config (overrides stock defaults)
//! ├── docpack.local.toml    # Local overrides (optional, overrides project)
//! └── docs/
//!     ├── overview.md
//!     └── guides/
//!         └── install.md
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! [project]
//! name = "mycli"
//! tagline = "A tiny CLI"
//! type = "cli-tool"          # package | cli-tool | desktop-app | generic
//!
//! [agent]
//! critical_context = ["Never commit secrets"]
//! rules = ["Run the tests before pushing"]
//! sections = ["overview", "guides/install"]
//!
//! [agent.entry_points]
//! cli = "src/main.rs"
//!
//! [docs]
//! path = "docs"
//! output = "."
//! required = ["overview.md", "api.md"]
//! optional = ["faq.md"]
//! order = ["overview", "---Guides---", "guides"]
//! include = ["**/*.md"]
//! exclude = ["drafts/**"]
//!
//! [audit]
//! min_words = 50
//! pass_threshold = 100.0
//!
//! [llms]
//! max_paragraph_chars = 280
//!
//! [install]
//! objective = "Install mycli and verify it runs"
//! prerequisites = ["A Rust toolchain"]
//!
//! [install.done_when]
//! command = "mycli --version"
//! expected_output = "mycli 0.1.0"
//!
//! [[install.steps]]
//! title = "Install the binary"
//! command = "cargo install mycli"
//! ```
//!
//! Unknown keys are rejected to catch typos early. Paths in `[docs]` are
//! resolved relative to the directory holding `docpack.toml`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name of the project configuration.
pub const CONFIG_FILENAME: &str = "docpack.toml";

/// File name of the optional local override layer.
pub const LOCAL_CONFIG_FILENAME: &str = "docpack.local.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Project configuration loaded from `docpack.toml`.
///
/// Every section has defaults; a minimal config only needs `project.name`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectConfig {
    /// Project metadata used in every artifact header.
    pub project: ProjectInfo,
    /// Agent-context (`AGENTS.md`) generation rules.
    pub agent: AgentConfig,
    /// Docs tree location, output directory and section lists.
    pub docs: DocsConfig,
    /// Audit thresholds.
    pub audit: AuditConfig,
    /// Plain-text summary (`llms.txt`) budget.
    pub llms: LlmsConfig,
    /// Install guide (`install.md`) parameters.
    pub install: InstallConfig,
}

impl ProjectConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.project.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "project.name must not be empty".into(),
            ));
        }
        if self.docs.path.trim().is_empty() {
            return Err(ConfigError::Validation("docs.path must not be empty".into()));
        }
        if !(0.0..=100.0).contains(&self.audit.pass_threshold) {
            return Err(ConfigError::Validation(
                "audit.pass_threshold must be 0-100".into(),
            ));
        }
        if self.llms.max_paragraph_chars < 20 {
            return Err(ConfigError::Validation(
                "llms.max_paragraph_chars must be at least 20".into(),
            ));
        }
        let mut seen = std::collections::HashSet::new();
        for entry in &self.docs.required {
            let id = crate::naming::page_id(entry);
            if id.is_empty() {
                return Err(ConfigError::Validation(format!(
                    "docs.required entry '{entry}' does not name a page"
                )));
            }
            if !seen.insert(id.clone()) {
                return Err(ConfigError::Validation(format!(
                    "docs.required lists '{id}' more than once"
                )));
            }
        }
        for step in &self.install.steps {
            if step.title.trim().is_empty() {
                return Err(ConfigError::Validation(
                    "install.steps entries need a title".into(),
                ));
            }
        }
        Ok(())
    }
}

/// Declared kind of project; selects the install guide template.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectType {
    Package,
    #[serde(alias = "cli")]
    CliTool,
    #[serde(alias = "desktop", alias = "app")]
    DesktopApp,
    #[default]
    Generic,
}

impl fmt::Display for ProjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProjectType::Package => "package",
            ProjectType::CliTool => "cli-tool",
            ProjectType::DesktopApp => "desktop-app",
            ProjectType::Generic => "generic",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectInfo {
    pub name: String,
    /// One-line description shown under the title of every artifact.
    pub tagline: String,
    /// Longer description for the install guide blockquote (falls back to `tagline`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub kind: ProjectType,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AgentConfig {
    /// Rendered verbatim as a numbered list, highest priority first.
    pub critical_context: Vec<String>,
    /// Label → path. Rendered sorted by label.
    pub entry_points: BTreeMap<String, String>,
    pub rules: Vec<String>,
    /// Page ids (or `.md` paths) to concatenate. Empty selects every page.
    pub sections: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DocsConfig {
    /// Docs root, relative to the config file.
    pub path: String,
    /// Artifact output directory, relative to the config file.
    pub output: String,
    /// Sections that must exist for a passing audit.
    pub required: Vec<String>,
    /// Sections reported by the audit but never scored.
    pub optional: Vec<String>,
    /// Explicit ordering hints: page ids, folder ids or `---Label---` separators.
    pub order: Vec<String>,
    /// Glob patterns a page path must match (empty = every `.md` file).
    pub include: Vec<String>,
    /// Glob patterns that exclude a page path.
    pub exclude: Vec<String>,
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            path: "docs".to_string(),
            output: ".".to_string(),
            required: Vec::new(),
            optional: Vec::new(),
            order: Vec::new(),
            include: Vec::new(),
            exclude: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuditConfig {
    /// Minimum prose words for the substance check.
    pub min_words: usize,
    /// Aggregate percentage required to pass (0-100).
    pub pass_threshold: f64,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            min_words: 50,
            pass_threshold: 100.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LlmsConfig {
    /// Paragraphs longer than this are cut at a word boundary.
    pub max_paragraph_chars: usize,
}

impl Default for LlmsConfig {
    fn default() -> Self {
        Self {
            max_paragraph_chars: 280,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InstallConfig {
    /// `{package-name}`; defaults to `project.name`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package_name: Option<String>,
    /// `{cli-name}`; defaults to the package name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cli_name: Option<String>,
    /// `{app-name}`; defaults to `project.name`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub objective: Option<String>,
    pub done_when: DoneWhen,
    pub prerequisites: Vec<String>,
    pub steps: Vec<InstallStep>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DoneWhen {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_output: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InstallStep {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub alternatives: Vec<StepAlternative>,
}

/// A platform- or package-manager-specific way to run a step.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StepAlternative {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manager: Option<String>,
    pub command: String,
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// A validated configuration plus the directory its relative paths resolve against.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: ProjectConfig,
    pub base_dir: PathBuf,
}

impl LoadedConfig {
    /// Absolute (or cwd-relative) docs root.
    pub fn docs_root(&self) -> PathBuf {
        self.base_dir.join(&self.config.docs.path)
    }

    /// Directory the artifacts are written to.
    pub fn output_dir(&self) -> PathBuf {
        self.base_dir.join(&self.config.docs.output)
    }
}

/// Returns the stock default config as a `toml::Value::Table`.
///
/// The base layer every user file is merged on top of.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(ProjectConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Read a TOML file as a raw value. `Ok(None)` when the file does not exist.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge overlays onto a base value in order, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlays: impl IntoIterator<Item = toml::Value>,
) -> Result<ProjectConfig, ConfigError> {
    let merged = overlays.into_iter().fold(base, merge_toml);
    let config: ProjectConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load the configuration at `config_path`.
///
/// The project file must exist; a `docpack.local.toml` beside it is layered on
/// top when present. Relative docs/output paths resolve against the file's
/// directory.
pub fn load_config(config_path: &Path) -> Result<LoadedConfig, ConfigError> {
    let project = load_raw_config(config_path)?.ok_or_else(|| {
        ConfigError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("config file not found: {}", config_path.display()),
        ))
    })?;
    let base_dir = config_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();
    let local = load_raw_config(&base_dir.join(LOCAL_CONFIG_FILENAME))?;

    let overlays = std::iter::once(project).chain(local);
    let config = resolve_config(stock_defaults_value(), overlays)?;
    Ok(LoadedConfig { config, base_dir })
}

/// Returns a fully-commented stock `docpack.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# docpack configuration
# =====================
# Only [project].name is required. Values shown below are the defaults.
# A docpack.local.toml next to this file overrides any key (keep it out of git).
# Unknown keys will cause an error.

[project]
name = "my-project"
tagline = ""
# package | cli-tool | desktop-app | generic (selects the install.md template)
type = "generic"

# ---------------------------------------------------------------------------
# AGENTS.md
# ---------------------------------------------------------------------------
[agent]
# Rendered verbatim as a numbered list, highest priority first.
critical_context = []
rules = []
# Page ids to include in AGENTS.md, in docs order. Empty = every page.
sections = []

[agent.entry_points]
# label = "path/to/file"

# ---------------------------------------------------------------------------
# Docs tree
# ---------------------------------------------------------------------------
[docs]
# Docs root and artifact output directory, relative to this file.
path = "docs"
output = "."
# Pages that must exist and be complete for the audit to pass.
required = []
# Pages reported by the audit but never scored.
optional = []
# Ordering hints: page ids, folder ids, or "---Label---" separators.
order = []
# Glob filters on docs-relative paths.
include = []
exclude = []

# ---------------------------------------------------------------------------
# Audit
# ---------------------------------------------------------------------------
[audit]
# Minimum number of prose words for the substance check.
min_words = 50
# Aggregate percentage required to pass (100 = every check of every section).
pass_threshold = 100.0

# ---------------------------------------------------------------------------
# llms.txt
# ---------------------------------------------------------------------------
[llms]
max_paragraph_chars = 280

# ---------------------------------------------------------------------------
# install.md
# ---------------------------------------------------------------------------
[install]
# package_name = "my-project"   # {package-name}, defaults to project.name
# cli_name = "my-project"       # {cli-name}, defaults to the package name
# app_name = "My Project"       # {app-name}, defaults to project.name
# objective = "Install my-project and verify it works"
prerequisites = []

[install.done_when]
# command = "my-project --version"
# expected_output = "my-project 1.0.0"

# Steps are optional; without any, the TODO list only checks done_when.
# Commands may use the placeholders above. Shell variables such as ${VERSION}
# pass through; write {{ and }} for any other literal brace around a
# lowercase name.
# [[install.steps]]
# title = "Install the package"
# command = "cargo install {package-name}"
#
# [[install.steps.alternatives]]
# platform = "macOS"
# manager = "brew"
# command = "brew install {package-name}"
"##
}
