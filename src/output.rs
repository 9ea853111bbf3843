//! CLI output formatting for all pipeline stages.
//!
//! # Information-First Display
//!
//! Output is **information-centric, not file-centric**. Every page is shown
//! by its positional index and title; source paths are secondary context on
//! indented `Source:` lines.
//!
//! # Output Format
//!
//! ## Scan
//!
//! ```text
//! Pages
//! 001 Overview
//!     Source: overview.md
//!     2 headings, 118 words, 1 code block
//! --- Guides ---
//! 002 Guides
//!     001 Introduction
//!         Source: guides/index.md
//! 003 Api (missing)
//!
//! Warnings
//!     bad.md: stream did not contain valid UTF-8
//! ```
//!
//! ## Audit
//!
//! ```text
//! overview.md: complete (50/50)
//! api.md: missing (0/50)
//!
//! Score: 50/100 (50%)
//! FAIL: below threshold 100%
//! ```
//!
//! With `--verbose` each section is followed by its four checks.
//!
//! ## Generate
//!
//! ```text
//! AGENTS.md: written [3f2a9c1b0d4e]
//! install.md: failed: Unresolved placeholder {objective}: ...
//!
//! Generated 3 of 4 artifacts
//! ```
//!
//! # Architecture
//!
//! Each stage has a `format_*` function (returns `Vec<String>`) for testability
//! and a `print_*` wrapper that writes to stdout. Format functions are pure:
//! no I/O, no side effects.

use crate::audit::AuditReport;
use crate::generate::{ArtifactStatus, GenerationReport, Mode};
use crate::pipeline::DocModel;
use crate::types::{PageNode, PageWarning};

// ============================================================================
// Shared helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Whole numbers without decimals, everything else to one decimal place.
///
/// ```text
/// 50.0       → "50"
/// 33.333...  → "33.3"
/// ```
fn format_number(value: f64) -> String {
    if (value - value.round()).abs() < 1e-9 {
        format!("{}", value.round() as i64)
    } else {
        format!("{:.1}", value)
    }
}

fn plural(count: usize, one: &str, many: &str) -> String {
    if count == 1 {
        format!("{count} {one}")
    } else {
        format!("{count} {many}")
    }
}

// ============================================================================
// Stage 1: Scan output
// ============================================================================

/// Format the page tree and any scan warnings.
pub fn format_scan_output(model: &DocModel) -> Vec<String> {
    let mut lines = vec!["Pages".to_string()];
    format_nodes(model, &model.tree.nodes, 0, &mut lines);

    if !model.scan.warnings.is_empty() {
        lines.push(String::new());
        lines.extend(format_warnings(&model.scan.warnings));
    }

    lines.push(String::new());
    lines.push(format!(
        "{} scanned, {} in navigation order",
        plural(model.scan.pages.len(), "page", "pages"),
        model.flat.len()
    ));
    lines
}

fn format_nodes(model: &DocModel, nodes: &[PageNode], depth: usize, lines: &mut Vec<String>) {
    let pad = indent(depth);
    let mut position = 0;
    for node in nodes {
        match node {
            PageNode::Separator(sep) => lines.push(format!("{pad}--- {} ---", sep.label)),
            PageNode::Folder(folder) => {
                position += 1;
                lines.push(format!("{pad}{} {}", format_index(position), folder.title));
                format_nodes(model, &folder.children, depth + 1, lines);
            }
            PageNode::Page(item) if item.status.is_missing() => {
                position += 1;
                lines.push(format!("{pad}{} {} (missing)", format_index(position), item.title));
            }
            PageNode::Page(item) => {
                position += 1;
                lines.push(format!("{pad}{} {}", format_index(position), item.title));
                if let Some(page) = model.scan.page(&item.id) {
                    lines.push(format!("{pad}    Source: {}", page.path));
                    lines.push(format!(
                        "{pad}    {}, {}, {}",
                        plural(page.headings.len(), "heading", "headings"),
                        plural(page.word_count, "word", "words"),
                        plural(page.code_block_count, "code block", "code blocks"),
                    ));
                }
            }
        }
    }
}

/// Format skipped files.
pub fn format_warnings(warnings: &[PageWarning]) -> Vec<String> {
    let mut lines = vec!["Warnings".to_string()];
    for warning in warnings {
        lines.push(format!("    {}: {}", warning.path, warning.message));
    }
    lines
}

/// Print scan output to stdout.
pub fn print_scan_output(model: &DocModel) {
    for line in format_scan_output(model) {
        println!("{}", line);
    }
}

// ============================================================================
// Stage 2: Audit output
// ============================================================================

/// Format an audit report. `verbose` adds the per-check breakdown.
pub fn format_audit_output(report: &AuditReport, verbose: bool) -> Vec<String> {
    let mut lines = Vec::new();

    for section in &report.sections {
        lines.push(format!(
            "{}: {} ({}/{})",
            section.id,
            section.status,
            format_number(section.score),
            format_number(section.max)
        ));
        if verbose {
            for (name, passed) in section.checks.named() {
                let mark = if passed { "pass" } else { "FAIL" };
                lines.push(format!("    {mark} {name}"));
            }
            lines.push(format!("    {}", plural(section.word_count, "word", "words")));
        }
    }

    if !report.optional.is_empty() {
        lines.push(String::new());
        lines.push("Optional".to_string());
        for section in &report.optional {
            let state = if section.present { "present" } else { "missing" };
            lines.push(format!("    {}: {}", section.id, state));
        }
    }

    lines.push(String::new());
    lines.push(format!(
        "Score: {}/{} ({}%)",
        format_number(report.total_score),
        format_number(report.total_max),
        format_number(report.percentage)
    ));
    let threshold = format_number(report.threshold);
    if report.passed {
        lines.push(format!("PASS: threshold {threshold}%"));
    } else {
        lines.push(format!("FAIL: below threshold {threshold}%"));
    }
    lines
}

/// Print audit output to stdout.
pub fn print_audit_output(report: &AuditReport, verbose: bool) {
    for line in format_audit_output(report, verbose) {
        println!("{}", line);
    }
}

// ============================================================================
// Stage 3: Generate output
// ============================================================================

fn status_label(status: &ArtifactStatus) -> String {
    match status {
        ArtifactStatus::Written => "written".to_string(),
        ArtifactStatus::Unchanged => "unchanged".to_string(),
        ArtifactStatus::UpToDate => "up to date".to_string(),
        ArtifactStatus::Stale => "stale".to_string(),
        ArtifactStatus::Missing => "missing".to_string(),
        ArtifactStatus::Failed(reason) => format!("failed: {reason}"),
    }
}

/// Format one line per artifact plus a summary line.
pub fn format_generate_output(report: &GenerationReport) -> Vec<String> {
    let mut lines = Vec::new();
    for outcome in &report.outcomes {
        let mut line = format!("{}: {}", outcome.kind.file_name(), status_label(&outcome.status));
        if let (Some(digest), false) = (&outcome.digest, outcome.status.is_failure()) {
            line.push_str(&format!(" [{digest}]"));
        }
        lines.push(line);
    }

    let total = report.outcomes.len();
    let bad = report.failures().count();
    lines.push(String::new());
    lines.push(match report.mode {
        Mode::Write => format!("Generated {} of {}", total - bad, plural(total, "artifact", "artifacts")),
        Mode::Check if bad == 0 => format!("All {} up to date", plural(total, "artifact", "artifacts")),
        Mode::Check => format!("{} of {} out of date", bad, plural(total, "artifact", "artifacts")),
    });
    lines
}

/// Print generate output to stdout.
pub fn print_generate_output(report: &GenerationReport) {
    for line in format_generate_output(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit;
    use crate::config::ProjectConfig;
    use crate::generate::{ArtifactKind, ArtifactOutcome};
    use crate::naming;
    use crate::scan::{ScanResult, build_page};
    use std::path::PathBuf;

    // =========================================================================
    // Helper tests
    // =========================================================================

    #[test]
    fn format_index_pads() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(42), "042");
        assert_eq!(format_index(999), "999");
    }

    #[test]
    fn indent_levels() {
        assert_eq!(indent(0), "");
        assert_eq!(indent(2), "        ");
    }

    #[test]
    fn format_number_whole_and_fraction() {
        assert_eq!(format_number(50.0), "50");
        assert_eq!(format_number(100.0 / 3.0), "33.3");
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(12.5), "12.5");
    }

    // =========================================================================
    // Scan output
    // =========================================================================

    fn model(config: &ProjectConfig, pages: &[(&str, &str)]) -> DocModel {
        let scan = ScanResult {
            pages: pages
                .iter()
                .map(|(path, body)| build_page(naming::page_id(path), path, body.to_string()))
                .collect(),
            warnings: vec![PageWarning {
                path: "bad.md".into(),
                message: "not UTF-8".into(),
            }],
            directories: Vec::new(),
        };
        DocModel::from_scan(scan, config)
    }

    #[test]
    fn scan_output_tree() {
        let mut config = ProjectConfig::default();
        config.docs.required = vec!["zed.md".into()];
        config.docs.order = vec!["overview".into(), "---Guides---".into(), "guides".into()];
        let m = model(
            &config,
            &[
                ("overview.md", "# Overview\n\n## Intro\n\nHello there."),
                ("guides/install.md", "# Install"),
            ],
        );
        assert_eq!(
            format_scan_output(&m),
            vec![
                "Pages",
                "001 Overview",
                "    Source: overview.md",
                "    1 heading, 2 words, 0 code blocks",
                "--- Guides ---",
                "002 Guides",
                "    001 Install",
                "        Source: guides/install.md",
                "        0 headings, 0 words, 0 code blocks",
                "003 Zed (missing)",
                "",
                "Warnings",
                "    bad.md: not UTF-8",
                "",
                "2 pages scanned, 3 in navigation order",
            ]
        );
    }

    // =========================================================================
    // Audit output
    // =========================================================================

    fn scenario_report() -> AuditReport {
        let body = format!(
            "# Overview\n\n{}\n\n## Usage\n\n```sh\nrun\n```\n",
            vec!["word"; 120].join(" ")
        );
        let pages = vec![build_page("overview".into(), "overview.md", body)];
        let mut config = ProjectConfig::default();
        config.docs.required = vec!["overview.md".into(), "api.md".into()];
        audit::audit(&pages, &config)
    }

    #[test]
    fn audit_output_plain() {
        assert_eq!(
            format_audit_output(&scenario_report(), false),
            vec![
                "overview.md: complete (50/50)",
                "api.md: missing (0/50)",
                "",
                "Score: 50/100 (50%)",
                "FAIL: below threshold 100%",
            ]
        );
    }

    #[test]
    fn audit_output_verbose_lists_checks() {
        let lines = format_audit_output(&scenario_report(), true);
        assert_eq!(
            &lines[..7],
            &[
                "overview.md: complete (50/50)",
                "    pass presence",
                "    pass substance",
                "    pass structure",
                "    pass examples",
                "    120 words",
                "api.md: missing (0/50)",
            ]
        );
        assert!(lines.contains(&"    FAIL presence".to_string()));
    }

    #[test]
    fn audit_output_pass_line() {
        let mut report = scenario_report();
        report.threshold = 50.0;
        report.passed = true;
        let lines = format_audit_output(&report, false);
        assert_eq!(lines.last().unwrap(), "PASS: threshold 50%");
    }

    // =========================================================================
    // Generate output
    // =========================================================================

    fn outcome(kind: ArtifactKind, status: ArtifactStatus) -> ArtifactOutcome {
        ArtifactOutcome {
            kind,
            path: PathBuf::from(kind.file_name()),
            digest: (!status.is_failure()).then(|| "abcdef012345".to_string()),
            status,
        }
    }

    #[test]
    fn generate_output_write_mode() {
        let report = GenerationReport {
            mode: Mode::Write,
            outcomes: vec![
                outcome(ArtifactKind::AgentsMd, ArtifactStatus::Written),
                outcome(ArtifactKind::LlmsTxt, ArtifactStatus::Unchanged),
                outcome(
                    ArtifactKind::InstallMd,
                    ArtifactStatus::Failed("Unresolved placeholder {objective}".into()),
                ),
            ],
        };
        assert_eq!(
            format_generate_output(&report),
            vec![
                "AGENTS.md: written [abcdef012345]",
                "llms.txt: unchanged [abcdef012345]",
                "install.md: failed: Unresolved placeholder {objective}",
                "",
                "Generated 2 of 3 artifacts",
            ]
        );
    }

    #[test]
    fn generate_output_check_mode() {
        let report = GenerationReport {
            mode: Mode::Check,
            outcomes: vec![
                outcome(ArtifactKind::DocsJson, ArtifactStatus::UpToDate),
                outcome(ArtifactKind::AgentsMd, ArtifactStatus::Stale),
            ],
        };
        let lines = format_generate_output(&report);
        assert_eq!(lines[0], "docs.json: up to date [abcdef012345]");
        assert_eq!(lines[1], "AGENTS.md: stale");
        assert_eq!(lines.last().unwrap(), "1 of 2 artifacts out of date");
    }
}
