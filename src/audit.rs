//! Documentation completeness scoring.
//!
//! Every required section gets an equal share of 100 points, split evenly
//! over four checks:
//!
//! | Check | Passes when |
//! |-------|-------------|
//! | presence | the page exists and has a body beyond front matter |
//! | substance | prose word count (headings and code excluded) ≥ `audit.min_words` |
//! | structure | at least one `##` heading |
//! | examples | at least one fenced code block |
//!
//! With two required sections each one is worth 50 and each check 12.5.
//! A section failing presence is `missing`; passing all four is `complete`;
//! anything in between is `partial`. Optional sections are reported as
//! present or absent and never scored.
//!
//! The audit never fails on absent files. Missing documentation is the
//! result, not an error.

use crate::config::ProjectConfig;
use crate::naming;
use crate::types::Page;
use serde::Serialize;
use std::collections::HashMap;

/// Outcome of the four checks for one required section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Checks {
    pub presence: bool,
    pub substance: bool,
    pub structure: bool,
    pub examples: bool,
}

impl Checks {
    pub fn passed(&self) -> usize {
        [self.presence, self.substance, self.structure, self.examples]
            .iter()
            .filter(|c| **c)
            .count()
    }

    /// `(name, passed)` pairs in display order.
    pub fn named(&self) -> [(&'static str, bool); 4] {
        [
            ("presence", self.presence),
            ("substance", self.substance),
            ("structure", self.structure),
            ("examples", self.examples),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditStatus {
    Complete,
    Partial,
    Missing,
}

impl std::fmt::Display for AuditStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            AuditStatus::Complete => "complete",
            AuditStatus::Partial => "partial",
            AuditStatus::Missing => "missing",
        };
        f.write_str(name)
    }
}

/// Score for one required section.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditResult {
    /// The section as declared in `docs.required`.
    pub id: String,
    /// Normalized page id the declaration resolves to.
    pub page_id: String,
    pub status: AuditStatus,
    pub score: f64,
    pub max: f64,
    pub checks: Checks,
    pub word_count: usize,
}

/// Presence report for one optional section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionalSection {
    pub id: String,
    pub page_id: String,
    pub present: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditReport {
    /// Required sections in declaration order.
    pub sections: Vec<AuditResult>,
    pub optional: Vec<OptionalSection>,
    pub total_score: f64,
    pub total_max: f64,
    pub percentage: f64,
    pub threshold: f64,
    pub passed: bool,
}

impl AuditReport {
    pub fn count(&self, status: AuditStatus) -> usize {
        self.sections.iter().filter(|s| s.status == status).count()
    }
}

/// Score the scanned pages against the required sections in `config`.
pub fn audit(pages: &[Page], config: &ProjectConfig) -> AuditReport {
    let by_id: HashMap<&str, &Page> = pages.iter().map(|p| (p.id.as_str(), p)).collect();
    let required = &config.docs.required;
    let max = if required.is_empty() {
        0.0
    } else {
        100.0 / required.len() as f64
    };

    let sections: Vec<AuditResult> = required
        .iter()
        .map(|declared| {
            let page_id = naming::page_id(declared);
            let page = by_id.get(page_id.as_str()).copied();
            score_section(declared, page_id, page, max, config.audit.min_words)
        })
        .collect();

    let optional = config
        .docs
        .optional
        .iter()
        .map(|declared| {
            let page_id = naming::page_id(declared);
            let present = by_id.get(page_id.as_str()).is_some_and(|p| !p.is_empty());
            OptionalSection {
                id: declared.clone(),
                page_id,
                present,
            }
        })
        .collect();

    let total_score: f64 = sections.iter().map(|s| s.score).sum();
    let total_max: f64 = sections.iter().map(|s| s.max).sum();
    let percentage = if total_max > 0.0 {
        total_score / total_max * 100.0
    } else {
        100.0
    };
    let threshold = config.audit.pass_threshold;
    // Equal shares of 100 do not always sum back exactly in floating point.
    let passed = percentage + 1e-9 >= threshold;

    tracing::debug!(
        sections = sections.len(),
        total_score,
        total_max,
        passed,
        "audit complete"
    );

    AuditReport {
        sections,
        optional,
        total_score,
        total_max,
        percentage,
        threshold,
        passed,
    }
}

fn score_section(
    declared: &str,
    page_id: String,
    page: Option<&Page>,
    max: f64,
    min_words: usize,
) -> AuditResult {
    let checks = match page {
        Some(page) if !page.is_empty() => Checks {
            presence: true,
            substance: page.word_count >= min_words,
            structure: page.headings.iter().any(|h| h.depth == 2),
            examples: page.code_block_count >= 1,
        },
        _ => Checks::default(),
    };
    let passed = checks.passed();
    let status = if !checks.presence {
        AuditStatus::Missing
    } else if passed == 4 {
        AuditStatus::Complete
    } else {
        AuditStatus::Partial
    };
    let score = if passed == 4 {
        max
    } else {
        max / 4.0 * passed as f64
    };

    AuditResult {
        id: declared.to_string(),
        page_id,
        status,
        score,
        max,
        checks,
        word_count: page.map(|p| p.word_count).unwrap_or(0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::build_page;

    fn page(path: &str, content: &str) -> Page {
        build_page(naming::page_id(path), path, content.to_string())
    }

    fn words(n: usize) -> String {
        vec!["word"; n].join(" ")
    }

    fn complete_page(path: &str) -> Page {
        page(
            path,
            &format!("# Title\n\n{}\n\n## Usage\n\n```sh\nrun\n```\n", words(120)),
        )
    }

    fn config_requiring(required: &[&str]) -> ProjectConfig {
        let mut config = ProjectConfig::default();
        config.docs.required = required.iter().map(|s| s.to_string()).collect();
        config
    }

    fn section<'a>(report: &'a AuditReport, id: &str) -> &'a AuditResult {
        report
            .sections
            .iter()
            .find(|s| s.id == id)
            .unwrap_or_else(|| panic!("section '{id}' not in report"))
    }

    // =========================================================================
    // Section scoring
    // =========================================================================

    #[test]
    fn complete_and_missing_sections() {
        let pages = vec![complete_page("overview.md")];
        let report = audit(&pages, &config_requiring(&["overview.md", "api.md"]));

        let overview = section(&report, "overview.md");
        assert_eq!(overview.status, AuditStatus::Complete);
        assert_eq!((overview.score, overview.max), (50.0, 50.0));

        let api = section(&report, "api.md");
        assert_eq!(api.status, AuditStatus::Missing);
        assert_eq!((api.score, api.max), (0.0, 50.0));
        assert_eq!(api.checks, Checks::default());

        assert_eq!(report.total_score, 50.0);
        assert_eq!(report.total_max, 100.0);
        assert_eq!(report.percentage, 50.0);
        assert!(!report.passed);
    }

    #[test]
    fn partial_section_scores_passed_checks() {
        let pages = vec![page("guide.md", "# Guide\n\n## Only a heading\n\nShort.")];
        let report = audit(&pages, &config_requiring(&["guide.md"]));
        let guide = section(&report, "guide.md");
        assert_eq!(guide.status, AuditStatus::Partial);
        assert_eq!(
            guide.checks,
            Checks {
                presence: true,
                substance: false,
                structure: true,
                examples: false,
            }
        );
        assert_eq!(guide.score, 50.0);
    }

    #[test]
    fn empty_file_scores_zero() {
        let pages = vec![page("empty.md", "---\ntitle: Empty\n---\n\n  \n")];
        let report = audit(&pages, &config_requiring(&["empty.md"]));
        let empty = section(&report, "empty.md");
        assert_eq!(empty.status, AuditStatus::Missing);
        assert_eq!(empty.score, 0.0);
    }

    #[test]
    fn h3_alone_does_not_satisfy_structure() {
        let content = format!("# T\n\n{}\n\n### Deep\n\n```\nx\n```", words(60));
        let pages = vec![page("a.md", &content)];
        let report = audit(&pages, &config_requiring(&["a.md"]));
        assert!(!section(&report, "a.md").checks.structure);
    }

    #[test]
    fn min_words_is_configurable() {
        let pages = vec![page("a.md", "# T\n\nfour words right here")];
        let mut config = config_requiring(&["a.md"]);
        config.audit.min_words = 4;
        assert!(section(&audit(&pages, &config), "a.md").checks.substance);
        config.audit.min_words = 5;
        assert!(!section(&audit(&pages, &config), "a.md").checks.substance);
    }

    #[test]
    fn required_resolves_ids_without_extension() {
        let pages = vec![complete_page("guides/install.md")];
        let report = audit(&pages, &config_requiring(&["guides/install"]));
        let result = section(&report, "guides/install");
        assert_eq!(result.page_id, "guides/install");
        assert_eq!(result.status, AuditStatus::Complete);
    }

    // =========================================================================
    // Totals
    // =========================================================================

    #[test]
    fn max_values_sum_to_hundred() {
        let report = audit(&[], &config_requiring(&["a.md", "b.md", "c.md"]));
        let sum: f64 = report.sections.iter().map(|s| s.max).sum();
        assert!((sum - 100.0).abs() < 1e-9);
    }

    #[test]
    fn all_complete_passes_default_threshold() {
        let pages = vec![
            complete_page("a.md"),
            complete_page("b.md"),
            complete_page("c.md"),
        ];
        let report = audit(&pages, &config_requiring(&["a.md", "b.md", "c.md"]));
        assert_eq!(report.count(AuditStatus::Complete), 3);
        assert!(report.passed);
    }

    #[test]
    fn threshold_lowers_the_bar() {
        let pages = vec![complete_page("overview.md")];
        let mut config = config_requiring(&["overview.md", "api.md"]);
        config.audit.pass_threshold = 50.0;
        let report = audit(&pages, &config);
        assert_eq!(report.threshold, 50.0);
        assert!(report.passed);
    }

    #[test]
    fn nothing_required_passes() {
        let report = audit(&[], &ProjectConfig::default());
        assert!(report.sections.is_empty());
        assert_eq!(report.percentage, 100.0);
        assert!(report.passed);
    }

    #[test]
    fn results_follow_declaration_order() {
        let report = audit(&[], &config_requiring(&["z.md", "a.md", "m.md"]));
        let ids: Vec<&str> = report.sections.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["z.md", "a.md", "m.md"]);
    }

    // =========================================================================
    // Optional sections and serialization
    // =========================================================================

    #[test]
    fn optional_sections_reported_not_scored() {
        let pages = vec![complete_page("overview.md"), page("faq.md", "# FAQ\n\nYes.")];
        let mut config = config_requiring(&["overview.md"]);
        config.docs.optional = vec!["faq.md".into(), "changelog.md".into()];
        let report = audit(&pages, &config);
        assert_eq!(report.total_max, 100.0);
        let present: Vec<(&str, bool)> = report
            .optional
            .iter()
            .map(|o| (o.id.as_str(), o.present))
            .collect();
        assert_eq!(present, vec![("faq.md", true), ("changelog.md", false)]);
    }

    #[test]
    fn report_serializes_camel_case() {
        let report = audit(&[], &config_requiring(&["api.md"]));
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["totalMax"], 100.0);
        assert_eq!(json["sections"][0]["pageId"], "api");
        assert_eq!(json["sections"][0]["status"], "missing");
        assert_eq!(json["passed"], false);
    }
}
