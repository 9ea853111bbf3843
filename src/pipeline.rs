//! Whole-run orchestration.
//!
//! ```text
//! Scanned ──► TreeBuilt ──┬──► Scored     (audit)
//!                         └──► Rendered   (generate)
//! ```
//!
//! Only the scan can abort a run. Once the tree is built the audit and the
//! generator run side by side on rayon's pool and report independently: a
//! failing audit still yields artifacts, and a broken artifact still yields
//! an audit.

use crate::audit::{self, AuditReport};
use crate::config::{LoadedConfig, ProjectConfig};
use crate::generate::{self, ArtifactKind, GenerateContext, GenerationReport, Mode};
use crate::scan::{self, ScanError, ScanResult};
use crate::tree;
use crate::types::{FlatPage, PageTree};

/// The document model every later stage reads.
#[derive(Debug, Clone)]
pub struct DocModel {
    pub scan: ScanResult,
    pub tree: PageTree,
    pub flat: Vec<FlatPage>,
}

impl DocModel {
    /// Scan the configured docs root and build the tree.
    pub fn load(loaded: &LoadedConfig) -> Result<Self, ScanError> {
        let scan = scan::scan_project(loaded)?;
        Ok(Self::from_scan(scan, &loaded.config))
    }

    pub fn from_scan(scan: ScanResult, config: &ProjectConfig) -> Self {
        let tree = tree::build_tree(&scan, &config.docs);
        let flat = tree::flatten(&tree);
        DocModel { scan, tree, flat }
    }

    pub fn context<'a>(&'a self, config: &'a ProjectConfig) -> GenerateContext<'a> {
        GenerateContext {
            config,
            scan: &self.scan,
            tree: &self.tree,
            flat: &self.flat,
        }
    }

    pub fn audit(&self, config: &ProjectConfig) -> AuditReport {
        audit::audit(&self.scan.pages, config)
    }
}

/// Which branches to run after the tree is built.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub audit: bool,
    /// Artifacts to render (empty = all) and how, or `None` to skip.
    pub generate: Option<(Vec<ArtifactKind>, Mode)>,
}

impl RunOptions {
    /// Audit plus writing all four artifacts.
    pub fn build() -> Self {
        RunOptions {
            audit: true,
            generate: Some((Vec::new(), Mode::Write)),
        }
    }
}

#[derive(Debug)]
pub struct RunReport {
    pub model: DocModel,
    pub audit: Option<AuditReport>,
    pub generation: Option<GenerationReport>,
}

impl RunReport {
    pub fn audit_passed(&self) -> bool {
        self.audit.as_ref().is_none_or(|a| a.passed)
    }

    pub fn generation_succeeded(&self) -> bool {
        self.generation.as_ref().is_none_or(GenerationReport::is_success)
    }

    pub fn is_success(&self) -> bool {
        self.audit_passed() && self.generation_succeeded()
    }
}

pub fn run(loaded: &LoadedConfig, options: &RunOptions) -> Result<RunReport, ScanError> {
    let model = DocModel::load(loaded)?;
    let config = &loaded.config;
    let out_dir = loaded.output_dir();

    let (audit, generation) = rayon::join(
        || options.audit.then(|| model.audit(config)),
        || {
            options.generate.as_ref().map(|(kinds, mode)| {
                generate::generate(&model.context(config), kinds, &out_dir, *mode)
            })
        },
    );

    Ok(RunReport {
        model,
        audit,
        generation,
    })
}
