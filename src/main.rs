use clap::{Parser, Subcommand};
use docpack::config::{self, LoadedConfig, ProjectConfig};
use docpack::generate::{ArtifactKind, Mode};
use docpack::pipeline::{self, DocModel, RunOptions};
use docpack::skills::{self, Skill};
use docpack::output;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Artifact selector flags. None set means all four.
#[derive(clap::Args, Clone)]
struct ArtifactArgs {
    /// Generate AGENTS.md
    #[arg(long)]
    agents_md: bool,
    /// Generate llms.txt
    #[arg(long)]
    llms_txt: bool,
    /// Generate docs.json
    #[arg(long)]
    docs_json: bool,
    /// Generate install.md
    #[arg(long)]
    install_md: bool,
}

impl ArtifactArgs {
    fn kinds(&self) -> Vec<ArtifactKind> {
        [
            (self.agents_md, ArtifactKind::AgentsMd),
            (self.llms_txt, ArtifactKind::LlmsTxt),
            (self.docs_json, ArtifactKind::DocsJson),
            (self.install_md, ArtifactKind::InstallMd),
        ]
        .into_iter()
        .filter_map(|(on, kind)| on.then_some(kind))
        .collect()
    }
}

#[derive(Parser)]
#[command(name = "docpack")]
#[command(about = "Audit markdown docs and generate agent-ready artifacts")]
#[command(long_about = "\
Audit markdown docs and generate agent-ready artifacts

Your docs directory is the data source. docpack.toml declares which pages are
required, how they are ordered, and what goes into each generated file.

Project structure:

  my-project/
  ├── docpack.toml             # Project config
  ├── docpack.local.toml       # Local overrides (optional, keep out of git)
  ├── docs/
  │   ├── overview.md          # Page \"overview\"
  │   ├── guides/
  │   │   ├── index.md         # Leads the folder, gives it its title
  │   │   └── install.md       # Page \"guides/install\"
  │   └── drafts/              # Skip with docs.exclude = [\"drafts/**\"]
  ├── AGENTS.md                # Generated
  ├── llms.txt                 # Generated
  ├── docs.json                # Generated
  └── install.md               # Generated

Audit: each required page scores presence, substance (word count),
structure (an H2) and examples (a fenced code block).

Exit codes: 0 success, 1 audit failed or an artifact failed/is stale,
2 fatal error (config, missing docs root).

Run 'docpack gen-config' to generate a documented docpack.toml.")]
#[command(version)]
struct Cli {
    /// Project config file
    #[arg(long, default_value = config::CONFIG_FILENAME, global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scan the docs tree and print the page tree
    Scan,
    /// Score required sections and exit non-zero below the threshold
    Audit {
        /// List the four checks for every section
        #[arg(long)]
        verbose: bool,
        /// Print the full report as JSON
        #[arg(long)]
        json: bool,
        /// Override audit.pass_threshold (0-100)
        #[arg(long)]
        threshold: Option<f64>,
    },
    /// Render AGENTS.md, llms.txt, docs.json and install.md
    Generate {
        #[command(flatten)]
        artifacts: ArtifactArgs,
        /// Compare with the files on disk instead of writing
        #[arg(long)]
        check: bool,
    },
    /// Audit and generate all artifacts
    Build,
    /// Print a prompt template for an external agent
    Skill {
        /// review | install
        name: Skill,
    },
    /// Print a stock docpack.toml with all options documented
    GenConfig,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::from(2)
        }
    }
}

/// Diagnostics go to stderr, filtered by `DOCPACK_LOG` or `RUST_LOG`.
fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_env("DOCPACK_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn exit_code(success: bool) -> ExitCode {
    if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn run(cli: Cli) -> Result<ExitCode, Box<dyn std::error::Error>> {
    match cli.command {
        Command::Scan => {
            let loaded = config::load_config(&cli.config)?;
            let model = DocModel::load(&loaded)?;
            output::print_scan_output(&model);
            Ok(ExitCode::SUCCESS)
        }
        Command::Audit {
            verbose,
            json,
            threshold,
        } => {
            let mut loaded = config::load_config(&cli.config)?;
            if let Some(threshold) = threshold {
                loaded.config.audit.pass_threshold = threshold;
                loaded.config.validate()?;
            }
            let model = DocModel::load(&loaded)?;
            let report = model.audit(&loaded.config);
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                output::print_audit_output(&report, verbose);
            }
            Ok(exit_code(report.passed))
        }
        Command::Generate { artifacts, check } => {
            let loaded = config::load_config(&cli.config)?;
            let mode = if check { Mode::Check } else { Mode::Write };
            let options = RunOptions {
                audit: false,
                generate: Some((artifacts.kinds(), mode)),
            };
            let report = pipeline::run(&loaded, &options)?;
            if !report.model.scan.warnings.is_empty() {
                for line in output::format_warnings(&report.model.scan.warnings) {
                    println!("{line}");
                }
                println!();
            }
            if let Some(generation) = &report.generation {
                output::print_generate_output(generation);
            }
            Ok(exit_code(report.generation_succeeded()))
        }
        Command::Build => {
            let loaded = config::load_config(&cli.config)?;
            println!("==> Scanning {}", loaded.docs_root().display());
            let report = pipeline::run(&loaded, &RunOptions::build())?;
            output::print_scan_output(&report.model);

            if let Some(audit) = &report.audit {
                println!("==> Audit");
                output::print_audit_output(audit, false);
            }
            if let Some(generation) = &report.generation {
                println!("==> Generating into {}", loaded.output_dir().display());
                output::print_generate_output(generation);
            }

            let status = if report.is_success() {
                "complete"
            } else {
                "finished with problems"
            };
            println!("==> Build {status}");
            Ok(exit_code(report.is_success()))
        }
        Command::Skill { name } => {
            let config = config_or_default(&cli.config)?;
            print!("{}", skills::render(name, &config)?);
            Ok(ExitCode::SUCCESS)
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Skill prompts work before a project is configured.
fn config_or_default(path: &Path) -> Result<ProjectConfig, config::ConfigError> {
    if path.exists() {
        config::load_config(path).map(|LoadedConfig { config, .. }| config)
    } else {
        Ok(ProjectConfig::default())
    }
}
