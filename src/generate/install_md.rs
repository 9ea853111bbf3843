//! `install.md`: an installation guide an LLM agent can execute.
//!
//! The template is picked by `project.type`. Every variant renders the same
//! layout; they differ in title, instruction line and defaults:
//!
//! | Variant | Title | Default objective | Default done-when |
//! |---------|-------|-------------------|-------------------|
//! | package | `{project-name}` | install `{package-name}` | none |
//! | cli-tool | `{project-name}` | install `{cli-name}` | `{cli-name} --version` |
//! | desktop-app | `{app-name}` | install and launch `{app-name}` | none |
//! | generic | `{project-name}` | none | none |
//!
//! ```text
//! # mycli
//! > A tiny CLI
//! I want you to install ... Execute all the steps below autonomously.
//! OBJECTIVE: ...
//! DONE WHEN: `mycli --version` runs successfully.
//! ## TODO
//! - [ ] Install the binary
//! ## Prerequisites
//! ## Step 1: Install the binary
//! EXECUTE NOW: ...
//! ```
//!
//! Config text (objective, titles, commands) is itself a template and may use
//! the same placeholders. An objective, a done-when command and a command per
//! declared step are required after defaults apply; anything missing fails
//! with [`GenerateError::TemplateMissingPlaceholder`] instead of leaking a
//! `{placeholder}` into the guide. Blank names count as unset. Without steps
//! the TODO list holds only the done-when check.

use super::GenerateError;
use crate::config::{InstallStep, ProjectConfig, ProjectType};
use crate::template::{self, Values};

/// One install template per project type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallTemplate {
    Package,
    CliTool,
    DesktopApp,
    Generic,
}

impl InstallTemplate {
    pub fn for_type(kind: ProjectType) -> Self {
        match kind {
            ProjectType::Package => InstallTemplate::Package,
            ProjectType::CliTool => InstallTemplate::CliTool,
            ProjectType::DesktopApp => InstallTemplate::DesktopApp,
            ProjectType::Generic => InstallTemplate::Generic,
        }
    }

    fn title(self) -> &'static str {
        match self {
            InstallTemplate::DesktopApp => "{app-name}",
            _ => "{project-name}",
        }
    }

    fn instruction(self) -> &'static str {
        match self {
            InstallTemplate::Package => {
                "I want you to install the {package-name} package for me. Execute all the steps below autonomously."
            }
            InstallTemplate::CliTool => {
                "I want you to install the {cli-name} command-line tool for me. Execute all the steps below autonomously."
            }
            InstallTemplate::DesktopApp => {
                "I want you to install the {app-name} desktop application for me. Execute all the steps below autonomously."
            }
            InstallTemplate::Generic => {
                "I want you to set up {project-name} for me. Execute all the steps below autonomously."
            }
        }
    }

    fn default_objective(self) -> Option<&'static str> {
        match self {
            InstallTemplate::Package => Some("Install {package-name} and confirm it can be used."),
            InstallTemplate::CliTool => {
                Some("Install the {cli-name} command-line tool and verify it runs.")
            }
            InstallTemplate::DesktopApp => Some("Install {app-name} and launch it successfully."),
            InstallTemplate::Generic => None,
        }
    }

    fn default_done_when(self) -> Option<&'static str> {
        match self {
            InstallTemplate::CliTool => Some("{cli-name} --version"),
            _ => None,
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|v| !v.is_empty()).map(str::to_string)
}

/// Placeholder values from `[project]` and `[install]`, with fallbacks.
///
/// A name that is blank after its fallbacks is left out, so a template using
/// it fails as an unresolved placeholder.
pub fn placeholder_values(config: &ProjectConfig) -> Values {
    let install = &config.install;
    let project_name = non_blank(Some(&config.project.name));
    let package_name = non_blank(install.package_name.as_deref()).or_else(|| project_name.clone());
    let cli_name = non_blank(install.cli_name.as_deref()).or_else(|| package_name.clone());
    let app_name = non_blank(install.app_name.as_deref()).or_else(|| project_name.clone());

    [
        ("project-name", project_name),
        ("package-name", package_name),
        ("cli-name", cli_name),
        ("app-name", app_name),
    ]
    .into_iter()
    .filter_map(|(name, value)| value.map(|v| (name.to_string(), v)))
    .collect()
}

fn required<'a>(value: Option<&'a str>, name: &str) -> Result<&'a str, GenerateError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| GenerateError::TemplateMissingPlaceholder(name.to_string()))
}

pub fn render(config: &ProjectConfig) -> Result<String, GenerateError> {
    let variant = InstallTemplate::for_type(config.project.kind);
    let install = &config.install;
    let mut values = placeholder_values(config);
    let fill = |text: &str, values: &Values| template::render(text, values);

    let objective = required(
        install.objective.as_deref().or(variant.default_objective()),
        "objective",
    )?;
    let objective = fill(objective, &values)?;
    values.insert("objective".into(), objective.clone());

    let done_command = required(
        install.done_when.command.as_deref().or(variant.default_done_when()),
        "done-when-command",
    )?;
    let done_command = fill(done_command, &values)?;

    let mut out = String::new();
    out.push_str(&format!("# {}\n\n", fill(variant.title(), &values)?));

    let description = config
        .project
        .description
        .as_deref()
        .filter(|d| !d.trim().is_empty())
        .unwrap_or(&config.project.tagline);
    if !description.trim().is_empty() {
        out.push_str(&format!("> {}\n\n", fill(description.trim(), &values)?));
    }

    out.push_str(&fill(variant.instruction(), &values)?);
    out.push_str("\n\n");
    out.push_str(&format!("OBJECTIVE: {objective}\n\n"));

    let mut done = format!("DONE WHEN: `{done_command}` runs successfully");
    if let Some(expected) = install.done_when.expected_output.as_deref() {
        done.push_str(&format!(" and prints `{}`", fill(expected, &values)?));
    }
    out.push_str(&done);
    out.push_str(".\n\n");

    let titles: Vec<String> = install
        .steps
        .iter()
        .map(|step| fill(&step.title, &values))
        .collect::<Result<_, _>>()?;

    out.push_str("## TODO\n\n");
    for title in &titles {
        out.push_str(&format!("- [ ] {title}\n"));
    }
    if titles.is_empty() {
        out.push_str(&format!("- [ ] Confirm `{done_command}` runs successfully\n"));
    }
    out.push('\n');

    if !install.prerequisites.is_empty() {
        out.push_str("## Prerequisites\n\n");
        for prerequisite in &install.prerequisites {
            out.push_str(&format!("- {}\n", fill(prerequisite, &values)?));
        }
        out.push('\n');
    }

    for (i, (step, title)) in install.steps.iter().zip(&titles).enumerate() {
        out.push_str(&format!("## Step {}: {title}\n\n", i + 1));
        out.push_str(&render_step(step, i + 1, &values)?);
    }

    out.push_str(&format!(
        "EXECUTE NOW: Complete every item in the TODO list above, in order. \
         You are done when `{done_command}` runs successfully.\n"
    ));
    Ok(out)
}

fn render_step(step: &InstallStep, number: usize, values: &Values) -> Result<String, GenerateError> {
    if step.command.is_none() && step.alternatives.is_empty() {
        return Err(GenerateError::TemplateMissingPlaceholder(format!(
            "steps.{number}.command"
        )));
    }

    let mut out = String::new();
    if let Some(description) = step.description.as_deref() {
        out.push_str(&template::render(description.trim(), values)?);
        out.push_str("\n\n");
    }
    if let Some(command) = step.command.as_deref() {
        out.push_str(&format!(
            "```bash\n{}\n```\n\n",
            template::render(command.trim_end(), values)?
        ));
    }
    if !step.alternatives.is_empty() {
        out.push_str(if step.command.is_some() {
            "Alternatives:\n\n"
        } else {
            "Pick the command for this system:\n\n"
        });
        for alt in &step.alternatives {
            let label = match (alt.platform.as_deref(), alt.manager.as_deref()) {
                (Some(platform), Some(manager)) => format!("{platform} ({manager})"),
                (Some(platform), None) => platform.to_string(),
                (None, Some(manager)) => manager.to_string(),
                (None, None) => "Other".to_string(),
            };
            out.push_str(&format!(
                "- {label}: `{}`\n",
                template::render(&alt.command, values)?
            ));
        }
        out.push('\n');
    }
    Ok(out)
}
