//! Built-in prompt templates for external agents.
//!
//! A skill is a prompt a user hands to their coding agent: `review` asks it to
//! audit and improve the docs, `install` asks it to author the `[install]`
//! section that drives `install.md`. docpack only fills in project details;
//! it never runs the agent.

use crate::config::ProjectConfig;
use crate::generate::install_md;
use crate::naming;
use crate::template::{self, TemplateError};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Skill {
    Review,
    Install,
}

impl Skill {
    pub const ALL: [Skill; 2] = [Skill::Review, Skill::Install];

    pub fn name(self) -> &'static str {
        match self {
            Skill::Review => "review",
            Skill::Install => "install",
        }
    }

    fn template(self) -> &'static str {
        match self {
            Skill::Review => REVIEW_TEMPLATE,
            Skill::Install => INSTALL_TEMPLATE,
        }
    }
}

impl fmt::Display for Skill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Skill {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Skill::ALL
            .into_iter()
            .find(|skill| skill.name() == s)
            .ok_or_else(|| format!("unknown skill '{s}' (expected review or install)"))
    }
}

const REVIEW_TEMPLATE: &str = "\
# Documentation review: {project-name}

You are reviewing the documentation of {project-name} ({project-type}).
The docs live in `{docs-path}/`. Run `docpack audit --verbose` first and read
its output.

Required sections:
{required-sections}

For every required section that is not `complete`:

1. Create the page if it is missing.
2. Bring it to at least {min-words} words of prose.
3. Give it at least one `##` heading.
4. Add at least one fenced code example that a reader can run.

Do not invent behavior. Read the code before describing it. When you are done,
`docpack audit` must pass and `docpack generate --check` must report every
artifact up to date after `docpack generate`.
";

const INSTALL_TEMPLATE: &str = "\
# Write the install section for {project-name}

{project-name} is a {project-type}. docpack renders `install.md` from the
`[install]` table in `docpack.toml`. Fill it in:

- `objective`: one sentence describing a successful install.
- `[install.done_when]`: a `command` that proves the install worked (for
  example `{cli-name} --version`) and, if stable, its `expected_output`.
- `prerequisites`: tools that must exist before step 1.
- `[[install.steps]]`: ordered steps, each with a `title` and a `command`. Add
  `[[install.steps.alternatives]]` with `platform`/`manager` for other systems.

Commands may use the placeholders `{{package-name}}` ({package-name}),
`{{cli-name}}` ({cli-name}) and `{{app-name}}` ({app-name}).

Check the result with `docpack generate --install-md` and read `install.md`
as an agent would: every step must be executable without guessing.
";

/// Render a skill prompt with project details filled in.
pub fn render(skill: Skill, config: &ProjectConfig) -> Result<String, TemplateError> {
    let mut values = install_md::placeholder_values(config);
    // Skills also run before a project is configured.
    for name in ["project-name", "package-name", "cli-name", "app-name"] {
        values
            .entry(name.to_string())
            .or_insert_with(|| "this project".to_string());
    }
    values.insert("project-type".into(), config.project.kind.to_string());
    values.insert(
        "docs-path".into(),
        config.docs.path.trim_end_matches('/').to_string(),
    );
    values.insert("min-words".into(), config.audit.min_words.to_string());
    let sections = if config.docs.required.is_empty() {
        "- (none declared in docs.required)".to_string()
    } else {
        config
            .docs
            .required
            .iter()
            .map(|entry| format!("- `{}`", naming::page_id(entry)))
            .collect::<Vec<_>>()
            .join("\n")
    };
    values.insert("required-sections".into(), sections);
    template::render(skill.template(), &values)
}
