//! `{placeholder}` substitution for install guides and skill prompts.
//!
//! A placeholder is `{` + lowercase letters, digits and `-` + `}`. Every
//! placeholder must resolve; rendering never leaves a literal `{name}` in the
//! output. `{{` and `}}` produce literal braces. A `{` right after `$` and any
//! other brace are copied through unchanged, so shell snippets like
//! `${version}` or `{ a; b; }` survive.

use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("Unresolved placeholder {{{0}}}")]
    MissingPlaceholder(String),
    #[error("Unterminated placeholder at byte {0}")]
    Unterminated(usize),
}

/// Placeholder name → replacement text.
pub type Values = BTreeMap<String, String>;

fn is_name_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'
}

/// Substitute every placeholder in `template` from `values`.
pub fn render(template: &str, values: &Values) -> Result<String, TemplateError> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(pos) = rest.find(['{', '}']) {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];

        if let Some(after) = tail.strip_prefix("{{").or_else(|| tail.strip_prefix("}}")) {
            out.push_str(&tail[..1]);
            rest = after;
            continue;
        }
        if tail.starts_with('}') {
            out.push('}');
            rest = &tail[1..];
            continue;
        }
        if template[..template.len() - tail.len()].ends_with('$') {
            out.push('{');
            rest = &tail[1..];
            continue;
        }

        let inner = &tail[1..];
        let name_len = inner.find(|c: char| !is_name_char(c)).unwrap_or(inner.len());
        let name = &inner[..name_len];
        let terminated = inner[name_len..].starts_with('}');

        match (name.is_empty(), terminated) {
            (false, true) => {
                let value = values
                    .get(name)
                    .ok_or_else(|| TemplateError::MissingPlaceholder(name.to_string()))?;
                out.push_str(value);
                rest = &inner[name_len + 1..];
            }
            (false, false) if name_len == inner.len() => {
                return Err(TemplateError::Unterminated(template.len() - tail.len()));
            }
            _ => {
                out.push('{');
                rest = inner;
            }
        }
    }
    out.push_str(rest);
    Ok(out)
}

/// Placeholder names used in `template`, in first-use order.
pub fn placeholders(template: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    let mut rest = template;
    while let Some(pos) = rest.find('{') {
        let inner = &rest[pos + 1..];
        if let Some(after) = inner.strip_prefix('{') {
            rest = after;
            continue;
        }
        let name_len = inner.find(|c: char| !is_name_char(c)).unwrap_or(inner.len());
        let name = &inner[..name_len];
        let shell_var = rest[..pos].ends_with('$');
        if !shell_var
            && !name.is_empty()
            && inner[name_len..].starts_with('}')
            && !names.iter().any(|n| n == name)
        {
            names.push(name.to_string());
        }
        rest = &inner[name_len..];
    }
    names
}
