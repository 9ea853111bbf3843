//! Page metadata resolution.
//!
//! Everything docpack knows about a page beyond its path comes from its text:
//!
//! ```text
//! Title:       front matter `title` → first `# H1` → page id
//! Headings:    `##` / `###` lines outside fenced code, slugged per page
//! Description: front matter `description` → first prose paragraph
//! Metrics:     prose word count, fenced code block count
//! ```
//!
//! Front matter is an optional block of `key: value` lines fenced by `---` at
//! the very top of the file. Values may be quoted. Nested YAML is not
//! supported; unrecognized lines are ignored.

use crate::naming::SlugAllocator;
use crate::types::Heading;
use pulldown_cmark::{CodeBlockKind, Event, Parser, Tag, TagEnd};
use std::collections::BTreeMap;

const FRONT_MATTER_DELIM: &str = "---";

/// Front-matter fields plus the body that follows the block.
#[derive(Debug, Clone, PartialEq)]
pub struct FrontMatter<'a> {
    pub fields: BTreeMap<String, String>,
    pub body: &'a str,
}

impl FrontMatter<'_> {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }
}

/// Split an optional front-matter block off the top of `content`.
///
/// Without an opening `---` line, or without a closing one, the whole content
/// is the body and no fields are returned.
pub fn split_front_matter(content: &str) -> FrontMatter<'_> {
    let no_front_matter = FrontMatter {
        fields: BTreeMap::new(),
        body: content,
    };
    let stripped = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut lines = stripped.split_inclusive('\n');
    let Some(first) = lines.next() else {
        return no_front_matter;
    };
    if first.trim_end() != FRONT_MATTER_DELIM {
        return no_front_matter;
    }

    let mut fields = BTreeMap::new();
    let mut offset = content.len() - stripped.len() + first.len();
    for line in lines {
        offset += line.len();
        if line.trim_end() == FRONT_MATTER_DELIM {
            return FrontMatter {
                fields,
                body: &content[offset..],
            };
        }
        if let Some((key, value)) = line.split_once(':') {
            let key = key.trim();
            if !key.is_empty() && !key.starts_with('#') {
                fields.insert(key.to_string(), unquote(value.trim()).to_string());
            }
        }
    }
    no_front_matter
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

/// Text of the first `# ` heading outside fenced code.
pub fn first_h1(body: &str) -> Option<String> {
    markdown_lines(body)
        .filter_map(parse_heading_line)
        .find(|(depth, _)| *depth == 1)
        .map(|(_, text)| text.to_string())
        .filter(|text| !text.is_empty())
}

/// Second- and third-level headings in document order, with unique slugs.
///
/// Slugs are allocated across every heading level so anchors stay unique in
/// the rendered page, but only depths 2 and 3 are returned.
pub fn extract_headings(body: &str) -> Vec<Heading> {
    let mut slugs = SlugAllocator::new();
    let mut headings = Vec::new();
    for (depth, text) in markdown_lines(body).filter_map(parse_heading_line) {
        let slug = slugs.allocate(text);
        if depth == 2 || depth == 3 {
            headings.push(Heading {
                depth: depth as u8,
                slug,
                text: text.to_string(),
            });
        }
    }
    headings
}

/// Lines that are not inside a fenced code block (fence lines excluded).
fn markdown_lines(body: &str) -> impl Iterator<Item = &str> {
    let mut fence: Option<&str> = None;
    body.lines().filter(move |line| {
        let trimmed = line.trim_start();
        let marker = if trimmed.starts_with("```") {
            Some("```")
        } else if trimmed.starts_with("~~~") {
            Some("~~~")
        } else {
            None
        };
        match (fence, marker) {
            (None, Some(m)) => {
                fence = Some(m);
                false
            }
            (Some(open), Some(m)) if open == m => {
                fence = None;
                false
            }
            (Some(_), _) => false,
            (None, None) => true,
        }
    })
}

/// Parse `#`×(1–6) followed by whitespace. Returns depth and trimmed text,
/// with any closing `#` sequence removed.
pub fn parse_heading_line(line: &str) -> Option<(usize, &str)> {
    let bytes = line.as_bytes();
    let depth = bytes.iter().take_while(|&&b| b == b'#').count();
    if depth == 0 || depth > 6 {
        return None;
    }
    match bytes.get(depth) {
        None => return Some((depth, "")),
        Some(b) if b.is_ascii_whitespace() => {}
        Some(_) => return None,
    }
    let text = line[depth..].trim();
    let text = text.trim_end_matches('#').trim_end();
    Some((depth, text))
}

/// Prose word count and fenced code block count for a markdown body.
///
/// Words inside code blocks and heading text (H1 to H6) are not counted;
/// inline code counts as prose.
pub fn content_metrics(body: &str) -> (usize, usize) {
    let mut prose = String::new();
    let mut code_blocks = 0;
    let mut in_code_block = false;
    let mut in_heading = false;
    for event in Parser::new(body) {
        match event {
            Event::Start(Tag::CodeBlock(kind)) => {
                in_code_block = true;
                if matches!(kind, CodeBlockKind::Fenced(_)) {
                    code_blocks += 1;
                }
            }
            Event::End(TagEnd::CodeBlock) => in_code_block = false,
            Event::Start(Tag::Heading { .. }) => in_heading = true,
            Event::End(TagEnd::Heading(_)) => {
                in_heading = false;
                prose.push(' ');
            }
            Event::Text(text) | Event::Code(text) if !in_code_block && !in_heading => {
                prose.push_str(&text)
            }
            // Block boundaries separate words; inline markup does not.
            Event::End(TagEnd::Paragraph | TagEnd::Item | TagEnd::TableCell)
            | Event::SoftBreak
            | Event::HardBreak => prose.push(' '),
            _ => {}
        }
    }
    (prose.split_whitespace().count(), code_blocks)
}

/// Plain text of the first prose paragraph, inline markup stripped and
/// whitespace collapsed. Paragraphs inside lists, block quotes and tables are
/// skipped.
pub fn first_paragraph(body: &str) -> Option<String> {
    let mut containers: Vec<TagEnd> = Vec::new();
    let mut in_paragraph = false;
    let mut text = String::new();
    for event in Parser::new(body) {
        match event {
            Event::Start(Tag::Paragraph) if containers.is_empty() => in_paragraph = true,
            Event::End(TagEnd::Paragraph) if in_paragraph => {
                let collapsed = collapse_whitespace(&text);
                if !collapsed.is_empty() {
                    return Some(collapsed);
                }
                text.clear();
                in_paragraph = false;
            }
            Event::Start(tag @ (Tag::List(_) | Tag::BlockQuote(_) | Tag::Table(_))) => {
                containers.push(tag.to_end())
            }
            Event::End(end) if containers.last() == Some(&end) => {
                containers.pop();
            }
            Event::Text(t) | Event::Code(t) if in_paragraph => text.push_str(&t),
            Event::SoftBreak | Event::HardBreak if in_paragraph => text.push(' '),
            _ => {}
        }
    }
    None
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // Front matter
    // =========================================================================

    #[test]
    fn front_matter_fields_and_body() {
        let content = "---\ntitle: \"Quick Start\"\norder: 2\n---\n# Ignored\n\nBody";
        let fm = split_front_matter(content);
        assert_eq!(fm.get("title"), Some("Quick Start"));
        assert_eq!(fm.get("order"), Some("2"));
        assert_eq!(fm.body, "# Ignored\n\nBody");
    }

    #[test]
    fn no_front_matter_returns_whole_content() {
        let content = "# Title\n\n---\n\nBody";
        let fm = split_front_matter(content);
        assert!(fm.fields.is_empty());
        assert_eq!(fm.body, content);
    }

    #[test]
    fn unterminated_front_matter_is_body() {
        let content = "---\ntitle: Nope\n# Heading";
        let fm = split_front_matter(content);
        assert!(fm.fields.is_empty());
        assert_eq!(fm.body, content);
    }

    #[test]
    fn front_matter_with_crlf() {
        let content = "---\r\ndescription: 'Short'\r\n---\r\nBody";
        let fm = split_front_matter(content);
        assert_eq!(fm.get("description"), Some("Short"));
        assert_eq!(fm.body, "Body");
    }

    // =========================================================================
    // Headings
    // =========================================================================

    #[test]
    fn first_h1_found() {
        assert_eq!(first_h1("intro\n# Overview\n## Details").as_deref(), Some("Overview"));
        assert_eq!(first_h1("## Only H2"), None);
    }

    #[test]
    fn first_h1_ignores_code_fences() {
        let body = "```sh\n# not a heading\n```\n# Real";
        assert_eq!(first_h1(body).as_deref(), Some("Real"));
    }

    #[test]
    fn heading_line_requires_whitespace() {
        assert_eq!(parse_heading_line("## Usage"), Some((2, "Usage")));
        assert_eq!(parse_heading_line("#hashtag"), None);
        assert_eq!(parse_heading_line("####### seven"), None);
        assert_eq!(parse_heading_line("### Closed ###"), Some((3, "Closed")));
    }

    #[test]
    fn headings_depth_two_and_three_only() {
        let body = "# Title\n## Install\n### From source\n#### Deep\n## Usage";
        let headings = extract_headings(body);
        let summary: Vec<(u8, &str)> = headings.iter().map(|h| (h.depth, h.slug.as_str())).collect();
        assert_eq!(
            summary,
            vec![(2, "install"), (3, "from-source"), (2, "usage")]
        );
    }

    #[test]
    fn heading_slug_collisions_get_suffix() {
        let body = "## Example\n## Example\n### Example";
        let slugs: Vec<String> = extract_headings(body).into_iter().map(|h| h.slug).collect();
        assert_eq!(slugs, vec!["example", "example-2", "example-3"]);
    }

    #[test]
    fn headings_inside_tilde_fence_ignored() {
        let body = "~~~\n## hidden\n~~~\n## shown";
        let headings = extract_headings(body);
        assert_eq!(headings.len(), 1);
        assert_eq!(headings[0].text, "shown");
    }

    // =========================================================================
    // Metrics
    // =========================================================================

    #[test]
    fn metrics_exclude_code_block_words() {
        let body = "# Title\n\nOne two three.\n\n```sh\nnot counted here\n```\n\nUse `docpack` now.";
        let (words, blocks) = content_metrics(body);
        assert_eq!(words, 3 + 3);
        assert_eq!(blocks, 1);
    }

    #[test]
    fn metrics_exclude_heading_text() {
        let body = "# A Long Title Here\n\nTwo words.\n\n## Setup Steps\n\n### Deep *nested* heading";
        assert_eq!(content_metrics(body).0, 2);
    }

    #[test]
    fn indented_code_is_not_a_fenced_block() {
        let body = "Intro paragraph.\n\n    indented code\n";
        let (_, blocks) = content_metrics(body);
        assert_eq!(blocks, 0);
    }

    // =========================================================================
    // First paragraph
    // =========================================================================

    #[test]
    fn first_paragraph_strips_markup() {
        let body = "# Title\n\nThis is **bold** and a [link](http://x).\nSecond line.\n\nNext.";
        assert_eq!(
            first_paragraph(body).as_deref(),
            Some("This is bold and a link. Second line.")
        );
    }

    #[test]
    fn first_paragraph_skips_lists_and_code() {
        let body = "# T\n\n- item one\n- item two\n\n```\ncode\n```\n\nProse here.";
        assert_eq!(first_paragraph(body).as_deref(), Some("Prose here."));
    }

    #[test]
    fn first_paragraph_none_without_prose() {
        assert_eq!(first_paragraph("# Only a title\n\n```\nx\n```"), None);
    }
}
