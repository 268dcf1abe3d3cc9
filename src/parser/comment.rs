//! Doc comment tokenizer.
//!
//! Strips the `/** */` delimiters and the `*` gutter, then splits the text
//! into a free-form description, `@key value` tags and code examples.
//! `@example` bodies and fenced code blocks in the description become
//! [`Example`]s rather than tags.

use crate::model::{Example, ExampleKind};
use regex::Regex;
use std::sync::LazyLock;

static RE_TAG_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^@([A-Za-z_][\w-]*)\s*(.*)$").unwrap());

static RE_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*```\s*([\w+#.-]*)\s*$").unwrap());

static RE_CAPTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</?caption>").unwrap());

const DEFAULT_LANGUAGE: &str = "js";

/// One `@key value` directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub key: String,
    /// Same-line text plus continuation lines, newline-joined and trimmed
    pub value: String,
}

/// A doc comment split into its parts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentParts {
    pub description: String,
    pub tags: Vec<Tag>,
    pub examples: Vec<Example>,
}

enum Section {
    Description,
    Tag,
    Example,
}

#[derive(Default)]
struct PendingExample {
    caption: String,
    lines: Vec<String>,
}

/// Tokenize a raw `/** ... */` comment.
pub fn tokenize(comment: &str) -> CommentParts {
    let mut description_lines: Vec<String> = Vec::new();
    let mut tags: Vec<(String, Vec<String>)> = Vec::new();
    let mut javadoc: Vec<PendingExample> = Vec::new();
    let mut section = Section::Description;

    for line in strip_delimiters(comment).lines().map(strip_gutter) {
        if let Some(caps) = RE_TAG_LINE.captures(line.trim_start()) {
            let key = caps[1].to_string();
            let rest = caps[2].trim_end().to_string();
            if key == "example" {
                javadoc.push(PendingExample {
                    caption: rest,
                    lines: Vec::new(),
                });
                section = Section::Example;
            } else {
                tags.push((key, vec![rest]));
                section = Section::Tag;
            }
            continue;
        }

        match section {
            Section::Description => description_lines.push(line.trim_end().to_string()),
            Section::Tag => {
                if let Some((_, lines)) = tags.last_mut() {
                    lines.push(line.trim().to_string());
                }
            }
            Section::Example => {
                if let Some(example) = javadoc.last_mut() {
                    example.lines.push(line.trim_end().to_string());
                }
            }
        }
    }

    let (description, mut examples) = split_fenced_examples(&description_lines);
    examples.extend(javadoc.into_iter().map(finish_javadoc_example));

    CommentParts {
        description,
        tags: tags
            .into_iter()
            .map(|(key, lines)| Tag {
                key,
                value: lines.join("\n").trim().to_string(),
            })
            .collect(),
        examples,
    }
}

fn strip_delimiters(comment: &str) -> &str {
    let body = comment.trim();
    let body = body.strip_prefix("/**").unwrap_or(body);
    body.strip_suffix("*/").unwrap_or(body)
}

/// Remove leading whitespace and a single `*` (plus one space) from a line.
fn strip_gutter(line: &str) -> &str {
    let trimmed = line.trim_start();
    match trimmed.strip_prefix('*') {
        Some(rest) => rest.strip_prefix(' ').unwrap_or(rest),
        None => trimmed,
    }
}

/// Lift fenced code blocks out of the description.
///
/// Each block's description is the paragraph immediately before it.
fn split_fenced_examples(lines: &[String]) -> (String, Vec<Example>) {
    let mut kept: Vec<&str> = Vec::new();
    let mut examples = Vec::new();
    let mut paragraph: Vec<&str> = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i].as_str();
        let Some(caps) = RE_FENCE.captures(line) else {
            if line.trim().is_empty() {
                paragraph.clear();
            } else {
                paragraph.push(line.trim());
            }
            kept.push(line);
            i += 1;
            continue;
        };

        let close = lines[i + 1..]
            .iter()
            .position(|l| l.trim() == "```")
            .map(|offset| i + 1 + offset);
        let Some(close) = close else {
            // unterminated fence stays in the description
            kept.extend(lines[i..].iter().map(String::as_str));
            break;
        };

        let language = match &caps[1] {
            "" => DEFAULT_LANGUAGE.to_string(),
            lang => lang.to_string(),
        };
        examples.push(Example {
            language,
            description: paragraph.join(" "),
            kind: ExampleKind::Gfm,
            text: dedent(&lines[i + 1..close]),
        });
        paragraph.clear();
        i = close + 1;
    }

    (collapse_blank_lines(&kept), examples)
}

fn finish_javadoc_example(pending: PendingExample) -> Example {
    let mut language = DEFAULT_LANGUAGE.to_string();
    let mut body: &[String] = &pending.lines;

    // tolerate an @example body wrapped in a fence
    let first = body.iter().position(|l| !l.trim().is_empty());
    let last = body.iter().rposition(|l| !l.trim().is_empty());
    if let (Some(first), Some(last)) = (first, last) {
        if first < last && body[last].trim() == "```" {
            if let Some(caps) = RE_FENCE.captures(&body[first]) {
                if !caps[1].is_empty() {
                    language = caps[1].to_string();
                }
                body = &body[first + 1..last];
            }
        }
    }

    Example {
        language,
        description: RE_CAPTION.replace_all(&pending.caption, "").trim().to_string(),
        kind: ExampleKind::Javadoc,
        text: dedent(body),
    }
}

/// Remove common leading indentation and surrounding blank lines.
fn dedent(lines: &[String]) -> String {
    let indent = lines
        .iter()
        .filter(|l| !l.trim().is_empty())
        .map(|l| l.len() - l.trim_start().len())
        .min()
        .unwrap_or(0);
    let body: Vec<&str> = lines
        .iter()
        .map(|l| l.get(indent..).unwrap_or_else(|| l.trim_start()))
        .collect();
    body.join("\n").trim_matches('\n').trim_end().to_string()
}

fn collapse_blank_lines(lines: &[&str]) -> String {
    let mut out: Vec<&str> = Vec::with_capacity(lines.len());
    for line in lines {
        let blank = line.trim().is_empty();
        if blank && out.last().is_some_and(|prev| prev.is_empty()) {
            continue;
        }
        out.push(if blank { "" } else { line });
    }
    out.join("\n").trim().to_string()
}
