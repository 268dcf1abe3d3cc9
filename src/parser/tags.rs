//! Tag interpreter — turns one tokenized comment plus its signature context
//! into a [`DescriptionRecord`].
//!
//! Tags are walked in source order. `@param`, `@returns` and `@throws` each
//! become the target for any `@property` tags that follow them.

use crate::model::*;
use crate::parser::comment::{self, CommentParts, Tag};
use crate::parser::eval::{self, Scope};
use regex::Regex;
use std::sync::LazyLock;

static RE_TYPE_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^\{([^}]*)\}(.*)$").unwrap());

static RE_WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Case-insensitive type aliases and their canonical names.
const TYPE_ALIASES: &[(&[&str], &str)] = &[
    (&["bool", "boolean"], "Boolean"),
    (&["int", "integer"], "Number"),
    (&["func", "function"], "Function"),
    (&["string"], "String"),
    (&["array"], "Array"),
    (&["null"], "null"),
    (&["undefined", "void"], "undefined"),
];

/// Where `@property` tags currently attach.
#[derive(Debug, Clone, Copy)]
enum PropertyTarget {
    Param(usize),
    Throws(usize),
    Returns,
}

/// Interpret a comment block against its classified context.
pub fn interpret(block: &CommentBlock, context: &SignatureContext) -> DescriptionRecord {
    interpret_parts(comment::tokenize(&block.comment), context)
}

/// Interpret an already tokenized comment.
pub fn interpret_parts(parts: CommentParts, context: &SignatureContext) -> DescriptionRecord {
    let mut record = DescriptionRecord {
        name: context.name.clone(),
        kind: context.kind,
        subtype: context.subtype,
        description: parts.description,
        access: Access::Public,
        chainable: None,
        deprecated: None,
        version: None,
        since: None,
        todos: Vec::new(),
        see_also: Vec::new(),
        throws_list: Vec::new(),
        examples: parts.examples,
        parameters: Vec::new(),
        returns: TypedTag::default(),
        custom_tags: Vec::new(),
        ignore: false,
        is_async: context.is_async,
        is_static: context.is_static,
        signature: None,
        can_attach: context.attachable,
    };
    let mut access: Option<Access> = None;
    let mut target: Option<PropertyTarget> = None;

    for Tag { key, value } in parts.tags {
        match key.as_str() {
            "public" | "private" | "protected" => access = Some(Access::parse(&key)),
            "api" | "access" if value.is_empty() => {
                tracing::debug!(tag = %key, "empty access tag ignored")
            }
            "api" | "access" => access = Some(Access::parse(&value)),
            "desc" | "description" => {
                if !record.description.is_empty() {
                    record.description.push('\n');
                }
                record.description.push_str(&value);
            }
            "ignore" => record.ignore = true,
            "chainable" => record.chainable = Some(true),
            "deprecated" => record.deprecated = Some(true),
            "see" => record.see_also.push(value),
            "todo" => record.todos.push(value),
            "version" => record.version = Some(value),
            "since" => record.since = Some(value),
            "throws" => {
                record.throws_list.push(parse_typed_tag(&value));
                target = Some(PropertyTarget::Throws(record.throws_list.len() - 1));
            }
            "param" => {
                record.parameters.push(parse_param_tag(&value));
                target = Some(PropertyTarget::Param(record.parameters.len() - 1));
            }
            "returns" | "return" => {
                record.returns = parse_typed_tag(&value);
                target = Some(PropertyTarget::Returns);
            }
            "property" => match target {
                Some(t) => {
                    let mut property = parse_param_tag(&value);
                    property.properties.clear();
                    properties_of(&mut record, t).push(property);
                }
                None => tracing::debug!(value = %value, "@property without a target dropped"),
            },
            _ => record.custom_tags.push(CustomTag { tag: key, value }),
        }
    }

    if record.parameters.is_empty() {
        record.parameters = context.parameters.clone().unwrap_or_default();
    }

    record.access = access.unwrap_or_else(|| {
        if record.name.starts_with('_') {
            Access::Private
        } else {
            Access::Public
        }
    });

    if record.kind == Some(Kind::Function) {
        record.signature = Some(format_signature(&record, context));
    }

    record
}

fn properties_of(record: &mut DescriptionRecord, target: PropertyTarget) -> &mut Vec<Parameter> {
    match target {
        PropertyTarget::Param(i) => &mut record.parameters[i].properties,
        PropertyTarget::Throws(i) => &mut record.throws_list[i].properties,
        PropertyTarget::Returns => &mut record.returns.properties,
    }
}

/// `[async ]name(args) ⇒ {ReturnType}`
fn format_signature(record: &DescriptionRecord, context: &SignatureContext) -> String {
    let maybe_async = if context.is_async == Some(true) { "async " } else { "" };
    let return_type = record.returns.type_name.as_deref().unwrap_or("undefined");
    format!(
        "{}{}({}) ⇒ {{{}}}",
        maybe_async, record.name, context.args_string, return_type
    )
    .trim()
    .to_string()
}

/// Parse `{Type} description` (`@returns`, `@throws`).
pub fn parse_typed_tag(value: &str) -> TypedTag {
    let value = value.trim();
    match RE_TYPE_PREFIX.captures(value) {
        Some(caps) => TypedTag {
            type_name: non_empty_type(&caps[1]),
            description: normalize_whitespace(&caps[2]),
            properties: Vec::new(),
        },
        None => TypedTag {
            type_name: None,
            description: normalize_whitespace(value),
            properties: Vec::new(),
        },
    }
}

/// Parse `{Type} name description` or `{Type} [name=default] description`.
///
/// A leading `?` in the type or brackets around the name make it optional.
/// Malformed input becomes a nameless parameter whose description is the
/// whole value.
pub fn parse_param_tag(value: &str) -> Parameter {
    let value = value.trim();
    parse_param_parts(value).unwrap_or_else(|| {
        tracing::debug!(value, "malformed @param grammar");
        Parameter {
            description: normalize_whitespace(value),
            ..Parameter::new("")
        }
    })
}

fn parse_param_parts(value: &str) -> Option<Parameter> {
    let (raw_type, rest) = if value.starts_with('{') {
        let caps = RE_TYPE_PREFIX.captures(value)?;
        let raw_type = caps.get(1).map(|m| m.as_str().trim())?;
        let rest = caps.get(2).map_or("", |m| m.as_str().trim_start());
        (Some(raw_type), rest)
    } else {
        (None, value)
    };

    let (name, default, bracketed, description) = if rest.starts_with('[') {
        let close = matching_bracket(rest)?;
        let inner = &rest[1..close];
        let (name, default) = match inner.split_once('=') {
            Some((name, default)) => (name.trim(), Some(default.trim())),
            None => (inner.trim(), None),
        };
        (name, default, true, &rest[close + 1..])
    } else {
        let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        (&rest[..end], None, false, &rest[end..])
    };

    let nullable = raw_type.is_some_and(|t| t.starts_with('?'));
    Some(Parameter {
        name: name.to_string(),
        declared_type: raw_type.and_then(non_empty_type),
        description: normalize_whitespace(description),
        required: !(bracketed || nullable),
        default_value: default.and_then(parse_default_literal),
        properties: Vec::new(),
    })
}

/// Index of the `]` closing the `[` at the start of `text`.
fn matching_bracket(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    for (i, c) in text.char_indices() {
        if let Some(q) = quote {
            if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' => quote = Some(c),
            '[' | '{' => depth += 1,
            ']' | '}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return (c == ']').then_some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Parse a `[name=default]` literal; unparseable text stays a raw string.
///
/// `undefined` yields no default.
pub fn parse_default_literal(raw: &str) -> Option<Literal> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    let literal = if raw.starts_with('[') || raw.starts_with('{') {
        serde_json::from_str::<serde_json::Value>(raw)
            .map(Literal::from)
            .unwrap_or_else(|_| Literal::String(raw.to_string()))
    } else {
        eval::evaluate(raw, Scope::default()).unwrap_or_else(|_| Literal::String(raw.to_string()))
    };
    (!literal.is_undefined()).then_some(literal)
}

fn non_empty_type(raw: &str) -> Option<String> {
    let raw = raw.trim();
    (!raw.is_empty()).then(|| normalize_type(raw))
}

/// Normalize a type or union of types.
///
/// Aliases collapse case-insensitively (`int` → `Number`), nullable markers
/// are dropped, and an `[]` suffix is kept.
pub fn normalize_type(typename: &str) -> String {
    typename
        .split('|')
        .map(|member| {
            let member = member.trim().trim_start_matches(['?', '!']);
            let member = member
                .strip_prefix('(')
                .and_then(|m| m.strip_suffix(')'))
                .unwrap_or(member)
                .trim();
            let (base, suffix) = match member.strip_suffix("[]") {
                Some(base) => (base, "[]"),
                None => (member, ""),
            };
            let canonical = TYPE_ALIASES
                .iter()
                .find(|(aliases, _)| aliases.iter().any(|a| a.eq_ignore_ascii_case(base)))
                .map_or(base, |(_, name)| *name);
            format!("{}{}", canonical, suffix)
        })
        .collect::<Vec<_>>()
        .join("|")
}

/// Collapse runs of whitespace into one space and trim.
pub fn normalize_whitespace(text: &str) -> String {
    RE_WHITESPACE.replace_all(text.trim(), " ").into_owned()
}
