//! Parameter recovery from a raw signature.
//!
//! The argument text runs from the first `(` to the last `)` of the
//! fragment. Each top-level argument is split into a name and an optional
//! default expression; defaults are evaluated one at a time, each in its own
//! scope where every parameter name is bound to `undefined`.

use crate::model::{Literal, Parameter};
use crate::parser::eval::{self, Scope};
use regex::Regex;
use std::sync::LazyLock;

static RE_BETWEEN_PARENS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^[^(]*\((.*)\)").unwrap());

// name, then anything up to the first `=` (tolerates `a: Type = 1`), then default
static RE_ARGUMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^(?:\.\.\.)?([$\p{L}_][$\w]*)[^=]*(?:=(.*))?$").unwrap()
});

// destructuring pattern with optional default
static RE_PATTERN_ARGUMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^(\{.*?\}|\[.*?\])\s*(?:=(.*))?$").unwrap());

const RESERVED_WORDS: &[&str] = &["true", "false", "null", "undefined"];

/// Arguments recovered from a signature.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Recovered {
    /// Trimmed text between the parentheses
    pub args_string: String,
    pub parameters: Vec<Parameter>,
}

/// A split-out argument before its default is evaluated.
struct RawArgument<'a> {
    name: String,
    default_expr: Option<&'a str>,
}

/// Recover the parameter list from a code fragment.
pub fn recover(code: &str) -> Recovered {
    let Some(caps) = RE_BETWEEN_PARENS.captures(code) else {
        return Recovered::default();
    };
    let between = caps.get(1).map_or("", |m| m.as_str());
    if between.is_empty() {
        return Recovered::default();
    }

    let raw: Vec<RawArgument> = split_top_level(between)
        .into_iter()
        .filter_map(parse_argument)
        .collect();
    let names: Vec<String> = raw.iter().map(|arg| arg.name.clone()).collect();

    let parameters = raw
        .iter()
        .map(|arg| {
            let mut param = Parameter::new(arg.name.clone());
            if let Some(expr) = arg.default_expr {
                param.required = false;
                // fresh scope per default; a failure only affects this parameter
                match eval::evaluate(expr, Scope::new(&names)) {
                    Ok(value) => apply_default(&mut param, value),
                    Err(err) => {
                        tracing::debug!(
                            param = %arg.name,
                            expr = expr.trim(),
                            error = %err,
                            "default value not recoverable"
                        );
                    }
                }
            }
            param
        })
        .collect();

    Recovered {
        args_string: between.trim().to_string(),
        parameters,
    }
}

fn apply_default(param: &mut Parameter, value: Literal) {
    param.declared_type = value.type_name().map(str::to_string);
    if !value.is_undefined() {
        param.default_value = Some(value);
    }
}

fn parse_argument(piece: &str) -> Option<RawArgument<'_>> {
    let piece = piece.trim();
    if piece.is_empty() {
        return None;
    }

    if let Some(caps) = RE_PATTERN_ARGUMENT.captures(piece) {
        return Some(RawArgument {
            name: caps[1].to_string(),
            default_expr: caps.get(2).map(|m| m.as_str()),
        });
    }

    let caps = RE_ARGUMENT.captures(piece)?;
    let name = &caps[1];
    if RESERVED_WORDS.contains(&name) {
        return None;
    }
    Some(RawArgument {
        name: name.to_string(),
        default_expr: caps.get(2).map(|m| m.as_str()),
    })
}

/// Split on commas that are not nested in brackets or string literals.
pub(crate) fn split_top_level(input: &str) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut start = 0;

    for (i, c) in input.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '\'' | '"' | '`' => quote = Some(c),
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                pieces.push(&input[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    pieces.push(&input[start..]);
    pieces
}
