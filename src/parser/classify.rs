//! Signature classifier — decides what a code fragment declares.
//!
//! Rules are tried in order and the first one that produces a context wins.
//! The order matters: the method-shorthand rule is broad enough to swallow
//! assignments and arrow properties, so it must stay behind rules 1-5.

use crate::model::{Kind, SignatureContext, Subtype};
use crate::parser::params;
use regex::{Captures, Regex};
use std::sync::LazyLock;

// 1. export default class MyClass
static RE_CLASS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:export\s+(?:default\s+)?)?class\s+([$\p{L}_][$\w]*)(?:\s|\{|$)").unwrap()
});

// 2. export default async function foo
static RE_FUNCTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:export\s+(?:default\s+)?)?(async\s+)?function\b\s*\*?\s*([$\p{L}_][$\w]*)?")
        .unwrap()
});

// 3. foo.bar = async function / const foo = function
static RE_ASSIGNED_FUNCTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([$\p{L}_][$\w.]*)\s*=\s*(async\s+)?function\b").unwrap()
});

// 4. constructor(
static RE_CONSTRUCTOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^constructor\s*\(").unwrap());

// 5. method: async (args) =>
// The scanner cuts fragments at the first `)`, so the arrow may be missing.
static RE_ARROW_METHOD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([$\p{L}_][$\w]*)\s*:\s*(async\s+)?\([\s\S]*\)\s*(?:=>|$)").unwrap()
});

// 6. static async method(args)
static RE_METHOD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(static\s+)?(async\s+)?(?:[gs]et\s+)?([$\p{L}_][$\w]*)[\s\S]+?\)").unwrap()
});

// 7. this.something
static RE_PROPERTY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(this\.[$\p{L}_][$\w]*)").unwrap());

/// Words that can start a statement but never name a method.
const NOT_METHOD_NAMES: &[&str] = &[
    "if", "for", "while", "switch", "catch", "return", "function", "do", "with", "else", "this",
    "new", "typeof", "await", "yield", "throw", "delete", "void", "let", "const", "var",
];

type Build = fn(&Captures<'_>, &str) -> Option<SignatureContext>;

struct Rule {
    name: &'static str,
    pattern: &'static LazyLock<Regex>,
    build: Build,
}

/// Ordered classification rules; first match wins.
static RULES: &[Rule] = &[
    Rule { name: "class", pattern: &RE_CLASS, build: build_class },
    Rule { name: "function", pattern: &RE_FUNCTION, build: build_function },
    Rule { name: "assigned-function", pattern: &RE_ASSIGNED_FUNCTION, build: build_assigned },
    Rule { name: "constructor", pattern: &RE_CONSTRUCTOR, build: build_constructor },
    Rule { name: "arrow-method", pattern: &RE_ARROW_METHOD, build: build_arrow_method },
    Rule { name: "method", pattern: &RE_METHOD, build: build_method },
    Rule { name: "property", pattern: &RE_PROPERTY, build: build_property },
];

/// Classify the code that follows a doc comment.
///
/// Returns the default (unclassified) context when no rule applies.
pub fn classify(code: &str) -> SignatureContext {
    let code = code.trim();
    for rule in RULES {
        let Some(caps) = rule.pattern.captures(code) else {
            continue;
        };
        if let Some(ctx) = (rule.build)(&caps, code) {
            tracing::trace!(rule = rule.name, name = %ctx.name, "classified");
            return ctx;
        }
    }
    tracing::debug!(code, "unrecognized code shape");
    SignatureContext::default()
}

/// Function context with parameters recovered from the fragment.
fn callable(subtype: Option<Subtype>, name: &str, is_async: bool, code: &str) -> SignatureContext {
    let recovered = params::recover(code);
    SignatureContext {
        kind: Some(Kind::Function),
        subtype,
        name: name.to_string(),
        is_async: Some(is_async),
        is_static: Some(false),
        args_string: recovered.args_string,
        parameters: Some(recovered.parameters),
        attachable: false,
    }
}

fn build_class(caps: &Captures<'_>, _code: &str) -> Option<SignatureContext> {
    Some(SignatureContext {
        kind: Some(Kind::Class),
        name: caps[1].to_string(),
        ..Default::default()
    })
}

fn build_function(caps: &Captures<'_>, code: &str) -> Option<SignatureContext> {
    let name = caps.get(2).map_or("", |m| m.as_str());
    Some(SignatureContext {
        attachable: !name.is_empty(),
        ..callable(None, name, caps.get(1).is_some(), code)
    })
}

fn build_assigned(caps: &Captures<'_>, code: &str) -> Option<SignatureContext> {
    Some(SignatureContext {
        attachable: true,
        ..callable(Some(Subtype::Variable), &caps[1], caps.get(2).is_some(), code)
    })
}

fn build_constructor(_caps: &Captures<'_>, code: &str) -> Option<SignatureContext> {
    Some(callable(Some(Subtype::Constructor), "constructor", false, code))
}

fn build_arrow_method(caps: &Captures<'_>, code: &str) -> Option<SignatureContext> {
    Some(callable(Some(Subtype::Method), &caps[1], caps.get(2).is_some(), code))
}

fn build_method(caps: &Captures<'_>, code: &str) -> Option<SignatureContext> {
    let name = &caps[3];
    if NOT_METHOD_NAMES.contains(&name) {
        return None;
    }
    Some(SignatureContext {
        is_static: Some(caps.get(1).is_some()),
        ..callable(Some(Subtype::Method), name, caps.get(2).is_some(), code)
    })
}

fn build_property(caps: &Captures<'_>, _code: &str) -> Option<SignatureContext> {
    Some(SignatureContext {
        kind: Some(Kind::Variable),
        subtype: Some(Subtype::Property),
        name: caps[1].to_string(),
        ..Default::default()
    })
}
