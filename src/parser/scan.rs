//! Block scanner — pairs each `/** ... */` block with the code that follows it.
//!
//! The code fragment runs from the first non-whitespace character after the
//! comment up to the first `;`, `)` or `{`. A signature that closes several
//! parentheses before its brace is therefore cut at the first `)`.

use crate::model::CommentBlock;
use regex::Regex;
use std::sync::LazyLock;

static RE_COMMENT_AND_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(/\*\*[\s\S]+?\*/)\s*([^;){]+[;){])").unwrap());

/// Iterate over comment/code pairs in source order.
///
/// Comments not followed by a recognizable code fragment are skipped.
pub fn blocks(source: &str) -> impl Iterator<Item = CommentBlock> + '_ {
    RE_COMMENT_AND_CODE.captures_iter(source).map(|caps| {
        tracing::trace!(code = &caps[2], "matched comment block");
        CommentBlock {
            comment: caps[1].to_string(),
            code: caps[2].to_string(),
        }
    })
}

/// Collect all comment/code pairs.
pub fn scan(source: &str) -> Vec<CommentBlock> {
    blocks(source).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_doc_comments() {
        let input = "// line comment\n/* plain block */\nfunction a() {}\n";
        assert!(scan(input).is_empty());
    }

    #[test]
    fn pairs_comment_with_signature() {
        let input = "/**\n * Add\n */\nexport function add(a, b) {\n  return a + b;\n}\n";
        let blocks = scan(input);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].comment, "/**\n * Add\n */");
        assert_eq!(blocks[0].code, "export function add(a, b)");
    }

    #[test]
    fn stops_at_first_terminator() {
        let input = "/** Max */\nthis.max = 5;\n";
        let blocks = scan(input);
        assert_eq!(blocks[0].code, "this.max = 5;");

        let input = "/** Class */\nclass Foo extends Bar {\n}\n";
        assert_eq!(scan(input)[0].code, "class Foo extends Bar {");
    }

    #[test]
    fn multiple_blocks_in_order() {
        let input = "/** One */\nfunction one() {}\n\n/** Two */\nfunction two() {}\n";
        let codes: Vec<_> = scan(input).into_iter().map(|b| b.code).collect();
        assert_eq!(codes, vec!["function one()", "function two()"]);
    }

    #[test]
    fn rescanning_is_stable() {
        let input = "/** A */\nconst a = function(x) {};\n/** B */\nb();\n";
        assert_eq!(scan(input), scan(input));
    }

    #[test]
    fn empty_comment_body_does_not_match() {
        // `/***/` has no body for the lazy body group
        assert!(scan("/***/;").is_empty());
    }
}
