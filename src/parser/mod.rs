//! Extraction pipeline: scan → classify/recover → interpret.

pub mod classify;
pub mod comment;
pub mod eval;
pub mod params;
pub mod scan;
pub mod tags;

use crate::model::DescriptionRecord;

/// Extract one record per documented construct, in source order.
///
/// Never fails: unrecognized code yields a record with an empty
/// classification, and malformed tags degrade to best-effort fields.
pub fn extract(source: &str) -> Vec<DescriptionRecord> {
    scan::blocks(source)
        .map(|block| {
            let context = classify::classify(&block.code);
            tags::interpret(&block, &context)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Kind;

    #[test]
    fn empty_without_doc_comments() {
        assert!(extract("function a() {}\n// nothing here\n").is_empty());
        assert!(extract("").is_empty());
    }

    #[test]
    fn unrecognized_code_still_yields_record() {
        let records = extract("/** Settings */\nlet settings = load();\n");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].kind, None);
        assert_eq!(records[0].name, "");
        assert_eq!(records[0].description, "Settings");
        assert!(records[0].parameters.is_empty());
    }

    #[test]
    fn access_inferred_from_name() {
        let records = extract("/** Helper */\nfunction _helper(){}\n/** Api */\nfunction helper(){}\n");
        assert_eq!(records[0].access.as_str(), "private");
        assert_eq!(records[1].access.as_str(), "public");
    }

    #[test]
    fn attachability() {
        let records = extract(
            "/** a */\nfunction(){}\n/** b */\nexports.foo = function(){}\n/** c */\nfunction foo(){}\n/** d */\nclass Foo {}\n",
        );
        assert_eq!(records[0].kind, Some(Kind::Function));
        assert!(!records[0].can_attach);
        assert!(records[1].can_attach);
        assert!(records[2].can_attach);
        assert!(!records[3].can_attach);
    }
}
