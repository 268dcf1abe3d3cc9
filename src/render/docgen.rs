//! `__docgenInfo` code renderer.
//!
//! Emits JavaScript that attaches a react-docgen style description to every
//! attachable, non-ignored record. Each assignment is wrapped in its own
//! `try` so one missing identifier doesn't break the rest.

use crate::model::*;
use crate::render::Renderer;
use anyhow::{Context, Result};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

pub struct DocgenRenderer;

impl Renderer for DocgenRenderer {
    fn render(&self, records: &[DescriptionRecord]) -> Result<String> {
        let mut blocks = Vec::new();
        for record in records.iter().filter(|r| r.can_attach && !r.ignore) {
            let info = DocgenInfo {
                display_name: &record.name,
                description: &record.description,
                props: Props(&record.parameters),
                raw_record: record,
            };
            let json = serde_json::to_string_pretty(&info)
                .with_context(|| format!("failed to serialize docgen info for {}", record.name))?;
            blocks.push(format!(
                "\ntry {{\n  {}.__docgenInfo = {};\n}} catch (e) {{}}",
                record.name, json
            ));
        }
        Ok(blocks.join("\n"))
    }

    fn file_extension(&self) -> &str {
        "docgen.js"
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DocgenInfo<'a> {
    display_name: &'a str,
    description: &'a str,
    props: Props<'a>,
    raw_record: &'a DescriptionRecord,
}

/// Parameters keyed by name, in declaration order.
struct Props<'a>(&'a [Parameter]);

impl Serialize for Props<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for param in self.0 {
            map.serialize_entry(&param.name, &Prop::from(param))?;
        }
        map.end()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Prop<'a> {
    description: &'a str,
    required: bool,
    #[serde(rename = "type")]
    type_info: TypeInfo<'a>,
    default_value: DefaultValue<'a>,
}

#[derive(Serialize)]
struct TypeInfo<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
}

#[derive(Serialize)]
struct DefaultValue<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<&'a Literal>,
    computed: bool,
}

impl<'a> From<&'a Parameter> for Prop<'a> {
    fn from(param: &'a Parameter) -> Self {
        Prop {
            description: &param.description,
            required: param.required,
            type_info: TypeInfo {
                name: param.declared_type.as_deref(),
            },
            default_value: DefaultValue {
                value: param.default_value.as_ref(),
                computed: false,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::extract;
    use pretty_assertions::assert_eq;

    #[test]
    fn wraps_each_assignment_in_try() {
        let input = "/**\n * One\n */\nfunction one() {}\n/**\n * Two\n */\nexports.two = function() {}\n";
        let out = DocgenRenderer.render(&extract(input)).unwrap();
        assert!(out.starts_with("\ntry {\n  one.__docgenInfo = {\n"));
        assert!(out.contains("} catch (e) {}\n\ntry {\n  exports.two.__docgenInfo = {\n"));
        assert!(out.ends_with("};\n} catch (e) {}"));
    }

    #[test]
    fn props_payload() {
        let input = "/**\n * Wait\n * @param {Number} [delay=5000]  The delay\n */\nfunction wait(delay = 5000) {}\n";
        let records = extract(input);
        let out = DocgenRenderer.render(&records).unwrap();
        let json = out
            .trim_start_matches("\ntry {\n  wait.__docgenInfo = ")
            .trim_end_matches(";\n} catch (e) {}");
        let value: serde_json::Value = serde_json::from_str(json).unwrap();
        assert_eq!(value["displayName"], "wait");
        assert_eq!(value["description"], "Wait");
        assert_eq!(
            value["props"]["delay"],
            serde_json::json!({
                "description": "The delay",
                "required": false,
                "type": { "name": "Number" },
                "defaultValue": { "value": 5000, "computed": false }
            })
        );
        assert_eq!(value["rawRecord"]["name"], "wait");
    }

    #[test]
    fn missing_type_and_default_are_omitted() {
        let input = "/**\n * @param foo\n */\nfunction f(foo) {}\n";
        let out = DocgenRenderer.render(&extract(input)).unwrap();
        assert!(out.contains("\"type\": {},"));
        assert!(out.contains("\"defaultValue\": {\n"));
        assert!(out.contains("\"computed\": false"));
    }

    #[test]
    fn skips_unattachable_and_ignored() {
        let input = "/**\n * @ignore\n */\nfunction hidden() {}\n/**\n * Method\n */\nrun(a) {\n/**\n * Anonymous\n */\nfunction(a) {\n";
        assert_eq!(DocgenRenderer.render(&extract(input)).unwrap(), "");
    }
}
