//! GitHub-flavored markdown renderer.
//!
//! An index of documented names followed by one section per record.
//! Ignored and anonymous records are left out.

use crate::model::*;
use crate::render::toc;
use crate::render::Renderer;
use anyhow::Result;

pub struct MarkdownRenderer;

impl Renderer for MarkdownRenderer {
    fn render(&self, records: &[DescriptionRecord]) -> Result<String> {
        let mut output = String::new();

        let visible: Vec<&DescriptionRecord> = records
            .iter()
            .filter(|r| !r.ignore && !r.name.is_empty())
            .collect();
        if !visible.is_empty() {
            output.push_str("## Index\n\n");
            for record in &visible {
                output.push_str(&toc::render_index_item(&record.name));
                output.push('\n');
            }
            output.push('\n');
        }

        for record in &visible {
            output.push_str(&render_record(record));
            output.push('\n');
        }

        Ok(output)
    }

    fn file_extension(&self) -> &str {
        "md"
    }
}

/// Render a single record's documentation block.
fn render_record(record: &DescriptionRecord) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push(format!("### {}\n", record.name));

    let badges = render_badges(record);
    if !badges.is_empty() {
        lines.push(badges);
        lines.push(String::new());
    }

    if let Some(ref signature) = record.signature {
        lines.push(format!("`{}`", signature));
        lines.push(String::new());
    }

    if record.deprecated == Some(true) {
        lines.push("**Deprecated.**".to_string());
        lines.push(String::new());
    }

    if !record.description.is_empty() {
        lines.push(record.description.clone());
        lines.push(String::new());
    }

    if !record.parameters.is_empty() {
        lines.push("#### Parameters\n".to_string());
        lines.push("| Name | Type | Required | Default | Description |".to_string());
        lines.push("| --- | --- | --- | --- | --- |".to_string());
        for param in &record.parameters {
            lines.push(render_param_row(&param.name, param));
            let prefix = format!("{}.", param.name);
            for prop in &param.properties {
                let name = if prop.name.starts_with(&prefix) {
                    prop.name.clone()
                } else {
                    format!("{}{}", prefix, prop.name)
                };
                lines.push(render_param_row(&name, prop));
            }
        }
        lines.push(String::new());
    }

    if record.returns.type_name.is_some() || !record.returns.description.is_empty() {
        lines.push("#### Returns\n".to_string());
        lines.push(format!("* {}", render_typed(&record.returns)));
        for prop in &record.returns.properties {
            lines.push(format!("  * {}", render_property(prop)));
        }
        lines.push(String::new());
    }

    if !record.throws_list.is_empty() {
        lines.push("#### Throws\n".to_string());
        for throws in &record.throws_list {
            lines.push(format!("* {}", render_typed(throws)));
            for prop in &throws.properties {
                lines.push(format!("  * {}", render_property(prop)));
            }
        }
        lines.push(String::new());
    }

    for example in &record.examples {
        lines.push("#### Example\n".to_string());
        if !example.description.is_empty() {
            lines.push(example.description.clone());
            lines.push(String::new());
        }
        lines.push(format!("```{}", example.language));
        lines.push(example.text.clone());
        lines.push("```".to_string());
        lines.push(String::new());
    }

    if !record.see_also.is_empty() {
        lines.push("#### See also\n".to_string());
        for see in &record.see_also {
            lines.push(format!("* {}", toc::render_link(see)));
        }
        lines.push(String::new());
    }

    if !record.todos.is_empty() {
        lines.push("#### Todo\n".to_string());
        for todo in &record.todos {
            lines.push(format!("* {}", todo));
        }
        lines.push(String::new());
    }

    lines.join("\n")
}

fn render_param_row(name: &str, param: &Parameter) -> String {
    let default = param
        .default_value
        .as_ref()
        .and_then(|v| serde_json::to_string(v).ok())
        .map(|v| format!("`{}`", v))
        .unwrap_or_default();
    format!(
        "| `{}` | {} | {} | {} | {} |",
        escape_cell(name),
        param
            .declared_type
            .as_deref()
            .map(|t| format!("`{}`", escape_cell(t)))
            .unwrap_or_default(),
        if param.required { "yes" } else { "no" },
        escape_cell(&default),
        escape_cell(&param.description)
    )
}

/// `` `Type`: description ``
fn render_typed(tag: &TypedTag) -> String {
    match (&tag.type_name, tag.description.is_empty()) {
        (Some(t), true) => format!("`{}`", t),
        (Some(t), false) => format!("`{}`: {}", t, tag.description),
        (None, _) => tag.description.clone(),
    }
}

fn render_property(prop: &Parameter) -> String {
    let mut out = format!("**{}**", prop.name);
    if let Some(ref t) = prop.declared_type {
        out.push_str(&format!(" (`{}`)", t));
    }
    if !prop.description.is_empty() {
        out.push_str(": ");
        out.push_str(&prop.description);
    }
    out
}

/// `` > `private` `async` `static` `chainable` `v1.0` `since 0.9` ``
fn render_badges(record: &DescriptionRecord) -> String {
    let mut badges: Vec<String> = Vec::new();

    if record.access != Access::Public {
        badges.push(format!("`{}`", record.access.as_str()));
    }
    if let Some(kind) = record.kind {
        if kind != Kind::Function {
            badges.push(format!("`{}`", kind.as_str()));
        }
    }
    if record.is_async == Some(true) {
        badges.push("`async`".to_string());
    }
    if record.is_static == Some(true) {
        badges.push("`static`".to_string());
    }
    if record.chainable == Some(true) {
        badges.push("`chainable`".to_string());
    }
    if let Some(ref version) = record.version {
        badges.push(format!("`v{}`", version));
    }
    if let Some(ref since) = record.since {
        badges.push(format!("`since {}`", since));
    }

    if badges.is_empty() {
        return String::new();
    }
    format!("> {}", badges.join(" "))
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}
