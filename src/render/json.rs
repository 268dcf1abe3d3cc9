//! JSON renderer — the record list as-is, for tooling integration.

use crate::model::DescriptionRecord;
use crate::render::Renderer;
use anyhow::{Context, Result};

pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn render(&self, records: &[DescriptionRecord]) -> Result<String> {
        let mut out =
            serde_json::to_string_pretty(records).context("failed to serialize records")?;
        out.push('\n');
        Ok(out)
    }

    fn file_extension(&self) -> &str {
        "json"
    }
}
