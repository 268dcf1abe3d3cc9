//! Renderer module — trait-based format dispatch.

pub mod docgen;
pub mod json;
pub mod markdown;
pub mod toc;

use crate::model::DescriptionRecord;
use anyhow::{anyhow, Result};

/// Trait for rendering extracted records into a specific output format.
pub trait Renderer {
    fn render(&self, records: &[DescriptionRecord]) -> Result<String>;
    fn file_extension(&self) -> &str;
}

/// Create a renderer for the given format name.
pub fn create_renderer(format: &str) -> Result<Box<dyn Renderer>> {
    match format {
        "json" => Ok(Box::new(json::JsonRenderer)),
        "markdown" | "md" => Ok(Box::new(markdown::MarkdownRenderer)),
        "docgen" | "js" => Ok(Box::new(docgen::DocgenRenderer)),
        _ => Err(anyhow!(
            "unknown format: {}. Use json, markdown, or docgen",
            format
        )),
    }
}
