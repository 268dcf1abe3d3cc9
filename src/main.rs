//! jsdoc-extract — pull JSDoc descriptions out of JavaScript source files.
//!
//! Supports two modes:
//!
//! - **stdin mode**: `jsdoc-extract < file.js`
//! - **file mode**: `jsdoc-extract -f markdown -o docs src/*.js`

use anyhow::{Context, Result};
use clap::Parser;
use jsdoc_extract::{extract, render, DescriptionRecord};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "jsdoc-extract",
    about = "Extract structured documentation from JSDoc-annotated JavaScript"
)]
struct Cli {
    /// Input files (glob patterns and directories supported). If omitted, reads from stdin.
    files: Vec<String>,

    /// Output directory (required when files are given)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Output format: json (default), markdown, docgen
    #[arg(short = 'f', long, default_value = "json")]
    format: String,

    /// Drop records marked with @ignore
    #[arg(long)]
    hide_ignored: bool,

    /// Filter records by kind or access. Prefix with ! to exclude.
    /// Can be specified multiple times. E.g. --filter function --filter '!private'
    #[arg(long)]
    filter: Vec<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing()?;

    if cli.files.is_empty() {
        return stdin_mode(&cli);
    }

    file_mode(&cli)
}

/// Log to stderr; `RUST_LOG` overrides the default `warn` level.
fn init_tracing() -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))
}

/// stdin mode: read source from stdin, write rendered output to stdout.
fn stdin_mode(cli: &Cli) -> Result<()> {
    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .context("failed to read stdin")?;

    let mut records = extract(&input);
    filter_records(&mut records, cli.hide_ignored, &cli.filter);
    let renderer = render::create_renderer(&cli.format)?;
    print!("{}", renderer.render(&records)?);
    Ok(())
}

/// file mode: one rendered file per input, written into the output directory.
fn file_mode(cli: &Cli) -> Result<()> {
    let output_dir = cli
        .output
        .as_deref()
        .context("--output is required when files are given")?;

    let renderer = render::create_renderer(&cli.format)?;
    let ext = renderer.file_extension();

    fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create output directory: {}", output_dir.display()))?;

    let input_files = expand_globs(&cli.files)?;

    for path in &input_files {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!("skipping {}: {}", path.display(), e);
                continue;
            }
        };

        let mut records = extract(&content);
        filter_records(&mut records, cli.hide_ignored, &cli.filter);
        if records.is_empty() {
            tracing::debug!(path = %path.display(), "no documented code, skipping");
            continue;
        }

        let name = derive_output_name(path);
        let out_path = output_dir.join(format!("{}.{}", name, ext));
        let output = renderer
            .render(&records)
            .with_context(|| format!("failed to render {}", path.display()))?;

        fs::write(&out_path, &output)
            .with_context(|| format!("failed to write {}", out_path.display()))?;
        tracing::info!(
            input = %path.display(),
            output = %out_path.display(),
            records = records.len(),
            "wrote"
        );
    }

    Ok(())
}

/// File extensions recognized as JavaScript sources.
const SUPPORTED_EXTENSIONS: &[&str] = &["js", "mjs", "cjs", "jsx", "ts"];

/// Expand glob patterns into a list of real file paths.
/// Also handles bare directory paths by scanning for supported file types.
fn expand_globs(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for pattern in patterns {
        let path = Path::new(pattern);
        if path.is_file() {
            files.push(path.to_path_buf());
            continue;
        }
        // non-recursive
        if path.is_dir() {
            let entries = fs::read_dir(path)
                .with_context(|| format!("failed to read directory: {}", path.display()))?;
            for entry in entries.flatten() {
                let p = entry.path();
                if p.is_file() && has_supported_extension(&p) {
                    files.push(p);
                }
            }
            continue;
        }
        let matches: Vec<_> = glob::glob(pattern)
            .with_context(|| format!("invalid glob pattern: {}", pattern))?
            .filter_map(|r| r.ok())
            .filter(|p| p.is_file())
            .collect();
        if matches.is_empty() {
            tracing::warn!("no files matched: {}", pattern);
        }
        files.extend(matches);
    }
    // Sort for deterministic output
    files.sort();
    files.dedup();
    Ok(files)
}

fn has_supported_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext))
}

/// Derive the output file name (without extension) from a source path.
/// "src/utils/bytesToText.js" → "bytesToText", "lib/index.d.ts" → "index.d"
fn derive_output_name(source: &Path) -> String {
    let filename = source
        .file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_default();
    if has_supported_extension(source) {
        if let Some(stem) = source.file_stem() {
            return stem.to_string_lossy().into_owned();
        }
    }
    filename
}

/// Apply `--hide-ignored` and `--filter`.
///
/// A record's tags are its kind and its access. Every inclusion filter must
/// match one of them; any matching `!tag` filter drops the record.
fn filter_records(records: &mut Vec<DescriptionRecord>, hide_ignored: bool, filters: &[String]) {
    records.retain(|record| {
        if hide_ignored && record.ignore {
            return false;
        }

        let tags = [record.kind.map(|k| k.as_str()), Some(record.access.as_str())];
        let has_tag = |wanted: &str| tags.iter().flatten().any(|t| *t == wanted);

        filters.iter().all(|filter| match filter.strip_prefix('!') {
            Some(excluded) => !has_tag(excluded),
            None => has_tag(filter.as_str()),
        })
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_name_from_js() {
        assert_eq!(derive_output_name(Path::new("src/bytesToText.js")), "bytesToText");
        assert_eq!(derive_output_name(Path::new("random.mjs")), "random");
    }

    #[test]
    fn output_name_from_ts() {
        assert_eq!(derive_output_name(Path::new("lib/index.d.ts")), "index.d");
    }

    #[test]
    fn output_name_no_extension() {
        assert_eq!(derive_output_name(Path::new("Makefile")), "Makefile");
        assert_eq!(derive_output_name(Path::new("notes.txt")), "notes.txt");
    }

    fn sample() -> Vec<DescriptionRecord> {
        extract(
            "/**\n * A\n */\nfunction a() {}\n\
             /**\n * @ignore\n */\nfunction _b() {}\n\
             /**\n * C\n */\nclass C {\n",
        )
    }

    fn names(records: &[DescriptionRecord]) -> Vec<&str> {
        records.iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn no_filters_keeps_everything() {
        let mut records = sample();
        filter_records(&mut records, false, &[]);
        assert_eq!(names(&records), vec!["a", "_b", "C"]);
    }

    #[test]
    fn hide_ignored() {
        let mut records = sample();
        filter_records(&mut records, true, &[]);
        assert_eq!(names(&records), vec!["a", "C"]);
    }

    #[test]
    fn include_and_exclude_filters() {
        let mut records = sample();
        filter_records(&mut records, false, &["function".to_string()]);
        assert_eq!(names(&records), vec!["a", "_b"]);

        let mut records = sample();
        filter_records(&mut records, false, &["!private".to_string()]);
        assert_eq!(names(&records), vec!["a", "C"]);

        let mut records = sample();
        filter_records(
            &mut records,
            false,
            &["function".to_string(), "!private".to_string()],
        );
        assert_eq!(names(&records), vec!["a"]);
    }
}
