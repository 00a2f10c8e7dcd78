//! Command implementations

use crate::emit::{JsonEmitter, ReportEmitter};
use anyhow::{Context, Result};
use protofold_core::{Driver, FileDescriptor, GeneratorConfig, RenderedFile};
use std::collections::HashSet;
use std::io::Write;
use std::path::{Path, PathBuf};

/// What an output command produces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    /// JSON analysis per file
    Analysis,
    /// Plain-text report per file
    Report,
}

impl OutputKind {
    fn driver(self, config: GeneratorConfig) -> Driver {
        match self {
            OutputKind::Analysis => Driver::new(config).with_emitter(JsonEmitter),
            OutputKind::Report => Driver::new(config).with_emitter(ReportEmitter),
        }
    }
}

/// Outcome of an output command
#[derive(Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Schema files that produced output
    pub succeeded: usize,
    /// Schema files that failed to analyze or emit
    pub failed: Vec<(String, String)>,
    /// Paths written when an output directory was given
    pub written: Vec<PathBuf>,
}

/// Read every input document; each may hold one file descriptor or an array.
pub fn load_schemas(inputs: &[PathBuf]) -> Result<Vec<FileDescriptor>> {
    let mut files = Vec::new();
    for input in inputs {
        let bytes = std::fs::read(input)
            .with_context(|| format!("Failed to read schema: {}", input.display()))?;
        let parsed = FileDescriptor::from_json_set(&bytes)
            .with_context(|| format!("Failed to parse schema: {}", input.display()))?;
        tracing::debug!(input = %input.display(), files = parsed.len(), "schema loaded");
        files.extend(parsed);
    }
    Ok(files)
}

/// Analyze `files` and write the chosen output.
///
/// With `output_dir` every generated file is written there; otherwise the
/// contents go to `stdout` in input order. A schema file that fails is
/// recorded in the summary and does not stop the others. A schema file whose
/// output would replace one written earlier in the same run fails as well.
pub fn run(
    kind: OutputKind,
    files: &[FileDescriptor],
    config: GeneratorConfig,
    output_dir: Option<&Path>,
    stdout: &mut dyn Write,
) -> Result<RunSummary> {
    let driver = kind.driver(config);
    let mut summary = RunSummary::default();

    if let Some(dir) = output_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;
    }

    let mut claimed = HashSet::new();
    for (file, result) in files.iter().zip(driver.run_all(files)) {
        let rendered = match result {
            Ok(rendered) => rendered,
            Err(err) => {
                tracing::error!(file = %file.name, error = %err, "schema file failed");
                summary.failed.push((file.name.clone(), err.to_string()));
                continue;
            }
        };

        match output_dir {
            Some(dir) => {
                if let Some(taken) = rendered.iter().find(|out| claimed.contains(&out.name)) {
                    let message = format!(
                        "output {} was already written by an earlier schema file",
                        dir.join(&taken.name).display()
                    );
                    tracing::error!(file = %file.name, error = %message, "schema file failed");
                    summary.failed.push((file.name.clone(), message));
                    continue;
                }
                for out in &rendered {
                    claimed.insert(out.name.clone());
                    summary.written.push(write_file(dir, out)?);
                }
            }
            None => {
                for out in &rendered {
                    stdout
                        .write_all(out.content.as_bytes())
                        .context("Failed to write output")?;
                }
            }
        }
        summary.succeeded += 1;
    }

    Ok(summary)
}

fn write_file(dir: &Path, file: &RenderedFile) -> Result<PathBuf> {
    let path = dir.join(&file.name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    std::fs::write(&path, &file.content)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), "wrote output");
    Ok(path)
}

/// Check command implementation
pub fn check(config_path: Option<&Path>, dir: &Path, stdout: &mut dyn Write) -> Result<()> {
    let (config, source) = crate::config::load(config_path, dir)?;

    match &source {
        Some(path) => writeln!(stdout, "Checking config: {}", path.display())?,
        None => writeln!(stdout, "No config file found, checking defaults")?,
    }
    writeln!(stdout, "  entity extension: {}", config.entity_extension_number)?;
    writeln!(stdout, "  entity selection: {:?}", config.entity_selection)?;
    writeln!(stdout, "  empty types: {}", config.empty_types.join(", "))?;
    writeln!(stdout, "  tie break: {:?}", config.tie_break)?;
    writeln!(stdout, "Config is valid")?;
    Ok(())
}
