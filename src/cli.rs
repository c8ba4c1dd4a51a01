//! Minimal CLI: schema files → Go declarations (files or stdout)
use std::ffi::OsString;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{ArgAction, CommandFactory, Parser};
use tracing::info;

use crate::emit::{FileSink, Sink, StreamSink};
use crate::processor::Processor;
use crate::settings::{Settings, current_invocation};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// generate Go type declarations from JSON Schema documents
#[derive(Parser, Debug)]
#[command(name = "schema-structs", version)]
pub struct CommandLineInterface {
    /// output directory for generated Go files
    #[arg(long, default_value = "tmp")]
    dir: PathBuf,

    /// package name written into generated Go files
    #[arg(long, default_value = "model")]
    pkg: String,

    /// replace Go files that already exist
    #[arg(long, default_value_t = true, action = ArgAction::Set, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    overwrite: bool,

    /// print Go code to stdout rather than writing files
    #[arg(long, default_value_t = false, action = ArgAction::Set, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    stdout: bool,

    /// pass generated code through gofmt
    #[arg(long, default_value_t = true, action = ArgAction::Set, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    fmt: bool,

    /// precede each declaration with a comment holding its schema
    #[arg(long, default_value_t = true, action = ArgAction::Set, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    comments: bool,

    /// One or more schema files. May be literal paths or quoted glob patterns
    patterns: Vec<String>,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl CommandLineInterface {
    /// Parse the process arguments. `-dir` and `-fmt=false` are accepted
    /// alongside their `--` forms. Usage errors exit with status 1.
    pub fn load() -> Self {
        match Self::try_parse_from(long_flags(std::env::args_os())) {
            Ok(cli) => cli,
            Err(error) => {
                let _ = error.print();
                std::process::exit(exit_code(&error));
            }
        }
    }

    pub fn has_inputs(&self) -> bool {
        !self.patterns.is_empty()
    }

    pub fn usage() -> String {
        Self::command().render_help().to_string()
    }

    pub fn settings(&self) -> Settings {
        Settings {
            output_dir: self.dir.clone(),
            package: self.pkg.clone(),
            overwrite: self.overwrite,
            stdout: self.stdout,
            format: self.fmt,
            comments: self.comments,
            invocation: current_invocation(),
        }
    }

    pub fn run(&self) -> Result<()> {
        let settings = self.settings();
        let paths = resolve_file_path_patterns(&self.patterns)?;
        if settings.stdout {
            generate(StreamSink::stdout(&settings), &settings, &paths)
        } else {
            let sink = FileSink::new(&settings).context("failed to prepare output directory")?;
            generate(sink, &settings, &paths)
        }
    }
}

fn generate<S: Sink>(sink: S, settings: &Settings, paths: &[PathBuf]) -> Result<()> {
    let mut processor = Processor::new(sink, settings.comments);
    processor
        .load_files(paths)
        .context("failed to load schema files")?;
    processor.process().context("failed to generate types")?;
    info!(
        documents = processor.documents().len(),
        declarations = processor.processed().len(),
        "generation finished"
    );
    Ok(())
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

/// Rewrite single-dash long flags (`-dir`) into clap's `--dir` form. Stops at `--`.
fn long_flags<I: IntoIterator<Item = OsString>>(args: I) -> Vec<OsString> {
    let mut positional_only = false;
    args.into_iter()
        .map(|arg| {
            if positional_only {
                return arg;
            }
            match arg.to_str() {
                Some("--") => {
                    positional_only = true;
                    arg
                }
                Some(flag) if flag.len() > 2 && flag.starts_with('-') && !flag.starts_with("--") => {
                    format!("-{flag}").into()
                }
                _ => arg,
            }
        })
        .collect()
}

/// Help and version requests succeed; every other parse failure is a usage error.
fn exit_code(error: &clap::Error) -> i32 {
    if error.use_stderr() { 1 } else { 0 }
}

fn resolve_file_path_patterns<I>(patterns: I) -> Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        // Minimal glob detection for the `glob` crate syntax.
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{' ))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if has_glob_chars(pattern) {
            let mut matched_any = false;
            for entry in glob::glob(pattern).with_context(|| format!("invalid glob pattern: {pattern}"))? {
                out.push(entry?);
                matched_any = true;
            }
            if !matched_any {
                bail!("glob pattern matched no files: {pattern}");
            }
        } else {
            out.push(PathBuf::from(pattern));
        }
    }

    Ok(out)
}
