//! Where generated declarations go: files, a stream, or memory.

use std::collections::HashSet;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::{debug, info, warn};

use crate::error::EmitError;
use crate::settings::Settings;

/// Receives each declaration once, under its type name.
pub trait Sink {
    fn write(&mut self, name: &str, code: &str) -> Result<(), EmitError>;
}

impl<S: Sink + ?Sized> Sink for Box<S> {
    fn write(&mut self, name: &str, code: &str) -> Result<(), EmitError> {
        (**self).write(name, code)
    }
}

/// Names already handed to the sink during this session.
#[derive(Debug, Clone, Default)]
pub struct ProcessedTypes {
    names: HashSet<String>,
}

impl ProcessedTypes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `name`; returns `false` if it had already been recorded.
    pub fn mark(&mut self, name: &str) -> bool {
        if self.names.contains(name) {
            return false;
        }
        self.names.insert(name.to_string())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// External source formatter, run as a blocking child process.
#[derive(Debug, Clone)]
pub struct Formatter {
    program: String,
    args: Vec<String>,
}

impl Formatter {
    pub fn new(program: impl Into<String>, args: &[&str]) -> Self {
        Self {
            program: program.into(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }

    pub fn gofmt() -> Self {
        Self::new("gofmt", &["-s"])
    }

    fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn failure(&self, message: impl Into<String>) -> EmitError {
        EmitError::Formatter {
            command: self.command_line(),
            message: message.into(),
        }
    }

    /// Format `code` by piping it through the formatter.
    pub fn format_source(&self, code: &str) -> Result<String, EmitError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| self.failure(e.to_string()))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(code.as_bytes())
                .map_err(|e| self.failure(e.to_string()))?;
        }

        let output = child
            .wait_with_output()
            .map_err(|e| self.failure(e.to_string()))?;
        if !output.status.success() {
            return Err(self.failure(String::from_utf8_lossy(&output.stderr).trim().to_string()));
        }
        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }

    /// Rewrite the file at `path` in place.
    pub fn format_file(&self, path: &Path) -> Result<(), EmitError> {
        let output = Command::new(&self.program)
            .args(&self.args)
            .arg("-w")
            .arg(path)
            .output()
            .map_err(|e| self.failure(e.to_string()))?;
        if !output.status.success() {
            return Err(self.failure(String::from_utf8_lossy(&output.stderr).trim().to_string()));
        }
        Ok(())
    }
}

/// Writes `<dir>/<Name>.go` per declaration, each with a package clause and banner.
#[derive(Debug, Clone)]
pub struct FileSink {
    dir: PathBuf,
    package: String,
    overwrite: bool,
    invocation: String,
    formatter: Option<Formatter>,
}

impl FileSink {
    pub fn new(settings: &Settings) -> Result<Self, EmitError> {
        fs::create_dir_all(&settings.output_dir).map_err(|source| EmitError::Io {
            path: settings.output_dir.display().to_string(),
            source,
        })?;
        Ok(Self {
            dir: settings.output_dir.clone(),
            package: settings.package.clone(),
            overwrite: settings.overwrite,
            invocation: settings.invocation.clone(),
            formatter: settings.formatter(),
        })
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.go"))
    }

    fn preamble(&self) -> String {
        let rule = "/".repeat(73);
        format!(
            "package {package}\n\
             \n\
             {rule}\n\
             // Code generated by {tool} from JSON Schema.\n\
             // {url}\n\
             //\n\
             // Generated with command:\n\
             // {invocation}\n\
             {rule}\n\
             //{banner:^69}//\n\
             {rule}\n\
             \n",
            package = self.package,
            tool = env!("CARGO_PKG_NAME"),
            url = env!("CARGO_PKG_REPOSITORY"),
            invocation = self.invocation,
            banner = "DO NOT EDIT",
        )
    }
}

impl Sink for FileSink {
    fn write(&mut self, name: &str, code: &str) -> Result<(), EmitError> {
        let path = self.path_for(name);
        if !self.overwrite && path.exists() {
            warn!(path = %path.display(), "file already exists, skipping without overwrite");
            return Ok(());
        }

        let contents = format!("{}{code}", self.preamble());
        fs::write(&path, contents).map_err(|source| EmitError::Io {
            path: path.display().to_string(),
            source,
        })?;
        info!(path = %path.display(), "wrote declaration");

        if let Some(formatter) = &self.formatter {
            formatter.format_file(&path)?;
        }
        Ok(())
    }
}

/// Writes bare declarations, one after another, to any writer.
#[derive(Debug)]
pub struct StreamSink<W: Write> {
    writer: W,
    formatter: Option<Formatter>,
}

impl StreamSink<std::io::Stdout> {
    pub fn stdout(settings: &Settings) -> Self {
        Self::new(std::io::stdout(), settings.formatter())
    }
}

impl<W: Write> StreamSink<W> {
    pub fn new(writer: W, formatter: Option<Formatter>) -> Self {
        Self { writer, formatter }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Sink for StreamSink<W> {
    fn write(&mut self, name: &str, code: &str) -> Result<(), EmitError> {
        let code = match &self.formatter {
            Some(formatter) => formatter.format_source(code)?,
            None => code.to_string(),
        };
        self.writer
            .write_all(code.as_bytes())
            .and_then(|_| self.writer.flush())
            .map_err(|source| EmitError::Io {
                path: "<stream>".to_string(),
                source,
            })?;
        debug!(name, "streamed declaration");
        Ok(())
    }
}

/// Keeps declarations in emission order.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    declarations: Vec<(String, String)>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn declarations(&self) -> &[(String, String)] {
        &self.declarations
    }

    pub fn names(&self) -> Vec<&str> {
        self.declarations.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.declarations
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, code)| code.as_str())
    }
}

impl Sink for MemorySink {
    fn write(&mut self, name: &str, code: &str) -> Result<(), EmitError> {
        self.declarations.push((name.to_string(), code.to_string()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(dir: &Path) -> Settings {
        Settings {
            output_dir: dir.to_path_buf(),
            package: "shapes".to_string(),
            format: false,
            invocation: "schema-structs --pkg shapes shapes.json".to_string(),
            ..Settings::default()
        }
    }

    #[test]
    fn processed_types_mark_once() {
        let mut processed = ProcessedTypes::new();
        assert!(processed.is_empty());
        assert!(processed.mark("Tag"));
        assert!(!processed.mark("Tag"));
        assert!(processed.contains("Tag"));
        assert_eq!(processed.len(), 1);
    }

    #[test]
    fn file_sink_writes_package_and_banner() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("generated");
        let mut sink = FileSink::new(&settings(&out)).unwrap();

        sink.write("Tag", "type Tag struct {\n}\n\n").unwrap();

        let written = fs::read_to_string(out.join("Tag.go")).unwrap();
        assert!(written.starts_with("package shapes\n"));
        assert!(written.contains("// schema-structs --pkg shapes shapes.json\n"));
        assert!(written.contains("DO NOT EDIT"));
        assert!(written.ends_with("type Tag struct {\n}\n\n"));
    }

    #[test]
    fn file_sink_respects_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let existing = dir.path().join("Tag.go");
        fs::write(&existing, "hand written").unwrap();

        let mut keep = FileSink::new(&Settings {
            overwrite: false,
            ..settings(dir.path())
        })
        .unwrap();
        keep.write("Tag", "type Tag struct{}\n").unwrap();
        assert_eq!(fs::read_to_string(&existing).unwrap(), "hand written");

        let mut replace = FileSink::new(&settings(dir.path())).unwrap();
        replace.write("Tag", "type Tag struct{}\n").unwrap();
        assert!(fs::read_to_string(&existing).unwrap().ends_with("type Tag struct{}\n"));
    }

    #[test]
    fn stream_sink_writes_bare_code() {
        let mut sink = StreamSink::new(Vec::new(), None);
        sink.write("A", "type A []string\n\n").unwrap();
        sink.write("B", "type B map[string]*A\n\n").unwrap();
        let text = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(text, "type A []string\n\ntype B map[string]*A\n\n");
    }

    #[test]
    fn missing_formatter_is_an_emit_error() {
        let formatter = Formatter::new("definitely-not-a-formatter-binary", &[]);
        let err = formatter.format_source("package x\n").unwrap_err();
        assert!(matches!(err, EmitError::Formatter { .. }));
    }

    #[test]
    fn memory_sink_keeps_order() {
        let mut sink = MemorySink::new();
        sink.write("B", "b").unwrap();
        sink.write("A", "a").unwrap();
        assert_eq!(sink.names(), vec!["B", "A"]);
        assert_eq!(sink.get("A"), Some("a"));
        assert_eq!(sink.get("C"), None);
    }
}
