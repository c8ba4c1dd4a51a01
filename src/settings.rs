use std::path::PathBuf;

use crate::emit::Formatter;

/// Options for one generation run. `Default` mirrors the CLI defaults.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Directory receiving one `.go` file per declaration.
    pub output_dir: PathBuf,
    /// Go package name written at the top of every file.
    pub package: String,
    /// Replace files that already exist in `output_dir`.
    pub overwrite: bool,
    /// Stream declarations to standard output instead of writing files.
    pub stdout: bool,
    /// Pass generated code through `gofmt -s`.
    pub format: bool,
    /// Precede each declaration with a comment holding its source schema.
    pub comments: bool,
    /// Command line recorded in the header of generated files.
    pub invocation: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("tmp"),
            package: "model".to_string(),
            overwrite: true,
            stdout: false,
            format: true,
            comments: true,
            invocation: current_invocation(),
        }
    }
}

impl Settings {
    pub fn formatter(&self) -> Option<Formatter> {
        self.format.then(Formatter::gofmt)
    }
}

pub fn current_invocation() -> String {
    std::env::args().collect::<Vec<_>>().join(" ")
}
