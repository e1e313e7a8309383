//! Run output: diagnostics and findings.
//!
//! Two channels, kept separate end to end. Diagnostics are secondary
//! (lexer recovery, redefinition warnings, suspicious instantiations) and go
//! to stderr; findings are the primary result (unbound parameters) and go to
//! stdout. Both are collected as structured values so the binary can render
//! either the plain-text shapes or JSON.

use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// A non-fatal warning tied to a source location.
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostic {
    pub file: PathBuf,
    pub line: u32,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "warning: {}:{}: {}",
            self.file.display(),
            self.line,
            self.message
        )
    }
}

/// One unbound parameter in one instantiation.
#[derive(Debug, Clone, Serialize)]
pub struct Finding {
    pub file: PathBuf,
    pub line: u32,
    pub parameter: String,
    pub module: String,
    pub def_file: PathBuf,
    pub def_line: u32,
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}: parameter '{}' not assigned in instantiation of module '{}' (defined at {}:{})",
            self.file.display(),
            self.line,
            self.parameter,
            self.module,
            self.def_file.display(),
            self.def_line
        )
    }
}

/// Accumulated output of a full two-pass run, in emission order.
#[derive(Debug, Default)]
pub struct Report {
    diagnostics: Vec<Diagnostic>,
    findings: Vec<Finding>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warn(&mut self, file: &Path, line: u32, message: impl Into<String>) {
        self.diagnostics.push(Diagnostic {
            file: file.to_path_buf(),
            line,
            message: message.into(),
        });
    }

    pub fn finding(&mut self, finding: Finding) {
        self.findings.push(finding);
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_shape() {
        let d = Diagnostic {
            file: PathBuf::from("top.v"),
            line: 12,
            message: "failed to recognize token '\u{7f}'".to_string(),
        };
        assert_eq!(
            d.to_string(),
            "warning: top.v:12: failed to recognize token '\u{7f}'"
        );
    }

    #[test]
    fn test_finding_shape() {
        let f = Finding {
            file: PathBuf::from("top.v"),
            line: 4,
            parameter: "WIDTH".to_string(),
            module: "fifo".to_string(),
            def_file: PathBuf::from("fifo.v"),
            def_line: 1,
        };
        assert_eq!(
            f.to_string(),
            "top.v:4: parameter 'WIDTH' not assigned in instantiation of module 'fifo' (defined at fifo.v:1)"
        );
    }
}
