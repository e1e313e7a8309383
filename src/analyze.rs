//! Two-pass driver: definitions for every file, then instantiations for
//! every file against the frozen registry. File order is the caller's and is
//! significant (reconciliation order, "previously defined at" sites).

use crate::checker::BindingChecker;
use crate::registry::ModuleRegistry;
use crate::report::Report;
use crate::{Error, Result};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, Default)]
pub struct AnalyzeOptions {
    /// Check every identifier that names a known module, ignoring the
    /// statement-context gate.
    pub aggressive: bool,
    /// Suppress the too-many-parameters and unknown-parameter warnings.
    pub verbose: bool,
}

/// Run the full analysis over `files` in order. An unreadable file is a hard
/// error; everything the passes themselves notice ends up in the report.
pub fn analyze(files: &[PathBuf], options: AnalyzeOptions) -> Result<Report> {
    let mut report = Report::new();
    let mut registry = ModuleRegistry::new();

    for file in files {
        let text = read_source(file)?;
        tracing::debug!(file = %file.display(), "pass 1: scanning definitions");
        registry.find_defs(file, &text, &mut report);
    }
    tracing::debug!(modules = registry.len(), "registry complete");

    let checker = BindingChecker::new(&registry, options.aggressive, options.verbose);
    for file in files {
        let text = read_source(file)?;
        tracing::debug!(file = %file.display(), "pass 2: checking instantiations");
        checker.check_insts(file, &text, &mut report);
    }

    Ok(report)
}

fn read_source(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })
}
