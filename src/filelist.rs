//! Input selection: positional paths, `-f` list files, directory walking,
//! and exclusion patterns.
//!
//! The resulting file order is deterministic: inputs in the order given,
//! directory contents sorted, duplicates dropped on first occurrence. Order
//! matters downstream, it decides which definition of a twice-defined module
//! counts as "previous".

use crate::{Error, Result};
use glob::Pattern;
use regex::Regex;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Extensions treated as HDL source when walking a directory.
const HDL_EXTENSIONS: &[&str] = &["v", "sv", "vh", "svh"];

/// Compiled exclusion patterns; a path matching any of them is skipped.
#[derive(Debug, Default)]
pub struct FileSelector {
    regexes: Vec<Regex>,
    globs: Vec<Pattern>,
}

impl FileSelector {
    pub fn new(exclude_regexes: &[String], exclude_globs: &[String]) -> Result<Self> {
        let mut regexes = Vec::new();
        for pattern in exclude_regexes {
            regexes.push(Regex::new(pattern).map_err(|e| Error::Pattern {
                pattern: pattern.clone(),
                reason: e.to_string(),
            })?);
        }
        let mut globs = Vec::new();
        for pattern in exclude_globs {
            globs.push(Pattern::new(pattern).map_err(|e| Error::Pattern {
                pattern: pattern.clone(),
                reason: e.to_string(),
            })?);
        }
        Ok(Self { regexes, globs })
    }

    pub fn is_excluded(&self, path: &Path) -> bool {
        let text = path.to_string_lossy();
        self.regexes.iter().any(|r| r.is_match(&text))
            || self.globs.iter().any(|g| g.matches_path(path))
    }
}

/// Resolve the full ordered input set.
pub fn expand_inputs(
    paths: &[PathBuf],
    filelists: &[PathBuf],
    selector: &FileSelector,
) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let mut seen = HashSet::new();

    let mut push = |path: PathBuf, files: &mut Vec<PathBuf>| {
        if !selector.is_excluded(&path) && seen.insert(path.clone()) {
            files.push(path);
        }
    };

    for path in paths {
        if path.is_dir() {
            for file in walk_dir(path)? {
                push(file, &mut files);
            }
        } else {
            push(path.clone(), &mut files);
        }
    }

    for list in filelists {
        for file in read_filelist(list)? {
            push(file, &mut files);
        }
    }

    Ok(files)
}

/// One path per line; blank lines and `#` or `//` comment lines skipped.
fn read_filelist(path: &Path) -> Result<Vec<PathBuf>> {
    let contents = std::fs::read_to_string(path).map_err(|source| Error::Filelist {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#') && !line.starts_with("//"))
        .map(PathBuf::from)
        .collect())
}

/// Gitignore-aware recursive walk, keeping HDL sources, sorted for
/// determinism.
fn walk_dir(root: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in ignore::WalkBuilder::new(root).build() {
        let entry = entry?;
        let path = entry.path();
        if !entry.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }
        let is_hdl = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| HDL_EXTENSIONS.contains(&e));
        if is_hdl {
            files.push(path.to_path_buf());
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_selector_regex_and_glob() {
        let selector = FileSelector::new(
            &["_tb\\.v$".to_string()],
            &["**/legacy/*".to_string()],
        )
        .unwrap();
        assert!(selector.is_excluded(Path::new("rtl/fifo_tb.v")));
        assert!(selector.is_excluded(Path::new("rtl/legacy/old.v")));
        assert!(!selector.is_excluded(Path::new("rtl/fifo.v")));
    }

    #[test]
    fn test_bad_pattern_is_an_error() {
        assert!(FileSelector::new(&["(".to_string()], &[]).is_err());
    }

    #[test]
    fn test_filelist_parsing_and_dedup() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.v");
        let b = dir.path().join("b.v");
        fs::write(&a, "").unwrap();
        fs::write(&b, "").unwrap();
        let list = dir.path().join("sources.f");
        fs::write(
            &list,
            format!(
                "# comment\n{}\n\n// another comment\n{}\n{}\n",
                a.display(),
                b.display(),
                a.display()
            ),
        )
        .unwrap();

        let selector = FileSelector::default();
        let files = expand_inputs(&[], &[list], &selector).unwrap();
        assert_eq!(files, vec![a, b]);
    }

    #[test]
    fn test_directory_walk_keeps_hdl_sorted() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("z.v"), "").unwrap();
        fs::write(dir.path().join("a.sv"), "").unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();

        let selector = FileSelector::default();
        let files = expand_inputs(&[dir.path().to_path_buf()], &[], &selector).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, vec!["a.sv", "z.v"]);
    }
}
