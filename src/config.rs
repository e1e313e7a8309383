use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Optional `vparcheck.toml` with project-wide defaults. CLI flags win over
/// anything set here.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct VparcheckConfig {
    /// Regex patterns; matching paths are skipped.
    pub exclude: Option<Vec<String>>,
    /// Glob patterns; matching paths are skipped.
    pub exclude_glob: Option<Vec<String>>,
    pub aggressive: Option<bool>,
    pub verbose: Option<bool>,
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("vparcheck.toml")
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Option<VparcheckConfig>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: VparcheckConfig = toml::from_str(&contents)?;
    Ok(Some(config))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_missing_config_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vparcheck.toml");
        assert!(load_config(Some(&path)).unwrap().is_none());
    }

    #[test]
    fn test_load_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vparcheck.toml");
        std::fs::write(&path, "exclude = [\"_tb\\\\.v$\"]\naggressive = true\n").unwrap();
        let config = load_config(Some(&path)).unwrap().unwrap();
        assert_eq!(config.exclude.unwrap(), vec!["_tb\\.v$".to_string()]);
        assert_eq!(config.aggressive, Some(true));
        assert_eq!(config.verbose, None);
    }
}
