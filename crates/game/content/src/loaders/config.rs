//! Game configuration loader.

use std::path::Path;

use game_core::GameConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for game configuration from TOML files.
///
/// Keys missing from the file keep their [`GameConfig::default`] values.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    pub fn load(path: &Path) -> LoadResult<GameConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<GameConfig> {
        toml::from_str(content).map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let config = ConfigLoader::parse("gather_target = 3\nmax_artisans = 2\n").unwrap();

        assert_eq!(config.gather_target, 3);
        assert_eq!(config.max_artisans, 2);
        assert_eq!(
            config.task_update_interval,
            GameConfig::DEFAULT_TASK_UPDATE_INTERVAL
        );
    }

    #[test]
    fn load_reads_file_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "explorer_target = 7").unwrap();

        let config = ConfigLoader::load(file.path()).unwrap();
        assert_eq!(config.explorer_target, 7);
    }

    #[test]
    fn load_reports_missing_file() {
        let error = ConfigLoader::load(Path::new("/nonexistent/config.toml")).unwrap_err();
        assert!(error.to_string().contains("Failed to read file"));
    }
}
