use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}

/// Settings shared by the front-ends. Every field has a default, so a
/// config file only needs the values it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// `id` of the element highlights are anchored to
    pub root_id: String,
    pub highlight_class: String,
    pub border_color: String,
    pub border_style: String,
    /// Where highlights are stored when no file is given on the command line
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlights_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root_id: "parent-container".to_string(),
            highlight_class: "notebook-highlight".to_string(),
            border_color: "#0B874B".to_string(),
            border_style: "solid".to_string(),
            highlights_path: None,
        }
    }
}

impl Config {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let mut config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        // Expand shell variables and tilde in the highlights path
        config.highlights_path = config
            .highlights_path
            .map(|path| Self::expand_path(&path).unwrap_or(path));

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    /// The stored config, or the defaults when there is none yet.
    pub fn load_or_default() -> Result<Self, ConfigError> {
        Ok(Self::load()?.unwrap_or_default())
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        self.save_to_path(&config_path)
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/webanchor");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    /// Highlights file for `page`: the configured store, or a JSON file
    /// next to the page.
    pub fn highlights_path_for(&self, page: &Path) -> PathBuf {
        match &self.highlights_path {
            Some(path) => path.clone(),
            None => page.with_extension("highlights.json"),
        }
    }

    fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::env;
    use tempfile::TempDir;

    #[test]
    fn test_config_path() {
        let config_path = Config::config_path();
        let path_str = config_path.to_string_lossy();

        // Should not contain tilde anymore
        assert!(!path_str.starts_with('~'));
        assert!(path_str.ends_with(".config/webanchor/config.toml"));
    }

    #[test]
    fn test_defaults_match_the_web_view() {
        let config = Config::default();
        assert_eq!(config.root_id, "parent-container");
        assert_eq!(config.highlight_class, "notebook-highlight");
        assert_eq!(config.border_color, "#0B874B");
        assert_eq!(config.border_style, "solid");
        assert_eq!(config.highlights_path, None);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let config: Config = toml::from_str(r##"border_color = "#FF8800""##).unwrap();
        assert_eq!(config.border_color, "#FF8800");
        assert_eq!(config.root_id, "parent-container");
    }

    #[test]
    fn test_expand_path_with_tilde() {
        let path = PathBuf::from("~/test/path");
        let expanded = Config::expand_path(&path).unwrap();
        assert!(!expanded.to_string_lossy().starts_with('~'));
        assert!(expanded.to_string_lossy().contains("test/path"));
    }

    #[test]
    fn test_expand_path_with_absolute_path() {
        let path = PathBuf::from("/absolute/path");
        assert_eq!(Config::expand_path(&path).unwrap(), path);
    }

    #[test]
    fn test_load_config_file_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let non_existent_config = temp_dir.path().join("nonexistent.toml");

        let result = Config::load_from_path(&non_existent_config).unwrap();

        assert!(result.is_none());
    }

    #[test]
    fn test_invalid_config_names_the_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(&config_file, "root_id = [").unwrap();

        let err = Config::load_from_path(&config_file).unwrap_err();

        assert!(matches!(err, ConfigError::ConfigParseError { .. }));
        assert!(err.to_string().contains("config.toml"));
    }

    #[test]
    fn test_save_and_load_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("nested").join("config.toml");
        let test_config = Config {
            root_id: "content".to_string(),
            highlights_path: Some(PathBuf::from("/tmp/highlights.json")),
            ..Config::default()
        };

        test_config.save_to_path(&config_file).unwrap();
        let loaded_config = Config::load_from_path(&config_file).unwrap().unwrap();

        assert_eq!(loaded_config, test_config);
    }

    #[test]
    fn test_highlights_path_with_env_var_in_toml() {
        unsafe {
            env::set_var("WEBANCHOR_TEST_STORE", "/custom/store");
        }
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(
            &config_file,
            r#"highlights_path = "$WEBANCHOR_TEST_STORE/highlights.json""#,
        )
        .unwrap();

        let config = Config::load_from_path(&config_file).unwrap().unwrap();

        assert_eq!(
            config.highlights_path,
            Some(PathBuf::from("/custom/store/highlights.json"))
        );
        unsafe {
            env::remove_var("WEBANCHOR_TEST_STORE");
        }
    }

    #[test]
    fn test_highlights_path_for_page() {
        let page = Path::new("/notes/cells.html");
        assert_eq!(
            Config::default().highlights_path_for(page),
            PathBuf::from("/notes/cells.highlights.json")
        );

        let config = Config {
            highlights_path: Some(PathBuf::from("/store.json")),
            ..Config::default()
        };
        assert_eq!(config.highlights_path_for(page), PathBuf::from("/store.json"));
    }
}
