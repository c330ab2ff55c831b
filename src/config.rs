use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{DemoError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Where the two passes read their source text from
    pub sources: SourcesConfig,

    /// Example pass settings
    pub examples: ExamplesConfig,

    /// Page output settings
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcesConfig {
    /// Source holding the example routine. An http(s) URL, a file path,
    /// or `embedded:examples`
    pub examples: String,

    /// Library source scanned for documentation comments
    pub library: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamplesConfig {
    /// Regex matching the line that opens the example routine
    pub routine_marker: String,

    /// Literal token opening each trace call
    pub trace_marker: String,

    /// Literal token closing each trace call
    pub call_close: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Where `render` writes the page
    pub path: PathBuf,

    /// Page title
    pub title: String,

    /// Custom page template (tera). The built-in template is used when unset
    pub template: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sources: SourcesConfig {
                examples: "embedded:examples".to_string(),
                library: "embedded:library".to_string(),
            },
            examples: ExamplesConfig {
                routine_marker: r"fn examples\b".to_string(),
                trace_marker: "trace!(t, ".to_string(),
                call_close: ");".to_string(),
            },
            output: OutputConfig {
                path: PathBuf::from("partials-demo.html"),
                title: "Functional partials: examples and API".to_string(),
                template: None,
            },
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| DemoError::Config(e.to_string()))?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| DemoError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load configuration with fallback to default
    pub fn load_or_default<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        match path {
            Some(p) => {
                if p.as_ref().exists() {
                    Self::load(p)
                } else {
                    Ok(Self::default())
                }
            }
            None => {
                let candidates = [
                    "partials-demo.toml",
                    "PartialsDemo.toml",
                    ".partials-demo.toml",
                ];

                for candidate in &candidates {
                    if Path::new(candidate).exists() {
                        return Self::load(candidate);
                    }
                }

                Ok(Self::default())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partials-demo.toml");

        let mut config = Config::default();
        config.sources.library = "https://example.org/functional.js".to_string();
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.sources.library, "https://example.org/functional.js");
        assert_eq!(loaded.examples.trace_marker, "trace!(t, ");
        assert!(loaded.output.template.is_none());
    }

    #[test]
    fn test_missing_explicit_path_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_default(Some(dir.path().join("absent.toml"))).unwrap();
        assert_eq!(config.sources.examples, "embedded:examples");
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "sources = 3").unwrap();

        match Config::load(&path) {
            Err(DemoError::Config(_)) => {}
            other => panic!("expected config error, got {:?}", other),
        }
    }
}
