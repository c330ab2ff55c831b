use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use async_trait::async_trait;
use tracing::debug;

use crate::demo;
use crate::error::{DemoError, Result};

/// Source text compiled into the binary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbeddedSource {
    /// The example routine's own source file
    Examples,
    /// The demonstrated library
    Library,
}

impl EmbeddedSource {
    pub fn text(self) -> &'static str {
        match self {
            EmbeddedSource::Examples => demo::EXAMPLES_SOURCE,
            EmbeddedSource::Library => demo::LIBRARY_SOURCE,
        }
    }
}

/// Where a pass reads its source text from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceLocation {
    Url(String),
    Path(PathBuf),
    Embedded(EmbeddedSource),
}

impl FromStr for SourceLocation {
    type Err = DemoError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(DemoError::Config("empty source location".to_string()));
        }

        if let Some(name) = s.strip_prefix("embedded:") {
            return match name {
                "examples" => Ok(SourceLocation::Embedded(EmbeddedSource::Examples)),
                "library" => Ok(SourceLocation::Embedded(EmbeddedSource::Library)),
                other => Err(DemoError::Config(format!("Unknown embedded source: {}", other))),
            };
        }

        if s.starts_with("http://") || s.starts_with("https://") {
            Ok(SourceLocation::Url(s.to_string()))
        } else {
            Ok(SourceLocation::Path(PathBuf::from(s)))
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceLocation::Url(url) => write!(f, "{}", url),
            SourceLocation::Path(path) => write!(f, "{}", path.display()),
            SourceLocation::Embedded(EmbeddedSource::Examples) => write!(f, "embedded:examples"),
            SourceLocation::Embedded(EmbeddedSource::Library) => write!(f, "embedded:library"),
        }
    }
}

/// Resolves a source location to its raw text body
#[async_trait]
pub trait SourceFetcher: Send + Sync {
    async fn fetch(&self, location: &SourceLocation) -> Result<String>;
}

/// GET over HTTP, plain file reads, or embedded text
pub struct DefaultFetcher {
    client: reqwest::Client,
}

impl DefaultFetcher {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    async fn get(&self, url: &str) -> Result<String> {
        let fetch_error = |message: String| DemoError::Fetch {
            location: url.to_string(),
            message,
        };

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| fetch_error(e.to_string()))?;

        if !response.status().is_success() {
            return Err(fetch_error(format!("HTTP {}", response.status())));
        }

        response.text().await.map_err(|e| fetch_error(e.to_string()))
    }
}

impl Default for DefaultFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SourceFetcher for DefaultFetcher {
    async fn fetch(&self, location: &SourceLocation) -> Result<String> {
        debug!("Fetching {}", location);
        match location {
            SourceLocation::Url(url) => self.get(url).await,
            SourceLocation::Path(path) => tokio::fs::read_to_string(path)
                .await
                .map_err(|e| DemoError::Fetch {
                    location: path.display().to_string(),
                    message: e.to_string(),
                }),
            SourceLocation::Embedded(source) => Ok(source.text().to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_locations() {
        assert_eq!(
            "https://example.org/partials.js".parse::<SourceLocation>().unwrap(),
            SourceLocation::Url("https://example.org/partials.js".to_string())
        );
        assert_eq!(
            "src/demo/examples.rs".parse::<SourceLocation>().unwrap(),
            SourceLocation::Path(PathBuf::from("src/demo/examples.rs"))
        );
        assert_eq!(
            "embedded:library".parse::<SourceLocation>().unwrap(),
            SourceLocation::Embedded(EmbeddedSource::Library)
        );
    }

    #[test]
    fn test_unknown_embedded_source_is_rejected() {
        assert!(matches!(
            "embedded:nothing".parse::<SourceLocation>(),
            Err(DemoError::Config(_))
        ));
    }

    #[test]
    fn test_display_round_trips() {
        for text in ["embedded:examples", "https://example.org/a.js", "docs/lib.js"] {
            let location: SourceLocation = text.parse().unwrap();
            assert_eq!(location.to_string(), text);
        }
    }

    #[tokio::test]
    async fn test_fetch_file_and_embedded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lib.js");
        std::fs::write(&path, "var x = 1;").unwrap();

        let fetcher = DefaultFetcher::new();
        let text = fetcher.fetch(&SourceLocation::Path(path)).await.unwrap();
        assert_eq!(text, "var x = 1;");

        let embedded = fetcher
            .fetch(&SourceLocation::Embedded(EmbeddedSource::Examples))
            .await
            .unwrap();
        assert!(embedded.contains("pub fn examples"));
    }

    #[tokio::test]
    async fn test_missing_file_is_fetch_error() {
        let fetcher = DefaultFetcher::new();
        let result = fetcher
            .fetch(&SourceLocation::Path(PathBuf::from("/definitely/not/here.js")))
            .await;
        assert!(matches!(result, Err(DemoError::Fetch { .. })));
    }
}
