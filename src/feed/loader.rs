use futures::StreamExt;
use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use url::Url;

use crate::config::Config;
use crate::xml::{parse_document, Node, XmlError};

/// Errors that can occur while loading a document.
///
/// Covers both getting the bytes (file system or HTTP) and turning them
/// into a tree.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Local file could not be read
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// Network-level error (DNS, connection, TLS, etc.)
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// HTTP response with non-2xx status code
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    /// Fetch exceeded the configured timeout
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),
    /// Document exceeded the configured size limit
    #[error("Document too large (limit {limit} bytes)")]
    TooLarge { limit: usize },
    /// Document bytes are not UTF-8
    #[error("Document is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
    /// Document is not well-formed XML
    #[error("Malformed XML: {0}")]
    Xml(#[from] XmlError),
}

/// Where a document lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    Remote(Url),
    Local(PathBuf),
}

impl Location {
    /// Classifies `location` as an HTTP(S) URL or a local path.
    ///
    /// `file://` URLs are treated as local paths. Anything that does not
    /// parse as a URL with a known scheme is taken as a path verbatim.
    pub fn parse(location: &str) -> Self {
        match Url::parse(location) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => Location::Remote(url),
            Ok(url) if url.scheme() == "file" => match url.to_file_path() {
                Ok(path) => Location::Local(path),
                Err(()) => Location::Local(PathBuf::from(location)),
            },
            _ => Location::Local(PathBuf::from(location)),
        }
    }
}

/// Source of parsed documents.
///
/// The index renderer only depends on this trait, so tests can feed it
/// documents without touching the network.
pub trait DocumentLoader {
    fn load(&self, location: &str) -> impl Future<Output = Result<Node, LoadError>> + Send;
}

/// Loads documents from local files or over HTTP.
///
/// Every load is a single attempt: no retries, bounded by a timeout and a
/// size limit.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: reqwest::Client,
    timeout: Duration,
    max_bytes: usize,
}

impl Fetcher {
    pub fn new(config: &Config) -> Result<Self, LoadError> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self {
            client,
            timeout: Duration::from_secs(config.fetch_timeout_secs),
            max_bytes: usize::try_from(config.max_document_bytes).unwrap_or(usize::MAX),
        })
    }

    async fn read_local(&self, path: PathBuf) -> Result<Vec<u8>, LoadError> {
        let io_error = |source| LoadError::Io {
            path: path.display().to_string(),
            source,
        };

        let metadata = tokio::fs::metadata(&path).await.map_err(io_error)?;
        if metadata.len() > self.max_bytes as u64 {
            return Err(LoadError::TooLarge {
                limit: self.max_bytes,
            });
        }
        tokio::fs::read(&path).await.map_err(io_error)
    }

    async fn read_remote(&self, url: Url) -> Result<Vec<u8>, LoadError> {
        tokio::time::timeout(self.timeout, self.fetch(url))
            .await
            .map_err(|_| LoadError::Timeout(self.timeout))?
    }

    async fn fetch(&self, url: Url) -> Result<Vec<u8>, LoadError> {
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(LoadError::HttpStatus(response.status().as_u16()));
        }
        read_limited_bytes(response, self.max_bytes).await
    }
}

impl DocumentLoader for Fetcher {
    async fn load(&self, location: &str) -> Result<Node, LoadError> {
        let bytes = match Location::parse(location) {
            Location::Remote(url) => {
                tracing::debug!(url = %url, "Fetching document");
                self.read_remote(url).await?
            }
            Location::Local(path) => {
                tracing::debug!(path = %path.display(), "Reading document");
                self.read_local(path).await?
            }
        };

        let content = String::from_utf8(bytes)?;
        Ok(parse_document(&content)?)
    }
}

async fn read_limited_bytes(
    response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, LoadError> {
    // Fast path: check Content-Length header
    if let Some(len) = response.content_length() {
        if len > limit as u64 {
            return Err(LoadError::TooLarge { limit });
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(LoadError::TooLarge { limit });
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::XmlNode;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const VALID_RSS: &str = r#"<?xml version="1.0"?>
<rss version="2.0"><channel>
    <title>Test</title><link>https://example.com</link><description>d</description>
    <item><title>Test</title></item>
</channel></rss>"#;

    fn fetcher() -> Fetcher {
        Fetcher::new(&Config::default()).unwrap()
    }

    #[test]
    fn test_location_parse() {
        assert!(matches!(
            Location::parse("https://example.com/feed.xml"),
            Location::Remote(_)
        ));
        assert!(matches!(
            Location::parse("http://example.com/rss"),
            Location::Remote(_)
        ));
        assert_eq!(
            Location::parse("feeds/index.xml"),
            Location::Local(PathBuf::from("feeds/index.xml"))
        );
        assert_eq!(
            Location::parse("/tmp/index.xml"),
            Location::Local(PathBuf::from("/tmp/index.xml"))
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_file_url_is_local() {
        assert_eq!(
            Location::parse("file:///tmp/feed.xml"),
            Location::Local(PathBuf::from("/tmp/feed.xml"))
        );
    }

    #[tokio::test]
    async fn test_load_remote_success() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/feed"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(VALID_RSS)
                    .insert_header("Content-Type", "application/xml"),
            )
            .mount(&mock_server)
            .await;

        let doc = fetcher()
            .load(&format!("{}/feed", mock_server.uri()))
            .await
            .unwrap();
        assert_eq!(doc.label(), "rss");
    }

    #[tokio::test]
    async fn test_load_remote_404() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1) // No retries
            .mount(&mock_server)
            .await;

        let result = fetcher().load(&format!("{}/feed", mock_server.uri())).await;
        match result {
            Err(LoadError::HttpStatus(404)) => {}
            other => panic!("Expected HttpStatus(404), got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_load_remote_too_large() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("x".repeat(2048)))
            .mount(&mock_server)
            .await;

        let config = Config {
            max_document_bytes: 1024,
            ..Config::default()
        };
        let result = Fetcher::new(&config)
            .unwrap()
            .load(&format!("{}/feed", mock_server.uri()))
            .await;
        assert!(matches!(result, Err(LoadError::TooLarge { limit: 1024 })));
    }

    #[tokio::test]
    async fn test_load_remote_timeout() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(VALID_RSS)
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&mock_server)
            .await;

        let config = Config {
            fetch_timeout_secs: 1,
            ..Config::default()
        };
        let result = Fetcher::new(&config)
            .unwrap()
            .load(&format!("{}/feed", mock_server.uri()))
            .await;
        assert!(matches!(result, Err(LoadError::Timeout(_))));
    }

    #[tokio::test]
    async fn test_load_remote_malformed_xml() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<rss><channel></rss>"))
            .mount(&mock_server)
            .await;

        let result = fetcher().load(&format!("{}/feed", mock_server.uri())).await;
        assert!(matches!(result, Err(LoadError::Xml(_))));
    }

    #[tokio::test]
    async fn test_load_local_file() {
        let dir = std::env::temp_dir().join("rss_aggregator_loader_test_local");
        std::fs::create_dir_all(&dir).unwrap();
        let file = dir.join("feed.xml");
        std::fs::write(&file, VALID_RSS).unwrap();

        let doc = fetcher().load(file.to_str().unwrap()).await.unwrap();
        assert_eq!(doc.label(), "rss");

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_load_missing_local_file() {
        let result = fetcher()
            .load("/tmp/rss_aggregator_test_definitely_missing.xml")
            .await;
        assert!(matches!(result, Err(LoadError::Io { .. })));
    }
}
