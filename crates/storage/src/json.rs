use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use url::Url;

use crate::repository::{LoadError, QuestionRecord, QuestionSource};

/// Parse a JSON array of question records.
///
/// # Errors
///
/// Returns `LoadError::Malformed` if the bytes are not a JSON array of records.
pub fn parse_records(bytes: &[u8]) -> Result<Vec<QuestionRecord>, LoadError> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Question bank stored as a JSON file on disk.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl QuestionSource for JsonFileSource {
    async fn fetch(&self) -> Result<Vec<QuestionRecord>, LoadError> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|source| LoadError::Io {
                path: self.path.clone(),
                source,
            })?;
        debug!("[Source] Read {} bytes from {}", bytes.len(), self.path.display());
        parse_records(&bytes)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Question bank served over HTTP(S).
#[derive(Debug, Clone)]
pub struct HttpJsonSource {
    client: Client,
    url: Url,
}

impl HttpJsonSource {
    #[must_use]
    pub fn new(url: Url) -> Self {
        Self {
            client: Client::new(),
            url,
        }
    }
}

#[async_trait]
impl QuestionSource for HttpJsonSource {
    async fn fetch(&self) -> Result<Vec<QuestionRecord>, LoadError> {
        let response = self.client.get(self.url.clone()).send().await?;
        if !response.status().is_success() {
            return Err(LoadError::HttpStatus(response.status()));
        }
        let bytes = response.bytes().await?;
        debug!("[Source] Received {} bytes from {}", bytes.len(), self.url);
        parse_records(&bytes)
    }

    fn describe(&self) -> String {
        self.url.to_string()
    }
}

/// Pick a source for a location string.
///
/// `http://` and `https://` URLs are fetched over the network, `file://` URLs
/// and anything that does not parse as a URL are read as local paths.
#[must_use]
pub fn source_for_location(location: &str) -> Arc<dyn QuestionSource> {
    let trimmed = location.trim();
    match Url::parse(trimmed) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Arc::new(HttpJsonSource::new(url)),
        Ok(url) if url.scheme() == "file" => match url.to_file_path() {
            Ok(path) => Arc::new(JsonFileSource::new(path)),
            Err(()) => Arc::new(JsonFileSource::new(url.path())),
        },
        _ => Arc::new(JsonFileSource::new(trimmed)),
    }
}
