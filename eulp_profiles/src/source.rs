use crate::config::DatasetConfig;
use crate::error::Result;
use reqwest::blocking::Client;
use std::collections::HashMap;
use std::time::Duration;

/// Status and body of one object request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteFile {
    pub status: u16,
    pub body: Vec<u8>,
}

impl RemoteFile {
    pub fn new(status: u16, body: Vec<u8>) -> Self {
        Self { status, body }
    }

    /// Only a plain 200 counts as a hit.
    pub fn is_success(&self) -> bool {
        self.status == 200
    }
}

/// Anything that can answer a GET for a data lake URL.
pub trait FileSource {
    fn get(&self, url: &str) -> Result<RemoteFile>;
}

/// Public HTTPS access to the data lake bucket.
pub struct HttpSource {
    client: Client,
}

impl HttpSource {
    pub fn new(dataset: &DatasetConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(dataset.timeout_secs.map(Duration::from_secs))
            .build()?;
        Ok(Self { client })
    }
}

impl FileSource for HttpSource {
    fn get(&self, url: &str) -> Result<RemoteFile> {
        log::debug!("GET {}", url);
        let response = self.client.get(url).send()?;
        let status = response.status().as_u16();
        let body = response.bytes()?.to_vec();
        Ok(RemoteFile::new(status, body))
    }
}

/// In-memory object store keyed by URL; unknown URLs answer 404.
#[derive(Debug, Default, Clone)]
pub struct MemorySource {
    files: HashMap<String, Vec<u8>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, url: impl Into<String>, body: impl Into<Vec<u8>>) {
        self.files.insert(url.into(), body.into());
    }

    pub fn with_file(mut self, url: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        self.insert(url, body);
        self
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl FileSource for MemorySource {
    fn get(&self, url: &str) -> Result<RemoteFile> {
        Ok(match self.files.get(url) {
            Some(body) => RemoteFile::new(200, body.clone()),
            None => RemoteFile::new(404, Vec::new()),
        })
    }
}
