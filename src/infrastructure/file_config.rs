use super::in_memory::InMemoryConfigReader;
use crate::domain::configuration::Configuration;
use crate::domain::ports::ConfigReader;
use crate::error::Result;
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// On-disk layout of the configuration file.
///
/// ```json
/// {
///   "default": { "publicKey": "s-pub-...", "privateKey": "s-priv-..." },
///   "salesChannels": { "b2b": { "publicKey": "...", "privateKey": "..." } }
/// }
/// ```
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    #[serde(default)]
    default: Option<Configuration>,
    #[serde(default)]
    sales_channels: HashMap<String, Configuration>,
}

/// Reads per-sales-channel configuration from a JSON file.
///
/// The file is parsed once on load; every `read` hands out a fresh copy.
#[derive(Debug, Clone)]
pub struct FileConfigReader {
    inner: InMemoryConfigReader,
}

impl FileConfigReader {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read(path)?;
        Self::from_slice(&content)
    }

    pub fn from_slice(content: &[u8]) -> Result<Self> {
        let file: ConfigFile = serde_json::from_slice(content)?;
        Ok(Self {
            inner: InMemoryConfigReader::new(file.default, file.sales_channels),
        })
    }

    pub fn configurations(&self) -> impl Iterator<Item = &Configuration> {
        self.inner.configurations()
    }
}

#[async_trait]
impl ConfigReader for FileConfigReader {
    async fn read(&self, sales_channel_id: &str) -> Result<Configuration> {
        self.inner.read(sales_channel_id).await
    }
}
