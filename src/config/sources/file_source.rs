//! Generic async file-based config source.
//!
//! [`FileSource`] handles any file format by accepting a deserialization
//! function at construction time. It reads the file asynchronously via
//! Tokio; validation happens later, once CLI overrides have been layered
//! on top.

use std::path::{Path, PathBuf};

use crate::config::model::Config;
use crate::error::PokeProxyError;

type Deserialize = fn(&str) -> Result<Config, Box<dyn std::error::Error + Send + Sync>>;

pub struct FileSource {
    path: PathBuf,
    name: &'static str,
    deserialize: Deserialize,
}

impl FileSource {
    #[must_use]
    pub fn new(path: PathBuf, name: &'static str, deserialize: Deserialize) -> Self {
        Self {
            path,
            name,
            deserialize,
        }
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_content(&self) -> Result<String, PokeProxyError> {
        tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                PokeProxyError::ConfigFileNotFound {
                    path: self.path.clone(),
                }
            } else {
                PokeProxyError::Io(e)
            }
        })
    }

    pub async fn load(&self) -> Result<Config, PokeProxyError> {
        let content = self.read_content().await?;

        (self.deserialize)(&content).map_err(|e| PokeProxyError::ConfigParse {
            path: self.path.display().to_string(),
            source: e,
        })
    }
}
