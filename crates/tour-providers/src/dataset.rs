//! Municipality dataset loaders (HTTP and local file).

use crate::client::HttpSettings;
use async_trait::async_trait;
use reqwest::Client;
use std::path::PathBuf;
use tour_core::error::Result;
use tour_core::{parse_dataset, Municipality, MunicipalityDatasetLoader, PlannerError};

pub const DEFAULT_DATASET_URL: &str = "https://raw.githubusercontent.com/yzkn/Gemini-JS-DriveRouteSuggestion/refs/heads/main/master/municipalities.json";

pub struct HttpDatasetLoader {
    client: Client,
    url: String,
}

impl HttpDatasetLoader {
    pub fn new(url: impl Into<String>, settings: &HttpSettings) -> anyhow::Result<Self> {
        Ok(Self {
            client: settings.build_client()?,
            url: url.into(),
        })
    }
}

#[async_trait]
impl MunicipalityDatasetLoader for HttpDatasetLoader {
    async fn load(&self) -> Result<Vec<Municipality>> {
        tracing::info!("Fetching municipality dataset from {}", self.url);
        let text = self
            .client
            .get(&self.url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| PlannerError::DatasetUnavailable(format!("{}: {}", self.url, e)))?
            .text()
            .await
            .map_err(|e| PlannerError::DatasetUnavailable(format!("{}: {}", self.url, e)))?;
        parse_dataset(&text)
    }
}

pub struct FileDatasetLoader {
    path: PathBuf,
}

impl FileDatasetLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl MunicipalityDatasetLoader for FileDatasetLoader {
    async fn load(&self) -> Result<Vec<Municipality>> {
        tracing::info!("Reading municipality dataset from {}", self.path.display());
        let text = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            PlannerError::DatasetUnavailable(format!("{}: {}", self.path.display(), e))
        })?;
        parse_dataset(&text)
    }
}

/// Pick a loader for `source`: `http(s)://` URLs are fetched, anything else
/// is read as a file path.
pub fn loader_for(
    source: &str,
    settings: &HttpSettings,
) -> anyhow::Result<Box<dyn MunicipalityDatasetLoader>> {
    if source.starts_with("http://") || source.starts_with("https://") {
        Ok(Box::new(HttpDatasetLoader::new(source, settings)?))
    } else {
        Ok(Box::new(FileDatasetLoader::new(source)))
    }
}
