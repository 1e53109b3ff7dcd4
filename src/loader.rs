use crate::config::Config;
use crate::models::{CatalogEntry, ValueRecord};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{info, warn};

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} responded with {status}")]
    Status { url: String, status: StatusCode },
    #[error("unexpected response shape from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Fetches and decodes the JSON arrays served by the IBGE endpoints.
#[derive(Clone)]
pub struct Loader {
    client: Client,
    catalog_url: String,
    index_url: String,
}

impl Loader {
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.fetch_timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            catalog_url: config.catalog_url.clone(),
            index_url: config.index_url.clone(),
        })
    }

    pub async fn load_catalog(&self) -> Result<Vec<CatalogEntry>, LoadError> {
        self.fetch(&self.catalog_url).await
    }

    pub async fn load_values(&self) -> Result<Vec<ValueRecord>, LoadError> {
        self.fetch(&self.index_url).await
    }

    /// Any element that does not match `T` fails the whole load.
    pub async fn fetch<T: DeserializeOwned>(&self, url: &str) -> Result<Vec<T>, LoadError> {
        let transport = |source: reqwest::Error| LoadError::Transport {
            url: url.to_string(),
            source,
        };

        let response = self.client.get(url).send().await.map_err(transport)?;
        let status = response.status();
        if !status.is_success() {
            warn!(%url, %status, "data source returned an error status");
            return Err(LoadError::Status {
                url: url.to_string(),
                status,
            });
        }

        let body = response.bytes().await.map_err(transport)?;
        let records: Vec<T> = serde_json::from_slice(&body).map_err(|source| LoadError::Decode {
            url: url.to_string(),
            source,
        })?;
        info!(%url, count = records.len(), "loaded records");
        Ok(records)
    }
}
