use anyhow::{anyhow, Result};
use url::Url;

use crate::config::AppConfig;

/// Resolves stored image keys to public URLs.
#[derive(Clone, Debug)]
pub struct MediaStorage {
    base_url: Url,
}

impl MediaStorage {
    pub fn new(config: &AppConfig) -> Result<Self> {
        Self::from_base_url(&config.media_base_url)
    }

    pub fn from_base_url(base_url: &str) -> Result<Self> {
        let mut base_url =
            Url::parse(base_url).map_err(|err| anyhow!("invalid media base url: {}", err))?;
        // Url::join drops the last path segment unless the base ends with '/'.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self { base_url })
    }

    pub fn url_for(&self, key: &str) -> Result<Url, url::ParseError> {
        self.base_url.join(key.trim_start_matches('/'))
    }
}
