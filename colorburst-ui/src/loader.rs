use anyhow::{Context, Result};
use colorburst_core::LoaderSettings;
use image::RgbaImage;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tokio::runtime::Handle;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("image source is empty")]
    EmptySource,
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("server answered {0}")]
    Status(reqwest::StatusCode),
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
    #[error("decoder task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    Http(String),
    File(PathBuf),
}

impl ImageSource {
    pub fn parse(src: &str) -> Result<Self, LoadError> {
        let src = src.trim();
        if src.is_empty() {
            return Err(LoadError::EmptySource);
        }

        let lower = src.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Ok(Self::Http(src.to_string()))
        } else if let Some(path) = src.strip_prefix("file://") {
            Ok(Self::File(PathBuf::from(path)))
        } else {
            Ok(Self::File(PathBuf::from(src)))
        }
    }
}

#[derive(Clone)]
pub struct ImageLoader {
    client: reqwest::Client,
    runtime: Handle,
}

impl ImageLoader {
    pub fn new(runtime: Handle, settings: &LoaderSettings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self { client, runtime })
    }

    pub async fn fetch(&self, src: &str) -> Result<RgbaImage, LoadError> {
        let bytes = match ImageSource::parse(src)? {
            ImageSource::Http(url) => {
                let response = self.client.get(&url).send().await?;
                if !response.status().is_success() {
                    return Err(LoadError::Status(response.status()));
                }
                response.bytes().await?.to_vec()
            }
            ImageSource::File(path) => tokio::fs::read(&path)
                .await
                .map_err(|source| LoadError::Io { path, source })?,
        };

        let image = tokio::task::spawn_blocking(move || image::load_from_memory(&bytes)).await??;
        Ok(image.to_rgba8())
    }

    pub fn spawn_load<F>(&self, src: String, on_done: F)
    where
        F: FnOnce(Result<RgbaImage, LoadError>) + Send + 'static,
    {
        let loader = self.clone();
        self.runtime.spawn(async move {
            let result = loader.fetch(&src).await;
            match &result {
                Ok(image) => log::info!("Loaded {} ({}x{})", src, image.width(), image.height()),
                Err(e) => log::warn!("Failed to load image {:?}: {}", src, e),
            }
            on_done(result);
        });
    }
}
