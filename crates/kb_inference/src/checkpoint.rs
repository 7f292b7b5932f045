//! Download and cache of the fine-tuned classifier weights.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use futures_util::StreamExt;
use kb_core::{Error, Result};
use reqwest::Client;
use sha2::{Digest, Sha256};
use tokio::fs;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::time::timeout;
use tracing::{debug, info, warn};

pub const DEFAULT_HUB_URL: &str = "https://huggingface.co";
pub const DEFAULT_REPO_ID: &str = "picessakresna/model_relevansi_berita";
pub const DEFAULT_FILENAME: &str = "model_relevansi_berita_3.pth";
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Clone)]
pub struct CheckpointConfig {
    pub hub_url: String,
    pub repo_id: String,
    pub filename: String,
    pub revision: String,
    pub cache_dir: PathBuf,
    /// Expected SHA-256 of the file, hex encoded
    pub sha256: Option<String>,
    /// Longest wait for the next chunk of the body. The download as a whole
    /// has no deadline; the weights are several hundred MB.
    pub read_timeout: Duration,
}

impl Default for CheckpointConfig {
    fn default() -> Self {
        Self {
            hub_url: DEFAULT_HUB_URL.to_string(),
            repo_id: DEFAULT_REPO_ID.to_string(),
            filename: DEFAULT_FILENAME.to_string(),
            revision: "main".to_string(),
            cache_dir: PathBuf::from(".cache/kb"),
            sha256: None,
            read_timeout: DEFAULT_READ_TIMEOUT,
        }
    }
}

/// Client for checkpoint downloads: bounded connect, no total timeout.
pub fn download_client(connect_timeout: Duration) -> Result<Client> {
    Ok(Client::builder().connect_timeout(connect_timeout).build()?)
}

pub struct CheckpointFetcher {
    client: Client,
    config: CheckpointConfig,
    token: Option<String>,
}

impl fmt::Debug for CheckpointFetcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckpointFetcher")
            .field("config", &self.config)
            .field("token", &self.token.as_deref().map(|_| "<redacted>"))
            .finish()
    }
}

impl CheckpointFetcher {
    pub fn new(client: Client, config: CheckpointConfig, token: Option<String>) -> Self {
        Self {
            client,
            config,
            token: token.filter(|t| !t.trim().is_empty()),
        }
    }

    pub fn download_url(&self) -> String {
        format!(
            "{}/{}/resolve/{}/{}",
            self.config.hub_url.trim_end_matches('/'),
            self.config.repo_id,
            self.config.revision,
            self.config.filename
        )
    }

    pub fn cached_path(&self) -> PathBuf {
        self.config
            .cache_dir
            .join(self.config.repo_id.replace('/', "--"))
            .join(&self.config.filename)
    }

    /// Returns the local path of the checkpoint, downloading it first unless
    /// a cached copy exists.
    pub async fn fetch(&self) -> Result<PathBuf> {
        let path = self.cached_path();

        if fs::try_exists(&path).await? {
            debug!("Using cached checkpoint {}", path.display());
            if self.config.sha256.is_some() {
                let digest = sha256_file(&path).await?;
                self.verify(&digest)?;
            }
            return Ok(path);
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let url = self.download_url();
        info!("⬇️ Downloading checkpoint {}", url);
        let mut request = self.client.get(&url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await?.error_for_status()?;

        // Stream into a side file so an interrupted download never looks cached.
        let partial = path.with_extension("part");
        let written = match self.download_to(response, &partial).await {
            Ok(written) => written,
            Err(e) => {
                if let Err(cleanup) = fs::remove_file(&partial).await {
                    if cleanup.kind() != std::io::ErrorKind::NotFound {
                        warn!("Could not remove {}: {}", partial.display(), cleanup);
                    }
                }
                return Err(e);
            }
        };

        fs::rename(&partial, &path).await?;
        info!("📦 Checkpoint saved to {} ({} bytes)", path.display(), written);
        Ok(path)
    }

    /// Writes the body to `partial` and checks its digest. The caller owns
    /// cleanup of `partial` on error.
    async fn download_to(&self, response: reqwest::Response, partial: &Path) -> Result<usize> {
        let mut file = fs::File::create(partial).await?;
        let mut hasher = Sha256::new();
        let mut stream = response.bytes_stream();
        let mut written = 0usize;
        let read_timeout = self.config.read_timeout;
        loop {
            let chunk = match timeout(read_timeout, stream.next()).await {
                Ok(Some(chunk)) => chunk?,
                Ok(None) => break,
                Err(_) => {
                    return Err(Error::Inference(format!(
                        "Checkpoint download stalled: no data for {:?} after {} bytes",
                        read_timeout, written
                    )))
                }
            };
            hasher.update(&chunk);
            file.write_all(&chunk).await?;
            written += chunk.len();
        }
        file.flush().await?;
        drop(file);

        self.verify(&format!("{:x}", hasher.finalize()))?;
        Ok(written)
    }

    fn verify(&self, digest: &str) -> Result<()> {
        match &self.config.sha256 {
            Some(expected) if !expected.trim().eq_ignore_ascii_case(digest) => Err(Error::Inference(format!(
                "Checkpoint checksum mismatch: expected {}, got {}",
                expected, digest
            ))),
            _ => Ok(()),
        }
    }
}

async fn sha256_file(path: &Path) -> Result<String> {
    let mut file = fs::File::open(path).await?;
    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; 64 * 1024];
    loop {
        let read = file.read(&mut buffer).await?;
        if read == 0 {
            break;
        }
        hasher.update(&buffer[..read]);
    }
    Ok(format!("{:x}", hasher.finalize()))
}
