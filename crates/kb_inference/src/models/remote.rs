use std::fmt;
use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use kb_core::{ClassificationResult, Error, InferenceModel, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use super::{classification_from_logits, mean_pool};
use crate::{Config, ModelConfig, DEFAULT_INFERENCE_URL};

/// Token window of the embedding encoder.
pub const EMBEDDING_MAX_LENGTH: usize = 256;
/// Token window of the sequence classifier.
pub const CLASSIFIER_MAX_LENGTH: usize = 512;

#[derive(Serialize)]
struct SummarizeRequest<'a> {
    text: &'a str,
    ratio: f32,
}

#[derive(Deserialize)]
struct SummarizeResponse {
    summary: String,
}

#[derive(Serialize)]
struct EncodeRequest<'a> {
    text: &'a str,
    max_length: usize,
}

#[derive(Deserialize)]
struct EmbedResponse {
    hidden_states: Vec<Vec<f32>>,
}

#[derive(Deserialize)]
struct ClassifyResponse {
    logits: Vec<f32>,
}

#[derive(Serialize)]
struct CheckpointRequest<'a> {
    path: &'a str,
}

#[derive(Debug, Clone)]
pub struct RemoteModelConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub embedding_max_length: usize,
    pub classifier_max_length: usize,
}

impl ModelConfig for RemoteModelConfig {
    fn from_inference_config(config: &Config) -> Self {
        Self {
            base_url: config.inference_url.clone(),
            timeout: config.timeout,
            embedding_max_length: EMBEDDING_MAX_LENGTH,
            classifier_max_length: CLASSIFIER_MAX_LENGTH,
        }
    }
}

impl Default for RemoteModelConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_INFERENCE_URL.to_string(),
            timeout: Duration::from_secs(120),
            embedding_max_length: EMBEDDING_MAX_LENGTH,
            classifier_max_length: CLASSIFIER_MAX_LENGTH,
        }
    }
}

/// Client for the model-serving sidecar that hosts the pretrained
/// summarizer, encoder and classifier.
pub struct RemoteModel {
    client: Client,
    base_url: Url,
    config: RemoteModelConfig,
}

impl fmt::Debug for RemoteModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteModel")
            .field("client", &"<reqwest::Client>")
            .field("base_url", &self.base_url.as_str())
            .finish()
    }
}

impl RemoteModel {
    pub fn new(config: RemoteModelConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Self::with_client(client, config)
    }

    pub fn with_client(client: Client, config: RemoteModelConfig) -> Result<Self> {
        // A trailing slash keeps any path prefix when joining endpoints.
        let mut base = config.base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base).map_err(|e| Error::InvalidUrl(format!("{}: {}", base, e)))?;
        Ok(Self {
            client,
            base_url,
            config,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| Error::InvalidUrl(format!("{}{}: {}", self.base_url, path, e)))
    }

    async fn post<Req: Serialize + ?Sized, Resp: DeserializeOwned>(&self, path: &str, body: &Req) -> Result<Resp> {
        let url = self.endpoint(path)?;
        debug!("POST {}", url);
        let response = self.client.post(url).json(body).send().await?;
        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(Error::Inference(format!("{} returned {}: {}", path, status, detail)));
        }
        response
            .json::<Resp>()
            .await
            .map_err(|e| Error::Inference(format!("Malformed response from {}: {}", path, e)))
    }

    /// Succeeds once the service answers its health endpoint.
    pub async fn health(&self) -> Result<()> {
        let url = self.endpoint("health")?;
        let response = self.client.get(url).send().await?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(Error::Inference(format!(
                "Inference service unhealthy: {}",
                response.status()
            )))
        }
    }

    /// Points the service's classifier at fine-tuned weights on disk.
    pub async fn load_checkpoint(&self, path: &Path) -> Result<()> {
        let path = path.to_string_lossy();
        let _: serde_json::Value = self.post("checkpoint", &CheckpointRequest { path: &path }).await?;
        Ok(())
    }
}

#[async_trait]
impl InferenceModel for RemoteModel {
    fn name(&self) -> &str {
        "Remote"
    }

    async fn summarize(&self, text: &str, ratio: f32) -> Result<String> {
        let response: SummarizeResponse = self.post("summarize", &SummarizeRequest { text, ratio }).await?;
        Ok(response.summary)
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let response: EmbedResponse = self
            .post(
                "embed",
                &EncodeRequest {
                    text,
                    max_length: self.config.embedding_max_length,
                },
            )
            .await?;
        mean_pool(&response.hidden_states)
            .ok_or_else(|| Error::Inference("Encoder returned no usable hidden states".to_string()))
    }

    async fn classify(&self, title: &str, content: &str) -> Result<ClassificationResult> {
        let text = format!("{} [SEP] {}", title, content);
        let response: ClassifyResponse = self
            .post(
                "classify",
                &EncodeRequest {
                    text: &text,
                    max_length: self.config.classifier_max_length,
                },
            )
            .await?;
        classification_from_logits(&response.logits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kb_core::RelevanceLabel;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn model_for(server: &MockServer) -> RemoteModel {
        RemoteModel::new(RemoteModelConfig {
            base_url: server.uri(),
            ..RemoteModelConfig::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_summarize() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/summarize"))
            .and(body_json(json!({"text": "Judul. Isi panjang.", "ratio": 0.5})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"summary": "Judul. Isi."})))
            .mount(&server)
            .await;

        let summary = model_for(&server).summarize("Judul. Isi panjang.", 0.5).await.unwrap();
        assert_eq!(summary, "Judul. Isi.");
    }

    #[tokio::test]
    async fn test_embed_mean_pools_hidden_states() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/embed"))
            .and(body_json(json!({"text": "teks", "max_length": 256})))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"hidden_states": [[1.0, 0.0], [3.0, 2.0]]})),
            )
            .mount(&server)
            .await;

        let embedding = model_for(&server).embed("teks").await.unwrap();
        assert_eq!(embedding, vec![2.0, 1.0]);
    }

    #[tokio::test]
    async fn test_classify_joins_with_separator() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/classify"))
            .and(body_json(json!({"text": "Judul [SEP] Isi", "max_length": 512})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"logits": [0.1, 0.2, 4.0]})))
            .mount(&server)
            .await;

        let result = model_for(&server).classify("Judul", "Isi").await.unwrap();
        assert_eq!(result.label, RelevanceLabel::Relevan);
        assert!(result.confidence > 0.9);
    }

    #[tokio::test]
    async fn test_error_status_is_inference_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/classify"))
            .respond_with(ResponseTemplate::new(503).set_body_string("loading"))
            .mount(&server)
            .await;

        let result = model_for(&server).classify("a", "b").await;
        assert!(matches!(result, Err(Error::Inference(msg)) if msg.contains("503")));
    }

    #[tokio::test]
    async fn test_malformed_payload_is_inference_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/embed"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"embedding": [1.0]})))
            .mount(&server)
            .await;

        assert!(matches!(model_for(&server).embed("x").await, Err(Error::Inference(_))));
    }

    #[tokio::test]
    async fn test_base_path_is_kept() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/health"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let model = RemoteModel::new(RemoteModelConfig {
            base_url: format!("{}/v1", server.uri()),
            ..RemoteModelConfig::default()
        })
        .unwrap();
        model.health().await.unwrap();
    }

    #[tokio::test]
    async fn test_load_checkpoint() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/checkpoint"))
            .and(body_json(json!({"path": "/tmp/model.pth"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "loaded"})))
            .expect(1)
            .mount(&server)
            .await;

        model_for(&server)
            .load_checkpoint(Path::new("/tmp/model.pth"))
            .await
            .unwrap();
    }
}
