//! Embedding-based semantic similarity scorer.
//!
//! Calls an OpenAI-compatible embeddings endpoint and scores answers by
//! cosine similarity. Unavailability (missing key, unusable output) is
//! reported as `Ok(None)` so the engine can fall back to its deterministic
//! local score.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use skillforge_core::traits::SemanticScorer;

use crate::error::ProviderError;

const DEFAULT_BASE_URL: &str = "https://api.openai.com";
const DEFAULT_MODEL: &str = "text-embedding-3-small";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Remote embedding scorer.
pub struct EmbeddingScorer {
    api_key: String,
    base_url: String,
    model: String,
    client: reqwest::Client,
}

impl EmbeddingScorer {
    pub fn new(api_key: &str, base_url: Option<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .expect("failed to build HTTP client");

        EmbeddingScorer {
            api_key: api_key.trim().to_string(),
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model: DEFAULT_MODEL.to_string(),
            client,
        }
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    async fn embed(&self, text: &str) -> Result<Vec<f64>, ProviderError> {
        let body = EmbeddingRequest {
            model: self.model.clone(),
            input: vec![text.to_string()],
        };

        let response = self
            .client
            .post(format!("{}/v1/embeddings", self.base_url))
            .header("authorization", format!("Bearer {}", self.api_key))
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout(DEFAULT_TIMEOUT_SECS)
                } else {
                    ProviderError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status().as_u16();
        if status == 429 {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(5)
                * 1000;
            return Err(ProviderError::RateLimited {
                retry_after_ms: retry_after,
            });
        }
        if status == 401 {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::AuthenticationFailed(body));
        }
        if status >= 400 {
            let message = response.text().await.unwrap_or_default();
            return Err(ProviderError::ApiError { status, message });
        }

        let api_response: EmbeddingResponse =
            response.json().await.map_err(|e| ProviderError::ApiError {
                status: 0,
                message: format!("failed to parse response: {e}"),
            })?;

        Ok(api_response
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .unwrap_or_default())
    }
}

#[derive(Serialize)]
struct EmbeddingRequest {
    model: String,
    input: Vec<String>,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f64>,
}

/// Cosine similarity clamped to [0, 1].
fn cosine(a: &[f64], b: &[f64]) -> f64 {
    let mut dot = 0.0;
    let mut norm_a = 0.0;
    let mut norm_b = 0.0;
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    let denominator = norm_a.sqrt() * norm_b.sqrt() + 1e-9;
    (dot / denominator).clamp(0.0, 1.0)
}

#[async_trait]
impl SemanticScorer for EmbeddingScorer {
    fn name(&self) -> &str {
        "embedding"
    }

    #[instrument(skip_all)]
    async fn similarity(&self, expected: &str, actual: &str) -> anyhow::Result<Option<f64>> {
        if self.api_key.is_empty() {
            tracing::debug!("no API key configured, embedding scorer unavailable");
            return Ok(None);
        }
        if expected.trim().is_empty() || actual.trim().is_empty() {
            return Ok(None);
        }

        let expected_vec = self.embed(expected).await?;
        let actual_vec = self.embed(actual).await?;
        if expected_vec.is_empty() || expected_vec.len() != actual_vec.len() {
            tracing::warn!(
                expected_dims = expected_vec.len(),
                actual_dims = actual_vec.len(),
                "embedding dimensions unusable"
            );
            return Ok(None);
        }

        Ok(Some(cosine(&expected_vec, &actual_vec)))
    }
}
