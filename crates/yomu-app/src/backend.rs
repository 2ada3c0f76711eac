use std::sync::Arc;

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose;
use serde::{Deserialize, Serialize};

use yomu_ocr::{EngineFactory, OcrEngine, OcrError};
use yomu_types::{BoundingBox, OcrLine, OcrResult};

/// Recognition over HTTP: the engine itself lives behind an endpoint.
pub struct HttpOcrEngine {
    client: reqwest::Client,
    endpoint: String,
    languages: Vec<String>,
}

#[derive(Serialize)]
struct RecognizeRequest<'a> {
    image: String,
    languages: &'a [String],
}

#[derive(Deserialize)]
struct RecognizeResponse {
    text: String,
    #[serde(default)]
    lines: Vec<LineDto>,
}

#[derive(Deserialize)]
struct LineDto {
    text: String,
    bbox: [i32; 4],
    confidence: f32,
}

#[async_trait]
impl OcrEngine for HttpOcrEngine {
    async fn recognize(&self, image: &[u8]) -> Result<OcrResult, OcrError> {
        let request = RecognizeRequest {
            image: general_purpose::STANDARD.encode(image),
            languages: &self.languages,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| OcrError::Recognize(e.to_string()))?;

        if !response.status().is_success() {
            return Err(OcrError::Recognize(format!("HTTP {}", response.status())));
        }

        let body: RecognizeResponse = response
            .json()
            .await
            .map_err(|e| OcrError::Recognize(format!("bad response: {e}")))?;

        Ok(OcrResult {
            text: body.text,
            lines: body
                .lines
                .into_iter()
                .map(|line| OcrLine {
                    text: line.text,
                    bbox: BoundingBox {
                        x0: line.bbox[0],
                        y0: line.bbox[1],
                        x1: line.bbox[2],
                        y1: line.bbox[3],
                    },
                    confidence: line.confidence,
                })
                .collect(),
        })
    }
}

/// Creates HTTP engines for the run's language selection. Creation fails
/// when no endpoint is configured; that surfaces as the run-fatal
/// initialization error.
pub struct HttpEngineFactory {
    endpoint: Option<String>,
}

impl HttpEngineFactory {
    pub fn new(endpoint: Option<String>) -> Self {
        Self { endpoint }
    }
}

#[async_trait]
impl EngineFactory for HttpEngineFactory {
    async fn create(&self, languages: &[&str]) -> Result<Arc<dyn OcrEngine>, OcrError> {
        let endpoint = self
            .endpoint
            .clone()
            .ok_or_else(|| OcrError::Init("no OCR endpoint configured".to_string()))?;

        Ok(Arc::new(HttpOcrEngine {
            client: reqwest::Client::new(),
            endpoint,
            languages: languages.iter().map(|l| l.to_string()).collect(),
        }))
    }
}
