use anyhow::{anyhow, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use shared::agent_api::{FileAttachment, GeneratedImage};
use shared::settings::ModelSettings;
use std::time::Duration;
use zeroize::Zeroizing;

// ── Request types ────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<GeminiPart>,
}

impl GeminiContent {
    pub fn text(role: &str, text: impl Into<String>) -> Self {
        Self {
            role: Some(role.to_string()),
            parts: vec![GeminiPart::text(text)],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiPart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<InlineData>,
}

impl GeminiPart {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            inline_data: None,
        }
    }

    pub fn file(file: &FileAttachment) -> Self {
        Self {
            text: None,
            inline_data: Some(InlineData {
                mime_type: file.mime_type.clone(),
                data: file.data.clone(),
            }),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub response_mime_type: String,
    pub response_schema: serde_json::Value,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiRequest {
    pub contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ImagenRequest<'a> {
    instances: Vec<ImagenInstance<'a>>,
    parameters: ImagenParameters<'a>,
}

#[derive(Debug, Serialize)]
struct ImagenInstance<'a> {
    prompt: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ImagenParameters<'a> {
    sample_count: u32,
    aspect_ratio: &'a str,
    output_options: ImagenOutputOptions<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ImagenOutputOptions<'a> {
    mime_type: &'a str,
}

// ── Response types ───────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContent>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImagenPrediction {
    bytes_base64_encoded: Option<String>,
    mime_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ImagenResponse {
    #[serde(default)]
    predictions: Vec<ImagenPrediction>,
}

/// Output format requested from the image model
pub const IMAGE_MIME_TYPE: &str = "image/jpeg";
const IMAGE_ASPECT_RATIO: &str = "1:1";

/// Thin REST client for the Generative Language API
pub struct GeminiClient {
    http: Client,
    api_key: Zeroizing<String>,
    base_url: String,
}

impl GeminiClient {
    pub fn new(settings: &ModelSettings, api_key: Zeroizing<String>) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(anyhow!("empty API key"));
        }
        Ok(Self {
            http: Client::builder()
                .timeout(Duration::from_secs(settings.timeout_secs))
                .build()?,
            api_key,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// One `generateContent` call; returns the concatenated text of the first candidate.
    pub async fn generate_content(&self, model: &str, req: &GeminiRequest) -> Result<String> {
        let url = format!("{}/models/{}:generateContent", self.base_url, model);
        let resp = self
            .http
            .post(url)
            .header("x-goog-api-key", self.api_key.as_str())
            .json(req)
            .send()
            .await?;
        let resp = check_status(resp).await?;
        let body: GeminiResponse = resp.json().await?;
        let text = body
            .candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|c| {
                c.parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<String>()
            })
            .ok_or_else(|| anyhow!("gemini returned no candidates"))?;
        Ok(text)
    }

    /// One square image from an Imagen model
    pub async fn predict_image(&self, model: &str, prompt: &str) -> Result<GeneratedImage> {
        let url = format!("{}/models/{}:predict", self.base_url, model);
        let req = ImagenRequest {
            instances: vec![ImagenInstance { prompt }],
            parameters: ImagenParameters {
                sample_count: 1,
                aspect_ratio: IMAGE_ASPECT_RATIO,
                output_options: ImagenOutputOptions {
                    mime_type: IMAGE_MIME_TYPE,
                },
            },
        };
        let resp = self
            .http
            .post(url)
            .header("x-goog-api-key", self.api_key.as_str())
            .json(&req)
            .send()
            .await?;
        let resp = check_status(resp).await?;
        let body: ImagenResponse = resp.json().await?;
        let prediction = body
            .predictions
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("imagen returned no images"))?;
        let base64 = prediction
            .bytes_base64_encoded
            .filter(|b| !b.is_empty())
            .ok_or_else(|| anyhow!("imagen prediction has no image bytes"))?;
        Ok(GeneratedImage {
            mime_type: prediction
                .mime_type
                .unwrap_or_else(|| IMAGE_MIME_TYPE.to_string()),
            base64,
        })
    }
}

async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response> {
    if resp.status().is_success() {
        return Ok(resp);
    }
    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();
    let body = body.trim();
    if body.is_empty() {
        return Err(anyhow!("gemini error: {}", status));
    }
    let body = if body.len() > 800 {
        let cut = (0..=800).rev().find(|i| body.is_char_boundary(*i)).unwrap_or(0);
        format!("{}...", &body[..cut])
    } else {
        body.to_string()
    };
    Err(anyhow!("gemini error: {}\n{}", status, body))
}
