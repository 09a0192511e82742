//! The model gateway: every outbound call to the generative-AI provider.
//!
//! One gateway is built at startup and shared by all surfaces. When the
//! credential is missing the process runs on [`OfflineGateway`] instead, so
//! surfaces never need to know whether a provider session exists.

use crate::gemini::{GeminiClient, GeminiContent, GeminiPart, GeminiRequest, GenerationConfig};
use crate::prompts;
use async_trait::async_trait;
use parking_lot::Mutex;
use shared::agent_api::{FileAttachment, GeneratedImage};
use shared::outline::Outline;
use shared::settings::ModelSettings;
use shared::{CredentialFault, GatewayError};
use std::env;
use tracing::{debug, warn};
use zeroize::Zeroizing;

/// Environment variables consulted for the credential, in order
pub const API_KEY_VARS: [&str; 2] = ["API_KEY", "GEMINI_API_KEY"];

/// Capability-specific operations against the provider
///
/// Note: Uses async_trait for object safety
#[async_trait]
pub trait ModelGateway: Send + Sync {
    /// Next turn of the persistent dialogue
    async fn converse(&self, turn: &str) -> Result<String, GatewayError>;

    /// Single-turn question grounded in an inline file
    async fn converse_with_file(
        &self,
        prompt: &str,
        file: &FileAttachment,
    ) -> Result<String, GatewayError>;

    async fn synthesize_image(&self, prompt: &str) -> Result<GeneratedImage, GatewayError>;

    async fn summarize(&self, source: &str) -> Result<String, GatewayError>;

    /// Structured outline; any schema deviation is `MalformedGeneration`
    async fn generate_outline(
        &self,
        topic: &str,
        slide_count: u32,
        tone: &str,
    ) -> Result<Outline, GatewayError>;

    /// Forget the dialogue so the next `converse` starts fresh
    fn reset_dialogue(&self) {}
}

/// Read the credential from the environment
pub fn credential_from_env() -> Option<Zeroizing<String>> {
    API_KEY_VARS
        .iter()
        .filter_map(|var| env::var(var).ok())
        .find(|v| !v.trim().is_empty())
        .map(Zeroizing::new)
}

/// Gateway backed by the Gemini REST API
pub struct GeminiGateway {
    client: GeminiClient,
    settings: ModelSettings,
    dialogue: Mutex<Dialogue>,
}

/// Completed turns of the chat dialogue
#[derive(Default)]
struct Dialogue {
    turns: Vec<GeminiContent>,
    /// Bumped on reset; a turn started under an older generation is dropped
    generation: u64,
}

impl GeminiGateway {
    /// Establish the provider session. A missing or empty credential is a
    /// `CredentialFault` and is never retried.
    pub fn connect(
        settings: &ModelSettings,
        api_key: Option<Zeroizing<String>>,
    ) -> Result<Self, CredentialFault> {
        let api_key =
            api_key.ok_or_else(|| CredentialFault::new("API_KEY environment variable not set."))?;
        let client = GeminiClient::new(settings, api_key)
            .map_err(|e| CredentialFault::new(format!("cannot create Gemini client: {}", e)))?;
        Ok(Self {
            client,
            settings: settings.clone(),
            dialogue: Mutex::new(Dialogue::default()),
        })
    }

    /// Number of completed dialogue turns (user + model)
    pub fn history_len(&self) -> usize {
        self.dialogue.lock().turns.len()
    }

    fn system_instruction(&self) -> Option<GeminiContent> {
        let text = self.settings.system_instruction.trim();
        if text.is_empty() {
            return None;
        }
        Some(GeminiContent {
            role: None,
            parts: vec![GeminiPart::text(text)],
        })
    }

    async fn single_turn(&self, parts: Vec<GeminiPart>, op: &str) -> Result<String, GatewayError> {
        let req = GeminiRequest {
            contents: vec![GeminiContent {
                role: Some("user".into()),
                parts,
            }],
            system_instruction: None,
            generation_config: None,
        };
        debug!(op, model = %self.settings.chat_model, "dispatching request");
        self.client
            .generate_content(&self.settings.chat_model, &req)
            .await
            .map_err(|e| upstream(op, e))
    }
}

fn upstream(op: &str, e: anyhow::Error) -> GatewayError {
    warn!("error in {}: {:#}", op, e);
    GatewayError::Upstream(e.to_string())
}

#[async_trait]
impl ModelGateway for GeminiGateway {
    async fn converse(&self, turn: &str) -> Result<String, GatewayError> {
        let user = GeminiContent::text("user", turn);
        let (mut contents, generation) = {
            let dialogue = self.dialogue.lock();
            (dialogue.turns.clone(), dialogue.generation)
        };
        contents.push(user.clone());

        let req = GeminiRequest {
            contents,
            system_instruction: self.system_instruction(),
            generation_config: None,
        };
        debug!(model = %self.settings.chat_model, turns = req.contents.len(), "sending chat turn");
        let reply = self
            .client
            .generate_content(&self.settings.chat_model, &req)
            .await
            .map_err(|e| upstream("converse", e))?;

        // Failed turns never enter the dialogue, nor do turns outlived by a reset
        let mut dialogue = self.dialogue.lock();
        if dialogue.generation == generation {
            dialogue.turns.push(user);
            dialogue.turns.push(GeminiContent::text("model", reply.clone()));
        } else {
            debug!("dialogue was reset during the turn, not recording it");
        }
        Ok(reply)
    }

    async fn converse_with_file(
        &self,
        prompt: &str,
        file: &FileAttachment,
    ) -> Result<String, GatewayError> {
        self.single_turn(
            vec![GeminiPart::file(file), GeminiPart::text(prompt)],
            "converse_with_file",
        )
        .await
    }

    async fn synthesize_image(&self, prompt: &str) -> Result<GeneratedImage, GatewayError> {
        debug!(model = %self.settings.image_model, "requesting image");
        self.client
            .predict_image(&self.settings.image_model, prompt)
            .await
            .map_err(|e| upstream("synthesize_image", e))
    }

    async fn summarize(&self, source: &str) -> Result<String, GatewayError> {
        self.single_turn(vec![GeminiPart::text(prompts::summary(source))], "summarize")
            .await
    }

    async fn generate_outline(
        &self,
        topic: &str,
        slide_count: u32,
        tone: &str,
    ) -> Result<Outline, GatewayError> {
        let req = GeminiRequest {
            contents: vec![GeminiContent::text(
                "user",
                prompts::outline(topic, slide_count, tone),
            )],
            system_instruction: None,
            generation_config: Some(GenerationConfig {
                response_mime_type: "application/json".into(),
                response_schema: prompts::outline_schema(),
            }),
        };
        debug!(slide_count, "requesting presentation outline");
        let raw = self
            .client
            .generate_content(&self.settings.chat_model, &req)
            .await
            .map_err(|e| upstream("generate_outline", e))?;

        Outline::from_json(&raw).map_err(|e| {
            warn!("outline response does not match schema: {}", e);
            GatewayError::MalformedGeneration(e.to_string())
        })
    }

    fn reset_dialogue(&self) {
        let mut dialogue = self.dialogue.lock();
        dialogue.turns.clear();
        dialogue.generation += 1;
    }
}

/// Stand-in used for the whole process lifetime after a credential fault
#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineGateway;

#[async_trait]
impl ModelGateway for OfflineGateway {
    async fn converse(&self, _turn: &str) -> Result<String, GatewayError> {
        Err(GatewayError::Unavailable)
    }

    async fn converse_with_file(
        &self,
        _prompt: &str,
        _file: &FileAttachment,
    ) -> Result<String, GatewayError> {
        Err(GatewayError::Unavailable)
    }

    async fn synthesize_image(&self, _prompt: &str) -> Result<GeneratedImage, GatewayError> {
        Err(GatewayError::Unavailable)
    }

    async fn summarize(&self, _source: &str) -> Result<String, GatewayError> {
        Err(GatewayError::Unavailable)
    }

    async fn generate_outline(
        &self,
        _topic: &str,
        _slide_count: u32,
        _tone: &str,
    ) -> Result<Outline, GatewayError> {
        Err(GatewayError::Unavailable)
    }
}
