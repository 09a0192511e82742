pub mod gateway;
pub mod gemini;
pub mod prompts;

pub use gateway::{credential_from_env, GeminiGateway, ModelGateway, OfflineGateway};
