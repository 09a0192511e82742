//! Armin AI assistant: five surfaces sharing one model gateway.

pub mod conversation;
pub mod state;
pub mod surfaces;

use providers::{credential_from_env, GeminiGateway, ModelGateway, OfflineGateway};
use services::ExportError;
use shared::settings::AssistantSettings;
use shared::CredentialFault;
use std::path::PathBuf;
use std::sync::Arc;
use surfaces::{ChatSurface, FileQnaSurface, ImageSurface, PresentationSurface, SummarizerSurface};
use tracing::{error, info};
use zeroize::Zeroizing;

pub struct Assistant {
    settings: AssistantSettings,
    credential_fault: Option<CredentialFault>,
    pub chat: ChatSurface,
    pub file_qna: FileQnaSurface,
    pub summarizer: SummarizerSurface,
    pub image: ImageSurface,
    pub presentation: PresentationSurface,
}

impl Assistant {
    /// Connect with the credential from the environment
    pub fn from_env(settings: AssistantSettings) -> Self {
        Self::start(settings, credential_from_env())
    }

    /// Connect to the provider once. Without a usable credential every
    /// surface runs against the offline gateway for the rest of the process.
    pub fn start(settings: AssistantSettings, api_key: Option<Zeroizing<String>>) -> Self {
        match GeminiGateway::connect(&settings.model, api_key) {
            Ok(gateway) => {
                info!(model = %settings.model.chat_model, "model gateway ready");
                Self::with_gateway(settings, Arc::new(gateway))
            }
            Err(fault) => {
                error!("model gateway unavailable: {}", fault);
                let mut assistant = Self::with_gateway(settings, Arc::new(OfflineGateway));
                assistant.credential_fault = Some(fault);
                assistant
            }
        }
    }

    pub fn with_gateway(settings: AssistantSettings, gateway: Arc<dyn ModelGateway>) -> Self {
        Self {
            chat: ChatSurface::new(gateway.clone()),
            file_qna: FileQnaSurface::new(gateway.clone()),
            summarizer: SummarizerSurface::new(gateway.clone()),
            image: ImageSurface::new(gateway.clone()),
            presentation: PresentationSurface::new(gateway, &settings.presentation),
            settings,
            credential_fault: None,
        }
    }

    /// Set when the provider session could not be created
    pub fn credential_fault(&self) -> Option<&CredentialFault> {
        self.credential_fault.as_ref()
    }

    pub fn settings(&self) -> &AssistantSettings {
        &self.settings
    }

    /// Export the current outline into the configured download folder
    pub fn export_presentation(&self) -> Result<Option<PathBuf>, ExportError> {
        self.presentation.export(&self.settings.export_dir())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::strings;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_missing_credential_disables_every_surface() {
        let assistant = Assistant::start(AssistantSettings::default(), None);
        let fault = assistant.credential_fault().unwrap();
        assert_eq!(fault.user_message(), strings::API_KEY_FAULT);

        assistant.chat.submit("سلام").await;
        assert_eq!(
            assistant.chat.snapshot().conversation.last().unwrap().text,
            strings::CHAT_UNAVAILABLE
        );
        assistant.image.submit("گربه").await;
        assert_eq!(
            assistant.image.snapshot().error.as_deref(),
            Some(strings::GATEWAY_UNAVAILABLE)
        );
    }

    #[test]
    fn test_credential_present_connects() {
        let assistant = Assistant::start(
            AssistantSettings::default(),
            Some(Zeroizing::new("test-key".to_string())),
        );
        assert!(assistant.credential_fault().is_none());
    }

    #[tokio::test]
    async fn test_export_uses_download_dir() {
        let tmp = tempdir().unwrap();
        let settings = AssistantSettings {
            download_dir: Some(tmp.path().to_path_buf()),
            ..Default::default()
        };
        let assistant = Assistant::with_gateway(
            settings,
            Arc::new(crate::surfaces::fakes::FakeGateway::default()),
        );
        assert_eq!(assistant.export_presentation().unwrap(), None);

        assistant.presentation.submit("فیزیک").await;
        let path = assistant.export_presentation().unwrap().unwrap();
        assert_eq!(path, tmp.path().join("فیزیک.pptx"));
    }
}
