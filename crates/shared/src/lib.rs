pub mod errors;
pub mod outline;
pub mod strings;
pub mod surface;

pub use errors::{CredentialFault, GatewayError};

pub mod settings {
    use serde::{Deserialize, Serialize};
    use std::path::{Path, PathBuf};

    fn default_timeout_secs() -> u64 {
        90
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct ModelSettings {
        pub base_url: String,     // e.g., "https://generativelanguage.googleapis.com/v1beta"
        pub chat_model: String,   // chat, file questions, summaries and outlines
        pub image_model: String,  // e.g., "imagen-4.0-generate-001"
        #[serde(default = "default_timeout_secs")]
        pub timeout_secs: u64,
        pub system_instruction: String,
    }

    /// Starting values for the presentation surface
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct PresentationDefaults {
        pub slide_count: u32,
        pub tone: String,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct AssistantSettings {
        pub model: ModelSettings,
        #[serde(default)]
        pub presentation: PresentationDefaults,
        /// Where exported decks land; falls back to the OS download folder
        #[serde(default)]
        pub download_dir: Option<PathBuf>,
    }

    impl Default for ModelSettings {
        fn default() -> Self {
            Self {
                base_url: "https://generativelanguage.googleapis.com/v1beta".into(),
                chat_model: "gemini-2.5-flash".into(),
                image_model: "imagen-4.0-generate-001".into(),
                timeout_secs: default_timeout_secs(),
                system_instruction: crate::strings::SYSTEM_INSTRUCTION.into(),
            }
        }
    }

    impl Default for PresentationDefaults {
        fn default() -> Self {
            Self {
                slide_count: 5,
                tone: crate::strings::DEFAULT_TONE.into(),
            }
        }
    }

    impl Default for AssistantSettings {
        fn default() -> Self {
            Self {
                model: ModelSettings::default(),
                presentation: PresentationDefaults::default(),
                download_dir: None,
            }
        }
    }

    impl AssistantSettings {
        /// Export destination: configured folder, then the OS download folder,
        /// then the working directory.
        pub fn export_dir(&self) -> PathBuf {
            self.download_dir
                .clone()
                .or_else(dirs::download_dir)
                .unwrap_or_else(|| PathBuf::from("."))
        }
    }

    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|mut p| {
            p.push("armin_assistant");
            p.push("settings.json");
            p
        })
    }

    /// Load settings from `path` (or the default location), falling back to defaults
    pub fn load_settings_or_default(path: Option<&Path>) -> AssistantSettings {
        let path = match path.map(Path::to_path_buf).or_else(config_path) {
            Some(p) => p,
            None => return AssistantSettings::default(),
        };

        match std::fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<AssistantSettings>(&contents) {
                Ok(settings) => settings,
                Err(e) => {
                    tracing::warn!("ignoring unparsable settings at {}: {}", path.display(), e);
                    AssistantSettings::default()
                }
            },
            Err(_) => AssistantSettings::default(),
        }
    }

    /// Save settings to disk
    pub fn save_settings(settings: &AssistantSettings, path: &Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(settings)?;
        std::fs::write(path, json)
    }

}

pub mod agent_api {
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum Role {
        User,
        Model,
    }

    /// One entry of a conversation transcript
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct ChatMessage {
        pub role: Role,
        pub text: String,
    }

    impl ChatMessage {
        pub fn user(text: impl Into<String>) -> Self {
            Self {
                role: Role::User,
                text: text.into(),
            }
        }

        pub fn model(text: impl Into<String>) -> Self {
            Self {
                role: Role::Model,
                text: text.into(),
            }
        }
    }

    /// Upper bound for a grounding file, in bytes
    pub const MAX_ATTACHMENT_BYTES: u64 = 10 * 1024 * 1024;

    /// A file sent inline alongside a question
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct FileAttachment {
        pub name: String,
        pub mime_type: String,
        pub data: String, // base64 encoded
    }

    /// A synthesized raster image
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct GeneratedImage {
        pub mime_type: String,
        pub base64: String,
    }

    impl GeneratedImage {
        pub const DATA_URI_PREFIX: &'static str = "data:image";

        pub fn data_uri(&self) -> String {
            format!("data:{};base64,{}", self.mime_type, self.base64)
        }

        /// Parse a `data:image/...;base64,...` string; anything else is not an image.
        pub fn from_data_uri(uri: &str) -> Option<Self> {
            if !uri.starts_with(Self::DATA_URI_PREFIX) {
                return None;
            }
            let rest = uri.strip_prefix("data:")?;
            let (mime_type, base64) = rest.split_once(";base64,")?;
            Some(Self {
                mime_type: mime_type.to_string(),
                base64: base64.to_string(),
            })
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_role_serializes_lowercase() {
            let json = serde_json::to_string(&ChatMessage::model("سلام")).unwrap();
            assert!(json.contains("\"model\""));
        }

        #[test]
        fn test_data_uri_prefix_classification() {
            let image = GeneratedImage {
                mime_type: "image/jpeg".into(),
                base64: "AAAA".into(),
            };
            let uri = image.data_uri();
            assert_eq!(uri, "data:image/jpeg;base64,AAAA");
            assert_eq!(GeneratedImage::from_data_uri(&uri), Some(image));

            assert!(GeneratedImage::from_data_uri("متاسفانه در تولید تصویر خطایی رخ داد.").is_none());
            assert!(GeneratedImage::from_data_uri("data:text/plain;base64,AAAA").is_none());
        }
    }
}
