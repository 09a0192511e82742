//! Questions grounded in a single uploaded file.
//!
//! Replacing or removing the file wipes the transcript, and any reply still in
//! flight for the old file is dropped when it lands.

use crate::conversation::Conversation;
use crate::state::{SurfaceCell, SurfaceState};
use providers::{prompts, ModelGateway};
use services::intake::{self, IntakeError};
use shared::agent_api::{ChatMessage, FileAttachment};
use shared::strings::fallback_for;
use shared::surface::SurfaceKind;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileQnaState {
    pub conversation: Conversation,
    pub attachment: Option<FileAttachment>,
    pub file_error: Option<String>,
    pub busy: bool,
}

impl SurfaceState for FileQnaState {
    fn is_busy(&self) -> bool {
        self.busy
    }
    fn set_busy(&mut self, busy: bool) {
        self.busy = busy;
    }
}

pub struct FileQnaSurface {
    gateway: Arc<dyn ModelGateway>,
    cell: SurfaceCell<FileQnaState>,
}

impl FileQnaSurface {
    pub fn new(gateway: Arc<dyn ModelGateway>) -> Self {
        Self {
            gateway,
            cell: SurfaceCell::new(FileQnaState::default()),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<FileQnaState> {
        self.cell.subscribe()
    }

    pub fn snapshot(&self) -> FileQnaState {
        self.cell.snapshot()
    }

    /// Load a file from disk as the new grounding file
    pub async fn load_file(&self, path: &Path) -> bool {
        let loaded = intake::read_attachment(path).await;
        self.install(loaded)
    }

    /// Install an already-read file (drag and drop, paste)
    pub fn accept_file(&self, name: &str, mime_type: &str, bytes: &[u8]) -> bool {
        self.install(intake::attachment_from_bytes(name, mime_type, bytes))
    }

    fn install(&self, loaded: Result<FileAttachment, IntakeError>) -> bool {
        match loaded {
            Ok(file) => {
                info!(name = %file.name, mime = %file.mime_type, "file attached");
                self.cell.update(|s| {
                    s.conversation.reset();
                    s.file_error = None;
                    s.attachment = Some(file);
                });
                true
            }
            Err(e) => {
                warn!("file rejected: {}", e);
                // Current attachment and transcript stay as they were
                self.cell
                    .update(|s| s.file_error = Some(e.user_message().to_string()));
                false
            }
        }
    }

    pub fn remove_file(&self) {
        self.cell.update(|s| {
            s.attachment = None;
            s.conversation.reset();
        });
    }

    /// Ask about the current file. Ignored without a file, on blank input, or
    /// while a question is in flight.
    pub async fn submit(&self, question: &str) -> bool {
        let question = question.trim();
        if question.is_empty() {
            return false;
        }

        let mut request = None;
        let Some(guard) = self.cell.try_begin(
            |s| s.attachment.is_some(),
            |s| {
                s.conversation.append(ChatMessage::user(question));
                let epoch = s.conversation.epoch();
                request = s.attachment.clone().map(|f| (f, epoch));
            },
        ) else {
            debug!("file question ignored");
            return false;
        };
        let Some((file, epoch)) = request else {
            return false;
        };

        let prompt = prompts::file_question(&file.name, question);
        let reply = match self.gateway.converse_with_file(&prompt, &file).await {
            Ok(reply) => reply,
            Err(e) => fallback_for(SurfaceKind::FileQna, &e).to_string(),
        };

        guard.finish(|s| {
            if s.conversation.epoch() == epoch {
                s.conversation.append(ChatMessage::model(reply));
            } else {
                debug!(file = %file.name, "discarding reply for replaced file");
            }
        });
        true
    }
}
