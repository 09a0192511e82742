//! General chat: one persistent dialogue with the model.

use crate::conversation::Conversation;
use crate::state::{SurfaceCell, SurfaceState};
use providers::ModelGateway;
use shared::agent_api::ChatMessage;
use shared::strings::fallback_for;
use shared::surface::SurfaceKind;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatState {
    pub conversation: Conversation,
    pub busy: bool,
}

impl SurfaceState for ChatState {
    fn is_busy(&self) -> bool {
        self.busy
    }
    fn set_busy(&mut self, busy: bool) {
        self.busy = busy;
    }
}

pub struct ChatSurface {
    gateway: Arc<dyn ModelGateway>,
    cell: SurfaceCell<ChatState>,
}

impl ChatSurface {
    pub fn new(gateway: Arc<dyn ModelGateway>) -> Self {
        Self {
            gateway,
            cell: SurfaceCell::new(ChatState::default()),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<ChatState> {
        self.cell.subscribe()
    }

    pub fn snapshot(&self) -> ChatState {
        self.cell.snapshot()
    }

    /// Send one turn. Returns `false` when the input was ignored (blank, or a
    /// request is already in flight); nothing changes in that case.
    pub async fn submit(&self, input: &str) -> bool {
        let text = input.trim();
        if text.is_empty() {
            return false;
        }

        let mut epoch = 0;
        let Some(guard) = self.cell.try_begin(
            |_| true,
            |s| {
                s.conversation.append(ChatMessage::user(text));
                epoch = s.conversation.epoch();
            },
        ) else {
            debug!("chat busy, ignoring submission");
            return false;
        };

        let reply = match self.gateway.converse(text).await {
            Ok(reply) => reply,
            Err(e) => fallback_for(SurfaceKind::Chat, &e).to_string(),
        };

        guard.finish(|s| {
            if s.conversation.epoch() == epoch {
                s.conversation.append(ChatMessage::model(reply));
            }
        });
        true
    }

    /// Clear the transcript and start a new dialogue
    pub fn reset(&self) {
        self.gateway.reset_dialogue();
        self.cell.update(|s| s.conversation.reset());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surfaces::fakes::FakeGateway;
    use shared::agent_api::Role;
    use shared::strings;
    use shared::GatewayError;

    fn roles(state: &ChatState) -> Vec<Role> {
        state.conversation.messages().iter().map(|m| m.role).collect()
    }

    #[tokio::test]
    async fn test_turns_alternate_in_order() {
        let gw = Arc::new(FakeGateway::replying(vec![
            Ok("سلام!".into()),
            Ok("خوبم".into()),
        ]));
        let chat = ChatSurface::new(gw.clone());

        assert!(chat.submit("سلام").await);
        assert!(chat.submit("  چطوری؟ ").await);

        let state = chat.snapshot();
        assert_eq!(roles(&state), vec![Role::User, Role::Model, Role::User, Role::Model]);
        let texts: Vec<&str> = state
            .conversation
            .messages()
            .iter()
            .map(|m| m.text.as_str())
            .collect();
        assert_eq!(texts, vec!["سلام", "سلام!", "چطوری؟", "خوبم"]);
        assert_eq!(*gw.prompts.lock(), vec!["سلام", "چطوری؟"]);
        assert!(!state.busy);
    }

    #[tokio::test]
    async fn test_blank_input_is_ignored() {
        let gw = Arc::new(FakeGateway::default());
        let chat = ChatSurface::new(gw.clone());

        assert!(!chat.submit("").await);
        assert!(!chat.submit("   \n").await);
        assert!(chat.snapshot().conversation.is_empty());
        assert!(gw.prompts.lock().is_empty());
    }

    #[tokio::test]
    async fn test_submission_while_busy_is_a_no_op() {
        let gw = Arc::new(FakeGateway::gated());
        let chat = ChatSurface::new(gw.clone());

        let probe = async {
            gw.gate().entered.notified().await;
            let before = chat.snapshot();
            assert!(before.busy);
            assert_eq!(before.conversation.len(), 1);

            assert!(!chat.submit("دوم").await);
            assert_eq!(chat.snapshot(), before);
            gw.gate().release.notify_one();
        };
        let (accepted, ()) = tokio::join!(chat.submit("اول"), probe);

        assert!(accepted);
        let state = chat.snapshot();
        assert!(!state.busy);
        assert_eq!(state.conversation.len(), 2);
        assert_eq!(gw.prompts.lock().len(), 1);
    }

    #[tokio::test]
    async fn test_failure_becomes_model_message() {
        let gw = Arc::new(FakeGateway::replying(vec![Err(GatewayError::Upstream(
            "500".into(),
        ))]));
        let chat = ChatSurface::new(gw);

        assert!(chat.submit("سلام").await);
        let state = chat.snapshot();
        let last = state.conversation.last().unwrap();
        assert_eq!(last.role, Role::Model);
        assert_eq!(last.text, strings::CHAT_FAILED);
        assert!(!state.busy);
    }

    #[tokio::test]
    async fn test_unavailable_gateway_text() {
        let chat = ChatSurface::new(Arc::new(providers::OfflineGateway));
        assert!(chat.submit("سلام").await);
        assert_eq!(
            chat.snapshot().conversation.last().unwrap().text,
            strings::CHAT_UNAVAILABLE
        );
    }

    #[tokio::test]
    async fn test_reset_clears_transcript_and_dialogue() {
        let gw = Arc::new(FakeGateway::default());
        let chat = ChatSurface::new(gw.clone());
        chat.submit("سلام").await;

        chat.reset();
        assert!(chat.snapshot().conversation.is_empty());
        assert_eq!(*gw.resets.lock(), 1);
    }

    #[tokio::test]
    async fn test_reply_after_reset_is_discarded() {
        let gw = Arc::new(FakeGateway::gated());
        let chat = ChatSurface::new(gw.clone());

        let interrupt = async {
            gw.gate().entered.notified().await;
            chat.reset();
            assert!(chat.snapshot().conversation.is_empty());
            gw.gate().release.notify_one();
        };
        let (accepted, ()) = tokio::join!(chat.submit("قبل از شروع دوباره"), interrupt);

        assert!(accepted);
        let state = chat.snapshot();
        assert!(state.conversation.is_empty());
        assert!(!state.busy);
        assert_eq!(*gw.resets.lock(), 1);
    }
}
