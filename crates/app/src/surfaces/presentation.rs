//! Presentation outlines and their export to a slide deck.
//!
//! While an outline is generating, the surface walks through a fixed list of
//! progress messages. The walk is tied to the request: it stops at the last
//! message or as soon as the request finishes, whichever is first.

use crate::state::{SurfaceCell, SurfaceState};
use providers::ModelGateway;
use services::{export_outline, ExportError};
use shared::outline::Outline;
use shared::settings::PresentationDefaults;
use shared::strings::{fallback_for, OUTLINE_LOADING_MESSAGES};
use shared::surface::SurfaceKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::debug;

pub const MIN_SLIDES: u32 = 2;
pub const LOADING_STEP: Duration = Duration::from_millis(1500);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresentationState {
    pub slide_count: u32,
    pub tone: String,
    pub outline: Option<Outline>,
    pub error: Option<String>,
    pub loading_message: Option<&'static str>,
    pub busy: bool,
}

impl PresentationState {
    fn from_defaults(defaults: &PresentationDefaults) -> Self {
        Self {
            slide_count: defaults.slide_count.max(MIN_SLIDES),
            tone: defaults.tone.clone(),
            outline: None,
            error: None,
            loading_message: None,
            busy: false,
        }
    }
}

impl SurfaceState for PresentationState {
    fn is_busy(&self) -> bool {
        self.busy
    }
    fn set_busy(&mut self, busy: bool) {
        self.busy = busy;
    }
}

pub struct PresentationSurface {
    gateway: Arc<dyn ModelGateway>,
    cell: SurfaceCell<PresentationState>,
}

impl PresentationSurface {
    pub fn new(gateway: Arc<dyn ModelGateway>, defaults: &PresentationDefaults) -> Self {
        Self {
            gateway,
            cell: SurfaceCell::new(PresentationState::from_defaults(defaults)),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<PresentationState> {
        self.cell.subscribe()
    }

    pub fn snapshot(&self) -> PresentationState {
        self.cell.snapshot()
    }

    /// Counts below two are refused and leave the current value
    pub fn set_slide_count(&self, count: u32) -> bool {
        if count < MIN_SLIDES {
            return false;
        }
        self.cell.update(|s| s.slide_count = count);
        true
    }

    pub fn set_tone(&self, tone: &str) -> bool {
        let tone = tone.trim();
        if tone.is_empty() {
            return false;
        }
        self.cell.update(|s| s.tone = tone.to_string());
        true
    }

    pub async fn submit(&self, topic: &str) -> bool {
        let topic = topic.trim();
        if topic.is_empty() {
            return false;
        }

        let mut params = None;
        let Some(guard) = self.cell.try_begin(
            |_| true,
            |s| {
                s.outline = None;
                s.error = None;
                s.loading_message = Some(OUTLINE_LOADING_MESSAGES[0]);
                params = Some((s.slide_count, s.tone.clone()));
            },
        ) else {
            debug!("outline already generating");
            return false;
        };
        let Some((slide_count, tone)) = params else {
            return false;
        };

        let request = self.gateway.generate_outline(topic, slide_count, &tone);
        tokio::pin!(request);
        let outcome = tokio::select! {
            outcome = &mut request => outcome,
            () = self.rotate_loading_messages() => request.await,
        };

        guard.finish(|s| {
            s.loading_message = None;
            match outcome {
                Ok(outline) => s.outline = Some(outline),
                Err(e) => s.error = Some(fallback_for(SurfaceKind::Presentation, &e).to_string()),
            }
        });
        true
    }

    async fn rotate_loading_messages(&self) {
        for message in &OUTLINE_LOADING_MESSAGES[1..] {
            tokio::time::sleep(LOADING_STEP).await;
            self.cell.update(|s| s.loading_message = Some(*message));
        }
    }

    /// Write the current outline as `{title}.pptx` into `dir`.
    /// Without an outline there is nothing to do.
    pub fn export(&self, dir: &Path) -> Result<Option<PathBuf>, ExportError> {
        let Some(outline) = self.cell.read(|s| s.outline.clone()) else {
            return Ok(None);
        };
        export_outline(&outline, dir).map(Some)
    }

    pub fn reset(&self) {
        self.cell.update(|s| {
            s.outline = None;
            s.error = None;
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surfaces::fakes::{sample_outline, FakeGateway};
    use shared::strings;
    use shared::GatewayError;
    use tempfile::tempdir;

    fn surface(gw: Arc<FakeGateway>) -> PresentationSurface {
        PresentationSurface::new(gw, &PresentationDefaults::default())
    }

    #[tokio::test]
    async fn test_defaults_and_parameters_reach_gateway() {
        let gw = Arc::new(FakeGateway::default());
        let deck = surface(gw.clone());
        assert_eq!(deck.snapshot().slide_count, 5);
        assert_eq!(deck.snapshot().tone, strings::DEFAULT_TONE);

        assert!(!deck.set_slide_count(1));
        assert_eq!(deck.snapshot().slide_count, 5);
        assert!(deck.set_slide_count(7));
        assert!(deck.set_tone("آموزشی"));

        assert!(deck.submit("انرژی خورشیدی").await);
        assert_eq!(*gw.prompts.lock(), vec!["انرژی خورشیدی|7|آموزشی"]);

        let state = deck.snapshot();
        assert_eq!(state.outline, Some(sample_outline("انرژی خورشیدی")));
        assert_eq!(state.loading_message, None);
        assert!(!state.busy);
    }

    #[tokio::test]
    async fn test_malformed_and_unavailable_texts_differ() {
        let gw = Arc::new(FakeGateway::default());
        let deck = surface(gw.clone());

        *gw.outline.lock() = Some(Err(GatewayError::MalformedGeneration("bad json".into())));
        deck.submit("موضوع").await;
        assert_eq!(deck.snapshot().error.as_deref(), Some(strings::OUTLINE_FAILED));
        assert_eq!(deck.snapshot().outline, None);

        let offline = PresentationSurface::new(
            Arc::new(providers::OfflineGateway),
            &PresentationDefaults::default(),
        );
        offline.submit("موضوع").await;
        assert_eq!(
            offline.snapshot().error.as_deref(),
            Some(strings::GATEWAY_UNAVAILABLE)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_loading_messages_advance_while_busy() {
        let gw = Arc::new(FakeGateway::gated());
        let deck = surface(gw.clone());

        let probe = async {
            gw.gate().entered.notified().await;
            assert_eq!(deck.snapshot().loading_message, Some(OUTLINE_LOADING_MESSAGES[0]));

            tokio::time::sleep(LOADING_STEP + Duration::from_millis(100)).await;
            assert_eq!(deck.snapshot().loading_message, Some(OUTLINE_LOADING_MESSAGES[1]));

            tokio::time::sleep(LOADING_STEP * 10).await;
            assert_eq!(deck.snapshot().loading_message, Some(OUTLINE_LOADING_MESSAGES[4]));
            assert!(deck.snapshot().busy);

            gw.gate().release.notify_one();
        };
        let (accepted, ()) = tokio::join!(deck.submit("هوش مصنوعی"), probe);

        assert!(accepted);
        let state = deck.snapshot();
        assert_eq!(state.loading_message, None);
        assert!(!state.busy);
        assert!(state.outline.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_rotation_stops_when_request_finishes() {
        let deck = surface(Arc::new(FakeGateway::default()));
        let mut rx = deck.subscribe();

        assert!(deck.submit("تاریخ").await);
        rx.borrow_and_update();
        tokio::time::sleep(LOADING_STEP * 4).await;

        assert!(!rx.has_changed().unwrap());
        assert_eq!(deck.snapshot().loading_message, None);
    }

    #[tokio::test]
    async fn test_export_writes_deck() {
        let tmp = tempdir().unwrap();
        let deck = surface(Arc::new(FakeGateway::default()));
        assert_eq!(deck.export(tmp.path()).unwrap(), None);

        deck.submit("نجوم").await;
        let path = deck.export(tmp.path()).unwrap().unwrap();
        assert_eq!(path, tmp.path().join("نجوم.pptx"));
        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_reset_keeps_parameters() {
        let deck = surface(Arc::new(FakeGateway::default()));
        deck.set_slide_count(3);
        deck.submit("نجوم").await;

        deck.reset();
        let state = deck.snapshot();
        assert_eq!(state.outline, None);
        assert_eq!(state.slide_count, 3);
    }
}
