//! One-shot Persian summaries of pasted text.

use crate::state::{SurfaceCell, SurfaceState};
use providers::ModelGateway;
use shared::strings::fallback_for;
use shared::surface::SurfaceKind;
use std::sync::Arc;
use tokio::sync::watch;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SummarizerState {
    pub summary: Option<String>,
    pub error: Option<String>,
    pub busy: bool,
}

impl SurfaceState for SummarizerState {
    fn is_busy(&self) -> bool {
        self.busy
    }
    fn set_busy(&mut self, busy: bool) {
        self.busy = busy;
    }
}

pub struct SummarizerSurface {
    gateway: Arc<dyn ModelGateway>,
    cell: SurfaceCell<SummarizerState>,
}

impl SummarizerSurface {
    pub fn new(gateway: Arc<dyn ModelGateway>) -> Self {
        Self {
            gateway,
            cell: SurfaceCell::new(SummarizerState::default()),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<SummarizerState> {
        self.cell.subscribe()
    }

    pub fn snapshot(&self) -> SummarizerState {
        self.cell.snapshot()
    }

    pub async fn submit(&self, source: &str) -> bool {
        let source = source.trim();
        if source.is_empty() {
            return false;
        }
        let Some(guard) = self.cell.try_begin(
            |_| true,
            |s| {
                s.summary = None;
                s.error = None;
            },
        ) else {
            return false;
        };

        let outcome = self.gateway.summarize(source).await;
        guard.finish(|s| match outcome {
            Ok(summary) => s.summary = Some(summary),
            Err(e) => s.error = Some(fallback_for(SurfaceKind::Summarizer, &e).to_string()),
        });
        true
    }

    pub fn reset(&self) {
        self.cell.update(|s| {
            s.summary = None;
            s.error = None;
        });
    }
}
