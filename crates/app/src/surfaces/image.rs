//! Text-to-image synthesis.

use crate::state::{SurfaceCell, SurfaceState};
use providers::ModelGateway;
use shared::agent_api::GeneratedImage;
use shared::strings::fallback_for;
use shared::surface::SurfaceKind;
use std::sync::Arc;
use tokio::sync::watch;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageState {
    pub image: Option<GeneratedImage>,
    pub error: Option<String>,
    pub busy: bool,
}

impl SurfaceState for ImageState {
    fn is_busy(&self) -> bool {
        self.busy
    }
    fn set_busy(&mut self, busy: bool) {
        self.busy = busy;
    }
}

pub struct ImageSurface {
    gateway: Arc<dyn ModelGateway>,
    cell: SurfaceCell<ImageState>,
}

impl ImageSurface {
    pub fn new(gateway: Arc<dyn ModelGateway>) -> Self {
        Self {
            gateway,
            cell: SurfaceCell::new(ImageState::default()),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<ImageState> {
        self.cell.subscribe()
    }

    pub fn snapshot(&self) -> ImageState {
        self.cell.snapshot()
    }

    pub async fn submit(&self, prompt: &str) -> bool {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return false;
        }
        let Some(guard) = self.cell.try_begin(
            |_| true,
            |s| {
                s.image = None;
                s.error = None;
            },
        ) else {
            return false;
        };

        let outcome = self.gateway.synthesize_image(prompt).await;
        guard.finish(|s| match outcome {
            Ok(image) => s.image = Some(image),
            Err(e) => s.error = Some(fallback_for(SurfaceKind::Image, &e).to_string()),
        });
        true
    }

    pub fn reset(&self) {
        self.cell.update(|s| {
            s.image = None;
            s.error = None;
        });
    }
}
