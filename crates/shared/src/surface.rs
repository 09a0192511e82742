use serde::{Deserialize, Serialize};

/// The five independent tools of the assistant
#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Debug, Hash)]
pub enum SurfaceKind {
    Chat,
    FileQna,
    Summarizer,
    Image,
    Presentation,
}

impl SurfaceKind {
    pub fn all() -> &'static [SurfaceKind] {
        &[
            SurfaceKind::Chat,
            SurfaceKind::FileQna,
            SurfaceKind::Summarizer,
            SurfaceKind::Image,
            SurfaceKind::Presentation,
        ]
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SurfaceKind::Chat => "گفتگو",
            SurfaceKind::FileQna => "پرسش از فایل",
            SurfaceKind::Summarizer => "خلاصه‌ساز",
            SurfaceKind::Image => "تولید تصویر",
            SurfaceKind::Presentation => "ساخت ارائه",
        }
    }
}
