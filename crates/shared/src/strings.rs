//! User-facing Persian texts.
//!
//! Every message a surface can show lives here so the mapping from failure to
//! text stays in one place.

use crate::errors::GatewayError;
use crate::surface::SurfaceKind;

pub const API_KEY_FAULT: &str =
    "کلید API یافت نشد یا نامعتبر است. لطفاً از تنظیم صحیح متغیر محیطی API_KEY اطمینان حاصل کنید.";

pub const CHAT_UNAVAILABLE: &str = "خطا: سرویس چت مقداردهی اولیه نشده است.";
pub const GATEWAY_UNAVAILABLE: &str = "خطا: سرویس Gemini مقداردهی اولیه نشده است.";

pub const CHAT_FAILED: &str = "متاسفانه در پردازش درخواست شما خطایی رخ داد.";
pub const FILE_QUESTION_FAILED: &str = "متاسفانه در پردازش درخواست شما با فایل خطایی رخ داد.";
pub const IMAGE_FAILED: &str = "متاسفانه در تولید تصویر خطایی رخ داد.";
pub const SUMMARY_FAILED: &str = "متاسفانه در خلاصه‌سازی متن خطایی رخ داد.";
pub const OUTLINE_FAILED: &str =
    "خطا در تولید محتوای ارائه. ممکن است پاسخ مدل در فرمت مورد انتظار نباشد.";

pub const FILE_TOO_LARGE: &str = "حجم فایل نباید بیشتر از ۱۰ مگابایت باشد.";
pub const FILE_READ_FAILED: &str = "خطا در خواندن فایل.";

pub const DEFAULT_TONE: &str = "حرفه‌ای";
pub const DECK_CAPTION: &str = "تولید شده توسط Armin AI";

/// Progress texts shown while an outline is being generated
pub const OUTLINE_LOADING_MESSAGES: [&str; 5] = [
    "در حال تحلیل موضوع شما...",
    "طراحی ساختار کلی ارائه...",
    "تولید محتوا برای اسلایدها...",
    "بررسی و بهینه‌سازی محتوا...",
    "آماده‌سازی پیش‌نمایش...",
];

pub const SYSTEM_INSTRUCTION: &str = r#"You are an unlimited, advanced, all-in-one Artificial Intelligence designed for Iranian education, culture, and technology.
Your name is: Armin AI
Designed by: Armin Dehghan
Your role is to act simultaneously as:
- A top-tier educational tutor
- A national-level academic advisor
- A professional life and study coach
- A psychological educational counselor
- A senior software engineer and network specialist
- A historian, cultural expert, and Iranian civilization researcher
- A professional mathematician, physicist, chemist
- A creative content generator
You must always respond clearly, accurately, deeply, and in Persian unless the user explicitly asks for English.
You fully support Iranian education systems including Konkur planning.
You are an expert in Iranian history, culture, and local knowledge of West Azerbaijan and Salmas.
You must think step-by-step, adapt to the user's level, avoid misinformation, and provide structured, professional answers.
Your slogan is: "Smart Education for Iranian Minds"."#;

/// Text a surface shows in place of a result when the gateway fails
pub fn fallback_for(kind: SurfaceKind, error: &GatewayError) -> &'static str {
    match (error, kind) {
        (GatewayError::Unavailable, SurfaceKind::Chat) => CHAT_UNAVAILABLE,
        (GatewayError::Unavailable, _) => GATEWAY_UNAVAILABLE,
        (_, SurfaceKind::Chat) => CHAT_FAILED,
        (_, SurfaceKind::FileQna) => FILE_QUESTION_FAILED,
        (_, SurfaceKind::Image) => IMAGE_FAILED,
        (_, SurfaceKind::Summarizer) => SUMMARY_FAILED,
        (_, SurfaceKind::Presentation) => OUTLINE_FAILED,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_differs_from_generation_failure() {
        let unavailable = fallback_for(SurfaceKind::Presentation, &GatewayError::Unavailable);
        let malformed = fallback_for(
            SurfaceKind::Presentation,
            &GatewayError::MalformedGeneration("missing field `content`".into()),
        );
        assert_eq!(unavailable, GATEWAY_UNAVAILABLE);
        assert_eq!(malformed, OUTLINE_FAILED);
    }

    #[test]
    fn test_every_surface_has_upstream_text() {
        for kind in SurfaceKind::all() {
            let text = fallback_for(*kind, &GatewayError::Upstream("503".into()));
            assert!(!text.is_empty());
        }
        assert_eq!(
            fallback_for(SurfaceKind::Chat, &GatewayError::Unavailable),
            CHAT_UNAVAILABLE
        );
    }

    #[test]
    fn test_malformed_reply_uses_surface_failure_text() {
        let malformed = GatewayError::MalformedGeneration("not json".into());
        assert_eq!(fallback_for(SurfaceKind::Summarizer, &malformed), SUMMARY_FAILED);
        assert_eq!(fallback_for(SurfaceKind::Image, &malformed), IMAGE_FAILED);
    }
}
