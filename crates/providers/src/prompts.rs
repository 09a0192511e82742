//! Instruction templates and the outline response schema.

use serde_json::{json, Value};

/// Question about an uploaded file, naming the file so the model can refer to it
pub fn file_question(file_name: &str, question: &str) -> String {
    format!(
        "با توجه به فایل آپلود شده به نام \"{}\"، به سوال زیر پاسخ بده:\n\n{}",
        file_name, question
    )
}

pub fn summary(source: &str) -> String {
    format!(
        "لطفاً متن زیر را به زبان فارسی به صورت دقیق و جامع خلاصه کن:\n\n---\n{}\n---",
        source
    )
}

/// Presentation instruction: one title slide plus `slide_count - 1` content slides
pub fn outline(topic: &str, slide_count: u32, tone: &str) -> String {
    format!(
        "یک ارائه پاورپوینت درباره موضوع زیر با لحن '{}' بساز. این ارائه باید شامل یک اسلاید عنوان و {} اسلاید محتوایی باشد. برای هر اسلاید محتوایی، یک عنوان و چند نکته کلیدی (bullet points) ارائه بده. کل محتوا باید به زبان فارسی باشد.\nموضوع: {}",
        tone,
        slide_count.saturating_sub(1),
        topic
    )
}

/// Response schema constraining outline generation
pub fn outline_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "title": {
                "type": "STRING",
                "description": "عنوان اصلی کل ارائه"
            },
            "slides": {
                "type": "ARRAY",
                "description": "لیست اسلایدهای ارائه",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "title": {
                            "type": "STRING",
                            "description": "عنوان این اسلاید"
                        },
                        "content": {
                            "type": "ARRAY",
                            "description": "لیست نکات کلیدی (bullet points) برای این اسلاید",
                            "items": { "type": "STRING" }
                        }
                    },
                    "required": ["title", "content"]
                }
            }
        },
        "required": ["title", "slides"]
    })
}
