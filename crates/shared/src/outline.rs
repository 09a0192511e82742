//! Structured presentation content produced by a single generation call.

use serde::{Deserialize, Serialize};

/// One content slide: a heading and its bullet points
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Slide {
    pub title: String,
    pub content: Vec<String>,
}

/// A complete presentation outline
///
/// Either the whole outline parses or none of it does; there is no partially
/// populated state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Outline {
    pub title: String,
    pub slides: Vec<Slide>,
}

impl Outline {
    /// Parse a raw structured response, rejecting any deviation from the schema
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw.trim())
    }

    /// Title slide plus one slide per entry
    pub fn deck_len(&self) -> usize {
        self.slides.len() + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_complete_outline() {
        let raw = r#"
            {"title": "تاریخ ایران", "slides": [
                {"title": "هخامنشیان", "content": ["کوروش", "داریوش"]},
                {"title": "ساسانیان", "content": []}
            ]}
        "#;
        let outline = Outline::from_json(raw).unwrap();
        assert_eq!(outline.title, "تاریخ ایران");
        assert_eq!(outline.slides.len(), 2);
        assert_eq!(outline.slides[0].content, vec!["کوروش", "داریوش"]);
        assert_eq!(outline.deck_len(), 3);
    }

    #[test]
    fn test_missing_content_is_rejected() {
        let raw = r#"{"title": "T", "slides": [{"title": "a", "content": ["x"]}, {"title": "b"}]}"#;
        assert!(Outline::from_json(raw).is_err());
    }

    #[test]
    fn test_wrong_types_are_rejected() {
        assert!(Outline::from_json(r#"{"title": "T", "slides": {"title": "a"}}"#).is_err());
        assert!(Outline::from_json(r#"{"title": 3, "slides": []}"#).is_err());
        assert!(Outline::from_json(r#"{"title": "T", "slides": [{"title": "a", "content": [1]}]}"#).is_err());
    }

    #[test]
    fn test_not_json_is_rejected() {
        assert!(Outline::from_json("Here is your presentation:").is_err());
    }
}
