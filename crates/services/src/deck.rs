//! In-memory slide deck and the layout rules that turn an outline into one.

use shared::outline::Outline;
use shared::strings::DECK_CAPTION;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// 13.333 x 7.5 in (16:9)
    Wide,
}

impl Layout {
    /// Slide size as (cx, cy) in EMU
    pub fn size_emu(&self) -> (i64, i64) {
        match self {
            Layout::Wide => (12_192_000, 6_858_000),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Center,
    Right,
}

impl Align {
    pub fn as_ooxml(&self) -> &'static str {
        match self {
            Align::Center => "ctr",
            Align::Right => "r",
        }
    }
}

/// Vertical placement of text inside its box
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Top,
    Middle,
}

impl Anchor {
    pub fn as_ooxml(&self) -> &'static str {
        match self {
            Anchor::Top => "t",
            Anchor::Middle => "ctr",
        }
    }
}

/// Box position and size as percentages of the slide
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl Frame {
    pub const fn pct(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    /// (x, y, cx, cy) in EMU for the given layout
    pub fn to_emu(&self, layout: Layout) -> (i64, i64, i64, i64) {
        let (cx, cy) = layout.size_emu();
        (
            cx * self.x as i64 / 100,
            cy * self.y as i64 / 100,
            cx * self.w as i64 / 100,
            cy * self.h as i64 / 100,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextStyle {
    pub align: Align,
    pub anchor: Anchor,
    pub font_size_pt: u32,
    pub bold: bool,
    /// RGB hex without '#', e.g. "0088CC"
    pub color: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paragraph {
    pub text: String,
    /// Bullet indent level (1-based); `None` for plain text
    pub bullet: Option<u8>,
}

impl Paragraph {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bullet: None,
        }
    }

    pub fn bullet(text: impl Into<String>, level: u8) -> Self {
        Self {
            text: text.into(),
            bullet: Some(level.max(1)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextBox {
    pub frame: Frame,
    pub style: TextStyle,
    pub paragraphs: Vec<Paragraph>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeckSlide {
    pub text_boxes: Vec<TextBox>,
}

impl DeckSlide {
    pub fn add_text(&mut self, paragraphs: Vec<Paragraph>, frame: Frame, style: TextStyle) {
        self.text_boxes.push(TextBox {
            frame,
            style,
            paragraphs,
        });
    }

    pub fn bullet_count(&self) -> usize {
        self.text_boxes
            .iter()
            .flat_map(|b| &b.paragraphs)
            .filter(|p| p.bullet.is_some())
            .count()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlideDeck {
    pub title: String,
    pub layout: Layout,
    pub rtl: bool,
    pub slides: Vec<DeckSlide>,
}

const TITLE_FRAME: Frame = Frame::pct(5, 40, 90, 20);
const CAPTION_FRAME: Frame = Frame::pct(5, 85, 90, 10);
const HEADING_FRAME: Frame = Frame::pct(5, 5, 90, 15);
const BODY_FRAME: Frame = Frame::pct(5, 25, 90, 70);

impl SlideDeck {
    pub fn new(title: impl Into<String>, layout: Layout, rtl: bool) -> Self {
        Self {
            title: title.into(),
            layout,
            rtl,
            slides: Vec::new(),
        }
    }

    pub fn add_slide(&mut self) -> &mut DeckSlide {
        self.slides.push(DeckSlide::default());
        let last = self.slides.len() - 1;
        &mut self.slides[last]
    }

    /// Wide, right-to-left deck: a title slide, then one slide per outline entry
    pub fn from_outline(outline: &Outline) -> Self {
        let mut deck = SlideDeck::new(outline.title.clone(), Layout::Wide, true);

        let title_slide = deck.add_slide();
        title_slide.add_text(
            vec![Paragraph::plain(outline.title.clone())],
            TITLE_FRAME,
            TextStyle {
                align: Align::Center,
                anchor: Anchor::Middle,
                font_size_pt: 36,
                bold: true,
                color: Some("0088CC"),
            },
        );
        title_slide.add_text(
            vec![Paragraph::plain(DECK_CAPTION)],
            CAPTION_FRAME,
            TextStyle {
                align: Align::Center,
                anchor: Anchor::Middle,
                font_size_pt: 14,
                bold: false,
                color: Some("666666"),
            },
        );

        for source in &outline.slides {
            let slide = deck.add_slide();
            slide.add_text(
                vec![Paragraph::plain(source.title.clone())],
                HEADING_FRAME,
                TextStyle {
                    align: Align::Right,
                    anchor: Anchor::Top,
                    font_size_pt: 28,
                    bold: true,
                    color: Some("005588"),
                },
            );
            let bullets = source
                .content
                .iter()
                .map(|point| Paragraph::bullet(point.clone(), 1))
                .collect();
            slide.add_text(
                bullets,
                BODY_FRAME,
                TextStyle {
                    align: Align::Right,
                    anchor: Anchor::Top,
                    font_size_pt: 18,
                    bold: false,
                    color: None,
                },
            );
        }

        deck
    }
}
