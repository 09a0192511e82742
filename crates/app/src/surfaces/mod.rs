//! Session orchestrators, one per user-facing surface.
//!
//! Every surface follows the same shape: validate input, claim the busy flag,
//! call the shared gateway, then write either the result or a localized
//! failure text into its observable state.

pub mod chat;
pub mod file_qna;
pub mod image;
pub mod presentation;
pub mod summarizer;

pub use chat::{ChatState, ChatSurface};
pub use file_qna::{FileQnaState, FileQnaSurface};
pub use image::{ImageState, ImageSurface};
pub use presentation::{PresentationState, PresentationSurface};
pub use summarizer::{SummarizerState, SummarizerSurface};
