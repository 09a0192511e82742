pub mod deck;
pub mod export;
pub mod intake;
pub mod pptx;

pub use export::{export_outline, ExportError};
pub use intake::{attachment_from_bytes, read_attachment, IntakeError};
