pub mod enhance;
pub mod extract;
pub mod recognizer;

pub use enhance::{encode_png, enhance};
pub use extract::extract_text;
pub use recognizer::TesseractRecognizer;
