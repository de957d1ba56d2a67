//! Tesseract-backed implementation of the recognition engine.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use tesseract::Tesseract;
use tracing::debug;

use redpen_core::TextRecognizer;

/// Recognizer driving a local Tesseract install through its C bindings.
///
/// The engine is synchronous, so each call runs on the blocking pool. A
/// fresh engine is initialized per page; handwriting pages are large enough
/// that init cost is noise next to recognition itself.
pub struct TesseractRecognizer {
    language: String,
}

impl TesseractRecognizer {
    /// `language` is a Tesseract traineddata name, e.g. `chi_tra` for
    /// Traditional Chinese script.
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
        }
    }
}

#[async_trait]
impl TextRecognizer for TesseractRecognizer {
    fn name(&self) -> &str {
        "tesseract"
    }

    async fn recognize(&self, image: &[u8]) -> Result<String> {
        let language = self.language.clone();
        let image = image.to_vec();

        debug!(lang = %language, bytes = image.len(), "Running Tesseract");

        tokio::task::spawn_blocking(move || {
            let text = Tesseract::new(None, Some(&language))
                .map_err(|e| anyhow!("Tesseract init: {}", e))?
                .set_image_from_mem(&image)
                .map_err(|e| anyhow!("Tesseract image: {}", e))?
                .recognize()
                .map_err(|e| anyhow!("Tesseract recognize: {}", e))?
                .get_text()
                .map_err(|e| anyhow!("OCR text: {}", e))?;
            Ok(text)
        })
        .await
        .map_err(|e| anyhow!("recognition task panicked: {}", e))?
    }
}
