//! Turns a stack of page photos into one essay text.

use anyhow::{Context, Result};
use tracing::{debug, warn};

use redpen_core::{RedpenError, TextRecognizer};

use crate::enhance::{encode_png, enhance};

/// Recognize an ordered sequence of page images and join the results.
///
/// Pages are processed strictly one after another: decode, enhance,
/// recognize. Per-page texts are joined with a blank line and the combined
/// text is trimmed. Any decode or recognition failure aborts the whole
/// extraction (no partial results, no retry) and surfaces as the single
/// user-facing image-processing error.
pub async fn extract_text(
    recognizer: &dyn TextRecognizer,
    images: &[Vec<u8>],
) -> Result<String, RedpenError> {
    let mut texts = Vec::with_capacity(images.len());

    for (index, blob) in images.iter().enumerate() {
        match recognize_page(recognizer, blob).await {
            Ok(text) => {
                debug!(
                    page = index + 1,
                    chars = text.chars().count(),
                    engine = recognizer.name(),
                    "Page recognized"
                );
                texts.push(text);
            }
            Err(e) => {
                warn!(page = index + 1, error = %e, "Page recognition failed");
                return Err(RedpenError::ImageProcessing);
            }
        }
    }

    Ok(texts.join("\n\n").trim().to_string())
}

async fn recognize_page(recognizer: &dyn TextRecognizer, blob: &[u8]) -> Result<String> {
    let decoded = image::load_from_memory(blob).context("image decode failed")?;
    let enhanced = enhance(&decoded);
    let png = encode_png(&enhanced)?;
    recognizer.recognize(&png).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use image::{DynamicImage, Rgba, RgbaImage};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct MockRecognizer {
        pages: Vec<&'static str>,
        calls: AtomicUsize,
    }

    impl MockRecognizer {
        fn new(pages: Vec<&'static str>) -> Self {
            Self {
                pages,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl TextRecognizer for MockRecognizer {
        fn name(&self) -> &str {
            "mock"
        }

        async fn recognize(&self, _image: &[u8]) -> Result<String> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            match self.pages.get(call) {
                Some(text) => Ok(text.to_string()),
                None => anyhow::bail!("engine refused page {call}"),
            }
        }
    }

    fn page_blob() -> Vec<u8> {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(2, 2, Rgba([255; 4])));
        encode_png(&img).unwrap()
    }

    #[tokio::test]
    async fn test_pages_joined_with_blank_line_and_trimmed() {
        let recognizer = MockRecognizer::new(vec!["第一頁內容\n", "第二頁內容\n"]);
        let blobs = vec![page_blob(), page_blob()];
        let text = extract_text(&recognizer, &blobs).await.unwrap();
        assert_eq!(text, "第一頁內容\n\n\n第二頁內容");
    }

    #[tokio::test]
    async fn test_single_page_is_trimmed() {
        let recognizer = MockRecognizer::new(vec!["  作文內容  \n\n"]);
        let text = extract_text(&recognizer, &[page_blob()]).await.unwrap();
        assert_eq!(text, "作文內容");
    }

    #[tokio::test]
    async fn test_no_pages_yields_empty_text() {
        let recognizer = MockRecognizer::new(vec![]);
        let text = extract_text(&recognizer, &[]).await.unwrap();
        assert_eq!(text, "");
    }

    #[tokio::test]
    async fn test_undecodable_blob_is_image_processing_error() {
        let recognizer = MockRecognizer::new(vec!["unused"]);
        let err = extract_text(&recognizer, &[vec![0xde, 0xad, 0xbe, 0xef]])
            .await
            .unwrap_err();
        assert!(matches!(err, RedpenError::ImageProcessing));
    }

    #[tokio::test]
    async fn test_recognizer_failure_aborts_without_partial_result() {
        // Second page fails; nothing from the first page survives
        let recognizer = MockRecognizer::new(vec!["第一頁"]);
        let err = extract_text(&recognizer, &[page_blob(), page_blob()])
            .await
            .unwrap_err();
        assert!(matches!(err, RedpenError::ImageProcessing));
    }
}
