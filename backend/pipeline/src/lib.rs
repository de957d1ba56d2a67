//! The grading-result acquisition pipeline.
//!
//! One submit action chains the stages strictly in sequence: read page
//! images, enhance and recognize each, grade the combined text, persist the
//! result. No stage overlaps another and nothing is retried; once
//! submitted, the only bound on a hung endpoint is the HTTP client timeout.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use redpen_core::{FallbackReason, GradingRecord, RedpenError, TextRecognizer};
use redpen_grader::EssayGrader;
use redpen_history::HistoryStore;
use redpen_ocr::extract_text;

/// Result of one submit: the new history id, the stored record, and whether
/// the grade came from the offline generator (and why).
#[derive(Debug)]
pub struct SubmitOutcome {
    pub id: i64,
    pub record: GradingRecord,
    pub fallback: Option<FallbackReason>,
}

/// Wires the recognizer and grader into one submit action against a
/// history store.
pub struct GradingPipeline {
    recognizer: Arc<dyn TextRecognizer>,
    grader: EssayGrader,
}

impl GradingPipeline {
    pub fn new(recognizer: Arc<dyn TextRecognizer>, grader: EssayGrader) -> Self {
        Self { recognizer, grader }
    }

    /// Run one essay through the whole pipeline.
    ///
    /// Fatal grading errors (rejected credential, rate limit) and any
    /// image-processing failure abort before anything is persisted.
    pub async fn submit(
        &self,
        history: &mut HistoryStore,
        image_paths: &[PathBuf],
    ) -> Result<SubmitOutcome, RedpenError> {
        let mut blobs = Vec::with_capacity(image_paths.len());
        for path in image_paths {
            let blob = tokio::fs::read(path)
                .await
                .with_context(|| format!("failed to read {}", path.display()))?;
            blobs.push(blob);
        }

        info!(pages = blobs.len(), "Processing page images");
        let essay = extract_text(self.recognizer.as_ref(), &blobs).await?;

        info!(chars = essay.chars().count(), "Grading essay text");
        let outcome = self.grader.grade(&essay).await?;
        let fallback = outcome.fallback_reason();

        let images = image_paths
            .iter()
            .map(|p| p.display().to_string())
            .collect();
        let id = history.append(images, outcome.into_payload())?;

        // append just inserted at the front, so the record is there
        let record = history
            .get(id)
            .cloned()
            .ok_or_else(|| RedpenError::Storage("appended record missing".to_string()))?;

        info!(id, total_score = record.payload.total_score, "Essay graded and saved");

        Ok(SubmitOutcome {
            id,
            record,
            fallback,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use image::{DynamicImage, Rgba, RgbaImage};
    use redpen_grader::{MockChatProvider, MockFailure};
    use std::io::Cursor;

    struct FixedRecognizer(&'static str);

    #[async_trait]
    impl TextRecognizer for FixedRecognizer {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn recognize(&self, _image: &[u8]) -> anyhow::Result<String> {
            Ok(self.0.to_string())
        }
    }

    fn write_page(dir: &std::path::Path, name: &str) -> PathBuf {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(4, 4, Rgba([255; 4])));
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, image::ImageFormat::Png).unwrap();
        let path = dir.join(name);
        std::fs::write(&path, buf.into_inner()).unwrap();
        path
    }

    fn offline_pipeline(text: &'static str) -> GradingPipeline {
        GradingPipeline::new(Arc::new(FixedRecognizer(text)), EssayGrader::offline())
    }

    #[tokio::test]
    async fn test_submit_persists_and_returns_the_record() {
        let dir = tempfile::tempdir().unwrap();
        let page = write_page(dir.path(), "page1.png");
        let mut history = HistoryStore::in_memory();

        let pipeline = offline_pipeline("我的志願");
        let outcome = pipeline.submit(&mut history, &[page.clone()]).await.unwrap();

        assert_eq!(outcome.fallback, Some(FallbackReason::MissingApiKey));
        assert_eq!(outcome.record.payload.original_text, "我的志願");
        assert_eq!(outcome.record.images, vec![page.display().to_string()]);
        assert_eq!(history.len(), 1);
        assert_eq!(history.get(outcome.id).unwrap(), &outcome.record);
    }

    #[tokio::test]
    async fn test_rejected_credential_aborts_before_any_insert() {
        let dir = tempfile::tempdir().unwrap();
        let page = write_page(dir.path(), "page1.png");
        let mut history = HistoryStore::in_memory();

        let grader = EssayGrader::new(
            Arc::new(MockChatProvider::new("mock").failing_with(MockFailure::Unauthorized)),
            "deepseek-chat",
        );
        let pipeline = GradingPipeline::new(Arc::new(FixedRecognizer("作文")), grader);

        let err = pipeline.submit(&mut history, &[page]).await.unwrap_err();
        assert!(matches!(err, RedpenError::InvalidApiKey));
        assert!(history.is_empty());
    }

    #[tokio::test]
    async fn test_quota_exhaustion_still_persists_the_fallback_record() {
        let dir = tempfile::tempdir().unwrap();
        let page = write_page(dir.path(), "page1.png");
        let mut history = HistoryStore::in_memory();

        let grader = EssayGrader::new(
            Arc::new(MockChatProvider::new("mock").failing_with(MockFailure::PaymentRequired)),
            "deepseek-chat",
        );
        let pipeline = GradingPipeline::new(Arc::new(FixedRecognizer("餘額不足的作文")), grader);

        let outcome = pipeline.submit(&mut history, &[page]).await.unwrap();
        assert_eq!(outcome.fallback, Some(FallbackReason::QuotaExhausted));
        assert_eq!(history.len(), 1);
        assert_eq!(
            history.get(outcome.id).unwrap().payload.original_text,
            "餘額不足的作文"
        );
    }

    #[tokio::test]
    async fn test_missing_image_file_aborts_before_any_insert() {
        let mut history = HistoryStore::in_memory();
        let pipeline = offline_pipeline("unused");

        let missing = PathBuf::from("/nonexistent/page.png");
        let err = pipeline.submit(&mut history, &[missing]).await.unwrap_err();
        assert!(matches!(err, RedpenError::Other(_)));
        assert!(history.is_empty());
    }
}
