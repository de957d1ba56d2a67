use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::tier::GradeTier;

/// Score and commentary for one rubric category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CategoryScore {
    pub category: String,
    pub score: u8,
    pub comment: String,
}

/// One annotated mistake: the offending phrase, a suggested correction, and
/// why the correction is better.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ErrorNote {
    pub original: String,
    pub correction: String,
    pub explanation: String,
}

/// A phrase the grader singled out as well written.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Highlight {
    pub text: String,
    pub comment: String,
}

/// Three-part structural critique of the essay.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StructureReview {
    pub opening: String,
    pub development: String,
    pub conclusion: String,
}

/// A complete grading result minus the identity fields (`id`, `timestamp`,
/// `images`), which the history store assigns at append time.
///
/// Field names serialize camelCase: this is both the JSON shape the
/// completion endpoint is instructed to emit and the persisted shape.
/// `originalText` is absent from endpoint responses and filled in by the
/// grading client, hence the default.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GradingPayload {
    #[serde(default)]
    pub original_text: String,
    pub total_score: u8,
    pub grade_level: GradeTier,
    pub detailed_scores: Vec<CategoryScore>,
    #[serde(default)]
    pub errors: Vec<ErrorNote>,
    #[serde(default)]
    pub highlights: Vec<Highlight>,
    pub structure: StructureReview,
    pub overall_comment: String,
}

/// One entry of the grading history. Immutable once created; the only
/// mutation the store supports is removal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GradingRecord {
    pub id: i64,
    pub timestamp: DateTime<Utc>,
    /// Opaque references to the submitted page images (source paths).
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(flatten)]
    pub payload: GradingPayload,
}
