//! Pulls the structured grading result out of a completion response.

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;

use redpen_core::GradingPayload;

/// Greedy span from the first `{` to the last `}`; completion responses
/// routinely wrap the JSON in prose or a code fence.
static JSON_OBJECT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\{.*\}").unwrap());

/// Extract and parse the first brace-delimited JSON object in `content`.
///
/// The endpoint never echoes the essay back, so `original_text` is filled
/// in here from the submitted text.
pub fn parse_grading_response(content: &str, original_text: &str) -> Result<GradingPayload> {
    let object = JSON_OBJECT
        .find(content)
        .context("no JSON object in response")?;

    let mut payload: GradingPayload = serde_json::from_str(object.as_str())
        .context("response JSON does not match the grading shape")?;
    payload.original_text = original_text.to_string();

    Ok(payload)
}
