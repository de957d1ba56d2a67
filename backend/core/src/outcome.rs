use std::fmt;

use crate::record::GradingPayload;

/// Why a grading call resolved to the deterministic generator instead of the
/// completion endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    /// No credential configured; designed offline mode, not an error.
    MissingApiKey,
    /// Endpoint answered 402; the user is told mock data is in use.
    QuotaExhausted,
    /// Endpoint answered, but no parsable grading JSON came back.
    MalformedResponse,
    /// Connection-level failure or an unclassified endpoint error.
    Transport,
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::MissingApiKey => "missing_api_key",
            Self::QuotaExhausted => "quota_exhausted",
            Self::MalformedResponse => "malformed_response",
            Self::Transport => "transport",
        };
        f.write_str(s)
    }
}

/// Result of one grading call.
///
/// Callers can distinguish silent degradation from a real endpoint result
/// without re-deriving it from status codes; user-fatal failures travel as
/// `RedpenError` instead.
#[derive(Debug, Clone)]
pub enum GradeOutcome {
    /// The completion endpoint produced this payload.
    Graded(GradingPayload),
    /// The deterministic generator produced this payload.
    Fallback {
        payload: GradingPayload,
        reason: FallbackReason,
    },
}

impl GradeOutcome {
    pub fn payload(&self) -> &GradingPayload {
        match self {
            Self::Graded(payload) => payload,
            Self::Fallback { payload, .. } => payload,
        }
    }

    pub fn into_payload(self) -> GradingPayload {
        match self {
            Self::Graded(payload) => payload,
            Self::Fallback { payload, .. } => payload,
        }
    }

    pub fn fallback_reason(&self) -> Option<FallbackReason> {
        match self {
            Self::Graded(_) => None,
            Self::Fallback { reason, .. } => Some(*reason),
        }
    }
}
