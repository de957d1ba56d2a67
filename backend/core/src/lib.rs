pub mod error;
pub mod outcome;
pub mod record;
pub mod tier;
pub mod traits;

pub use error::{ProviderError, RedpenError};
pub use outcome::{FallbackReason, GradeOutcome};
pub use record::{
    CategoryScore, ErrorNote, GradingPayload, GradingRecord, Highlight, StructureReview,
};
pub use tier::GradeTier;
pub use traits::{ChatProvider, ChatRequest, ChatResponse, TextRecognizer};
