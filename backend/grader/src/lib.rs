pub mod deepseek;
pub mod fallback;
pub mod grader;
pub mod mock;
pub mod parse;
pub mod prompt;

pub use deepseek::DeepSeekProvider;
pub use fallback::mock_grading_result;
pub use grader::EssayGrader;
pub use mock::{MockChatProvider, MockFailure};
