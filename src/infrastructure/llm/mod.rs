mod gemini_engine;
mod mock_engine;

pub use gemini_engine::GeminiAnalysisEngine;
pub use mock_engine::MockAnalysisEngine;
