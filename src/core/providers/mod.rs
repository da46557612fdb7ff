//! Provider implementations

pub mod gemini;
pub mod vertexai;

pub use gemini::GeminiProvider;
pub use vertexai::VertexAIProvider;
