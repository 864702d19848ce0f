pub mod extraction;
pub mod generation_llm;

pub use extraction::DocumentTextExtractor;
pub use generation_llm::OpenAiGenerationAdapter;
