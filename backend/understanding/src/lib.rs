pub mod client;
pub mod vision;

pub use client::RecognitionClient;
pub use vision::{GeminiTransliterator, VisionModel, SYSTEM_INSTRUCTION};
