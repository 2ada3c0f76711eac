mod engine;
mod language;

pub use engine::{EngineFactory, EngineSlot, OcrEngine, OcrError};
pub use language::engine_languages;
