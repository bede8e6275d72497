pub mod gemini;
pub mod json_dataset;

pub use gemini::GeminiClient;
pub use json_dataset::DatasetCatalog;
