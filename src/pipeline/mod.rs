pub mod aggregator;
pub mod fallback;
pub mod orchestrator;
pub mod prompt;
pub mod sequencer;
pub mod translate;

pub use orchestrator::{GenerationSettings, PoemOutcome, PoemPipeline};
pub use sequencer::{BoardRegistry, DisplayedPoem, GenerationTicket, PoemBoard};
pub use translate::{Translation, translate};
