pub mod buffer;
pub mod format;

pub use buffer::{Utterance, UtteranceBuffer};
pub use format::AudioFormat;
