pub mod corpus;
pub mod progress;
pub mod verify;

pub use corpus::{load_corpus, CorpusEntry};
pub use progress::create_progress_bar;
pub use verify::{verify_roundtrip, Restored};
