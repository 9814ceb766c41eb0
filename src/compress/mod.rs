pub mod artifact;
pub mod compact;
pub mod document;
pub mod schema;
pub mod strategy;
pub mod text;
pub mod worker;

pub use artifact::{artifact_path, ensure_extension};
pub use compact::CompactBinaryMapStrategy;
pub use document::DocumentBinaryStrategy;
pub use schema::{RecordStream, SchemaBinaryStrategy};
pub use strategy::{Decoded, SerializationStrategy, Strategy, StrategyKind};
pub use text::TextStrategy;
pub use worker::{BenchWorker, Measurement};
