pub mod bench;
pub mod compress;
pub mod config;
pub mod error;
pub mod log;
pub mod record;
pub mod utils;

pub use compress::{Decoded, RecordStream, SerializationStrategy, Strategy, StrategyKind};
pub use config::{AvroCodec, BenchConfig};
pub use error::{BenchError, Result};
pub use record::Record;
