use crate::compress::artifact_path;
use crate::compress::strategy::{SerializationStrategy, StrategyKind};
use crate::error::Result;
use crate::utils::corpus::CorpusEntry;
use crate::utils::verify::Restored;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// 单个语料文件在一种策略下的测量结果
#[derive(Debug, Clone)]
pub struct Measurement {
    pub name: String,
    pub source_bytes: u64,
    pub artifact_bytes: u64,
    pub compress: Duration,
    /// 包含把惰性记录流读完的时间
    pub decompress: Duration,
    pub verified: bool,
}

pub struct BenchWorker {
    strategy: SerializationStrategy,
    out_dir: PathBuf,
    keep_artifacts: bool,
}

impl BenchWorker {
    pub fn new(strategy: SerializationStrategy, out_dir: &Path, keep_artifacts: bool) -> Self {
        Self {
            strategy,
            out_dir: out_dir.to_path_buf(),
            keep_artifacts,
        }
    }

    pub fn kind(&self) -> StrategyKind {
        self.strategy.kind()
    }

    pub fn measure(&self, entry: &CorpusEntry) -> Result<Measurement> {
        let path = artifact_path(&self.out_dir, &entry.name, self.kind());

        let start = Instant::now();
        self.strategy.compress(&entry.record, &path)?;
        let compress = start.elapsed();
        let artifact_bytes = std::fs::metadata(&path)?.len();

        let start = Instant::now();
        let restored = Restored::drain(self.strategy.decompress(&path)?)?;
        let decompress = start.elapsed();

        let verified = restored.matches(&entry.record);
        if !verified {
            log::warn!("{}: {} 往返结果与原始记录不一致", self.kind(), entry.name);
        }

        if !self.keep_artifacts {
            std::fs::remove_file(&path)?;
        }

        Ok(Measurement {
            name: entry.name.clone(),
            source_bytes: entry.source_bytes,
            artifact_bytes,
            compress,
            decompress,
            verified,
        })
    }
}
