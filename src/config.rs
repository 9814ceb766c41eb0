use clap::ValueEnum;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Avro 数据块压缩方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AvroCodec {
    #[default]
    Null,
    Deflate,
}

impl AvroCodec {
    pub fn to_avro(self) -> apache_avro::Codec {
        match self {
            AvroCodec::Null => apache_avro::Codec::Null,
            AvroCodec::Deflate => apache_avro::Codec::Deflate,
        }
    }
}

/// 一次基准测试运行所需的全部路径和参数, 显式传给每个调用
#[derive(Debug, Clone)]
pub struct BenchConfig {
    /// 语料目录
    pub corpus_dir: PathBuf,
    /// 产物输出目录, 每种策略一个子目录
    pub output_dir: PathBuf,
    /// Avro schema 文件 (.avsc)
    pub schema_path: PathBuf,
    pub avro_codec: AvroCodec,
    /// 工作线程数
    pub threads: usize,
    /// 运行结束后是否保留产物
    pub keep_artifacts: bool,
    /// 最多加载的语料文件数
    pub limit: Option<usize>,
}

impl BenchConfig {
    pub fn new(
        corpus_dir: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
        schema_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            corpus_dir: corpus_dir.into(),
            output_dir: output_dir.into(),
            schema_path: schema_path.into(),
            avro_codec: AvroCodec::default(),
            threads: 4,
            keep_artifacts: false,
            limit: None,
        }
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads.max(1);
        self
    }

    pub fn with_avro_codec(mut self, codec: AvroCodec) -> Self {
        self.avro_codec = codec;
        self
    }

    pub fn keep_artifacts(mut self, keep: bool) -> Self {
        self.keep_artifacts = keep;
        self
    }

    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }

    pub fn strategy_dir(&self, name: &str) -> PathBuf {
        self.output_dir.join(name)
    }

    pub fn schema_path(&self) -> &Path {
        &self.schema_path
    }
}
