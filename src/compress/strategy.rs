use super::compact::CompactBinaryMapStrategy;
use super::document::DocumentBinaryStrategy;
use super::schema::{RecordStream, SchemaBinaryStrategy};
use super::text::TextStrategy;
use crate::config::BenchConfig;
use crate::error::Result;
use crate::record::Record;
use clap::ValueEnum;
use serde::Serialize;
use std::fmt;
use std::path::Path;

/// 四种序列化策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyKind {
    Text,
    CompactBinaryMap,
    DocumentBinary,
    SchemaBinary,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 4] = [
        StrategyKind::Text,
        StrategyKind::CompactBinaryMap,
        StrategyKind::DocumentBinary,
        StrategyKind::SchemaBinary,
    ];

    pub fn extension(self) -> &'static str {
        match self {
            StrategyKind::Text => ".json",
            StrategyKind::CompactBinaryMap => ".msgpack",
            StrategyKind::DocumentBinary => ".bson",
            StrategyKind::SchemaBinary => ".avro",
        }
    }

    /// 编码格式名, 也用作输出子目录名
    pub fn format(self) -> &'static str {
        match self {
            StrategyKind::Text => "json",
            StrategyKind::CompactBinaryMap => "msgpack",
            StrategyKind::DocumentBinary => "bson",
            StrategyKind::SchemaBinary => "avro",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.format())
    }
}

/// 一种序列化格式及其 compress/decompress 行为。
///
/// 实现不持有跨调用的可变状态; 每次调用独占自己的文件句柄,
/// 并在返回前 (包括出错时) 释放它。
pub trait Strategy {
    /// decompress 的结果形状
    type Output;

    const KIND: StrategyKind;

    /// 将 `contents` 完整写入 `destination` 并刷新
    fn compress(&self, contents: &Record, destination: &Path) -> Result<()>;

    fn decompress(&self, source: &Path) -> Result<Self::Output>;
}

/// decompress 的结果: 三种格式直接得到记录, Avro 得到惰性记录流
pub enum Decoded {
    Record(Record),
    Stream(RecordStream),
}

impl Decoded {
    /// 取出全部记录; 对记录流会读到文件末尾
    pub fn into_records(self) -> Result<Vec<Record>> {
        match self {
            Decoded::Record(record) => Ok(vec![record]),
            Decoded::Stream(stream) => stream.collect(),
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Decoded::Record(record) => Some(record),
            Decoded::Stream(_) => None,
        }
    }
}

impl fmt::Debug for Decoded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decoded::Record(record) => f.debug_tuple("Record").field(record).finish(),
            Decoded::Stream(stream) => f.debug_tuple("Stream").field(&stream.path()).finish(),
        }
    }
}

/// 按策略类型分发的统一入口
#[derive(Debug, Clone)]
pub enum SerializationStrategy {
    Text(TextStrategy),
    CompactBinaryMap(CompactBinaryMapStrategy),
    DocumentBinary(DocumentBinaryStrategy),
    SchemaBinary(SchemaBinaryStrategy),
}

impl SerializationStrategy {
    pub fn new(kind: StrategyKind, config: &BenchConfig) -> Self {
        match kind {
            StrategyKind::Text => SerializationStrategy::Text(TextStrategy),
            StrategyKind::CompactBinaryMap => {
                SerializationStrategy::CompactBinaryMap(CompactBinaryMapStrategy)
            }
            StrategyKind::DocumentBinary => {
                SerializationStrategy::DocumentBinary(DocumentBinaryStrategy)
            }
            StrategyKind::SchemaBinary => SerializationStrategy::SchemaBinary(
                SchemaBinaryStrategy::new(config.schema_path()).with_codec(config.avro_codec),
            ),
        }
    }

    pub fn kind(&self) -> StrategyKind {
        match self {
            SerializationStrategy::Text(_) => TextStrategy::KIND,
            SerializationStrategy::CompactBinaryMap(_) => CompactBinaryMapStrategy::KIND,
            SerializationStrategy::DocumentBinary(_) => DocumentBinaryStrategy::KIND,
            SerializationStrategy::SchemaBinary(_) => SchemaBinaryStrategy::KIND,
        }
    }

    pub fn compress(&self, contents: &Record, destination: &Path) -> Result<()> {
        match self {
            SerializationStrategy::Text(s) => s.compress(contents, destination),
            SerializationStrategy::CompactBinaryMap(s) => s.compress(contents, destination),
            SerializationStrategy::DocumentBinary(s) => s.compress(contents, destination),
            SerializationStrategy::SchemaBinary(s) => s.compress(contents, destination),
        }
    }

    pub fn decompress(&self, source: &Path) -> Result<Decoded> {
        match self {
            SerializationStrategy::Text(s) => s.decompress(source).map(Decoded::Record),
            SerializationStrategy::CompactBinaryMap(s) => {
                s.decompress(source).map(Decoded::Record)
            }
            SerializationStrategy::DocumentBinary(s) => s.decompress(source).map(Decoded::Record),
            SerializationStrategy::SchemaBinary(s) => s.decompress(source).map(Decoded::Stream),
        }
    }
}
