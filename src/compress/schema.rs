use super::artifact;
use super::strategy::{Strategy, StrategyKind};
use crate::config::AvroCodec;
use crate::error::{BenchError, Result};
use crate::record::Record;
use apache_avro::types::Value;
use apache_avro::{Reader, Schema, Writer};
use serde_json::Value as Json;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};

const FORMAT: &str = "avro";
const MAGIC: &[u8] = b"Obj\x01";
const METADATA_SCHEMA: &str = r#"{"type": "map", "values": "bytes"}"#;

/// Avro 对象容器文件。
///
/// 写入时每次都从 `schema_path` 重新加载 schema; 读取时不需要 schema,
/// 直接使用文件头中嵌入的写入方 schema。记录中 schema 未声明的字段会被丢弃。
#[derive(Debug, Clone)]
pub struct SchemaBinaryStrategy {
    schema_path: PathBuf,
    codec: AvroCodec,
}

impl SchemaBinaryStrategy {
    pub fn new(schema_path: impl Into<PathBuf>) -> Self {
        Self {
            schema_path: schema_path.into(),
            codec: AvroCodec::default(),
        }
    }

    pub fn with_codec(mut self, codec: AvroCodec) -> Self {
        self.codec = codec;
        self
    }

    pub fn schema_path(&self) -> &Path {
        &self.schema_path
    }

    pub fn load_schema(&self) -> Result<Schema> {
        let text = std::fs::read_to_string(&self.schema_path).map_err(|e| {
            BenchError::Schema(format!(
                "无法读取 schema {}: {}",
                self.schema_path.display(),
                e
            ))
        })?;
        Schema::parse_str(&text).map_err(|e| {
            BenchError::Schema(format!(
                "无法解析 schema {}: {}",
                self.schema_path.display(),
                e
            ))
        })
    }

    /// 将零条或多条记录写入同一个容器文件, 返回写入的记录数
    pub fn compress_records<'a, I>(&self, records: I, destination: &Path) -> Result<usize>
    where
        I: IntoIterator<Item = &'a Record>,
    {
        artifact::ensure_extension(destination, Self::KIND)?;
        let schema = self.load_schema()?;

        // 先全部按 schema 解析, 编码失败时不留下文件
        let values = records
            .into_iter()
            .map(|record| -> Result<Value> {
                let value = apache_avro::to_value(record)
                    .and_then(|value| value.resolve(&schema))
                    .map_err(|e| BenchError::encode(FORMAT, e))?;
                if let Value::Record(fields) = &value {
                    check_fields(record, fields, "$")?;
                }
                Ok(value)
            })
            .collect::<Result<Vec<_>>>()?;

        let mut output = artifact::create(destination, Self::KIND)?;
        let count = values.len();
        if values.is_empty() {
            // Writer 没有记录时不会写文件头
            write_empty_container(&mut output, &schema, self.codec)?;
        } else {
            let mut writer = Writer::with_codec(&schema, output, self.codec.to_avro());
            for value in values {
                writer
                    .append(value)
                    .map_err(|e| BenchError::encode(FORMAT, e))?;
            }
            output = writer
                .into_inner()
                .map_err(|e| BenchError::encode(FORMAT, e))?;
        }
        output.flush()?;

        log::debug!("写入 Avro: {:?} ({} 条记录)", destination, count);
        Ok(count)
    }
}

/// `Value::resolve` 会把超出范围的 long 截断成 int, 这里逐个对照原始值
fn check_narrowing(original: &Json, resolved: &Value, path: &str) -> Result<()> {
    match (resolved, original) {
        (Value::Int(n), Json::Number(number)) => {
            if number.as_i64() != Some(i64::from(*n)) {
                return Err(BenchError::encode(
                    FORMAT,
                    format!("{} 的值 {} 超出 int 范围", path, number),
                ));
            }
        }
        (Value::Union(_, inner), _) => check_narrowing(original, inner, path)?,
        (Value::Record(fields), Json::Object(map)) => check_fields(map, fields, path)?,
        (Value::Map(entries), Json::Object(map)) => {
            for (key, value) in entries {
                if let Some(original) = map.get(key) {
                    check_narrowing(original, value, &format!("{}.{}", path, key))?;
                }
            }
        }
        (Value::Array(items), Json::Array(originals)) => {
            for (i, (value, original)) in items.iter().zip(originals).enumerate() {
                check_narrowing(original, value, &format!("{}[{}]", path, i))?;
            }
        }
        _ => {}
    }
    Ok(())
}

fn check_fields(original: &Record, fields: &[(String, Value)], path: &str) -> Result<()> {
    for (name, value) in fields {
        // 缺失的字段取自 schema 默认值
        if let Some(original) = original.get(name) {
            check_narrowing(original, value, &format!("{}.{}", path, name))?;
        }
    }
    Ok(())
}

/// 只有文件头的容器: magic + 元数据 + 同步标记
fn write_empty_container<W: Write>(
    output: &mut W,
    schema: &Schema,
    codec: AvroCodec,
) -> Result<()> {
    let schema_json = serde_json::to_string(schema).map_err(|e| BenchError::encode(FORMAT, e))?;
    let codec_name = match codec {
        AvroCodec::Null => "null",
        AvroCodec::Deflate => "deflate",
    };
    let metadata = HashMap::from([
        (
            "avro.schema".to_string(),
            Value::Bytes(schema_json.into_bytes()),
        ),
        (
            "avro.codec".to_string(),
            Value::Bytes(codec_name.as_bytes().to_vec()),
        ),
    ]);
    let metadata_schema =
        Schema::parse_str(METADATA_SCHEMA).map_err(|e| BenchError::Schema(e.to_string()))?;
    let header = apache_avro::to_avro_datum(&metadata_schema, Value::Map(metadata))
        .map_err(|e| BenchError::encode(FORMAT, e))?;

    output.write_all(MAGIC)?;
    output.write_all(&header)?;
    output.write_all(&sync_marker())?;
    Ok(())
}

fn sync_marker() -> [u8; 16] {
    let nanos = chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default();
    (nanos as u128 ^ 0x5a5a_5a5a_a5a5_a5a5_5a5a_5a5a_a5a5_a5a5).to_le_bytes()
}

impl Strategy for SchemaBinaryStrategy {
    type Output = RecordStream;

    const KIND: StrategyKind = StrategyKind::SchemaBinary;

    fn compress(&self, contents: &Record, destination: &Path) -> Result<()> {
        self.compress_records(std::iter::once(contents), destination)
            .map(|_| ())
    }

    fn decompress(&self, source: &Path) -> Result<RecordStream> {
        RecordStream::open(source)
    }
}

/// 惰性读取 Avro 容器文件中的记录, 可以从头重新开始
pub struct RecordStream {
    path: PathBuf,
    reader: Reader<'static, BufReader<File>>,
}

impl RecordStream {
    pub fn open(path: &Path) -> Result<Self> {
        let input = artifact::open(path, StrategyKind::SchemaBinary)?;
        let reader = Reader::new(input).map_err(|e| BenchError::decode(FORMAT, e))?;
        Ok(Self {
            path: path.to_path_buf(),
            reader,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 文件头中嵌入的写入方 schema
    pub fn writer_schema(&self) -> &Schema {
        self.reader.writer_schema()
    }

    /// 写入方 schema 声明的顶层字段名
    pub fn field_names(&self) -> Vec<String> {
        match self.writer_schema() {
            Schema::Record(record) => record.fields.iter().map(|f| f.name.clone()).collect(),
            _ => Vec::new(),
        }
    }

    /// 重新打开文件, 从第一条记录开始
    pub fn restart(&mut self) -> Result<()> {
        *self = Self::open(&self.path)?;
        Ok(())
    }
}

impl Iterator for RecordStream {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        let value = self.reader.next()?;
        Some(
            value
                .and_then(|value| apache_avro::from_value::<Record>(&value))
                .map_err(|e| BenchError::decode(FORMAT, e)),
        )
    }
}
