use super::artifact;
use super::strategy::{Strategy, StrategyKind};
use crate::error::{BenchError, Result};
use crate::record::Record;
use bson::Document;
use std::io::{Read, Write};
use std::path::Path;

/// 最小的 BSON 文档: 4 字节长度 + 结尾的 0x00
const MIN_DOCUMENT_LEN: usize = 5;

/// BSON 文档二进制
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentBinaryStrategy;

impl Strategy for DocumentBinaryStrategy {
    type Output = Record;

    const KIND: StrategyKind = StrategyKind::DocumentBinary;

    fn compress(&self, contents: &Record, destination: &Path) -> Result<()> {
        let document =
            bson::to_document(contents).map_err(|e| BenchError::encode(Self::KIND.format(), e))?;
        let mut writer = artifact::create(destination, Self::KIND)?;
        document
            .to_writer(&mut writer)
            .map_err(|e| BenchError::encode(Self::KIND.format(), e))?;
        writer.flush()?;
        log::debug!("写入 BSON: {:?}", destination);
        Ok(())
    }

    fn decompress(&self, source: &Path) -> Result<Record> {
        let mut reader = artifact::open(source, Self::KIND)?;
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        check_length_prefix(&bytes)?;

        let document = Document::from_reader(&mut bytes.as_slice())
            .map_err(|e| BenchError::decode(Self::KIND.format(), e))?;
        bson::from_document(document).map_err(|e| BenchError::decode(Self::KIND.format(), e))
    }
}

/// 文档头部的长度必须等于文件长度
fn check_length_prefix(bytes: &[u8]) -> Result<()> {
    if bytes.len() < MIN_DOCUMENT_LEN {
        return Err(BenchError::decode(
            StrategyKind::DocumentBinary.format(),
            format!("文件过短: {} 字节", bytes.len()),
        ));
    }
    let declared = i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
    if declared < 0 || declared as usize != bytes.len() {
        return Err(BenchError::decode(
            StrategyKind::DocumentBinary.format(),
            format!("文档长度 {} 与文件长度 {} 不一致", declared, bytes.len()),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn round_trip_preserves_nested_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.bson");
        let contents = json!({
            "subject": "hello",
            "to": ["a@x.com", "b@y.org"],
            "size": 42,
            "negative": -3,
            "spam_score": 0.75,
            "headers": {"x-priority": "1", "dkim": null},
            "read": false,
        });

        DocumentBinaryStrategy
            .compress(contents.as_object().unwrap(), &path)
            .unwrap();
        let first = DocumentBinaryStrategy.decompress(&path).unwrap();
        let second = DocumentBinaryStrategy.decompress(&path).unwrap();

        assert_eq!(json!(first), contents);
        assert_eq!(first, second);
    }

    #[test]
    fn integers_wider_than_i64_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("huge.bson");
        let contents = json!({"huge": u64::MAX});

        let err = DocumentBinaryStrategy
            .compress(contents.as_object().unwrap(), &path)
            .unwrap_err();
        assert!(matches!(err, BenchError::Encode { format: "bson", .. }));
    }

    #[test]
    fn length_prefix_must_match_file() {
        assert!(check_length_prefix(&[5, 0, 0, 0, 0]).is_ok());
        assert!(check_length_prefix(&[5, 0, 0]).unwrap_err().is_decode());
        assert!(check_length_prefix(&[9, 0, 0, 0, 0]).unwrap_err().is_decode());
        assert!(check_length_prefix(&[0xff, 0xff, 0xff, 0xff, 0])
            .unwrap_err()
            .is_decode());
    }

    #[test]
    fn truncated_file_is_a_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cut.bson");
        let contents = json!({"subject": "truncated"});
        DocumentBinaryStrategy
            .compress(contents.as_object().unwrap(), &path)
            .unwrap();

        let bytes = std::fs::read(&path).unwrap();
        std::fs::write(&path, &bytes[..bytes.len() - 3]).unwrap();

        let err = DocumentBinaryStrategy.decompress(&path).unwrap_err();
        assert!(err.is_decode());
    }
}
