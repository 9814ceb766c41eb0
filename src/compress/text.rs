use super::artifact;
use super::strategy::{Strategy, StrategyKind};
use crate::error::{BenchError, Result};
use crate::record::Record;
use std::io::Write;
use std::path::Path;

/// 纯文本 JSON
#[derive(Debug, Clone, Copy, Default)]
pub struct TextStrategy;

impl Strategy for TextStrategy {
    type Output = Record;

    const KIND: StrategyKind = StrategyKind::Text;

    fn compress(&self, contents: &Record, destination: &Path) -> Result<()> {
        let mut writer = artifact::create(destination, Self::KIND)?;
        serde_json::to_writer(&mut writer, contents)
            .map_err(|e| BenchError::encode(Self::KIND.format(), e))?;
        writer.flush()?;
        log::debug!("写入 JSON: {:?}", destination);
        Ok(())
    }

    fn decompress(&self, source: &Path) -> Result<Record> {
        let reader = artifact::open(source, Self::KIND)?;
        serde_json::from_reader(reader).map_err(|e| BenchError::decode(Self::KIND.format(), e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn scenario_round_trip_is_identical() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("msg.json");
        let contents = json!({"subject": "hello", "to": ["a@x.com"], "size": 42});
        let contents = contents.as_object().unwrap();

        TextStrategy.compress(contents, &path).unwrap();
        let decoded = TextStrategy.decompress(&path).unwrap();

        assert_eq!(&decoded, contents);
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"subject\":\"hello\""));
    }

    #[test]
    fn rereading_gives_equal_results() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested.json");
        let contents = json!({
            "headers": {"x-mailer": "mutt", "received": ["a", "b"]},
            "flags": [true, false, null],
            "score": -1.5,
        });

        TextStrategy
            .compress(contents.as_object().unwrap(), &path)
            .unwrap();

        let first = TextStrategy.decompress(&path).unwrap();
        let second = TextStrategy.decompress(&path).unwrap();
        assert_eq!(first, second);
        assert_eq!(json!(first), contents);
    }

    #[test]
    fn truncated_file_is_a_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{\"subject\": \"hel").unwrap();

        let err = TextStrategy.decompress(&path).unwrap_err();
        assert!(err.is_decode());
    }

    #[test]
    fn unwritable_destination_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no-such-dir").join("msg.json");
        let contents = json!({"a": 1});

        let err = TextStrategy
            .compress(contents.as_object().unwrap(), &path)
            .unwrap_err();
        assert!(matches!(err, BenchError::FileNotFound(_) | BenchError::Io(_)));
    }
}
