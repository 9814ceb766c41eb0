use super::artifact;
use super::strategy::{Strategy, StrategyKind};
use crate::error::{BenchError, Result};
use crate::record::Record;
use std::io::Write;
use std::path::Path;

/// MessagePack 紧凑二进制映射
#[derive(Debug, Clone, Copy, Default)]
pub struct CompactBinaryMapStrategy;

impl Strategy for CompactBinaryMapStrategy {
    type Output = Record;

    const KIND: StrategyKind = StrategyKind::CompactBinaryMap;

    fn compress(&self, contents: &Record, destination: &Path) -> Result<()> {
        let mut writer = artifact::create(destination, Self::KIND)?;
        rmp_serde::encode::write(&mut writer, contents)
            .map_err(|e| BenchError::encode(Self::KIND.format(), e))?;
        writer.flush()?;
        log::debug!("写入 MessagePack: {:?}", destination);
        Ok(())
    }

    fn decompress(&self, source: &Path) -> Result<Record> {
        let reader = artifact::open(source, Self::KIND)?;
        rmp_serde::from_read(reader).map_err(|e| BenchError::decode(Self::KIND.format(), e))
    }
}
