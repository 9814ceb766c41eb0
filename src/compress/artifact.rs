use super::strategy::StrategyKind;
use crate::error::{BenchError, Result};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

/// 产物路径: `<dir>/<basename><扩展名>`
pub fn artifact_path(dir: &Path, basename: &str, kind: StrategyKind) -> PathBuf {
    dir.join(format!("{}{}", basename, kind.extension()))
}

/// 路径必须以该策略自己的扩展名结尾
pub fn ensure_extension(path: &Path, kind: StrategyKind) -> Result<()> {
    let expected = kind.extension();
    let actual = path.extension().and_then(|s| s.to_str());
    if actual == Some(&expected[1..]) {
        Ok(())
    } else {
        Err(BenchError::ExtensionMismatch {
            expected,
            path: path.display().to_string(),
        })
    }
}

pub(crate) fn create(path: &Path, kind: StrategyKind) -> Result<BufWriter<File>> {
    ensure_extension(path, kind)?;
    let file = File::create(path).map_err(|e| BenchError::from_open(e, path))?;
    Ok(BufWriter::new(file))
}

pub(crate) fn open(path: &Path, kind: StrategyKind) -> Result<BufReader<File>> {
    ensure_extension(path, kind)?;
    let file = File::open(path).map_err(|e| BenchError::from_open(e, path))?;
    Ok(BufReader::new(file))
}
