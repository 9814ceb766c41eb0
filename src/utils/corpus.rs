use crate::error::{BenchError, Result};
use crate::record::Record;
use serde_json::Value;
use std::path::Path;
use walkdir::WalkDir;

/// 语料中的一条记录
#[derive(Debug, Clone)]
pub struct CorpusEntry {
    /// `<序号>-<相对路径>`, 用作产物文件名; 序号保证唯一
    pub name: String,
    /// 原始 JSON 文件大小
    pub source_bytes: u64,
    pub record: Record,
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|s| s.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}

fn entry_name(index: usize, corpus_dir: &Path, path: &Path) -> Result<String> {
    let relative = path
        .strip_prefix(corpus_dir)
        .map_err(|_| BenchError::PathError(format!("{:?} 不在 {:?} 下", path, corpus_dir)))?
        .with_extension("");
    let name = relative
        .to_str()
        .ok_or_else(|| BenchError::PathError(format!("无效路径: {:?}", path)))?
        .replace(['/', '\\'], "_");
    Ok(format!("{:05}-{}", index, name))
}

/// 递归加载目录下所有顶层为对象的 `.json` 文件, 按路径排序
pub fn load_corpus(corpus_dir: &Path, limit: Option<usize>) -> Result<Vec<CorpusEntry>> {
    if !corpus_dir.is_dir() {
        return Err(BenchError::FileNotFound(corpus_dir.display().to_string()));
    }

    let mut entries = Vec::new();
    let files = WalkDir::new(corpus_dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file() && is_json(e.path()));

    for file in files {
        if limit.is_some_and(|limit| entries.len() >= limit) {
            break;
        }
        let path = file.path();
        let bytes = std::fs::read(path)?;
        let record = match serde_json::from_slice::<Value>(&bytes) {
            Ok(Value::Object(record)) => record,
            Ok(_) => {
                log::warn!("跳过 {:?}: 顶层不是对象", path);
                continue;
            }
            Err(e) => {
                log::warn!("跳过 {:?}: {}", path, e);
                continue;
            }
        };
        entries.push(CorpusEntry {
            name: entry_name(entries.len(), corpus_dir, path)?,
            source_bytes: bytes.len() as u64,
            record,
        });
    }

    log::info!("从 {:?} 加载了 {} 条记录", corpus_dir, entries.len());
    Ok(entries)
}
