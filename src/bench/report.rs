use crate::compress::{Measurement, StrategyKind};
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use std::time::Duration;

/// 一种策略在整个语料上的汇总
#[derive(Debug, Clone, Serialize)]
pub struct StrategyReport {
    pub strategy: StrategyKind,
    pub extension: &'static str,
    pub files: usize,
    pub source_bytes: u64,
    pub artifact_bytes: u64,
    #[serde(serialize_with = "as_millis")]
    pub compress_time: Duration,
    #[serde(serialize_with = "as_millis")]
    pub decompress_time: Duration,
    pub mismatches: usize,
}

fn as_millis<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_f64(d.as_secs_f64() * 1000.0)
}

impl StrategyReport {
    pub fn from_measurements(kind: StrategyKind, measurements: &[Measurement]) -> Self {
        Self {
            strategy: kind,
            extension: kind.extension(),
            files: measurements.len(),
            source_bytes: measurements.iter().map(|m| m.source_bytes).sum(),
            artifact_bytes: measurements.iter().map(|m| m.artifact_bytes).sum(),
            compress_time: measurements.iter().map(|m| m.compress).sum(),
            decompress_time: measurements.iter().map(|m| m.decompress).sum(),
            mismatches: measurements.iter().filter(|m| !m.verified).count(),
        }
    }

    /// 产物大小 / 原始大小
    pub fn ratio(&self) -> f64 {
        if self.source_bytes == 0 {
            0.0
        } else {
            self.artifact_bytes as f64 / self.source_bytes as f64
        }
    }

    pub fn mean_compress(&self) -> Duration {
        mean(self.compress_time, self.files)
    }

    pub fn mean_decompress(&self) -> Duration {
        mean(self.decompress_time, self.files)
    }
}

fn mean(total: Duration, count: usize) -> Duration {
    if count == 0 {
        Duration::ZERO
    } else {
        total / count as u32
    }
}

fn human_size(bytes: u64) -> String {
    if bytes >= 1024 * 1024 * 1024 {
        format!("{:.2} GB", bytes as f64 / 1024.0 / 1024.0 / 1024.0)
    } else if bytes >= 1024 * 1024 {
        format!("{:.2} MB", bytes as f64 / 1024.0 / 1024.0)
    } else if bytes >= 1024 {
        format!("{:.2} KB", bytes as f64 / 1024.0)
    } else {
        format!("{} B", bytes)
    }
}

pub fn print_table(reports: &[StrategyReport]) {
    println!(
        "{:<10} {:>8} {:>12} {:>12} {:>7} {:>14} {:>14} {:>6}",
        "格式", "文件", "原始", "产物", "比例", "平均压缩", "平均解压", "失败"
    );
    for r in reports {
        println!(
            "{:<10} {:>8} {:>12} {:>12} {:>7.3} {:>14?} {:>14?} {:>6}",
            r.strategy.format(),
            r.files,
            human_size(r.source_bytes),
            human_size(r.artifact_bytes),
            r.ratio(),
            r.mean_compress(),
            r.mean_decompress(),
            r.mismatches
        );
    }
}

pub fn write_csv<W: Write>(mut out: W, reports: &[StrategyReport]) -> std::io::Result<()> {
    writeln!(
        out,
        "format,extension,files,source_bytes,artifact_bytes,ratio,compress_ms,decompress_ms,mismatches"
    )?;
    for r in reports {
        writeln!(
            out,
            "{},{},{},{},{},{:.4},{:.3},{:.3},{}",
            r.strategy.format(),
            r.extension,
            r.files,
            r.source_bytes,
            r.artifact_bytes,
            r.ratio(),
            r.compress_time.as_secs_f64() * 1000.0,
            r.decompress_time.as_secs_f64() * 1000.0,
            r.mismatches
        )?;
    }
    out.flush()
}

pub fn save_csv(path: &Path, reports: &[StrategyReport]) -> anyhow::Result<()> {
    let file = std::fs::File::create(path)?;
    write_csv(std::io::BufWriter::new(file), reports)?;
    Ok(())
}

pub fn save_json(path: &Path, reports: &[StrategyReport]) -> anyhow::Result<()> {
    let file = std::io::BufWriter::new(std::fs::File::create(path)?);
    serde_json::to_writer_pretty(file, reports)?;
    Ok(())
}
