pub mod report;

pub use report::StrategyReport;

use crate::compress::{BenchWorker, Measurement, SerializationStrategy, StrategyKind};
use crate::config::BenchConfig;
use crate::utils::{create_progress_bar, CorpusEntry};
use anyhow::Context;
use rayon::prelude::*;
use std::time::Instant;

/// 依次对每种策略跑完整个语料, 每种策略内部按文件并行
pub fn run(
    config: &BenchConfig,
    corpus: &[CorpusEntry],
    kinds: &[StrategyKind],
) -> anyhow::Result<Vec<StrategyReport>> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.threads)
        .build()
        .context("创建线程池失败")?;

    let mut reports = Vec::with_capacity(kinds.len());
    for &kind in kinds {
        let out_dir = config.strategy_dir(kind.format());
        std::fs::create_dir_all(&out_dir)
            .with_context(|| format!("无法创建输出目录 {:?}", out_dir))?;

        let worker = BenchWorker::new(
            SerializationStrategy::new(kind, config),
            &out_dir,
            config.keep_artifacts,
        );
        let pb = create_progress_bar(corpus.len() as u64, kind.format())?;
        let start = Instant::now();

        let result = pool.install(|| {
            corpus
                .par_iter()
                .map(|entry| {
                    let measurement = worker
                        .measure(entry)
                        .with_context(|| format!("{}: 处理 {} 失败", kind, entry.name));
                    pb.inc(1);
                    measurement
                })
                .collect::<anyhow::Result<Vec<Measurement>>>()
        });

        let measurements = match result {
            Ok(measurements) => {
                pb.finish_with_message("完成");
                measurements
            }
            Err(e) => {
                pb.abandon_with_message("失败");
                return Err(e);
            }
        };

        let report = StrategyReport::from_measurements(kind, &measurements);
        log::info!(
            "{}: {} 个文件, {} -> {} 字节, 耗时 {:?}",
            kind,
            report.files,
            report.source_bytes,
            report.artifact_bytes,
            start.elapsed()
        );
        if report.mismatches > 0 {
            log::warn!("{}: {} 个文件往返校验失败", kind, report.mismatches);
        }
        reports.push(report);
    }

    Ok(reports)
}
