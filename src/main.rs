use clap::Parser;
use codec_bench::bench::{self, report};
use codec_bench::config::{AvroCodec, BenchConfig};
use codec_bench::log::init_logger;
use codec_bench::utils::load_corpus;
use codec_bench::StrategyKind;
use log::LevelFilter;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(about = "序列化格式基准测试", long_about = Some("用 JSON / MessagePack / BSON / Avro 往返同一批记录, 比较产物大小和编解码耗时"))]
struct Args {
    /// 语料目录
    #[arg(help = "包含 JSON 记录的语料目录")]
    corpus: PathBuf,
    #[arg(short, long, default_value = "out", help = "产物输出目录")]
    output: PathBuf,
    #[arg(short, long, default_value = "schemas/email.avsc", help = "Avro schema 文件")]
    schema: PathBuf,
    /// 参与测试的策略, 默认全部
    #[arg(long = "strategy", value_enum, help = "参与测试的策略 (可重复)")]
    strategies: Vec<StrategyKind>,
    #[arg(short, long, default_value_t = 4, help = "工作线程数")]
    threads: usize,
    #[arg(long, value_enum, default_value_t = AvroCodec::Null, help = "Avro 数据块压缩方式")]
    avro_codec: AvroCodec,
    #[arg(long, help = "保留产物文件")]
    keep: bool,
    #[arg(long, help = "最多加载的语料文件数")]
    limit: Option<usize>,
    #[arg(long, help = "把结果写入 CSV 文件")]
    csv: Option<PathBuf>,
    #[arg(long, help = "把结果写入 JSON 文件")]
    json: Option<PathBuf>,
    #[arg(long, default_value = "logs", help = "日志目录")]
    log_dir: PathBuf,
    #[arg(short, long, help = "输出调试日志")]
    verbose: bool,
}

fn main() {
    std::process::exit(match run() {
        Ok(_) => 0,
        Err(e) => {
            eprintln!("错误: {:#}", e);
            1
        }
    });
}

fn run() -> anyhow::Result<()> {
    let args = Args::parse();
    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    init_logger(&args.log_dir, level)?;

    let config = BenchConfig::new(&args.corpus, &args.output, &args.schema)
        .with_threads(args.threads)
        .with_avro_codec(args.avro_codec)
        .keep_artifacts(args.keep)
        .with_limit(args.limit);
    let kinds = if args.strategies.is_empty() {
        StrategyKind::ALL.to_vec()
    } else {
        args.strategies.clone()
    };

    let start = Instant::now();
    let corpus = load_corpus(&config.corpus_dir, config.limit)?;
    if corpus.is_empty() {
        anyhow::bail!("语料目录 {:?} 中没有可用的 JSON 记录", config.corpus_dir);
    }
    println!(
        "[1/2] 加载完成: {} 条记录, 耗时 {:?}",
        corpus.len(),
        start.elapsed()
    );

    let reports = bench::run(&config, &corpus, &kinds)?;
    println!("[2/2] 测试完成, 总耗时 {:?}\n", start.elapsed());
    report::print_table(&reports);

    if let Some(path) = &args.csv {
        report::save_csv(path, &reports)?;
        log::info!("CSV 已写入 {:?}", path);
    }
    if let Some(path) = &args.json {
        report::save_json(path, &reports)?;
        log::info!("JSON 已写入 {:?}", path);
    }
    Ok(())
}
