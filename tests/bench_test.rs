use codec_bench::bench;
use codec_bench::compress::artifact_path;
use codec_bench::utils::load_corpus;
use codec_bench::{BenchConfig, Decoded, SerializationStrategy, StrategyKind};
use serde_json::json;
use std::fs;
use std::path::Path;

const SCHEMA: &str = r#"{
    "type": "record",
    "name": "Email",
    "fields": [
        {"name": "subject", "type": "string"},
        {"name": "size", "type": "long"}
    ]
}"#;

fn write_corpus(dir: &Path) {
    let inbox = dir.join("inbox");
    fs::create_dir_all(&inbox).unwrap();
    for i in 0..6 {
        let record = json!({
            "subject": format!("status report {i}"),
            "to": ["a@x.com", "b@x.com"],
            "size": 100 + i,
            "body": "lorem ipsum dolor sit amet ".repeat(i + 1),
        });
        fs::write(
            inbox.join(format!("{i}.json")),
            serde_json::to_vec_pretty(&record).unwrap(),
        )
        .unwrap();
    }
}

fn setup() -> (tempfile::TempDir, BenchConfig) {
    let dir = tempfile::tempdir().unwrap();
    let corpus = dir.path().join("corpus");
    write_corpus(&corpus);
    let schema = dir.path().join("email.avsc");
    fs::write(&schema, SCHEMA).unwrap();
    let config = BenchConfig::new(corpus, dir.path().join("out"), schema).with_threads(2);
    (dir, config)
}

#[test]
fn every_strategy_round_trips_the_corpus() {
    let (_dir, config) = setup();
    let corpus = load_corpus(&config.corpus_dir, None).unwrap();
    assert_eq!(corpus.len(), 6);

    let reports = bench::run(&config, &corpus, &StrategyKind::ALL).unwrap();

    assert_eq!(reports.len(), 4);
    for report in &reports {
        assert_eq!(report.files, 6, "{}", report.strategy);
        assert_eq!(report.mismatches, 0, "{}", report.strategy);
        assert!(report.artifact_bytes > 0);
        assert_eq!(report.extension, report.strategy.extension());
    }

    let size_of = |kind: StrategyKind| {
        reports
            .iter()
            .find(|r| r.strategy == kind)
            .map(|r| r.artifact_bytes)
            .unwrap()
    };
    assert!(size_of(StrategyKind::CompactBinaryMap) < size_of(StrategyKind::Text));

    let leftover = fs::read_dir(config.strategy_dir("json")).unwrap().count();
    assert_eq!(leftover, 0);
}

#[test]
fn kept_artifacts_can_be_decoded_again() {
    let (_dir, config) = setup();
    let config = config.keep_artifacts(true);
    let corpus = load_corpus(&config.corpus_dir, Some(2)).unwrap();

    bench::run(&config, &corpus, &[StrategyKind::DocumentBinary, StrategyKind::SchemaBinary])
        .unwrap();

    let entry = &corpus[0];
    let bson = SerializationStrategy::new(StrategyKind::DocumentBinary, &config);
    let path = artifact_path(&config.strategy_dir("bson"), &entry.name, StrategyKind::DocumentBinary);
    match bson.decompress(&path).unwrap() {
        Decoded::Record(record) => assert_eq!(record, entry.record),
        Decoded::Stream(_) => panic!("BSON 应当直接得到记录"),
    }

    let avro = SerializationStrategy::new(StrategyKind::SchemaBinary, &config);
    let path = artifact_path(&config.strategy_dir("avro"), &entry.name, StrategyKind::SchemaBinary);
    let records = avro.decompress(&path).unwrap().into_records().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["subject"], entry.record["subject"]);
    assert!(!records[0].contains_key("body"));
}

#[test]
fn failing_strategy_aborts_the_run() {
    let (dir, config) = setup();
    let config = BenchConfig::new(
        &config.corpus_dir,
        dir.path().join("out"),
        dir.path().join("missing.avsc"),
    );
    let corpus = load_corpus(&config.corpus_dir, None).unwrap();

    let err = bench::run(&config, &corpus, &[StrategyKind::SchemaBinary]).unwrap_err();
    assert!(format!("{:#}", err).contains("Schema"));
}

#[test]
fn flattened_path_collisions_keep_separate_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let corpus = dir.path().join("corpus");
    fs::create_dir_all(corpus.join("inbox")).unwrap();
    fs::write(
        corpus.join("inbox").join("1.json"),
        r#"{"subject": "nested", "size": 1}"#,
    )
    .unwrap();
    fs::write(
        corpus.join("inbox_1.json"),
        r#"{"subject": "flat", "size": 2}"#,
    )
    .unwrap();
    let schema = dir.path().join("email.avsc");
    fs::write(&schema, SCHEMA).unwrap();
    let config = BenchConfig::new(&corpus, dir.path().join("out"), schema)
        .with_threads(2)
        .keep_artifacts(true);

    let entries = load_corpus(&config.corpus_dir, None).unwrap();
    let reports = bench::run(&config, &entries, &StrategyKind::ALL).unwrap();

    for report in &reports {
        assert_eq!(report.files, 2, "{}", report.strategy);
        assert_eq!(report.mismatches, 0, "{}", report.strategy);
        let kept = fs::read_dir(config.strategy_dir(report.strategy.format()))
            .unwrap()
            .count();
        assert_eq!(kept, 2, "{}", report.strategy);
    }
}

#[test]
fn empty_avro_batch_reads_back_as_empty_stream() {
    let (dir, config) = setup();
    let avro = codec_bench::compress::SchemaBinaryStrategy::new(config.schema_path());
    let path = artifact_path(dir.path(), "empty", StrategyKind::SchemaBinary);

    assert_eq!(avro.compress_records(&[], &path).unwrap(), 0);
    let decoded = SerializationStrategy::new(StrategyKind::SchemaBinary, &config)
        .decompress(&path)
        .unwrap();
    assert!(decoded.into_records().unwrap().is_empty());
}
