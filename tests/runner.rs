#![cfg(feature = "io-arrow")]

use anyhow::Result;
use statcsv::io::compression::auto_detect_reader;
use statcsv::io::csv::CsvOptions;
use statcsv::metrics::FileStatus;
use statcsv::runner::{RunnerOptions, convert_files, output_path};
use statcsv::testing::*;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

fn read_output(path: &Path) -> Result<String> {
    let mut text = String::new();
    auto_detect_reader(File::open(path)?, path)?.read_to_string(&mut text)?;
    Ok(text)
}

#[test]
fn output_names_drop_format_and_compression_suffixes() {
    let out = Path::new("out");
    assert_eq!(output_path(Path::new("data/t1.parquet"), out, None), PathBuf::from("out/t1.csv"));
    assert_eq!(output_path(Path::new("T2.Arrows.GZ"), out, None), PathBuf::from("out/T2.csv"));
    assert_eq!(
        output_path(Path::new("a/b/survey.2024.arrow"), out, Some("zst")),
        PathBuf::from("out/survey.2024.csv.zst")
    );
    assert_eq!(output_path(Path::new("x.feather"), out, Some(".gz")), PathBuf::from("out/x.csv.gz"));
    assert_eq!(output_path(Path::new("İ.arrow"), out, None), PathBuf::from("out/İ.csv"));
}

#[test]
fn inputs_sharing_an_output_name_do_not_overwrite_each_other() -> Result<()> {
    let dir = tempdir()?;
    let file = dir.path().join("t.arrow");
    let stream = dir.path().join("t.arrows");
    write_ipc_file(&file, &[sample_record_batch(0, 10)])?;
    write_ipc_stream(&stream, &[sample_record_batch(0, 3)])?;

    let out_dir = dir.path().join("out");
    let options = RunnerOptions {
        threads: Some(2),
        ..RunnerOptions::default()
    };
    let report = convert_files(&[file.clone(), stream, file], &out_dir, &options)?;

    assert!(report.files[0].is_ok());
    assert_eq!(report.files[0].output.as_deref(), Some(out_dir.join("t.csv").as_path()));
    for later in &report.files[1..] {
        assert!(later.output.is_none());
        match &later.status {
            FileStatus::Failed(msg) => assert!(msg.contains("already produced by"), "{msg}"),
            FileStatus::Converted(_) => panic!("{} overwrote t.csv", later.input.display()),
        }
    }
    assert_eq!(report.failures(), 2);
    assert_eq!(report.total_rows(), 10);
    assert_eq!(read_output(&out_dir.join("t.csv"))?.lines().count(), 11);
    Ok(())
}

#[test]
fn every_input_gets_an_outcome_in_order() -> Result<()> {
    let dir = tempdir()?;
    let first = dir.path().join("first.arrow");
    let second = dir.path().join("second.arrows");
    let unknown = dir.path().join("notes.txt");
    let missing = dir.path().join("gone.arrow");
    write_ipc_file(&first, &[sample_record_batch(0, 10)])?;
    write_ipc_stream(&second, &[sample_record_batch(0, 3)])?;
    std::fs::write(&unknown, "hello")?;

    let out_dir = dir.path().join("csv");
    let inputs = vec![first.clone(), unknown.clone(), second.clone(), missing.clone()];
    let options = RunnerOptions {
        threads: Some(2),
        ..RunnerOptions::default()
    };
    let report = convert_files(&inputs, &out_dir, &options)?;

    let seen: Vec<&PathBuf> = report.files.iter().map(|f| &f.input).collect();
    assert_eq!(seen, [&first, &unknown, &second, &missing]);
    assert_eq!(report.failures(), 2);
    assert_eq!(report.total_rows(), 13);

    match &report.files[1].status {
        FileStatus::Failed(msg) => assert!(msg.contains("unrecognized file type"), "{msg}"),
        FileStatus::Converted(_) => panic!("text file converted"),
    }
    assert!(!report.files[3].is_ok());

    let text = read_output(&out_dir.join("first.csv"))?;
    assert_eq!(text.lines().count(), 11);
    assert!(text.starts_with("id,score,label,day,seen\n"));
    let text = read_output(&out_dir.join("second.csv"))?;
    assert_eq!(text.lines().count(), 4);
    Ok(())
}

#[test]
#[cfg(feature = "compression-gzip")]
fn compressed_output_with_custom_delimiter() -> Result<()> {
    let dir = tempdir()?;
    let input = dir.path().join("t.arrow");
    write_ipc_file(&input, &[sample_record_batch(0, 5)])?;

    let options = RunnerOptions {
        csv: CsvOptions::default().with_delimiter_str("\\t")?,
        compression: Some("gz".into()),
        threads: Some(1),
        ..RunnerOptions::default()
    };
    let report = convert_files(&[input], dir.path(), &options)?;
    assert_eq!(report.failures(), 0);

    let out = dir.path().join("t.csv.gz");
    let mut magic = [0u8; 2];
    File::open(&out)?.read_exact(&mut magic)?;
    assert_eq!(magic, [0x1f, 0x8b]);

    let text = read_output(&out)?;
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some("id\tscore\tlabel\tday\tseen"));
    assert_eq!(lines.next(), Some("0.000000\t0.000000\trow-0\t1970-01-01T00:00:00\t1970-01-01T00:00:00"));
    Ok(())
}

#[test]
fn unknown_compression_is_rejected_up_front() {
    let dir = tempdir().unwrap();
    let options = RunnerOptions {
        compression: Some("rar".into()),
        ..RunnerOptions::default()
    };
    let err = convert_files(&[], dir.path(), &options).unwrap_err();
    assert!(err.to_string().contains("rar"));
}

#[test]
fn metrics_report_is_saved_as_json() -> Result<()> {
    let dir = tempdir()?;
    let input = dir.path().join("m.arrow");
    write_ipc_file(&input, &[sample_record_batch(0, 8)])?;
    let report = convert_files(
        &[input, dir.path().join("broken.parquet")],
        &dir.path().join("out"),
        &RunnerOptions::default(),
    )?;

    let json_path = dir.path().join("metrics.json");
    report.save_to_file(&json_path)?;
    let json: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&json_path)?)?;

    let files = json["files"].as_array().expect("files array");
    assert_eq!(files.len(), 2);
    assert_eq!(files[0]["converted"]["rows"], 8);
    assert_eq!(files[0]["converted"]["termination"], "short_batch");
    assert!(files[0]["output"].as_str().is_some_and(|p| p.ends_with("m.csv")));
    assert!(files[1]["failed"].is_string());
    assert_eq!(report.to_json(), json);
    Ok(())
}
