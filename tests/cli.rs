#![cfg(feature = "io-arrow")]

use anyhow::Result;
use statcsv::testing::*;
use std::process::{Command, Output};
use tempfile::tempdir;

fn statcsv(args: &[&str]) -> Result<Output> {
    Ok(Command::new(env!("CARGO_BIN_EXE_statcsv")).args(args).output()?)
}

#[test]
fn single_input_goes_to_stdout() -> Result<()> {
    let dir = tempdir()?;
    let input = dir.path().join("t.arrow");
    write_ipc_file(&input, &[sample_record_batch(0, 12)])?;

    let out = statcsv(&[input.to_str().unwrap(), "--batch-size", "5"])?;
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    let stdout = String::from_utf8(out.stdout)?;
    assert_eq!(stdout.lines().count(), 13);
    assert_eq!(stdout.lines().next(), Some("id,score,label,day,seen"));
    // Nothing but warnings reach stderr by default.
    assert!(out.stderr.is_empty());
    Ok(())
}

#[test]
fn unreadable_input_exits_nonzero_with_message() -> Result<()> {
    let out = statcsv(&["survey.sav"])?;
    assert!(!out.status.success());
    let stderr = String::from_utf8(out.stderr)?;
    assert!(stderr.starts_with("error: "), "{stderr}");
    assert!(stderr.contains("survey.sav file cannot be read"), "{stderr}");
    assert!(out.stdout.is_empty());
    Ok(())
}

#[test]
fn several_inputs_need_an_output_directory() -> Result<()> {
    let dir = tempdir()?;
    let a = dir.path().join("a.arrow");
    let b = dir.path().join("b.arrow");
    write_ipc_file(&a, &[sample_record_batch(0, 2)])?;
    write_ipc_file(&b, &[sample_record_batch(0, 3)])?;
    let (a, b) = (a.to_str().unwrap(), b.to_str().unwrap());

    let out = statcsv(&[a, b])?;
    assert!(!out.status.success());
    assert!(String::from_utf8(out.stderr)?.contains("--out-dir"));

    let out_dir = dir.path().join("out");
    let metrics = dir.path().join("metrics.json");
    let out = statcsv(&[a, b, "-o", out_dir.to_str().unwrap(), "--metrics", metrics.to_str().unwrap(), "-q"])?;
    assert!(out.status.success());
    assert_eq!(std::fs::read_to_string(out_dir.join("b.csv"))?.lines().count(), 4);
    assert!(std::fs::read_to_string(metrics)?.contains("\"rows\": 2"));
    Ok(())
}

#[test]
fn zero_batch_size_is_a_usage_error() -> Result<()> {
    let out = statcsv(&["x.parquet", "--batch-size", "0"])?;
    assert_eq!(out.status.code(), Some(2));
    Ok(())
}
