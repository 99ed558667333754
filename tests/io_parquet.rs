#![cfg(feature = "io-parquet")]

use anyhow::Result;
use statcsv::convert::{ConvertOptions, convert, to_csv};
use statcsv::io::open_decoder;
use statcsv::io::parquet::ParquetDecoder;
use statcsv::testing::*;
use statcsv::{Decoder, Termination};
use std::num::NonZeroUsize;
use tempfile::tempdir;

fn options(batch_size: usize) -> ConvertOptions {
    ConvertOptions::default().with_batch_size(NonZeroUsize::new(batch_size).unwrap())
}

#[test]
fn parquet_rows_span_row_groups() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("groups.parquet");
    write_parquet(
        &path,
        &[sample_record_batch(0, 1000), sample_record_batch(1000, 1000), sample_record_batch(2000, 1000), sample_record_batch(3000, 605)],
    )?;

    let mut decoder = ParquetDecoder::open(&path)?;
    assert_eq!(decoder.column_names(), ["id", "score", "label", "day", "seen"]);

    let mut sink = MemorySink::new();
    let summary = convert(&mut decoder, &mut sink, &options(700))?;
    assert_eq!(summary.rows, 3605);
    assert_eq!(summary.batches, 6);
    assert_eq!(summary.termination, Termination::ShortBatch);

    let rows = sink.data_rows();
    assert_eq!(rows[0], ["0.000000", "0.000000", "row-0", "1970-01-01T00:00:00", "1970-01-01T00:00:00"]);
    assert_eq!(rows[4][1], "");
    assert_eq!(rows[1001], ["1001.000000", "250.250000", "row-1001", "1972-09-28T00:00:00", "1970-01-01T00:25:01.500"]);
    assert_eq!(rows[3604][2], "row-3604");
    Ok(())
}

#[test]
fn parquet_and_ipc_render_identically() -> Result<()> {
    let dir = tempdir()?;
    let batches = [sample_record_batch(0, 123), sample_record_batch(123, 77)];
    let parquet = dir.path().join("t.parquet");
    let ipc = dir.path().join("t.arrow");
    write_parquet(&parquet, &batches)?;
    write_ipc_file(&ipc, &batches)?;

    let render = |path: &std::path::Path| -> Result<Vec<u8>> {
        let mut decoder = open_decoder(path)?;
        let mut writer = csv::Writer::from_writer(Vec::new());
        to_csv(&mut decoder, NonZeroUsize::new(64).unwrap(), &mut writer)?;
        Ok(writer.into_inner()?)
    };
    assert_eq!(render(&parquet)?, render(&ipc)?);
    Ok(())
}

#[test]
fn garbage_is_rejected_when_opening() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("bad.parquet");
    std::fs::write(&path, b"definitely not parquet")?;

    let err = match open_decoder(&path) {
        Ok(_) => panic!("garbage opened as parquet"),
        Err(e) => e,
    };
    assert!(format!("{err:#}").contains("bad.parquet"), "{err:#}");
    Ok(())
}
