//! Multi-file conversion on a rayon thread pool.
//!
//! Each input runs its own pipeline instance (decoder, row buffer and sink),
//! so nothing mutable is shared between files. Outcomes are reported in input
//! order and a failing file never stops the others.

use crate::convert::{ConvertOptions, convert};
use crate::error::ConvertError;
use crate::io::compression::{find_codec, split_compression_suffix};
use crate::io::csv::{CsvOptions, create_csv_file, finish_csv_file};
use crate::io::open_decoder;
use crate::metrics::{ConversionSummary, FileOutcome, FileStatus, RunReport};
use anyhow::{Context, Result, anyhow};
use rayon::prelude::*;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Settings for a multi-file run.
#[derive(Debug, Clone, Default)]
pub struct RunnerOptions {
    pub convert: ConvertOptions,
    pub csv: CsvOptions,
    /// Compression extension appended to every output (e.g. `"gz"`).
    pub compression: Option<String>,
    /// Worker threads; defaults to the number of CPUs.
    pub threads: Option<usize>,
}

/// Output path for `input` inside `out_dir`: the file name without its
/// compression suffix and format extension, plus `.csv` and the optional
/// compression extension (`data/t1.arrows.gz` becomes `<out_dir>/t1.csv`).
pub fn output_path(input: &Path, out_dir: &Path, compression: Option<&str>) -> PathBuf {
    let name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let (base, _) = split_compression_suffix(&name);
    let stem = Path::new(base)
        .file_stem()
        .map_or_else(|| base.to_string(), |s| s.to_string_lossy().into_owned());
    let mut file_name = format!("{stem}.csv");
    if let Some(ext) = compression {
        file_name.push('.');
        file_name.push_str(ext.trim_start_matches('.'));
    }
    out_dir.join(file_name)
}

/// Pair every input with its output path and, when an earlier input already
/// claimed that path, with that earlier input.
fn plan_outputs<'a>(
    inputs: &'a [PathBuf],
    out_dir: &Path,
    compression: Option<&str>,
) -> Vec<(PathBuf, Option<&'a Path>)> {
    let mut claimed: HashMap<PathBuf, usize> = HashMap::new();
    inputs
        .iter()
        .enumerate()
        .map(|(i, input)| {
            let output = output_path(input, out_dir, compression);
            let owner = *claimed.entry(output.clone()).or_insert(i);
            let clash = (owner != i).then(|| inputs[owner].as_path());
            (output, clash)
        })
        .collect()
}

/// Convert one file to one CSV file.
///
/// # Errors
/// Returns an error if the input cannot be opened, the output cannot be
/// created, or the conversion aborts.
pub fn convert_file(input: &Path, output: &Path, options: &RunnerOptions) -> Result<ConversionSummary> {
    let mut decoder = open_decoder(input)?;
    let mut sink = create_csv_file(output, &options.csv)?;
    let summary = convert(&mut decoder, &mut sink, &options.convert)
        .with_context(|| format!("convert {}", input.display()))?;
    finish_csv_file(sink)
        .map_err(ConvertError::SinkWrite)
        .with_context(|| format!("write {}", output.display()))?;
    Ok(summary)
}

/// Convert every input into `out_dir` in parallel.
///
/// # Errors
/// Returns an error only when the thread pool cannot be built or the
/// compression extension is unknown; per-file failures land in the report.
pub fn convert_files(inputs: &[PathBuf], out_dir: &Path, options: &RunnerOptions) -> Result<RunReport> {
    if let Some(ext) = options.compression.as_deref()
        && find_codec(ext).is_none()
    {
        return Err(anyhow!("unknown compression {ext:?}"));
    }

    let threads = options.threads.unwrap_or_else(num_cpus::get).max(1);
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .context("build conversion thread pool")?;
    info!(files = inputs.len(), threads, "converting files");

    let plan = plan_outputs(inputs, out_dir, options.compression.as_deref());
    let outcomes: Vec<FileOutcome> = pool.install(|| {
        inputs
            .par_iter()
            .zip(plan)
            .map(|(input, (output, clash))| {
                let result = match clash {
                    Some(owner) => Err(anyhow!(
                        "output {} already produced by {}",
                        output.display(),
                        owner.display()
                    )),
                    None => convert_file(input, &output, options),
                };
                let status = match result {
                    Ok(summary) => FileStatus::Converted(summary),
                    Err(e) => {
                        warn!(input = %input.display(), error = %format!("{e:#}"), "conversion failed");
                        FileStatus::Failed(format!("{e:#}"))
                    }
                };
                FileOutcome {
                    input: input.clone(),
                    output: clash.is_none().then_some(output),
                    status,
                }
            })
            .collect()
    });

    Ok(RunReport { files: outcomes })
}
