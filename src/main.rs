mod cli;

use anyhow::{Result, bail};
use clap::Parser;
use cli::Cli;
use statcsv::convert::{ConvertOptions, convert};
use statcsv::io::csv::{CsvOptions, stdout_csv};
use statcsv::io::glob::expand_inputs;
use statcsv::io::open_decoder;
use statcsv::metrics::{FileOutcome, FileStatus, RunReport};
use statcsv::runner::{RunnerOptions, convert_files};
use std::path::Path;
use std::process::ExitCode;

fn init_tracing(cli: &Cli) {
    // --quiet silences everything, --verbose honours RUST_LOG (info otherwise),
    // the default only lets warnings through so stdout stays pure CSV.
    let filter = if cli.quiet {
        tracing_subscriber::EnvFilter::new("off")
    } else if cli.verbose {
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into())
    } else {
        tracing_subscriber::EnvFilter::new("warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli);

    match run(&cli) {
        Ok(report) if report.failures() == 0 => ExitCode::SUCCESS,
        Ok(report) => {
            for f in report.files.iter().filter(|f| !f.is_ok()) {
                if let FileStatus::Failed(e) = &f.status {
                    eprintln!("error: {}: {e}", f.input.display());
                }
            }
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<RunReport> {
    let convert_options = ConvertOptions::default().with_batch_size(cli.batch_size);
    let csv_options = CsvOptions::default().with_delimiter_str(&cli.delimiter)?;
    let inputs = expand_inputs(&cli.inputs)?;

    let report = match &cli.out_dir {
        Some(out_dir) => {
            let options = RunnerOptions {
                convert: convert_options,
                csv: csv_options,
                compression: cli.compress.clone(),
                threads: cli.jobs,
            };
            convert_files(&inputs, out_dir, &options)?
        }
        None => {
            let [input] = inputs.as_slice() else {
                bail!(
                    "{} inputs given; writing to standard output takes exactly one (use --out-dir for several)",
                    inputs.len()
                );
            };
            let status = match convert_to_stdout(input, &convert_options, &csv_options) {
                Ok(summary) => FileStatus::Converted(summary),
                Err(e) => FileStatus::Failed(format!("{e:#}")),
            };
            RunReport {
                files: vec![FileOutcome {
                    input: input.clone(),
                    output: None,
                    status,
                }],
            }
        }
    };

    if let Some(path) = &cli.metrics {
        report.save_to_file(path)?;
    }
    if cli.verbose {
        report.print();
    }
    Ok(report)
}

fn convert_to_stdout(
    input: &Path,
    convert_options: &ConvertOptions,
    csv_options: &CsvOptions,
) -> Result<statcsv::ConversionSummary> {
    let mut decoder = open_decoder(input)?;
    let mut sink = stdout_csv(csv_options);
    Ok(convert(&mut decoder, &mut sink, convert_options)?)
}
