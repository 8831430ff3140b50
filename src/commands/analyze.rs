use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use bio::io::{fasta, fastq};
use niffler::get_reader;
use tracing::{error, info};

use crate::cli::InputFormat;
use crate::config::PipelineConfig;
use crate::pipeline::LtrPipeline;
use crate::report;

pub struct AnalyzeOptions {
    pub input_file: String,
    pub format: InputFormat,
    pub coarse_threshold: f64,
    pub final_threshold: f64,
    pub gap_open: f32,
    pub gap_extend: f32,
    pub output_file: Option<String>,
    pub json: bool,
}

pub fn run(options: AnalyzeOptions) -> Result<()> {
    let config = PipelineConfig::default()
        .with_thresholds(options.coarse_threshold, options.final_threshold)
        .with_gap_penalties(options.gap_open, options.gap_extend);
    let pipeline = LtrPipeline::new(config);

    let mut out: Box<dyn Write> = match &options.output_file {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("failed to create {}", path))?,
        )),
        None => Box::new(std::io::stdout().lock()),
    };

    let result = process_records(&pipeline, &options, &mut out);
    if let Err(e) = &result {
        error!("Error processing file: {}", e);
    }
    out.flush()?;
    result
}

/// Stream records from the input and report each one. Any record failure is
/// fatal for the run; reports already written stand.
fn process_records(
    pipeline: &LtrPipeline,
    options: &AnalyzeOptions,
    out: &mut dyn Write,
) -> Result<()> {
    let reader = open_input(Path::new(&options.input_file))?;

    match options.format {
        InputFormat::Fasta => {
            for record in fasta::Reader::new(reader).records() {
                let record = record.context("malformed FASTA record")?;
                report_record(pipeline, record.id(), record.seq(), options.json, out)?;
            }
        }
        InputFormat::Fastq => {
            for record in fastq::Reader::new(reader).records() {
                let record = record.context("malformed FASTQ record")?;
                report_record(pipeline, record.id(), record.seq(), options.json, out)?;
            }
        }
    }
    Ok(())
}

fn report_record(
    pipeline: &LtrPipeline,
    id: &str,
    seq: &[u8],
    json: bool,
    out: &mut dyn Write,
) -> Result<()> {
    info!(record = id, length = seq.len(), "analyzing sequence");
    let raw = String::from_utf8_lossy(seq);
    let decision = pipeline
        .check_record(&raw)
        .with_context(|| format!("failed to analyze record {}", id))?;

    if json {
        report::write_json(out, id, &decision)?;
    } else {
        report::write_text(out, id, &decision)?;
    }
    Ok(())
}

/// Open a possibly compressed sequence file as a buffered reader.
fn open_input(path: &Path) -> Result<BufReader<Box<dyn std::io::Read>>> {
    let file =
        File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let (inner, _compression) = get_reader(Box::new(file))?;
    Ok(BufReader::new(inner))
}
