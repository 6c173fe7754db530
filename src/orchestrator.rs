//! Top-level pipeline orchestration (component C8): VARIANT, READ, and FULL
//! modes, run across a rayon thread pool with one task per chromosome
//! (VARIANT/FULL variant stage) or per candidate (READ/FULL refine stage),
//! sharing a single output sink.

use std::fs::File;
use std::io::Write as _;
use std::path::Path;
use std::sync::Mutex;

use serde::Serialize;

use crate::bayesnet::TrioBayesNet;
use crate::calling::{read_caller, variant_caller, CandidateRecord, FinalCallRecord};
use crate::config::{CallerMode, Config};
use crate::errors::Error;
use crate::output::OutputWriter;
use crate::remote::GenomicsClient;

const DEFAULT_PAGE_SIZE: u32 = 1000;

/// Run the pipeline described by `config` against `client`.
pub fn run(client: &dyn GenomicsClient, config: &Config) -> Result<(), Error> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(config.num_threads)
        .build()
        .map_err(|e| Error::InvariantViolation(format!("failed to build thread pool: {}", e)))?
        .install(|| match config.caller {
            CallerMode::Variant => run_variant(client, config),
            CallerMode::Read => run_read(client, config),
            CallerMode::Full => run_full(client, config),
        })
}

fn chromosomes(config: &Config) -> Result<&[String], Error> {
    if config.chromosomes.is_empty() {
        // Enumerating "every chromosome in the dataset" requires a catalog
        // call this crate's remote contract does not expose (spec §6); at
        // least one --chromosome must be given explicitly.
        Err(Error::MissingFlag { flag: "chromosome" })
    } else {
        Ok(&config.chromosomes)
    }
}

fn open_output(config: &Config) -> Result<OutputWriter, Error> {
    let sink: Box<dyn std::io::Write + Send> = match &config.output_file {
        Some(path) => Box::new(File::create(path).map_err(|e| Error::InvariantViolation(e.to_string()))?),
        None => Box::new(std::io::stdout()),
    };
    Ok(OutputWriter::new(sink))
}

fn serialize_row<T: Serialize>(record: &T) -> Result<String, Error> {
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(vec![]);
    writer
        .serialize(record)
        .map_err(|e| Error::InvariantViolation(format!("failed to serialize row: {}", e)))?;
    let bytes = writer
        .into_inner()
        .map_err(|e| Error::InvariantViolation(format!("failed to flush row: {}", e)))?;
    let line = String::from_utf8(bytes).map_err(|e| Error::InvariantViolation(e.to_string()))?;
    Ok(line.trim_end().to_string())
}

fn collect_variant_candidates(
    client: &dyn GenomicsClient,
    config: &Config,
) -> Result<Vec<CandidateRecord>, Error> {
    let chroms = chromosomes(config)?;
    let start = config.start_position.unwrap_or(0);
    // Absent an explicit end, fetching "the rest of the contig" requires a
    // length catalog this crate's remote contract does not expose; callers
    // must pass --end_position for now (see DESIGN.md).
    let end = config
        .end_position
        .ok_or(Error::MissingFlag { flag: "end_position" })?;

    let results = Mutex::new(Vec::new());

    rayon::scope(|scope| {
        for reference_name in chroms {
            let results = &results;
            scope.spawn(move |_| {
                match variant_caller::call_variants(
                    client,
                    &config.trio_names,
                    reference_name,
                    start,
                    end,
                    config.max_variant_results,
                    config.max_api_retries,
                ) {
                    Ok(mut candidates) => results.lock().unwrap().append(&mut candidates),
                    Err(e) => {
                        // One contig's exhausted retries abandons that unit of
                        // work only; sibling contigs' results are kept (spec §5/§7).
                        log::error!("variant calling failed for {}: {}", reference_name, e);
                    }
                }
            });
        }
    });

    Ok(results.into_inner().unwrap())
}

fn run_variant(client: &dyn GenomicsClient, config: &Config) -> Result<(), Error> {
    let candidates = collect_variant_candidates(client, config)?;
    let writer = open_output(config)?;
    for candidate in &candidates {
        writer
            .write_line(&serialize_row(candidate)?)
            .map_err(|e| Error::InvariantViolation(e.to_string()))?;
    }
    Ok(())
}

fn read_candidates_file(path: &Path) -> Result<Vec<CandidateRecord>, Error> {
    let file = File::open(path).map_err(|_| Error::CandidatesFileNotFound { path: path.to_path_buf() })?;
    let mut reader = csv::ReaderBuilder::new().has_headers(false).from_reader(file);
    let mut candidates = Vec::new();
    for result in reader.deserialize() {
        match result {
            Ok(record) => candidates.push(record),
            Err(e) => {
                // A malformed line is a data anomaly, not fatal: log it and
                // keep reading the rest of the file (spec §7).
                let anomaly = Error::DataAnomaly {
                    line: format!("{:?}", path),
                    reason: e.to_string(),
                };
                log::error!("{}", anomaly);
            }
        }
    }
    Ok(candidates)
}

fn refine_candidates(
    client: &dyn GenomicsClient,
    config: &Config,
    candidates: &[CandidateRecord],
) -> Result<Vec<FinalCallRecord>, Error> {
    let method = config
        .inference_method
        .ok_or(Error::MissingFlag { flag: "inference_method" })?;
    let net = TrioBayesNet::new(config.seq_err_rate, config.denovo_mut_rate);

    let results = Mutex::new(Vec::with_capacity(candidates.len()));

    rayon::scope(|scope| {
        for candidate in candidates {
            let results = &results;
            let net = &net;
            scope.spawn(move |_| {
                match read_caller::refine_candidate(
                    client,
                    &config.trio_names,
                    net,
                    method,
                    candidate,
                    config.max_api_retries,
                    config.lrt_threshold,
                ) {
                    Ok(final_call) => results.lock().unwrap().push(final_call),
                    Err(e) => {
                        // One candidate's exhausted retries abandons that unit
                        // of work only; sibling candidates' calls are kept
                        // (spec §5/§7).
                        log::error!(
                            "read-based refinement failed for {}:{}: {}",
                            candidate.reference_name,
                            candidate.position,
                            e
                        );
                    }
                }
            });
        }
    });

    Ok(results.into_inner().unwrap())
}

fn run_read(client: &dyn GenomicsClient, config: &Config) -> Result<(), Error> {
    let path = config
        .input_calls_file
        .as_ref()
        .ok_or(Error::MissingCandidatesFile)?;
    let candidates = read_candidates_file(path)?;
    let final_calls = refine_candidates(client, config, &candidates)?;

    let writer = open_output(config)?;
    for final_call in &final_calls {
        writer
            .write_line(&serialize_row(final_call)?)
            .map_err(|e| Error::InvariantViolation(e.to_string()))?;
    }
    Ok(())
}

/// Runs the variant filter and the read refiner back to back, staging the
/// intermediate candidates in a scratch file so both stages go through the
/// same file-shaped interface as VARIANT/READ mode.
fn run_full(client: &dyn GenomicsClient, config: &Config) -> Result<(), Error> {
    let candidates = collect_variant_candidates(client, config)?;

    let mut scratch =
        tempfile::NamedTempFile::new().map_err(|e| Error::InvariantViolation(e.to_string()))?;
    {
        let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(&mut scratch);
        for candidate in &candidates {
            writer
                .serialize(candidate)
                .map_err(|e| Error::InvariantViolation(e.to_string()))?;
        }
        writer.flush().map_err(|e| Error::InvariantViolation(e.to_string()))?;
    }
    scratch.flush().map_err(|e| Error::InvariantViolation(e.to_string()))?;

    let staged = read_candidates_file(scratch.path())?;
    let final_calls = refine_candidates(client, config, &staged)?;

    let writer = open_output(config)?;
    for final_call in &final_calls {
        writer
            .write_line(&serialize_row(final_call)?)
            .map_err(|e| Error::InvariantViolation(e.to_string()))?;
    }
    Ok(())
}
