//! Command-line surface (spec §6 flag table). Flag parsing only; argument
//! validation and defaults are resolved into a `crate::config::Config` by
//! that module.

use std::path::PathBuf;
use std::str::FromStr;

use structopt::StructOpt;

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum CallerArg {
    Variant,
    Read,
    Full,
}

impl FromStr for CallerArg {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "VARIANT" => Ok(CallerArg::Variant),
            "READ" => Ok(CallerArg::Read),
            "FULL" => Ok(CallerArg::Full),
            other => Err(format!(
                "unknown caller mode {:?} (expected VARIANT, READ, or FULL)",
                other
            )),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum InferenceMethodArg {
    Map,
    Bayes,
    Lrt,
}

impl FromStr for InferenceMethodArg {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "MAP" => Ok(InferenceMethodArg::Map),
            "BAYES" => Ok(InferenceMethodArg::Bayes),
            "LRT" => Ok(InferenceMethodArg::Lrt),
            other => Err(format!(
                "unknown inference method {:?} (expected MAP, BAYES, or LRT)",
                other
            )),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum LogLevelArg {
    Error,
    Info,
    Debug,
}

impl FromStr for LogLevelArg {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "ERROR" => Ok(LogLevelArg::Error),
            "INFO" => Ok(LogLevelArg::Info),
            "DEBUG" => Ok(LogLevelArg::Debug),
            other => Err(format!(
                "unknown log level {:?} (expected ERROR, INFO, or DEBUG)",
                other
            )),
        }
    }
}

/// A statistical de novo SNV caller for parent-parent-child trios.
#[derive(Debug, Clone, StructOpt)]
#[structopt(
    name = "denovo-caller",
    setting = structopt::clap::AppSettings::ColoredHelp,
)]
pub struct Opt {
    /// Which stage(s) to run: VARIANT, READ, or FULL.
    #[structopt(long)]
    pub caller: CallerArg,

    /// Decision rule for the read-based refiner. Required for READ/FULL.
    #[structopt(long)]
    pub inference_method: Option<InferenceMethodArg>,

    #[structopt(long, parse(from_os_str))]
    pub client_secrets_filename: PathBuf,

    #[structopt(long)]
    pub dataset_id: String,

    #[structopt(long)]
    pub dad_callset_name: Option<String>,

    #[structopt(long)]
    pub mom_callset_name: Option<String>,

    #[structopt(long)]
    pub child_callset_name: Option<String>,

    /// May be repeated; defaults to every chromosome in the dataset.
    #[structopt(long)]
    pub chromosome: Vec<String>,

    #[structopt(long)]
    pub start_position: Option<u64>,

    #[structopt(long)]
    pub end_position: Option<u64>,

    #[structopt(long, default_value = "1e-8")]
    pub denovo_mut_rate: f64,

    #[structopt(long, default_value = "1e-2")]
    pub seq_err_rate: f64,

    #[structopt(long, default_value = "1.0")]
    pub lrt_threshold: f64,

    #[structopt(long, default_value = "1")]
    pub num_threads: usize,

    #[structopt(long, default_value = "10000")]
    pub max_variant_results: u32,

    #[structopt(long, default_value = "5")]
    pub max_api_retries: u32,

    /// Pre-computed candidates file; required when `--caller=READ`.
    #[structopt(long, parse(from_os_str))]
    pub input_calls_file: Option<PathBuf>,

    #[structopt(long, parse(from_os_str))]
    pub output_file: Option<PathBuf>,

    #[structopt(long, default_value = "INFO")]
    pub log_level: LogLevelArg,
}
