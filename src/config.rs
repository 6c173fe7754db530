//! Resolves parsed command-line flags (spec §6) into a validated run
//! configuration, applying the documented defaults and fail-fast checks.

use std::convert::TryFrom;
use std::path::PathBuf;

use crate::cli::{CallerArg, InferenceMethodArg, LogLevelArg, Opt};
use crate::errors::Error;
use crate::inference::Method;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CallerMode {
    Variant,
    Read,
    Full,
}

/// Three callset identities resolved (by name, via the remote service) to
/// the trio's constituent samples. All three stages need all three: VARIANT
/// and FULL resolve variant callset ids from them, READ and FULL resolve
/// read-group-set ids from them.
#[derive(Clone, Debug)]
pub struct TrioNames {
    pub dad: String,
    pub mom: String,
    pub child: String,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub caller: CallerMode,
    pub inference_method: Option<Method>,
    pub client_secrets_filename: PathBuf,
    pub dataset_id: String,
    pub trio_names: TrioNames,
    pub chromosomes: Vec<String>,
    pub start_position: Option<u64>,
    pub end_position: Option<u64>,
    pub denovo_mut_rate: f64,
    pub seq_err_rate: f64,
    pub lrt_threshold: f64,
    pub num_threads: usize,
    pub max_variant_results: u32,
    pub max_api_retries: u32,
    pub input_calls_file: Option<PathBuf>,
    pub output_file: Option<PathBuf>,
    pub log_level: LogLevelArg,
}

impl TryFrom<Opt> for Config {
    type Error = Error;

    fn try_from(opt: Opt) -> Result<Self, Error> {
        let caller = match opt.caller {
            CallerArg::Variant => CallerMode::Variant,
            CallerArg::Read => CallerMode::Read,
            CallerArg::Full => CallerMode::Full,
        };

        let inference_method = match opt.inference_method {
            Some(InferenceMethodArg::Map) => Some(Method::Map),
            Some(InferenceMethodArg::Bayes) => Some(Method::Bayes),
            Some(InferenceMethodArg::Lrt) => Some(Method::Lrt),
            None => None,
        };
        if matches!(caller, CallerMode::Read | CallerMode::Full) && inference_method.is_none() {
            return Err(Error::MissingFlag {
                flag: "inference_method",
            });
        }

        if caller == CallerMode::Read && opt.input_calls_file.is_none() {
            return Err(Error::MissingCandidatesFile);
        }

        let dad = opt.dad_callset_name.ok_or(Error::MissingFlag {
            flag: "dad_callset_name",
        })?;
        let mom = opt.mom_callset_name.ok_or(Error::MissingFlag {
            flag: "mom_callset_name",
        })?;
        let child = opt.child_callset_name.ok_or(Error::MissingFlag {
            flag: "child_callset_name",
        })?;

        if opt.denovo_mut_rate <= 0.0 || opt.denovo_mut_rate >= 1.0 {
            return Err(Error::InvalidFlag {
                flag: "denovo_mut_rate",
                reason: "must lie in (0, 1)".to_string(),
            });
        }
        if opt.seq_err_rate <= 0.0 || opt.seq_err_rate >= 1.0 {
            return Err(Error::InvalidFlag {
                flag: "seq_err_rate",
                reason: "must lie in (0, 1)".to_string(),
            });
        }
        if opt.lrt_threshold <= 0.0 {
            return Err(Error::InvalidFlag {
                flag: "lrt_threshold",
                reason: "must be positive".to_string(),
            });
        }
        if opt.num_threads == 0 {
            return Err(Error::InvalidFlag {
                flag: "num_threads",
                reason: "must be at least 1".to_string(),
            });
        }
        if let (Some(start), Some(end)) = (opt.start_position, opt.end_position) {
            if end <= start {
                return Err(Error::InvalidFlag {
                    flag: "end_position",
                    reason: "must be greater than start_position".to_string(),
                });
            }
        }

        Ok(Config {
            caller,
            inference_method,
            client_secrets_filename: opt.client_secrets_filename,
            dataset_id: opt.dataset_id,
            trio_names: TrioNames { dad, mom, child },
            chromosomes: opt.chromosome,
            start_position: opt.start_position,
            end_position: opt.end_position,
            denovo_mut_rate: opt.denovo_mut_rate,
            seq_err_rate: opt.seq_err_rate,
            lrt_threshold: opt.lrt_threshold,
            num_threads: opt.num_threads,
            max_variant_results: opt.max_variant_results,
            max_api_retries: opt.max_api_retries,
            input_calls_file: opt.input_calls_file,
            output_file: opt.output_file,
            log_level: opt.log_level,
        })
    }
}
