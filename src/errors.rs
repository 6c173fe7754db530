use std::path::PathBuf;

use thiserror::Error;

/// Error taxonomy for the caller, matching the four classes in spec §7:
/// configuration, external transport, data anomaly, and invariant
/// violation. A negative decision (a position simply not being denovo) is
/// not an error and never appears here.
#[derive(Error, Debug)]
pub enum Error {
    #[error("missing required flag --{flag}")]
    MissingFlag { flag: &'static str },

    #[error("invalid value for --{flag}: {reason}")]
    InvalidFlag { flag: &'static str, reason: String },

    #[error("--caller=READ requires --input_calls_file")]
    MissingCandidatesFile,

    #[error("candidates file not found: {path:?}")]
    CandidatesFileNotFound { path: PathBuf },

    #[error("remote fetch failed after {attempts} attempts: {source}")]
    Transport {
        attempts: u32,
        #[source]
        source: anyhow::Error,
    },

    #[error("malformed candidate line {line:?}: {reason}")]
    DataAnomaly { line: String, reason: String },

    #[error("invariant violation: {0}")]
    InvariantViolation(String),
}
