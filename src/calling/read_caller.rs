//! Read-based Bayesian refiner (component C7).
//!
//! Fetches aligned reads around each candidate position for all three trio
//! members, summarizes them per-allele (C2), and runs the joint inference
//! engine (C4) over the trio's Bayesian network (C3) to decide whether a
//! candidate is a genuine de novo call under the configured `Method`.

use std::collections::HashMap;

use crate::bayesnet::TrioBayesNet;
use crate::calling::{CandidateRecord, FinalCallRecord};
use crate::config::TrioNames;
use crate::errors::Error;
use crate::genotype::TrioMember;
use crate::inference::{InferenceEngine, Method};
use crate::reads::ReadSummary;
use crate::remote::{retry, GenomicsClient};

/// Refine one candidate: fetch reads for all three members around
/// `candidate.position` and run the inference engine.
#[allow(clippy::too_many_arguments)]
pub fn refine_candidate(
    client: &dyn GenomicsClient,
    trio_names: &TrioNames,
    net: &TrioBayesNet,
    method: Method,
    candidate: &CandidateRecord,
    max_api_retries: u32,
    lrt_threshold: f64,
) -> Result<FinalCallRecord, Error> {
    // internal 0-based position, converted back from the 1-based candidate
    // file representation (spec §9).
    let zero_based = candidate.position - 1;
    let window_start = zero_based;
    let window_end = zero_based + 1;

    let mut per_member = HashMap::new();
    for (member, callset_name) in [
        (TrioMember::Dad, &trio_names.dad),
        (TrioMember::Mom, &trio_names.mom),
        (TrioMember::Child, &trio_names.child),
    ]
    .iter()
    {
        let reads = retry(max_api_retries, || {
            client.list_reads(callset_name, &candidate.reference_name, window_start, window_end)
        })?;
        per_member.insert(*member, ReadSummary::from_reads(&reads, zero_based));
    }

    let engine = InferenceEngine::new(net, lrt_threshold);
    let decision = engine.infer(&per_member, method);

    Ok(FinalCallRecord::new(
        candidate.reference_name.clone(),
        candidate.position,
        &per_member,
        decision.argmax.0,
        decision.argmax.1,
        decision.argmax.2,
        decision.is_denovo,
    ))
}
