//! Calling pipeline stages: the variant-based Mendelian filter (C6) and the
//! read-based Bayesian refiner (C7), composable into the FULL pipeline by
//! the orchestrator (C8).

pub mod read_caller;
pub mod variant_caller;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::genotype::{Allele, Genotype, TrioMember};
use crate::reads::ReadSummary;

/// One row of the candidates file: a Mendelian-inconsistent SNV position
/// flagged by the variant stage. Positions here are 1-based, converted from
/// this crate's internal 0-based convention at construction time (spec §9),
/// matching the external service's own coordinate convention.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CandidateRecord {
    pub reference_name: String,
    pub position: u64,
}

impl CandidateRecord {
    pub fn new(reference_name: String, zero_based_position: u64) -> Self {
        CandidateRecord {
            reference_name,
            position: zero_based_position + 1,
        }
    }
}

fn format_read_summary(summary: &ReadSummary) -> String {
    [Allele::A, Allele::C, Allele::G, Allele::T]
        .iter()
        .map(|&allele| format!("{}={}", allele, summary.count(allele)))
        .collect::<Vec<_>>()
        .join(",")
}

fn format_read_counts(per_member: &HashMap<TrioMember, ReadSummary>) -> String {
    let empty = ReadSummary::new();
    format!(
        "DAD:{{{}}};MOM:{{{}}};CHILD:{{{}}}",
        format_read_summary(per_member.get(&TrioMember::Dad).unwrap_or(&empty)),
        format_read_summary(per_member.get(&TrioMember::Mom).unwrap_or(&empty)),
        format_read_summary(per_member.get(&TrioMember::Child).unwrap_or(&empty)),
    )
}

/// A final call: a candidate position plus the read-based refiner's decision,
/// serialized as the documented
/// `readCounts=DAD:{..};MOM:{..};CHILD:{..},maxGenoType=[..],isDenovo=..`
/// details string.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FinalCallRecord {
    pub reference_name: String,
    pub position: u64,
    pub details: String,
}

impl FinalCallRecord {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        reference_name: String,
        position: u64,
        per_member: &HashMap<TrioMember, ReadSummary>,
        dad: Genotype,
        mom: Genotype,
        child: Genotype,
        is_denovo: bool,
    ) -> Self {
        let details = format!(
            "readCounts={},maxGenoType=[{}, {}, {}],isDenovo={}",
            format_read_counts(per_member),
            dad,
            mom,
            child,
            is_denovo,
        );
        FinalCallRecord {
            reference_name,
            position,
            details,
        }
    }
}
