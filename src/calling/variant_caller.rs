//! Variant-based Mendelian-inconsistency filter (component C6).
//!
//! Streams paged variant records for the trio from the remote service,
//! assembles them through the `VariantsBuffer` (C5), and emits a candidate
//! for every position whose genotype triple is not Mendelian-consistent
//! (spec §4.6). This stage looks only at genotypes, never at read counts;
//! it is a cheap, high-recall prefilter ahead of the read-based refiner.

use std::collections::HashMap;

use crate::buffer::{PositionCall, VariantsBuffer};
use crate::calling::CandidateRecord;
use crate::config::TrioNames;
use crate::errors::Error;
use crate::genotype::{is_denovo_precomputed, TrioMember};
use crate::remote::{retry, GenomicsClient, VariantRecord};

/// Resolve the three per-member genotypes for a matched position, or `None`
/// if any of them failed to decode (treated as a data anomaly, not fatal:
/// the position is simply skipped, per spec §7).
fn mendelian_check(position_call: &PositionCall) -> Option<bool> {
    let dad = position_call.dad_genotype()?;
    let mom = position_call.mom_genotype()?;
    let child = position_call.child_genotype()?;
    Some(!is_denovo_precomputed(dad, mom, child))
}

fn candidate_from(position_call: &PositionCall) -> Option<CandidateRecord> {
    Some(CandidateRecord::new(
        position_call.reference_name.clone(),
        position_call.position,
    ))
}

/// Stream the trio's variants for `[start, end)` on `reference_name` and
/// return every candidate Mendelian-inconsistent SNV position.
pub fn call_variants(
    client: &dyn GenomicsClient,
    trio_names: &TrioNames,
    reference_name: &str,
    start: u64,
    end: u64,
    page_size: u32,
    max_api_retries: u32,
) -> Result<Vec<CandidateRecord>, Error> {
    let callset_ids = vec![
        trio_names.dad.clone(),
        trio_names.mom.clone(),
        trio_names.child.clone(),
    ];
    let member_by_callset: HashMap<&str, TrioMember> = [
        (trio_names.dad.as_str(), TrioMember::Dad),
        (trio_names.mom.as_str(), TrioMember::Mom),
        (trio_names.child.as_str(), TrioMember::Child),
    ]
    .iter()
    .cloned()
    .collect();

    let mut buffer = VariantsBuffer::new();
    let mut candidates = Vec::new();
    let mut page_token: Option<String> = None;

    loop {
        let page = retry(max_api_retries, || {
            client.list_variants(
                reference_name,
                start,
                end,
                &callset_ids,
                page_size,
                page_token.as_deref(),
            )
        })?;

        for record in page.variants {
            admit_record(&mut buffer, &member_by_callset, record);
            drain_ready(&mut buffer, &mut candidates);
        }

        match page.next_page_token {
            Some(token) => page_token = Some(token),
            None => break,
        }
    }

    for position_call in buffer.final_flush() {
        if let Some(false) = mendelian_check(&position_call) {
            if let Some(candidate) = candidate_from(&position_call) {
                candidates.push(candidate);
            }
        }
    }

    Ok(candidates)
}

fn admit_record(
    buffer: &mut VariantsBuffer,
    member_by_callset: &HashMap<&str, TrioMember>,
    record: VariantRecord,
) {
    for (callset_id, call) in record.calls {
        if let Some(&member) = member_by_callset.get(callset_id.as_str()) {
            buffer.check_and_add(member, (record.variant.clone(), call));
        } else {
            log::debug!("ignoring call from unrelated callset {}", callset_id);
        }
    }
}

fn drain_ready(buffer: &mut VariantsBuffer, candidates: &mut Vec<CandidateRecord>) {
    while buffer.can_process() {
        if let Some(position_call) = buffer.retrieve_next_call() {
            if let Some(false) = mendelian_check(&position_call) {
                if let Some(candidate) = candidate_from(&position_call) {
                    candidates.push(candidate);
                }
            }
        }
        buffer.pop(TrioMember::Child);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reads::Alignment;
    use crate::variant::{Call, Variant};
    use std::collections::HashMap as Map;
    use std::sync::Mutex;

    struct StubClient {
        pages: Mutex<Vec<crate::remote::VariantPage>>,
    }

    impl GenomicsClient for StubClient {
        fn list_variants(
            &self,
            _reference_name: &str,
            _start: u64,
            _end: u64,
            _callset_ids: &[String],
            _page_size: u32,
            _page_token: Option<&str>,
        ) -> anyhow::Result<crate::remote::VariantPage> {
            let mut pages = self.pages.lock().unwrap();
            if pages.is_empty() {
                Ok(crate::remote::VariantPage::default())
            } else {
                Ok(pages.remove(0))
            }
        }

        fn list_reads(
            &self,
            _read_group_set_id: &str,
            _reference_name: &str,
            _start: u64,
            _end: u64,
        ) -> anyhow::Result<Vec<Alignment>> {
            Ok(vec![])
        }
    }

    fn pass_call(genotype: Vec<i32>) -> Call {
        let mut info = Map::new();
        info.insert("FILTER".to_string(), "PASS".to_string());
        Call { genotype, info }
    }

    fn snv(start: u64, reference_bases: &str, alt: &str) -> Variant {
        Variant {
            reference_name: "chr1".to_string(),
            start,
            end: start + 1,
            reference_bases: reference_bases.to_string(),
            alternate_bases: vec![alt.to_string()],
        }
    }

    fn block(start: u64, end: u64, reference_bases: &str) -> Variant {
        Variant {
            reference_name: "chr1".to_string(),
            start,
            end,
            reference_bases: reference_bases.to_string(),
            alternate_bases: vec![],
        }
    }

    #[test]
    fn flags_heterozygous_child_with_homozygous_parents() {
        let names = TrioNames {
            dad: "dad".to_string(),
            mom: "mom".to_string(),
            child: "child".to_string(),
        };

        let page = crate::remote::VariantPage {
            variants: vec![
                VariantRecord {
                    variant: block(0, 10, "A"),
                    calls: vec![("dad".to_string(), pass_call(vec![0, 0]))],
                },
                VariantRecord {
                    variant: block(0, 10, "A"),
                    calls: vec![("mom".to_string(), pass_call(vec![0, 0]))],
                },
                VariantRecord {
                    variant: snv(5, "A", "C"),
                    calls: vec![("child".to_string(), pass_call(vec![0, 1]))],
                },
            ],
            next_page_token: None,
        };

        let client = StubClient {
            pages: Mutex::new(vec![page]),
        };

        let candidates = call_variants(&client, &names, "chr1", 0, 10, 100, 3).unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].reference_name, "chr1");
        assert_eq!(candidates[0].position, 6);
    }

    #[test]
    fn mendelian_consistent_site_yields_no_candidate() {
        let names = TrioNames {
            dad: "dad".to_string(),
            mom: "mom".to_string(),
            child: "child".to_string(),
        };

        let page = crate::remote::VariantPage {
            variants: vec![
                VariantRecord {
                    variant: snv(5, "A", "C"),
                    calls: vec![("dad".to_string(), pass_call(vec![0, 1]))],
                },
                VariantRecord {
                    variant: block(0, 10, "A"),
                    calls: vec![("mom".to_string(), pass_call(vec![0, 0]))],
                },
                VariantRecord {
                    variant: snv(5, "A", "C"),
                    calls: vec![("child".to_string(), pass_call(vec![0, 1]))],
                },
            ],
            next_page_token: None,
        };

        let client = StubClient {
            pages: Mutex::new(vec![page]),
        };

        let candidates = call_variants(&client, &names, "chr1", 0, 10, 100, 3).unwrap();
        assert!(candidates.is_empty());
    }
}
