//! Streaming trio coordination buffer (component C5).
//!
//! The external variant stream advances independently per trio member and
//! may deliver gVCF reference-confidence blocks spanning many bases. This
//! buffer holds each member's pending `(Variant, Call)` pairs in
//! arrival order and matches a child SNV position against whichever parent
//! records currently span it, without requiring the three streams to be
//! synchronized record-by-record.

use std::collections::{HashMap, VecDeque};

use crate::genotype::{Genotype, TrioMember};
use crate::variant::{Call, Variant};

/// A trio of `(Variant, Call)` pairs resolved to a single candidate
/// position, ready for the Mendelian check (C6) or read-based refinement
/// (C7).
#[derive(Clone, Debug)]
pub struct PositionCall {
    pub reference_name: String,
    /// 0-based position, shared by all three members.
    pub position: u64,
    pub dad: (Variant, Call),
    pub mom: (Variant, Call),
    pub child: (Variant, Call),
}

impl PositionCall {
    fn child_ref_base(&self) -> u8 {
        self.child.0.reference_bases.as_bytes()[0]
    }

    pub fn child_genotype(&self) -> Option<Genotype> {
        self.child.0.call_genotype(&self.child.1)
    }

    pub fn dad_genotype(&self) -> Option<Genotype> {
        resolve_parent_genotype(&self.dad, self.child_ref_base())
    }

    pub fn mom_genotype(&self) -> Option<Genotype> {
        resolve_parent_genotype(&self.mom, self.child_ref_base())
    }
}

/// Decode a matched parent `(Variant, Call)` into the genotype implied at
/// the matched position: its own SNV genotype if the spanning record is
/// itself an SNV, or homozygous-reference (using the child's reference
/// base) if it is a gVCF reference block.
fn resolve_parent_genotype(matched: &(Variant, Call), child_ref_base: u8) -> Option<Genotype> {
    let (variant, call) = matched;
    if variant.call_is_snv(call) {
        variant.call_genotype(call)
    } else {
        Variant::homozygous_reference_genotype(child_ref_base)
    }
}

/// Per-member queue state, tracked only for documentation/diagnostics; the
/// buffer's actual behavior is driven by queue contents and
/// `most_recent_start`, not by an explicit state tag.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum QueueState {
    Empty,
    Buffering,
    Matured,
}

/// Streaming per-person variant queues that assemble co-located trio calls
/// across gVCF reference blocks. See spec §4.5.
#[derive(Debug, Default)]
pub struct VariantsBuffer {
    queues: HashMap<TrioMember, VecDeque<(Variant, Call)>>,
    most_recent_start: HashMap<TrioMember, u64>,
}

impl VariantsBuffer {
    pub fn new() -> Self {
        VariantsBuffer {
            queues: HashMap::new(),
            most_recent_start: HashMap::new(),
        }
    }

    /// Validate and admit a `(Variant, Call)` pair for `member`. Returns
    /// `false` (and does not enqueue) if any admission filter from spec
    /// §4.5 rejects the pair.
    pub fn check_and_add(&mut self, member: TrioMember, pair: (Variant, Call)) -> bool {
        let (variant, call) = pair;

        if call.has_missing_genotype() {
            return false;
        }
        if !call.is_biallelic_diploid() {
            return false;
        }
        if !call.passes_filter() {
            return false;
        }
        if variant.is_deletion() || variant.call_is_insertion(&call) {
            return false;
        }
        if member == TrioMember::Child && !variant.call_is_snv(&call) {
            return false;
        }

        let start = variant.start;
        self.queues.entry(member).or_insert_with(VecDeque::new).push_back((variant, call));
        let entry = self.most_recent_start.entry(member).or_insert(0);
        *entry = (*entry).max(start);
        true
    }

    /// True iff the child queue has a pending entry and both parents have
    /// advanced at least as far, guaranteeing no earlier-starting parent
    /// record can still arrive from the (non-decreasing) ordered stream.
    pub fn can_process(&self) -> bool {
        let child_start = match self.queues.get(&TrioMember::Child).and_then(|q| q.front()) {
            Some((variant, _)) => variant.start,
            None => return false,
        };
        self.matured(TrioMember::Dad, child_start) && self.matured(TrioMember::Mom, child_start)
    }

    fn matured(&self, member: TrioMember, child_start: u64) -> bool {
        *self.most_recent_start.get(&member).unwrap_or(&0) >= child_start
    }

    fn evict_parents(&mut self, child_start: u64) {
        for member in [TrioMember::Dad, TrioMember::Mom].iter() {
            if let Some(queue) = self.queues.get_mut(member) {
                while let Some((variant, _)) = queue.front() {
                    if variant.end < child_start {
                        queue.pop_front();
                    } else {
                        break;
                    }
                }
            }
        }
    }

    fn find_matching(&self, member: TrioMember, position: u64) -> Option<(Variant, Call)> {
        self.queues
            .get(&member)?
            .iter()
            .find(|(variant, _)| variant.start <= position && position < variant.end)
            .cloned()
    }

    /// Evict stale parent entries, then locate matching parent pairs for
    /// the front child SNV. Returns `None` (treat as missing data) if
    /// either parent lacks a record spanning the child's position; the
    /// caller must discard the position in that case and is still
    /// responsible for calling `pop(CHILD)` to advance.
    pub fn retrieve_next_call(&mut self) -> Option<PositionCall> {
        let (child_variant, child_call) = self.queues.get(&TrioMember::Child)?.front()?.clone();
        let position = child_variant.start;

        self.evict_parents(position);

        let dad = self.find_matching(TrioMember::Dad, position)?;
        let mom = self.find_matching(TrioMember::Mom, position)?;

        Some(PositionCall {
            reference_name: child_variant.reference_name.clone(),
            position,
            dad,
            mom,
            child: (child_variant, child_call),
        })
    }

    /// Drop the front entry of `member`'s queue (called for CHILD after
    /// `retrieve_next_call`, successful or not).
    pub fn pop(&mut self, member: TrioMember) {
        if let Some(queue) = self.queues.get_mut(&member) {
            queue.pop_front();
        }
    }

    pub fn is_empty(&self, member: TrioMember) -> bool {
        self.queues.get(&member).map(|q| q.is_empty()).unwrap_or(true)
    }

    pub fn state(&self, member: TrioMember) -> QueueState {
        let queue = match self.queues.get(&member) {
            Some(q) if !q.is_empty() => q,
            _ => return QueueState::Empty,
        };
        let front_start = queue.front().unwrap().0.start;
        let most_recent_child = self
            .queues
            .get(&TrioMember::Child)
            .and_then(|q| q.front())
            .map(|(v, _)| v.start);
        match most_recent_child {
            Some(child_start) if front_start <= child_start => QueueState::Matured,
            _ => QueueState::Buffering,
        }
    }

    /// Drain every remaining child entry at stream end: repeatedly
    /// `retrieve_next_call` then `pop(CHILD)`, omitting positions where a
    /// parent match is absent.
    pub fn final_flush(&mut self) -> Vec<PositionCall> {
        let mut calls = Vec::new();
        while !self.is_empty(TrioMember::Child) {
            if let Some(call) = self.retrieve_next_call() {
                calls.push(call);
            }
            self.pop(TrioMember::Child);
        }
        calls
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap as Map;

    fn variant(chrom: &str, start: u64, end: u64, reference_bases: &str, alt: Vec<&str>) -> Variant {
        Variant {
            reference_name: chrom.to_string(),
            start,
            end,
            reference_bases: reference_bases.to_string(),
            alternate_bases: alt.into_iter().map(String::from).collect(),
        }
    }

    fn pass_call(genotype: Vec<i32>) -> Call {
        let mut info = Map::new();
        info.insert("FILTER".to_string(), "PASS".to_string());
        Call { genotype, info }
    }

    #[test]
    fn buffer_scenario_from_spec() {
        let mut buffer = VariantsBuffer::new();

        // DAD@[1,10001) -- reference block
        assert!(buffer.check_and_add(
            TrioMember::Dad,
            (variant("chr1", 1, 10001, "A", vec![]), pass_call(vec![0, 0]))
        ));
        // DAD@[10002,10003)
        assert!(buffer.check_and_add(
            TrioMember::Dad,
            (variant("chr1", 10002, 10003, "C", vec![]), pass_call(vec![0, 0]))
        ));

        // CHILD queue is still empty.
        assert!(!buffer.can_process());

        // CHILD@[5,6) SNV
        assert!(buffer.check_and_add(
            TrioMember::Child,
            (variant("chr1", 5, 6, "A", vec!["G"]), pass_call(vec![0, 1]))
        ));
        // MOM has not advanced far enough yet: this block covers position 5
        // but its own start (0) hasn't reached the child's start (5).
        assert!(buffer.check_and_add(
            TrioMember::Mom,
            (variant("chr1", 0, 10001, "A", vec![]), pass_call(vec![0, 0]))
        ));
        assert!(!buffer.can_process());

        // MOM's stream advances to a record whose start reaches >= 5,
        // guaranteeing no earlier-starting MOM record can still arrive.
        assert!(buffer.check_and_add(
            TrioMember::Mom,
            (variant("chr1", 5, 10005, "A", vec![]), pass_call(vec![0, 0]))
        ));

        assert!(buffer.can_process());
        let position_call = buffer.retrieve_next_call().expect("should match first DAD block");
        assert_eq!(position_call.position, 5);
        assert_eq!(position_call.dad.0.start, 1);
        assert_eq!(position_call.dad.0.end, 10001);
    }

    #[test]
    fn eviction_drops_stale_parent_entries() {
        let mut buffer = VariantsBuffer::new();
        buffer.check_and_add(
            TrioMember::Dad,
            (variant("chr1", 0, 3, "A", vec![]), pass_call(vec![0, 0])),
        );
        buffer.check_and_add(
            TrioMember::Dad,
            (variant("chr1", 3, 10, "A", vec![]), pass_call(vec![0, 0])),
        );
        buffer.check_and_add(
            TrioMember::Mom,
            (variant("chr1", 0, 10, "A", vec![]), pass_call(vec![0, 0])),
        );
        buffer.check_and_add(
            TrioMember::Child,
            (variant("chr1", 5, 6, "A", vec!["C"]), pass_call(vec![0, 1])),
        );

        let call = buffer.retrieve_next_call().unwrap();
        buffer.pop(TrioMember::Child);

        // the stale [0,3) DAD block must have been evicted, leaving only
        // the spanning [3,10) block
        assert_eq!(call.dad.0.start, 3);
        assert_eq!(call.dad.0.end, 10);

        // no remaining parent entry ends before any subsequent child start
        buffer.check_and_add(
            TrioMember::Child,
            (variant("chr1", 7, 8, "A", vec!["G"]), pass_call(vec![0, 1])),
        );
        let second = buffer.retrieve_next_call().unwrap();
        assert_eq!(second.dad.0.start, 3);
    }

    #[test]
    fn missing_parent_match_returns_none() {
        let mut buffer = VariantsBuffer::new();
        buffer.check_and_add(
            TrioMember::Dad,
            (variant("chr1", 100, 200, "A", vec![]), pass_call(vec![0, 0])),
        );
        buffer.check_and_add(
            TrioMember::Mom,
            (variant("chr1", 0, 10, "A", vec![]), pass_call(vec![0, 0])),
        );
        buffer.check_and_add(
            TrioMember::Child,
            (variant("chr1", 5, 6, "A", vec!["C"]), pass_call(vec![0, 1])),
        );
        assert!(buffer.retrieve_next_call().is_none());
    }

    #[test]
    fn admission_filters_reject_indels_and_missing_and_nonpass() {
        let mut buffer = VariantsBuffer::new();
        // insertion
        assert!(!buffer.check_and_add(
            TrioMember::Child,
            (variant("chr1", 5, 6, "A", vec!["AG"]), pass_call(vec![0, 1]))
        ));
        // deletion
        assert!(!buffer.check_and_add(
            TrioMember::Child,
            (variant("chr1", 5, 7, "AG", vec!["A"]), pass_call(vec![0, 1]))
        ));
        // missing genotype
        assert!(!buffer.check_and_add(
            TrioMember::Child,
            (variant("chr1", 5, 6, "A", vec!["C"]), pass_call(vec![0, -1]))
        ));
        // not PASS
        let mut info = Map::new();
        info.insert("FILTER".to_string(), "q10".to_string());
        assert!(!buffer.check_and_add(
            TrioMember::Child,
            (variant("chr1", 5, 6, "A", vec!["C"]), Call { genotype: vec![0, 1], info })
        ));
    }

    #[test]
    fn final_flush_drains_child_queue() {
        let mut buffer = VariantsBuffer::new();
        buffer.check_and_add(
            TrioMember::Dad,
            (variant("chr1", 0, 100, "A", vec![]), pass_call(vec![0, 0])),
        );
        buffer.check_and_add(
            TrioMember::Mom,
            (variant("chr1", 0, 100, "A", vec![]), pass_call(vec![0, 0])),
        );
        buffer.check_and_add(
            TrioMember::Child,
            (variant("chr1", 10, 11, "A", vec!["C"]), pass_call(vec![0, 1])),
        );
        buffer.check_and_add(
            TrioMember::Child,
            (variant("chr1", 20, 21, "A", vec!["G"]), pass_call(vec![0, 1])),
        );

        let calls = buffer.final_flush();
        assert_eq!(calls.len(), 2);
        assert!(buffer.is_empty(TrioMember::Child));
    }
}
