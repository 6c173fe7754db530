//! VCF-style variant/call data model (spec §3), shared by the variant
//! caller stage (C6) and the `VariantsBuffer` (C5).

use std::collections::HashMap;

use crate::genotype::{Allele, Genotype};

/// A record describing a locus and its candidate alternates.
///
/// Coordinates are 0-based, half-open (`[start, end)`) throughout this
/// crate's internals; conversion to the external service's 1-based
/// convention happens only at the candidate/final-call file boundary (see
/// DESIGN.md).
#[derive(Clone, Debug, PartialEq)]
pub struct Variant {
    pub reference_name: String,
    pub start: u64,
    pub end: u64,
    pub reference_bases: String,
    pub alternate_bases: Vec<String>,
}

impl Variant {
    /// True iff this record itself describes a single-base substitution
    /// (`end == start + 1`, `|ref| == 1`); does not inspect which alternate
    /// a particular call refers to.
    pub fn is_snv_site(&self) -> bool {
        self.end == self.start + 1 && self.reference_bases.len() == 1
    }

    /// The allele string at index `idx` into `[ref] ++ alternates`
    /// (0 = reference, >=1 = alternate).
    pub fn allele_at(&self, idx: i32) -> Option<&str> {
        if idx == 0 {
            Some(self.reference_bases.as_str())
        } else if idx > 0 {
            self.alternate_bases.get((idx - 1) as usize).map(|s| s.as_str())
        } else {
            None
        }
    }

    /// True iff every alternate referenced by `call`'s genotype indices has
    /// length 1 (no insertion) and the reference is length 1 (no deletion),
    /// i.e. the pair is SNV-eligible per spec §4.5 filter 4.
    pub fn call_is_snv(&self, call: &Call) -> bool {
        if !self.is_snv_site() {
            return false;
        }
        call.genotype.iter().all(|&idx| {
            self.allele_at(idx)
                .map(|allele| allele.len() == 1)
                .unwrap_or(false)
        })
    }

    /// True iff `call` references an insertion (an alternate longer than
    /// one base) -- rejected per spec §4.5 filter 5.
    pub fn call_is_insertion(&self, call: &Call) -> bool {
        call.genotype.iter().any(|&idx| {
            idx > 0
                && self
                    .allele_at(idx)
                    .map(|allele| allele.len() > 1)
                    .unwrap_or(false)
        })
    }

    /// True iff the reference allele is longer than one base -- rejected per
    /// spec §4.5 filter 5 (deletion).
    pub fn is_deletion(&self) -> bool {
        self.reference_bases.len() > 1
    }

    /// Decode the genotype implied by `call` at this variant's position,
    /// assuming this variant is an SNV site and the call is biallelic and
    /// unambiguous. Returns `None` if either allele does not decode to
    /// A/C/G/T.
    pub fn call_genotype(&self, call: &Call) -> Option<Genotype> {
        let a0 = self.allele_at(*call.genotype.get(0)?)?;
        let a1 = self.allele_at(*call.genotype.get(1)?)?;
        let allele0 = Allele::from_base(*a0.as_bytes().get(0)?)?;
        let allele1 = Allele::from_base(*a1.as_bytes().get(0)?)?;
        Some(Genotype::from_pair(allele0, allele1))
    }

    /// The implied homozygous-reference genotype for a gVCF reference block
    /// covering this position, using the given reference base.
    pub fn homozygous_reference_genotype(ref_base: u8) -> Option<Genotype> {
        let allele = Allele::from_base(ref_base)?;
        Some(Genotype::from_pair(allele, allele))
    }
}

/// A per-sample genotype call: two indices into `[ref] ++ alternates`
/// (`-1` denotes a missing/"dot" index), plus the record's INFO fields
/// (including `FILTER`).
#[derive(Clone, Debug, PartialEq)]
pub struct Call {
    pub genotype: Vec<i32>,
    pub info: HashMap<String, String>,
}

impl Call {
    pub fn has_missing_genotype(&self) -> bool {
        self.genotype.iter().any(|&idx| idx < 0)
    }

    pub fn is_biallelic_diploid(&self) -> bool {
        self.genotype.len() == 2
    }

    pub fn passes_filter(&self) -> bool {
        self.info.get("FILTER").map(|v| v == "PASS").unwrap_or(false)
    }
}
