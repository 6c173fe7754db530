//! Per-position allele-count aggregation from aligned reads (component C2).

use std::collections::HashMap;
use std::iter::FromIterator;

use crate::genotype::Allele;

/// A single aligned read, in the crate's internal 0-based coordinate
/// convention (see DESIGN.md on the position-basis open question).
///
/// `position` is the 0-based reference coordinate of the first base in
/// `aligned_bases`; `aligned_bases` may contain `-` gap characters.
#[derive(Clone, Debug)]
pub struct Alignment {
    pub position: u64,
    pub aligned_bases: Vec<u8>,
}

/// Mapping from allele to observed count at a single reference position.
///
/// Invariant: no key is ever stored with a value of 0; gap/malformed bases
/// are skipped at ingestion rather than recorded as zero counts.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReadSummary {
    counts: HashMap<Allele, u32>,
}

impl ReadSummary {
    pub fn new() -> Self {
        ReadSummary {
            counts: HashMap::new(),
        }
    }

    /// Aggregate aligned reads at a single reference position `pos` (0-based).
    ///
    /// For each read, `offset = pos - read.position`. Reads where the offset
    /// falls outside the aligned bases are silently skipped, as are bases
    /// that are gaps (`-`) or not one of A/C/G/T.
    pub fn from_reads<'a>(reads: impl IntoIterator<Item = &'a Alignment>, pos: u64) -> Self {
        let mut summary = ReadSummary::new();
        for read in reads {
            if pos < read.position {
                continue;
            }
            let offset = (pos - read.position) as usize;
            let base = match read.aligned_bases.get(offset) {
                Some(&b) => b,
                None => continue,
            };
            if let Some(allele) = Allele::from_base(base) {
                summary.increment(allele);
            }
            // gap ('-') or any other malformed byte is silently skipped
        }
        summary
    }

    pub fn increment(&mut self, allele: Allele) {
        *self.counts.entry(allele).or_insert(0) += 1;
    }

    pub fn count(&self, allele: Allele) -> u32 {
        *self.counts.get(&allele).unwrap_or(&0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Allele, u32)> + '_ {
        self.counts.iter().map(|(&a, &c)| (a, c))
    }

    pub fn total(&self) -> u32 {
        self.counts.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

impl FromIterator<(Allele, u32)> for ReadSummary {
    fn from_iter<I: IntoIterator<Item = (Allele, u32)>>(iter: I) -> Self {
        let mut summary = ReadSummary::new();
        for (allele, count) in iter {
            if count > 0 {
                summary.counts.insert(allele, count);
            }
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn align(position: u64, bases: &str) -> Alignment {
        Alignment {
            position,
            aligned_bases: bases.as_bytes().to_vec(),
        }
    }

    #[test]
    fn counts_bases_at_position() {
        let reads = vec![align(10, "AAC"), align(10, "A-C"), align(11, "CG")];
        // position 11: read1 offset1='A', read2 offset1='-'(skip), read3 offset0='C'
        let summary = ReadSummary::from_reads(&reads, 11);
        assert_eq!(summary.count(Allele::A), 1);
        assert_eq!(summary.count(Allele::C), 1);
        assert_eq!(summary.count(Allele::G), 0);
    }

    #[test]
    fn out_of_range_offset_is_skipped() {
        let reads = vec![align(10, "A")];
        let summary = ReadSummary::from_reads(&reads, 20);
        assert!(summary.is_empty());
    }

    #[test]
    fn malformed_base_is_skipped() {
        let reads = vec![align(5, "N")];
        let summary = ReadSummary::from_reads(&reads, 5);
        assert!(summary.is_empty());
    }

    #[test]
    fn no_zero_valued_keys() {
        let summary = ReadSummary::from_iter(vec![(Allele::A, 0), (Allele::C, 3)]);
        assert_eq!(summary.count(Allele::A), 0);
        assert!(summary.iter().all(|(_, c)| c > 0));
    }
}
