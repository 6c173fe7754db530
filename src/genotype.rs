//! Diploid SNV genotype model (component C1).
//!
//! Enumerates the four alleles and the ten unordered diploid genotypes they
//! form, and precomputes the Mendelian feasibility table used by the
//! variant-based candidate filter (C6) and cross-checked against the
//! Bayesian network's child CPT (C3).

use std::fmt;

/// A single nucleotide.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Allele {
    A,
    C,
    G,
    T,
}

impl Allele {
    /// Index into the fixed A,C,G,T enumeration, used only to canonicalize
    /// unordered pairs.
    pub fn index(self) -> usize {
        match self {
            Allele::A => 0,
            Allele::C => 1,
            Allele::G => 2,
            Allele::T => 3,
        }
    }

    pub fn from_base(base: u8) -> Option<Allele> {
        match base.to_ascii_uppercase() {
            b'A' => Some(Allele::A),
            b'C' => Some(Allele::C),
            b'G' => Some(Allele::G),
            b'T' => Some(Allele::T),
            _ => None,
        }
    }

    pub fn as_byte(self) -> u8 {
        match self {
            Allele::A => b'A',
            Allele::C => b'C',
            Allele::G => b'G',
            Allele::T => b'T',
        }
    }
}

impl fmt::Display for Allele {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_byte() as char)
    }
}

/// One of the ten unordered diploid SNV genotypes.
///
/// Variant order matches the canonical sort used by `from_pair`: the four
/// homozygous genotypes first by allele index, then the six heterozygous
/// genotypes in lexicographic (allele-index) order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Genotype {
    AA,
    AC,
    AG,
    AT,
    CC,
    CG,
    CT,
    GG,
    GT,
    TT,
}

/// Flat lookup from canonical (min_index, max_index) allele pair to genotype.
const GENOTYPE_TABLE: [[Genotype; 4]; 4] = [
    [Genotype::AA, Genotype::AC, Genotype::AG, Genotype::AT],
    [Genotype::AC, Genotype::CC, Genotype::CG, Genotype::CT],
    [Genotype::AG, Genotype::CG, Genotype::GG, Genotype::GT],
    [Genotype::AT, Genotype::CT, Genotype::GT, Genotype::TT],
];

impl Genotype {
    /// Construct a genotype from an unordered pair of alleles. Total
    /// function: every pair of alleles maps to exactly one genotype, and the
    /// mapping is symmetric in its two arguments.
    pub fn from_pair(a: Allele, b: Allele) -> Genotype {
        GENOTYPE_TABLE[a.index()][b.index()]
    }

    /// The (possibly repeated) pair of alleles making up this genotype, in
    /// ascending index order.
    pub fn alleles(self) -> (Allele, Allele) {
        match self {
            Genotype::AA => (Allele::A, Allele::A),
            Genotype::AC => (Allele::A, Allele::C),
            Genotype::AG => (Allele::A, Allele::G),
            Genotype::AT => (Allele::A, Allele::T),
            Genotype::CC => (Allele::C, Allele::C),
            Genotype::CG => (Allele::C, Allele::G),
            Genotype::CT => (Allele::C, Allele::T),
            Genotype::GG => (Allele::G, Allele::G),
            Genotype::GT => (Allele::G, Allele::T),
            Genotype::TT => (Allele::T, Allele::T),
        }
    }

    pub fn is_homozygous(self) -> bool {
        let (a, b) = self.alleles();
        a == b
    }

    /// Index of this genotype in `0..10`, used to address the flat CPT and
    /// denovo tables (`dad * 100 + mom * 10 + child`-style linearization).
    pub fn index(self) -> usize {
        match self {
            Genotype::AA => 0,
            Genotype::AC => 1,
            Genotype::AG => 2,
            Genotype::AT => 3,
            Genotype::CC => 4,
            Genotype::CG => 5,
            Genotype::CT => 6,
            Genotype::GG => 7,
            Genotype::GT => 8,
            Genotype::TT => 9,
        }
    }

    pub fn all() -> [Genotype; 10] {
        [
            Genotype::AA,
            Genotype::AC,
            Genotype::AG,
            Genotype::AT,
            Genotype::CC,
            Genotype::CG,
            Genotype::CT,
            Genotype::GG,
            Genotype::GT,
            Genotype::TT,
        ]
    }
}

impl fmt::Display for Genotype {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let (a, b) = self.alleles();
        write!(f, "{}{}", a, b)
    }
}

/// Identifies a member of the trio. Serialization order is always
/// DAD, MOM, CHILD.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TrioMember {
    Dad,
    Mom,
    Child,
}

impl TrioMember {
    pub fn all() -> [TrioMember; 3] {
        [TrioMember::Dad, TrioMember::Mom, TrioMember::Child]
    }
}

impl fmt::Display for TrioMember {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            TrioMember::Dad => "DAD",
            TrioMember::Mom => "MOM",
            TrioMember::Child => "CHILD",
        };
        write!(f, "{}", s)
    }
}

/// The four genotypes obtainable by drawing one allele from each parent
/// (with repetition; size 4, duplicates possible).
fn mendelian_draws(dad: Genotype, mom: Genotype) -> [Genotype; 4] {
    let (d0, d1) = dad.alleles();
    let (m0, m1) = mom.alleles();
    [
        Genotype::from_pair(d0, m0),
        Genotype::from_pair(d0, m1),
        Genotype::from_pair(d1, m0),
        Genotype::from_pair(d1, m1),
    ]
}

/// Number of the four parental draws (see `mendelian_draws`) that produce
/// each genotype, i.e. `mendelianAlleles[g]` from spec §3.
pub fn mendelian_allele_counts(dad: Genotype, mom: Genotype) -> [u8; 10] {
    let mut counts = [0u8; 10];
    for g in mendelian_draws(dad, mom).iter() {
        counts[g.index()] += 1;
    }
    counts
}

/// True iff `child` cannot be produced by drawing one allele from `dad` and
/// one from `mom` (i.e. no selection, in either parental order, reproduces
/// the child's allele pair).
pub fn is_denovo(dad: Genotype, mom: Genotype, child: Genotype) -> bool {
    mendelian_allele_counts(dad, mom)[child.index()] == 0
}

lazy_static! {
    /// Precomputed 10x10x10 Mendelian-feasibility table, indexed by
    /// `[dad.index()][mom.index()][child.index()]`.
    pub static ref DENOVO_TABLE: Vec<Vec<Vec<bool>>> = {
        let mut table = vec![vec![vec![false; 10]; 10]; 10];
        for dad in Genotype::all().iter() {
            for mom in Genotype::all().iter() {
                for child in Genotype::all().iter() {
                    table[dad.index()][mom.index()][child.index()] =
                        is_denovo(*dad, *mom, *child);
                }
            }
        }
        table
    };
}

/// Lookup in the precomputed table rather than recomputing per call.
pub fn is_denovo_precomputed(dad: Genotype, mom: Genotype, child: Genotype) -> bool {
    DENOVO_TABLE[dad.index()][mom.index()][child.index()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonicalization_is_symmetric() {
        let pairs = [
            (Allele::A, Allele::C),
            (Allele::G, Allele::A),
            (Allele::T, Allele::T),
            (Allele::C, Allele::G),
        ];
        for (a, b) in pairs.iter().cloned() {
            assert_eq!(Genotype::from_pair(a, b), Genotype::from_pair(b, a));
        }
    }

    #[test]
    fn homozygous_and_heterozygous_counts() {
        let all = Genotype::all();
        let homo = all.iter().filter(|g| g.is_homozygous()).count();
        let het = all.iter().filter(|g| !g.is_homozygous()).count();
        assert_eq!(homo, 4);
        assert_eq!(het, 6);
        assert_eq!(all.len(), 10);
    }

    #[test]
    fn denovo_table_symmetric_in_parents() {
        for dad in Genotype::all().iter() {
            for mom in Genotype::all().iter() {
                for child in Genotype::all().iter() {
                    assert_eq!(
                        is_denovo(*dad, *mom, *child),
                        is_denovo(*mom, *dad, *child)
                    );
                }
            }
        }
    }

    #[test]
    fn denovo_table_symmetric_in_child_alleles() {
        // is_denovo depends only on the child's genotype (an unordered
        // allele pair), so swapping the two alleles of the child is a no-op
        // by construction -- verify that from_pair already collapses them.
        for dad in Genotype::all().iter() {
            for mom in Genotype::all().iter() {
                for child in Genotype::all().iter() {
                    let (c0, c1) = child.alleles();
                    let mirrored = Genotype::from_pair(c1, c0);
                    assert_eq!(
                        is_denovo(*dad, *mom, *child),
                        is_denovo(*dad, *mom, mirrored)
                    );
                }
            }
        }
    }

    #[test]
    fn mendelian_het_parents_cover_all_combinations() {
        // AC x AG -> {AA, AG, AC, CG}, each drawn exactly once.
        let counts = mendelian_allele_counts(Genotype::AC, Genotype::AG);
        assert_eq!(counts.iter().map(|&c| c as u32).sum::<u32>(), 4);
        assert_eq!(counts[Genotype::AA.index()], 1);
        assert_eq!(counts[Genotype::AG.index()], 1);
        assert_eq!(counts[Genotype::AC.index()], 1);
        assert_eq!(counts[Genotype::CG.index()], 1);
    }

    #[test]
    fn homozygous_parents_are_never_denovo_for_matching_child() {
        assert!(!is_denovo(Genotype::AA, Genotype::AA, Genotype::AA));
        assert!(is_denovo(Genotype::AA, Genotype::AA, Genotype::CC));
    }
}
