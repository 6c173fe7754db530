//! Trio Bayesian network (component C3): priors, Mendelian inheritance CPT
//! with de-novo leakage, and the read-emission model.
//!
//! Follows the teacher's use of `bio::stats::LogProb` for all probability
//! arithmetic so that downstream accumulation (C4) can rely on
//! `LogProb::ln_sum_exp` for numerically stable posterior computation.

use bio::stats::{LogProb, Prob};

use crate::genotype::{mendelian_allele_counts, Allele, Genotype, TrioMember};

/// One node of the fixed three-node trio network. Parent nodes carry a
/// 10-entry CPT; the child node carries a 1000-entry CPT addressed by
/// `dad.index() * 100 + mom.index() * 10 + child.index()`.
#[derive(Debug, Clone)]
enum Node {
    Parent { cpt: [LogProb; 10] },
    Child { cpt: Vec<LogProb> },
}

/// Immutable trio Bayesian network: parent priors, child Mendelian CPT with
/// de-novo leakage rate `mu`, and a read-emission model parameterized by
/// sequencing error rate `epsilon`. Built once per run and shared (by
/// reference) across worker threads.
#[derive(Debug, Clone)]
pub struct TrioBayesNet {
    epsilon: f64,
    mu: f64,
    nodes: [Node; 3],
}

fn parent_prior_cpt() -> [LogProb; 10] {
    let mut cpt = [LogProb::ln_zero(); 10];
    for g in Genotype::all().iter() {
        let p = if g.is_homozygous() { 1.0 / 16.0 } else { 2.0 / 16.0 };
        cpt[g.index()] = LogProb::from(Prob(p));
    }
    cpt
}

fn child_cpt(mu: f64) -> Vec<LogProb> {
    let mut cpt = vec![LogProb::ln_zero(); 1000];
    for dad in Genotype::all().iter() {
        for mom in Genotype::all().iter() {
            let mendelian_counts = mendelian_allele_counts(*dad, *mom);
            let num_support = mendelian_counts.iter().filter(|&&c| c > 0).count();
            let num_denovo_genotypes = 10 - num_support;
            for child in Genotype::all().iter() {
                let count = mendelian_counts[child.index()];
                let p = if count > 0 {
                    (1.0 - mu) * (count as f64) / 4.0
                } else {
                    mu / (num_denovo_genotypes as f64)
                };
                let key = dad.index() * 100 + mom.index() * 10 + child.index();
                cpt[key] = LogProb::from(Prob(p));
            }
        }
    }
    cpt
}

impl TrioBayesNet {
    /// Build the network for the given sequence error rate `epsilon` and
    /// de-novo mutation rate `mu`. CPTs are computed once, here, and never
    /// mutated afterwards.
    pub fn new(epsilon: f64, mu: f64) -> TrioBayesNet {
        let nodes = [
            Node::Parent { cpt: parent_prior_cpt() },
            Node::Parent { cpt: parent_prior_cpt() },
            Node::Child { cpt: child_cpt(mu) },
        ];
        TrioBayesNet { epsilon, mu, nodes }
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn mu(&self) -> f64 {
        self.mu
    }

    /// log P(key) for the given trio member's CPT. `key` must have length 1
    /// for DAD/MOM (a single genotype) or length 3 for CHILD
    /// (`[dad, mom, child]`); any other arity is a programmer error and is
    /// fatal.
    pub fn cpt_log(&self, member: TrioMember, key: &[Genotype]) -> LogProb {
        match (member, &self.nodes[node_index(member)]) {
            (TrioMember::Dad, Node::Parent { cpt }) | (TrioMember::Mom, Node::Parent { cpt }) => {
                assert_eq!(key.len(), 1, "parent CPT key must be a single genotype");
                cpt[key[0].index()]
            }
            (TrioMember::Child, Node::Child { cpt }) => {
                assert_eq!(
                    key.len(),
                    3,
                    "child CPT key must be [dad, mom, child] genotypes"
                );
                let idx = key[0].index() * 100 + key[1].index() * 10 + key[2].index();
                cpt[idx]
            }
            _ => unreachable!("node kind always matches its member"),
        }
    }

    /// log P(observed base `allele` | genotype `g`) under the read-emission
    /// model parameterized by `epsilon`.
    pub fn base_log_likelihood(&self, g: Genotype, allele: Allele) -> LogProb {
        let (a0, a1) = g.alleles();
        let matches = allele == a0 || allele == a1;
        if g.is_homozygous() {
            if matches {
                LogProb::from(Prob(1.0 - self.epsilon))
            } else {
                LogProb::from(Prob(self.epsilon / 3.0))
            }
        } else if matches {
            LogProb::from(Prob((1.0 - 2.0 * self.epsilon / 3.0) / 2.0))
        } else {
            LogProb::from(Prob(self.epsilon / 3.0))
        }
    }
}

fn node_index(member: TrioMember) -> usize {
    match member {
        TrioMember::Dad => 0,
        TrioMember::Mom => 1,
        TrioMember::Child => 2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn net() -> TrioBayesNet {
        TrioBayesNet::new(1e-2, 1e-8)
    }

    #[test]
    fn parent_prior_normalizes() {
        let net = net();
        let sum: f64 = Genotype::all()
            .iter()
            .map(|g| net.cpt_log(TrioMember::Dad, &[*g]).exp())
            .sum();
        assert_relative_eq!(sum, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn child_cpt_normalizes_for_every_parent_pair() {
        let net = net();
        for dad in Genotype::all().iter() {
            for mom in Genotype::all().iter() {
                let sum: f64 = Genotype::all()
                    .iter()
                    .map(|child| net.cpt_log(TrioMember::Child, &[*dad, *mom, *child]).exp())
                    .sum();
                assert_relative_eq!(sum, 1.0, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn read_emission_normalizes() {
        let net = net();
        for g in Genotype::all().iter() {
            let sum: f64 = [Allele::A, Allele::C, Allele::G, Allele::T]
                .iter()
                .map(|&b| net.base_log_likelihood(*g, b).exp())
                .sum();
            assert_relative_eq!(sum, 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    #[should_panic]
    fn parent_cpt_key_arity_is_checked() {
        let net = net();
        net.cpt_log(TrioMember::Dad, &[Genotype::AA, Genotype::CC]);
    }

    #[test]
    #[should_panic]
    fn child_cpt_key_arity_is_checked() {
        let net = net();
        net.cpt_log(TrioMember::Child, &[Genotype::AA]);
    }
}
