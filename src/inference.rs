//! Joint trio inference engine (component C4): enumerates the 10^3 trio
//! genotype assignments and decides MAP / posterior-Bayes / likelihood-ratio
//! denovo calls.

use std::collections::HashMap;

use bio::stats::LogProb;

use crate::bayesnet::TrioBayesNet;
use crate::genotype::{is_denovo_precomputed, Genotype, TrioMember};
use crate::reads::ReadSummary;

/// Decision rule to apply to the joint trio posterior.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Method {
    Map,
    Bayes,
    /// Likelihood-ratio test; the threshold (tau) is carried on the engine,
    /// not the variant, since it is a run-wide parameter (see spec §6
    /// `--lrt_threshold`).
    Lrt,
}

/// The argmax trio genotype assignment, in DAD, MOM, CHILD order.
pub type TrioGenotype = (Genotype, Genotype, Genotype);

/// Output of one inference call.
#[derive(Clone, Debug)]
pub struct Decision {
    pub argmax: TrioGenotype,
    pub is_denovo: bool,
    /// log(expSum_mendel)
    pub mendelian_log_likelihood: LogProb,
    /// log(expSum_denovo)
    pub denovo_log_likelihood: LogProb,
    /// expSum_denovo / (expSum_denovo + expSum_mendel)
    pub bayes_prob: f64,
    /// denovoLL - mendelLL (natural log domain)
    pub log_lr: f64,
}

/// Drives the joint enumeration over the trio Bayesian network (C3).
pub struct InferenceEngine<'a> {
    net: &'a TrioBayesNet,
    lrt_threshold: f64,
}

impl<'a> InferenceEngine<'a> {
    /// `lrt_threshold` is tau from spec §6 (default 1.0); the decision is
    /// made in the log domain as `log_lr > ln(tau)`, per SPEC_FULL.md §6's
    /// resolution of the LRT open question.
    pub fn new(net: &'a TrioBayesNet, lrt_threshold: f64) -> Self {
        InferenceEngine { net, lrt_threshold }
    }

    fn individual_log_likelihoods(&self, reads: &ReadSummary) -> [LogProb; 10] {
        let mut lls = [LogProb::ln_zero(); 10];
        for g in Genotype::all().iter() {
            let mut ll = LogProb::ln_one();
            for (allele, count) in reads.iter() {
                let base_ll = self.net.base_log_likelihood(*g, allele);
                ll = ll + LogProb(*base_ll * f64::from(count));
            }
            lls[g.index()] = ll;
        }
        lls
    }

    /// Run the joint trio inference for one position's read evidence.
    pub fn infer(
        &self,
        reads: &HashMap<TrioMember, ReadSummary>,
        method: Method,
    ) -> Decision {
        let empty = ReadSummary::new();
        let dad_ll = self.individual_log_likelihoods(reads.get(&TrioMember::Dad).unwrap_or(&empty));
        let mom_ll = self.individual_log_likelihoods(reads.get(&TrioMember::Mom).unwrap_or(&empty));
        let child_ll =
            self.individual_log_likelihoods(reads.get(&TrioMember::Child).unwrap_or(&empty));

        let mut max_ll = LogProb::ln_zero();
        let mut argmax: TrioGenotype = (Genotype::AA, Genotype::AA, Genotype::AA);
        let mut have_max = false;
        let mut denovo_lls = Vec::with_capacity(1000);
        let mut mendel_lls = Vec::with_capacity(1000);

        for dad in Genotype::all().iter() {
            for mom in Genotype::all().iter() {
                for child in Genotype::all().iter() {
                    let ll = dad_ll[dad.index()]
                        + mom_ll[mom.index()]
                        + child_ll[child.index()]
                        + self.net.cpt_log(TrioMember::Dad, &[*dad])
                        + self.net.cpt_log(TrioMember::Mom, &[*mom])
                        + self.net.cpt_log(TrioMember::Child, &[*dad, *mom, *child]);

                    if !have_max || *ll > *max_ll {
                        max_ll = ll;
                        argmax = (*dad, *mom, *child);
                        have_max = true;
                    }

                    if is_denovo_precomputed(*dad, *mom, *child) {
                        denovo_lls.push(ll);
                    } else {
                        mendel_lls.push(ll);
                    }
                }
            }
        }

        let mendelian_log_likelihood = if mendel_lls.is_empty() {
            LogProb::ln_zero()
        } else {
            LogProb::ln_sum_exp(&mendel_lls)
        };
        let denovo_log_likelihood = if denovo_lls.is_empty() {
            LogProb::ln_zero()
        } else {
            LogProb::ln_sum_exp(&denovo_lls)
        };

        let total = mendelian_log_likelihood.ln_add_exp(denovo_log_likelihood);
        let bayes_prob = if *total == std::f64::NEG_INFINITY {
            0.0
        } else {
            (*denovo_log_likelihood - *total).exp()
        };
        let log_lr = *denovo_log_likelihood - *mendelian_log_likelihood;

        let is_denovo = match method {
            Method::Map => is_denovo_precomputed(argmax.0, argmax.1, argmax.2),
            Method::Bayes => bayes_prob > 0.5,
            Method::Lrt => log_lr > self.lrt_threshold.ln(),
        };

        Decision {
            argmax,
            is_denovo,
            mendelian_log_likelihood,
            denovo_log_likelihood,
            bayes_prob,
            log_lr,
        }
    }
}
