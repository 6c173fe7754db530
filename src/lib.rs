// Copyright 2016-2019 Johannes Köster, David Lähnemann.
// Licensed under the GNU GPLv3 license (https://opensource.org/licenses/GPL-3.0)
// This file may not be copied, modified, or distributed
// except according to those terms.

//! A statistical de novo SNV caller for parent-parent-child trio
//! sequencing data: a streaming variant-based Mendelian filter (VARIANT),
//! a read-based Bayesian refiner (READ), and their composition (FULL).

#[macro_use]
extern crate lazy_static;

pub mod bayesnet;
pub mod buffer;
pub mod calling;
pub mod cli;
pub mod config;
pub mod errors;
pub mod genotype;
pub mod inference;
pub mod logging;
pub mod orchestrator;
pub mod output;
pub mod reads;
pub mod remote;
pub mod variant;
