use std::convert::TryFrom;
use std::process::exit;

use structopt::StructOpt;

use denovo_trio_caller::cli::Opt;
use denovo_trio_caller::config::Config;
use denovo_trio_caller::orchestrator;

/// Placeholder `GenomicsClient`: OAuth and HTTP transport are out of scope
/// for this crate (spec §1); wiring a real implementation in is left to
/// the deployment that supplies `--client_secrets_filename`.
struct UnconfiguredClient;

impl denovo_trio_caller::remote::GenomicsClient for UnconfiguredClient {
    fn list_variants(
        &self,
        _reference_name: &str,
        _start: u64,
        _end: u64,
        _callset_ids: &[String],
        _page_size: u32,
        _page_token: Option<&str>,
    ) -> anyhow::Result<denovo_trio_caller::remote::VariantPage> {
        anyhow::bail!("no GenomicsClient transport configured")
    }

    fn list_reads(
        &self,
        _read_group_set_id: &str,
        _reference_name: &str,
        _start: u64,
        _end: u64,
    ) -> anyhow::Result<Vec<denovo_trio_caller::reads::Alignment>> {
        anyhow::bail!("no GenomicsClient transport configured")
    }
}

fn main() {
    let opt = Opt::from_args();
    let log_level = opt.log_level;
    denovo_trio_caller::logging::init(log_level);

    let code = match Config::try_from(opt).and_then(|config| orchestrator::run(&UnconfiguredClient, &config)) {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    };
    exit(code);
}
