//! The "remote-service contract" (spec §6): an abstract seam for the
//! external genomics API. OAuth authentication and HTTP transport are
//! explicitly out of scope (spec §1); this module defines only the trait a
//! production transport would implement, plus the retry policy around it.

use crate::errors::Error;
use crate::reads::Alignment;
use crate::variant::{Call, Variant};

/// One page of variant results for a `list_variants` call.
#[derive(Debug, Default)]
pub struct VariantPage {
    pub variants: Vec<VariantRecord>,
    pub next_page_token: Option<String>,
}

/// A variant record as delivered by the remote service, together with its
/// per-callset calls (callset id paired with the call).
#[derive(Clone, Debug)]
pub struct VariantRecord {
    pub variant: Variant,
    pub calls: Vec<(String, Call)>,
}

/// Abstract seam for the external genomics data service (spec §6).
///
/// Positions passed in and returned here are in this crate's internal
/// 0-based, half-open convention; a concrete implementation is responsible
/// for converting to/from whatever the live API uses on the wire.
pub trait GenomicsClient: Send + Sync {
    fn list_variants(
        &self,
        reference_name: &str,
        start: u64,
        end: u64,
        callset_ids: &[String],
        page_size: u32,
        page_token: Option<&str>,
    ) -> anyhow::Result<VariantPage>;

    fn list_reads(
        &self,
        read_group_set_id: &str,
        reference_name: &str,
        start: u64,
        end: u64,
    ) -> anyhow::Result<Vec<Alignment>>;
}

/// Retry `f` up to `max_attempts` times, matching spec §7's "external
/// transport" error class: fetch failures are retried; on exhaustion the
/// caller receives `Error::Transport` and is expected to log-and-skip the
/// unit of work rather than abort its siblings (spec §5).
pub fn retry<T>(max_attempts: u32, mut f: impl FnMut() -> anyhow::Result<T>) -> Result<T, Error> {
    let mut attempts = 0;
    loop {
        attempts += 1;
        match f() {
            Ok(value) => return Ok(value),
            Err(source) => {
                if attempts >= max_attempts {
                    return Err(Error::Transport { attempts, source });
                }
                log::warn!("remote fetch attempt {} failed: {}; retrying", attempts, source);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn retry_succeeds_after_transient_failures() {
        let calls = Cell::new(0);
        let result = retry(5, || {
            let n = calls.get() + 1;
            calls.set(n);
            if n < 3 {
                anyhow::bail!("transient")
            } else {
                Ok(42)
            }
        });
        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn retry_gives_up_after_max_attempts() {
        let calls = Cell::new(0);
        let result = retry(3, || {
            calls.set(calls.get() + 1);
            anyhow::bail!("always fails") as anyhow::Result<i32>
        });
        assert!(result.is_err());
        assert_eq!(calls.get(), 3);
    }
}
