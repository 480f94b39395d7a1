// src/utils/system.rs: System functions

use log::debug;
use sysinfo::System;


/// Determines how many merges may run at once.
/// Merges are I/O bound, so the physical core count is only used as a ceiling.
///
/// # Arguments
///
/// * `args_threads` - Requested maximum from the command line.
///
/// # Returns
///
/// usize worker count, at least 1
pub fn detect_merge_workers(args_threads: usize) -> usize {
    let physical_cores = System::physical_core_count().unwrap_or(1);
    let workers = compute_merge_workers(physical_cores, args_threads);
    debug!("Detected {} physical cores; using {} merge workers", physical_cores, workers);
    workers
}

pub fn compute_merge_workers(physical_cores: usize, args_threads: usize) -> usize {
    physical_cores.min(args_threads).max(1)
}
