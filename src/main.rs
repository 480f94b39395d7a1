use std::env;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use env_logger::Builder;
use log::{self, LevelFilter, debug, error, info};

use fastq_concat::cli::{self, Arguments};
use fastq_concat::config::defs::{PipelineError, RunConfig};
use fastq_concat::pipelines::concat;
use fastq_concat::utils::file::{absolute_path, check_out_dir, validate_fastq_dirs};
use fastq_concat::utils::system::detect_merge_workers;


#[tokio::main]
async fn main() -> Result<()> {
    let run_start = Instant::now();

    let args = cli::parse();

    let log_level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    Builder::new()
        .filter_level(log_level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] {}: {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .init();

    let dir = env::current_dir()?;
    debug!("The current directory is {:?}", dir);

    let run_config = match setup_run(&args, &dir) {
        Ok(config) => Arc::new(config),
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = concat::run(run_config).await {
        error!("Concatenation failed: {} at {} milliseconds.", e, run_start.elapsed().as_millis());
        std::process::exit(1);
    }

    info!("Run complete: {} milliseconds.", run_start.elapsed().as_millis());
    Ok(())
}


/// Validates fastq dirs and outdir. The outdir itself is created by the concat run.
///
/// # Arguments
/// * `args` - The parsed command-line arguments.
/// * `cwd` - The current working directory.
/// # Returns
/// RunConfig for the concat pipeline.
fn setup_run(args: &Arguments, cwd: &Path) -> Result<RunConfig, PipelineError> {
    validate_fastq_dirs(&args.fastqdirs)?;

    let out_dir = absolute_path(&args.out_dir, cwd);
    check_out_dir(&out_dir, args.print_only)?;

    let max_workers = detect_merge_workers(args.threads);
    Ok(RunConfig::new(args, out_dir, max_workers))
}
