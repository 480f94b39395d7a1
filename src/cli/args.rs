use std::path::PathBuf;
use clap::Parser;
use crate::config::defs::DEFAULT_MERGE_WORKERS;

#[derive(Parser, Debug, Clone, Default)]
#[command(name = "fastq-concat", version, about = "Concatenate fastq split across directories")]
pub struct Arguments {

    #[arg(short = 'f', long = "fastqdirs", required = true, num_args = 1.., help = "Paths of fastq dirs for concatenations")]
    pub fastqdirs: Vec<PathBuf>,

    #[arg(short = 'o', long = "outdir", required = true, help = "Out directory for concatenated files")]
    pub out_dir: PathBuf,

    #[arg(long = "print-only", default_value_t = false, help = "Only print, don't concat yet")]
    pub print_only: bool,

    #[arg(long, default_value_t = false, help = "Print the clients and samples found in each fastq dir")]
    pub describe: bool,

    #[arg(short = 't', long, default_value_t = DEFAULT_MERGE_WORKERS, help = "Maximum number of concurrent merges")]
    pub threads: usize,

    #[arg(short = 'v', long = "verbose", action)]
    pub verbose: bool,
}
