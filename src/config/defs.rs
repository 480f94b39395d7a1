use std::fmt;
use std::path::PathBuf;
use crate::cli::Arguments;
use thiserror::Error;

// Filename convention
pub const GZIP_EXT: &str = "gz";
pub const CLIENT_DELIMITER: char = '-';
pub const SAMPLE_DELIMITER: char = '_';
pub const R1_TAG: &str = "_R1_";
pub const R2_TAG: &str = "_R2_";

// Merged output naming: <sample>_S<n>_L001_R1_001.fastq.gz
pub const MERGED_LANE: &str = "L001";
pub const MERGED_SUFFIX: &str = "001.fastq.gz";

// External software, only named in the printed script
pub const CAT_TAG: &str = "cat";

pub const DEFAULT_MERGE_WORKERS: usize = 8;


/// Paired-end mate designation of a read file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Mate {
    R1,
    R2,
}

impl Mate {
    pub const BOTH: [Mate; 2] = [Mate::R1, Mate::R2];

    /// Marker that identifies the mate inside a filename, e.g. `_R1_`.
    pub fn tag(&self) -> &'static str {
        match self {
            Mate::R1 => R1_TAG,
            Mate::R2 => R2_TAG,
        }
    }
}

impl fmt::Display for Mate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mate::R1 => write!(f, "R1"),
            Mate::R2 => write!(f, "R2"),
        }
    }
}


/// A sample whose R1 or R2 file could not be found in one of its directories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnmatchedMate {
    pub dir: PathBuf,
    pub sample: String,
    pub mate: Mate,
}

impl fmt::Display for UnmatchedMate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "no {} fastq for sample {} in {}",
            self.mate,
            self.sample,
            self.dir.display()
        )
    }
}

fn join_unmatched(unmatched: &[UnmatchedMate]) -> String {
    unmatched
        .iter()
        .map(|u| u.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}


#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Fastq dir {} does not exist", .0.display())]
    MissingDirectory(PathBuf),

    #[error("{} exists but is not a directory", .0.display())]
    NotADirectory(PathBuf),

    #[error("Outdir {} is not empty. Check please", .0.display())]
    NonEmptyOutputDirectory(PathBuf),

    #[error("{0}")]
    UnmatchedMate(UnmatchedMate),

    #[error("{} sample(s) with unmatched mates: {}", .0.len(), join_unmatched(.0))]
    UnmatchedMates(Vec<UnmatchedMate>),

    #[error("Fastq {file} matches more than one client: {}", .clients.join(", "))]
    AmbiguousClientMatch { file: String, clients: Vec<String> },

    #[error("More than one merge job writes to {}", .0.display())]
    DuplicateDestination(PathBuf),

    #[error("I/O error: {0}")]
    IOError(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Merge task failed: {0}")]
    JoinError(String),
}


/// Settings resolved from `Arguments` for one run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub fastqdirs: Vec<PathBuf>,
    pub out_dir: PathBuf,
    pub print_only: bool,
    pub describe: bool,
    pub max_workers: usize,
}

impl RunConfig {
    pub fn new(args: &Arguments, out_dir: PathBuf, max_workers: usize) -> Self {
        RunConfig {
            fastqdirs: args.fastqdirs.clone(),
            out_dir,
            print_only: args.print_only,
            describe: args.describe,
            max_workers,
        }
    }
}
