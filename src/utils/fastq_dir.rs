// src/utils/fastq_dir.rs: Index of the read files in a single fastq dir

use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::config::defs::{Mate, PipelineError, UnmatchedMate};
use crate::utils::fastq::ReadFile;


/// One input directory and the read files it holds.
/// The directory is scanned once, on construction.
#[derive(Debug, Clone)]
pub struct FastqDir {
    path: PathBuf,
    canonical: PathBuf,
    fastqs: Vec<ReadFile>,
    client_list: BTreeSet<String>,
}

impl FastqDir {
    /// Scans `path` for read files.
    ///
    /// # Arguments
    ///
    /// * `path` - Existing directory.
    ///
    /// # Returns
    /// FastqDir, or MissingDirectory when `path` is not a directory.
    ///
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, PipelineError> {
        let path = path.into();
        if !path.is_dir() {
            return Err(PipelineError::MissingDirectory(path));
        }

        let canonical = fs::canonicalize(&path)?;
        let fastqs = scan_fastqs(&path)?;
        let client_list = fastqs.iter().map(|f| f.client().to_string()).collect();
        debug!("{}: {} fastqs", path.display(), fastqs.len());

        Ok(FastqDir {
            path,
            canonical,
            fastqs,
            client_list,
        })
    }

    /// Path as given, used for display and in merge plans.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Resolved path; equal for every spelling of the same directory.
    pub fn canonical(&self) -> &Path {
        &self.canonical
    }

    /// Read files sorted by filename.
    pub fn fastqs(&self) -> &[ReadFile] {
        &self.fastqs
    }

    pub fn client_list(&self) -> &BTreeSet<String> {
        &self.client_list
    }

    /// Distinct sample ids of a client, sorted.
    pub fn client_samples(&self, client: &str) -> BTreeSet<String> {
        self.fastqs
            .iter()
            .filter(|f| f.client() == client)
            .map(|f| f.sample().to_string())
            .collect()
    }

    /// Full path of a sample's R1 or R2 file.
    /// With several candidates (e.g. more than one lane) the first by name wins.
    pub fn mate_path(&self, sample: &str, mate: Mate) -> Result<PathBuf, PipelineError> {
        let mut candidates = self
            .fastqs
            .iter()
            .filter(|f| f.sample() == sample && f.mate() == mate);

        let chosen = candidates.next().ok_or_else(|| {
            PipelineError::UnmatchedMate(UnmatchedMate {
                dir: self.path.clone(),
                sample: sample.to_string(),
                mate,
            })
        })?;

        let ignored: Vec<&str> = candidates.map(|f| f.file_name()).collect();
        if !ignored.is_empty() {
            warn!(
                "{}: several {} fastqs for {}; using {}, ignoring {}",
                self.path.display(),
                mate,
                sample,
                chosen.file_name(),
                ignored.join(", ")
            );
        }

        Ok(chosen.path())
    }

    pub fn r1_path(&self, sample: &str) -> Result<PathBuf, PipelineError> {
        self.mate_path(sample, Mate::R1)
    }

    pub fn r2_path(&self, sample: &str) -> Result<PathBuf, PipelineError> {
        self.mate_path(sample, Mate::R2)
    }

    /// Simple description of the dir content. Example:
    /// ```text
    /// Client: JL
    /// Samples:
    ///     JL-C623
    ///     JL-NC387
    /// ```
    pub fn describe(&self) -> Vec<String> {
        let mut lines = Vec::new();
        for client in &self.client_list {
            lines.push(format!("Client: {}", client));
            lines.push("Samples:".to_string());
            for sample in self.client_samples(client) {
                lines.push(format!("\t{}", sample));
            }
            lines.push(String::new());
        }
        lines
    }
}

impl fmt::Display for FastqDir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}


fn scan_fastqs(path: &Path) -> Result<Vec<ReadFile>, PipelineError> {
    let mut fastqs = Vec::new();
    for entry in fs::read_dir(path)? {
        let entry = entry?;
        if !entry.path().is_file() {
            continue;
        }
        let file_name = entry.file_name();
        let Some(file_name) = file_name.to_str() else {
            warn!("Skipping non UTF-8 filename {:?} in {}", file_name, path.display());
            continue;
        };

        match ReadFile::parse(path, file_name) {
            Ok(read) => fastqs.push(read),
            Err(e) if e.looks_like_fastq() => {
                warn!("Skipping {} in {}: {}", file_name, path.display(), e);
            }
            Err(e) => {
                debug!("Skipping {} in {}: {}", file_name, path.display(), e);
            }
        }
    }
    fastqs.sort_by(|a, b| a.file_name().cmp(b.file_name()));
    Ok(fastqs)
}
