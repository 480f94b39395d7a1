use std::path::{Path, PathBuf};
use thiserror::Error;
use crate::config::defs::{Mate, CLIENT_DELIMITER, GZIP_EXT, SAMPLE_DELIMITER};

/// Reasons a filename is not a read file under the
/// `<client>-<sample>_..._R{1,2}_....gz` convention.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FastqNameError {
    #[error("not gzip compressed")]
    NotGzipped,
    #[error("no '-' separating client and sample")]
    MissingClientDelimiter,
    #[error("empty client id")]
    EmptyClient,
    #[error("client id contains '_'")]
    UnderscoreInClient,
    #[error("no '_' terminating the sample id")]
    MissingSampleDelimiter,
    #[error("empty sample id")]
    EmptySample,
    #[error("no _R1_ or _R2_ mate marker")]
    MissingMate,
    #[error("both _R1_ and _R2_ mate markers")]
    AmbiguousMate,
}

impl FastqNameError {
    /// True when the name passed the coarse `-` and `.gz` filter, i.e. the
    /// file was probably meant to be a read file.
    pub fn looks_like_fastq(&self) -> bool {
        !matches!(self, FastqNameError::NotGzipped | FastqNameError::MissingClientDelimiter)
    }
}


/// Client, sample and mate parsed from a read filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastqName {
    pub client: String,
    pub sample: String,
    pub mate: Mate,
}

impl FastqName {
    /// Sample id without the `<client>-` prefix.
    pub fn local(&self) -> &str {
        &self.sample[self.client.len() + CLIENT_DELIMITER.len_utf8()..]
    }
}

/// Splits a filename on the first `-`, then on the first `_` after it.
///
/// # Arguments
///
/// * `file_name` - Bare filename, no directory component.
///
/// # Returns
/// FastqName with client `JL`, sample `JL-C623` and mate for
/// `JL-C623_S1_L001_R1_001.fastq.gz`, or the reason the name was rejected.
///
pub fn parse_fastq_name(file_name: &str) -> Result<FastqName, FastqNameError> {
    let is_gz = Path::new(file_name)
        .extension()
        .is_some_and(|ext| ext == GZIP_EXT);
    if !is_gz {
        return Err(FastqNameError::NotGzipped);
    }

    let (client, after_client) = file_name
        .split_once(CLIENT_DELIMITER)
        .ok_or(FastqNameError::MissingClientDelimiter)?;
    if client.is_empty() {
        return Err(FastqNameError::EmptyClient);
    }
    if client.contains(SAMPLE_DELIMITER) {
        return Err(FastqNameError::UnderscoreInClient);
    }

    let sample_end = after_client
        .find(SAMPLE_DELIMITER)
        .ok_or(FastqNameError::MissingSampleDelimiter)?;
    let local = &after_client[..sample_end];
    if local.is_empty() {
        return Err(FastqNameError::EmptySample);
    }

    // Mate markers start with '_', so they can only appear from the sample delimiter on.
    let rest = &after_client[sample_end..];
    let mate = match (rest.contains(Mate::R1.tag()), rest.contains(Mate::R2.tag())) {
        (true, false) => Mate::R1,
        (false, true) => Mate::R2,
        (true, true) => return Err(FastqNameError::AmbiguousMate),
        (false, false) => return Err(FastqNameError::MissingMate),
    };

    Ok(FastqName {
        client: client.to_string(),
        sample: format!("{}{}{}", client, CLIENT_DELIMITER, local),
        mate,
    })
}


/// A read file found in a fastq dir. Immutable once parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadFile {
    dir: PathBuf,
    file_name: String,
    name: FastqName,
}

impl ReadFile {
    pub fn parse(dir: &Path, file_name: &str) -> Result<Self, FastqNameError> {
        let name = parse_fastq_name(file_name)?;
        Ok(ReadFile {
            dir: dir.to_path_buf(),
            file_name: file_name.to_string(),
            name,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn client(&self) -> &str {
        &self.name.client
    }

    pub fn sample(&self) -> &str {
        &self.name.sample
    }

    pub fn mate(&self) -> Mate {
        self.name.mate
    }

    /// Directory joined with the filename.
    pub fn path(&self) -> PathBuf {
        self.dir.join(&self.file_name)
    }
}
