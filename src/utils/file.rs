use std::fs;
use std::path::{Path, PathBuf};
use log::info;
use crate::config::defs::{Mate, PipelineError, MERGED_LANE, MERGED_SUFFIX};


/// Checks that every fastq dir exists before any work starts.
pub fn validate_fastq_dirs(fastq_dirs: &[PathBuf]) -> Result<(), PipelineError> {
    for dir in fastq_dirs {
        if !dir.is_dir() {
            return Err(PipelineError::MissingDirectory(dir.clone()));
        }
    }
    Ok(())
}


/// Checks the output directory.
/// A missing directory is fine; it is created later in concat mode.
/// A non-empty one is only tolerated when nothing will be written.
///
/// # Arguments
///
/// * `out_dir` - Output directory.
/// * `print_only` - True when only the script is printed.
///
/// # Returns
/// true if the directory already exists.
///
pub fn check_out_dir(out_dir: &Path, print_only: bool) -> Result<bool, PipelineError> {
    if !out_dir.exists() {
        info!("Outdir {} not found; it will be created", out_dir.display());
        return Ok(false);
    }
    if !out_dir.is_dir() {
        return Err(PipelineError::NotADirectory(out_dir.to_path_buf()));
    }

    let is_empty = fs::read_dir(out_dir)?.next().is_none();
    if !is_empty && !print_only {
        return Err(PipelineError::NonEmptyOutputDirectory(out_dir.to_path_buf()));
    }
    if is_empty {
        info!("Outdir {} is empty. Proceeding...", out_dir.display());
    }
    Ok(true)
}


/// Resolves `path` against `cwd` unless it is already absolute.
pub fn absolute_path(path: &Path, cwd: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}


/// Name of a merged fastq: `<out_dir>/<sample>_S<index>_L001_R1_001.fastq.gz`.
pub fn merged_fastq_path(out_dir: &Path, sample: &str, index: usize, mate: Mate) -> PathBuf {
    out_dir.join(format!(
        "{}_S{}_{}_{}_{}",
        sample, index, MERGED_LANE, mate, MERGED_SUFFIX
    ))
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::TempDir;

    #[test]
    fn test_validate_fastq_dirs() {
        let tmp = TempDir::new().unwrap();
        let d1 = tmp.path().join("d1");
        fs::create_dir(&d1).unwrap();
        let d2 = tmp.path().join("d2");

        assert!(validate_fastq_dirs(&[d1.clone()]).is_ok());
        match validate_fastq_dirs(&[d1, d2.clone()]) {
            Err(PipelineError::MissingDirectory(p)) => assert_eq!(p, d2),
            other => panic!("Expected MissingDirectory, got {:?}", other),
        }
    }

    #[test]
    fn test_check_out_dir() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("out");

        assert!(!check_out_dir(&out, false).unwrap());

        fs::create_dir(&out).unwrap();
        assert!(check_out_dir(&out, false).unwrap());

        File::create(out.join("old.fastq.gz")).unwrap();
        assert!(matches!(
            check_out_dir(&out, false),
            Err(PipelineError::NonEmptyOutputDirectory(_))
        ));
        assert!(check_out_dir(&out, true).unwrap());

        let file = out.join("old.fastq.gz");
        assert!(matches!(check_out_dir(&file, true), Err(PipelineError::NotADirectory(_))));
    }

    #[test]
    fn test_merged_fastq_path() {
        assert_eq!(
            merged_fastq_path(Path::new("out"), "JL-C1", 0, Mate::R1),
            PathBuf::from("out/JL-C1_S0_L001_R1_001.fastq.gz")
        );
        assert_eq!(
            merged_fastq_path(Path::new("/data/out"), "JL-NC387", 12, Mate::R2),
            PathBuf::from("/data/out/JL-NC387_S12_L001_R2_001.fastq.gz")
        );
    }

    #[test]
    fn test_absolute_path() {
        assert_eq!(absolute_path(Path::new("out"), Path::new("/work")), PathBuf::from("/work/out"));
        assert_eq!(absolute_path(Path::new("/out"), Path::new("/work")), PathBuf::from("/out"));
    }
}
