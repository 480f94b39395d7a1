use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::future::join_all;
use log::{debug, info, warn};
use rayon::prelude::*;
use tokio::sync::Semaphore;

use crate::config::defs::{Mate, PipelineError, RunConfig, CAT_TAG, CLIENT_DELIMITER};
use crate::utils::fastq_dir::FastqDir;
use crate::utils::file::merged_fastq_path;
use crate::utils::streams::concat_files;

/// client -> fastq dirs holding that client, in input order
pub type ClientOverlap = BTreeMap<String, Vec<PathBuf>>;

/// client -> sample -> fastq dirs holding that sample, in input order
pub type SampleOverlap = BTreeMap<String, BTreeMap<String, Vec<PathBuf>>>;

/// client -> sample -> fastqs to concatenate; overlapping samples only
pub type MergePlan = BTreeMap<String, BTreeMap<String, SampleFastqs>>;


/// R1 and R2 fastqs of one sample, one per contributing dir, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SampleFastqs {
    pub r1: Vec<PathBuf>,
    pub r2: Vec<PathBuf>,
}

impl SampleFastqs {
    pub fn mate(&self, mate: Mate) -> &[PathBuf] {
        match mate {
            Mate::R1 => &self.r1,
            Mate::R2 => &self.r2,
        }
    }
}


/// One concatenation: `sources`, in order, into `destination`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeJob {
    pub client: String,
    pub sample: String,
    pub index: usize,
    pub mate: Mate,
    pub sources: Vec<PathBuf>,
    pub destination: PathBuf,
}


/// All fastq dirs of a run and the overlaps between them.
#[derive(Debug)]
pub struct FastqDirs {
    fqdirs: Vec<FastqDir>,
    client_overlap: ClientOverlap,
    sample_overlap: SampleOverlap,
}

impl FastqDirs {
    /// Indexes every dir and derives client and sample overlaps.
    /// Dir order is kept; it decides the order of the concatenated files.
    ///
    /// # Arguments
    ///
    /// * `paths` - Fastq dirs in merge order. Repeated paths are dropped.
    ///
    /// # Returns
    /// FastqDirs, or the first MissingDirectory / AmbiguousClientMatch.
    ///
    pub fn new(paths: &[PathBuf]) -> Result<Self, PipelineError> {
        // Indexed collect keeps input order
        let scanned = paths
            .par_iter()
            .map(FastqDir::new)
            .collect::<Result<Vec<_>, _>>()?;

        // The same dir may be spelled differently (relative, `..`, symlink)
        let mut seen = HashSet::new();
        let mut fqdirs = Vec::with_capacity(scanned.len());
        for fqdir in scanned {
            if seen.insert(fqdir.canonical().to_path_buf()) {
                fqdirs.push(fqdir);
            } else {
                warn!(
                    "Fastq dir {} given more than once; using it once",
                    fqdir.path().display()
                );
            }
        }

        check_ambiguous_clients(&fqdirs)?;

        let client_overlap = get_client_overlap(&fqdirs);
        let sample_overlap = get_sample_overlap(&fqdirs, &client_overlap);

        Ok(FastqDirs {
            fqdirs,
            client_overlap,
            sample_overlap,
        })
    }

    pub fn fqdirs(&self) -> &[FastqDir] {
        &self.fqdirs
    }

    /// Looks a dir up by any spelling of its path.
    pub fn get(&self, path: &Path) -> Option<&FastqDir> {
        if let Some(fqdir) = self.fqdirs.iter().find(|fqdir| fqdir.path() == path) {
            return Some(fqdir);
        }
        let canonical = fs::canonicalize(path).ok()?;
        self.fqdirs.iter().find(|fqdir| fqdir.canonical() == canonical)
    }

    pub fn client_overlap(&self) -> &ClientOverlap {
        &self.client_overlap
    }

    pub fn sample_overlap(&self) -> &SampleOverlap {
        &self.sample_overlap
    }

    /// Client-sample-fastq_list for every sample found in more than one dir. Eg:
    /// ```text
    /// {"JL":
    ///     {"JL-C1":
    ///         {r1: ["d1/JL-C1_..._R1_001.fastq.gz", "d2/JL-C1_..._R1_001.fastq.gz"],
    ///          r2: ["d1/JL-C1_..._R2_001.fastq.gz", "d2/JL-C1_..._R2_001.fastq.gz"]}}}
    /// ```
    /// Missing mates are gathered over all samples and reported together.
    pub fn merge_plan(&self) -> Result<MergePlan, PipelineError> {
        let mut plan = MergePlan::new();
        let mut unmatched = Vec::new();

        for (client, samples) in &self.sample_overlap {
            for (sample, dirs) in samples {
                if dirs.len() < 2 {
                    continue;
                }

                let mut fastqs = SampleFastqs::default();
                let mut complete = true;
                for dir in dirs {
                    let fqdir = self
                        .get(dir)
                        .ok_or_else(|| PipelineError::MissingDirectory(dir.clone()))?;
                    for mate in Mate::BOTH {
                        match fqdir.mate_path(sample, mate) {
                            Ok(path) => match mate {
                                Mate::R1 => fastqs.r1.push(path),
                                Mate::R2 => fastqs.r2.push(path),
                            },
                            Err(PipelineError::UnmatchedMate(u)) => {
                                complete = false;
                                unmatched.push(u);
                            }
                            Err(e) => return Err(e),
                        }
                    }
                }

                if complete {
                    plan.entry(client.clone())
                        .or_default()
                        .insert(sample.clone(), fastqs);
                }
            }
        }

        if !unmatched.is_empty() {
            return Err(PipelineError::UnmatchedMates(unmatched));
        }
        Ok(plan)
    }

    /// Lines of a shell script concatenating each overlapping sample.
    /// Merged samples are numbered per client, from 0.
    pub fn concat_script<'a>(
        &'a self,
        plan: &'a MergePlan,
        out_dir: &'a Path,
    ) -> impl Iterator<Item = String> + 'a {
        self.sample_overlap.iter().flat_map(move |(client, samples)| {
            let client_plan = plan.get(client);
            let header = std::iter::once(format!("#### {}", client));
            let body = samples
                .keys()
                .scan(0usize, move |count, sample| {
                    let lines = match client_plan.and_then(|p| p.get(sample)) {
                        Some(fastqs) => {
                            let index = *count;
                            *count += 1;
                            let mut lines = vec![format!("## {}", sample)];
                            for mate in Mate::BOTH {
                                let destination = merged_fastq_path(out_dir, sample, index, mate);
                                lines.push(cat_line(fastqs.mate(mate), &destination));
                            }
                            lines
                        }
                        None => vec![format!("# Sample {} has no overlapping fastqs", sample)],
                    };
                    Some(lines)
                })
                .flatten();
            header.chain(body)
        })
    }

    /// Same concatenations as `concat_script`, as jobs to run directly.
    pub fn merge_jobs(&self, plan: &MergePlan, out_dir: &Path) -> Vec<MergeJob> {
        let mut jobs = Vec::new();
        for (client, samples) in plan {
            for (index, (sample, fastqs)) in samples.iter().enumerate() {
                for mate in Mate::BOTH {
                    jobs.push(MergeJob {
                        client: client.clone(),
                        sample: sample.clone(),
                        index,
                        mate,
                        sources: fastqs.mate(mate).to_vec(),
                        destination: merged_fastq_path(out_dir, sample, index, mate),
                    });
                }
            }
        }
        jobs
    }
}


fn cat_line(sources: &[PathBuf], destination: &Path) -> String {
    let sources: Vec<String> = sources.iter().map(|p| shell_quote(p)).collect();
    format!("{} {} > {}", CAT_TAG, sources.join(" "), shell_quote(destination))
}

/// Single-quotes a path for the shell unless it only holds safe characters.
fn shell_quote(path: &Path) -> String {
    let text = path.display().to_string();
    let is_safe = !text.is_empty()
        && text
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "/._-+,:@%=".contains(c));
    if is_safe {
        text
    } else {
        format!("'{}'", text.replace('\'', "'\\''"))
    }
}


fn get_client_overlap(fqdirs: &[FastqDir]) -> ClientOverlap {
    let mut client_overlap = ClientOverlap::new();
    for fqdir in fqdirs {
        for client in fqdir.client_list() {
            client_overlap
                .entry(client.clone())
                .or_default()
                .push(fqdir.path().to_path_buf());
        }
    }
    client_overlap
}


fn get_sample_overlap(fqdirs: &[FastqDir], client_overlap: &ClientOverlap) -> SampleOverlap {
    let mut sample_overlap = SampleOverlap::new();
    for (client, dirs) in client_overlap {
        let samples = sample_overlap.entry(client.clone()).or_default();
        for dir in dirs {
            let Some(fqdir) = fqdirs.iter().find(|f| f.path() == dir.as_path()) else {
                continue;
            };
            for sample in fqdir.client_samples(client) {
                samples.entry(sample).or_default().push(dir.clone());
            }
        }
    }
    sample_overlap
}


/// Fails when a fastq name contains `<client>-` for more than one known client,
/// since substring grouping would attribute it to all of them.
fn check_ambiguous_clients(fqdirs: &[FastqDir]) -> Result<(), PipelineError> {
    let clients: BTreeSet<&str> = fqdirs
        .iter()
        .flat_map(|f| f.client_list().iter().map(String::as_str))
        .collect();
    let prefixes: Vec<(&str, String)> = clients
        .iter()
        .map(|c| (*c, format!("{}{}", c, CLIENT_DELIMITER)))
        .collect();

    for fqdir in fqdirs {
        for fastq in fqdir.fastqs() {
            let matches: Vec<String> = prefixes
                .iter()
                .filter(|(_, prefix)| fastq.file_name().contains(prefix.as_str()))
                .map(|(client, _)| client.to_string())
                .collect();
            if matches.len() > 1 {
                return Err(PipelineError::AmbiguousClientMatch {
                    file: fastq.path().display().to_string(),
                    clients: matches,
                });
            }
        }
    }
    Ok(())
}


/// Runs every merge job, at most `max_workers` at a time.
/// Destinations must be distinct; this is checked before anything is written.
/// If any job fails, every destination written by the other jobs is removed.
///
/// # Arguments
///
/// * `jobs` - Merge jobs from `FastqDirs::merge_jobs`.
/// * `max_workers` - Concurrency limit.
///
/// # Returns
/// Written files, in job order.
///
pub async fn concatenate_fastq(jobs: Vec<MergeJob>, max_workers: usize) -> Result<Vec<PathBuf>, PipelineError> {
    let mut destinations = HashSet::new();
    for job in &jobs {
        if !destinations.insert(job.destination.clone()) {
            return Err(PipelineError::DuplicateDestination(job.destination.clone()));
        }
    }

    let semaphore = Arc::new(Semaphore::new(max_workers.max(1)));
    let mut tasks = Vec::with_capacity(jobs.len());
    for job in jobs {
        let semaphore = semaphore.clone();
        tasks.push(tokio::spawn(async move {
            let _permit = semaphore
                .acquire_owned()
                .await
                .map_err(|e| PipelineError::JoinError(e.to_string()))?;
            info!(
                "Concatenating {} {} fastqs of {} into {}",
                job.sources.len(),
                job.mate,
                job.sample,
                job.destination.display()
            );
            concat_files(&job.sources, &job.destination).await?;
            Ok::<PathBuf, PipelineError>(job.destination)
        }));
    }

    // Wait for every job, so nothing is still writing when rolling back
    let mut written = Vec::with_capacity(tasks.len());
    let mut first_error = None;
    for result in join_all(tasks).await {
        match result {
            Ok(Ok(destination)) => written.push(destination),
            Ok(Err(e)) => {
                first_error.get_or_insert(e);
            }
            Err(e) => {
                first_error.get_or_insert(PipelineError::JoinError(e.to_string()));
            }
        }
    }

    match first_error {
        None => Ok(written),
        Some(e) => {
            remove_written(&written).await;
            Err(e)
        }
    }
}

async fn remove_written(written: &[PathBuf]) {
    for destination in written {
        match tokio::fs::remove_file(destination).await {
            Ok(()) => warn!("Removed {} after a failed merge", destination.display()),
            Err(e) => warn!("Failed to remove {}: {}", destination.display(), e),
        }
    }
}


fn write_lines<W: Write>(writer: &mut W, lines: impl IntoIterator<Item = String>) -> io::Result<()> {
    for line in lines {
        writeln!(writer, "{}", line)?;
    }
    writer.flush()
}


/// Indexes the fastq dirs, then prints the concatenation script or runs it.
pub async fn run(config: Arc<RunConfig>) -> Result<(), PipelineError> {
    let fastqdirs = FastqDirs::new(&config.fastqdirs)?;
    info!(
        "Indexed {} fastq dirs; {} clients",
        fastqdirs.fqdirs().len(),
        fastqdirs.client_overlap().len()
    );

    let stdout = io::stdout();
    if config.describe {
        let mut out = stdout.lock();
        for fqdir in fastqdirs.fqdirs() {
            writeln!(out, "# {}", fqdir)?;
            write_lines(&mut out, fqdir.describe())?;
        }
    }

    let plan = fastqdirs.merge_plan()?;
    let merged: usize = plan.values().map(|samples| samples.len()).sum();
    info!("{} samples to concatenate", merged);

    if config.print_only {
        let mut out = stdout.lock();
        write_lines(&mut out, fastqdirs.concat_script(&plan, &config.out_dir))?;
        return Ok(());
    }

    // Created only once the plan is known to be good
    if !config.out_dir.exists() {
        info!("Creating outdir {}", config.out_dir.display());
        tokio::fs::create_dir_all(&config.out_dir).await?;
    }

    let jobs = fastqdirs.merge_jobs(&plan, &config.out_dir);
    debug!("{} merge jobs on {} workers", jobs.len(), config.max_workers);
    let written = concatenate_fastq(jobs, config.max_workers).await?;
    info!("Wrote {} concatenated fastqs to {}", written.len(), config.out_dir.display());
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use tempfile::TempDir;

    fn fastq_dir(root: &Path, name: &str, files: &[&str]) -> PathBuf {
        let dir = root.join(name);
        fs::create_dir(&dir).unwrap();
        for file in files {
            File::create(dir.join(file)).unwrap();
        }
        dir
    }

    #[test]
    fn test_client_overlap_input_order() -> Result<(), PipelineError> {
        let tmp = TempDir::new()?;
        let d1 = fastq_dir(tmp.path(), "d1", &["JL-C1_S1_L001_R1_001.fastq.gz", "AB-X_S2_L001_R1_001.fastq.gz"]);
        let d2 = fastq_dir(tmp.path(), "d2", &["JL-C2_S1_L001_R1_001.fastq.gz"]);
        let d3 = fastq_dir(tmp.path(), "d3", &["AB-Y_S1_L001_R1_001.fastq.gz"]);

        let fastqdirs = FastqDirs::new(&[d3.clone(), d1.clone(), d2.clone()])?;
        assert_eq!(fastqdirs.client_overlap()["AB"], vec![d3, d1.clone()]);
        assert_eq!(fastqdirs.client_overlap()["JL"], vec![d1, d2]);
        Ok(())
    }

    #[test]
    fn test_duplicate_dirs_used_once() -> Result<(), PipelineError> {
        let tmp = TempDir::new()?;
        let d1 = fastq_dir(tmp.path(), "d1", &["JL-C1_S1_L001_R1_001.fastq.gz", "JL-C1_S1_L001_R2_001.fastq.gz"]);

        let fastqdirs = FastqDirs::new(&[d1.clone(), d1.clone()])?;
        assert_eq!(fastqdirs.fqdirs().len(), 1);
        assert_eq!(fastqdirs.sample_overlap()["JL"]["JL-C1"], vec![d1]);
        assert!(fastqdirs.merge_plan()?.is_empty());
        Ok(())
    }

    #[test]
    fn test_aliased_dir_used_once() -> Result<(), PipelineError> {
        let tmp = TempDir::new()?;
        let d1 = fastq_dir(tmp.path(), "d1", &["JL-C1_S1_L001_R1_001.fastq.gz", "JL-C1_S1_L001_R2_001.fastq.gz"]);
        let alias = d1.join("..").join("d1");

        let fastqdirs = FastqDirs::new(&[d1.clone(), alias.clone()])?;
        assert_eq!(fastqdirs.fqdirs().len(), 1);
        assert_eq!(fastqdirs.sample_overlap()["JL"]["JL-C1"], vec![d1.clone()]);
        assert!(fastqdirs.merge_plan()?.is_empty());
        assert_eq!(fastqdirs.get(&alias).map(|f| f.path()), Some(d1.as_path()));
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_dir_used_once() -> Result<(), PipelineError> {
        let tmp = TempDir::new()?;
        let d1 = fastq_dir(tmp.path(), "d1", &["JL-C1_S1_L001_R1_001.fastq.gz", "JL-C1_S1_L001_R2_001.fastq.gz"]);
        let link = tmp.path().join("link");
        std::os::unix::fs::symlink(&d1, &link)?;

        let fastqdirs = FastqDirs::new(&[link.clone(), d1])?;
        assert_eq!(fastqdirs.fqdirs().len(), 1);
        assert_eq!(fastqdirs.sample_overlap()["JL"]["JL-C1"], vec![link]);
        assert!(fastqdirs.merge_plan()?.is_empty());
        Ok(())
    }

    #[test]
    fn test_shell_quote() {
        assert_eq!(shell_quote(Path::new("/data/run_1/JL-C1_S1.fastq.gz")), "/data/run_1/JL-C1_S1.fastq.gz");
        assert_eq!(shell_quote(Path::new("/data/run 1/a.gz")), "'/data/run 1/a.gz'");
        assert_eq!(shell_quote(Path::new("/data/it's/a.gz")), "'/data/it'\\''s/a.gz'");
        assert_eq!(shell_quote(Path::new("/data/$(rm -rf x)/a.gz")), "'/data/$(rm -rf x)/a.gz'");
    }

    #[test]
    fn test_concat_script_quotes_paths() -> Result<(), PipelineError> {
        let tmp = TempDir::new()?;
        let files = ["JL-C1_S1_L001_R1_001.fastq.gz", "JL-C1_S1_L001_R2_001.fastq.gz"];
        let d1 = fastq_dir(tmp.path(), "run 1", &files);
        let d2 = fastq_dir(tmp.path(), "run;2", &files);

        let fastqdirs = FastqDirs::new(&[d1.clone(), d2.clone()])?;
        let plan = fastqdirs.merge_plan()?;
        let script: Vec<String> = fastqdirs.concat_script(&plan, Path::new("/out")).collect();
        assert_eq!(
            script[2],
            format!(
                "cat '{}' '{}' > /out/JL-C1_S0_L001_R1_001.fastq.gz",
                d1.join(files[0]).display(),
                d2.join(files[0]).display()
            )
        );
        Ok(())
    }

    fn run_config(fastqdirs: Vec<PathBuf>, out_dir: PathBuf) -> Arc<RunConfig> {
        Arc::new(RunConfig {
            fastqdirs,
            out_dir,
            print_only: false,
            describe: false,
            max_workers: 2,
        })
    }

    #[tokio::test]
    async fn test_run_leaves_no_outdir_when_plan_fails() -> Result<(), PipelineError> {
        let tmp = TempDir::new()?;
        let d1 = fastq_dir(tmp.path(), "d1", &["JL-C1_S1_L001_R1_001.fastq.gz"]);
        let d2 = fastq_dir(tmp.path(), "d2", &["JL-C1_S1_L001_R1_001.fastq.gz", "JL-C1_S1_L001_R2_001.fastq.gz"]);
        let out = tmp.path().join("out");

        let result = run(run_config(vec![d1, d2], out.clone())).await;
        assert!(matches!(result, Err(PipelineError::UnmatchedMates(_))));
        assert!(!out.exists());
        Ok(())
    }

    #[tokio::test]
    async fn test_run_creates_outdir_and_merges() -> Result<(), PipelineError> {
        let tmp = TempDir::new()?;
        let files = ["JL-C1_S1_L001_R1_001.fastq.gz", "JL-C1_S1_L001_R2_001.fastq.gz"];
        let d1 = fastq_dir(tmp.path(), "d1", &files);
        let d2 = fastq_dir(tmp.path(), "d2", &files);
        let out = tmp.path().join("nested").join("out");

        run(run_config(vec![d1, d2], out.clone())).await?;
        assert!(out.join("JL-C1_S0_L001_R1_001.fastq.gz").is_file());
        assert!(out.join("JL-C1_S0_L001_R2_001.fastq.gz").is_file());
        Ok(())
    }

    #[test]
    fn test_ambiguous_client_match() -> Result<(), PipelineError> {
        let tmp = TempDir::new()?;
        let d1 = fastq_dir(tmp.path(), "d1", &["JL-AB-C1_S1_L001_R1_001.fastq.gz"]);
        let d2 = fastq_dir(tmp.path(), "d2", &["AB-C2_S1_L001_R1_001.fastq.gz"]);

        match FastqDirs::new(&[d1, d2]) {
            Err(PipelineError::AmbiguousClientMatch { file, clients }) => {
                assert!(file.ends_with("JL-AB-C1_S1_L001_R1_001.fastq.gz"));
                assert_eq!(clients, vec!["AB", "JL"]);
            }
            other => panic!("Expected AmbiguousClientMatch, got {:?}", other),
        }
        Ok(())
    }

    #[test]
    fn test_missing_dir_fails_construction() {
        let tmp = TempDir::new().unwrap();
        let d1 = fastq_dir(tmp.path(), "d1", &[]);
        let missing = tmp.path().join("d2");
        assert!(matches!(
            FastqDirs::new(&[d1, missing]),
            Err(PipelineError::MissingDirectory(_))
        ));
    }

    #[test]
    fn test_unmatched_mates_collected() -> Result<(), PipelineError> {
        let tmp = TempDir::new()?;
        let d1 = fastq_dir(tmp.path(), "d1", &[
            "JL-C1_S1_L001_R1_001.fastq.gz",
            "JL-C2_S2_L001_R2_001.fastq.gz",
        ]);
        let d2 = fastq_dir(tmp.path(), "d2", &[
            "JL-C1_S1_L001_R1_001.fastq.gz",
            "JL-C1_S1_L001_R2_001.fastq.gz",
            "JL-C2_S2_L001_R1_001.fastq.gz",
            "JL-C2_S2_L001_R2_001.fastq.gz",
        ]);

        let fastqdirs = FastqDirs::new(&[d1.clone(), d2])?;
        match fastqdirs.merge_plan() {
            Err(PipelineError::UnmatchedMates(unmatched)) => {
                let found: Vec<(&str, Mate)> = unmatched.iter().map(|u| (u.sample.as_str(), u.mate)).collect();
                assert_eq!(found, vec![("JL-C1", Mate::R2), ("JL-C2", Mate::R1)]);
                assert!(unmatched.iter().all(|u| u.dir == d1));
            }
            other => panic!("Expected UnmatchedMates, got {:?}", other),
        }
        Ok(())
    }

    #[test]
    fn test_merge_jobs_numbered_per_client() -> Result<(), PipelineError> {
        let tmp = TempDir::new()?;
        let files = [
            "AB-1_S1_L001_R1_001.fastq.gz",
            "AB-1_S1_L001_R2_001.fastq.gz",
            "JL-C1_S2_L001_R1_001.fastq.gz",
            "JL-C1_S2_L001_R2_001.fastq.gz",
            "JL-C3_S3_L001_R1_001.fastq.gz",
            "JL-C3_S3_L001_R2_001.fastq.gz",
        ];
        let d1 = fastq_dir(tmp.path(), "d1", &files);
        let d2 = fastq_dir(tmp.path(), "d2", &files);
        let out = tmp.path().join("out");

        let fastqdirs = FastqDirs::new(&[d1, d2])?;
        let plan = fastqdirs.merge_plan()?;
        let jobs = fastqdirs.merge_jobs(&plan, &out);
        let names: Vec<String> = jobs
            .iter()
            .map(|j| j.destination.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec![
            "AB-1_S0_L001_R1_001.fastq.gz",
            "AB-1_S0_L001_R2_001.fastq.gz",
            "JL-C1_S0_L001_R1_001.fastq.gz",
            "JL-C1_S0_L001_R2_001.fastq.gz",
            "JL-C3_S1_L001_R1_001.fastq.gz",
            "JL-C3_S1_L001_R2_001.fastq.gz",
        ]);
        assert!(jobs.iter().all(|j| j.sources.len() == 2));
        Ok(())
    }

    #[tokio::test]
    async fn test_duplicate_destination_rejected() {
        let job = MergeJob {
            client: "JL".to_string(),
            sample: "JL-C1".to_string(),
            index: 0,
            mate: Mate::R1,
            sources: vec![PathBuf::from("a"), PathBuf::from("b")],
            destination: PathBuf::from("out/JL-C1_S0_L001_R1_001.fastq.gz"),
        };
        let result = concatenate_fastq(vec![job.clone(), job], 2).await;
        assert!(matches!(result, Err(PipelineError::DuplicateDestination(_))));
    }
}
