pub mod fastq;
pub mod fastq_dir;
pub mod file;
pub mod streams;
pub mod system;
