use std::path::PathBuf;

pub fn default_version() -> u32 {
    1
}

pub fn default_transcript_dir() -> PathBuf {
    PathBuf::from("transcripts")
}

pub fn default_report_dir() -> PathBuf {
    PathBuf::from("reviews")
}
