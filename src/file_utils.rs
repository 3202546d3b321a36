use anyhow::{Context, Result};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

use crate::identifiers::Bvid;

// @module: File and directory utilities

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)
                .with_context(|| format!("Failed to create directory: {}", path.display()))?;
        }
        Ok(())
    }

    // @generates: Per-video output directory, e.g. `./output_BV1xx`
    pub fn output_dir_for<P: AsRef<Path>>(root: P, prefix: &str, bvid: &Bvid) -> PathBuf {
        root.as_ref().join(format!("{}{}", prefix, bvid))
    }

    // @generates: Raw payload and SRT paths for part `part_number`
    pub fn part_paths<P: AsRef<Path>>(output_dir: P, part_number: usize, cid: u64) -> (PathBuf, PathBuf) {
        let stem = format!("part_{}_{}", part_number, cid);
        let dir = output_dir.as_ref();
        (dir.join(format!("{}.json", stem)), dir.join(format!("{}.srt", stem)))
    }

    /// Read identifiers from a file, one per line, skipping blank lines
    pub fn read_id_list<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
        let content = Self::read_to_string(&path)?;

        Ok(content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        // Ensure the parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Write a JSON value pretty-printed, leaving non-ASCII text unescaped
    pub fn write_json<P: AsRef<Path>>(path: P, value: &Value) -> Result<()> {
        let json = serde_json::to_string_pretty(value)
            .context("Failed to serialize subtitle payload")?;
        Self::write_to_file(path, &json)
    }
}
