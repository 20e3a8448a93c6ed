// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Rotating log writer for tee'd capture child stdout/stderr (§4.1: "size
//! and count limits must be enforced"). Grounded on the teacher's
//! per-job log path convention (`engine::log_paths`), generalized from
//! one file per job to one rotating file set per streamer.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

const DEFAULT_MAX_BYTES: u64 = 10 * 1024 * 1024;
const DEFAULT_MAX_FILES: u32 = 5;

/// Writes lines to `<dir>/<name>.log`, rotating to `<name>.log.1`,
/// `<name>.log.2`, ... once the active file exceeds `max_bytes`, keeping
/// at most `max_files` rotated generations.
pub struct RotatingLogWriter {
    path: PathBuf,
    max_bytes: u64,
    max_files: u32,
    file: File,
    written: u64,
}

impl RotatingLogWriter {
    pub fn open(dir: &Path, name: &str) -> std::io::Result<Self> {
        Self::open_with_limits(dir, name, DEFAULT_MAX_BYTES, DEFAULT_MAX_FILES)
    }

    pub fn open_with_limits(dir: &Path, name: &str, max_bytes: u64, max_files: u32) -> std::io::Result<Self> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(format!("{name}.log"));
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let written = file.metadata().map(|m| m.len()).unwrap_or(0);
        Ok(Self {
            path,
            max_bytes,
            max_files,
            file,
            written,
        })
    }

    pub fn write_line(&mut self, line: &str) -> std::io::Result<()> {
        if self.written >= self.max_bytes {
            self.rotate()?;
        }
        writeln!(self.file, "{line}")?;
        self.written += line.len() as u64 + 1;
        Ok(())
    }

    fn rotate(&mut self) -> std::io::Result<()> {
        for gen in (1..self.max_files).rev() {
            let from = self.rotated_path(gen);
            let to = self.rotated_path(gen + 1);
            if from.exists() {
                let _ = std::fs::rename(&from, &to);
            }
        }
        let first = self.rotated_path(1);
        let _ = std::fs::rename(&self.path, &first);
        let oldest = self.rotated_path(self.max_files + 1);
        if oldest.exists() {
            let _ = std::fs::remove_file(&oldest);
        }
        self.file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        self.written = 0;
        Ok(())
    }

    fn rotated_path(&self, generation: u32) -> PathBuf {
        let mut name = self.path.clone();
        name.set_extension(format!("log.{generation}"));
        name
    }
}

#[cfg(test)]
#[path = "log_rotation_tests.rs"]
mod tests;
