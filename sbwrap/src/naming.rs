// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};
use rand::Rng;

/// Appended to a runner script path to get its batch script sibling.
pub const BATCH_SUFFIX: &str = ".sbatch";
pub const RUNNER_EXTENSION: &str = "sh";
const SUFFIX_LEN: usize = 6;
const SUFFIX_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Time source boundary so naming stays deterministic under test.
pub trait ClockPort: Send + Sync {
    fn now_local(&self) -> NaiveDateTime;
}

#[derive(Clone, Default)]
pub struct SystemClock;

impl SystemClock {
    pub fn new() -> Self {
        Self
    }
}

impl ClockPort for SystemClock {
    fn now_local(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// `<YYYYmmdd-HHMMSS>-<suffix>`, sortable by submission time.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct SubmissionId(String);

impl SubmissionId {
    pub fn generate(now: NaiveDateTime) -> Self {
        let mut rng = rand::rng();
        let suffix: String = (0..SUFFIX_LEN)
            .map(|_| {
                let idx = rng.random_range(0..SUFFIX_ALPHABET.len());
                SUFFIX_ALPHABET[idx] as char
            })
            .collect();
        Self::from_parts(now, &suffix)
    }

    pub fn from_parts(now: NaiveDateTime, suffix: &str) -> Self {
        Self(format!("{}-{}", now.format("%Y%m%d-%H%M%S"), suffix))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubmissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub id: SubmissionId,
    pub runner_script: PathBuf,
    pub batch_script: PathBuf,
    pub output_dir: PathBuf,
}

impl ArtifactPaths {
    /// Derives the per-day paths for a submission. Nothing is created.
    pub fn new(out_dir: &Path, scripts_dir: &Path, now: NaiveDateTime, id: SubmissionId) -> Self {
        let day = now.format("%Y-%m-%d").to_string();
        let runner_script = scripts_dir
            .join(&day)
            .join(format!("{id}.{RUNNER_EXTENSION}"));
        let batch_script = batch_path_for(&runner_script);
        Self {
            id,
            runner_script,
            batch_script,
            output_dir: out_dir.join(day),
        }
    }

    pub fn allocate(out_dir: &Path, scripts_dir: &Path, clock: &dyn ClockPort) -> Self {
        let now = clock.now_local();
        Self::new(out_dir, scripts_dir, now, SubmissionId::generate(now))
    }

    pub fn scripts_day_dir(&self) -> &Path {
        self.runner_script
            .parent()
            .unwrap_or_else(|| Path::new("."))
    }
}

pub fn batch_path_for(runner_script: &Path) -> PathBuf {
    let mut raw = runner_script.as_os_str().to_os_string();
    raw.push(BATCH_SUFFIX);
    PathBuf::from(raw)
}
