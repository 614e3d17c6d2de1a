// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::errors::{AppError, AppResult};

pub const STORE_FILE_NAME: &str = "jobs.txt";
pub const LOCK_SUFFIX: &str = ".lock";
const TAIL_WINDOW: u64 = 4096;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RecordParseError {
    #[error("record line is empty")]
    Empty,
    #[error("record line needs job id, script and output fields: {0:?}")]
    MissingFields(String),
}

/// One line of the store: `<job-id> <runner-script> <output>`.
///
/// Fields are separated by single spaces and never escaped, so a path with
/// spaces can only sit in the middle field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRecord {
    pub job_id: String,
    pub script: String,
    pub output: String,
}

impl JobRecord {
    pub fn new(
        job_id: impl Into<String>,
        script: impl Into<String>,
        output: impl Into<String>,
    ) -> Self {
        Self {
            job_id: job_id.into(),
            script: script.into(),
            output: output.into(),
        }
    }

    /// Builds a record that will parse back to the same fields.
    pub fn checked(job_id: &str, script: &str, output: &str) -> AppResult<Self> {
        let record = Self::new(job_id.trim(), script, output.trim());
        let line = record.to_line();
        if line.contains('\n') || Self::parse(&line).as_ref() != Ok(&record) {
            return Err(AppError::invalid_argument(format!(
                "job id and output path must be non-empty and contain no spaces: {line:?}"
            )));
        }
        Ok(record)
    }

    pub fn to_line(&self) -> String {
        format!("{} {} {}", self.job_id, self.script, self.output)
    }

    pub fn parse(line: &str) -> Result<Self, RecordParseError> {
        if line.trim().is_empty() {
            return Err(RecordParseError::Empty);
        }
        let missing = || RecordParseError::MissingFields(line.to_string());
        let (job_id, rest) = line.split_once(' ').ok_or_else(missing)?;
        let (script, output) = rest.rsplit_once(' ').ok_or_else(missing)?;
        if job_id.is_empty() || script.is_empty() || output.is_empty() {
            return Err(missing());
        }
        Ok(Self::new(job_id, script, output))
    }

    pub fn field(&self, field: RecordField) -> &str {
        match field {
            RecordField::Script => &self.script,
            RecordField::Output => &self.output,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordField {
    Script,
    Output,
}

/// Append-only flat file of job records plus its sibling lock file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordStore {
    path: PathBuf,
    lock_path: PathBuf,
}

impl RecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mut lock = path.as_os_str().to_os_string();
        lock.push(LOCK_SUFFIX);
        Self {
            path,
            lock_path: PathBuf::from(lock),
        }
    }

    pub fn in_dir(scripts_dir: &Path) -> Self {
        Self::new(scripts_dir.join(STORE_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn lock_path(&self) -> &Path {
        &self.lock_path
    }

    /// Appends `record` unless it equals the current last line. Returns
    /// whether a line was written.
    ///
    /// The read-compare-append runs under an exclusive `flock` on the lock
    /// file, the same lock generated batch scripts take with `flock -x`.
    pub fn append(&self, record: &JobRecord) -> AppResult<bool> {
        let line = record.to_line();
        if line.contains('\n') {
            return Err(AppError::invalid_argument(
                "record fields must not contain newlines",
            ));
        }
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|err| {
                AppError::local_error(format!(
                    "failed to create record store directory {}: {err}",
                    parent.display()
                ))
            })?;
        }

        with_exclusive_lock(&self.lock_path, || {
            if self.last_line()?.as_deref() == Some(line.as_str()) {
                log::debug!("record already last in {}: {line}", self.path.display());
                return Ok(false);
            }
            let mut file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.path)
                .map_err(|err| self.io_error("open", err))?;
            writeln!(file, "{line}").map_err(|err| self.io_error("append to", err))?;
            Ok(true)
        })
    }

    /// Last line of the store, read from the tail so cost stays bounded.
    pub fn last_line(&self) -> AppResult<Option<String>> {
        let mut file = match File::open(&self.path) {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(self.io_error("open", err)),
        };
        let len = file
            .metadata()
            .map_err(|err| self.io_error("stat", err))?
            .len();
        if len == 0 {
            return Ok(None);
        }

        let mut window = TAIL_WINDOW.min(len);
        loop {
            file.seek(SeekFrom::Start(len - window))
                .map_err(|err| self.io_error("seek", err))?;
            let mut buf = Vec::with_capacity(window as usize);
            (&mut file)
                .take(window)
                .read_to_end(&mut buf)
                .map_err(|err| self.io_error("read", err))?;
            let text = String::from_utf8_lossy(&buf);
            let text = text.strip_suffix('\n').unwrap_or(&text);
            if let Some(idx) = text.rfind('\n') {
                return Ok(Some(text[idx + 1..].to_string()));
            }
            if window == len {
                return Ok(Some(text.to_string()));
            }
            window = (window * 2).min(len);
        }
    }

    pub fn records(&self) -> AppResult<Vec<JobRecord>> {
        Ok(self
            .read_lines()?
            .iter()
            .filter_map(|line| match JobRecord::parse(line) {
                Ok(record) => Some(record),
                Err(err) => {
                    log::debug!("skipping record line: {err}");
                    None
                }
            })
            .collect())
    }

    /// Records whose job id is exactly `job_id`. Reads without locking, so a
    /// concurrent append may be missed.
    pub fn find(&self, job_id: &str) -> AppResult<Vec<JobRecord>> {
        let job_id = job_id.trim();
        if job_id.is_empty() || job_id.contains(char::is_whitespace) {
            return Err(AppError::invalid_argument(format!(
                "invalid job id '{job_id}'"
            )));
        }
        let mut out = Vec::new();
        for line in self.read_lines()? {
            let matches = line
                .strip_prefix(job_id)
                .is_some_and(|rest| rest.starts_with(' '));
            if !matches {
                continue;
            }
            match JobRecord::parse(&line) {
                Ok(record) => out.push(record),
                Err(err) => log::debug!("skipping record line: {err}"),
            }
        }
        Ok(out)
    }

    fn read_lines(&self) -> AppResult<Vec<String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => Ok(contents.lines().map(str::to_string).collect()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(err) => Err(self.io_error("read", err)),
        }
    }

    fn io_error(&self, op: &str, err: std::io::Error) -> AppError {
        AppError::local_error(format!(
            "failed to {op} record store {}: {err}",
            self.path.display()
        ))
    }
}

/// Looks up `job_id` and returns the chosen field of every matching record,
/// each with `suffix` appended. A miss is logged, not an error.
pub fn lookup(
    store: &RecordStore,
    job_id: &str,
    field: RecordField,
    suffix: &str,
) -> AppResult<Vec<String>> {
    let values: Vec<String> = store
        .find(job_id)?
        .iter()
        .map(|record| format!("{}{suffix}", record.field(field)))
        .collect();
    if values.is_empty() {
        log::warn!(
            "no records for job {} in {}",
            job_id.trim(),
            store.path().display()
        );
    }
    Ok(values)
}

struct LockGuard {
    file: File,
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        let _ = self.file.unlock();
    }
}

/// Runs `f` while holding an exclusive advisory lock on `lock_path`. Blocks
/// until the lock is free; the lock is released on every return path.
pub fn with_exclusive_lock<T>(
    lock_path: &Path,
    f: impl FnOnce() -> AppResult<T>,
) -> AppResult<T> {
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(false)
        .open(lock_path)
        .map_err(|err| {
            AppError::local_error(format!(
                "failed to open lock file {}: {err}",
                lock_path.display()
            ))
        })?;
    file.lock().map_err(|err| {
        AppError::local_error(format!("failed to lock {}: {err}", lock_path.display()))
    })?;
    let _guard = LockGuard { file };
    f()
}
