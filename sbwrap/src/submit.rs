// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

use std::path::Path;
use std::process::{Command, Stdio};

use crate::errors::{AppError, AppResult, ErrorType};

const SBATCH: &str = "sbatch";
const LOCAL_SHELL: &str = "bash";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// Accepted by the scheduler under this job id.
    Queued { job_id: i64 },
    /// Ran to completion in the foreground.
    Local,
}

/// Hands the batch script to the scheduler, or runs it with bash in local mode.
pub fn submit(batch_script: &Path, local: bool) -> AppResult<Submission> {
    if local {
        run_local(batch_script)?;
        return Ok(Submission::Local);
    }

    log::info!("submitting {}", batch_script.display());
    let output = Command::new(SBATCH)
        .arg(batch_script)
        .stdin(Stdio::null())
        .output()
        .map_err(|err| AppError::external_process(format!("failed to run {SBATCH}: {err}")))?;
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    if !stderr.trim().is_empty() {
        log::warn!("{SBATCH}: {}", stderr.trim());
    }
    if !output.status.success() {
        return Err(process_failure(
            format!("{SBATCH} failed ({}): {}", output.status, stderr.trim()),
            output.status.code(),
        ));
    }

    let job_id = stdout
        .lines()
        .find_map(parse_job_id)
        .ok_or_else(|| {
            AppError::external_process(format!(
                "could not find a job id in {SBATCH} output: {}",
                stdout.trim()
            ))
        })?;
    log::info!("submitted job {job_id}");
    Ok(Submission::Queued { job_id })
}

fn run_local(batch_script: &Path) -> AppResult<()> {
    log::info!("running {} locally", batch_script.display());
    let status = Command::new(LOCAL_SHELL)
        .arg(batch_script)
        .status()
        .map_err(|err| {
            AppError::external_process(format!("failed to run {LOCAL_SHELL}: {err}"))
        })?;
    if status.success() {
        return Ok(());
    }
    Err(process_failure(
        format!("local run of {} failed ({status})", batch_script.display()),
        status.code(),
    ))
}

fn process_failure(message: String, code: Option<i32>) -> AppError {
    match code {
        Some(code) if code != 0 => {
            AppError::with_exit_code(ErrorType::ExternalProcess, message, code)
        }
        _ => AppError::external_process(message),
    }
}

/// Job id from a line like `Submitted batch job 11`, with an optional
/// `;cluster` suffix from `--parsable` style output.
pub fn parse_job_id(line: &str) -> Option<i64> {
    let marker = "job ";
    let idx = line.find(marker)?;
    let after_job = line[idx + marker.len()..].trim();
    let id = after_job.split(';').next().unwrap_or(after_job);
    id.trim().parse::<i64>().ok()
}
