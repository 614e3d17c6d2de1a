// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

use serde_json::json;

use crate::config::{ConfigReport, ConfigValue};
use crate::naming::ArtifactPaths;
use crate::submit::Submission;

fn path_value<T: AsRef<std::path::Path>>(value: &ConfigValue<T>) -> serde_json::Value {
    json!({
        "value": value.value.as_ref().display().to_string(),
        "source": value.source.as_str(),
    })
}

pub fn lookup_to_json(job_id: &str, field: &str, values: &[String]) -> serde_json::Value {
    json!({
        "job_id": job_id,
        "field": field,
        "found": !values.is_empty(),
        "paths": values,
    })
}

pub fn config_report_to_json(report: &ConfigReport) -> serde_json::Value {
    json!({
        "config_path": report.config_path.as_ref().map(|p| p.display().to_string()),
        "config_path_source": report.config_path_source.map(|s| s.as_str()),
        "config_file_present": report.config_file_present,
        "out_dir": path_value(&report.out_dir),
        "scripts_dir": path_value(&report.scripts_dir),
        "scratch_dir": {
            "value": report.scratch_dir.value.as_ref().map(|p| p.display().to_string()),
            "source": report.scratch_dir.source.as_str(),
        },
        "launcher": {
            "value": report.launcher.value.as_str(),
            "source": report.launcher.source.as_str(),
        },
        "signal_lead_secs": {
            "value": report.signal_lead_secs.value,
            "source": report.signal_lead_secs.source.as_str(),
        },
        "verbose": {
            "value": report.verbose.value,
            "source": report.verbose.source.as_str(),
        },
    })
}

pub fn format_config_report(report: &ConfigReport) -> String {
    let path = match (&report.config_path, report.config_path_source) {
        (Some(path), Some(source)) => format!(
            "{} (source={}, present={})",
            path.display(),
            source.as_str(),
            report.config_file_present
        ),
        (Some(path), None) => format!("{} (present={})", path.display(), report.config_file_present),
        (None, _) => "(none)".to_string(),
    };
    let scratch = report
        .scratch_dir
        .value
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "(system temp)".to_string());
    let rows = [
        ("config", path),
        (
            "out_dir",
            format!(
                "{} ({})",
                report.out_dir.value.display(),
                report.out_dir.source.as_str()
            ),
        ),
        (
            "scripts_dir",
            format!(
                "{} ({})",
                report.scripts_dir.value.display(),
                report.scripts_dir.source.as_str()
            ),
        ),
        (
            "scratch_dir",
            format!("{scratch} ({})", report.scratch_dir.source.as_str()),
        ),
        (
            "launcher",
            format!(
                "{} ({})",
                report.launcher.value,
                report.launcher.source.as_str()
            ),
        ),
        (
            "signal_lead_secs",
            format!(
                "{} ({})",
                report.signal_lead_secs.value,
                report.signal_lead_secs.source.as_str()
            ),
        ),
        (
            "verbose",
            format!(
                "{} ({})",
                report.verbose.value,
                report.verbose.source.as_str()
            ),
        ),
    ];
    let width = rows.iter().map(|(key, _)| key.len()).max().unwrap_or(0);
    rows.iter()
        .map(|(key, value)| format!("{key:<width$}  {value}"))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn submission_to_json(paths: &ArtifactPaths, submission: Option<&Submission>) -> serde_json::Value {
    let (status, job_id) = match submission {
        Some(Submission::Queued { job_id }) => ("queued", Some(*job_id)),
        Some(Submission::Local) => ("local", None),
        None => ("written", None),
    };
    json!({
        "submission_id": paths.id.as_str(),
        "runner_script": paths.runner_script.display().to_string(),
        "batch_script": paths.batch_script.display().to_string(),
        "output_dir": paths.output_dir.display().to_string(),
        "status": status,
        "job_id": job_id,
    })
}

pub fn format_json(value: serde_json::Value) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(&value)?)
}
