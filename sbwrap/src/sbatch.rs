// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::naming::{ArtifactPaths, ClockPort};
use crate::records::RecordStore;
use crate::script::ScriptBody;
use crate::shell::{dq_escape, sh_quote};
use crate::template::ScriptTemplate;

pub const BATCH_SHEBANG: &str = "#!/usr/bin/env bash";
pub const DIRECTIVE: &str = "#SBATCH";
pub const RETRY_SIGNAL: &str = "USR1";
pub const JOB_ID_PLACEHOLDER: &str = "%j";
pub const ARRAY_JOB_ID_PLACEHOLDER: &str = "%A";
pub const ARRAY_TASK_ID_PLACEHOLDER: &str = "%a";
const JOB_ID_VAR: &str = "SLURM_JOB_ID";
const ARRAY_JOB_ID_VAR: &str = "SLURM_ARRAY_JOB_ID";
const ARRAY_TASK_ID_VAR: &str = "SLURM_ARRAY_TASK_ID";
#[cfg(unix)]
const GENERATED_MODE: u32 = 0o777;

/// Caller-supplied sbatch flags, inspected only for the options that change
/// what gets generated. The raw text is passed through untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SbatchFlags {
    raw: String,
    output: Option<String>,
    array: Option<String>,
}

impl SbatchFlags {
    pub fn parse(raw: &str) -> AppResult<Self> {
        let tokens = split_sbatch_args(raw);
        let mut output = None;
        let mut array = None;
        let mut i = 0;
        while i < tokens.len() {
            let tok = tokens[i].as_str();
            if let Some(value) = parse_flag_value(tok, "-o", "--output") {
                output = Some(value);
                i += 1;
                continue;
            }
            if let Some(value) = parse_flag_value(tok, "-a", "--array") {
                array = Some(value);
                i += 1;
                continue;
            }
            if takes_separate_value(tok) {
                let Some(next) = tokens.get(i + 1) else {
                    if matches!(tok, "-o" | "--output" | "-a" | "--array") {
                        return Err(AppError::invalid_argument(format!(
                            "sbatch flag '{tok}' requires a value"
                        )));
                    }
                    break;
                };
                match tok {
                    "-o" | "--output" => output = Some(next.clone()),
                    "-a" | "--array" => array = Some(next.clone()),
                    // The value belongs to some other option; never inspect it.
                    _ => {}
                }
                i += 2;
                continue;
            }
            i += 1;
        }
        Ok(Self {
            raw: raw.trim().to_string(),
            output,
            array,
        })
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Caller's explicit output path, if any.
    pub fn output(&self) -> Option<&str> {
        self.output.as_deref()
    }

    pub fn array(&self) -> Option<&str> {
        self.array.as_deref()
    }

    pub fn is_array(&self) -> bool {
        self.array.is_some()
    }
}

/// Scheduler token(s) naming one job or one array task.
pub fn output_placeholder(array: bool) -> String {
    if array {
        format!("{ARRAY_JOB_ID_PLACEHOLDER}_{ARRAY_TASK_ID_PLACEHOLDER}")
    } else {
        JOB_ID_PLACEHOLDER.to_string()
    }
}

/// Shell expression that evaluates to the running job's identifier.
pub fn job_id_expr(array: bool) -> String {
    if array {
        format!("${{{ARRAY_JOB_ID_VAR}}}_${{{ARRAY_TASK_ID_VAR}}}")
    } else {
        format!("${{{JOB_ID_VAR}}}")
    }
}

pub fn default_output_template(output_dir: &Path, array: bool) -> PathBuf {
    output_dir.join(format!("{}.out", output_placeholder(array)))
}

/// Rewrites scheduler placeholders into shell expansions, escaping the rest
/// for a double-quoted context. Unknown `%` tokens pass through literally.
pub fn expand_for_shell(template: &str) -> String {
    let mut out = String::with_capacity(template.len() + 16);
    let mut chars = template.chars();
    while let Some(ch) = chars.next() {
        if ch != '%' {
            push_dq(&mut out, ch);
            continue;
        }
        match chars.next() {
            Some('%') => out.push('%'),
            Some('j') => out.push_str(&format!("${{{JOB_ID_VAR}}}")),
            Some('A') => out.push_str(&format!("${{{ARRAY_JOB_ID_VAR}}}")),
            Some('a') => out.push_str(&format!("${{{ARRAY_TASK_ID_VAR}}}")),
            Some('x') => out.push_str("${SLURM_JOB_NAME}"),
            Some('u') => out.push_str("${USER}"),
            Some(other) => {
                out.push('%');
                push_dq(&mut out, other);
            }
            None => out.push('%'),
        }
    }
    out
}

fn push_dq(out: &mut String, ch: char) {
    if matches!(ch, '"' | '\\' | '$' | '`') {
        out.push('\\');
    }
    out.push(ch);
}

fn resolve_relative(base: &Path, path: &str) -> PathBuf {
    let candidate = Path::new(path);
    if candidate.is_absolute() {
        candidate.to_path_buf()
    } else {
        base.join(candidate)
    }
}

#[derive(Debug, Clone)]
pub struct BatchRequest {
    /// Normalized runner body, with any image statements already injected.
    pub script: ScriptBody,
    pub flags: SbatchFlags,
    pub retry: bool,
    pub local: bool,
}

/// Everything needed to put a submission on disk, computed without touching it.
#[derive(Debug, Clone)]
pub struct BatchPlan {
    pub paths: ArtifactPaths,
    pub runner_text: String,
    pub batch_text: String,
    /// `None` when the caller chose the output path.
    pub output_dir: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub enum Generated {
    Preview(String),
    Written(ArtifactPaths),
}

/// Builds the batch script text for `request` at `paths`.
///
/// `cwd` anchors a relative caller output path, which sbatch resolves
/// against the submission directory.
pub fn synthesize(
    config: &Config,
    request: &BatchRequest,
    paths: ArtifactPaths,
    cwd: &Path,
) -> AppResult<BatchPlan> {
    let array = request.flags.is_array();
    let explicit_output = request.flags.output();
    let output_template = match explicit_output {
        Some(value) => resolve_relative(cwd, value),
        None => default_output_template(&paths.output_dir, array),
    };
    let output_template = output_template.to_string_lossy().into_owned();
    log::debug!(
        "sbatch flags: array={} explicit_output={} output_template={}",
        array,
        explicit_output.is_some(),
        output_template
    );

    let mut directive = vec![
        format!("--signal=B:{RETRY_SIGNAL}@{}", config.signal_lead_secs),
        "--requeue".to_string(),
        "--open-mode=append".to_string(),
    ];
    if explicit_output.is_none() {
        directive.push(format!("--output={}", sh_quote(&output_template)));
    }
    if !request.flags.raw().is_empty() {
        directive.push(request.flags.raw().to_string());
    }

    let runner = paths.runner_script.to_string_lossy().into_owned();
    let batch = paths.batch_script.to_string_lossy().into_owned();
    let store = RecordStore::in_dir(&config.scripts_dir);
    let launch = if request.local {
        sh_quote(&runner)
    } else {
        format!("{} {}", config.launcher, sh_quote(&runner))
    };

    let mut tpl = ScriptTemplate::new();
    tpl.set("directive", directive.join(" "))
        .set("job_id", job_id_expr(array))
        .set("runner_dq", dq_escape(&runner))
        .set("batch_dq", dq_escape(&batch))
        .set("output_dq", expand_for_shell(&output_template))
        .set("store", sh_quote(&store.path().to_string_lossy()))
        .set("lock", sh_quote(&store.lock_path().to_string_lossy()))
        .set("signal", RETRY_SIGNAL)
        .set("launch", launch);

    tpl.line(BATCH_SHEBANG)
        .line(format!("{DIRECTIVE} @{{directive}}"))
        .blank();
    if !request.local {
        tpl.lines([
            format!("if [ -n \"${{{JOB_ID_VAR}:-}}\" ]; then"),
            "    (".to_string(),
            "        flock -x 200".to_string(),
            "        record=\"@{job_id} @{runner_dq} @{output_dq}\"".to_string(),
            "        if [ \"$(tail -n 1 @{store} 2>/dev/null)\" != \"$record\" ]; then".to_string(),
            "            printf '%s\\n' \"$record\" >> @{store}".to_string(),
            "        fi".to_string(),
            "    ) 200>@{lock}".to_string(),
            "fi".to_string(),
        ]);
    }
    tpl.lines([
        "env | grep '^SLURM_' | sort",
        "echo \"sbwrap: script @{runner_dq}\"",
        "echo \"sbwrap: batch @{batch_dq}\"",
    ]);
    if request.retry {
        tpl.lines([
            "_sbwrap_requeue() {",
            "    echo \"sbwrap: caught @{signal}, requeueing @{job_id}\" >&2",
            "    scontrol requeue \"@{job_id}\"",
            "}",
            "trap _sbwrap_requeue @{signal}",
        ]);
    }
    // `wait` on the pid so the runner's status becomes the job's status.
    tpl.blank()
        .line("@{launch} &")
        .line("wait $!")
        .line("exit $?");

    Ok(BatchPlan {
        runner_text: request.script.render(),
        batch_text: tpl.render()?,
        output_dir: explicit_output.is_none().then(|| paths.output_dir.clone()),
        paths,
    })
}

/// Creates directories and writes both artifacts. Returns the batch script path.
pub fn write_plan(plan: &BatchPlan) -> AppResult<PathBuf> {
    if let Some(dir) = &plan.output_dir {
        create_dir(dir)?;
    }
    create_dir(plan.paths.scripts_day_dir())?;
    write_executable(&plan.paths.runner_script, &plan.runner_text)?;
    write_executable(&plan.paths.batch_script, &plan.batch_text)?;
    log::debug!(
        "wrote runner {} and batch {}",
        plan.paths.runner_script.display(),
        plan.paths.batch_script.display()
    );
    Ok(plan.paths.batch_script.clone())
}

/// Runs the whole pipeline. With `display` set nothing touches the disk and
/// the runner script text comes back instead.
pub fn generate(
    config: &Config,
    request: &BatchRequest,
    display: bool,
    clock: &dyn ClockPort,
    cwd: &Path,
) -> AppResult<Generated> {
    if display {
        return Ok(Generated::Preview(request.script.render()));
    }
    let paths = ArtifactPaths::allocate(&config.out_dir, &config.scripts_dir, clock);
    let plan = synthesize(config, request, paths, cwd)?;
    write_plan(&plan)?;
    Ok(Generated::Written(plan.paths))
}

fn create_dir(dir: &Path) -> AppResult<()> {
    fs::create_dir_all(dir).map_err(|err| {
        AppError::local_error(format!("failed to create directory {}: {err}", dir.display()))
    })
}

fn write_executable(path: &Path, text: &str) -> AppResult<()> {
    let mut contents = text.to_string();
    if !contents.ends_with('\n') {
        contents.push('\n');
    }
    fs::write(path, contents)
        .map_err(|err| AppError::local_error(format!("failed to write {}: {err}", path.display())))?;
    set_mode(path)
}

#[cfg(unix)]
fn set_mode(path: &Path) -> AppResult<()> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(GENERATED_MODE)).map_err(|err| {
        AppError::local_error(format!(
            "failed to set permissions on {}: {err}",
            path.display()
        ))
    })
}

#[cfg(not(unix))]
fn set_mode(_path: &Path) -> AppResult<()> {
    Ok(())
}

/// sbatch options that never take a separate value. Options whose argument
/// is optional only accept it attached with `=`, so they belong here too.
const NO_VALUE_LONG: &[&str] = &[
    "contiguous",
    "exclusive",
    "get-user-env",
    "help",
    "hold",
    "ignore-pbs",
    "immediate",
    "no-kill",
    "nice",
    "no-requeue",
    "overcommit",
    "oversubscribe",
    "parsable",
    "propagate",
    "quiet",
    "reboot",
    "requeue",
    "spread-job",
    "test-only",
    "usage",
    "use-min-nodes",
    "verbose",
    "version",
    "wait",
    "x11",
];
const NO_VALUE_SHORT: &[char] = &['h', 'H', 'I', 'k', 'O', 'Q', 's', 'u', 'V', 'v', 'W'];

/// Whether `token` is an option spelled without an attached value, so the
/// next token is its argument.
fn takes_separate_value(token: &str) -> bool {
    if let Some(long) = token.strip_prefix("--") {
        return !long.is_empty() && !long.contains('=') && !NO_VALUE_LONG.contains(&long);
    }
    let Some(short) = token.strip_prefix('-') else {
        return false;
    };
    let mut chars = short.chars();
    match (chars.next(), chars.next()) {
        (Some(flag), None) => !NO_VALUE_SHORT.contains(&flag),
        _ => false,
    }
}

fn parse_flag_value(token: &str, short: &str, long: &str) -> Option<String> {
    if let Some(value) = token
        .strip_prefix(long)
        .and_then(|rest| rest.strip_prefix('='))
    {
        return Some(value.to_string());
    }
    if token.starts_with("--") {
        return None;
    }
    // Short options also take an attached value: `-ofile`, `-o=file`.
    token
        .strip_prefix(short)
        .filter(|rest| !rest.is_empty())
        .map(|rest| rest.strip_prefix('=').unwrap_or(rest).to_string())
}

fn split_sbatch_args(input: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut buf = String::new();
    let mut in_single = false;
    let mut in_double = false;
    let mut escape = false;

    for ch in input.chars() {
        if escape {
            buf.push(ch);
            escape = false;
            continue;
        }
        if ch == '\\' && !in_single {
            escape = true;
            continue;
        }
        if in_single {
            if ch == '\'' {
                in_single = false;
            } else {
                buf.push(ch);
            }
            continue;
        }
        if in_double {
            if ch == '"' {
                in_double = false;
            } else {
                buf.push(ch);
            }
            continue;
        }
        match ch {
            '\'' => in_single = true,
            '"' => in_double = true,
            ch if ch.is_whitespace() => {
                if !buf.is_empty() {
                    out.push(std::mem::take(&mut buf));
                }
            }
            _ => buf.push(ch),
        }
    }

    if escape {
        buf.push('\\');
    }
    if !buf.is_empty() {
        out.push(buf);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};
    use tempfile::TempDir;

    use crate::naming::SubmissionId;

    struct FixedClock(NaiveDateTime);

    impl ClockPort for FixedClock {
        fn now_local(&self) -> NaiveDateTime {
            self.0
        }
    }

    fn noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 19)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn config(root: &Path) -> Config {
        Config {
            out_dir: root.join("out"),
            scripts_dir: root.join("scripts"),
            scratch_dir: None,
            launcher: "srun".to_string(),
            signal_lead_secs: 90,
            verbose: false,
            config_path: None,
        }
    }

    fn request(flags: &str) -> BatchRequest {
        BatchRequest {
            script: ScriptBody::split(vec!["python foo.py".to_string()]).unwrap(),
            flags: SbatchFlags::parse(flags).unwrap(),
            retry: false,
            local: false,
        }
    }

    fn fixed_paths(config: &Config) -> ArtifactPaths {
        ArtifactPaths::new(
            &config.out_dir,
            &config.scripts_dir,
            noon(),
            SubmissionId::from_parts(noon(), "abc123"),
        )
    }

    fn directive_line(batch: &str) -> &str {
        batch
            .lines()
            .find(|line| line.starts_with(DIRECTIVE))
            .unwrap()
    }

    #[test]
    fn flags_detect_output_in_every_spelling() {
        for raw in [
            "-o run.out",
            "-orun.out",
            "--output run.out",
            "--output=run.out",
            "-p gpu --output='run.out'",
        ] {
            let flags = SbatchFlags::parse(raw).unwrap();
            assert_eq!(flags.output(), Some("run.out"), "flags: {raw}");
        }
        let flags = SbatchFlags::parse("--open-mode=truncate -p gpu").unwrap();
        assert_eq!(flags.output(), None);
    }

    #[test]
    fn flags_detect_array_requests() {
        assert_eq!(SbatchFlags::parse("--array 0-3").unwrap().array(), Some("0-3"));
        assert_eq!(SbatchFlags::parse("--array=1,5").unwrap().array(), Some("1,5"));
        assert_eq!(SbatchFlags::parse("-a 0-9%2").unwrap().array(), Some("0-9%2"));
        assert!(!SbatchFlags::parse("--account=lab -t 10").unwrap().is_array());
    }

    #[test]
    fn values_of_other_options_are_not_inspected() {
        let flags = SbatchFlags::parse("--comment \"-o x\" -J '--array 1-2' -p gpu").unwrap();
        assert_eq!(flags.output(), None);
        assert!(!flags.is_array());

        let flags = SbatchFlags::parse("--requeue -o run.out --hold -a 1-3").unwrap();
        assert_eq!(flags.output(), Some("run.out"));
        assert_eq!(flags.array(), Some("1-3"));

        let flags = SbatchFlags::parse("-H -orun.out --exclusive --array=0-1").unwrap();
        assert_eq!(flags.output(), Some("run.out"));
        assert_eq!(flags.array(), Some("0-1"));
    }

    #[test]
    fn comment_mentioning_output_keeps_default_output() {
        let dir = TempDir::new().unwrap();
        let config = config(dir.path());
        let plan = synthesize(
            &config,
            &request("--comment \"-o x\""),
            fixed_paths(&config),
            dir.path(),
        )
        .unwrap();
        let directive = directive_line(&plan.batch_text);
        assert!(directive.contains("--output="));
        assert!(directive.ends_with("--comment \"-o x\""));
    }

    #[test]
    fn flag_without_value_is_a_usage_error() {
        let err = SbatchFlags::parse("-p gpu -o").unwrap_err();
        assert!(err.is_usage());
    }

    #[test]
    fn expand_for_shell_maps_placeholders() {
        assert_eq!(expand_for_shell("/o/%j.out"), "/o/${SLURM_JOB_ID}.out");
        assert_eq!(
            expand_for_shell("/o/%A_%a.out"),
            "/o/${SLURM_ARRAY_JOB_ID}_${SLURM_ARRAY_TASK_ID}.out"
        );
        assert_eq!(
            expand_for_shell("%x-%u-100%%-%N"),
            "${SLURM_JOB_NAME}-${USER}-100%-%N"
        );
        assert_eq!(expand_for_shell("/o/$weird\"name"), "/o/\\$weird\\\"name");
    }

    #[test]
    fn default_flags_are_prepended_and_output_added() {
        let dir = TempDir::new().unwrap();
        let config = config(dir.path());
        let plan = synthesize(&config, &request("-p gpu"), fixed_paths(&config), dir.path())
            .unwrap();
        let expected_output = config.out_dir.join("2026-10-19").join("%j.out");
        assert_eq!(
            directive_line(&plan.batch_text),
            format!(
                "#SBATCH --signal=B:USR1@90 --requeue --open-mode=append --output={} -p gpu",
                expected_output.display()
            )
        );
        assert_eq!(plan.output_dir, Some(config.out_dir.join("2026-10-19")));
    }

    #[test]
    fn caller_output_is_never_overridden() {
        let dir = TempDir::new().unwrap();
        let config = config(dir.path());
        let plan = synthesize(
            &config,
            &request("--output=logs/%j.log"),
            fixed_paths(&config),
            Path::new("/work"),
        )
        .unwrap();
        let directive = directive_line(&plan.batch_text);
        assert_eq!(directive.matches("--output").count(), 1);
        assert!(directive.ends_with("--output=logs/%j.log"));
        assert_eq!(plan.output_dir, None);
        assert!(
            plan.batch_text
                .contains("record=\"${SLURM_JOB_ID} ")
        );
        assert!(plan.batch_text.contains(" /work/logs/${SLURM_JOB_ID}.log\""));
    }

    #[test]
    fn array_flags_use_array_placeholders() {
        let dir = TempDir::new().unwrap();
        let config = config(dir.path());
        let plan = synthesize(&config, &request("--array 0-3"), fixed_paths(&config), dir.path())
            .unwrap();
        let directive = directive_line(&plan.batch_text);
        assert!(directive.contains("%A_%a.out"));
        assert!(!directive.contains("%j"));
        assert!(plan.batch_text.contains(
            "record=\"${SLURM_ARRAY_JOB_ID}_${SLURM_ARRAY_TASK_ID} "
        ));
    }

    #[test]
    fn batch_script_layout() {
        let dir = TempDir::new().unwrap();
        let config = config(dir.path());
        let paths = fixed_paths(&config);
        let runner = paths.runner_script.display().to_string();
        let mut req = request("");
        req.retry = true;
        let plan = synthesize(&config, &req, paths, dir.path()).unwrap();
        let lines: Vec<&str> = plan.batch_text.lines().collect();

        assert_eq!(lines[0], BATCH_SHEBANG);
        assert!(lines[1].starts_with("#SBATCH "));
        assert_eq!(lines[2], "");
        assert_eq!(lines[3], "if [ -n \"${SLURM_JOB_ID:-}\" ]; then");
        assert_eq!(lines[5], "        flock -x 200");
        assert!(lines[10].ends_with("jobs.txt.lock"));
        assert!(plan.batch_text.contains("env | grep '^SLURM_' | sort\n"));
        assert!(plan.batch_text.contains("trap _sbwrap_requeue USR1\n"));
        assert!(plan.batch_text.contains("    scontrol requeue \"${SLURM_JOB_ID}\"\n"));
        assert_eq!(lines[lines.len() - 3], format!("srun {runner} &"));
        assert_eq!(lines[lines.len() - 2], "wait $!");
        assert_eq!(lines[lines.len() - 1], "exit $?");
        assert_eq!(lines[lines.len() - 4], "");
    }

    #[test]
    fn local_mode_skips_record_block_and_launcher() {
        let dir = TempDir::new().unwrap();
        let config = config(dir.path());
        let paths = fixed_paths(&config);
        let runner = paths.runner_script.display().to_string();
        let mut req = request("");
        req.local = true;
        let plan = synthesize(&config, &req, paths, dir.path()).unwrap();
        assert!(!plan.batch_text.contains("flock"));
        assert!(!plan.batch_text.contains("_sbwrap_requeue"));
        assert!(plan.batch_text.ends_with(&format!("{runner} &\nwait $!\nexit $?\n")));
        assert!(!plan.batch_text.contains("srun"));
    }

    #[test]
    fn display_mode_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let config = config(dir.path());
        let mut req = request("--array 0-3 -o x.out");
        req.retry = true;
        let clock = FixedClock(noon());
        match generate(&config, &req, true, &clock, dir.path()).unwrap() {
            Generated::Preview(text) => assert_eq!(text, "#!/bin/bash\npython foo.py"),
            Generated::Written(_) => panic!("expected preview"),
        }
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn generate_writes_both_artifacts() {
        let dir = TempDir::new().unwrap();
        let config = config(dir.path());
        let clock = FixedClock(noon());
        let Generated::Written(paths) =
            generate(&config, &request(""), false, &clock, dir.path()).unwrap()
        else {
            panic!("expected written artifacts");
        };
        assert_eq!(
            std::fs::read_to_string(&paths.runner_script).unwrap(),
            "#!/bin/bash\npython foo.py\n"
        );
        let batch = std::fs::read_to_string(&paths.batch_script).unwrap();
        assert!(batch.starts_with(BATCH_SHEBANG));
        assert!(paths.output_dir.is_dir());

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(&paths.batch_script)
                .unwrap()
                .permissions()
                .mode();
            assert_eq!(mode & 0o111, 0o111);
        }
    }

    #[test]
    fn explicit_output_skips_output_dir_creation() {
        let dir = TempDir::new().unwrap();
        let config = config(dir.path());
        let clock = FixedClock(noon());
        let Generated::Written(paths) =
            generate(&config, &request("-o /dev/null"), false, &clock, dir.path()).unwrap()
        else {
            panic!("expected written artifacts");
        };
        assert!(!config.out_dir.exists());
        assert!(paths.batch_script.is_file());
    }
}
