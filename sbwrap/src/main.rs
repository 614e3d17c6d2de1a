// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

use std::process::ExitCode;

use anyhow::Context;
use log::LevelFilter;
use sbwrap::args::{Cli, Cmd, ConfigArgs, LogArgs, RecordArgs, RunArgs, ScriptArgs, parse_cli};
use sbwrap::config::{self, Config, ConfigReport, LoadResult};
use sbwrap::errors::exit_code_for;
use sbwrap::format::{
    config_report_to_json, format_config_report, format_json, lookup_to_json, submission_to_json,
};
use sbwrap::image::ImageMount;
use sbwrap::naming::{BATCH_SUFFIX, SystemClock};
use sbwrap::records::{JobRecord, RecordField, RecordStore, lookup};
use sbwrap::sbatch::{BatchRequest, Generated, SbatchFlags, generate};
use sbwrap::script::{CommandInput, normalize};
use sbwrap::submit::{Submission, submit};

const LOG_ENV_VAR: &str = "SBWRAP_LOG";

fn init_logging(verbose: bool) {
    let mut builder = env_logger::builder();
    builder.format_timestamp_secs();
    if verbose {
        builder.filter_level(LevelFilter::Debug);
    } else {
        builder
            .filter_level(LevelFilter::Off)
            .filter_module("sbwrap", LevelFilter::Info);
    }
    if let Ok(filters) = std::env::var(LOG_ENV_VAR) {
        builder.parse_filters(&filters);
    }
    builder.init();
}

fn log_config_report(report: &ConfigReport) {
    for line in format_config_report(report).lines() {
        log::debug!("config {line}");
    }
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(u8::try_from(exit_code_for(&err)).unwrap_or(1))
        }
    }
}

fn run() -> anyhow::Result<()> {
    let parsed = parse_cli();
    let Cli {
        config: config_path,
        out_dir,
        scripts_dir,
        cmd,
        ..
    } = parsed.cli;
    let LoadResult { config, report } = config::load_with_report(
        config_path,
        config::Overrides {
            out_dir,
            scripts_dir,
            verbose: parsed.verbose_override,
        },
    )?;
    init_logging(config.verbose);
    log_config_report(&report);

    match cmd {
        Cmd::Run(args) => run_submission(&config, args)?,
        Cmd::Script(ScriptArgs { job_id, batch, json }) => {
            let suffix = if batch { BATCH_SUFFIX } else { "" };
            print_lookup(&config, &job_id, RecordField::Script, suffix, json)?;
        }
        Cmd::Log(LogArgs { job_id, json }) => {
            print_lookup(&config, &job_id, RecordField::Output, "", json)?;
        }
        Cmd::Record(RecordArgs {
            job_id,
            script,
            output,
        }) => {
            let record = JobRecord::checked(&job_id, &script, &output)?;
            let store = RecordStore::in_dir(&config.scripts_dir);
            if store.append(&record)? {
                log::info!("recorded {}", record.to_line());
            } else {
                log::info!("record already present: {}", record.to_line());
            }
        }
        Cmd::Config(ConfigArgs { json }) => {
            if json {
                println!("{}", format_json(config_report_to_json(&report))?);
            } else {
                println!("{}", format_config_report(&report));
            }
        }
    }
    Ok(())
}

fn run_submission(config: &Config, args: RunArgs) -> anyhow::Result<()> {
    let input = match args.script_file {
        Some(path) => CommandInput::ScriptFile(path),
        None => CommandInput::Args(args.command),
    };
    let mut script = normalize(&input, &mut std::io::stdin().lock())?;
    if let Some(archive) = args.image.as_deref() {
        let scratch = args.scratch.as_deref().or(config.scratch_dir.as_deref());
        ImageMount::resolve(archive, scratch)?.inject(&mut script);
    }
    let request = BatchRequest {
        script,
        flags: SbatchFlags::parse(&args.flags)?,
        retry: args.retry,
        local: args.local,
    };

    let cwd = std::env::current_dir().context("failed to resolve current directory")?;
    let paths = match generate(config, &request, args.display, &SystemClock::new(), &cwd)? {
        Generated::Preview(text) => {
            println!("{text}");
            return Ok(());
        }
        Generated::Written(paths) => paths,
    };

    if !args.json {
        println!("{}", paths.batch_script.display());
    }
    let submission = if args.no_submit {
        None
    } else {
        Some(submit(&paths.batch_script, args.local)?)
    };
    if args.json {
        println!(
            "{}",
            format_json(submission_to_json(&paths, submission.as_ref()))?
        );
    } else if let Some(Submission::Queued { job_id }) = submission {
        println!("{job_id}");
    }
    Ok(())
}

fn print_lookup(
    config: &Config,
    job_id: &str,
    field: RecordField,
    suffix: &str,
    json: bool,
) -> anyhow::Result<()> {
    let store = RecordStore::in_dir(&config.scripts_dir);
    let values = lookup(&store, job_id, field, suffix)?;
    if json {
        let name = match field {
            RecordField::Script => "script",
            RecordField::Output => "log",
        };
        println!("{}", format_json(lookup_to_json(job_id.trim(), name, &values))?);
        return Ok(());
    }
    for value in values {
        println!("{value}");
    }
    Ok(())
}
