// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

use std::path::PathBuf;

use clap::{Args, CommandFactory, FromArgMatches, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "sbwrap",
    version,
    about = "Wrap shell commands into Slurm batch scripts and keep a record of what ran where.",
    long_about = None,
    after_help = "Configuration precedence: defaults < config file < command-line flags.\n\
Config path precedence: defaults < SBWRAP_CONFIG_PATH < --config.\n\
Paths in the config file are resolved relative to the config file directory; paths passed as flags are resolved relative to the current working directory.\n\
Set SBWRAP_LOG (env_logger syntax) to tune log output."
)]
pub struct Cli {
    #[arg(
        short,
        long,
        global = true,
        value_name = "PATH",
        help = "Path to a TOML config file. When omitted, SBWRAP_CONFIG_PATH is used if set, otherwise the default config file location if available."
    )]
    pub config: Option<PathBuf>,
    #[arg(
        short,
        long,
        global = true,
        action = clap::ArgAction::SetTrue,
        help = "Enable debug logging. Overrides `verbose` from the config file."
    )]
    pub verbose: bool,
    #[arg(
        long,
        global = true,
        value_name = "DIR",
        help = "Base directory for job output logs. Overrides `out_dir` from the config file."
    )]
    pub out_dir: Option<PathBuf>,
    #[arg(
        long,
        global = true,
        value_name = "DIR",
        help = "Base directory for generated scripts and the job record store. Overrides `scripts_dir` from the config file."
    )]
    pub scripts_dir: Option<PathBuf>,
    #[command(subcommand)]
    pub cmd: Cmd,
}

#[derive(Subcommand, Debug)]
pub enum Cmd {
    /// Generate runner and batch scripts for a command, then submit them.
    Run(RunArgs),
    /// Print the runner script path(s) recorded for a job.
    Script(ScriptArgs),
    /// Print the output log path(s) recorded for a job.
    Log(LogArgs),
    /// Append a job record under the store lock.
    Record(RecordArgs),
    /// Show the resolved configuration and where each value came from.
    Config(ConfigArgs),
}

#[derive(Args, Debug)]
pub struct RunArgs {
    #[arg(
        short = 's',
        long = "script",
        value_name = "FILE",
        conflicts_with = "command",
        help = "Read the script body from FILE instead of the command line."
    )]
    pub script_file: Option<PathBuf>,
    #[arg(
        short = 'f',
        long = "flags",
        value_name = "FLAGS",
        allow_hyphen_values = true,
        default_value = "",
        help = "Extra sbatch flags as one string, e.g. \"-p gpu --array 0-3\"."
    )]
    pub flags: String,
    #[arg(long, value_name = "ARCHIVE", help = "Unpack ARCHIVE into a scratch directory and run from there.")]
    pub image: Option<PathBuf>,
    #[arg(
        long,
        value_name = "DIR",
        requires = "image",
        help = "Parent directory for the image scratch directory. Overrides `scratch_dir` from the config file."
    )]
    pub scratch: Option<PathBuf>,
    #[arg(long, help = "Requeue the job when it is signalled before the time limit.")]
    pub retry: bool,
    #[arg(long, help = "Run the batch script with bash on this host instead of sbatch.")]
    pub local: bool,
    #[arg(long, help = "Print the runner script and exit without writing anything.")]
    pub display: bool,
    #[arg(long, help = "Write the scripts but do not submit them.")]
    pub no_submit: bool,
    #[arg(long, help = "Print the submission as JSON.")]
    pub json: bool,
    /// Command to run. Use `-` to read a script from stdin; prefix an
    /// argument with `@` to pass it through unquoted.
    #[arg(trailing_var_arg = true, value_name = "COMMAND")]
    pub command: Vec<String>,
}

#[derive(Args, Debug)]
pub struct ScriptArgs {
    pub job_id: String,
    #[arg(long, help = "Print the batch script path instead of the runner.")]
    pub batch: bool,
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct LogArgs {
    pub job_id: String,
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct RecordArgs {
    pub job_id: String,
    pub script: String,
    pub output: String,
}

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[arg(long)]
    pub json: bool,
}

pub struct ParsedCli {
    pub cli: Cli,
    pub verbose_override: Option<bool>,
}

const HELP_TEMPLATE: &str = r#"sbwrap {version}

{before-help}{about-with-newline}{usage-heading} {usage}

{all-args}{after-help}
"#;

fn apply_help_template_recursively(cmd: &mut clap::Command) {
    let mut owned = std::mem::take(cmd);
    owned = owned.help_template(HELP_TEMPLATE);
    for sub in owned.get_subcommands_mut() {
        apply_help_template_recursively(sub);
    }
    *cmd = owned;
}

pub fn cli_command() -> clap::Command {
    let mut cmd = Cli::command();
    apply_help_template_recursively(&mut cmd);
    cmd
}

pub fn parse_cli() -> ParsedCli {
    let matches = cli_command().get_matches();
    let verbose_override = matches.get_flag("verbose").then_some(true);
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|err| err.exit());
    ParsedCli {
        cli,
        verbose_override,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn command_is_verified() {
        cli_command().debug_assert();
    }

    #[test]
    fn run_collects_trailing_command_with_hyphens() {
        let cli = parse(&[
            "sbwrap", "run", "--retry", "-f", "-p gpu --array 0-3", "python", "-u", "train.py",
            "--epochs", "3",
        ]);
        let Cmd::Run(args) = cli.cmd else {
            panic!("expected run");
        };
        assert!(args.retry);
        assert_eq!(args.flags, "-p gpu --array 0-3");
        assert_eq!(args.command, ["python", "-u", "train.py", "--epochs", "3"]);
    }

    #[test]
    fn run_accepts_stdin_sentinel_and_raw_marker() {
        let Cmd::Run(args) = parse(&["sbwrap", "run", "-"]).cmd else {
            panic!("expected run");
        };
        assert_eq!(args.command, ["-"]);
        assert_eq!(args.flags, "");

        let Cmd::Run(args) = parse(&["sbwrap", "run", "echo", "@$HOME"]).cmd else {
            panic!("expected run");
        };
        assert_eq!(args.command, ["echo", "@$HOME"]);
    }

    #[test]
    fn script_file_conflicts_with_command() {
        assert!(Cli::try_parse_from(["sbwrap", "run", "-s", "job.sh", "echo"]).is_err());
        let Cmd::Run(args) = parse(&["sbwrap", "run", "-s", "job.sh"]).cmd else {
            panic!("expected run");
        };
        assert_eq!(args.script_file, Some(PathBuf::from("job.sh")));
    }

    #[test]
    fn scratch_requires_image() {
        assert!(Cli::try_parse_from(["sbwrap", "run", "--scratch", "/tmp", "true"]).is_err());
    }

    #[test]
    fn global_flags_work_after_subcommand() {
        let cli = parse(&["sbwrap", "script", "123", "--batch", "-v", "--scripts-dir", "/s"]);
        assert!(cli.verbose);
        assert_eq!(cli.scripts_dir, Some(PathBuf::from("/s")));
        let Cmd::Script(args) = cli.cmd else {
            panic!("expected script");
        };
        assert_eq!(args.job_id, "123");
        assert!(args.batch);
    }

    #[test]
    fn record_takes_three_positionals() {
        let Cmd::Record(args) = parse(&["sbwrap", "record", "9_1", "/s/a.sh", "/o/9_1.out"]).cmd
        else {
            panic!("expected record");
        };
        assert_eq!(args.job_id, "9_1");
        assert_eq!(args.script, "/s/a.sh");
        assert_eq!(args.output, "/o/9_1.out");
        assert!(Cli::try_parse_from(["sbwrap", "record", "9"]).is_err());
    }
}
