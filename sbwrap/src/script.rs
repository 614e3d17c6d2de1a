// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

use std::io::Read;
use std::path::{Path, PathBuf};

use crate::errors::{AppError, AppResult};
use crate::shell::sh_quote;

/// A lone `-` argument means "read the script from stdin".
pub const STDIN_SENTINEL: &str = "-";
/// Arguments starting with this marker are passed through unquoted.
pub const RAW_ARG_MARKER: char = '@';
pub const DEFAULT_SHEBANG: &str = "#!/bin/bash";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandInput {
    Args(Vec<String>),
    ScriptFile(PathBuf),
}

/// Canonical script: an optional shebang plus a non-empty remainder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptBody {
    shebang: Option<String>,
    body: Vec<String>,
}

impl ScriptBody {
    /// Splits raw lines into shebang and remainder. A script that is only a
    /// shebang (or nothing at all) is a usage error.
    pub fn split(lines: Vec<String>) -> AppResult<Self> {
        let mut lines = lines.into_iter();
        let mut shebang = None;
        let mut body = Vec::new();
        if let Some(first) = lines.next() {
            if first.starts_with("#!") {
                shebang = Some(first);
            } else {
                body.push(first);
            }
        }
        body.extend(lines);

        if body.iter().all(|line| line.trim().is_empty()) {
            return Err(AppError::invalid_argument(
                "script is empty; provide a command, a script file, or pipe a script on stdin",
            ));
        }
        Ok(Self { shebang, body })
    }

    /// Shebang to emit: the script's own, or the default.
    pub fn shebang(&self) -> &str {
        self.shebang.as_deref().unwrap_or(DEFAULT_SHEBANG)
    }

    pub fn has_own_shebang(&self) -> bool {
        self.shebang.is_some()
    }

    pub fn body(&self) -> &[String] {
        &self.body
    }

    /// Inserts statements ahead of the remainder, after the shebang.
    pub fn prepend(&mut self, lines: Vec<String>) {
        self.body.splice(0..0, lines);
    }

    /// Lines as they were split, without a synthesized shebang.
    pub fn original_lines(&self) -> Vec<String> {
        self.shebang
            .iter()
            .cloned()
            .chain(self.body.iter().cloned())
            .collect()
    }

    pub fn lines(&self) -> Vec<String> {
        std::iter::once(self.shebang().to_string())
            .chain(self.body.iter().cloned())
            .collect()
    }

    /// Runner script text, lines joined by `\n` with no trailing newline.
    pub fn render(&self) -> String {
        self.lines().join("\n")
    }
}

/// Turns CLI arguments, a script file, or stdin into a `ScriptBody`.
pub fn normalize(input: &CommandInput, stdin: &mut dyn Read) -> AppResult<ScriptBody> {
    let lines = match input {
        CommandInput::ScriptFile(path) => read_script_file(path)?,
        CommandInput::Args(args) if args.len() == 1 && args[0] == STDIN_SENTINEL => {
            read_stdin(stdin)?
        }
        CommandInput::Args(args) => {
            if args.is_empty() {
                return Err(AppError::invalid_argument(
                    "no command given; pass a command, --script FILE, or '-' to read stdin",
                ));
            }
            vec![join_args(args)]
        }
    };
    ScriptBody::split(lines)
}

/// Quotes each argument unless it carries the raw marker, then joins them.
pub fn join_args(args: &[String]) -> String {
    args.iter()
        .map(|arg| match arg.strip_prefix(RAW_ARG_MARKER) {
            Some(raw) => raw.to_string(),
            None => sh_quote(arg),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn read_script_file(path: &Path) -> AppResult<Vec<String>> {
    let contents = std::fs::read_to_string(path).map_err(|err| {
        AppError::invalid_argument(format!(
            "failed to read script {}: {err}",
            path.display()
        ))
    })?;
    Ok(contents
        .lines()
        .map(|line| line.trim_end().to_string())
        .collect())
}

fn read_stdin(stdin: &mut dyn Read) -> AppResult<Vec<String>> {
    let mut contents = String::new();
    stdin
        .read_to_string(&mut contents)
        .map_err(|err| AppError::local_error(format!("failed to read stdin: {err}")))?;
    Ok(contents.lines().map(str::to_string).collect())
}
