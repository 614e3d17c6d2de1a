// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

use std::collections::BTreeMap;

use crate::errors::AppError;

const OPEN: &str = "@{";
const CLOSE: char = '}';

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("template line {line} references unknown variable '{name}'")]
    UnknownVariable { line: usize, name: String },
    #[error("template line {line} has an unterminated placeholder")]
    Unterminated { line: usize },
}

impl From<TemplateError> for AppError {
    fn from(err: TemplateError) -> Self {
        AppError::internal_error(err.to_string())
    }
}

#[derive(Debug, Clone)]
enum Line {
    Template(String),
    Raw(String),
}

/// Ordered line builder for generated shell scripts.
///
/// Template lines may reference `@{name}` placeholders, which are filled
/// from the substitution map at render time. Raw lines are emitted as-is,
/// so caller-supplied text never goes through substitution.
#[derive(Debug, Clone, Default)]
pub struct ScriptTemplate {
    lines: Vec<Line>,
    vars: BTreeMap<String, String>,
}

impl ScriptTemplate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.vars.insert(name.into(), value.into());
        self
    }

    pub fn line(&mut self, template: impl Into<String>) -> &mut Self {
        self.lines.push(Line::Template(template.into()));
        self
    }

    pub fn raw(&mut self, text: impl Into<String>) -> &mut Self {
        self.lines.push(Line::Raw(text.into()));
        self
    }

    pub fn blank(&mut self) -> &mut Self {
        self.raw("")
    }

    pub fn lines<I, S>(&mut self, templates: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for template in templates {
            self.line(template);
        }
        self
    }

    pub fn render(&self) -> Result<String, TemplateError> {
        let mut out = String::new();
        for (idx, line) in self.lines.iter().enumerate() {
            match line {
                Line::Raw(text) => out.push_str(text),
                Line::Template(text) => self.substitute(idx + 1, text, &mut out)?,
            }
            out.push('\n');
        }
        Ok(out)
    }

    fn substitute(&self, line: usize, text: &str, out: &mut String) -> Result<(), TemplateError> {
        let mut rest = text;
        while let Some(start) = rest.find(OPEN) {
            out.push_str(&rest[..start]);
            let after = &rest[start + OPEN.len()..];
            let Some(end) = after.find(CLOSE) else {
                return Err(TemplateError::Unterminated { line });
            };
            let name = &after[..end];
            let Some(value) = self.vars.get(name) else {
                return Err(TemplateError::UnknownVariable {
                    line,
                    name: name.to_string(),
                });
            };
            out.push_str(value);
            rest = &after[end + 1..];
        }
        out.push_str(rest);
        Ok(())
    }
}
