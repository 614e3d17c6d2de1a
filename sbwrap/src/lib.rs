// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

pub mod args;
pub mod config;
pub mod errors;
pub mod format;
pub mod image;
pub mod naming;
pub mod records;
pub mod sbatch;
pub mod script;
pub mod shell;
pub mod submit;
pub mod template;
