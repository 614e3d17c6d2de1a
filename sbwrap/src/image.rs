// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

use std::path::{Path, PathBuf};

use crate::errors::{AppError, AppResult};
use crate::script::ScriptBody;
use crate::shell::{dq_escape, sh_quote};

const SCRATCH_VAR: &str = "SBWRAP_IMAGE_DIR";
const SCRATCH_TEMPLATE: &str = "sbwrap-image.XXXXXX";
const SQUASHFS_EXTENSIONS: &[&str] = &["sqsh", "squashfs", "sqfs"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveKind {
    Tar,
    Squashfs,
}

impl ArchiveKind {
    pub fn detect(path: &Path) -> Self {
        let is_squash = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| SQUASHFS_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
            .unwrap_or(false);
        if is_squash {
            ArchiveKind::Squashfs
        } else {
            ArchiveKind::Tar
        }
    }

    fn extract_command(self, archive: &str, dir: &str) -> String {
        match self {
            ArchiveKind::Tar => format!("tar -xf {archive} -C {dir}"),
            ArchiveKind::Squashfs => format!("unsquashfs -f -d {dir} {archive}"),
        }
    }
}

/// An archive to unpack into a scratch directory before the script runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageMount {
    pub archive: PathBuf,
    pub scratch_parent: Option<PathBuf>,
    pub kind: ArchiveKind,
}

impl ImageMount {
    /// Checks the archive exists and pins it to an absolute path, since the
    /// generated script changes directory before running anything else.
    pub fn resolve(archive: &Path, scratch_parent: Option<&Path>) -> AppResult<Self> {
        if !archive.is_file() {
            return Err(AppError::invalid_argument(format!(
                "image archive '{}' does not exist or is not a file",
                archive.display()
            )));
        }
        let archive = archive.canonicalize().map_err(|err| {
            AppError::local_error(format!(
                "failed to resolve image archive '{}': {err}",
                archive.display()
            ))
        })?;
        Ok(Self {
            kind: ArchiveKind::detect(&archive),
            archive,
            scratch_parent: scratch_parent.map(Path::to_path_buf),
        })
    }

    pub fn statements(&self) -> Vec<String> {
        let archive = sh_quote(&self.archive.to_string_lossy());
        let dir = format!("\"${SCRATCH_VAR}\"");
        let mktemp = match &self.scratch_parent {
            Some(parent) => format!(
                "{SCRATCH_VAR}=$(mktemp -d -p {} {SCRATCH_TEMPLATE})",
                sh_quote(&parent.to_string_lossy())
            ),
            None => format!("{SCRATCH_VAR}=$(mktemp -d -t {SCRATCH_TEMPLATE})"),
        };
        vec![
            mktemp,
            format!(
                "echo \"sbwrap: image {} -> ${SCRATCH_VAR}\" >&2",
                dq_escape(&self.archive.to_string_lossy())
            ),
            self.kind.extract_command(&archive, &dir),
            format!("cd {dir}"),
        ]
    }

    pub fn inject(&self, script: &mut ScriptBody) {
        script.prepend(self.statements());
    }
}
