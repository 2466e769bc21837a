// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

use crate::error::{TranslateError, TranslateResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable naming the runtime directory when not configured
pub const RUNTIME_ROOT_ENV: &str = "FTC";

/// Options of one translation run. Usually read from a toml file, with
/// individual fields overridden from the command line.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct TranslatorOptions {
    /// Extension of translated units.
    pub target_extension: String,
    /// Extension of synthesized header units.
    pub header_extension: String,
    /// File name of the template unit inside the runtime directory.
    pub template_name: String,
    /// Header declaring the file-table runtime routines.
    pub runtime_header: String,
    /// Runtime directory; falls back to `$FTC` when unset.
    pub runtime_root: Option<PathBuf>,
}

impl Default for TranslatorOptions {
    fn default() -> Self {
        Self {
            target_extension: "c".to_string(),
            header_extension: "h".to_string(),
            template_name: "dummy.f90".to_string(),
            runtime_header: "ftc_file_io.h".to_string(),
            runtime_root: None,
        }
    }
}

impl TranslatorOptions {
    pub fn from_toml(text: &str) -> TranslateResult<Self> {
        toml::from_str(text).map_err(|e| TranslateError::Config(e.to_string()))
    }

    pub fn with_runtime_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.runtime_root = Some(root.into());
        self
    }

    /// Path of the template unit every synthesized unit starts from
    pub fn template_path(&self) -> TranslateResult<PathBuf> {
        let root = match &self.runtime_root {
            Some(root) => root.clone(),
            None => std::env::var_os(RUNTIME_ROOT_ENV)
                .map(PathBuf::from)
                .ok_or_else(|| {
                    TranslateError::Config(format!(
                        "runtime root is not configured and ${} is not set",
                        RUNTIME_ROOT_ENV
                    ))
                })?,
        };
        Ok(root.join(&self.template_name))
    }

    pub fn target_file_name(&self, source_file: &str) -> String {
        replace_extension(source_file, &self.target_extension)
    }

    pub fn header_file_name(&self, target_file: &str) -> String {
        replace_extension(target_file, &self.header_extension)
    }
}

/// Replace the last extension of `file`, appending one if there is none
pub fn replace_extension(file: &str, extension: &str) -> String {
    Path::new(file)
        .with_extension(extension)
        .to_string_lossy()
        .into_owned()
}

/// Final path component, used for include directives
pub fn base_name(file: &str) -> String {
    Path::new(file)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| file.to_string())
}
