use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::contract::DocumentConverter;
use crate::error::ConvertError;

pub const DEFAULT_PROGRAM: &str = "libreoffice";

/// Converts documents to PDF with a headless LibreOffice.
///
/// Each run uses a private user profile under `<work_dir>/loenv`, so the
/// conversion works while another LibreOffice instance is open.
#[derive(Debug, Clone)]
pub struct LibreOfficeConverter {
    program: String,
}

impl Default for LibreOfficeConverter {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRAM)
    }
}

impl LibreOfficeConverter {
    pub fn new<S: Into<String>>(program: S) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    fn command(&self, input_name: &str, work_dir: &Path) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg(format!(
            "-env:UserInstallation=file://{}",
            work_dir.join("loenv").display()
        ))
        .arg("--headless")
        .arg("--convert-to")
        .arg("pdf")
        .arg(input_name)
        .current_dir(work_dir);
        cmd
    }
}

impl DocumentConverter for LibreOfficeConverter {
    fn convert(&self, input: &Path, work_dir: &Path) -> Result<PathBuf, ConvertError> {
        let work_dir = fs::canonicalize(work_dir)?;
        let (input_name, stem) = match (input.file_name(), input.file_stem()) {
            (Some(name), Some(stem)) => (name.to_string_lossy(), stem.to_string_lossy()),
            _ => return Err(ConvertError::InvalidInput(input.to_path_buf())),
        };
        let output = work_dir.join(format!("{stem}.pdf"));

        let status = self.command(&input_name, &work_dir).status();

        match status {
            Ok(s) if s.success() => {
                tracing::info!(
                    program = %self.program,
                    input = %input_name,
                    work_dir = %work_dir.display(),
                    status = ?s,
                    "Converted document to PDF"
                );
            }
            Ok(s) => {
                tracing::error!(
                    program = %self.program,
                    input = %input_name,
                    work_dir = %work_dir.display(),
                    "Converter exited with non-zero code: {}", s
                );
                return Err(ConvertError::Failed {
                    program: self.program.clone(),
                    status: s.to_string(),
                });
            }
            Err(e) => {
                tracing::error!(
                    error = ?e,
                    program = %self.program,
                    input = %input_name,
                    "Failed to launch converter process"
                );
                return Err(ConvertError::Spawn {
                    program: self.program.clone(),
                    source: e,
                });
            }
        }

        if !output.is_file() {
            tracing::error!(path = %output.display(), "Converter produced no PDF");
            return Err(ConvertError::MissingOutput(output));
        }
        Ok(output)
    }
}
