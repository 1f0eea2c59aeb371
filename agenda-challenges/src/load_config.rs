//! Loads the YAML run config and adapts it into the core [`GenerateConfig`].
//!
//! This is the only place the CLI parses user-supplied YAML for a run. The
//! core pipeline fields sit at the top level of the file; the `converter`
//! section only matters to the binary, which picks the office program.
//!
//! # Environment
//! - `LIBREOFFICE_BIN`: when set, replaces `converter.program`.
//!
//! All errors are `anyhow::Error` and surface at the CLI boundary.
use agenda_challenges_core::config::GenerateConfig;
use agenda_challenges_core::convert::DEFAULT_PROGRAM;
use anyhow::Result;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;
use tracing::{error, info};

pub const PROGRAM_ENV: &str = "LIBREOFFICE_BIN";

#[derive(Debug, Deserialize)]
pub struct CliConfig {
    #[serde(flatten)]
    pub generate: GenerateConfig,
    #[serde(default)]
    pub converter: ConverterSection,
}

#[derive(Debug, Deserialize)]
pub struct ConverterSection {
    #[serde(default = "default_program")]
    pub program: String,
}

impl Default for ConverterSection {
    fn default() -> Self {
        Self {
            program: default_program(),
        }
    }
}

fn default_program() -> String {
    DEFAULT_PROGRAM.to_string()
}

/// Reads a run config from `path` and applies environment overrides.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<CliConfig> {
    let path_ref = path.as_ref();
    info!(config_path = ?path_ref, "Loading configuration from file");

    let config_content = match fs::read_to_string(path_ref) {
        Ok(content) => {
            info!(config_path = ?path_ref, "Config file read successfully");
            content
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to read config file");
            return Err(anyhow::anyhow!(
                "Failed to read config file {:?}: {}",
                path_ref,
                e
            ));
        }
    };

    let mut config: CliConfig = match serde_yaml::from_str(&config_content) {
        Ok(conf) => {
            info!(config_path = ?path_ref, "Parsed config YAML successfully");
            conf
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to parse config YAML");
            return Err(anyhow::anyhow!("Failed to parse config YAML: {e}"));
        }
    };

    if let Ok(program) = env::var(PROGRAM_ENV) {
        if !program.is_empty() {
            info!(program = %program, "Converter program overridden from {}", PROGRAM_ENV);
            config.converter.program = program;
        }
    }

    config.generate.trace_loaded();
    Ok(config)
}
