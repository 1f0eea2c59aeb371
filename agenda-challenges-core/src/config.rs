use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info};

use crate::sampler::{SamplingRules, DEFAULT_MANDATORY_CATEGORY};

fn default_work_dir() -> PathBuf {
    PathBuf::from("tmp")
}

fn default_pages() -> usize {
    10
}

fn default_per_page() -> usize {
    10
}

fn default_mandatory() -> Vec<String> {
    vec![DEFAULT_MANDATORY_CATEGORY.to_string()]
}

/// Everything one `generate` run needs apart from the converter and the
/// random source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateConfig {
    /// Challenges file (YAML categories or a plain `.txt` list).
    pub challenges: PathBuf,
    pub base_pdf: PathBuf,
    pub output: PathBuf,
    #[serde(default = "default_work_dir")]
    pub work_dir: PathBuf,
    #[serde(default = "default_pages")]
    pub pages: usize,
    #[serde(default = "default_per_page")]
    pub per_page: usize,
    /// Categories required on every page; `[]` turns the default off.
    #[serde(default = "default_mandatory")]
    pub mandatory: Vec<String>,
    #[serde(default)]
    pub max_attempts: Option<usize>,
    /// Directory with ODT asset overrides.
    #[serde(default)]
    pub template_dir: Option<PathBuf>,
}

impl GenerateConfig {
    pub fn sampling_rules(&self) -> SamplingRules {
        SamplingRules {
            per_page: self.per_page,
            mandatory: self.mandatory.clone(),
            max_attempts: self.max_attempts,
        }
    }

    pub fn trace_loaded(&self) {
        info!(
            challenges = %self.challenges.display(),
            base_pdf = %self.base_pdf.display(),
            output = %self.output.display(),
            pages = self.pages,
            per_page = self.per_page,
            "Loaded GenerateConfig"
        );
        debug!(?self, "GenerateConfig loaded (full debug)");
    }
}
