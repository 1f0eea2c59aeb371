//! High-level pipeline: pool -> pages -> ODT -> PDF -> overlay.
//!
//! Runs each stage once, in order, and stops at the first failure. Nothing is
//! retried; stage errors propagate unchanged inside [`GenerateError`].
//!
//! # Callable From
//! - The CLI crate's `generate` subcommand
//! - Integration tests, with a mocked [`DocumentConverter`]

use std::fs;
use std::path::PathBuf;

use rand::Rng;
use tracing::{error, info};

use crate::config::GenerateConfig;
use crate::contract::{DocumentConverter, RenderedPage};
use crate::error::GenerateError;
use crate::odt::{write_odt, OdtAssets};
use crate::overlay::overlay_pages;
use crate::pool::load_pool;
use crate::sampler::PageSampler;

/// Name of the intermediate document inside the work directory.
pub const ODT_FILE_NAME: &str = "challenges.odt";

#[derive(Debug)]
pub struct GenerateReport {
    pub pages: usize,
    pub per_page: usize,
    pub odt_path: PathBuf,
    pub pdf_path: PathBuf,
    pub output_path: PathBuf,
}

pub fn generate<C, R>(
    config: &GenerateConfig,
    converter: &C,
    rng: &mut R,
) -> Result<GenerateReport, GenerateError>
where
    C: DocumentConverter + ?Sized,
    R: Rng + ?Sized,
{
    info!("[GENERATE] Starting challenge page generation");
    config.trace_loaded();

    // Step 1: Sample
    let pool = load_pool(&config.challenges)?;
    let sampler = PageSampler::new(&pool, &config.sampling_rules())?;
    let pages = sampler.sample_pages(config.pages, rng)?;
    let rendered: Vec<RenderedPage> = pages.iter().map(RenderedPage::from).collect();
    info!(pages = rendered.len(), per_page = sampler.per_page(), "[GENERATE] Sampled pages");

    // Step 2: Render
    fs::create_dir_all(&config.work_dir).map_err(|e| {
        error!(error = ?e, path = %config.work_dir.display(), "[GENERATE][ERROR] Failed to create work directory");
        GenerateError::WorkDir {
            path: config.work_dir.clone(),
            source: e,
        }
    })?;
    let assets = match &config.template_dir {
        Some(dir) => OdtAssets::from_dir(dir)?,
        None => OdtAssets::default(),
    };
    let odt_path = config.work_dir.join(ODT_FILE_NAME);
    write_odt(&odt_path, &rendered, &assets)?;

    // Step 3: Convert
    let pdf_path = converter.convert(&odt_path, &config.work_dir).map_err(|e| {
        error!(error = %e, "[GENERATE][ERROR] Conversion failed");
        e
    })?;
    info!(path = %pdf_path.display(), "[GENERATE] Converted ODT to PDF");

    // Step 4: Overlay
    let report = overlay_pages(&config.base_pdf, &pdf_path, &config.output)?;
    info!(pages = report.pages, output = %config.output.display(), "[GENERATE] Done");

    Ok(GenerateReport {
        pages: rendered.len(),
        per_page: sampler.per_page(),
        odt_path,
        pdf_path,
        output_path: config.output.clone(),
    })
}
