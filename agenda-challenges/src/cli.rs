//! Command-line surface of agenda-challenges.
//!
//! Parsing, config loading and random-source seeding live here. Sampling,
//! rendering, conversion and overlay all live in `agenda-challenges-core`;
//! this module only wires them together.
//!
//! For programmatic or integration use, call [`run`] with a constructed [`Cli`].
use crate::load_config::load_config;
use agenda_challenges_core::convert::LibreOfficeConverter;
use agenda_challenges_core::generate::generate;
use agenda_challenges_core::pool::{load_pool, LineStyle};
use agenda_challenges_core::sampler::{Page, PageSampler, SamplingRules, DEFAULT_MANDATORY_CATEGORY};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::{self, Write};
use std::path::PathBuf;

/// CLI for agenda-challenges: fill agenda pages with random challenges.
#[derive(Parser)]
#[clap(
    name = "agenda-challenges",
    version,
    about = "Sample random challenge pages and stamp them onto an agenda PDF"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the full pipeline: sample, render ODT, convert to PDF, overlay
    Generate {
        /// Path to the YAML run config
        #[clap(long)]
        config: PathBuf,
        /// Seed for reproducible output
        #[clap(long)]
        seed: Option<u64>,
    },
    /// Print sampled pages to stdout without producing any document
    Sample {
        /// Challenges file (YAML categories or plain .txt)
        #[clap(long)]
        challenges: PathBuf,
        #[clap(long, default_value_t = 1)]
        pages: usize,
        #[clap(long, default_value_t = 10)]
        per_page: usize,
        #[clap(long)]
        seed: Option<u64>,
        /// Category that must appear on every page (repeatable)
        #[clap(long, default_value = DEFAULT_MANDATORY_CATEGORY)]
        mandatory: Vec<String>,
        /// Require no category on every page (e.g. for plain .txt lists)
        #[clap(long, conflicts_with = "mandatory")]
        no_mandatory: bool,
    },
}

fn rng_from(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => {
            tracing::info!(seed, "Using seeded random source");
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_entropy(),
    }
}

/// CLI logic entrypoint for integration tests and main()
pub fn run(cli: Cli) -> Result<()> {
    // Emit a top-level 'trace_initialised' event at the very start
    tracing::info!("trace_initialised");

    match cli.command {
        Commands::Generate {
            config: config_path,
            seed,
        } => {
            let config = load_config(&config_path)
                .with_context(|| format!("loading run config {}", config_path.display()))?;
            tracing::info!(command = "generate", "Starting generation");
            let converter = LibreOfficeConverter::new(config.converter.program);
            let mut rng = rng_from(seed);
            match generate(&config.generate, &converter, &mut rng) {
                Ok(report) => {
                    tracing::info!(command = "generate", ?report, "Generation complete");
                    println!(
                        "Wrote {} page(s) of {} challenges to {}",
                        report.pages,
                        report.per_page,
                        report.output_path.display()
                    );
                    Ok(())
                }
                Err(e) => {
                    tracing::error!(command = "generate", error = %e, "Generation failed");
                    Err(anyhow::Error::new(e))
                }
            }
        }
        Commands::Sample {
            challenges,
            pages,
            per_page,
            seed,
            mandatory,
            no_mandatory,
        } => {
            let pool = load_pool(&challenges)
                .with_context(|| format!("loading challenges {}", challenges.display()))?;
            let rules = SamplingRules {
                per_page,
                mandatory: if no_mandatory { Vec::new() } else { mandatory },
                max_attempts: None,
            };
            let sampler = PageSampler::new(&pool, &rules)?;
            let mut rng = rng_from(seed);
            let sampled = sampler.sample_pages(pages, &mut rng)?;
            tracing::info!(command = "sample", pages = sampled.len(), "Sampling complete");

            let stdout = io::stdout();
            print_pages(&mut stdout.lock(), &sampled)?;
            Ok(())
        }
    }
}

/// Writes pages as plain text; struck-out lines are wrapped in `~~`.
pub fn print_pages<W: Write>(out: &mut W, pages: &[Page]) -> io::Result<()> {
    for (n, page) in pages.iter().enumerate() {
        if n > 0 {
            writeln!(out)?;
        }
        writeln!(out, "Page {}", n + 1)?;
        for line in page.lines() {
            match line.style {
                LineStyle::Strikeout => writeln!(out, "  ~~{}~~", line.text)?,
                LineStyle::Plain => writeln!(out, "  {}", line.text)?,
            }
        }
    }
    Ok(())
}
