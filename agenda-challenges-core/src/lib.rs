#![doc = "agenda-challenges-core: core logic library for agenda-challenges."]

//! Loads a challenge pool, samples constrained random pages from it, renders
//! them into an ODT document, converts that to PDF and stamps every page onto
//! a base agenda PDF.
//!
//! # Usage
//! The CLI crate wires these modules together through [`generate::generate`];
//! the individual stages are public for tests and for callers that only need
//! one of them (e.g. dry-run sampling).

pub mod config;
pub mod contract;
pub mod convert;
pub mod error;
pub mod generate;
pub mod odt;
pub mod overlay;
pub mod pool;
pub mod sampler;
