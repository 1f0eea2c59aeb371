//! # contract: data and traits shared between pipeline stages
//!
//! The sampler hands pages to the renderer as plain display lines; the
//! renderer's ODT is handed to a [`DocumentConverter`] which produces the PDF
//! that gets overlaid on the base agenda.
//!
//! ## Mocking & Testing
//! - [`DocumentConverter`] is annotated for `mockall`, so the pipeline can be
//!   exercised without an office suite installed. The mock is exported behind
//!   the `test-export-mocks` feature (on by default).

use std::path::{Path, PathBuf};

#[cfg(any(test, feature = "test-export-mocks"))]
use mockall::automock;
use serde::Serialize;

use crate::error::ConvertError;
use crate::pool::LineStyle;
use crate::sampler::Page;

/// What the renderer needs to know about one line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayLine {
    pub text: String,
    pub strikeout: bool,
}

/// One page as the renderer sees it.
pub type RenderedPage = Vec<DisplayLine>;

impl From<&Page> for RenderedPage {
    fn from(page: &Page) -> Self {
        page.lines()
            .iter()
            .map(|line| DisplayLine {
                text: line.text.clone(),
                strikeout: line.style == LineStyle::Strikeout,
            })
            .collect()
    }
}

/// Converts a rendered document into a PDF.
///
/// Implementors write the PDF somewhere under `work_dir` and return its path.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
pub trait DocumentConverter {
    fn convert(&self, input: &Path, work_dir: &Path) -> Result<PathBuf, ConvertError>;
}
