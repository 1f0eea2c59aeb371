//! OpenDocument text output.
//!
//! The document is a ZIP container holding a stored `mimetype` entry (it must
//! come first and stay uncompressed), the manifest, the styles and a
//! `content.xml` rendered from a Tera template with one block per page.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;
use tera::{Context, Tera};
use tracing::{debug, error, info};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::contract::RenderedPage;
use crate::error::OdtError;

const CONTENT_TEMPLATE_NAME: &str = "content.xml";

const DEFAULT_MIMETYPE: &str = include_str!("../assets/odt/mimetype");
const DEFAULT_MANIFEST: &str = include_str!("../assets/odt/META-INF/manifest.xml");
const DEFAULT_STYLES: &str = include_str!("../assets/odt/styles.xml");
const DEFAULT_CONTENT_TEMPLATE: &str = include_str!("../assets/odt/content.xml.tera");

/// Static files and the content template that make up the document.
#[derive(Debug, Clone)]
pub struct OdtAssets {
    pub mimetype: String,
    pub manifest: String,
    pub styles: String,
    pub content_template: String,
}

impl Default for OdtAssets {
    fn default() -> Self {
        Self {
            mimetype: DEFAULT_MIMETYPE.trim_end().to_string(),
            manifest: DEFAULT_MANIFEST.to_string(),
            styles: DEFAULT_STYLES.to_string(),
            content_template: DEFAULT_CONTENT_TEMPLATE.to_string(),
        }
    }
}

impl OdtAssets {
    /// Built-in assets with any of `mimetype`, `META-INF/manifest.xml`, `styles.xml`
    /// and `content.xml.tera` found in `dir` taking precedence.
    pub fn from_dir<P: AsRef<Path>>(dir: P) -> Result<Self, OdtError> {
        let dir = dir.as_ref();
        let mut assets = Self::default();

        let overrides: [(&str, &mut String); 4] = [
            ("mimetype", &mut assets.mimetype),
            ("META-INF/manifest.xml", &mut assets.manifest),
            ("styles.xml", &mut assets.styles),
            ("content.xml.tera", &mut assets.content_template),
        ];
        for (name, slot) in overrides {
            let path = dir.join(name);
            if path.is_file() {
                debug!(path = %path.display(), "Using ODT asset override");
                *slot = fs::read_to_string(&path)?;
            }
        }
        assets.mimetype = assets.mimetype.trim_end().to_string();
        Ok(assets)
    }
}

#[derive(Serialize)]
struct ContentContext<'a> {
    pages: &'a [RenderedPage],
}

/// Renders `content.xml`. Line text is XML-escaped by the template engine.
pub fn render_content(pages: &[RenderedPage], template: &str) -> Result<String, OdtError> {
    let mut tera = Tera::default();
    tera.add_raw_template(CONTENT_TEMPLATE_NAME, template)?;
    let context = Context::from_serialize(ContentContext { pages })?;
    Ok(tera.render(CONTENT_TEMPLATE_NAME, &context)?)
}

/// Writes the complete `.odt` container to `path`.
pub fn write_odt<P: AsRef<Path>>(
    path: P,
    pages: &[RenderedPage],
    assets: &OdtAssets,
) -> Result<(), OdtError> {
    let path = path.as_ref();
    info!(path = %path.display(), pages = pages.len(), "Writing ODT document");

    let content = render_content(pages, &assets.content_template).map_err(|e| {
        error!(error = %e, "Failed to render content.xml");
        e
    })?;

    let file = File::create(path)?;
    let mut zip = ZipWriter::new(BufWriter::new(file));

    zip.start_file("mimetype", entry_options(CompressionMethod::Stored))?;
    zip.write_all(assets.mimetype.as_bytes())?;

    zip.start_file("META-INF/manifest.xml", entry_options(CompressionMethod::Deflated))?;
    zip.write_all(assets.manifest.as_bytes())?;

    zip.start_file("styles.xml", entry_options(CompressionMethod::Deflated))?;
    zip.write_all(assets.styles.as_bytes())?;

    zip.start_file("content.xml", entry_options(CompressionMethod::Deflated))?;
    zip.write_all(content.as_bytes())?;

    zip.finish()?.flush()?;

    info!(path = %path.display(), content_bytes = content.len(), "ODT document written");
    Ok(())
}

fn entry_options(method: CompressionMethod) -> SimpleFileOptions {
    SimpleFileOptions::default().compression_method(method)
}
