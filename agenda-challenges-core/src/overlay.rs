//! Stamp converted challenge pages onto the base agenda page.
//!
//! The first page of the base PDF and every page of the overlay PDF are
//! wrapped as Form XObjects. Each output page draws the base form and then one
//! overlay form on top, so the base content is shared rather than copied per
//! page.

use std::path::Path;

use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};
use tracing::{debug, error, info};

use crate::error::OverlayError;

const BASE_FORM: &str = "AgendaBase";
const OVERLAY_FORM: &str = "AgendaOverlay";

/// Page-tree nesting deeper than this is treated as malformed.
const MAX_TREE_DEPTH: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayReport {
    pub pages: usize,
}

/// Writes to `output` one page per page of `overlay`, each a copy of the
/// first page of `base` with the overlay page drawn on top.
pub fn overlay_pages<P, Q, R>(base: P, overlay: Q, output: R) -> Result<OverlayReport, OverlayError>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
    R: AsRef<Path>,
{
    let (base_path, overlay_path, output_path) = (base.as_ref(), overlay.as_ref(), output.as_ref());
    info!(
        base = %base_path.display(),
        overlay = %overlay_path.display(),
        output = %output_path.display(),
        "Overlaying challenge pages onto base PDF"
    );

    let mut doc = Document::load(base_path).map_err(|e| {
        error!(error = ?e, path = %base_path.display(), "Failed to load base PDF");
        e
    })?;
    let mut overlay_doc = Document::load(overlay_path).map_err(|e| {
        error!(error = ?e, path = %overlay_path.display(), "Failed to load overlay PDF");
        e
    })?;

    let base_page = doc
        .get_pages()
        .values()
        .next()
        .copied()
        .ok_or_else(|| OverlayError::NoPages(base_path.to_path_buf()))?;
    let media_box = inherited(&doc, base_page, b"MediaBox").ok_or(OverlayError::MissingMediaBox)?;
    let base_form = page_to_form(&mut doc, base_page, &media_box)?;
    let pages_id = page_tree_root(&doc)?;

    // Move the overlay objects past the base ids before merging the documents.
    overlay_doc.renumber_objects_with(doc.max_id + 1);
    let overlay_page_ids: Vec<ObjectId> = overlay_doc.get_pages().values().copied().collect();
    if overlay_page_ids.is_empty() {
        return Err(OverlayError::NoPages(overlay_path.to_path_buf()));
    }
    let mut overlay_forms = Vec::with_capacity(overlay_page_ids.len());
    for page_id in overlay_page_ids {
        let bbox = inherited(&overlay_doc, page_id, b"MediaBox").unwrap_or_else(|| media_box.clone());
        overlay_forms.push(page_to_form(&mut overlay_doc, page_id, &bbox)?);
    }
    doc.max_id = doc.max_id.max(overlay_doc.max_id);
    doc.objects.extend(overlay_doc.objects);

    let total = overlay_forms.len();
    let mut kids = Vec::with_capacity(total);
    for (n, form) in overlay_forms.into_iter().enumerate() {
        let content = format!("q\n/{BASE_FORM} Do\nQ\nq\n/{OVERLAY_FORM} Do\nQ\n");
        let content_id = doc.add_object(Stream::new(Dictionary::new(), content.into_bytes()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => media_box.clone(),
            "Resources" => dictionary! {
                "XObject" => dictionary! {
                    BASE_FORM => base_form,
                    OVERLAY_FORM => form,
                },
            },
            "Contents" => content_id,
        });
        kids.push(Object::Reference(page_id));
        debug!(page = n + 1, total, "Merged overlay page");
    }

    {
        let pages = doc.get_object_mut(pages_id)?.as_dict_mut()?;
        pages.set("Kids", kids);
        pages.set("Count", total as i64);
    }

    let pruned = doc.prune_objects();
    debug!(pruned = pruned.len(), "Pruned unreferenced objects");

    doc.save(output_path).map_err(|e| {
        error!(error = ?e, path = %output_path.display(), "Failed to write output PDF");
        e
    })?;

    info!(pages = total, output = %output_path.display(), "Output PDF written");
    Ok(OverlayReport { pages: total })
}

/// Wraps a page's content and resources into a Form XObject.
fn page_to_form(doc: &mut Document, page_id: ObjectId, bbox: &Object) -> Result<ObjectId, OverlayError> {
    let content = doc.get_page_content(page_id)?;
    let mut form = dictionary! {
        "Type" => "XObject",
        "Subtype" => "Form",
        "FormType" => 1,
        "BBox" => bbox.clone(),
    };
    if let Some(resources) = inherited(doc, page_id, b"Resources") {
        form.set("Resources", resources);
    }
    Ok(doc.add_object(Stream::new(form, content)))
}

/// Looks `key` up on the page, then up its `Parent` chain.
fn inherited(doc: &Document, page_id: ObjectId, key: &[u8]) -> Option<Object> {
    let mut node = doc.get_object(page_id).and_then(Object::as_dict).ok();
    for _ in 0..MAX_TREE_DEPTH {
        let dict = node?;
        if let Ok(value) = dict.get(key) {
            return Some(value.clone());
        }
        node = dict
            .get(b"Parent")
            .and_then(Object::as_reference)
            .and_then(|parent| doc.get_object(parent))
            .and_then(Object::as_dict)
            .ok();
    }
    None
}

fn page_tree_root(doc: &Document) -> Result<ObjectId, OverlayError> {
    doc.trailer
        .get(b"Root")
        .and_then(Object::as_reference)
        .and_then(|root| doc.get_object(root))
        .and_then(Object::as_dict)
        .and_then(|catalog| catalog.get(b"Pages"))
        .and_then(Object::as_reference)
        .map_err(|_| OverlayError::Malformed("catalog has no page tree".into()))
}
