//! Mapping editor element ids to rendered elements
//!
//! Rendered elements carry a `data-elementid` attribute holding the editor
//! element id. Lookups go through [`ElementIndex`], so the same selection code
//! works against a real document or an in-memory map.

use std::collections::HashMap;
use tracing::debug;

/// Attribute linking a rendered element to its editor element
pub const ELEMENT_ID_ATTR: &str = "data-elementid";

/// Attribute selector matching the element rendered for `id`
pub fn element_selector(id: &str) -> String {
    let escaped = id.replace('\\', "\\\\").replace('"', "\\\"");
    format!("[{ELEMENT_ID_ATTR}=\"{escaped}\"]")
}

/// Something that can find the rendered element for an editor element id
pub trait ElementIndex {
    type Handle;

    fn query(&self, element_id: &str) -> Option<Self::Handle>;
}

impl<H: Clone> ElementIndex for HashMap<String, H> {
    type Handle = H;

    fn query(&self, element_id: &str) -> Option<H> {
        self.get(element_id).cloned()
    }
}

/// Resolves `ids` to element handles in input order, skipping ids with no element.
pub fn targets_by_ids<I, S>(index: &I, ids: &[S]) -> Vec<I::Handle>
where
    I: ElementIndex,
    S: AsRef<str>,
{
    ids.iter()
        .filter_map(|id| {
            let id = id.as_ref();
            let handle = index.query(id);
            if handle.is_none() {
                debug!(id, "No rendered element for id");
            }
            handle
        })
        .collect()
}

/// Editor objects identified by an element id
pub trait Identified {
    fn element_id(&self) -> &str;
}

impl Identified for crate::core::layers::Layer {
    fn element_id(&self) -> &str {
        &self.id
    }
}

/// Ids of a selection. A single target is passed as a one-element slice.
pub fn ids_of<T: Identified>(targets: &[T]) -> Vec<String> {
    targets.iter().map(|t| t.element_id().to_string()).collect()
}
