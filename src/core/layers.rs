//! Page and layer tree data structures
//!
//! This module defines the parts of the editor document schema the helpers
//! operate on, and the two tree operations over it:
//!
//! - Cloning a page with fresh dirty markers ([`clone_data`], [`clone_json`])
//! - Locating a layer's parent by id ([`find_parent_by_id`])
//!
//! # Schema
//!
//! Only `id`, `childs` and `_dirty` are interpreted. Every other field of a
//! layer or page is kept verbatim in `props`, so documents produced by the
//! editor survive a decode/encode cycle unchanged, with two normalizations:
//!
//! - `"childs": null` decodes as a leaf and is omitted when encoded, the same
//!   as a missing `childs`.
//! - A `_dirty` marker that is not a string decodes as an empty marker.
//!
//! # Example
//!
//! ```
//! use designkit::core::layers::{clone_data, find_parent_by_id, Layer, Page, ParentLookup};
//!
//! let page = Page::new(vec![Layer::group("frame", vec![Layer::new("title")])]);
//! let copy = clone_data(&page);
//!
//! assert_eq!(copy.layers[0].id, "frame");
//! assert_ne!(copy.layers[0].dirty, page.layers[0].dirty);
//! assert!(matches!(
//!     find_parent_by_id(&copy.layers, "title"),
//!     ParentLookup::Parent(parent) if parent.id == "frame"
//! ));
//! ```

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use tracing::error;

use crate::core::error::Result;
use crate::core::ids::{DEFAULT_RANDOM_DIGITS, random_id};

/// A node of the layer tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub id: String,
    /// Child layers; present only on group-like layers
    #[serde(rename = "childs", default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Layer>>,
    /// Change-detection stamp read by the renderer
    #[serde(rename = "_dirty", default, deserialize_with = "lenient_marker")]
    pub dirty: String,
    /// Remaining schema fields, untouched
    #[serde(flatten)]
    pub props: Map<String, Value>,
}

/// Markers are replaced on every clone, so a malformed one is not an error
fn lenient_marker<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(marker) => marker,
        _ => String::new(),
    })
}

impl Layer {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            children: None,
            dirty: String::new(),
            props: Map::new(),
        }
    }

    pub fn group(id: impl Into<String>, children: Vec<Layer>) -> Self {
        Self {
            children: Some(children),
            ..Self::new(id)
        }
    }

    /// Returns the children, or an empty slice for leaf layers
    pub fn children(&self) -> &[Layer] {
        self.children.as_deref().unwrap_or_default()
    }
}

/// A page of the document: an ordered list of root layers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Page {
    #[serde(default)]
    pub layers: Vec<Layer>,
    #[serde(flatten)]
    pub props: Map<String, Value>,
}

impl Page {
    pub fn new(layers: Vec<Layer>) -> Self {
        Self {
            layers,
            props: Map::new(),
        }
    }

    /// Number of layers in the whole tree
    pub fn layer_count(&self) -> usize {
        fn count(layers: &[Layer]) -> usize {
            layers.iter().map(|l| 1 + count(l.children())).sum()
        }
        count(&self.layers)
    }
}

/// Deep-copies a page and stamps every layer with a fresh dirty marker.
///
/// The source page is not modified.
pub fn clone_data(page: &Page) -> Page {
    let mut copy = page.clone();
    restamp(&mut copy.layers);
    copy
}

/// Decodes an untyped page document and clones it like [`clone_data`].
///
/// Fails with [`Error::Serialization`](crate::Error::Serialization) when `value`
/// is not page-shaped (missing layer ids, `childs` not an array, ...).
pub fn clone_json(value: &Value) -> Result<Page> {
    let mut page = Page::deserialize(value).map_err(|e| {
        error!("Cannot clone page document: {e}");
        e
    })?;
    restamp(&mut page.layers);
    Ok(page)
}

fn restamp(layers: &mut [Layer]) {
    for layer in layers {
        layer.dirty = random_id(DEFAULT_RANDOM_DIGITS);
        if let Some(children) = layer.children.as_mut() {
            restamp(children);
        }
    }
}

/// Where a layer sits relative to the searched forest
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParentLookup<'a> {
    /// No layer with the id exists
    NotFound,
    /// The layer is one of the roots; it has no parent
    Root,
    /// The immediate parent of the layer
    Parent(&'a Layer),
}

/// Finds the parent of the layer with `id`.
///
/// Depth-first: each layer's subtree is searched before its own id is checked.
/// Full rescan on every call.
pub fn find_parent_by_id<'a>(layers: &'a [Layer], id: &str) -> ParentLookup<'a> {
    for layer in layers {
        match find_parent_by_id(layer.children(), id) {
            ParentLookup::Root => return ParentLookup::Parent(layer),
            found @ ParentLookup::Parent(_) => return found,
            ParentLookup::NotFound => {}
        }

        if layer.id == id {
            return ParentLookup::Root;
        }
    }
    ParentLookup::NotFound
}

/// Finds the layer with `id` anywhere in the forest.
pub fn find_layer<'a>(layers: &'a [Layer], id: &str) -> Option<&'a Layer> {
    layers.iter().find_map(|layer| {
        if layer.id == id {
            Some(layer)
        } else {
            find_layer(layer.children(), id)
        }
    })
}
