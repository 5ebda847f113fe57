//! Shared test utilities for core module tests
//!
//! Provides common test fixtures to avoid duplication across test suites.
//! This module is only compiled in test mode.

use crate::core::layers::{Layer, Page};
use serde_json::json;

/// Builds a small stamped page:
///
/// ```text
/// background
/// header
/// ├── headline
/// └── brand
///     └── logo
/// ```
pub fn sample_page() -> Page {
    let mut page = Page::new(vec![
        Layer::new("background"),
        Layer::group(
            "header",
            vec![
                Layer::new("headline"),
                Layer::group("brand", vec![Layer::new("logo")]),
            ],
        ),
    ]);
    page.props.insert("name".to_string(), json!("Poster"));
    page.props.insert("width".to_string(), json!(1080));
    stamp_all(&mut page.layers, "stale");
    page
}

fn stamp_all(layers: &mut [Layer], marker: &str) {
    for layer in layers {
        layer.dirty = marker.to_string();
        if let Some(children) = layer.children.as_mut() {
            stamp_all(children, marker);
        }
    }
}

/// Dirty markers in depth-first order
pub fn all_dirty_markers(layers: &[Layer]) -> Vec<String> {
    let mut out = Vec::new();
    for layer in layers {
        out.push(layer.dirty.clone());
        out.extend(all_dirty_markers(layer.children()));
    }
    out
}
