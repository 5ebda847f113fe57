//! Integration tests for designkit
//!
//! These tests exercise the public API end to end: decoding an editor page,
//! cloning it, locating layers, merging property updates and loading fonts
//! from an asset directory.
//!
//! ```bash
//! cargo test --test integration_tests
//! ```

use designkit::config::EditorConfig;
use designkit::core::layers::{clone_json, find_layer};
use designkit::core::merge::copy_object_values;
use designkit::elements::{ids_of, targets_by_ids};
use designkit::fonts::{AssetFontSet, FontError, FontRegistry, FontState, LoadOutcome};
use designkit::utils::{resolve_url, round_trip, to_num};
use designkit::{
    Layer, Page, ParentLookup, Size, calc_size_and_position, clone_data, find_parent_by_id,
};
use serde_json::json;
use std::collections::HashMap;

/// A page as the editor stores it
fn editor_page() -> serde_json::Value {
    json!({
        "name": "Spring sale",
        "width": 1242,
        "height": 2208,
        "layers": [
            {"id": "bg", "type": "image", "url": "/img/bg.jpg", "_dirty": "s1"},
            {
                "id": "card",
                "type": "group",
                "_dirty": "s2",
                "childs": [
                    {"id": "title", "type": "text", "text": "Sale", "style": {"fontFamily": "Inter", "fontSize": 48}},
                    {
                        "id": "badge",
                        "type": "group",
                        "childs": [{"id": "badge-text", "type": "text", "text": "-30%"}]
                    }
                ]
            }
        ]
    })
}

#[test]
fn test_clone_decoded_page_and_search_it() {
    let page = clone_json(&editor_page()).unwrap();

    assert_eq!(page.layer_count(), 5);
    assert_eq!(page.props["name"], "Spring sale");
    assert_ne!(page.layers[0].dirty, "s1");

    assert!(matches!(
        find_parent_by_id(&page.layers, "badge-text"),
        ParentLookup::Parent(parent) if parent.id == "badge"
    ));
    assert!(matches!(
        find_parent_by_id(&page.layers, "title"),
        ParentLookup::Parent(parent) if parent.id == "card"
    ));
    assert_eq!(find_parent_by_id(&page.layers, "card"), ParentLookup::Root);
    assert_eq!(find_parent_by_id(&page.layers, "ghost"), ParentLookup::NotFound);
}

#[test]
fn test_clone_round_trips_to_same_document_apart_from_markers() {
    let original = editor_page();
    let page: Page = serde_json::from_value(original.clone()).unwrap();
    let copy = clone_data(&page);

    let mut encoded = serde_json::to_value(&copy).unwrap();
    encoded["layers"][0]["_dirty"] = json!("s1");
    encoded["layers"][1]["_dirty"] = json!("s2");
    // Layers that had no marker before
    for pointer in [
        "/layers/1/childs/0",
        "/layers/1/childs/1",
        "/layers/1/childs/1/childs/0",
    ] {
        let layer = encoded.pointer_mut(pointer).unwrap();
        layer.as_object_mut().unwrap().remove("_dirty");
    }

    assert_eq!(encoded, original);
}

#[test]
fn test_style_update_merges_into_clone_only() {
    let source = clone_json(&editor_page()).unwrap();
    let mut copy = clone_data(&source);

    let update = json!({"style": {"fontSize": 64, "shadow": {"blur": 4}}, "tags": ["promo"]});
    let title = copy.layers[1].children.as_mut().unwrap().first_mut().unwrap();
    copy_object_values(update.as_object().unwrap(), &mut title.props);

    let title = find_layer(&copy.layers, "title").unwrap();
    assert_eq!(
        title.props["style"],
        json!({"fontFamily": "Inter", "fontSize": 64, "shadow": {"blur": 4}})
    );
    assert_eq!(title.props["tags"], json!(["promo"]));

    let original = find_layer(&source.layers, "title").unwrap();
    assert_eq!(original.props["style"]["fontSize"], 48);
}

#[test]
fn test_fit_background_image_into_page() {
    let fit = calc_size_and_position(Size::new(3000.0, 1500.0), Size::new(1000.0, 1000.0)).unwrap();
    assert_eq!((fit.width, fit.height), (1000.0, 500.0));
    assert_eq!((fit.x, fit.y), (500.0, 500.0));

    let small = calc_size_and_position(Size::new(100.0, 50.0), Size::new(200.0, 200.0)).unwrap();
    assert_eq!((small.width, small.height, small.x, small.y), (100.0, 50.0, 100.0, 100.0));
}

#[test]
fn test_selection_to_rendered_targets() {
    let selection = vec![Layer::new("title"), Layer::new("gone"), Layer::new("bg")];
    let rendered: HashMap<String, &str> =
        HashMap::from([("bg".to_string(), "<img>"), ("title".to_string(), "<p>")]);

    let ids = ids_of(&selection);
    assert_eq!(targets_by_ids(&rendered, &ids), vec!["<p>", "<img>"]);
}

#[test]
fn test_helpers_from_editor_toolbar() {
    assert_eq!(to_num(Some(12.345_678), Some(2)), 12.35);
    assert_eq!(to_num(None, Some(2)), 0.0);
    assert_eq!(
        resolve_url("/img/bg.jpg", "https://cdn.example.com"),
        "https://cdn.example.com/img/bg.jpg"
    );

    let page = clone_json(&editor_page()).unwrap();
    assert_eq!(round_trip(&page).unwrap(), page);
}

#[tokio::test]
async fn test_font_registry_against_asset_directory() {
    let dir = tempfile::tempdir().unwrap();
    let broken = dir.path().join("fonts/Broken");
    std::fs::create_dir_all(&broken).unwrap();
    std::fs::write(broken.join("font.ttf"), [0u8; 64]).unwrap();

    let config = EditorConfig {
        asset_root: dir.path().to_path_buf(),
        font_dir: "/fonts".to_string(),
        font_file: "font.ttf".to_string(),
        ..EditorConfig::default()
    };
    let registry = FontRegistry::from_config(AssetFontSet::new(&config.asset_root), &config);

    // Present but not a font
    let first = registry.load_font("Broken", None).await;
    assert_eq!(
        first,
        Err(FontError::Decode {
            url: "/fonts/Broken/font.ttf".to_string()
        })
    );
    assert!(matches!(registry.state("Broken"), FontState::Failed(_)));

    // Failures are not memoized: the next call tries again
    let second = registry.load_font("Broken", None).await;
    assert!(matches!(second, Err(FontError::Decode { .. })));

    // Missing family directory
    let missing = registry.load_font("Nope", None).await;
    assert!(matches!(missing, Err(FontError::Fetch { .. })));

    // Remote fonts need a different backend
    let remote = registry
        .load_font("Remote", Some("https://fonts.example.com/r.woff"))
        .await;
    assert!(matches!(remote, Err(FontError::Unsupported(_))));

    assert_eq!(registry.backend().face_count(), 0);
}

#[tokio::test]
async fn test_font_registry_loads_web_font_from_default_location() {
    let fixture = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/Tuffy.woff");
    let dir = tempfile::tempdir().unwrap();
    let config = EditorConfig {
        asset_root: dir.path().to_path_buf(),
        ..EditorConfig::default()
    };
    let registry = FontRegistry::from_config(AssetFontSet::new(&config.asset_root), &config);

    let url = registry.default_url("Tuffy");
    assert!(url.ends_with("/Tuffy/font.woff"));
    let path = dir.path().join(url.trim_start_matches('/'));
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::copy(fixture, &path).unwrap();

    let (first, second) = tokio::join!(
        registry.load_font("Tuffy", None),
        registry.load_font("Tuffy", None)
    );
    assert_eq!(first, Ok(LoadOutcome::Loaded));
    assert_eq!(second, Ok(LoadOutcome::Joined));
    assert_eq!(registry.state("Tuffy"), FontState::Loaded);
    assert!(registry.backend().contains("Tuffy"));
    assert!(registry.backend().face_count() > 0);
    assert_eq!(
        registry.load_font("Tuffy", None).await,
        Ok(LoadOutcome::AlreadyLoaded)
    );
}
