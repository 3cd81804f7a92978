//! Shared fixtures for repository integration tests.

use planview_db::models::layer::CreateLayer;
use planview_db::models::map::CreateMap;
use planview_db::models::site::CreateSite;
use planview_db::models::viewport::CreateViewport;

pub fn new_site(name: &str, slug: &str) -> CreateSite {
    CreateSite {
        name: name.to_string(),
        slug: slug.to_string(),
        timezone: None,
        metadata: None,
    }
}

pub fn new_map(site_id: i64, name: &str, slug: &str) -> CreateMap {
    CreateMap {
        site_id,
        name: name.to_string(),
        slug: slug.to_string(),
        floor_label: None,
        sequence: None,
        canvas_config: None,
        svg_asset_path: String::new(),
        source_dxf_path: None,
        conversion_status: "queued".to_string(),
        conversion_notes: None,
        is_active: false,
    }
}

pub fn new_layer(key: &str, display_name: &str) -> CreateLayer {
    CreateLayer {
        parent_layer_id: None,
        key: key.to_string(),
        display_name: display_name.to_string(),
        layer_type: "overlay".to_string(),
        element_types: None,
        related_layers: None,
        z_index: None,
        default_visible: None,
        style_preset: None,
        data_source: None,
    }
}

pub fn new_viewport(name: &str, slug: &str, is_root: bool) -> CreateViewport {
    CreateViewport {
        name: name.to_string(),
        slug: slug.to_string(),
        is_root: Some(is_root),
        bounds: serde_json::json!({"x": 0, "y": 0, "width": 800, "height": 600}),
        default_zoom: None,
        default_pan: None,
        layer_overrides: None,
        refresh_interval: None,
        notes: None,
    }
}
