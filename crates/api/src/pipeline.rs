//! Blueprint import and conversion pipeline.
//!
//! An import stores the uploaded artifact, creates the map row, and (for
//! convertible formats) runs the external converter. A converter failure is
//! recorded on the map (`failed` status plus notes) rather than failing the
//! import request; the uploaded source stays addressable so the conversion
//! can be re-dispatched.

use planview_core::convert::ConverterCommand;
use planview_core::error::CoreError;
use planview_core::intake::{
    self, BlueprintFormat, BASE_LAYER_KEY, RENDER_PATH_PREFIX, STATUS_COMPLETED, STATUS_FAILED,
    STATUS_QUEUED, UPLOAD_PATH_PREFIX,
};
use planview_core::types::DbId;
use planview_db::models::layer::CreateLayer;
use planview_db::models::map::{CreateMap, Map};
use planview_db::repositories::{LayerRepo, MapRepo, SiteRepo};
use std::time::Duration;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// A blueprint upload as received from the multipart request.
#[derive(Debug)]
pub struct BlueprintUpload {
    pub filename: String,
    pub display_name: Option<String>,
    pub bytes: Vec<u8>,
}

/// Validate an upload, store the artifact, create the map, and run the
/// conversion for convertible formats.
///
/// SVG uploads are renderable as-is: the map comes back `completed` with its
/// base layer provisioned. DXF/DFX uploads enter `queued` and are converted
/// synchronously; the returned map carries the outcome either way.
pub async fn submit_blueprint(
    state: &AppState,
    site_id: DbId,
    upload: BlueprintUpload,
) -> AppResult<Map> {
    SiteRepo::find_by_id(&state.pool, site_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Site",
            id: site_id,
        }))?;

    let format = intake::classify_upload(&upload.filename, upload.bytes.len() as u64)?;
    // classify_upload already rejected extension-less names.
    let ext = intake::file_extension(&upload.filename)
        .ok_or_else(|| CoreError::Internal("classified upload lost its extension".into()))?;

    let stem = Uuid::now_v7().simple().to_string();
    let upload_rel = format!("{UPLOAD_PATH_PREFIX}/{stem}.{ext}");
    state.store.write(&upload_rel, &upload.bytes).await?;

    let name = intake::derive_map_name(upload.display_name.as_deref(), &upload.filename);
    let slug = format!("{}-{}", slugify(&name), &stem[..8]);
    let canvas_config = serde_json::json!({ "width": 1920, "height": 1080 });

    match format {
        BlueprintFormat::Direct => {
            let map = MapRepo::create(
                &state.pool,
                &CreateMap {
                    site_id,
                    name,
                    slug,
                    floor_label: None,
                    sequence: None,
                    canvas_config: Some(canvas_config),
                    svg_asset_path: upload_rel.clone(),
                    source_dxf_path: None,
                    conversion_status: STATUS_COMPLETED.to_string(),
                    conversion_notes: Some("Imported SVG directly".to_string()),
                    is_active: true,
                },
            )
            .await?;
            provision_base_layer(state, map.id, &upload_rel).await?;
            tracing::info!(map_id = map.id, "Imported SVG blueprint directly");
            Ok(map)
        }
        BlueprintFormat::Convertible => {
            let map = MapRepo::create(
                &state.pool,
                &CreateMap {
                    site_id,
                    name,
                    slug,
                    floor_label: None,
                    sequence: None,
                    canvas_config: Some(canvas_config),
                    svg_asset_path: String::new(),
                    source_dxf_path: Some(upload_rel),
                    conversion_status: STATUS_QUEUED.to_string(),
                    conversion_notes: None,
                    is_active: false,
                },
            )
            .await?;
            tracing::info!(map_id = map.id, "Queued blueprint for conversion");
            convert_map(state, map.id).await
        }
    }
}

/// Run the external converter for a map's stored source blueprint.
///
/// Works against the latest persisted row: a map with no source artifact is
/// a no-op, and a subprocess failure or timeout lands as `failed` status and
/// notes on the map rather than an error. Only infrastructure problems
/// (database, misconfigured command) surface as errors.
pub async fn convert_map(state: &AppState, map_id: DbId) -> AppResult<Map> {
    let map = MapRepo::find_by_id(&state.pool, map_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Map",
            id: map_id,
        }))?;

    let Some(source_rel) = map.source_dxf_path.clone() else {
        tracing::debug!(map_id, "No source blueprint; skipping conversion");
        return Ok(map);
    };

    let command = ConverterCommand::parse(&state.config.converter_command)
        .map_err(|e| CoreError::Internal(format!("invalid converter command: {e}")))?;

    let stem = file_stem(&source_rel);
    let dest_rel = format!("{RENDER_PATH_PREFIX}/{stem}.svg");
    let timeout = Duration::from_secs(state.config.conversion_timeout_secs);

    // The converter only writes the file; the directory is ours to make.
    state.store.prepare_parent(&dest_rel).await?;

    let outcome = command
        .run(
            &state.store.absolute_path(&source_rel),
            &state.store.absolute_path(&dest_rel),
            timeout,
        )
        .await;

    if let Err(e) = outcome {
        tracing::warn!(map_id, error = %e, "Blueprint conversion failed");
        return MapRepo::record_conversion_failure(&state.pool, map_id, &e.to_string())
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "Map",
                id: map_id,
            }));
    }

    // Best-effort mirror of the rendered svg next to the uploaded source.
    let mirror_rel = format!("{UPLOAD_PATH_PREFIX}/{stem}.svg");
    let notes = match state.store.copy(&dest_rel, &mirror_rel).await {
        Ok(()) => format!("SVG mirror saved to {}", state.store.url(&mirror_rel)),
        Err(e) => {
            tracing::warn!(map_id, error = %e, "Could not mirror rendered svg");
            "SVG mirror could not be saved".to_string()
        }
    };

    let map = MapRepo::record_conversion_success(&state.pool, map_id, &dest_rel, Some(&notes))
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Map",
            id: map_id,
        }))?;

    provision_base_layer(state, map_id, &dest_rel).await?;
    tracing::info!(map_id, "Blueprint conversion completed");
    Ok(map)
}

/// Explicit retry: re-enter `queued` and run the converter again.
///
/// Unlike the import path, a conversion that still fails here surfaces to
/// the caller (after being recorded on the map) since the conversion is the
/// whole point of the request.
pub async fn redispatch(state: &AppState, map_id: DbId) -> AppResult<Map> {
    let map = MapRepo::find_by_id(&state.pool, map_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Map",
            id: map_id,
        }))?;

    if map.source_dxf_path.is_none() {
        return Err(AppError::Core(CoreError::Validation(
            "map has no source blueprint to convert".into(),
        )));
    }

    MapRepo::requeue(&state.pool, map_id).await?;
    let map = convert_map(state, map_id).await?;
    if map.conversion_status == STATUS_FAILED {
        let detail = map
            .conversion_notes
            .clone()
            .unwrap_or_else(|| "converter failed".to_string());
        return Err(AppError::Core(CoreError::Conversion(detail)));
    }
    Ok(map)
}

/// Create or re-point the reserved base floor-plan layer. Idempotent: a
/// repeated conversion updates the existing layer's data source in place.
async fn provision_base_layer(state: &AppState, map_id: DbId, svg_rel: &str) -> AppResult<()> {
    let data_source = serde_json::json!({
        "svg_path": state.store.url(svg_rel),
        "type": "svg_overlay",
    });

    if let Some(existing) = LayerRepo::find_by_key(&state.pool, map_id, BASE_LAYER_KEY).await? {
        LayerRepo::update_data_source(&state.pool, existing.id, &data_source).await?;
        return Ok(());
    }

    LayerRepo::create(
        &state.pool,
        map_id,
        &CreateLayer {
            key: BASE_LAYER_KEY.to_string(),
            display_name: "Floor Plan".to_string(),
            layer_type: "base".to_string(),
            parent_layer_id: None,
            element_types: None,
            related_layers: None,
            z_index: Some(0),
            default_visible: Some(true),
            style_preset: Some(serde_json::json!({
                "group_label": "Base Layers",
                "description": "Converted facility floor plan",
                "opacity": 1,
            })),
            data_source: Some(data_source),
        },
    )
    .await?;
    Ok(())
}

/// Lowercase, hyphen-separated slug from a display name.
fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_dash = true;
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
            last_dash = false;
        } else if !last_dash {
            slug.push('-');
            last_dash = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    if slug.is_empty() {
        "map".to_string()
    } else {
        slug
    }
}

/// File stem of a relative storage path (`maps/uploads/abc.dxf` → `abc`).
fn file_stem(relative: &str) -> String {
    let name = relative.rsplit('/').next().unwrap_or(relative);
    match name.rfind('.') {
        Some(pos) if pos > 0 => name[..pos].to_string(),
        _ => name.to_string(),
    }
}
