//! Upload intake validation for blueprint imports.
//!
//! Pure functions and constants only (no I/O). Classifies an uploaded
//! blueprint by extension, enforces the size cap, and owns the conversion
//! status and storage-path constants shared by the pipeline and the
//! repositories.

use crate::error::CoreError;

// ── Constants ────────────────────────────────────────────────────────

/// Maximum accepted blueprint upload size (50 MB).
pub const MAX_UPLOAD_BYTES: u64 = 50 * 1024 * 1024;

/// Extensions that require conversion through the external converter.
pub const CONVERTIBLE_EXTENSIONS: &[&str] = &["dxf", "dfx"];

/// Extensions already in the renderable vector format; stored as-is.
pub const DIRECT_EXTENSIONS: &[&str] = &["svg"];

/// Storage prefix for uploaded source blueprints.
pub const UPLOAD_PATH_PREFIX: &str = "maps/uploads";

/// Storage prefix for rendered assets.
pub const RENDER_PATH_PREFIX: &str = "maps/renders";

/// Reserved key for the auto-provisioned base floor-plan layer.
pub const BASE_LAYER_KEY: &str = "floor-plan";

// ── Conversion status names ──────────────────────────────────────────

pub const STATUS_QUEUED: &str = "queued";
pub const STATUS_COMPLETED: &str = "completed";
pub const STATUS_FAILED: &str = "failed";

// ── Types ────────────────────────────────────────────────────────────

/// How an uploaded blueprint will be turned into a renderable asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlueprintFormat {
    /// Needs the external converter (dxf/dfx).
    Convertible,
    /// Already renderable (svg); stored directly.
    Direct,
}

// ── Pure functions ───────────────────────────────────────────────────

/// Lowercase extension of a file name, without the dot.
pub fn file_extension(filename: &str) -> Option<String> {
    let name = filename.rsplit('/').next().unwrap_or(filename);
    match name.rfind('.') {
        Some(pos) if pos > 0 && pos + 1 < name.len() => {
            Some(name[pos + 1..].to_ascii_lowercase())
        }
        _ => None,
    }
}

/// Validate an uploaded blueprint and classify its format.
///
/// Rejects empty, oversized, or unrecognized uploads with a field-scoped
/// `Validation` error before anything touches storage.
pub fn classify_upload(filename: &str, size_bytes: u64) -> Result<BlueprintFormat, CoreError> {
    if size_bytes == 0 {
        return Err(CoreError::Validation(
            "blueprint: uploaded file is empty".into(),
        ));
    }
    if size_bytes > MAX_UPLOAD_BYTES {
        return Err(CoreError::Validation(format!(
            "blueprint: file exceeds the {} MB limit",
            MAX_UPLOAD_BYTES / (1024 * 1024)
        )));
    }

    let ext = file_extension(filename).ok_or_else(|| {
        CoreError::Validation("blueprint: file has no recognizable extension".into())
    })?;

    if CONVERTIBLE_EXTENSIONS.contains(&ext.as_str()) {
        Ok(BlueprintFormat::Convertible)
    } else if DIRECT_EXTENSIONS.contains(&ext.as_str()) {
        Ok(BlueprintFormat::Direct)
    } else {
        Err(CoreError::Validation(
            "blueprint: the file must be a DXF, DFX, or SVG file".into(),
        ))
    }
}

/// Display name for an imported map: the explicit name if given, else the
/// uploaded file name, else a generic fallback.
pub fn derive_map_name(display_name: Option<&str>, filename: &str) -> String {
    match display_name {
        Some(name) if !name.trim().is_empty() => name.trim().to_string(),
        _ if !filename.trim().is_empty() => filename.trim().to_string(),
        _ => "Imported Blueprint".to_string(),
    }
}

// ── Tests ────────────────────────────────────────────────────────────
