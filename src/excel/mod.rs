//! Módulo `excel`: el colaborador que obtiene la hoja de horarios.
//!
//! Submódulos:
//! - `io`: helpers de conversión (valores de calamine, referencias A1, colores ARGB)
//! - `xlsx`: lectura de libros `.xlsx` (valores + colores de relleno + merges)
//! - `sheets_api`: lectura del volcado JSON de la API de Google Sheets
//! - `cache`: caché en memoria del resultado de la lectura

/// Helpers de IO y utilidades para parsing de Excel
pub mod io;

/// Lectura de `.xlsx`: `read_xlsx`
pub mod xlsx;

/// Lectura de grid-data JSON: `read_grid_json`, `parse_grid_json`
pub mod sheets_api;

/// Caché de lecturas: `get_spreadsheet_cached`
pub mod cache;

pub use cache::{cache_stats, clear_cache, get_spreadsheet_cached};
pub use sheets_api::{parse_grid_json, read_grid_json};
pub use xlsx::read_xlsx;

use log::{debug, info};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::Settings;
use crate::error::SourceError;
use crate::models::Spreadsheet;

/// Resuelve la ruta del origen del horario.
/// - Si `source` es un path existente, se devuelve directamente.
/// - Si no, se prueba en `TIMETABLE_DATA_DIR`, `./datafiles` y `./data`, en ese orden.
pub fn resolve_source_path(settings: &Settings) -> Result<PathBuf, SourceError> {
    let source = settings.source.as_deref().ok_or(SourceError::NotConfigured)?;
    let direct = Path::new(source);
    if direct.is_file() {
        return Ok(direct.to_path_buf());
    }

    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let mut candidates: Vec<PathBuf> = Vec::new();
    if let Some(dir) = settings.data_dir.as_deref() {
        candidates.push(Path::new(dir).join(source));
    }
    candidates.push(cwd.join("datafiles").join(source));
    candidates.push(cwd.join("data").join(source));

    for candidate in candidates {
        if candidate.is_file() {
            debug!("timetable source resolved to {}", candidate.display());
            return Ok(candidate);
        }
    }

    Err(SourceError::NotFound(source.to_string()))
}

/// Lee la hoja completa según la extensión del archivo.
pub fn load_spreadsheet(path: &Path) -> Result<Spreadsheet, SourceError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    let book = match ext.as_str() {
        "json" => read_grid_json(path)?,
        "xlsx" | "xlsm" => read_xlsx(path)?,
        _ => {
            return Err(SourceError::UnsupportedFormat {
                path: path.to_path_buf(),
            })
        }
    };

    info!(
        "loaded {} ({} sheets, {} weekday sheets)",
        path.display(),
        book.sheets.len(),
        book.weekday_sheets().count()
    );
    Ok(book)
}

/// Obtiene la hoja configurada, usando el caché si está habilitado.
pub fn fetch_spreadsheet(settings: &Settings) -> Result<Arc<Spreadsheet>, SourceError> {
    let path = resolve_source_path(settings)?;
    if settings.cache_enabled {
        get_spreadsheet_cached(&path)
    } else {
        load_spreadsheet(&path).map(Arc::new)
    }
}
