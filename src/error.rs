use std::path::PathBuf;
use thiserror::Error;

/// Fallos de configuración o de lectura del origen del horario.
///
/// El motor de extracción nunca produce estos errores: asume que la hoja ya
/// fue obtenida. Las condiciones de "no encontrado" son valores
/// (`algorithm::TimetableReport`), no errores.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("timetable source is not configured (set TIMETABLE_SOURCE)")]
    NotConfigured,

    #[error("timetable source '{0}' not found")]
    NotFound(String),

    #[error("unsupported timetable source '{}': expected .xlsx or .json", path.display())]
    UnsupportedFormat { path: PathBuf },

    #[error("failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid grid-data JSON in '{}': {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to open workbook '{}': {message}", path.display())]
    Workbook { path: PathBuf, message: String },
}
