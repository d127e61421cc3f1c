//! Caché simple en memoria para lecturas costosas del origen del horario
//!
//! Proporciona get_spreadsheet_cached(path) -> Arc<Spreadsheet> que devuelve la
//! hoja ya leída mientras el archivo no cambie en disco.

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, OnceLock};
use std::time::SystemTime;

use log::debug;

use crate::error::SourceError;
use crate::models::Spreadsheet;

struct CacheEntry {
    modified: Option<SystemTime>,
    book: Arc<Spreadsheet>,
}

// Caché global: ruta resuelta -> hoja leída
static SHEET_CACHE: OnceLock<Mutex<HashMap<String, CacheEntry>>> = OnceLock::new();
static CACHE_HITS: AtomicUsize = AtomicUsize::new(0);
static CACHE_MISSES: AtomicUsize = AtomicUsize::new(0);

fn cache() -> &'static Mutex<HashMap<String, CacheEntry>> {
    SHEET_CACHE.get_or_init(|| Mutex::new(HashMap::new()))
}

/// Devuelve la hoja del origen indicado usando el caché en memoria si la
/// fecha de modificación del archivo no cambió; en otro caso la lee de nuevo.
///
/// Sólo se cachea el resultado de la lectura (inmutable, compartido vía `Arc`);
/// el mapa de colores y el catálogo se derivan en cada consulta.
pub fn get_spreadsheet_cached(path: &Path) -> Result<Arc<Spreadsheet>, SourceError> {
    let key = path.to_string_lossy().to_string();
    let modified = std::fs::metadata(path).and_then(|m| m.modified()).ok();

    {
        let guard = cache().lock().unwrap_or_else(|e| e.into_inner());
        if let Some(entry) = guard.get(&key) {
            if entry.modified == modified {
                CACHE_HITS.fetch_add(1, Ordering::Relaxed);
                return Ok(Arc::clone(&entry.book));
            }
        }
    }

    CACHE_MISSES.fetch_add(1, Ordering::Relaxed);
    debug!("timetable cache miss for {}", key);
    let book = Arc::new(crate::excel::load_spreadsheet(path)?);

    let mut guard = cache().lock().unwrap_or_else(|e| e.into_inner());
    guard.insert(
        key,
        CacheEntry {
            modified,
            book: Arc::clone(&book),
        },
    );
    Ok(book)
}

/// (hits, misses, entradas)
pub fn cache_stats() -> (usize, usize, usize) {
    let entries = cache().lock().map(|g| g.len()).unwrap_or(0);
    (
        CACHE_HITS.load(Ordering::Relaxed),
        CACHE_MISSES.load(Ordering::Relaxed),
        entries,
    )
}

pub fn clear_cache() {
    cache().lock().unwrap_or_else(|e| e.into_inner()).clear();
}
