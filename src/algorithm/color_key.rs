// Mapa de colores de lote a partir de la banda de cabecera de cada hoja.
use log::{info, warn};
use std::collections::BTreeSet;

use crate::algorithm::entry::department_from_batch;
use crate::algorithm::layout::HEADER_BAND_ROWS;
use crate::models::{BatchColorMap, Spreadsheet};

/// Marca que identifica una etiqueta de lote en la cabecera.
pub const BATCH_MARKER: &str = "BS";

/// Recorre las 4 primeras filas de cada hoja de lunes a viernes y registra
/// huella -> etiqueta para cada celda que contiene "BS".
///
/// Nunca falla: sin hojas o sin etiquetas devuelve un mapa vacío, que los
/// llamadores deben tratar como "no hay datos".
pub fn extract_batch_colors(book: &Spreadsheet) -> BatchColorMap {
    let mut colors = BatchColorMap::new();

    for (_day, sheet) in book.weekday_sheets() {
        for row in sheet.rows.iter().take(HEADER_BAND_ROWS) {
            for cell in row.iter() {
                if !cell.text.contains(BATCH_MARKER) {
                    continue;
                }
                // celda sin formato: la API la pinta como canales en 0
                let fp = cell.background.unwrap_or_default().fingerprint();
                let label = cell.text.trim().to_string();
                if let Some(previous) = colors.insert(fp.clone(), label.clone()) {
                    warn!(
                        "color {} on sheet '{}' remapped from '{}' to '{}'",
                        fp, sheet.title, previous, label
                    );
                }
            }
        }
    }

    info!("batch color key: {} colors", colors.len());
    colors
}

/// Departamentos y lotes vistos en la banda de cabecera, ordenados.
pub fn extract_departments_and_batches(book: &Spreadsheet) -> (BTreeSet<String>, BTreeSet<String>) {
    let colors = extract_batch_colors(book);
    let mut departments = BTreeSet::new();
    let mut batches = BTreeSet::new();
    for (_fp, label) in colors.iter() {
        batches.insert(label.to_string());
        let dept = department_from_batch(label);
        if !dept.is_empty() {
            departments.insert(dept);
        }
    }
    (departments, batches)
}
