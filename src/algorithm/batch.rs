// Horario de un lote y una sección.

use log::{debug, info};
use std::collections::HashSet;

use crate::algorithm::color_key::extract_batch_colors;
use crate::algorithm::entry::{parse_embedded_time, SectionFilter};
use crate::algorithm::layout::SheetLayout;
use crate::algorithm::render::{ReportColumns, TimetableReport};
use crate::algorithm::slots::parse_start_time;
use crate::models::{ColorFingerprint, Spreadsheet, TimetableEntry};

/// Similitud mínima (Levenshtein normalizado) para sugerir un lote.
pub const SUGGESTION_THRESHOLD: f64 = 0.6;

/// Lote conocido más parecido al pedido, si supera el umbral.
pub fn suggest_batch(requested: &str, known: &[String]) -> Option<String> {
    let requested = requested.trim().to_lowercase();
    known
        .iter()
        .map(|label| (label, strsim::normalized_levenshtein(&requested, &label.to_lowercase())))
        .filter(|(_, score)| *score >= SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(label, _)| label.clone())
}

/// Todas las celdas del color del lote que nombran la sección `section` con
/// cualquiera de sus patrones; una celda compartida "(CS-A, CS-B)" aparece en
/// ambas secciones.
///
/// La hora escrita en la celda manda sobre la de cabecera; sin ninguna de las
/// dos la franja queda como "Unknown". Un lote desconocido (o un libro sin
/// etiquetas de lote) devuelve `BatchNotFound`.
pub fn get_timetable(book: &Spreadsheet, batch: &str, section: &str) -> TimetableReport {
    let colors = extract_batch_colors(book);
    let batch = batch.trim();
    let targets: HashSet<&ColorFingerprint> = colors.fingerprints_for(batch).into_iter().collect();
    if targets.is_empty() {
        let suggestion = suggest_batch(batch, &colors.labels());
        info!("batch '{}' not found (suggestion: {:?})", batch, suggestion);
        return TimetableReport::BatchNotFound {
            batch: batch.to_string(),
            suggestion,
        };
    }

    let filter = SectionFilter::new(section, None);
    let section = filter.section().to_string();
    let mut entries: Vec<TimetableEntry> = Vec::new();

    for (day, sheet) in book.weekday_sheets() {
        let layout = SheetLayout::locate(sheet);
        for r in layout.data_rows(sheet) {
            let kind = layout.row_kind(r);
            for (col, cell) in sheet.rows[r].iter().enumerate() {
                let text = cell.text.trim();
                if text.is_empty() {
                    continue;
                }
                match cell.fingerprint() {
                    Some(fp) if targets.contains(&fp) => {}
                    _ => continue,
                }

                let (without_time, embedded) = parse_embedded_time(text);
                let cleaned = match filter.strip(&without_time) {
                    Some(cleaned) => cleaned,
                    None => continue,
                };

                let time_slot = embedded
                    .or_else(|| layout.header_time(sheet, col, kind))
                    .unwrap_or_else(|| "Unknown".to_string());
                let course = if cleaned.is_empty() {
                    without_time.trim().to_string()
                } else {
                    cleaned
                };

                entries.push(TimetableEntry {
                    day,
                    start: parse_start_time(&time_slot),
                    time_slot,
                    room: layout.room_for_row(sheet, r),
                    kind,
                    course,
                    column_rank: layout.column_rank(col),
                    section: section.clone(),
                    batch: batch.to_string(),
                });
            }
        }
    }

    debug!("batch '{}' section '{}': {} entries", batch, section, entries.len());
    TimetableReport::schedule(ReportColumns::Batch, entries)
}
