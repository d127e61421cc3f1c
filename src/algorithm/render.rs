// Resultado de una consulta de horario y su formato markdown.
//
// Las condiciones "no encontrado" son valores, no errores: el llamador decide
// el estilo mirando `is_not_found()` o el marcador inicial del texto.

use chrono::Weekday;
use serde::Serialize;
use std::cmp::Ordering;

use crate::algorithm::entry::year_token;
use crate::models::{weekday_name, TimetableEntry, WEEKDAY_SHEETS};

/// Marcador inicial de todos los textos de "sin resultado".
pub const WARNING_MARKER: &str = "⚠️";
pub const NO_BATCHES_MESSAGE: &str = "⚠️ No batches found. Please check the sheet format.";
pub const NO_CLASSES_MESSAGE: &str = "⚠️ No classes found for selected criteria";
pub const NO_COURSES_SELECTED_MESSAGE: &str = "⚠️ No courses selected";

/// Columnas de la tabla: consulta por lote o selección personalizada.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportColumns {
    Batch,
    Custom,
}

#[derive(Debug, Clone)]
pub enum TimetableReport {
    Schedule {
        columns: ReportColumns,
        entries: Vec<TimetableEntry>,
    },
    NoBatches,
    BatchNotFound {
        batch: String,
        suggestion: Option<String>,
    },
    NoClasses,
    NoCoursesSelected,
}

fn day_index(day: Weekday) -> usize {
    WEEKDAY_SHEETS
        .iter()
        .position(|(_, d)| *d == day)
        .unwrap_or(WEEKDAY_SHEETS.len())
}

/// Día, luego posición de la columna, luego hora de inicio (las no
/// interpretables al final). El orden de inserción decide los empates.
fn compare_entries(a: &TimetableEntry, b: &TimetableEntry) -> Ordering {
    day_index(a.day)
        .cmp(&day_index(b.day))
        .then(a.column_rank.cmp(&b.column_rank))
        .then_with(|| match (a.start, b.start) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}

impl TimetableReport {
    /// Ordena las entradas; sin entradas el resultado es `NoClasses`.
    pub fn schedule(columns: ReportColumns, mut entries: Vec<TimetableEntry>) -> TimetableReport {
        if entries.is_empty() {
            return TimetableReport::NoClasses;
        }
        entries.sort_by(compare_entries);
        TimetableReport::Schedule { columns, entries }
    }

    pub fn is_not_found(&self) -> bool {
        !matches!(self, TimetableReport::Schedule { .. })
    }

    pub fn entries(&self) -> &[TimetableEntry] {
        match self {
            TimetableReport::Schedule { entries, .. } => entries.as_slice(),
            _ => &[],
        }
    }

    /// Texto de "sin resultado", `None` para horarios.
    pub fn sentinel(&self) -> Option<String> {
        match self {
            TimetableReport::Schedule { .. } => None,
            TimetableReport::NoBatches => Some(NO_BATCHES_MESSAGE.to_string()),
            TimetableReport::BatchNotFound { batch, suggestion } => Some(match suggestion {
                Some(s) => format!("{} Batch '{}' not found! Did you mean '{}'?", WARNING_MARKER, batch, s),
                None => format!("{} Batch '{}' not found!", WARNING_MARKER, batch),
            }),
            TimetableReport::NoClasses => Some(NO_CLASSES_MESSAGE.to_string()),
            TimetableReport::NoCoursesSelected => Some(NO_COURSES_SELECTED_MESSAGE.to_string()),
        }
    }

    /// Una tabla markdown por día con clases, en orden lunes a viernes.
    pub fn render(&self) -> String {
        let (columns, entries) = match self {
            TimetableReport::Schedule { columns, entries } => (*columns, entries),
            other => return other.sentinel().unwrap_or_default(),
        };

        let mut out: Vec<String> = Vec::new();
        for (_, day) in WEEKDAY_SHEETS.iter() {
            let rows: Vec<&TimetableEntry> = entries.iter().filter(|e| e.day == *day).collect();
            if rows.is_empty() {
                continue;
            }
            out.push(format!("### 📌 {}\n", weekday_name(*day)));
            match columns {
                ReportColumns::Batch => {
                    out.push("| Time | Room | Type | Course |".to_string());
                    out.push("|------|------|------|--------|".to_string());
                }
                ReportColumns::Custom => {
                    out.push("| Time | Room | Type | Course | Section | Batch |".to_string());
                    out.push("|------|------|------|--------|---------|-------|".to_string());
                }
            }
            for e in rows {
                let mut line = format!(
                    "| {} | {} | {} | {} |",
                    escape_cell(&e.time_slot),
                    escape_cell(&e.room),
                    e.kind,
                    escape_cell(&e.course)
                );
                if columns == ReportColumns::Custom {
                    let batch = year_token(&e.batch).unwrap_or(e.batch.as_str());
                    line.push_str(&format!(" {} | {} |", escape_cell(&e.section), escape_cell(batch)));
                }
                out.push(line);
            }
            out.push("\n".to_string());
        }
        out.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SessionType;
    use chrono::NaiveTime;

    fn entry(day: Weekday, rank: usize, start: Option<(u32, u32)>, course: &str) -> TimetableEntry {
        TimetableEntry {
            day,
            time_slot: "t".into(),
            room: "101".into(),
            kind: SessionType::Class,
            course: course.into(),
            column_rank: rank,
            start: start.and_then(|(h, m)| NaiveTime::from_hms_opt(h, m, 0)),
            section: "A".into(),
            batch: "BS CS (2024)".into(),
        }
    }

    #[test]
    fn entries_sorted_by_day_rank_then_start() {
        let report = TimetableReport::schedule(
            ReportColumns::Batch,
            vec![
                entry(Weekday::Tue, 0, Some((8, 30)), "tue"),
                entry(Weekday::Mon, 1, Some((8, 0)), "mon-late-col"),
                entry(Weekday::Mon, 0, None, "mon-unknown"),
                entry(Weekday::Mon, 0, Some((10, 0)), "mon-10"),
            ],
        );
        let order: Vec<&str> = report.entries().iter().map(|e| e.course.as_str()).collect();
        assert_eq!(order, vec!["mon-10", "mon-unknown", "mon-late-col", "tue"]);
    }

    #[test]
    fn empty_schedule_is_no_classes() {
        let report = TimetableReport::schedule(ReportColumns::Custom, Vec::new());
        assert!(report.is_not_found());
        assert_eq!(report.render(), NO_CLASSES_MESSAGE);
    }

    #[test]
    fn sentinels_carry_marker() {
        let reports = [
            TimetableReport::NoBatches,
            TimetableReport::NoClasses,
            TimetableReport::NoCoursesSelected,
            TimetableReport::BatchNotFound { batch: "BS EE (1999)".into(), suggestion: None },
        ];
        for r in reports.iter() {
            assert!(r.render().starts_with(WARNING_MARKER));
        }
        let suggested = TimetableReport::BatchNotFound {
            batch: "BS CS (2042)".into(),
            suggestion: Some("BS CS (2024)".into()),
        };
        assert_eq!(
            suggested.render(),
            "⚠️ Batch 'BS CS (2042)' not found! Did you mean 'BS CS (2024)'?"
        );
    }

    #[test]
    fn custom_table_shows_year_and_escapes_pipes() {
        let mut e = entry(Weekday::Wed, 0, None, "Ethics | Law");
        e.batch = "BS CS (2024)".into();
        let text = TimetableReport::schedule(ReportColumns::Custom, vec![e]).render();
        assert!(text.starts_with("### 📌 Wednesday"));
        assert!(text.contains("| Time | Room | Type | Course | Section | Batch |"));
        assert!(text.contains("| t | 101 | Class | Ethics \\| Law | A | 2024 |"));
    }
}
