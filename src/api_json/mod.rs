use serde::{Deserialize, Serialize};

use crate::algorithm::{ReportColumns, TimetableReport};
use crate::models::{weekday_name, CourseRecord, TimetableEntry};

pub mod handlers;

/// Parámetros de la consulta por lote
///
/// # Estructura del JSON esperado:
/// ```json
/// { "batch": "BS CS (2024)", "section": "A" }
/// ```
///
/// # Campos:
/// - `batch`: etiqueta del lote tal como aparece en la cabecera (requerido)
/// - `section`: letra de sección; vacía sólo encuentra entradas sin sección
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimetableQuery {
    pub batch: String,
    #[serde(default)]
    pub section: String,
}

/// Filtros de búsqueda de cursos. Todos opcionales; `session` guarda los
/// filtros y los resultados en la sesión indicada.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CourseSearchQuery {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub batch: String,
    #[serde(default)]
    pub session: Option<String>,
}

/// Fila de horario tal como se entrega por HTTP.
#[derive(Debug, Clone, Serialize)]
pub struct EntryDto {
    pub day: String,
    pub time: String,
    pub room: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub course: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub section: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub batch: String,
    pub start: Option<String>,
}

impl From<&TimetableEntry> for EntryDto {
    fn from(e: &TimetableEntry) -> Self {
        EntryDto {
            day: weekday_name(e.day).to_string(),
            time: e.time_slot.clone(),
            room: e.room.clone(),
            kind: e.kind.to_string(),
            course: e.course.clone(),
            section: e.section.clone(),
            batch: e.batch.clone(),
            start: e.start.map(|t| t.format("%H:%M").to_string()),
        }
    }
}

/// Respuesta de las consultas de horario. `status` es "ok" o "not_found";
/// `text` es la tabla markdown o el mensaje "⚠️ ...".
#[derive(Debug, Clone, Serialize)]
pub struct ReportResponse {
    pub status: &'static str,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub columns: Option<ReportColumns>,
    pub entries: Vec<EntryDto>,
}

impl From<&TimetableReport> for ReportResponse {
    fn from(report: &TimetableReport) -> Self {
        let columns = match report {
            TimetableReport::Schedule { columns, .. } => Some(*columns),
            _ => None,
        };
        ReportResponse {
            status: if report.is_not_found() { "not_found" } else { "ok" },
            text: report.render(),
            columns,
            entries: report.entries().iter().map(EntryDto::from).collect(),
        }
    }
}

pub fn parse_timetable_query(json_str: &str) -> Result<TimetableQuery, serde_json::Error> {
    serde_json::from_str::<TimetableQuery>(json_str)
}

/// Parsea un curso elegido; `name` y `batch` no pueden venir vacíos.
/// Los campos se devuelven recortados.
pub fn parse_course_record(json_str: &str) -> Result<CourseRecord, String> {
    let mut course: CourseRecord =
        serde_json::from_str(json_str).map_err(|e| format!("invalid course JSON: {}", e))?;
    course.name = course.name.trim().to_string();
    course.department = course.department.trim().to_string();
    course.section = course.section.trim().to_uppercase();
    course.batch = course.batch.trim().to_string();
    if course.name.is_empty() {
        return Err("course name is required".to_string());
    }
    if course.batch.is_empty() {
        return Err("course batch is required".to_string());
    }
    Ok(course)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn course_record_is_trimmed_and_validated() {
        let c = parse_course_record(r#"{"name":" Networks ","department":"CS","section":"a","batch":"BS CS (2024)"}"#)
            .expect("Debe parsear el curso");
        assert_eq!(c.name, "Networks");
        assert_eq!(c.section, "A");
        assert!(c.day.is_empty());

        assert!(parse_course_record(r#"{"name":"  ","batch":"BS CS (2024)"}"#).is_err());
        assert!(parse_course_record(r#"{"name":"OOP","batch":""}"#).is_err());
        assert!(parse_course_record(r#"{"name":"OOP"}"#).is_err());
    }

    #[test]
    fn timetable_query_section_defaults_empty() {
        let q = parse_timetable_query(r#"{"batch":"BS CS (2024)"}"#).expect("Debe parsear la consulta");
        assert_eq!(q.section, "");
        assert!(parse_timetable_query(r#"{"section":"A"}"#).is_err());
    }

    #[test]
    fn not_found_report_response() {
        let resp = ReportResponse::from(&TimetableReport::NoCoursesSelected);
        assert_eq!(resp.status, "not_found");
        assert!(resp.text.starts_with("⚠️"));
        assert!(resp.entries.is_empty());
        assert!(resp.columns.is_none());
    }
}
