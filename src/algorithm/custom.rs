// Horario personalizado a partir de cursos elegidos uno a uno.
//
// Una celda corresponde a un curso elegido sólo si pasa todas las reglas de
// `course_matches_cell`, en orden. El color resuelve el lote cuando puede; si
// no, el texto de la celda tiene que nombrar el departamento.

use log::debug;
use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

use crate::algorithm::color_key::extract_batch_colors;
use crate::algorithm::entry::{
    department_from_batch, department_token_re, parse_embedded_time, regex, year_token, SectionFilter,
};
use crate::algorithm::layout::SheetLayout;
use crate::algorithm::render::{ReportColumns, TimetableReport};
use crate::algorithm::slots::parse_start_time;
use crate::models::{CourseRecord, SessionType, Spreadsheet, TimetableEntry};

static GROUP: OnceLock<Regex> = OnceLock::new();

/// "(CS-A, G-1)" o "(CS, G-1)": departamento, sección opcional y número de grupo.
fn group_re() -> &'static Regex {
    regex(&GROUP, r"\(\s*([A-Z]{2,4})(?:\s*-\s*([A-Z]))?\s*,\s*G\s*-\s*(\d+)\s*\)")
}

const NOISE_WORDS: [&str; 3] = ["lab", "practical", "pract"];

#[derive(Debug, Clone, PartialEq, Eq)]
struct GroupTag {
    department: String,
    section: String,
    number: String,
}

fn group_tag(text: &str) -> Option<(GroupTag, usize)> {
    let caps = group_re().captures(text)?;
    let whole = caps.get(0)?;
    Some((
        GroupTag {
            department: caps[1].to_string(),
            section: caps.get(2).map(|m| m.as_str().to_string()).unwrap_or_default(),
            number: caps[3].to_string(),
        },
        whole.start(),
    ))
}

fn collapse_lower(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
}

/// Nombre base de la selección: lo anterior al paréntesis de grupo si lo tiene.
fn selection_base_name(name: &str) -> String {
    let base = match group_tag(name) {
        Some((_, start)) => &name[..start],
        None => name,
    };
    collapse_lower(base)
}

/// Nombre normalizado para deduplicar: minúsculas, sin puntuación y sin las
/// palabras "lab", "practical" y "pract".
pub fn normalize_course_name(name: &str) -> String {
    let lowered: String = name
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();
    lowered
        .split_whitespace()
        .filter(|w| !NOISE_WORDS.contains(w))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Patrón estricto "(DEPT-SEC, G-N)" para la selección agrupada.
fn strict_group_re(department: &str, section: &str, number: &str) -> Option<Regex> {
    let pattern = if section.is_empty() {
        format!(r"\(\s*{}\s*,\s*G\s*-\s*{}\s*\)", regex::escape(department), regex::escape(number))
    } else {
        format!(
            r"\(\s*{}\s*-\s*{}\s*,\s*G\s*-\s*{}\s*\)",
            regex::escape(department),
            regex::escape(section),
            regex::escape(number)
        )
    };
    Regex::new(&pattern).ok()
}

/// Decide si el texto de una celda (con el lote resuelto por su color, si lo
/// hay) corresponde al curso elegido.
pub fn course_matches_cell(text: &str, cell_batch: Option<&str>, selected: &CourseRecord) -> bool {
    let filter = section_filter_for(selected);
    match_cell(text, cell_batch, selected, &filter).is_some()
}

fn section_filter_for(selected: &CourseRecord) -> SectionFilter {
    let department = selected.department.trim();
    SectionFilter::new(&selected.section, Some(department).filter(|d| !d.is_empty()))
}

/// Reglas de `course_matches_cell`; devuelve el nombre limpio de la celda.
fn match_cell(text: &str, cell_batch: Option<&str>, selected: &CourseRecord, filter: &SectionFilter) -> Option<String> {
    let (without_time, _) = parse_embedded_time(text);
    let department = selected.department.trim();

    // sección, y con ella el texto sin el patrón que la marca
    let cleaned = filter.strip(&without_time)?;

    // nombre, sobre el texto limpio
    let base = selection_base_name(&selected.name);
    if base.is_empty() || !collapse_lower(&cleaned).contains(&base) {
        return None;
    }

    // una clase elegida no arrastra su laboratorio
    if !selected.name.to_lowercase().contains("lab") && text.to_lowercase().contains("lab") {
        return None;
    }

    // grupos "G-n": departamento, sección y número exactos
    let cell_group = group_tag(&without_time);
    let selected_group = group_tag(&selected.name);
    if cell_group.is_some() || selected_group.is_some() {
        let (tag, _) = selected_group?;
        let group_dept = if department.is_empty() { tag.department.as_str() } else { department };
        match strict_group_re(group_dept, filter.section(), &tag.number) {
            Some(re) if re.is_match(&without_time) => {}
            _ => return None,
        }
    }

    // "(XX-Y" en la celda debe ser del departamento elegido
    if !department.is_empty() {
        if let Some(caps) = department_token_re().captures(&without_time) {
            if &caps[1] != department {
                return None;
            }
        }
    }

    // lote por color, con los respaldos en este orden
    let named_in_text = !department.is_empty() && text.contains(department);
    let batch_ok = match cell_batch {
        Some(batch) if batch == selected.batch => true,
        Some(batch) => {
            let same_year = match (year_token(batch), year_token(&selected.batch)) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            };
            if !same_year {
                return None;
            }
            let color_dept = department_from_batch(batch);
            if color_dept.is_empty() {
                named_in_text
            } else {
                color_dept == department
            }
        }
        None => named_in_text,
    };
    if batch_ok { Some(cleaned) } else { None }
}

type DedupKey = (chrono::Weekday, String, String, SessionType, String, String, String);

/// Horario de los cursos elegidos. Entradas repetidas (misma franja, sala,
/// tipo, sección, lote y nombre normalizado) se reducen a la primera.
pub fn get_custom_timetable(book: &Spreadsheet, selected: &[CourseRecord]) -> TimetableReport {
    if selected.is_empty() {
        return TimetableReport::NoCoursesSelected;
    }
    let colors = extract_batch_colors(book);
    if colors.is_empty() {
        return TimetableReport::NoClasses;
    }

    let filters: Vec<SectionFilter> = selected.iter().map(section_filter_for).collect();
    let mut entries: Vec<TimetableEntry> = Vec::new();
    let mut seen: HashSet<DedupKey> = HashSet::new();

    for (day, sheet) in book.weekday_sheets() {
        let layout = SheetLayout::locate(sheet);
        for r in layout.data_rows(sheet) {
            let kind = layout.row_kind(r);
            for (col, cell) in sheet.rows[r].iter().enumerate() {
                let text = cell.text.trim();
                if text.is_empty() {
                    continue;
                }
                let cell_batch = cell.fingerprint().and_then(|fp| colors.get(&fp));

                for (course, filter) in selected.iter().zip(filters.iter()) {
                    let cleaned = match match_cell(text, cell_batch, course, filter) {
                        Some(cleaned) => cleaned,
                        None => continue,
                    };

                    let (_, embedded) = parse_embedded_time(text);
                    let name = if cleaned.is_empty() { course.name.clone() } else { cleaned };
                    let time_slot = embedded
                        .or_else(|| layout.header_time(sheet, col, kind))
                        .unwrap_or_else(|| "Unknown".to_string());
                    let room = layout.room_for_row(sheet, r);

                    let key: DedupKey = (
                        day,
                        time_slot.clone(),
                        room.clone(),
                        kind,
                        filter.section().to_string(),
                        course.batch.clone(),
                        normalize_course_name(&name),
                    );
                    if !seen.insert(key) {
                        continue;
                    }

                    entries.push(TimetableEntry {
                        day,
                        start: parse_start_time(&time_slot),
                        time_slot,
                        room,
                        kind,
                        course: name,
                        column_rank: layout.column_rank(col),
                        section: filter.section().to_string(),
                        batch: course.batch.clone(),
                    });
                }
            }
        }
    }

    debug!("custom timetable: {} courses selected, {} entries", selected.len(), entries.len());
    TimetableReport::schedule(ReportColumns::Custom, entries)
}
