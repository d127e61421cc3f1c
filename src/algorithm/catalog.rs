// Catálogo de cursos: un recorrido por todas las celdas de curso de la semana.

use log::info;
use std::collections::HashSet;

use crate::algorithm::color_key::extract_batch_colors;
use crate::algorithm::entry::{course_cell, listed_sections, parse_course_entry, year_token};
use crate::algorithm::layout::FIRST_DATA_ROW;
use crate::models::{weekday_name, BatchColorMap, CourseRecord, Spreadsheet};

/// Extrae el catálogo completo leyendo el mapa de colores del propio libro.
pub fn extract_all_courses(book: &Spreadsheet) -> Vec<CourseRecord> {
    let colors = extract_batch_colors(book);
    build_catalog(book, &colors)
}

/// Recorre las filas de datos de cada hoja de lunes a viernes y agrega un
/// registro por cada (name, department, section, batch) distinto. El día del
/// primer registro es el que se conserva; el orden es el de aparición. Una
/// celda compartida "(CS-A, CS-B)" da un registro por sección.
pub fn build_catalog(book: &Spreadsheet, colors: &BatchColorMap) -> Vec<CourseRecord> {
    let mut courses: Vec<CourseRecord> = Vec::new();
    let mut seen: HashSet<(String, String, String, String)> = HashSet::new();

    for (day, sheet) in book.weekday_sheets() {
        for row in sheet.rows.iter().skip(FIRST_DATA_ROW) {
            for cell in row.iter() {
                let (batch, fp) = match course_cell(cell, colors) {
                    Some(found) => found,
                    None => continue,
                };
                let parsed = match parse_course_entry(&cell.text, batch) {
                    Some(p) if !p.name.is_empty() => p,
                    _ => continue,
                };

                let mut sections = listed_sections(&cell.text);
                if sections.is_empty() {
                    sections.push(parsed.section.clone());
                }

                for section in sections {
                    let key = (parsed.name.clone(), parsed.department.clone(), section.clone(), batch.to_string());
                    if !seen.insert(key) {
                        continue;
                    }

                    courses.push(CourseRecord {
                        name: parsed.name.clone(),
                        department: parsed.department.clone(),
                        section,
                        batch: batch.to_string(),
                        full_entry: cell.text.trim().to_string(),
                        day: weekday_name(day).to_string(),
                        color_code: fp.0.clone(),
                    });
                }
            }
        }
    }

    info!("course catalog: {} courses", courses.len());
    courses
}

/// Filtra el catálogo: departamento y lote exactos, `query` como subcadena
/// (sin distinguir mayúsculas) de nombre, departamento o sección. Parámetros
/// vacíos no filtran. Resultado ordenado por nombre, departamento y sección.
pub fn search_courses(courses: &[CourseRecord], query: &str, department: &str, batch: &str) -> Vec<CourseRecord> {
    let query = query.trim().to_lowercase();
    let department = department.trim();
    let batch = batch.trim();

    let mut out: Vec<CourseRecord> = courses
        .iter()
        .filter(|c| department.is_empty() || c.department == department)
        .filter(|c| batch.is_empty() || c.batch == batch)
        .filter(|c| {
            query.is_empty()
                || c.name.to_lowercase().contains(&query)
                || c.department.to_lowercase().contains(&query)
                || c.section.to_lowercase().contains(&query)
        })
        .cloned()
        .collect();

    out.sort_by(|a, b| {
        a.name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then_with(|| a.department.cmp(&b.department))
            .then_with(|| a.section.cmp(&b.section))
    });
    out
}

/// "Data Structures CS A 2024": nombre, departamento, sección y año del lote
/// (o el lote completo si no trae año). Las partes vacías se omiten.
pub fn format_course_display(course: &CourseRecord) -> String {
    let batch = course.batch.trim();
    let year = year_token(batch).unwrap_or(batch);
    [course.name.trim(), course.department.trim(), course.section.trim(), year]
        .iter()
        .filter(|p| !p.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Cell, CellColor, Sheet};

    fn record(name: &str, dept: &str, section: &str, batch: &str) -> CourseRecord {
        CourseRecord {
            name: name.into(),
            department: dept.into(),
            section: section.into(),
            batch: batch.into(),
            full_entry: String::new(),
            day: String::new(),
            color_code: String::new(),
        }
    }

    fn week() -> Spreadsheet {
        let green = CellColor::new(0.2, 0.8, 0.2);
        let grey = CellColor::new(0.5, 0.5, 0.5);
        let mut rows = vec![vec![Cell::colored("BS CS (2024)", green)], vec![], vec![], vec![], vec![]];
        rows.push(vec![
            Cell::plain("101"),
            Cell::colored("Data Structures (A)", green),
            Cell::colored("Data Structures (B)", green),
            Cell::colored("Seminar", grey),
        ]);
        rows.push(vec![Cell::plain("102"), Cell::colored("Data Structures (A)", green)]);
        let monday = Sheet::new("Monday", rows.clone());
        let tuesday = Sheet::new("Tuesday", rows);
        Spreadsheet::new(vec![monday, tuesday])
    }

    #[test]
    fn catalog_is_deduplicated_on_identity() {
        let courses = extract_all_courses(&week());
        assert_eq!(courses.len(), 2);
        assert_eq!(courses[0].name, "Data Structures");
        assert_eq!(courses[0].section, "A");
        assert_eq!(courses[0].department, "CS");
        assert_eq!(courses[0].day, "Monday");
        assert_eq!(courses[0].full_entry, "Data Structures (A)");
        assert_eq!(courses[1].section, "B");
    }

    #[test]
    fn catalog_is_idempotent() {
        let book = week();
        let first: HashSet<CourseRecord> = extract_all_courses(&book).into_iter().collect();
        let second: HashSet<CourseRecord> = extract_all_courses(&book).into_iter().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn search_filters_and_sorts() {
        let courses = vec![
            record("networks", "CS", "B", "BS CS (2023)"),
            record("Calculus", "EE", "A", "BS EE (2024)"),
            record("Networks", "CS", "A", "BS CS (2023)"),
        ];
        let all = search_courses(&courses, "", "", "");
        let names: Vec<_> = all.iter().map(|c| (c.name.as_str(), c.section.as_str())).collect();
        assert_eq!(names, vec![("Calculus", "A"), ("Networks", "A"), ("networks", "B")]);

        assert_eq!(search_courses(&courses, "NET", "", "").len(), 2);
        assert_eq!(search_courses(&courses, "", "EE", "").len(), 1);
        assert_eq!(search_courses(&courses, "", "", "BS CS (2023)").len(), 2);
        assert!(search_courses(&courses, "", "cs", "").is_empty());
    }

    #[test]
    fn display_prefers_year_token() {
        assert_eq!(
            format_course_display(&record("Data St", "CS", "A", "BS CS (2024)")),
            "Data St CS A 2024"
        );
        assert_eq!(format_course_display(&record("OOP", "", "", "BS-CS-1")), "OOP BS-CS-1");
    }
}
